use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{kubernetes::KubernetesClusterSpec, KubernetesCluster, UnikornResource};

use crate::{
	commands::{matches_identifier, status_reason, Lookups, Reference},
	completion,
	k8s::list,
	output::{Column, ColumnsFlag, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, ProjectFlag, RegionFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct KubernetesClusterArgs {
	/// Only show the cluster with this name or ID
	#[arg(add = ArgValueCompleter::new(completion::kubernetes_clusters))]
	pub identifier: Option<String>,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,

	#[command(flatten)]
	pub region: RegionFlag,

	#[command(flatten)]
	pub columns: ColumnsFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct KubernetesClusterRow {
	pub name: String,
	pub id: String,
	pub version: String,
	pub status: String,
	pub organization: Reference,
	pub project: Reference,
	pub region: Reference,
	pub spec: KubernetesClusterSpec,
}

impl KubernetesClusterRow {
	fn new(cluster: &KubernetesCluster, lookups: &Lookups) -> Self {
		Self {
			name: cluster.display_name().to_string(),
			id: cluster.name_any(),
			version: cluster.spec.version.clone().unwrap_or_default(),
			status: status_reason(cluster),
			organization: lookups.organization(cluster.organization_id()),
			project: lookups.project(cluster.project_id()),
			region: lookups.region(&cluster.spec.region_id),
			spec: cluster.spec.clone(),
		}
	}
}

impl Listing for KubernetesClusterRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::hidden("id"),
		Column::shown("version"),
		Column::shown("status"),
		Column::shown("organization"),
		Column::shown("project"),
		Column::shown("region"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.version.clone(),
			self.status.clone(),
			self.organization.name.clone(),
			self.project.name.clone(),
			self.region.name.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(
	args: KubernetesClusterArgs,
	session: &Session,
	writer: W,
) -> Result<()> {
	let printer = Printer::new::<KubernetesClusterRow>(&args.output, &args.columns.columns)?;
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		args.region.region.as_deref(),
	)
	.await?;

	let mut clusters: Vec<KubernetesCluster> =
		list::list_all_namespaces(session.client(), &scope.labels())
			.await
			.context("failed to list kubernetes clusters")?;

	// Clusters reference their region in the spec rather than by label.
	if let Some(region_id) = scope.region_id() {
		clusters.retain(|c| c.spec.region_id == region_id);
	}
	clusters.retain(|c| matches_identifier(c, args.identifier.as_deref()));

	let lookups = Lookups::load(session).await?;
	let rows: Vec<_> = clusters
		.iter()
		.map(|c| KubernetesClusterRow::new(c, &lookups))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
