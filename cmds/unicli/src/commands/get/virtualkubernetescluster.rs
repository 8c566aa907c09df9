use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{
	kubernetes::{VirtualKubernetesClusterSpec, VirtualKubernetesClusterStatus},
	UnikornResource, VirtualKubernetesCluster,
};

use crate::{
	commands::{matches_identifier, status_reason, Lookups, Reference},
	completion,
	k8s::list,
	output::{Column, Listing, OutputFlag, OutputFormat, Printer},
	scope::{OrganizationFlag, ProjectFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct VirtualKubernetesClusterArgs {
	/// Only show the cluster with this name or ID
	#[arg(add = ArgValueCompleter::new(completion::virtual_kubernetes_clusters))]
	pub identifier: Option<String>,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,

	/// Show full details as YAML, same as `-o yaml`
	#[arg(long)]
	pub detail: bool,

	#[command(flatten)]
	pub output: OutputFlag,
}

/// Detail document; the table shows names only.
#[derive(Debug, Serialize)]
pub struct VirtualKubernetesClusterRow {
	pub name: String,
	pub organization: Reference,
	pub project: Reference,
	pub region: Reference,
	pub spec: VirtualKubernetesClusterSpec,
	pub status: Option<VirtualKubernetesClusterStatus>,
	#[serde(skip)]
	status_reason: String,
}

impl VirtualKubernetesClusterRow {
	fn new(cluster: &VirtualKubernetesCluster, lookups: &Lookups) -> Self {
		Self {
			name: cluster.display_name().to_string(),
			organization: lookups.organization(cluster.organization_id()),
			project: lookups.project(cluster.project_id()),
			region: lookups.region(&cluster.spec.region_id),
			spec: cluster.spec.clone(),
			status: cluster.status.clone(),
			status_reason: status_reason(cluster),
		}
	}
}

impl Listing for VirtualKubernetesClusterRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("organization"),
		Column::shown("project"),
		Column::shown("region"),
		Column::shown("status"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.organization.name.clone(),
			self.project.name.clone(),
			self.region.name.clone(),
			self.status_reason.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(
	args: VirtualKubernetesClusterArgs,
	session: &Session,
	writer: W,
) -> Result<()> {
	let mut output = args.output.clone();
	if args.detail {
		output.format = OutputFormat::Yaml;
	}
	let printer = Printer::new::<VirtualKubernetesClusterRow>(&output, &[])?;

	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		None,
	)
	.await?;

	let mut clusters: Vec<VirtualKubernetesCluster> =
		list::list_all_namespaces(session.client(), &scope.labels())
			.await
			.context("failed to list virtual kubernetes clusters")?;

	if let Some(identifier) = &args.identifier {
		clusters.retain(|c| matches_identifier(c, Some(identifier)));
		if clusters.is_empty() {
			bail!("virtual kubernetes cluster {identifier} not found");
		}
	}

	let lookups = Lookups::load(session).await?;
	let rows: Vec<_> = clusters
		.iter()
		.map(|c| VirtualKubernetesClusterRow::new(c, &lookups))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
