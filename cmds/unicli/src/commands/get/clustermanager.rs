use std::{collections::HashMap, io::Write};

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{ClusterManager, KubernetesCluster, UnikornResource};

use crate::{
	commands::{join, matches_identifier, status_reason, Reference},
	k8s::{list, names, LabelSet, NameMap},
	output::{Column, ColumnsFlag, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct ClusterManagerArgs {
	/// Only show the cluster manager with this name or ID
	pub identifier: Option<String>,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub columns: ColumnsFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct ClusterManagerRow {
	pub name: String,
	pub id: String,
	pub organization: Reference,
	pub clusters: Vec<String>,
	pub namespace: String,
	pub status: String,
}

impl Listing for ClusterManagerRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("id"),
		Column::shown("organization"),
		Column::shown("clusters"),
		Column::shown("namespace"),
		Column::shown("status"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.organization.name.clone(),
			join(&self.clusters),
			self.namespace.clone(),
			self.status.clone(),
		]
	}
}

/// Names of the clusters managed by each cluster manager, by manager ID.
pub fn clusters_by_manager(clusters: &[KubernetesCluster]) -> HashMap<String, Vec<String>> {
	let mut managed: HashMap<String, Vec<String>> = HashMap::new();
	for cluster in clusters {
		managed
			.entry(cluster.spec.cluster_manager_id.clone())
			.or_default()
			.push(cluster.display_name().to_string());
	}
	managed
}

pub fn row(
	manager: &ClusterManager,
	organizations: &NameMap,
	managed: &HashMap<String, Vec<String>>,
) -> ClusterManagerRow {
	let id = manager.name_any();
	ClusterManagerRow {
		name: manager.display_name().to_string(),
		organization: Reference::resolve(organizations, manager.organization_id()),
		clusters: managed.get(&id).cloned().unwrap_or_default(),
		namespace: manager.namespace().unwrap_or_default(),
		status: status_reason(manager),
		id,
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: ClusterManagerArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<ClusterManagerRow>(&args.output, &args.columns.columns)?;
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		None,
		None,
	)
	.await?;
	let client = session.client();

	let mut managers: Vec<ClusterManager> = list::list_all_namespaces(client, &scope.labels())
		.await
		.context("failed to list cluster managers")?;
	managers.retain(|m| matches_identifier(m, args.identifier.as_deref()));

	let organizations = names::organizations(client, &session.identity_namespace)
		.await
		.context("failed to list organizations")?;
	let clusters: Vec<KubernetesCluster> = list::list_cluster_wide(client, &LabelSet::new())
		.await
		.context("failed to list kubernetes clusters")?;
	let managed = clusters_by_manager(&clusters);

	let rows: Vec<_> = managers
		.iter()
		.map(|m| row(m, &organizations, &managed))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
