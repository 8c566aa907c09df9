use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::ArgValueCompleter;
use tracing::instrument;
use unikorn_apis::{UnikornResource, VirtualKubernetesCluster};

use super::{basic_information, find, reference, status};
use crate::{
	commands::Lookups,
	completion,
	output::Tree,
	scope::{OrganizationFlag, ProjectFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct VirtualKubernetesClusterArgs {
	/// Virtual cluster name or ID
	#[arg(add = ArgValueCompleter::new(completion::virtual_kubernetes_clusters))]
	pub identifier: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,
}

pub fn tree(cluster: &VirtualKubernetesCluster, lookups: &Lookups) -> Tree {
	let mut pools = Tree::new("Workload Pools");
	if cluster.spec.workload_pools.is_empty() {
		pools = pools.text("No workload pools configured");
	}
	for pool in &cluster.spec.workload_pools {
		pools.push(
			Tree::labeled("Pool", &pool.name)
				.field("Flavor ID", &pool.flavor_id)
				.field("Replicas", pool.replicas.to_string()),
		);
	}

	Tree::new("Virtual Kubernetes Cluster")
		.child(basic_information(cluster))
		.child(reference("Organization", &lookups.organization(cluster.organization_id())))
		.child(reference("Project", &lookups.project(cluster.project_id())))
		.child(reference("Region", &lookups.region(&cluster.spec.region_id)))
		.child(pools)
		.child(status(cluster))
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(
	args: VirtualKubernetesClusterArgs,
	session: &Session,
	writer: W,
) -> Result<()> {
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		None,
	)
	.await?;

	let cluster: VirtualKubernetesCluster =
		find(session, &scope, "virtual kubernetes cluster", &args.identifier).await?;
	let lookups = Lookups::load(session).await?;

	tree(&cluster, &lookups).write(writer, session.color)?;
	Ok(())
}
