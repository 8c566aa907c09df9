use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::ArgValueCompleter;
use tracing::instrument;
use unikorn_apis::{KubernetesCluster, UnikornResource};

use super::{basic_information, find, reference, status};
use crate::{
	commands::{join, Lookups},
	completion,
	output::Tree,
	scope::{OrganizationFlag, ProjectFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct KubernetesClusterArgs {
	/// Cluster name or ID
	#[arg(add = ArgValueCompleter::new(completion::kubernetes_clusters))]
	pub identifier: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,
}

pub fn tree(cluster: &KubernetesCluster, lookups: &Lookups) -> Tree {
	let spec = &cluster.spec;
	let network = spec.network.clone().unwrap_or_default();

	let mut pools = Tree::new("Workload Pools");
	if cluster.workload_pools().is_empty() {
		pools = pools.text("No workload pools configured");
	}
	for pool in cluster.workload_pools() {
		pools.push(
			Tree::labeled("Pool", &pool.name)
				.field("Flavor ID", pool.flavor_id.clone().unwrap_or_default())
				.field("Image ID", pool.image_id.clone().unwrap_or_default())
				.field("Replicas", pool.replicas.unwrap_or_default().to_string()),
		);
	}

	Tree::new("Kubernetes Cluster")
		.child(basic_information(cluster))
		.child(reference("Organization", &lookups.organization(cluster.organization_id())))
		.child(reference("Project", &lookups.project(cluster.project_id())))
		.child(reference("Region", &lookups.region(&spec.region_id)))
		.child(
			Tree::new("Cluster Details")
				.field("Version", spec.version.clone().unwrap_or_default())
				.field("Cluster Manager", &spec.cluster_manager_id),
		)
		.child(
			Tree::new("Network")
				.field("Node Network", network.node_network.unwrap_or_default())
				.field("Pod Network", network.pod_network.unwrap_or_default())
				.field("Service Network", network.service_network.unwrap_or_default())
				.field("DNS Nameservers", join(&network.dns_nameservers)),
		)
		.child(pools)
		.child(status(cluster))
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(
	args: KubernetesClusterArgs,
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

	let cluster: KubernetesCluster =
		find(session, &scope, "kubernetes cluster", &args.identifier).await?;
	let lookups = Lookups::load(session).await?;

	tree(&cluster, &lookups).write(writer, session.color)?;
	Ok(())
}
