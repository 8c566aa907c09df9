use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{OpenstackIdentity, UnikornResource};

use crate::{
	k8s::{list, names, LabelSet, NameMap},
	output::{Column, Listing, OutputFlag, Printer},
	scope::{self, KubernetesClusterFlag},
	session::Session,
};

/// Identities created for a cluster are named after it with this prefix.
const CLUSTER_NAME_PREFIX: &str = "kubernetes-cluster-";

/// ID of the Kubernetes cluster an identity was created for.
pub fn cluster_id(identity: &OpenstackIdentity) -> &str {
	let name = identity.display_name();
	name.strip_prefix(CLUSTER_NAME_PREFIX).unwrap_or(name)
}

#[derive(Args, Debug)]
pub struct OpenstackIdentityArgs {
	/// Only show the identity with this ID, or the one for this cluster ID
	pub identifier: Option<String>,

	#[command(flatten)]
	pub kubernetes_cluster: KubernetesClusterFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenstackIdentityRow {
	pub openstack_identity_id: String,
	pub kubernetes_cluster_id: String,
	pub kubernetes_cluster_name: String,
}

impl OpenstackIdentityRow {
	fn new(identity: &OpenstackIdentity, clusters: &NameMap) -> Self {
		let cluster_id = cluster_id(identity);
		Self {
			openstack_identity_id: identity.name_any(),
			kubernetes_cluster_id: cluster_id.to_string(),
			kubernetes_cluster_name: if clusters.contains_id(cluster_id) {
				clusters.resolve(cluster_id).to_string()
			} else {
				String::new()
			},
		}
	}
}

impl Listing for OpenstackIdentityRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("OpenStack Identity ID"),
		Column::shown("Kubernetes Cluster ID"),
		Column::shown("Kubernetes Cluster Name"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.openstack_identity_id.clone(),
			self.kubernetes_cluster_id.clone(),
			self.kubernetes_cluster_name.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(
	args: OpenstackIdentityArgs,
	session: &Session,
	writer: W,
) -> Result<()> {
	let printer = Printer::new::<OpenstackIdentityRow>(&args.output, &[])?;
	let client = session.client();

	let cluster_filter = match &args.kubernetes_cluster.kubernetescluster {
		Some(name) => Some(
			scope::resolve_kubernetes_cluster(client, &LabelSet::new(), name)
				.await?
				.name_any(),
		),
		None => None,
	};

	let identities: Vec<OpenstackIdentity> =
		list::list_in(client, &session.region_namespace, &LabelSet::new())
			.await
			.context("failed to list OpenStack identities")?;
	let clusters = names::kubernetes_clusters(client, &LabelSet::new())
		.await
		.context("failed to get cluster names")?;

	let mut rows: Vec<_> = identities
		.iter()
		.map(|i| OpenstackIdentityRow::new(i, &clusters))
		.filter(|row| {
			args.identifier.as_deref().is_none_or(|id| {
				row.openstack_identity_id == id || row.kubernetes_cluster_id == id
			})
		})
		.filter(|row| {
			cluster_filter
				.as_deref()
				.is_none_or(|id| row.kubernetes_cluster_id == id)
		})
		.collect();
	rows.sort_by(|a, b| a.openstack_identity_id.cmp(&b.openstack_identity_id));

	printer.print(writer, &rows)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use unikorn_apis::{region::OpenstackIdentitySpec, NAME_LABEL};

	use super::*;

	#[rstest]
	#[case("kubernetes-cluster-c1", "c1")]
	#[case("c1", "c1")]
	#[case("", "")]
	fn test_cluster_id(#[case] name: &str, #[case] expected: &str) {
		let mut identity = OpenstackIdentity::new("osi-1", OpenstackIdentitySpec::default());
		identity
			.labels_mut()
			.insert(NAME_LABEL.to_string(), name.to_string());
		assert_eq!(cluster_id(&identity), expected);
	}
}
