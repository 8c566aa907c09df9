use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use tracing::instrument;
use unikorn_apis::{OpenstackIdentity, UnikornResource, ORGANIZATION_LABEL};

use super::NotFound;
use crate::{
	commands::get::openstackidentity::cluster_id,
	k8s::{list, names, LabelSet, NameMap},
	output::Tree,
	session::Session,
};

#[derive(Args, Debug)]
pub struct OpenstackIdentityArgs {
	/// OpenStack identity ID
	pub identifier: String,
}

pub fn tree(identity: &OpenstackIdentity, clusters: &NameMap) -> Tree {
	let cluster = cluster_id(identity);
	let cluster_name = if clusters.contains_id(cluster) {
		clusters.resolve(cluster)
	} else {
		""
	};

	Tree::new("OpenStack Identity")
		.child(
			Tree::new("Basic Information")
				.field("OpenStack Identity ID", identity.name_any())
				.field(
					"OpenStack Project ID",
					identity.spec.project_id.clone().unwrap_or_default(),
				),
		)
		.child(
			Tree::new("Kubernetes Cluster")
				.field("ID", cluster)
				.field("Name", cluster_name),
		)
		.child(Tree::new("Region").field("NKS Region ID", identity.label(ORGANIZATION_LABEL)))
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(
	args: OpenstackIdentityArgs,
	session: &Session,
	writer: W,
) -> Result<()> {
	let client = session.client();

	let identity: OpenstackIdentity =
		list::get_in(client, &session.region_namespace, &args.identifier)
			.await?
			.ok_or_else(|| NotFound {
				kind: "openstack identity",
				identifier: args.identifier.clone(),
			})?;
	let clusters = names::kubernetes_clusters(client, &LabelSet::new())
		.await
		.context("failed to get cluster names")?;

	tree(&identity, &clusters).write(writer, session.color)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use indoc::indoc;
	use unikorn_apis::{region::OpenstackIdentitySpec, NAME_LABEL};

	use super::*;

	#[test]
	fn test_tree() {
		let mut identity = OpenstackIdentity::new(
			"osi-1",
			OpenstackIdentitySpec {
				project_id: Some("d41d8cd9".to_string()),
				ssh_private_key: None,
			},
		);
		identity.metadata.labels = Some(BTreeMap::from([
			(NAME_LABEL.to_string(), "kubernetes-cluster-c1".to_string()),
			(ORGANIZATION_LABEL.to_string(), "o1".to_string()),
		]));
		let clusters = NameMap::from_iter([("c1", "web")]);

		assert_eq!(
			tree(&identity, &clusters).render(false),
			indoc! {"
				OpenStack Identity
				├── Basic Information
				│   ├── OpenStack Identity ID: osi-1
				│   └── OpenStack Project ID: d41d8cd9
				├── Kubernetes Cluster
				│   ├── ID: c1
				│   └── Name: web
				└── Region
				    └── NKS Region ID: o1
			"}
		);
	}
}
