use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracing::instrument;
use unikorn_apis::{ClusterManager, KubernetesCluster};

use super::{find, reference};
use crate::{
	commands::{
		get::clustermanager::{clusters_by_manager, row, ClusterManagerRow},
		join,
	},
	k8s::{list, names, LabelSet},
	output::Tree,
	scope::{OrganizationFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct ClusterManagerArgs {
	/// Cluster manager ID or name
	pub identifier: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,
}

/// Rendered from the same row `get clustermanager` prints.
pub fn tree(manager: &ClusterManagerRow) -> Tree {
	let associated = if manager.clusters.is_empty() {
		Tree::new("Associated Clusters").text("No associated clusters")
	} else {
		Tree::new("Associated Clusters").text(join(&manager.clusters))
	};
	let reason = Some(manager.status.as_str()).filter(|r| !r.is_empty());

	Tree::new("Cluster Manager")
		.child(
			Tree::new("Basic Information")
				.field("Name", &manager.name)
				.field("ID", &manager.id)
				.field("Namespace", &manager.namespace),
		)
		.child(reference("Organization", &manager.organization))
		.child(associated)
		.child(Tree::new("Status").status("Condition", reason))
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(args: ClusterManagerArgs, session: &Session, writer: W) -> Result<()> {
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		None,
		None,
	)
	.await?;
	let client = session.client();

	let manager: ClusterManager = find(session, &scope, "cluster manager", &args.identifier).await?;
	let organizations = names::organizations(client, &session.identity_namespace)
		.await
		.context("failed to list organizations")?;
	let clusters: Vec<KubernetesCluster> = list::list_cluster_wide(client, &LabelSet::new())
		.await
		.context("failed to list kubernetes clusters")?;

	let row = row(&manager, &organizations, &clusters_by_manager(&clusters));
	tree(&row).write(writer, session.color)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use indoc::indoc;

	use super::*;
	use crate::commands::Reference;

	fn manager(clusters: &[&str]) -> ClusterManagerRow {
		ClusterManagerRow {
			name: "default".to_string(),
			id: "cm1".to_string(),
			organization: Reference {
				id: "o1".to_string(),
				name: "acme".to_string(),
			},
			clusters: clusters.iter().map(|c| c.to_string()).collect(),
			namespace: "org-ns".to_string(),
			status: "Provisioned".to_string(),
		}
	}

	#[test]
	fn test_tree() {
		assert_eq!(
			tree(&manager(&["web", "db"])).render(false),
			indoc! {"
				Cluster Manager
				├── Basic Information
				│   ├── Name: default
				│   ├── ID: cm1
				│   └── Namespace: org-ns
				├── Organization
				│   ├── ID: o1
				│   └── Name: acme
				├── Associated Clusters
				│   └── web, db
				└── Status
				    └── Condition: Provisioned
			"}
		);
	}

	#[test]
	fn test_no_clusters() {
		assert!(tree(&manager(&[]))
			.render(false)
			.contains("├── Associated Clusters\n│   └── No associated clusters\n"));
	}
}
