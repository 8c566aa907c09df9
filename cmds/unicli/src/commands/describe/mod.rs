//! `describe`: show a single resource as a tree.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kube::ResourceExt;
use thiserror::Error;
use unikorn_apis::{Conditioned, UnikornResource};

use crate::{
	commands::Reference,
	k8s::{list, NamespacedResource},
	output::Tree,
	scope::Scope,
	session::Session,
};

pub mod clustermanager;
pub mod computeinstance;
pub mod kubernetescluster;
pub mod network;
pub mod openstackidentity;
pub mod virtualkubernetescluster;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind} {identifier} not found")]
pub struct NotFound {
	pub kind: &'static str,
	pub identifier: String,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
	#[command(subcommand)]
	pub command: DescribeCommands,
}

#[derive(Subcommand, Debug)]
pub enum DescribeCommands {
	/// Describe a Kubernetes cluster
	#[command(name = "kubernetescluster", visible_aliases = ["kc"])]
	KubernetesCluster(kubernetescluster::KubernetesClusterArgs),

	/// Describe a cluster manager
	#[command(name = "clustermanager", visible_aliases = ["cm"])]
	ClusterManager(clustermanager::ClusterManagerArgs),

	/// Describe a compute instance
	#[command(name = "instance", visible_aliases = ["ci", "computeinstance"])]
	Instance(computeinstance::ComputeInstanceArgs),

	/// Describe a network
	#[command(name = "network", visible_aliases = ["net"])]
	Network(network::NetworkArgs),

	/// Describe a virtual Kubernetes cluster
	#[command(name = "virtualkubernetescluster", visible_aliases = ["vkc"])]
	VirtualKubernetesCluster(virtualkubernetescluster::VirtualKubernetesClusterArgs),

	/// Describe an OpenStack identity
	#[command(name = "openstackidentity", visible_aliases = ["osi"])]
	OpenstackIdentity(openstackidentity::OpenstackIdentityArgs),
}

pub async fn run<W: Write>(args: DescribeArgs, session: &Session, writer: W) -> Result<()> {
	match args.command {
		DescribeCommands::KubernetesCluster(args) => {
			kubernetescluster::run(args, session, writer).await
		}
		DescribeCommands::ClusterManager(args) => clustermanager::run(args, session, writer).await,
		DescribeCommands::Instance(args) => computeinstance::run(args, session, writer).await,
		DescribeCommands::Network(args) => network::run(args, session, writer).await,
		DescribeCommands::VirtualKubernetesCluster(args) => {
			virtualkubernetescluster::run(args, session, writer).await
		}
		DescribeCommands::OpenstackIdentity(args) => {
			openstackidentity::run(args, session, writer).await
		}
	}
}

/// First resource in scope carrying `identifier` as its name label or ID.
pub async fn find<K: NamespacedResource>(
	session: &Session,
	scope: &Scope,
	kind: &'static str,
	identifier: &str,
) -> Result<K> {
	let resources: Vec<K> = list::list_all_namespaces(session.client(), &scope.labels()).await?;
	let resource = resources
		.into_iter()
		.find(|r| r.is_identified_by(identifier))
		.ok_or_else(|| NotFound {
			kind,
			identifier: identifier.to_string(),
		})?;
	Ok(resource)
}

pub fn basic_information(resource: &impl UnikornResource) -> Tree {
	Tree::new("Basic Information")
		.field("Name", resource.display_name())
		.field("ID", resource.name_any())
}

/// A section naming a related resource.
pub fn reference(title: &str, reference: &Reference) -> Tree {
	Tree::new(title)
		.field("ID", &reference.id)
		.field("Name", &reference.name)
}

pub fn status(resource: &impl Conditioned) -> Tree {
	Tree::new("Status").status("Condition", resource.status_reason())
}

/// A titled list of values.
pub fn values(title: &str, values: &[String]) -> Tree {
	let mut tree = Tree::new(title);
	for value in values {
		tree.push(Tree::new(value));
	}
	tree
}
