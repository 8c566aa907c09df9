//! `get`: list resources as a table or as documents.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::Session;

pub mod clustermanager;
pub mod computeinstance;
pub mod kubernetescluster;
pub mod network;
pub mod openstackidentity;
pub mod organization;
pub mod project;
pub mod region;
pub mod sshkey;
pub mod user;
pub mod virtualkubernetescluster;

#[derive(Args, Debug)]
pub struct GetArgs {
	#[command(subcommand)]
	pub command: GetCommands,
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
	/// List Kubernetes clusters
	#[command(name = "kubernetescluster", visible_aliases = ["kubernetesclusters", "kc"])]
	KubernetesCluster(kubernetescluster::KubernetesClusterArgs),

	/// List cluster managers
	#[command(name = "clustermanager", visible_aliases = ["clustermanagers", "cm"])]
	ClusterManager(clustermanager::ClusterManagerArgs),

	/// List compute instances
	#[command(name = "instance", visible_aliases = ["instances", "ci", "computeinstance"])]
	Instance(computeinstance::ComputeInstanceArgs),

	/// List networks
	#[command(name = "network", visible_aliases = ["networks", "net"])]
	Network(network::NetworkArgs),

	/// List virtual Kubernetes clusters
	#[command(
		name = "virtualkubernetescluster",
		visible_aliases = ["virtualkubernetesclusters", "vkc"]
	)]
	VirtualKubernetesCluster(virtualkubernetescluster::VirtualKubernetesClusterArgs),

	/// List OpenStack identities and the clusters they belong to
	#[command(name = "openstackidentity", visible_aliases = ["openstackidentities", "osi"])]
	OpenstackIdentity(openstackidentity::OpenstackIdentityArgs),

	/// Print the SSH private key of a Kubernetes cluster
	#[command(name = "sshkey")]
	SshKey(sshkey::SshKeyArgs),

	/// List organization users
	#[command(name = "user", visible_aliases = ["users"])]
	User(user::UserArgs),

	/// List organizations
	#[command(name = "organization", visible_aliases = ["organizations", "org"])]
	Organization(organization::OrganizationArgs),

	/// List projects
	#[command(name = "project", visible_aliases = ["projects"])]
	Project(project::ProjectArgs),

	/// List regions
	#[command(name = "region", visible_aliases = ["regions"])]
	Region(region::RegionArgs),
}

pub async fn run<W: Write>(args: GetArgs, session: &Session, writer: W) -> Result<()> {
	match args.command {
		GetCommands::KubernetesCluster(args) => kubernetescluster::run(args, session, writer).await,
		GetCommands::ClusterManager(args) => clustermanager::run(args, session, writer).await,
		GetCommands::Instance(args) => computeinstance::run(args, session, writer).await,
		GetCommands::Network(args) => network::run(args, session, writer).await,
		GetCommands::VirtualKubernetesCluster(args) => {
			virtualkubernetescluster::run(args, session, writer).await
		}
		GetCommands::OpenstackIdentity(args) => openstackidentity::run(args, session, writer).await,
		GetCommands::SshKey(args) => sshkey::run(args, session, writer).await,
		GetCommands::User(args) => user::run(args, session, writer).await,
		GetCommands::Organization(args) => organization::run(args, session, writer).await,
		GetCommands::Project(args) => project::run(args, session, writer).await,
		GetCommands::Region(args) => region::run(args, session, writer).await,
	}
}
