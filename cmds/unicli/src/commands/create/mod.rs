//! `create`: add identity resources.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kube::{
	api::{Api, PostParams},
	Client, ResourceExt,
};
use tracing::debug;

use crate::{k8s::NamespacedResource, session::Session};

pub mod group;
pub mod organization;
pub mod user;

#[derive(Args, Debug)]
pub struct CreateArgs {
	#[command(subcommand)]
	pub command: CreateCommands,
}

#[derive(Subcommand, Debug)]
pub enum CreateCommands {
	/// Create an organization and wait for its namespace
	#[command(name = "organization", visible_aliases = ["org"])]
	Organization(organization::OrganizationArgs),

	/// Create a user, optionally adding it to an organization
	#[command(name = "user")]
	User(user::UserArgs),

	/// Create a group in an organization
	#[command(name = "group")]
	Group(group::GroupArgs),
}

pub async fn run<W: Write>(args: CreateArgs, session: &Session, writer: W) -> Result<()> {
	match args.command {
		CreateCommands::Organization(args) => organization::run(args, session, writer).await,
		CreateCommands::User(args) => user::run(args, session, writer).await,
		CreateCommands::Group(args) => group::run(args, session, writer).await,
	}
}

/// A fresh resource ID.
pub fn new_id() -> String {
	uuid::Uuid::new_v4().to_string()
}

/// Create `resource` in `namespace`, returning what the server stored.
pub async fn create_in<K: NamespacedResource + serde::Serialize>(
	client: &Client,
	namespace: &str,
	resource: &K,
) -> Result<K> {
	let kind = K::kind(&());
	let name = resource.name_any();
	debug!(%kind, %name, namespace, "creating");

	Api::<K>::namespaced(client.clone(), namespace)
		.create(&PostParams::default(), resource)
		.await
		.with_context(|| format!("failed to create {kind} {name}"))
}
