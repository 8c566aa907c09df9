//! `connect`: open a session to a cluster manager's virtual cluster.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::Session;

pub mod clustermanager;

#[derive(Args, Debug)]
pub struct ConnectArgs {
	#[command(subcommand)]
	pub command: ConnectCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConnectCommands {
	/// Connect to a Kubernetes cluster manager
	#[command(name = "clustermanager", visible_aliases = ["cm"])]
	ClusterManager(clustermanager::ClusterManagerArgs),
}

pub async fn run<W: Write>(args: ConnectArgs, session: &Session, writer: W) -> Result<()> {
	match args.command {
		ConnectCommands::ClusterManager(args) => clustermanager::run(args, session, writer).await,
	}
}
