//! Command line definition and dispatch.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;

use crate::{
	commands,
	session::{GlobalArgs, Session},
};

#[derive(Parser, Debug)]
#[command(name = "unicli")]
#[command(about = "Inspect, create and connect to Unikorn cloud resources", long_about = None)]
#[command(version = env!("UNICLI_VERSION"))]
pub struct Cli {
	#[command(flatten)]
	pub global: GlobalArgs,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	#[command(flatten)]
	Cluster(ClusterCommands),

	/// Print a shell completion script
	Completion(commands::completion::CompletionArgs),
}

/// Commands that talk to the control plane.
#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
	/// List resources
	Get(commands::get::GetArgs),

	/// Show a single resource in detail
	Describe(commands::describe::DescribeArgs),

	/// Create identity resources
	Create(commands::create::CreateArgs),

	/// Connect to a resource
	Connect(commands::connect::ConnectArgs),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("timed out after {0} s")]
pub struct TimedOut(pub u64);

/// Run a parsed command line.
pub async fn run<W: Write>(cli: Cli, writer: W) -> Result<()> {
	match cli.command {
		Commands::Completion(args) => {
			commands::completion::run(args, &mut Cli::command(), writer);
			Ok(())
		}
		Commands::Cluster(command) => {
			// Connecting counts against the deadline too.
			let deadline = Duration::from_secs(cli.global.timeout);
			tokio::time::timeout(deadline, dispatch(command, &cli.global, writer))
				.await
				.map_err(|_| TimedOut(cli.global.timeout))?
		}
	}
}

async fn dispatch<W: Write>(
	command: ClusterCommands,
	global: &GlobalArgs,
	writer: W,
) -> Result<()> {
	let session = Session::connect(global)
		.await
		.context("failed to connect to the cluster")?;

	match command {
		ClusterCommands::Get(args) => commands::get::run(args, &session, writer).await,
		ClusterCommands::Describe(args) => commands::describe::run(args, &session, writer).await,
		ClusterCommands::Create(args) => commands::create::run(args, &session, writer).await,
		ClusterCommands::Connect(args) => commands::connect::run(args, &session, writer).await,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_aliases_and_global_flags() {
		let cli = Cli::try_parse_from([
			"unicli",
			"get",
			"kc",
			"--organization",
			"acme",
			"--timeout",
			"5",
			"-o",
			"yaml",
		])
		.unwrap();
		assert_eq!(cli.global.timeout, 5);
		assert!(matches!(
			cli.command,
			Commands::Cluster(ClusterCommands::Get(commands::get::GetArgs {
				command: commands::get::GetCommands::KubernetesCluster(_),
			}))
		));
	}

	#[test]
	fn test_describe_requires_an_identifier() {
		assert!(Cli::try_parse_from(["unicli", "describe", "net"]).is_err());
	}

	#[test]
	fn test_timed_out_message() {
		assert_eq!(TimedOut(60).to_string(), "timed out after 60 s");
	}
}
