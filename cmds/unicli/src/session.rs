//! Global flags and the per-invocation session built from them.

use std::path::PathBuf;

use clap::Args;
use kube::Client;

use crate::{
	k8s::{ClusterConnection, ConnectionError, ConnectionOptions},
	output::ColorMode,
};

pub const DEFAULT_IDENTITY_NAMESPACE: &str = "unikorn-identity";
pub const DEFAULT_REGION_NAMESPACE: &str = "unikorn-region";

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
	/// Path to the kubeconfig file
	#[arg(long, global = true, env = "UNICLI_KUBECONFIG")]
	pub kubeconfig: Option<PathBuf>,

	/// Kubeconfig context to use
	#[arg(long, global = true, env = "UNICLI_CONTEXT")]
	pub context: Option<String>,

	/// Namespace the identity service runs in
	#[arg(
		long,
		global = true,
		env = "UNICLI_IDENTITY_NAMESPACE",
		default_value = DEFAULT_IDENTITY_NAMESPACE
	)]
	pub identity_namespace: String,

	/// Namespace the region service runs in
	#[arg(
		long,
		global = true,
		env = "UNICLI_REGION_NAMESPACE",
		default_value = DEFAULT_REGION_NAMESPACE
	)]
	pub region_namespace: String,

	/// Deadline for the whole command, in seconds
	#[arg(long, global = true, env = "UNICLI_TIMEOUT", default_value_t = 60)]
	pub timeout: u64,

	/// When to use colors
	#[arg(long, global = true, value_enum, default_value_t)]
	pub color: ColorMode,

	/// Log level; overrides RUST_LOG
	#[arg(long, global = true)]
	pub log_level: Option<tracing::Level>,
}

impl GlobalArgs {
	pub fn connection_options(&self) -> ConnectionOptions {
		ConnectionOptions::builder()
			.maybe_kubeconfig(self.kubeconfig.clone())
			.maybe_context(self.context.clone())
			.build()
	}
}

/// Everything a command needs to talk to the control plane.
#[derive(Debug, Clone)]
pub struct Session {
	pub connection: ClusterConnection,
	pub identity_namespace: String,
	pub region_namespace: String,
	pub color: bool,
}

impl Session {
	pub async fn connect(global: &GlobalArgs) -> Result<Self, ConnectionError> {
		let connection = ClusterConnection::connect(&global.connection_options()).await?;
		Ok(Self::new(connection, global))
	}

	pub fn new(connection: ClusterConnection, global: &GlobalArgs) -> Self {
		Self {
			connection,
			identity_namespace: global.identity_namespace.clone(),
			region_namespace: global.region_namespace.clone(),
			color: global.color.should_colorize(),
		}
	}

	pub fn client(&self) -> &Client {
		self.connection.client()
	}
}
