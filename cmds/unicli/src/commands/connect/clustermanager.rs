use std::{
	io::Write,
	process::{Command, Stdio},
};

use anyhow::{Context, Result};
use clap::Args;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use thiserror::Error;
use tracing::{info, instrument};
use unikorn_apis::{ClusterManager, UnikornResource};

use crate::{
	k8s::{list, LabelSet},
	session::Session,
};

const VCLUSTER_POD_PREFIX: &str = "vcluster";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
	#[error("cluster manager {0} not found in any namespace")]
	ManagerNotFound(String),

	#[error("no vcluster pod found in namespace {0}")]
	NoVclusterPod(String),
}

#[derive(Args, Debug)]
pub struct ClusterManagerArgs {
	/// Cluster manager ID or name
	pub identifier: String,

	/// vcluster executable used to connect
	#[arg(long, env = "UNICLI_VCLUSTER_BINARY", default_value = "vcluster")]
	pub vcluster_binary: String,
}

/// The vcluster a pod belongs to: `pod/vcluster-abc-0` is `vcluster-abc`.
pub fn vcluster_name(pod: &str) -> &str {
	let name = pod.strip_prefix("pod/").unwrap_or(pod);
	name.strip_suffix("-0").unwrap_or(name)
}

/// First vcluster pod by name, so the choice is stable.
fn vcluster_pod(pods: &[Pod]) -> Option<String> {
	pods.iter()
		.map(ResourceExt::name_any)
		.filter(|name| name.starts_with(VCLUSTER_POD_PREFIX))
		.min()
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(
	args: ClusterManagerArgs,
	session: &Session,
	mut writer: W,
) -> Result<()> {
	let client = session.client();

	let found = list::find_in_any_namespace::<ClusterManager>(client, &args.identifier).await?;
	let manager = match found {
		Some(manager) => manager,
		None => list::list_all_namespaces::<ClusterManager>(client, &LabelSet::new())
			.await
			.context("failed to list cluster managers")?
			.into_iter()
			.find(|m| m.is_identified_by(&args.identifier))
			.ok_or_else(|| ConnectError::ManagerNotFound(args.identifier.clone()))?,
	};
	let namespace = manager.namespace().unwrap_or_default();

	let pods: Vec<Pod> = list::list_in(client, &namespace, &LabelSet::new())
		.await
		.context("failed to list pods")?;
	let pod = vcluster_pod(&pods).ok_or_else(|| ConnectError::NoVclusterPod(namespace.clone()))?;
	let vcluster = vcluster_name(&pod);

	let mut command = Command::new(&args.vcluster_binary);
	command
		.args(["connect", vcluster, "-n", &namespace])
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null());

	writeln!(writer, "{} connect {vcluster} -n {namespace}", args.vcluster_binary)?;
	info!(vcluster, namespace = %namespace, "starting vcluster connect");
	// Not waited on: the connection outlives this process.
	command
		.spawn()
		.with_context(|| format!("failed to start {}", args.vcluster_binary))?;

	writeln!(
		writer,
		"Connecting to cluster manager {} in namespace {namespace}, please wait...",
		manager.name_any()
	)?;
	Ok(())
}
