use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use thiserror::Error;
use tracing::instrument;
use unikorn_apis::OpenstackIdentity;

use super::openstackidentity::cluster_id;
use crate::{
	completion,
	k8s::{list, names, LabelSet, NameMap},
	session::Session,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SshKeyError {
	#[error("cluster '{0}' not found. Please provide a valid cluster name or ID")]
	ClusterNotFound(String),

	#[error("no OpenStack identity found for cluster {0}")]
	NoIdentity(String),

	#[error("OpenStack identity {0} has no SSH private key")]
	NoKey(String),
}

#[derive(Args, Debug)]
pub struct SshKeyArgs {
	/// Kubernetes cluster name or ID
	#[arg(add = ArgValueCompleter::new(completion::kubernetes_clusters))]
	pub cluster: String,
}

/// Cluster names take precedence over IDs.
pub fn resolve_cluster_id<'a>(
	clusters: &'a NameMap,
	identifier: &'a str,
) -> Result<&'a str, SshKeyError> {
	if let Some(id) = clusters.id_of(identifier) {
		return Ok(id);
	}
	if clusters.contains_id(identifier) {
		return Ok(identifier);
	}
	Err(SshKeyError::ClusterNotFound(identifier.to_string()))
}

#[instrument(skip_all, fields(cluster = %args.cluster))]
pub async fn run<W: Write>(args: SshKeyArgs, session: &Session, mut writer: W) -> Result<()> {
	let client = session.client();

	let clusters = names::kubernetes_clusters(client, &LabelSet::new())
		.await
		.context("failed to get cluster names")?;
	let cluster = resolve_cluster_id(&clusters, &args.cluster)?;

	let identities: Vec<OpenstackIdentity> =
		list::list_in(client, &session.region_namespace, &LabelSet::new())
			.await
			.context("failed to list OpenStack identities")?;
	let identity = identities
		.iter()
		.find(|i| cluster_id(i) == cluster)
		.ok_or_else(|| SshKeyError::NoIdentity(cluster.to_string()))?;

	let key = identity
		.spec
		.ssh_private_key
		.as_ref()
		.filter(|k| !k.0.is_empty())
		.ok_or_else(|| SshKeyError::NoKey(identity.name_any()))?;

	writer.write_all(&key.0)?;
	if !key.0.ends_with(b"\n") {
		writeln!(writer)?;
	}
	Ok(())
}
