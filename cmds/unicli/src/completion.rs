//! Dynamic shell completion of resource names.
//!
//! Completers run inside `COMPLETE=<shell> unicli ...` before the command
//! line is parsed, so connection settings come from the environment only.
//! Any failure yields no candidates.

use std::{ffi::OsStr, future::Future, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use clap_complete::CompletionCandidate;
use unikorn_apis::{
	KubernetesCluster, Organization, Project, Region, Role, UnikornResource, User,
	VirtualKubernetesCluster,
};

use crate::{
	k8s::{list, LabelSet},
	session::{GlobalArgs, Session},
};

/// Completion must stay snappy even when the cluster is not.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
struct EnvOnly {
	#[command(flatten)]
	global: GlobalArgs,
}

fn complete_with<F, Fut>(current: &OsStr, fetch: F) -> Vec<CompletionCandidate>
where
	F: FnOnce(Session) -> Fut,
	Fut: Future<Output = Result<Vec<String>>>,
{
	let Some(prefix) = current.to_str() else {
		return Vec::new();
	};

	match fetch_names(fetch) {
		Ok(names) => candidates(names, prefix),
		Err(e) => {
			tracing::debug!(error = ?e, "completion lookup failed");
			Vec::new()
		}
	}
}

fn fetch_names<F, Fut>(fetch: F) -> Result<Vec<String>>
where
	F: FnOnce(Session) -> Fut,
	Fut: Future<Output = Result<Vec<String>>>,
{
	let global = EnvOnly::try_parse_from(["unicli"])
		.context("reading connection settings from the environment")?
		.global;

	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.context("building completion runtime")?;

	runtime
		.block_on(tokio::time::timeout(COMPLETION_TIMEOUT, async {
			let session = Session::connect(&global).await?;
			fetch(session).await
		}))
		.context("completion lookup timed out")?
}

fn candidates(mut names: Vec<String>, prefix: &str) -> Vec<CompletionCandidate> {
	names.retain(|n| !n.is_empty() && n.starts_with(prefix));
	names.sort();
	names.dedup();
	names.into_iter().map(CompletionCandidate::new).collect()
}

fn display_names<K: UnikornResource>(resources: &[K]) -> Vec<String> {
	resources
		.iter()
		.map(|r| r.display_name().to_string())
		.collect()
}

async fn cluster_wide_names<K>(session: Session) -> Result<Vec<String>>
where
	K: list::NamespacedResource,
{
	let resources: Vec<K> = list::list_cluster_wide(session.client(), &LabelSet::new()).await?;
	Ok(display_names(&resources))
}

async fn organization_names(session: Session) -> Result<Vec<String>> {
	let organizations: Vec<Organization> =
		list::list_in(session.client(), &session.identity_namespace, &LabelSet::new()).await?;
	Ok(display_names(&organizations))
}

async fn region_names(session: Session) -> Result<Vec<String>> {
	let regions: Vec<Region> =
		list::list_in(session.client(), &session.region_namespace, &LabelSet::new()).await?;
	Ok(display_names(&regions))
}

async fn user_subject_names(session: Session) -> Result<Vec<String>> {
	let users: Vec<User> =
		list::list_in(session.client(), &session.identity_namespace, &LabelSet::new()).await?;
	Ok(users.into_iter().map(|u| u.spec.subject).collect())
}

async fn assignable_role_names(session: Session) -> Result<Vec<String>> {
	let roles: Vec<Role> =
		list::list_in(session.client(), &session.identity_namespace, &LabelSet::new()).await?;
	let assignable: Vec<Role> = roles.into_iter().filter(|r| !r.spec.protected).collect();
	Ok(display_names(&assignable))
}

pub fn organizations(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, organization_names)
}

/// Project names across all organizations; `--organization` is not known
/// at completion time.
pub fn projects(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, cluster_wide_names::<Project>)
}

pub fn kubernetes_clusters(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, cluster_wide_names::<KubernetesCluster>)
}

pub fn virtual_kubernetes_clusters(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, cluster_wide_names::<VirtualKubernetesCluster>)
}

pub fn regions(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, region_names)
}

pub fn user_subjects(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, user_subject_names)
}

/// Roles users may be granted; protected roles are hidden.
pub fn roles(current: &OsStr) -> Vec<CompletionCandidate> {
	complete_with(current, assignable_role_names)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn values(candidates: Vec<CompletionCandidate>) -> Vec<String> {
		candidates
			.iter()
			.map(|c| c.get_value().to_string_lossy().into_owned())
			.collect()
	}

	#[test]
	fn test_candidates_filter_sort_and_dedup() {
		let names = vec![
			"web".to_string(),
			"db".to_string(),
			"".to_string(),
			"web-2".to_string(),
			"web".to_string(),
		];
		assert_eq!(values(candidates(names.clone(), "we")), ["web", "web-2"]);
		assert_eq!(values(candidates(names, "")), ["db", "web", "web-2"]);
	}
}
