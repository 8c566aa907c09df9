//! Organization, project and region scoping.
//!
//! Flags name resources by their name label. They are resolved up front so a
//! typo fails the command before anything is listed.

use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::{Client, ResourceExt};
use thiserror::Error;
use tracing::instrument;
use unikorn_apis::{
	KubernetesCluster, Organization, Project, Region, User, NAME_LABEL, ORGANIZATION_LABEL,
	PROJECT_LABEL,
};

use crate::{
	completion,
	k8s::{list, LabelSet, ListError},
	session::Session,
};

#[derive(Debug, Error)]
pub enum ScopeError {
	#[error("unable to find organization with name {0}")]
	OrganizationNotFound(String),

	#[error("unable to find organization namespace")]
	OrganizationNamespace,

	#[error("unable to find project with name {0}")]
	ProjectNotFound(String),

	#[error("unable to find project namespace")]
	ProjectNamespace,

	#[error("unable to find region with name {0}")]
	RegionNotFound(String),

	#[error("unable to find kubernetes cluster with name {0}")]
	KubernetesClusterNotFound(String),

	#[error("unable to find user with email {0}")]
	UserNotFound(String),

	#[error(transparent)]
	List(#[from] ListError),
}

#[derive(Args, Debug, Clone, Default)]
pub struct OrganizationFlag {
	/// Organization name
	#[arg(long, add = ArgValueCompleter::new(completion::organizations))]
	pub organization: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectFlag {
	/// Project name
	#[arg(long, add = ArgValueCompleter::new(completion::projects))]
	pub project: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RegionFlag {
	/// Region name
	#[arg(long, add = ArgValueCompleter::new(completion::regions))]
	pub region: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EmailFlag {
	/// User email address
	#[arg(long, add = ArgValueCompleter::new(completion::user_subjects))]
	pub email: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct KubernetesClusterFlag {
	/// Kubernetes cluster name
	#[arg(long, add = ArgValueCompleter::new(completion::kubernetes_clusters))]
	pub kubernetescluster: Option<String>,
}

/// Resolved scoping flags.
#[derive(Debug, Clone, Default)]
pub struct Scope {
	pub organization: Option<Organization>,
	pub project: Option<Project>,
	pub region: Option<Region>,
}

impl Scope {
	/// Resolve whichever of the flags were given. The project is looked up
	/// within the organization when both are set.
	#[instrument(skip_all)]
	pub async fn resolve(
		session: &Session,
		organization: Option<&str>,
		project: Option<&str>,
		region: Option<&str>,
	) -> Result<Self, ScopeError> {
		let client = session.client();

		let organization = match organization {
			Some(name) => {
				Some(resolve_organization(client, &session.identity_namespace, name).await?)
			}
			None => None,
		};
		let project = match project {
			Some(name) => Some(resolve_project(client, organization.as_ref(), name).await?),
			None => None,
		};
		let region = match region {
			Some(name) => Some(resolve_region(client, &session.region_namespace, name).await?),
			None => None,
		};

		Ok(Self {
			organization,
			project,
			region,
		})
	}

	/// Selector matching resources owned by the resolved organization and project.
	pub fn labels(&self) -> LabelSet {
		let mut labels = LabelSet::new();
		if let Some(organization) = &self.organization {
			labels.insert(ORGANIZATION_LABEL, organization.name_any());
		}
		if let Some(project) = &self.project {
			labels.insert(PROJECT_LABEL, project.name_any());
		}
		labels
	}

	pub fn organization_id(&self) -> Option<String> {
		self.organization.as_ref().map(ResourceExt::name_any)
	}

	pub fn region_id(&self) -> Option<String> {
		self.region.as_ref().map(ResourceExt::name_any)
	}

	/// Namespace provisioned for the resolved organization.
	pub fn organization_namespace(&self) -> Option<&str> {
		self.organization
			.as_ref()
			.and_then(|o| o.status.as_ref())
			.and_then(|s| s.namespace.as_deref())
	}
}

fn name_selector(name: &str) -> LabelSet {
	LabelSet::new().with(NAME_LABEL, name)
}

fn only<T>(mut items: Vec<T>) -> Option<T> {
	if items.len() == 1 {
		items.pop()
	} else {
		None
	}
}

/// The single organization named `name`, which must have a namespace.
#[instrument(skip(client))]
pub async fn resolve_organization(
	client: &Client,
	identity_namespace: &str,
	name: &str,
) -> Result<Organization, ScopeError> {
	let organizations: Vec<Organization> =
		list::list_in(client, identity_namespace, &name_selector(name)).await?;
	let organization =
		only(organizations).ok_or_else(|| ScopeError::OrganizationNotFound(name.to_string()))?;

	let has_namespace = organization
		.status
		.as_ref()
		.and_then(|s| s.namespace.as_deref())
		.is_some_and(|ns| !ns.is_empty());
	if !has_namespace {
		return Err(ScopeError::OrganizationNamespace);
	}
	Ok(organization)
}

/// The single project named `name`, within `organization` when given.
#[instrument(skip(client, organization))]
pub async fn resolve_project(
	client: &Client,
	organization: Option<&Organization>,
	name: &str,
) -> Result<Project, ScopeError> {
	let mut selector = name_selector(name);
	if let Some(organization) = organization {
		selector.insert(ORGANIZATION_LABEL, organization.name_any());
	}

	let projects: Vec<Project> = list::list_cluster_wide(client, &selector).await?;
	let project = only(projects).ok_or_else(|| ScopeError::ProjectNotFound(name.to_string()))?;

	let has_namespace = project
		.status
		.as_ref()
		.and_then(|s| s.namespace.as_deref())
		.is_some_and(|ns| !ns.is_empty());
	if !has_namespace {
		return Err(ScopeError::ProjectNamespace);
	}
	Ok(project)
}

#[instrument(skip(client))]
pub async fn resolve_region(
	client: &Client,
	region_namespace: &str,
	name: &str,
) -> Result<Region, ScopeError> {
	let regions: Vec<Region> = list::list_in(client, region_namespace, &name_selector(name)).await?;
	only(regions).ok_or_else(|| ScopeError::RegionNotFound(name.to_string()))
}

/// The single Kubernetes cluster named `name` that also matches `scope`.
#[instrument(skip(client, scope))]
pub async fn resolve_kubernetes_cluster(
	client: &Client,
	scope: &LabelSet,
	name: &str,
) -> Result<KubernetesCluster, ScopeError> {
	let selector = scope.clone().with(NAME_LABEL, name);
	let clusters: Vec<KubernetesCluster> = list::list_cluster_wide(client, &selector).await?;
	only(clusters).ok_or_else(|| ScopeError::KubernetesClusterNotFound(name.to_string()))
}

/// The user whose subject is `email`.
#[instrument(skip(client))]
pub async fn resolve_user(
	client: &Client,
	identity_namespace: &str,
	email: &str,
) -> Result<User, ScopeError> {
	let users: Vec<User> = list::list_in(client, identity_namespace, &LabelSet::new()).await?;
	users
		.into_iter()
		.find(|u| u.spec.subject == email)
		.ok_or_else(|| ScopeError::UserNotFound(email.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_only() {
		assert_eq!(only(vec![1]), Some(1));
		assert_eq!(only::<i32>(vec![]), None);
		assert_eq!(only(vec![1, 2]), None);
	}

	#[test]
	fn test_empty_scope_has_no_labels() {
		assert!(Scope::default().labels().is_empty());
		assert_eq!(Scope::default().region_id(), None);
	}
}
