//! Listing resources across namespaces.
//!
//! Unikorn spreads resources over one namespace per organization and
//! project, so most reads list namespaces first and then query each one.

use std::fmt::Debug;

use k8s_openapi::{api::core::v1::Namespace, NamespaceResourceScope};
use kube::{
	api::{Api, ListParams},
	Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use super::LabelSet;

#[derive(Debug, Error)]
pub enum ListError {
	#[error("failed to list namespaces")]
	Namespaces(#[source] kube::Error),

	#[error("failed to list {kind} in namespace {namespace}")]
	InNamespace {
		kind: String,
		namespace: String,
		#[source]
		source: kube::Error,
	},

	#[error("failed to list {kind}")]
	ClusterWide {
		kind: String,
		#[source]
		source: kube::Error,
	},

	#[error("failed to get {kind} {name}")]
	Get {
		kind: String,
		name: String,
		#[source]
		source: kube::Error,
	},
}

/// A namespaced resource with a static type, i.e. every Unikorn kind.
pub trait NamespacedResource:
	Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + DeserializeOwned + Debug
{
}

impl<K> NamespacedResource for K where
	K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
		+ Clone
		+ DeserializeOwned
		+ Debug
{
}

fn kind<K: NamespacedResource>() -> String {
	K::plural(&()).into_owned()
}

/// Names of all namespaces.
#[instrument(skip_all)]
pub async fn namespaces(client: &Client) -> Result<Vec<String>, ListError> {
	let namespaces = Api::<Namespace>::all(client.clone())
		.list(&ListParams::default())
		.await
		.map_err(ListError::Namespaces)?;
	Ok(namespaces.items.iter().map(ResourceExt::name_any).collect())
}

/// List resources in a single namespace.
#[instrument(
	skip_all,
	fields(kind = %kind::<K>(), namespace = namespace, selector = %labels.selector())
)]
pub async fn list_in<K: NamespacedResource>(
	client: &Client,
	namespace: &str,
	labels: &LabelSet,
) -> Result<Vec<K>, ListError> {
	let list = Api::<K>::namespaced(client.clone(), namespace)
		.list(&labels.list_params())
		.await
		.map_err(|source| ListError::InNamespace {
			kind: kind::<K>(),
			namespace: namespace.to_string(),
			source,
		})?;
	tracing::debug!(count = list.items.len(), "listed");
	Ok(list.items)
}

/// List resources in every namespace, one request per namespace.
#[instrument(skip_all, fields(kind = %kind::<K>()))]
pub async fn list_all_namespaces<K: NamespacedResource>(
	client: &Client,
	labels: &LabelSet,
) -> Result<Vec<K>, ListError> {
	let mut items = Vec::new();
	for namespace in namespaces(client).await? {
		items.extend(list_in::<K>(client, &namespace, labels).await?);
	}
	Ok(items)
}

/// List resources in all namespaces with a single request.
#[instrument(skip_all, fields(kind = %kind::<K>(), selector = %labels.selector()))]
pub async fn list_cluster_wide<K: NamespacedResource>(
	client: &Client,
	labels: &LabelSet,
) -> Result<Vec<K>, ListError> {
	let list = Api::<K>::all(client.clone())
		.list(&labels.list_params())
		.await
		.map_err(|source| ListError::ClusterWide {
			kind: kind::<K>(),
			source,
		})?;
	Ok(list.items)
}

/// Get a resource by object name from a known namespace.
pub async fn get_in<K: NamespacedResource>(
	client: &Client,
	namespace: &str,
	name: &str,
) -> Result<Option<K>, ListError> {
	Api::<K>::namespaced(client.clone(), namespace)
		.get_opt(name)
		.await
		.map_err(|source| ListError::Get {
			kind: kind::<K>(),
			name: name.to_string(),
			source,
		})
}

/// Find a resource by object name, searching every namespace in turn.
#[instrument(skip_all, fields(kind = %kind::<K>(), name = name))]
pub async fn find_in_any_namespace<K: NamespacedResource>(
	client: &Client,
	name: &str,
) -> Result<Option<K>, ListError> {
	for namespace in namespaces(client).await? {
		if let Some(resource) = get_in::<K>(client, &namespace, name).await? {
			return Ok(Some(resource));
		}
	}
	Ok(None)
}
