//! ID to display name lookups.
//!
//! Resources reference each other by ID (object name); users know them by
//! the name label. Maps are built once per invocation and thrown away.

use std::collections::HashMap;

use kube::{Client, ResourceExt};
use unikorn_apis::{KubernetesCluster, Organization, Project, Region, UnikornResource};

use super::{list, LabelSet, ListError};

/// Maps resource IDs to display names.
#[derive(Debug, Clone, Default)]
pub struct NameMap(HashMap<String, String>);

impl NameMap {
	/// Index resources by object name. The first resource with a given ID wins.
	pub fn from_resources<'a, K>(resources: impl IntoIterator<Item = &'a K>) -> Self
	where
		K: UnikornResource + 'a,
	{
		let mut map = Self::default();
		for resource in resources {
			map.insert_first(resource.name_any(), resource.display_name().to_string());
		}
		map
	}

	/// Flavor ID to description, from every region's flavor metadata.
	pub fn flavors<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Self {
		let mut map = Self::default();
		for metadata in regions.into_iter().flat_map(Region::flavor_metadata) {
			map.insert_first(metadata.id.clone(), metadata.description());
		}
		map
	}

	fn insert_first(&mut self, id: String, name: String) {
		self.0.entry(id).or_insert(name);
	}

	/// Display name for `id`, or the ID itself when it has no name.
	pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
		match self.0.get(id) {
			Some(name) if !name.is_empty() => name,
			_ => id,
		}
	}

	/// ID of the resource with display name `name`.
	///
	/// Ambiguous names resolve to the lexically smallest ID so the result
	/// does not depend on listing order.
	pub fn id_of(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.filter(|(_, n)| n.as_str() == name)
			.map(|(id, _)| id.as_str())
			.min()
	}

	pub fn contains_id(&self, id: &str) -> bool {
		self.0.contains_key(id)
	}
}

impl<I: Into<String>, N: Into<String>> FromIterator<(I, N)> for NameMap {
	fn from_iter<T: IntoIterator<Item = (I, N)>>(entries: T) -> Self {
		let mut map = Self::default();
		for (id, name) in entries {
			map.insert_first(id.into(), name.into());
		}
		map
	}
}

/// Organizations live in the identity namespace.
pub async fn organizations(
	client: &Client,
	identity_namespace: &str,
) -> Result<NameMap, ListError> {
	let organizations: Vec<Organization> =
		list::list_in(client, identity_namespace, &LabelSet::new()).await?;
	Ok(NameMap::from_resources(&organizations))
}

/// Projects live in their organization's namespace.
pub async fn projects(client: &Client) -> Result<NameMap, ListError> {
	let projects: Vec<Project> = list::list_cluster_wide(client, &LabelSet::new()).await?;
	Ok(NameMap::from_resources(&projects))
}

/// Regions live in the region namespace.
pub async fn regions(client: &Client, region_namespace: &str) -> Result<NameMap, ListError> {
	let regions: Vec<Region> = list::list_in(client, region_namespace, &LabelSet::new()).await?;
	Ok(NameMap::from_resources(&regions))
}

/// Kubernetes clusters matching `labels`, from every namespace.
pub async fn kubernetes_clusters(client: &Client, labels: &LabelSet) -> Result<NameMap, ListError> {
	let clusters: Vec<KubernetesCluster> = list::list_all_namespaces(client, labels).await?;
	Ok(NameMap::from_resources(&clusters))
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use unikorn_apis::NAME_LABEL;

	use super::*;

	fn project(id: &str, name: Option<&str>) -> Project {
		let mut labels = serde_json::Map::new();
		if let Some(name) = name {
			labels.insert(NAME_LABEL.to_string(), json!(name));
		}
		serde_json::from_value(json!({
			"apiVersion": "identity.unikorn-cloud.org/v1alpha1",
			"kind": "Project",
			"metadata": {"name": id, "namespace": "org-1", "labels": labels},
			"spec": {},
		}))
		.unwrap()
	}

	#[test]
	fn test_resolve_falls_back_to_id() {
		let projects = [project("p1", Some("web")), project("p2", None)];
		let names = NameMap::from_resources(&projects);

		assert_eq!(names.resolve("p1"), "web");
		assert_eq!(names.resolve("p2"), "p2");
		assert_eq!(names.resolve("p3"), "p3");
		assert!(names.contains_id("p2"));
	}

	#[test]
	fn test_id_of() {
		let projects = [
			project("p2", Some("web")),
			project("p1", Some("web")),
			project("p3", Some("db")),
		];
		let names = NameMap::from_resources(&projects);

		assert_eq!(names.id_of("web"), Some("p1"));
		assert_eq!(names.id_of("db"), Some("p3"));
		assert_eq!(names.id_of("cache"), None);
	}

	#[test]
	fn test_flavors_first_region_wins() {
		let region = |id: &str, cpus: i64| -> Region {
			serde_json::from_value(json!({
				"apiVersion": "region.unikorn-cloud.org/v1alpha1",
				"kind": "Region",
				"metadata": {"name": id},
				"spec": {
					"provider": "openstack",
					"openstack": {"compute": {"flavors": {"metadata": [
						{"id": "f1", "cpu": {"count": cpus}},
						{"id": format!("only-{id}")},
					]}}},
				},
			}))
			.unwrap()
		};
		let regions = [region("r1", 4), region("r2", 8)];
		let flavors = NameMap::flavors(&regions);

		assert_eq!(flavors.resolve("f1"), "4 CPUs");
		assert_eq!(flavors.resolve("only-r2"), "only-r2");
		assert!(flavors.contains_id("only-r1"));
	}
}
