//! Resource types known to the mock server.

use std::collections::HashMap;

use k8s_openapi::api::core::v1::Pod;
use kube::Resource;
use unikorn_apis::{
	ClusterManager, ComputeInstance, Group, KubernetesCluster, Network, OpenstackIdentity,
	Organization, OrganizationUser, Project, Region, Role, User, VirtualKubernetesCluster,
};

/// Maps `apiVersion` + `kind` to the plural resource name used in paths.
pub struct MockDiscovery {
	pub core_resources: Vec<MockApiResource>,
	/// Keyed by group version, e.g. `identity.unikorn-cloud.org/v1alpha1`.
	pub group_resources: HashMap<String, Vec<MockApiResource>>,
}

impl Default for MockDiscovery {
	fn default() -> Self {
		let mut discovery = Self {
			core_resources: vec![
				MockApiResource::of::<Pod>(),
				MockApiResource::cluster_scoped("namespaces", "Namespace"),
			],
			group_resources: HashMap::new(),
		};

		discovery.register::<Organization>();
		discovery.register::<Project>();
		discovery.register::<User>();
		discovery.register::<OrganizationUser>();
		discovery.register::<Group>();
		discovery.register::<Role>();
		discovery.register::<Region>();
		discovery.register::<OpenstackIdentity>();
		discovery.register::<Network>();
		discovery.register::<KubernetesCluster>();
		discovery.register::<VirtualKubernetesCluster>();
		discovery.register::<ClusterManager>();
		discovery.register::<ComputeInstance>();

		discovery
	}
}

impl MockDiscovery {
	/// Register a namespaced group resource.
	pub fn register<K: Resource<DynamicType = ()>>(&mut self) {
		self.group_resources
			.entry(K::api_version(&()).into_owned())
			.or_default()
			.push(MockApiResource::of::<K>());
	}

	/// Find a resource by `apiVersion` and `kind`.
	pub fn find(&self, api_version: &str, kind: &str) -> Option<&MockApiResource> {
		if api_version.contains('/') {
			self.group_resources
				.get(api_version)?
				.iter()
				.find(|r| r.kind == kind)
		} else {
			self.core_resources.iter().find(|r| r.kind == kind)
		}
	}
}

/// A mock API resource definition.
pub struct MockApiResource {
	pub name: String,
	pub kind: String,
	pub namespaced: bool,
}

impl MockApiResource {
	pub fn namespaced(name: &str, kind: &str) -> Self {
		Self {
			name: name.to_string(),
			kind: kind.to_string(),
			namespaced: true,
		}
	}

	pub fn cluster_scoped(name: &str, kind: &str) -> Self {
		Self {
			name: name.to_string(),
			kind: kind.to_string(),
			namespaced: false,
		}
	}

	/// Describe a namespaced resource from its typed definition.
	pub fn of<K: Resource<DynamicType = ()>>() -> Self {
		Self::namespaced(&K::plural(&()), &K::kind(&()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unikorn_kinds_are_registered() {
		let discovery = MockDiscovery::default();
		let clusters = discovery
			.find("unikorn-cloud.org/v1alpha1", "KubernetesCluster")
			.unwrap();
		assert_eq!(clusters.name, "kubernetesclusters");
		assert!(clusters.namespaced);

		let identities = discovery
			.find("region.unikorn-cloud.org/v1alpha1", "OpenstackIdentity")
			.unwrap();
		assert_eq!(identities.name, "openstackidentities");
	}

	#[test]
	fn test_core_kinds_are_registered() {
		let discovery = MockDiscovery::default();
		assert!(!discovery.find("v1", "Namespace").unwrap().namespaced);
		assert_eq!(discovery.find("v1", "Pod").unwrap().name, "pods");
		assert!(discovery.find("v1", "Secret").is_none());
	}
}
