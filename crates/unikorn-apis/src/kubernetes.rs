//! `unikorn-cloud.org` resources: managed Kubernetes.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Condition;

/// A managed Kubernetes cluster. Lives in its project namespace.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "unikorn-cloud.org",
	version = "v1alpha1",
	kind = "KubernetesCluster",
	namespaced,
	status = "KubernetesClusterStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterSpec {
	#[serde(default)]
	pub region_id: String,
	#[serde(default)]
	pub cluster_manager_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub network: Option<KubernetesClusterNetworkSpec>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub workload_pools: Option<KubernetesClusterWorkloadPoolsSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterNetworkSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub node_network: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pod_network: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_network: Option<String>,
	#[serde(default)]
	pub dns_nameservers: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterWorkloadPoolsSpec {
	#[serde(default)]
	pub pools: Vec<KubernetesClusterWorkloadPoolSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterWorkloadPoolSpec {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flavor_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub replicas: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterStatus {
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

/// A virtual cluster hosted inside a region's shared infrastructure.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "unikorn-cloud.org",
	version = "v1alpha1",
	kind = "VirtualKubernetesCluster",
	namespaced,
	status = "VirtualKubernetesClusterStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualKubernetesClusterSpec {
	#[serde(default)]
	pub region_id: String,
	#[serde(default)]
	pub workload_pools: Vec<VirtualKubernetesClusterWorkloadPoolSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualKubernetesClusterWorkloadPoolSpec {
	pub name: String,
	#[serde(default)]
	pub flavor_id: String,
	#[serde(default)]
	pub replicas: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualKubernetesClusterStatus {
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

/// Hosts the control planes of one or more Kubernetes clusters in a
/// vcluster.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "unikorn-cloud.org",
	version = "v1alpha1",
	kind = "ClusterManager",
	namespaced,
	status = "ClusterManagerStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterManagerSpec {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterManagerStatus {
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

impl KubernetesCluster {
	pub fn workload_pools(&self) -> &[KubernetesClusterWorkloadPoolSpec] {
		self.spec
			.workload_pools
			.as_ref()
			.map_or(&[], |p| p.pools.as_slice())
	}
}
