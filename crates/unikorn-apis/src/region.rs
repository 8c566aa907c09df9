//! `region.unikorn-cloud.org` resources: cloud regions and what the
//! region controller provisions in them.

use k8s_openapi::{apimachinery::pkg::api::resource::Quantity, ByteString};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Condition;

/// A cloud region. Lives in the region namespace.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "region.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Region",
	namespaced,
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct RegionSpec {
	#[serde(default)]
	pub provider: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub openstack: Option<RegionOpenstackSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionOpenstackSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compute: Option<RegionOpenstackComputeSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionOpenstackComputeSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flavors: Option<OpenstackFlavorsSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenstackFlavorsSpec {
	/// Extra information about flavors the cloud itself can't describe.
	#[serde(default)]
	pub metadata: Vec<FlavorMetadata>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlavorMetadata {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cpu: Option<CpuSpec>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memory: Option<Quantity>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gpu: Option<GpuSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpec {
	#[serde(default)]
	pub vendor: String,
	#[serde(default)]
	pub model: String,
	#[serde(default)]
	pub physical_count: i64,
}

/// Cloud credentials and project created on behalf of a Kubernetes
/// cluster. Lives in the region namespace.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "region.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "OpenstackIdentity",
	namespaced,
	status = "OpenstackIdentityStatus",
	schema = "disabled"
)]
pub struct OpenstackIdentitySpec {
	#[serde(rename = "projectID", default, skip_serializing_if = "Option::is_none")]
	pub project_id: Option<String>,
	#[serde(rename = "sshPrivateKey", default, skip_serializing_if = "Option::is_none")]
	pub ssh_private_key: Option<ByteString>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenstackIdentityStatus {
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

/// A provider network, labeled with its region.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "region.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Network",
	namespaced,
	status = "NetworkStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
	#[serde(default)]
	pub provider: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prefix: Option<String>,
	#[serde(default)]
	pub dns_nameservers: Vec<String>,
	#[serde(default)]
	pub routes: Vec<Route>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	pub prefix: String,
	pub next_hop: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub openstack: Option<NetworkStatusOpenstack>,
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NetworkStatusOpenstack {
	#[serde(rename = "networkID", default, skip_serializing_if = "Option::is_none")]
	pub network_id: Option<String>,
	#[serde(rename = "subnetID", default, skip_serializing_if = "Option::is_none")]
	pub subnet_id: Option<String>,
	#[serde(rename = "vlanID", default, skip_serializing_if = "Option::is_none")]
	pub vlan_id: Option<i64>,
}

impl Region {
	/// Flavor metadata published by the region, if any.
	pub fn flavor_metadata(&self) -> &[FlavorMetadata] {
		self.spec
			.openstack
			.as_ref()
			.and_then(|o| o.compute.as_ref())
			.and_then(|c| c.flavors.as_ref())
			.map_or(&[], |f| f.metadata.as_slice())
	}
}

impl FlavorMetadata {
	/// Human readable summary, e.g. `8 CPUs, 32Gi, 1x NVIDIA H100`.
	///
	/// Falls back to the flavor ID when nothing is known about it.
	pub fn description(&self) -> String {
		let mut parts = Vec::new();
		if let Some(count) = self.cpu.as_ref().and_then(|c| c.count) {
			parts.push(format!("{count} CPUs"));
		}
		if let Some(memory) = &self.memory {
			parts.push(memory.0.clone());
		}
		if let Some(gpu) = &self.gpu {
			parts.push(format!("{}x {} {}", gpu.physical_count, gpu.vendor, gpu.model));
		}
		if parts.is_empty() {
			return self.id.clone();
		}
		parts.join(", ")
	}
}
