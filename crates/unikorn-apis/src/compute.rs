//! `compute.unikorn-cloud.org` resources.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Condition;

/// A bare compute instance. Labeled with organization, project and region.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "compute.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "ComputeInstance",
	namespaced,
	status = "ComputeInstanceStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstanceSpec {
	#[serde(default)]
	pub flavor_id: String,
	#[serde(default)]
	pub image_id: String,
	#[serde(default)]
	pub replicas: i32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disk_size: Option<Quantity>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub networking: Option<ComputeInstanceNetworking>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ComputeInstanceNetworking {
	#[serde(rename = "publicIP", default)]
	pub public_ip: bool,
	#[serde(rename = "securityGroupIDs", default)]
	pub security_group_ids: Vec<String>,
	#[serde(rename = "allowedSourceAddresses", default)]
	pub allowed_source_addresses: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ComputeInstanceStatus {
	#[serde(rename = "privateIP", default, skip_serializing_if = "Option::is_none")]
	pub private_ip: Option<String>,
	#[serde(rename = "publicIP", default, skip_serializing_if = "Option::is_none")]
	pub public_ip: Option<String>,
	#[serde(rename = "powerState", default, skip_serializing_if = "Option::is_none")]
	pub power_state: Option<String>,
	#[serde(default)]
	pub conditions: Vec<Condition>,
}
