//! Typed Unikorn custom resources.
//!
//! Every resource is namespaced and served at `v1alpha1`. Resource IDs are
//! object names; human readable names live in [`NAME_LABEL`].

use kube::ResourceExt;
use serde::{Deserialize, Serialize};

pub mod compute;
pub mod identity;
pub mod kubernetes;
pub mod region;

pub use compute::ComputeInstance;
pub use identity::{Group, Organization, OrganizationUser, Project, Role, User};
pub use kubernetes::{ClusterManager, KubernetesCluster, VirtualKubernetesCluster};
pub use region::{Network, OpenstackIdentity, Region};

/// Human readable resource name.
pub const NAME_LABEL: &str = "unikorn-cloud.org/name";
/// ID of the organization a resource belongs to.
pub const ORGANIZATION_LABEL: &str = "unikorn-cloud.org/organization";
/// ID of the project a resource belongs to.
pub const PROJECT_LABEL: &str = "unikorn-cloud.org/project";
/// ID of the user an organization membership refers to.
pub const USER_LABEL: &str = "unikorn-cloud.org/user";
/// ID of the region a region-scoped resource lives in.
pub const REGION_LABEL: &str = "regions.unikorn-cloud.org/region-id";
/// Free-form description.
pub const DESCRIPTION_ANNOTATION: &str = "unikorn-cloud.org/description";
/// Placeholder name for resources that are not addressed by name.
pub const UNDEFINED_NAME: &str = "undefined";

/// Condition reason of a fully provisioned resource.
pub const REASON_PROVISIONED: &str = "Provisioned";
/// Condition reason of a resource still being provisioned.
pub const REASON_PROVISIONING: &str = "Provisioning";

/// A status condition, as reported by every Unikorn controller.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
	#[serde(rename = "type", default)]
	pub type_: String,
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub reason: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_transition_time: Option<String>,
}

/// Resources that report status conditions.
pub trait Conditioned {
	fn conditions(&self) -> &[Condition];

	/// Reason of the first condition, which is what users know as "status".
	fn status_reason(&self) -> Option<&str> {
		self.conditions().first().map(|c| c.reason.as_str())
	}
}

/// Label accessors shared by all Unikorn resources.
pub trait UnikornResource: ResourceExt {
	/// Value of the name label, or an empty string.
	fn display_name(&self) -> &str {
		self.label(NAME_LABEL)
	}

	fn organization_id(&self) -> &str {
		self.label(ORGANIZATION_LABEL)
	}

	fn project_id(&self) -> &str {
		self.label(PROJECT_LABEL)
	}

	fn label(&self, key: &str) -> &str {
		self.labels().get(key).map_or("", String::as_str)
	}

	/// True when `identifier` is either the name label or the object name.
	fn is_identified_by(&self, identifier: &str) -> bool {
		self.display_name() == identifier || self.meta().name.as_deref() == Some(identifier)
	}
}

impl<K: ResourceExt> UnikornResource for K {}

macro_rules! impl_conditioned {
	($($kind:ty),* $(,)?) => {
		$(
			impl Conditioned for $kind {
				fn conditions(&self) -> &[Condition] {
					self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
				}
			}
		)*
	};
}

impl_conditioned!(
	Organization,
	Project,
	Network,
	OpenstackIdentity,
	KubernetesCluster,
	VirtualKubernetesCluster,
	ClusterManager,
	ComputeInstance,
);
