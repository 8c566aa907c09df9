//! `identity.unikorn-cloud.org` resources: tenancy and access control.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Condition;

/// Top level tenant. Lives in the identity namespace and owns a
/// namespace of its own once provisioned.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Organization",
	namespaced,
	status = "OrganizationStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStatus {
	/// Namespace provisioned for the organization's resources.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub namespace: Option<String>,
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

/// A project within an organization.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Project",
	namespaced,
	status = "ProjectStatus",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub namespace: Option<String>,
	#[serde(default)]
	pub conditions: Vec<Condition>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
	Active,
	#[default]
	Pending,
	Suspended,
}

/// A global user, keyed by subject (the email address).
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "User",
	namespaced,
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
	pub subject: String,
	#[serde(default)]
	pub state: UserState,
}

/// Membership of a [`User`] in an organization. Lives in the
/// organization namespace.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "OrganizationUser",
	namespaced,
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUserSpec {
	#[serde(default)]
	pub state: UserState,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Role",
	namespaced,
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
	/// Protected roles are managed by the platform and never offered to users.
	#[serde(default)]
	pub protected: bool,
}

/// A set of users granted a set of roles within an organization.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
	group = "identity.unikorn-cloud.org",
	version = "v1alpha1",
	kind = "Group",
	namespaced,
	schema = "disabled"
)]
pub struct GroupSpec {
	#[serde(rename = "roleIDs", default)]
	pub role_ids: Vec<String>,
	#[serde(rename = "userIDs", default, skip_serializing_if = "Vec::is_empty")]
	pub user_ids: Vec<String>,
}
