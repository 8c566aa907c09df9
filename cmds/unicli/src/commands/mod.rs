//! Command handlers.
//!
//! Every handler follows the same shape: resolve scoping flags, list, join
//! IDs with display names, render.

use anyhow::{Context, Result};
use serde::Serialize;
use unikorn_apis::{Conditioned, Region, UnikornResource};

use crate::{
	k8s::{list, names, LabelSet, NameMap},
	session::Session,
};

pub mod completion;
pub mod connect;
pub mod create;
pub mod describe;
pub mod get;
pub mod util;

/// An ID together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
	pub id: String,
	pub name: String,
}

impl Reference {
	pub fn resolve(names: &NameMap, id: &str) -> Self {
		Self {
			id: id.to_string(),
			name: names.resolve(id).to_string(),
		}
	}
}

/// Name maps shared by most commands, loaded once per invocation.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
	pub organizations: NameMap,
	pub projects: NameMap,
	pub regions: NameMap,
	pub flavors: NameMap,
}

impl Lookups {
	pub async fn load(session: &Session) -> Result<Self> {
		let client = session.client();

		let organizations = names::organizations(client, &session.identity_namespace)
			.await
			.context("failed to list organizations")?;
		let projects = names::projects(client)
			.await
			.context("failed to list projects")?;
		let regions: Vec<Region> =
			list::list_in(client, &session.region_namespace, &LabelSet::new())
				.await
				.context("failed to list regions")?;

		Ok(Self {
			organizations,
			projects,
			regions: NameMap::from_resources(&regions),
			flavors: NameMap::flavors(&regions),
		})
	}

	pub fn organization(&self, id: &str) -> Reference {
		Reference::resolve(&self.organizations, id)
	}

	pub fn project(&self, id: &str) -> Reference {
		Reference::resolve(&self.projects, id)
	}

	pub fn region(&self, id: &str) -> Reference {
		Reference::resolve(&self.regions, id)
	}

	pub fn flavor(&self, id: &str) -> String {
		self.flavors.resolve(id).to_string()
	}
}

/// The status column: reason of the first condition, or empty.
pub fn status_reason(resource: &impl Conditioned) -> String {
	resource.status_reason().unwrap_or_default().to_string()
}

/// True when no identifier was given or `resource` is named or identified by it.
pub fn matches_identifier(resource: &impl UnikornResource, identifier: Option<&str>) -> bool {
	identifier.is_none_or(|identifier| resource.is_identified_by(identifier))
}

/// Joins list values for a single table cell or tree line.
pub fn join(values: &[String]) -> String {
	values.join(", ")
}

#[cfg(test)]
mod tests {
	use kube::ResourceExt;
	use unikorn_apis::{identity::ProjectSpec, Project, NAME_LABEL};

	use super::*;

	fn project() -> Project {
		let mut project = Project::new("p1", ProjectSpec::default());
		project
			.labels_mut()
			.insert(NAME_LABEL.to_string(), "web".to_string());
		project
	}

	#[test]
	fn test_matches_identifier() {
		let project = project();
		assert!(matches_identifier(&project, None));
		assert!(matches_identifier(&project, Some("web")));
		assert!(matches_identifier(&project, Some("p1")));
		assert!(!matches_identifier(&project, Some("db")));
	}

	#[test]
	fn test_status_reason_without_status() {
		assert_eq!(status_reason(&project()), "");
	}

	#[test]
	fn test_lookups_fall_back_to_ids() {
		let lookups = Lookups::default();
		assert_eq!(
			lookups.organization("o1"),
			Reference {
				id: "o1".to_string(),
				name: "o1".to_string(),
			}
		);
		assert_eq!(lookups.flavor("f1"), "f1");
	}
}
