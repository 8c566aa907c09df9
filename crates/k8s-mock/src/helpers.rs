//! Helper functions for mock Kubernetes testing.

use serde_json::Value;

/// Deep merge two JSON values (patch into base).
pub fn merge_json(base: Value, patch: Value) -> Value {
	match (base, patch) {
		(Value::Object(mut base_map), Value::Object(patch_map)) => {
			for (key, patch_value) in patch_map {
				let base_value = base_map.remove(&key).unwrap_or(Value::Null);
				base_map.insert(key, merge_json(base_value, patch_value));
			}
			Value::Object(base_map)
		}
		(_, patch) => patch,
	}
}

/// A parsed Kubernetes API path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
	/// `/api/v1` or `/apis/<group>/<version>`.
	pub prefix: String,
	pub namespace: Option<String>,
	pub plural: String,
	pub name: Option<String>,
}

impl ResourcePath {
	/// Parse a request path.
	///
	/// Examples:
	/// - `/api/v1/namespaces` -> namespaces, no name
	/// - `/api/v1/namespaces/default` -> namespaces `default`
	/// - `/apis/unikorn-cloud.org/v1alpha1/namespaces/p1/kubernetesclusters` -> list in `p1`
	/// - `/apis/unikorn-cloud.org/v1alpha1/kubernetesclusters` -> list in all namespaces
	pub fn parse(path: &str) -> Option<Self> {
		let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

		let (prefix, rest) = match segments.as_slice() {
			["api", version, rest @ ..] => (format!("/api/{version}"), rest),
			["apis", group, version, rest @ ..] => (format!("/apis/{group}/{version}"), rest),
			_ => return None,
		};

		let (namespace, plural, name) = match rest {
			["namespaces", namespace, plural] => (Some(*namespace), *plural, None),
			["namespaces", namespace, plural, name] => (Some(*namespace), *plural, Some(*name)),
			[plural] => (None, *plural, None),
			[plural, name] => (None, *plural, Some(*name)),
			_ => return None,
		};

		Some(Self {
			prefix,
			namespace: namespace.map(str::to_string),
			plural: plural.to_string(),
			name: name.map(str::to_string),
		})
	}

	/// Whether a stored object at `other` is part of the collection this path addresses.
	pub fn contains(&self, other: &Self) -> bool {
		self.prefix == other.prefix
			&& self.plural == other.plural
			&& (self.namespace.is_none() || self.namespace == other.namespace)
	}
}

/// Parse an equality-based label selector (`a=b,c==d`).
///
/// Set-based requirements are not supported and are ignored.
pub fn parse_label_selector(selector: &str) -> Vec<(String, String)> {
	selector
		.split(',')
		.filter_map(|requirement| {
			let (key, value) = requirement.split_once('=')?;
			let value = value.strip_prefix('=').unwrap_or(value);
			if key.ends_with('!') {
				return None;
			}
			Some((key.trim().to_string(), value.trim().to_string()))
		})
		.collect()
}

/// Check whether an object's labels satisfy all requirements.
pub fn matches_labels(object: &Value, requirements: &[(String, String)]) -> bool {
	requirements.iter().all(|(key, value)| {
		object
			.pointer("/metadata/labels")
			.and_then(|labels| labels.get(key))
			.and_then(Value::as_str)
			== Some(value.as_str())
	})
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::*;

	#[rstest]
	#[case("/api/v1/namespaces", "/api/v1", None, "namespaces", None)]
	#[case("/api/v1/namespaces/default", "/api/v1", None, "namespaces", Some("default"))]
	#[case("/api/v1/namespaces/p1/pods", "/api/v1", Some("p1"), "pods", None)]
	#[case(
		"/apis/unikorn-cloud.org/v1alpha1/namespaces/p1/kubernetesclusters/c1",
		"/apis/unikorn-cloud.org/v1alpha1",
		Some("p1"),
		"kubernetesclusters",
		Some("c1")
	)]
	#[case(
		"/apis/identity.unikorn-cloud.org/v1alpha1/projects",
		"/apis/identity.unikorn-cloud.org/v1alpha1",
		None,
		"projects",
		None
	)]
	fn test_parse_resource_path(
		#[case] path: &str,
		#[case] prefix: &str,
		#[case] namespace: Option<&str>,
		#[case] plural: &str,
		#[case] name: Option<&str>,
	) {
		let parsed = ResourcePath::parse(path).unwrap();
		assert_eq!(parsed.prefix, prefix);
		assert_eq!(parsed.namespace.as_deref(), namespace);
		assert_eq!(parsed.plural, plural);
		assert_eq!(parsed.name.as_deref(), name);
	}

	#[test]
	fn test_parse_rejects_unknown_paths() {
		assert_eq!(ResourcePath::parse("/version"), None);
		assert_eq!(ResourcePath::parse("/api/v1/namespaces/a/pods/b/log"), None);
	}

	#[test]
	fn test_cluster_wide_path_contains_namespaced() {
		let all = ResourcePath::parse("/api/v1/pods").unwrap();
		let one = ResourcePath::parse("/api/v1/namespaces/a/pods/x").unwrap();
		let other = ResourcePath::parse("/api/v1/namespaces/b/pods").unwrap();
		assert!(all.contains(&one));
		assert!(!other.contains(&one));
	}

	#[test]
	fn test_label_selector() {
		let requirements = parse_label_selector("a=1,b==2,c!=3");
		assert_eq!(
			requirements,
			vec![("a".into(), "1".into()), ("b".into(), "2".into())]
		);

		let object = json!({"metadata": {"labels": {"a": "1", "b": "2"}}});
		assert!(matches_labels(&object, &requirements));
		assert!(!matches_labels(&json!({"metadata": {}}), &requirements));
		assert!(matches_labels(&json!({}), &[]));
	}

	#[test]
	fn test_merge_json() {
		let merged = merge_json(
			json!({"metadata": {"name": "o1"}, "status": {"a": 1}}),
			json!({"status": {"namespace": "org-1"}}),
		);
		assert_eq!(
			merged,
			json!({"metadata": {"name": "o1"}, "status": {"a": 1, "namespace": "org-1"}})
		);
	}
}
