//! Equality label selectors.

use std::collections::BTreeMap;

use kube::api::ListParams;

/// A set of `key=value` requirements, all of which must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a requirement, replacing any previous value for `key`.
	#[must_use]
	pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn insert(&mut self, key: &str, value: impl Into<String>) {
		self.0.insert(key.to_string(), value.into());
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Selector string in key order, e.g. `a=1,b=2`.
	pub fn selector(&self) -> String {
		self.0
			.iter()
			.map(|(k, v)| format!("{k}={v}"))
			.collect::<Vec<_>>()
			.join(",")
	}

	pub fn list_params(&self) -> ListParams {
		if self.is_empty() {
			ListParams::default()
		} else {
			ListParams::default().labels(&self.selector())
		}
	}

	/// Whether `labels` satisfy every requirement.
	pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
		self.0.iter().all(|(k, v)| labels.get(k) == Some(v))
	}
}
