//! HTTP-based mock Kubernetes server using wiremock.
//!
//! This provides a real HTTP server that can be used with actual kubeconfig-based
//! connections. Objects are kept in memory; GET supports single objects, lists in
//! one namespace and lists across namespaces, with equality label selectors. POST
//! persists new objects.

use std::{
	collections::BTreeMap,
	sync::{Arc, RwLock},
};

use bon::Builder;
use kube::config::{
	AuthInfo, Cluster, Context, Kubeconfig, NamedAuthInfo, NamedCluster, NamedContext,
};
use serde_json::{json, Value};
use tracing::{debug, trace};
use wiremock::{
	matchers::{method, path, path_regex},
	Mock, MockServer, Request, ResponseTemplate,
};

use super::{
	discovery::MockDiscovery,
	helpers::{matches_labels, merge_json, parse_label_selector, ResourcePath},
};

/// Storage key: the object's collection path plus its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ResourceKey {
	prefix: String,
	namespace: Option<String>,
	plural: String,
	name: String,
}

impl ResourceKey {
	fn path(&self) -> ResourcePath {
		ResourcePath {
			prefix: self.prefix.clone(),
			namespace: self.namespace.clone(),
			plural: self.plural.clone(),
			name: Some(self.name.clone()),
		}
	}
}

/// Type alias for the shared mutable resources map.
type SharedResources = Arc<RwLock<BTreeMap<ResourceKey, Value>>>;

/// A mock Kubernetes server exposed over HTTP.
#[derive(Builder)]
pub struct HttpMockK8sServer {
	/// Resources to serve as raw manifests. The server derives API paths from
	/// apiVersion/kind using the discovery data. Namespaces referenced by
	/// manifests are created implicitly.
	#[builder(default)]
	resources: Vec<Value>,
}

/// A running HTTP mock server instance.
pub struct RunningHttpMockK8sServer {
	server: MockServer,
	resources: SharedResources,
}

impl HttpMockK8sServer {
	/// Start the mock server with all configured resources.
	pub async fn start(self) -> RunningHttpMockK8sServer {
		let server = MockServer::start().await;
		let discovery = MockDiscovery::default();

		debug!(uri = %server.uri(), "Started mock K8s server");

		let mut resources = BTreeMap::new();
		let mut namespaces = vec!["default".to_string()];

		for manifest in self.resources {
			let Some(key) = key_for_manifest(&manifest, &discovery) else {
				debug!(manifest = %manifest, "Skipping manifest of unknown kind");
				continue;
			};
			trace!(?key, "Registered resource");
			if let Some(namespace) = &key.namespace {
				namespaces.push(namespace.clone());
			}
			resources.insert(key, manifest);
		}

		for namespace in namespaces {
			let key = ResourceKey {
				prefix: "/api/v1".to_string(),
				namespace: None,
				plural: "namespaces".to_string(),
				name: namespace.clone(),
			};
			resources.entry(key).or_insert_with(|| {
				json!({
					"apiVersion": "v1",
					"kind": "Namespace",
					"metadata": {"name": namespace}
				})
			});
		}

		let shared_resources = Arc::new(RwLock::new(resources));

		mount_version(&server).await;
		mount_resources(&server, &shared_resources).await;

		RunningHttpMockK8sServer {
			server,
			resources: shared_resources,
		}
	}
}

/// Derive the storage key for a manifest using discovery data.
fn key_for_manifest(manifest: &Value, discovery: &MockDiscovery) -> Option<ResourceKey> {
	let api_version = manifest.get("apiVersion")?.as_str()?;
	let kind = manifest.get("kind")?.as_str()?;
	let name = manifest.pointer("/metadata/name")?.as_str()?.to_string();
	let namespace = manifest
		.pointer("/metadata/namespace")
		.and_then(Value::as_str);

	let resource = discovery.find(api_version, kind)?;

	let prefix = if api_version.contains('/') {
		format!("/apis/{api_version}")
	} else {
		format!("/api/{api_version}")
	};

	Some(ResourceKey {
		prefix,
		namespace: resource
			.namespaced
			.then(|| namespace.unwrap_or("default").to_string()),
		plural: resource.name.clone(),
		name,
	})
}

impl RunningHttpMockK8sServer {
	/// Get the server's URI (e.g., "http://127.0.0.1:12345").
	pub fn uri(&self) -> String {
		self.server.uri()
	}

	/// Create a Kubeconfig pointing to this mock server.
	pub fn kubeconfig(&self) -> Kubeconfig {
		self.kubeconfig_with_context("mock-context")
	}

	/// Create a Kubeconfig pointing to this mock server with a custom context name.
	pub fn kubeconfig_with_context(&self, context_name: &str) -> Kubeconfig {
		let cluster_name = "mock-cluster";
		let user_name = "mock-user";

		Kubeconfig {
			clusters: vec![NamedCluster {
				name: cluster_name.to_string(),
				cluster: Some(Cluster {
					server: Some(self.uri()),
					insecure_skip_tls_verify: Some(true),
					..Default::default()
				}),
			}],
			contexts: vec![NamedContext {
				name: context_name.to_string(),
				context: Some(Context {
					cluster: cluster_name.to_string(),
					user: Some(user_name.to_string()),
					namespace: Some("default".to_string()),
					..Default::default()
				}),
			}],
			auth_infos: vec![NamedAuthInfo {
				name: user_name.to_string(),
				auth_info: Some(AuthInfo::default()),
			}],
			current_context: Some(context_name.to_string()),
			..Default::default()
		}
	}

	/// All stored objects of the given kind, in key order.
	pub fn objects_of_kind(&self, kind: &str) -> Vec<Value> {
		let resources = self.resources.read().unwrap();
		resources
			.values()
			.filter(|v| v.get("kind").and_then(Value::as_str) == Some(kind))
			.cloned()
			.collect()
	}

	/// Deep merge `patch` into every stored object of `kind` named `name`,
	/// the way a controller would update status. Returns whether anything
	/// matched.
	pub fn merge_object(&self, kind: &str, name: &str, patch: &Value) -> bool {
		let mut resources = self.resources.write().unwrap();
		let mut matched = false;
		for object in resources.values_mut() {
			let is_match = object.get("kind").and_then(Value::as_str) == Some(kind)
				&& object.pointer("/metadata/name").and_then(Value::as_str) == Some(name);
			if is_match {
				*object = merge_json(object.take(), patch.clone());
				matched = true;
			}
		}
		matched
	}
}

fn status_response(code: u16, reason: &str, message: String) -> ResponseTemplate {
	ResponseTemplate::new(code).set_body_json(json!({
		"kind": "Status",
		"apiVersion": "v1",
		"metadata": {},
		"status": "Failure",
		"message": message,
		"reason": reason,
		"code": code
	}))
}

async fn mount_version(server: &MockServer) {
	Mock::given(method("GET"))
		.and(path("/version"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"major": "1",
			"minor": "31",
			"gitVersion": "v1.31.0",
			"gitCommit": "fake",
			"gitTreeState": "clean",
			"buildDate": "2024-01-01T00:00:00Z",
			"goVersion": "go1.22.0",
			"compiler": "gc",
			"platform": "linux/amd64"
		})))
		.mount(server)
		.await;
}

async fn mount_resources(server: &MockServer, resources: &SharedResources) {
	let post_resources = Arc::clone(resources);
	let get_resources = Arc::clone(resources);

	// POST for create - persist unless an object of the same name exists
	Mock::given(method("POST"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let Some(target) = ResourcePath::parse(req.url.path()) else {
				return status_response(404, "NotFound", format!("{} not found", req.url.path()));
			};

			let mut body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
			let Some(name) = body.pointer("/metadata/name").and_then(Value::as_str) else {
				return status_response(422, "Invalid", "metadata.name: Required value".into());
			};

			let key = ResourceKey {
				prefix: target.prefix,
				namespace: target.namespace.clone(),
				plural: target.plural,
				name: name.to_string(),
			};

			let is_dry_run = req.url.query().unwrap_or("").contains("dryRun");
			let mut resources = post_resources.write().unwrap();
			if resources.contains_key(&key) {
				return status_response(
					409,
					"AlreadyExists",
					format!("{} \"{}\" already exists", key.plural, key.name),
				);
			}

			if let (Some(namespace), Some(metadata)) =
				(target.namespace, body.get_mut("metadata"))
			{
				metadata["namespace"] = Value::String(namespace);
			}

			if !is_dry_run {
				trace!(?key, "Created resource");
				resources.insert(key, body.clone());
			}

			ResponseTemplate::new(201).set_body_json(body)
		})
		.mount(server)
		.await;

	// GET endpoints - handles both single resource and LIST
	Mock::given(method("GET"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let Some(target) = ResourcePath::parse(req.url.path()) else {
				return status_response(404, "NotFound", format!("{} not found", req.url.path()));
			};
			let resources = get_resources.read().unwrap();

			if let Some(name) = &target.name {
				return resources
					.iter()
					.find(|(key, _)| key.path() == target)
					.map_or_else(
						|| {
							let message = format!("{} \"{name}\" not found", target.plural);
							status_response(404, "NotFound", message)
						},
						|(_, object)| ResponseTemplate::new(200).set_body_json(object),
					);
			}

			let requirements = req
				.url
				.query_pairs()
				.find(|(k, _)| k == "labelSelector")
				.map(|(_, v)| parse_label_selector(&v))
				.unwrap_or_default();

			let items: Vec<_> = resources
				.iter()
				.filter(|(key, object)| {
					target.contains(&key.path()) && matches_labels(object, &requirements)
				})
				.map(|(_, object)| object.clone())
				.collect();

			ResponseTemplate::new(200).set_body_json(json!({
				"kind": "List",
				"apiVersion": "v1",
				"metadata": {"resourceVersion": "1"},
				"items": items
			}))
		})
		.mount(server)
		.await;
}
