//! Kubernetes cluster connection management.

use std::{path::PathBuf, time::Duration};

use bon::Builder;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::{
	config::{InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError},
	Client, Config,
};
use thiserror::Error;
use tracing::instrument;

/// Default timeout for a single Kubernetes API request.
const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when connecting to the control plane.
#[derive(Debug, Error)]
pub enum ConnectionError {
	#[error("reading kubeconfig {path}")]
	ReadKubeconfig {
		path: PathBuf,
		#[source]
		source: KubeconfigError,
	},

	#[error("no context named `{0}` was found. Please check your kubeconfig")]
	ContextNotFound(String),

	#[error(transparent)]
	Kubeconfig(#[from] KubeconfigError),

	#[error(transparent)]
	InferConfig(#[from] InferConfigError),

	#[error("unable to reach the API server")]
	Unreachable(#[source] kube::Error),

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

/// Where to find the control plane.
#[derive(Debug, Clone, Builder)]
pub struct ConnectionOptions {
	/// Kubeconfig file; standard discovery (`$KUBECONFIG`, `~/.kube/config`,
	/// in-cluster) when unset.
	pub kubeconfig: Option<PathBuf>,
	/// Context to use instead of the current one.
	pub context: Option<String>,
	/// Per-request timeout.
	#[builder(default = DEFAULT_API_TIMEOUT)]
	pub request_timeout: Duration,
}

/// A verified connection to the control plane hosting Unikorn resources.
#[derive(Clone)]
pub struct ClusterConnection {
	client: Client,
	server_version: Info,
}

impl std::fmt::Debug for ClusterConnection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClusterConnection")
			.field("server_version", &self.server_version.git_version)
			.finish_non_exhaustive()
	}
}

impl ClusterConnection {
	/// Connect using the configured kubeconfig.
	#[instrument(skip_all)]
	pub async fn connect(options: &ConnectionOptions) -> Result<Self, ConnectionError> {
		if let Some(path) = &options.kubeconfig {
			let kubeconfig =
				Kubeconfig::read_from(path).map_err(|source| ConnectionError::ReadKubeconfig {
					path: path.clone(),
					source,
				})?;
			return Self::from_kubeconfig(kubeconfig, options).await;
		}

		if options.context.is_some() {
			return Self::from_kubeconfig(Kubeconfig::read()?, options).await;
		}

		let config = Config::infer().await?;
		Self::from_config(config, options).await
	}

	/// Connect using an already loaded kubeconfig.
	#[instrument(skip_all)]
	pub async fn from_kubeconfig(
		kubeconfig: Kubeconfig,
		options: &ConnectionOptions,
	) -> Result<Self, ConnectionError> {
		if let Some(context) = &options.context {
			if !kubeconfig.contexts.iter().any(|c| &c.name == context) {
				return Err(ConnectionError::ContextNotFound(context.clone()));
			}
		}

		let config = Config::from_custom_kubeconfig(
			kubeconfig,
			&KubeConfigOptions {
				context: options.context.clone(),
				..Default::default()
			},
		)
		.await?;

		Self::from_config(config, options).await
	}

	async fn from_config(
		mut config: Config,
		options: &ConnectionOptions,
	) -> Result<Self, ConnectionError> {
		tracing::debug!(cluster_url = %config.cluster_url, "connecting");

		config.read_timeout = Some(options.request_timeout);
		let client = Client::try_from(config)?;

		let server_version = client
			.apiserver_version()
			.await
			.map_err(ConnectionError::Unreachable)?;

		tracing::debug!(version = %server_version.git_version, "connected");

		Ok(Self {
			client,
			server_version,
		})
	}

	/// Get a reference to the underlying kube client.
	pub fn client(&self) -> &Client {
		&self.client
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;

	#[tokio::test]
	async fn test_unknown_context_errors() {
		let options = ConnectionOptions::builder()
			.context("nonexistent".to_string())
			.build();

		let result = ClusterConnection::from_kubeconfig(Kubeconfig::default(), &options).await;
		assert_matches!(
			result,
			Err(ConnectionError::ContextNotFound(context)) if context == "nonexistent"
		);
	}

	#[tokio::test]
	async fn test_missing_kubeconfig_file_errors() {
		let options = ConnectionOptions::builder()
			.kubeconfig(PathBuf::from("/nonexistent/kubeconfig"))
			.build();

		let result = ClusterConnection::connect(&options).await;
		assert_matches!(
			result,
			Err(ConnectionError::ReadKubeconfig { path, .. })
				if path == PathBuf::from("/nonexistent/kubeconfig")
		);
	}
}
