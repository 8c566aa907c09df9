use std::{collections::BTreeMap, io::Write, time::Duration};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use unikorn_apis::{
	identity::OrganizationSpec, Organization, DESCRIPTION_ANNOTATION, NAME_LABEL,
};

use super::{create_in, new_id};
use crate::{
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	session::Session,
};

/// How often to check whether the organization has been provisioned.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateOrganizationError {
	#[error("expected no organizations to exist with name {0}")]
	Exists(String),

	#[error("organization {0} was deleted before it was provisioned")]
	Vanished(String),
}

#[derive(Args, Debug)]
pub struct OrganizationArgs {
	/// Organization name
	#[arg(long)]
	pub name: String,

	/// A verbose organization description
	#[arg(long)]
	pub description: Option<String>,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct CreatedOrganization {
	pub name: String,
	pub id: String,
	pub namespace: String,
}

impl Listing for CreatedOrganization {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("id"),
		Column::shown("namespace"),
	];

	fn cells(&self) -> Vec<String> {
		vec![self.name.clone(), self.id.clone(), self.namespace.clone()]
	}
}

pub fn organization(
	id: &str,
	namespace: &str,
	name: &str,
	description: Option<&str>,
) -> Organization {
	let mut organization = Organization::new(id, OrganizationSpec::default());
	organization.metadata.namespace = Some(namespace.to_string());
	organization.metadata.labels =
		Some(BTreeMap::from([(NAME_LABEL.to_string(), name.to_string())]));
	organization.metadata.annotations = description
		.filter(|d| !d.is_empty())
		.map(|d| BTreeMap::from([(DESCRIPTION_ANNOTATION.to_string(), d.to_string())]));
	organization
}

/// One poll of the organization: its namespace once provisioned, `None` to
/// keep waiting. Failed requests are retried until the command deadline.
fn provisioned_namespace<E: std::fmt::Display>(
	id: &str,
	polled: Result<Option<Organization>, E>,
) -> Result<Option<String>, CreateOrganizationError> {
	let organization = match polled {
		Ok(Some(organization)) => organization,
		Ok(None) => return Err(CreateOrganizationError::Vanished(id.to_string())),
		Err(e) => {
			debug!(error = %e, "polling organization failed");
			return Ok(None);
		}
	};
	Ok(organization
		.status
		.and_then(|s| s.namespace)
		.filter(|ns| !ns.is_empty()))
}

/// Wait until the controller has provisioned a namespace for the organization.
#[instrument(skip(session))]
async fn wait_for_namespace(session: &Session, id: &str) -> Result<String> {
	loop {
		let polled =
			list::get_in::<Organization>(session.client(), &session.identity_namespace, id).await;
		if let Some(namespace) = provisioned_namespace(id, polled)? {
			return Ok(namespace);
		}
		debug!("organization not provisioned yet");
		tokio::time::sleep(POLL_INTERVAL).await;
	}
}

#[instrument(skip_all, fields(name = %args.name))]
pub async fn run<W: Write>(args: OrganizationArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<CreatedOrganization>(&args.output, &[])?;
	let client = session.client();
	let namespace = &session.identity_namespace;

	let existing: Vec<Organization> =
		list::list_in(client, namespace, &LabelSet::new().with(NAME_LABEL, &args.name))
			.await
			.context("failed to list organizations")?;
	if !existing.is_empty() {
		return Err(CreateOrganizationError::Exists(args.name).into());
	}

	let id = new_id();
	create_in(
		client,
		namespace,
		&organization(&id, namespace, &args.name, args.description.as_deref()),
	)
	.await?;
	let namespace = wait_for_namespace(session, &id).await?;

	printer.print(
		writer,
		&[CreatedOrganization {
			name: args.name,
			id,
			namespace,
		}],
	)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use kube::ResourceExt;
	use unikorn_apis::identity::OrganizationStatus;

	use super::*;

	#[test]
	fn test_labels_and_annotations() {
		let created = organization("o1", "unikorn-identity", "acme", Some("Acme Corp"));
		assert_eq!(created.name_any(), "o1");
		assert_eq!(created.namespace().as_deref(), Some("unikorn-identity"));
		assert_eq!(created.labels()[NAME_LABEL], "acme");
		assert_eq!(created.annotations()[DESCRIPTION_ANNOTATION], "Acme Corp");
	}

	#[test]
	fn test_poll_waits_for_namespace() {
		let pending = organization("o1", "unikorn-identity", "acme", None);
		assert_eq!(
			provisioned_namespace::<String>("o1", Ok(Some(pending.clone()))),
			Ok(None)
		);

		let mut provisioned = pending;
		provisioned.status = Some(OrganizationStatus {
			namespace: Some("org-acme".to_string()),
			..OrganizationStatus::default()
		});
		assert_eq!(
			provisioned_namespace::<String>("o1", Ok(Some(provisioned))),
			Ok(Some("org-acme".to_string()))
		);
	}

	#[test]
	fn test_poll_retries_failed_requests() {
		assert_eq!(
			provisioned_namespace("o1", Err("connection reset".to_string())),
			Ok(None)
		);
	}

	#[test]
	fn test_poll_reports_deleted_organization() {
		assert_eq!(
			provisioned_namespace::<String>("o1", Ok(None)),
			Err(CreateOrganizationError::Vanished("o1".to_string()))
		);
	}

	#[test]
	fn test_empty_description_is_omitted() {
		let created = organization("o1", "unikorn-identity", "acme", Some(""));
		assert!(created.metadata.annotations.is_none());
	}
}
