use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{Organization, UnikornResource};

use crate::{
	commands::{matches_identifier, status_reason},
	completion,
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	session::Session,
};

#[derive(Args, Debug)]
pub struct OrganizationArgs {
	/// Only show the organization with this name or ID
	#[arg(add = ArgValueCompleter::new(completion::organizations))]
	pub identifier: Option<String>,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct OrganizationRow {
	pub name: String,
	pub id: String,
	pub namespace: String,
	pub status: String,
}

impl OrganizationRow {
	fn new(organization: &Organization) -> Self {
		Self {
			name: organization.display_name().to_string(),
			id: organization.name_any(),
			namespace: organization
				.status
				.as_ref()
				.and_then(|s| s.namespace.clone())
				.unwrap_or_default(),
			status: status_reason(organization),
		}
	}
}

impl Listing for OrganizationRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("id"),
		Column::shown("namespace"),
		Column::shown("status"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.namespace.clone(),
			self.status.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: OrganizationArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<OrganizationRow>(&args.output, &[])?;

	let organizations: Vec<Organization> =
		list::list_in(session.client(), &session.identity_namespace, &LabelSet::new())
			.await
			.context("failed to list organizations")?;

	let rows: Vec<_> = organizations
		.iter()
		.filter(|o| matches_identifier(*o, args.identifier.as_deref()))
		.map(OrganizationRow::new)
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
