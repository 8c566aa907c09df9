use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{Project, UnikornResource};

use crate::{
	commands::{matches_identifier, status_reason, Reference},
	completion,
	k8s::{list, names, NameMap},
	output::{Column, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct ProjectArgs {
	/// Only show the project with this name or ID
	#[arg(add = ArgValueCompleter::new(completion::projects))]
	pub identifier: Option<String>,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct ProjectRow {
	pub name: String,
	pub id: String,
	pub organization: Reference,
	pub namespace: String,
	pub status: String,
}

impl ProjectRow {
	fn new(project: &Project, organizations: &NameMap) -> Self {
		Self {
			name: project.display_name().to_string(),
			id: project.name_any(),
			organization: Reference::resolve(organizations, project.organization_id()),
			namespace: project
				.status
				.as_ref()
				.and_then(|s| s.namespace.clone())
				.unwrap_or_default(),
			status: status_reason(project),
		}
	}
}

impl Listing for ProjectRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("id"),
		Column::shown("organization"),
		Column::shown("namespace"),
		Column::shown("status"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.organization.name.clone(),
			self.namespace.clone(),
			self.status.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: ProjectArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<ProjectRow>(&args.output, &[])?;
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		None,
		None,
	)
	.await?;
	let client = session.client();

	let projects: Vec<Project> = list::list_cluster_wide(client, &scope.labels())
		.await
		.context("failed to list projects")?;
	let organizations = names::organizations(client, &session.identity_namespace)
		.await
		.context("failed to list organizations")?;

	let rows: Vec<_> = projects
		.iter()
		.filter(|p| matches_identifier(*p, args.identifier.as_deref()))
		.map(|p| ProjectRow::new(p, &organizations))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
