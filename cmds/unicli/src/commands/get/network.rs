use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{region::NetworkSpec, Network, UnikornResource, REGION_LABEL};

use crate::{
	commands::{matches_identifier, status_reason, Lookups, Reference},
	k8s::list,
	output::{Column, ColumnsFlag, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, ProjectFlag, RegionFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct NetworkArgs {
	/// Only show the network with this name or ID
	pub identifier: Option<String>,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,

	#[command(flatten)]
	pub region: RegionFlag,

	#[command(flatten)]
	pub columns: ColumnsFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct NetworkRow {
	pub name: String,
	pub id: String,
	pub prefix: String,
	pub provider: String,
	pub status: String,
	pub organization: Reference,
	pub project: Reference,
	pub region: Reference,
	pub spec: NetworkSpec,
}

impl NetworkRow {
	fn new(network: &Network, lookups: &Lookups) -> Self {
		Self {
			name: network.display_name().to_string(),
			id: network.name_any(),
			prefix: network.spec.prefix.clone().unwrap_or_default(),
			provider: network.spec.provider.clone(),
			status: status_reason(network),
			organization: lookups.organization(network.organization_id()),
			project: lookups.project(network.project_id()),
			region: lookups.region(network.label(REGION_LABEL)),
			spec: network.spec.clone(),
		}
	}
}

impl Listing for NetworkRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::hidden("id"),
		Column::shown("prefix"),
		Column::shown("provider"),
		Column::shown("status"),
		Column::shown("organization"),
		Column::shown("project"),
		Column::shown("region"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.prefix.clone(),
			self.provider.clone(),
			self.status.clone(),
			self.organization.name.clone(),
			self.project.name.clone(),
			self.region.name.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: NetworkArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<NetworkRow>(&args.output, &args.columns.columns)?;
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		args.region.region.as_deref(),
	)
	.await?;

	let mut labels = scope.labels();
	if let Some(region_id) = scope.region_id() {
		labels.insert(REGION_LABEL, region_id);
	}

	let mut networks: Vec<Network> = list::list_all_namespaces(session.client(), &labels)
		.await
		.context("failed to list networks")?;
	networks.retain(|n| matches_identifier(n, args.identifier.as_deref()));

	let lookups = Lookups::load(session).await?;
	let rows: Vec<_> = networks
		.iter()
		.map(|n| NetworkRow::new(n, &lookups))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
