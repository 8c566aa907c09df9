use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{compute::ComputeInstanceSpec, ComputeInstance, UnikornResource, REGION_LABEL};

use crate::{
	commands::{matches_identifier, status_reason, Lookups, Reference},
	k8s::list,
	output::{Column, ColumnsFlag, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, ProjectFlag, RegionFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct ComputeInstanceArgs {
	/// Only show the instance with this name or ID
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
pub struct ComputeInstanceRow {
	pub name: String,
	pub id: String,
	pub flavor: String,
	pub image: String,
	pub status: String,
	pub organization: Reference,
	pub project: Reference,
	pub region: Reference,
	pub spec: ComputeInstanceSpec,
}

impl ComputeInstanceRow {
	fn new(instance: &ComputeInstance, lookups: &Lookups) -> Self {
		Self {
			name: instance.display_name().to_string(),
			id: instance.name_any(),
			flavor: lookups.flavor(&instance.spec.flavor_id),
			image: instance.spec.image_id.clone(),
			status: status_reason(instance),
			organization: lookups.organization(instance.organization_id()),
			project: lookups.project(instance.project_id()),
			region: lookups.region(instance.label(REGION_LABEL)),
			spec: instance.spec.clone(),
		}
	}
}

impl Listing for ComputeInstanceRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::hidden("id"),
		Column::shown("flavor"),
		Column::hidden("image"),
		Column::shown("status"),
		Column::shown("organization"),
		Column::shown("project"),
		Column::shown("region"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.name.clone(),
			self.id.clone(),
			self.flavor.clone(),
			self.image.clone(),
			self.status.clone(),
			self.organization.name.clone(),
			self.project.name.clone(),
			self.region.name.clone(),
		]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: ComputeInstanceArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<ComputeInstanceRow>(&args.output, &args.columns.columns)?;
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

	let mut instances: Vec<ComputeInstance> = list::list_all_namespaces(session.client(), &labels)
		.await
		.context("failed to list compute instances")?;
	instances.retain(|i| matches_identifier(i, args.identifier.as_deref()));

	let lookups = Lookups::load(session).await?;
	let rows: Vec<_> = instances
		.iter()
		.map(|i| ComputeInstanceRow::new(i, &lookups))
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
