use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{Region, UnikornResource};

use crate::{
	commands::matches_identifier,
	completion,
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	session::Session,
};

#[derive(Args, Debug)]
pub struct RegionArgs {
	/// Only show the region with this name or ID
	#[arg(add = ArgValueCompleter::new(completion::regions))]
	pub identifier: Option<String>,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
pub struct RegionRow {
	pub name: String,
	pub id: String,
	pub provider: String,
	pub flavors: Vec<String>,
}

impl Listing for RegionRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("name"),
		Column::shown("id"),
		Column::shown("provider"),
	];

	fn cells(&self) -> Vec<String> {
		vec![self.name.clone(), self.id.clone(), self.provider.clone()]
	}
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: RegionArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<RegionRow>(&args.output, &[])?;

	let regions: Vec<Region> =
		list::list_in(session.client(), &session.region_namespace, &LabelSet::new())
			.await
			.context("failed to list regions")?;

	let rows: Vec<_> = regions
		.iter()
		.filter(|r| matches_identifier(*r, args.identifier.as_deref()))
		.map(|r| RegionRow {
			name: r.display_name().to_string(),
			id: r.name_any(),
			provider: r.spec.provider.clone(),
			flavors: r.flavor_metadata().iter().map(|f| f.description()).collect(),
		})
		.collect();

	printer.print(writer, &rows)?;
	Ok(())
}
