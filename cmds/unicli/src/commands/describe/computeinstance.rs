use std::io::Write;

use anyhow::Result;
use clap::Args;
use tracing::instrument;
use unikorn_apis::{ComputeInstance, Conditioned, UnikornResource, REGION_LABEL};

use super::{basic_information, find, reference, values};
use crate::{
	commands::Lookups,
	output::Tree,
	scope::{OrganizationFlag, ProjectFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct ComputeInstanceArgs {
	/// Instance name or ID
	pub identifier: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,
}

pub fn tree(instance: &ComputeInstance, lookups: &Lookups) -> Tree {
	let spec = &instance.spec;

	let mut details = Tree::new("Spec")
		.field("Flavor", lookups.flavor(&spec.flavor_id))
		.field("Image", &spec.image_id)
		.field("Replicas", spec.replicas.to_string());
	if let Some(disk_size) = &spec.disk_size {
		details = details.field("Disk Size", &disk_size.0);
	}

	let networking = match &spec.networking {
		Some(networking) => Tree::new("Networking")
			.field("Public IP", networking.public_ip.to_string())
			.child(values("Security Groups", &networking.security_group_ids))
			.child(values("Allowed Source Addresses", &networking.allowed_source_addresses)),
		None => Tree::new("Networking").text("No networking configured"),
	};

	let mut status = Tree::new("Status");
	if let Some(observed) = &instance.status {
		let fields = [
			("Private IP", &observed.private_ip),
			("Public IP", &observed.public_ip),
			("Power State", &observed.power_state),
		];
		for (label, value) in fields {
			if let Some(value) = value {
				status = status.field(label, value);
			}
		}
	}
	let status = status.status("Condition", instance.status_reason());

	Tree::new("Compute Instance")
		.child(basic_information(instance))
		.child(reference("Organization", &lookups.organization(instance.organization_id())))
		.child(reference("Project", &lookups.project(instance.project_id())))
		.child(reference("Region", &lookups.region(instance.label(REGION_LABEL))))
		.child(details)
		.child(networking)
		.child(status)
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(args: ComputeInstanceArgs, session: &Session, writer: W) -> Result<()> {
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		None,
	)
	.await?;

	let instance: ComputeInstance =
		find(session, &scope, "compute instance", &args.identifier).await?;
	let lookups = Lookups::load(session).await?;

	tree(&instance, &lookups).write(writer, session.color)?;
	Ok(())
}
