use std::io::Write;

use anyhow::Result;
use clap::Args;
use tracing::instrument;
use unikorn_apis::{Conditioned, Network, UnikornResource, REGION_LABEL};

use super::{basic_information, find, reference, values};
use crate::{
	commands::Lookups,
	output::Tree,
	scope::{OrganizationFlag, ProjectFlag, Scope},
	session::Session,
};

#[derive(Args, Debug)]
pub struct NetworkArgs {
	/// Network name or ID
	pub identifier: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub project: ProjectFlag,
}

pub fn tree(network: &Network, lookups: &Lookups) -> Tree {
	let spec = &network.spec;

	let mut details = Tree::new("Spec").field("Provider", &spec.provider);
	if let Some(prefix) = &spec.prefix {
		details = details.field("Prefix", prefix);
	}
	let routes: Vec<String> = spec
		.routes
		.iter()
		.map(|r| format!("Prefix: {} → NextHop: {}", r.prefix, r.next_hop))
		.collect();
	let details = details
		.child(values("DNS Nameservers", &spec.dns_nameservers))
		.child(values("Routes", &routes));

	let mut status = Tree::new("Status");
	if let Some(openstack) = network.status.as_ref().and_then(|s| s.openstack.as_ref()) {
		if let Some(network_id) = &openstack.network_id {
			status = status.field("Network ID", network_id);
		}
		if let Some(subnet_id) = &openstack.subnet_id {
			status = status.field("Subnet ID", subnet_id);
		}
		if let Some(vlan_id) = openstack.vlan_id {
			status = status.field("VLAN ID", vlan_id.to_string());
		}
	}
	let status = status.status("Condition", network.status_reason());

	Tree::new("Network")
		.child(basic_information(network))
		.child(reference("Organization", &lookups.organization(network.organization_id())))
		.child(reference("Project", &lookups.project(network.project_id())))
		.child(reference("Region", &lookups.region(network.label(REGION_LABEL))))
		.child(details)
		.child(status)
}

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub async fn run<W: Write>(args: NetworkArgs, session: &Session, writer: W) -> Result<()> {
	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		args.project.project.as_deref(),
		None,
	)
	.await?;

	let network: Network = find(session, &scope, "network", &args.identifier).await?;
	let lookups = Lookups::load(session).await?;

	tree(&network, &lookups).write(writer, session.color)?;
	Ok(())
}
