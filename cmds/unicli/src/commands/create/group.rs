use std::{collections::BTreeMap, io::Write};

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::ArgValueCompleter;
use kube::ResourceExt;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use unikorn_apis::{
	identity::GroupSpec, Group, Organization, OrganizationUser, Role, UnikornResource, User,
	DESCRIPTION_ANNOTATION, NAME_LABEL, ORGANIZATION_LABEL, USER_LABEL,
};

use super::{create_in, new_id};
use crate::{
	completion,
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	scope::{self, ScopeError},
	session::Session,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateGroupError {
	#[error("expected no groups to exist with name {0}")]
	Exists(String),

	#[error("unable to find role {0}")]
	RoleNotFound(String),

	#[error("unable to find user {0}")]
	UserNotFound(String),
}

#[derive(Args, Debug)]
pub struct GroupArgs {
	/// Organization name
	#[arg(long, add = ArgValueCompleter::new(completion::organizations))]
	pub organization: String,

	/// Group name
	#[arg(long)]
	pub name: String,

	/// A verbose group description
	#[arg(long)]
	pub description: Option<String>,

	/// Role granted to the group, may be specified more than once
	#[arg(long = "role", value_delimiter = ',', add = ArgValueCompleter::new(completion::roles))]
	pub roles: Vec<String>,

	/// Email of a group member, may be specified more than once
	#[arg(
		long = "user",
		value_delimiter = ',',
		add = ArgValueCompleter::new(completion::user_subjects)
	)]
	pub users: Vec<String>,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGroup {
	pub name: String,
	pub id: String,
	#[serde(rename = "roleIDs")]
	pub role_ids: Vec<String>,
	#[serde(rename = "userIDs")]
	pub user_ids: Vec<String>,
}

impl Listing for CreatedGroup {
	const COLUMNS: &'static [Column] = &[Column::shown("name"), Column::shown("id")];

	fn cells(&self) -> Vec<String> {
		vec![self.name.clone(), self.id.clone()]
	}
}

fn deduplicated(mut values: Vec<String>) -> Vec<String> {
	values.sort();
	values.dedup();
	values
}

/// IDs of the roles named `names`, in the same order.
pub fn role_ids(roles: &[Role], names: &[String]) -> Result<Vec<String>, CreateGroupError> {
	names
		.iter()
		.map(|name| {
			roles
				.iter()
				.find(|r| r.display_name() == name.as_str())
				.map(ResourceExt::name_any)
				.ok_or_else(|| CreateGroupError::RoleNotFound(name.clone()))
		})
		.collect()
}

/// Organization user IDs for the members with subjects `emails`.
pub fn member_ids(
	users: &[User],
	organization_users: &[OrganizationUser],
	emails: &[String],
) -> Result<Vec<String>, CreateGroupError> {
	emails
		.iter()
		.map(|email| {
			users
				.iter()
				.filter(|u| &u.spec.subject == email)
				.find_map(|u| {
					let user_id = u.name_any();
					organization_users
						.iter()
						.find(|ou| ou.label(USER_LABEL) == user_id)
				})
				.map(ResourceExt::name_any)
				.ok_or_else(|| CreateGroupError::UserNotFound(email.clone()))
		})
		.collect()
}

pub fn group(
	id: &str,
	organization: &Organization,
	namespace: &str,
	args: &GroupArgs,
	spec: GroupSpec,
) -> Group {
	let mut group = Group::new(id, spec);
	group.metadata.namespace = Some(namespace.to_string());
	group.metadata.labels = Some(BTreeMap::from([
		(ORGANIZATION_LABEL.to_string(), organization.name_any()),
		(NAME_LABEL.to_string(), args.name.clone()),
	]));
	group.metadata.annotations = args
		.description
		.as_ref()
		.filter(|d| !d.is_empty())
		.map(|d| BTreeMap::from([(DESCRIPTION_ANNOTATION.to_string(), d.clone())]));
	group
}

#[instrument(skip_all, fields(organization = %args.organization, name = %args.name))]
pub async fn run<W: Write>(args: GroupArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<CreatedGroup>(&args.output, &[])?;
	let client = session.client();

	let organization =
		scope::resolve_organization(client, &session.identity_namespace, &args.organization).await?;
	let namespace = organization
		.status
		.as_ref()
		.and_then(|s| s.namespace.clone())
		.ok_or(ScopeError::OrganizationNamespace)?;

	let existing: Vec<Group> =
		list::list_in(client, &namespace, &LabelSet::new().with(NAME_LABEL, &args.name))
			.await
			.context("failed to list groups")?;
	if !existing.is_empty() {
		return Err(CreateGroupError::Exists(args.name).into());
	}

	let roles: Vec<Role> = list::list_in(client, &session.identity_namespace, &LabelSet::new())
		.await
		.context("failed to list roles")?;
	let role_ids = role_ids(&roles, &deduplicated(args.roles.clone()))?;

	let users: Vec<User> = list::list_in(client, &session.identity_namespace, &LabelSet::new())
		.await
		.context("failed to list users")?;
	let organization_users: Vec<OrganizationUser> =
		list::list_in(client, &namespace, &LabelSet::new())
			.await
			.context("failed to list organization users")?;
	let user_ids = member_ids(&users, &organization_users, &deduplicated(args.users.clone()))?;

	let spec = GroupSpec {
		role_ids: role_ids.clone(),
		user_ids: user_ids.clone(),
	};
	let group = group(&new_id(), &organization, &namespace, &args, spec);
	let created = create_in(client, &namespace, &group).await?;

	printer.print(
		writer,
		&[CreatedGroup {
			name: args.name,
			id: created.name_any(),
			role_ids,
			user_ids,
		}],
	)?;
	Ok(())
}
