use std::{collections::BTreeMap, io::Write};

use anyhow::{bail, Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use tracing::instrument;
use unikorn_apis::{
	identity::{OrganizationUserSpec, UserSpec, UserState},
	Organization, OrganizationUser, User, NAME_LABEL, ORGANIZATION_LABEL, UNDEFINED_NAME,
	USER_LABEL,
};

use super::{create_in, new_id};
use crate::{
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	scope::{OrganizationFlag, Scope, ScopeError},
	session::Session,
};

#[derive(Args, Debug)]
pub struct UserArgs {
	/// User's email address
	#[arg(long)]
	pub email: String,

	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
	pub id: String,
	pub email: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub organization_user_id: Option<String>,
}

impl Listing for CreatedUser {
	const COLUMNS: &'static [Column] = &[
		Column::shown("id"),
		Column::shown("email"),
		Column::shown("organization user"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.id.clone(),
			self.email.clone(),
			self.organization_user_id.clone().unwrap_or_default(),
		]
	}
}

pub fn user(id: &str, namespace: &str, email: &str) -> User {
	let mut user = User::new(
		id,
		UserSpec {
			subject: email.to_string(),
			state: UserState::Active,
		},
	);
	user.metadata.namespace = Some(namespace.to_string());
	user.metadata.labels = Some(BTreeMap::from([(
		NAME_LABEL.to_string(),
		UNDEFINED_NAME.to_string(),
	)]));
	user
}

/// Membership of `user` in `organization`, stored in the organization's namespace.
pub fn organization_user(
	id: &str,
	namespace: &str,
	organization: &Organization,
	user: &User,
) -> OrganizationUser {
	let mut membership = OrganizationUser::new(
		id,
		OrganizationUserSpec {
			state: UserState::Active,
		},
	);
	membership.metadata.namespace = Some(namespace.to_string());
	membership.metadata.labels = Some(BTreeMap::from([
		(NAME_LABEL.to_string(), UNDEFINED_NAME.to_string()),
		(ORGANIZATION_LABEL.to_string(), organization.name_any()),
		(USER_LABEL.to_string(), user.name_any()),
	]));
	membership
}

#[instrument(skip_all, fields(email = %args.email))]
pub async fn run<W: Write>(args: UserArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<CreatedUser>(&args.output, &[])?;
	let client = session.client();
	let identity_namespace = &session.identity_namespace;

	let users: Vec<User> = list::list_in(client, identity_namespace, &LabelSet::new())
		.await
		.context("failed to list users")?;
	if users.iter().any(|u| u.spec.subject == args.email) {
		bail!("user already exists");
	}

	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		None,
		None,
	)
	.await?;

	let created = create_in(
		client,
		identity_namespace,
		&user(&new_id(), identity_namespace, &args.email),
	)
	.await?;

	let mut organization_user_id = None;
	if let Some(organization) = &scope.organization {
		let namespace = scope
			.organization_namespace()
			.ok_or(ScopeError::OrganizationNamespace)?;
		let membership = organization_user(&new_id(), namespace, organization, &created);
		organization_user_id = Some(create_in(client, namespace, &membership).await?.name_any());
	}

	printer.print(
		writer,
		&[CreatedUser {
			id: created.name_any(),
			email: args.email,
			organization_user_id,
		}],
	)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use unikorn_apis::identity::{OrganizationSpec, OrganizationStatus};

	use super::*;

	#[test]
	fn test_user() {
		let user = user("u1", "unikorn-identity", "a@example.com");
		assert_eq!(user.labels()[NAME_LABEL], UNDEFINED_NAME);
		assert_eq!(user.spec.subject, "a@example.com");
		assert_eq!(user.spec.state, UserState::Active);
	}

	#[test]
	fn test_organization_user_links_both_ids() {
		let mut organization = Organization::new("o1", OrganizationSpec::default());
		organization.status = Some(OrganizationStatus {
			namespace: Some("org-o1".to_string()),
			conditions: vec![],
		});
		let user = user("u1", "unikorn-identity", "a@example.com");

		let membership = organization_user("ou1", "org-o1", &organization, &user);
		assert_eq!(membership.namespace().as_deref(), Some("org-o1"));
		assert_eq!(membership.labels()[ORGANIZATION_LABEL], "o1");
		assert_eq!(membership.labels()[USER_LABEL], "u1");
	}
}
