use std::{collections::HashMap, io::Write};

use anyhow::{Context, Result};
use clap::Args;
use kube::ResourceExt;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use unikorn_apis::{
	Organization, OrganizationUser, UnikornResource, User, ORGANIZATION_LABEL, USER_LABEL,
};

use crate::{
	k8s::{list, LabelSet},
	output::{Column, Listing, OutputFlag, Printer},
	scope::{self, EmailFlag, OrganizationFlag, Scope},
	session::Session,
};

/// Organization users must point at existing users and organizations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
	#[error(
		"consistency error: organization user {name} in namespace {namespace} doesn't have corresponding user resource"
	)]
	MissingUser { name: String, namespace: String },

	#[error(
		"consistency error: organization user {name} in namespace {namespace} doesn't have corresponding organization resource"
	)]
	MissingOrganization { name: String, namespace: String },
}

#[derive(Args, Debug)]
pub struct UserArgs {
	#[command(flatten)]
	pub organization: OrganizationFlag,

	#[command(flatten)]
	pub email: EmailFlag,

	#[command(flatten)]
	pub output: OutputFlag,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserRow {
	pub namespace: String,
	pub id: String,
	pub email: String,
	pub organization: String,
}

impl Listing for UserRow {
	const COLUMNS: &'static [Column] = &[
		Column::shown("namespace"),
		Column::shown("id"),
		Column::shown("email"),
		Column::shown("organization"),
	];

	fn cells(&self) -> Vec<String> {
		vec![
			self.namespace.clone(),
			self.id.clone(),
			self.email.clone(),
			self.organization.clone(),
		]
	}
}

/// Join organization users with their user and organization.
pub fn rows(
	organization_users: &[OrganizationUser],
	users: &[User],
	organizations: &[Organization],
	email: Option<&str>,
) -> Result<Vec<UserRow>, ConsistencyError> {
	let users: HashMap<String, &User> = users.iter().map(|u| (u.name_any(), u)).collect();
	let organizations: HashMap<String, &Organization> =
		organizations.iter().map(|o| (o.name_any(), o)).collect();

	let mut rows = Vec::new();
	for organization_user in organization_users {
		let name = organization_user.name_any();
		let namespace = organization_user.namespace().unwrap_or_default();

		let user = users
			.get(organization_user.label(USER_LABEL))
			.ok_or_else(|| ConsistencyError::MissingUser {
				name: name.clone(),
				namespace: namespace.clone(),
			})?;

		if email.is_some_and(|email| user.spec.subject != email) {
			continue;
		}

		let organization = organizations
			.get(organization_user.label(ORGANIZATION_LABEL))
			.ok_or_else(|| ConsistencyError::MissingOrganization {
				name: name.clone(),
				namespace: namespace.clone(),
			})?;

		rows.push(UserRow {
			namespace,
			id: name,
			email: user.spec.subject.clone(),
			organization: organization.display_name().to_string(),
		});
	}
	Ok(rows)
}

#[instrument(skip_all)]
pub async fn run<W: Write>(args: UserArgs, session: &Session, writer: W) -> Result<()> {
	let printer = Printer::new::<UserRow>(&args.output, &[])?;
	let client = session.client();

	let scope = Scope::resolve(
		session,
		args.organization.organization.as_deref(),
		None,
		None,
	)
	.await?;
	if let Some(email) = &args.email.email {
		scope::resolve_user(client, &session.identity_namespace, email).await?;
	}

	let users: Vec<User> = list::list_cluster_wide(client, &LabelSet::new())
		.await
		.context("failed to list users")?;
	let organizations: Vec<Organization> = list::list_cluster_wide(client, &LabelSet::new())
		.await
		.context("failed to list organizations")?;
	let organization_users: Vec<OrganizationUser> =
		list::list_cluster_wide(client, &scope.labels())
			.await
			.context("failed to list organization users")?;

	let rows = rows(
		&organization_users,
		&users,
		&organizations,
		args.email.email.as_deref(),
	)?;

	printer.print(writer, &rows)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use assert_matches::assert_matches;
	use unikorn_apis::{
		identity::{OrganizationSpec, OrganizationUserSpec, UserSpec, UserState},
		NAME_LABEL,
	};

	use super::*;

	fn user(id: &str, email: &str) -> User {
		User::new(
			id,
			UserSpec {
				subject: email.to_string(),
				state: UserState::Active,
			},
		)
	}

	fn organization(id: &str, name: &str) -> Organization {
		let mut organization = Organization::new(id, OrganizationSpec::default());
		organization
			.labels_mut()
			.insert(NAME_LABEL.to_string(), name.to_string());
		organization
	}

	fn organization_user(id: &str, user: &str, organization: &str) -> OrganizationUser {
		let mut organization_user = OrganizationUser::new(id, OrganizationUserSpec::default());
		organization_user.metadata.namespace = Some("org-ns".to_string());
		organization_user.metadata.labels = Some(BTreeMap::from([
			(USER_LABEL.to_string(), user.to_string()),
			(ORGANIZATION_LABEL.to_string(), organization.to_string()),
		]));
		organization_user
	}

	#[test]
	fn test_rows_join_and_filter_by_email() {
		let users = [user("u1", "a@example.com"), user("u2", "b@example.com")];
		let organizations = [organization("o1", "acme")];
		let organization_users = [
			organization_user("ou1", "u1", "o1"),
			organization_user("ou2", "u2", "o1"),
		];

		let all = rows(&organization_users, &users, &organizations, None).unwrap();
		assert_eq!(all.len(), 2);
		assert_eq!(
			all[0],
			UserRow {
				namespace: "org-ns".to_string(),
				id: "ou1".to_string(),
				email: "a@example.com".to_string(),
				organization: "acme".to_string(),
			}
		);

		let filtered =
			rows(&organization_users, &users, &organizations, Some("b@example.com")).unwrap();
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].id, "ou2");
	}

	#[test]
	fn test_missing_user_is_a_consistency_error() {
		let result = rows(
			&[organization_user("ou1", "gone", "o1")],
			&[],
			&[organization("o1", "acme")],
			None,
		);
		assert_matches!(result, Err(ConsistencyError::MissingUser { name, .. }) if name == "ou1");
	}

	#[test]
	fn test_missing_organization_is_a_consistency_error() {
		let result = rows(
			&[organization_user("ou1", "u1", "gone")],
			&[user("u1", "a@example.com")],
			&[],
			None,
		);
		assert_eq!(
			result.unwrap_err().to_string(),
			"consistency error: organization user ou1 in namespace org-ns doesn't have corresponding organization resource"
		);
	}
}
