//! `get` against the mock API server.

mod common;

use common::{cells, Harness, SSH_KEY};
use indoc::indoc;
use serde_json::json;

#[tokio::test]
async fn test_get_organizations_table() {
	let harness = Harness::start().await;
	let out = harness.run(&["get", "organizations"]).await.unwrap();
	assert_eq!(
		out,
		indoc! {"
			NAME     ID          NAMESPACE     STATUS
			acme     o-acme      org-acme      Provisioned
			globex   o-globex    org-globex    Provisioned
		"}
	);
}

#[tokio::test]
async fn test_get_organization_by_name_or_id() {
	let harness = Harness::start().await;
	for identifier in ["globex", "o-globex"] {
		let rows = harness.run_json(&["get", "org", identifier]).await;
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0]["id"], "o-globex");
	}
}

#[tokio::test]
async fn test_get_clusters_joins_names() {
	let harness = Harness::start().await;
	let rows = harness
		.run_json(&["get", "kc", "--organization", "acme"])
		.await;

	assert_eq!(rows.len(), 1);
	let row = &rows[0];
	assert_eq!(row["name"], "prod");
	assert_eq!(row["version"], "1.31.2");
	assert_eq!(row["status"], "Provisioned");
	assert_eq!(row["organization"], json!({"id": "o-acme", "name": "acme"}));
	assert_eq!(row["project"], json!({"id": "p-web", "name": "web"}));
	assert_eq!(row["region"], json!({"id": "r-uk", "name": "uk-north"}));
	assert_eq!(row["spec"]["clusterManagerId"], "cm-acme");
}

#[tokio::test]
async fn test_get_clusters_missing_names_fall_back_to_ids() {
	let harness = Harness::start().await;
	let rows = harness
		.run_json(&["get", "kc", "--organization", "globex"])
		.await;

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["name"], "staging");
	assert_eq!(rows[0]["project"], json!({"id": "", "name": ""}));
	assert_eq!(rows[0]["status"], "");
}

#[tokio::test]
async fn test_get_clusters_in_region_and_project() {
	let harness = Harness::start().await;

	let rows = harness.run_json(&["get", "kc", "--region", "uk-north"]).await;
	let mut names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
	names.sort_unstable();
	assert_eq!(names, ["prod", "staging"]);

	let rows = harness
		.run_json(&["get", "kc", "--organization", "acme", "--project", "web"])
		.await;
	assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_get_clusters_selected_columns() {
	let harness = Harness::start().await;
	let out = harness
		.run(&["get", "kc", "--organization", "acme", "--columns", "id,NAME"])
		.await
		.unwrap();
	assert_eq!(cells(&out), [vec!["ID", "NAME"], vec!["c-prod", "prod"]]);
}

#[tokio::test]
async fn test_get_clusters_unknown_column() {
	let harness = Harness::start().await;
	let err = harness.run_err(&["get", "kc", "--columns", "name,owner"]).await;
	assert!(err.contains("unknown column \"owner\""), "{err}");
}

#[tokio::test]
async fn test_scope_errors() {
	let harness = Harness::start().await;
	let err = harness.run_err(&["get", "kc", "--organization", "initech"]).await;
	assert!(err.contains("unable to find organization with name initech"), "{err}");

	let err = harness
		.run_err(&["get", "kc", "--organization", "globex", "--project", "web"])
		.await;
	assert!(err.contains("unable to find project with name web"), "{err}");

	let err = harness.run_err(&["get", "kc", "--region", "mars"]).await;
	assert!(err.contains("unable to find region with name mars"), "{err}");
}

#[tokio::test]
async fn test_get_instances_show_flavor_descriptions() {
	let harness = Harness::start().await;
	let rows = harness.run_json(&["get", "instances", "--region", "uk-north"]).await;

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["name"], "bastion");
	assert_eq!(rows[0]["flavor"], "4 CPUs, 16Gi");
	assert_eq!(rows[0]["region"]["name"], "uk-north");
}

#[tokio::test]
async fn test_get_networks() {
	let harness = Harness::start().await;
	let out = harness
		.run(&["get", "net", "--columns", "name,prefix,provider"])
		.await
		.unwrap();
	assert_eq!(
		cells(&out),
		[
			vec!["NAME", "PREFIX", "PROVIDER"],
			vec!["internal", "192.168.0.0/24", "openstack"],
		]
	);
}

#[tokio::test]
async fn test_get_regions_lists_flavors() {
	let harness = Harness::start().await;
	let rows = harness.run_json(&["get", "regions"]).await;
	assert_eq!(
		rows,
		[json!({
			"name": "uk-north",
			"id": "r-uk",
			"provider": "openstack",
			"flavors": ["4 CPUs, 16Gi", "32 CPUs, 256Gi, 2x NVIDIA H100"]
		})]
	);
}

#[tokio::test]
async fn test_get_cluster_managers_lists_clusters() {
	let harness = Harness::start().await;
	let rows = harness.run_json(&["get", "cm", "--organization", "acme"]).await;

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["id"], "cm-acme");
	assert_eq!(rows[0]["clusters"], json!(["prod"]));
	assert_eq!(rows[0]["namespace"], "project-web");
}

#[tokio::test]
async fn test_get_virtual_clusters() {
	let harness = Harness::start().await;

	let out = harness.run(&["get", "vkc", "--detail"]).await.unwrap();
	assert!(out.starts_with("---\n"), "{out}");
	assert!(out.contains("name: dev"), "{out}");

	let err = harness.run_err(&["get", "vkc", "qa"]).await;
	assert!(err.contains("virtual kubernetes cluster qa not found"), "{err}");
}

#[tokio::test]
async fn test_get_openstack_identities() {
	let harness = Harness::start().await;

	let rows = harness.run_json(&["get", "osi"]).await;
	assert_eq!(
		rows,
		[
			json!({
				"openstackIdentityId": "osi-prod",
				"kubernetesClusterId": "c-prod",
				"kubernetesClusterName": "prod"
			}),
			json!({
				"openstackIdentityId": "osi-staging",
				"kubernetesClusterId": "c-staging",
				"kubernetesClusterName": "staging"
			}),
		]
	);

	let rows = harness
		.run_json(&["get", "osi", "--kubernetescluster", "staging"])
		.await;
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["openstackIdentityId"], "osi-staging");

	let rows = harness
		.run_json(&["get", "osi", "--kubernetescluster", "prod"])
		.await;
	assert_eq!(
		rows,
		[json!({
			"openstackIdentityId": "osi-prod",
			"kubernetesClusterId": "c-prod",
			"kubernetesClusterName": "prod"
		})]
	);

	let err = harness
		.run_err(&["get", "osi", "--kubernetescluster", "qa"])
		.await;
	assert!(err.contains("unable to find kubernetes cluster with name qa"), "{err}");
}

#[tokio::test]
async fn test_get_ssh_key() {
	let harness = Harness::start().await;

	for cluster in ["prod", "c-prod"] {
		let out = harness.run(&["get", "sshkey", cluster]).await.unwrap();
		assert_eq!(out, SSH_KEY);
	}

	let err = harness.run_err(&["get", "sshkey", "staging"]).await;
	assert!(err.contains("OpenStack identity osi-staging has no SSH private key"), "{err}");

	let err = harness.run_err(&["get", "sshkey", "qa"]).await;
	assert!(
		err.contains("cluster 'qa' not found. Please provide a valid cluster name or ID"),
		"{err}"
	);
}

#[tokio::test]
async fn test_get_ssh_key_without_identity() {
	let mut resources = common::fixtures();
	resources.retain(|r| r["metadata"]["name"] != "osi-prod");
	let harness = Harness::with_resources(resources).await;

	let err = harness.run_err(&["get", "sshkey", "prod"]).await;
	assert!(err.contains("no OpenStack identity found for cluster c-prod"), "{err}");
}

#[tokio::test]
async fn test_get_users() {
	let harness = Harness::start().await;

	let rows = harness.run_json(&["get", "users"]).await;
	assert_eq!(
		rows,
		[
			json!({"namespace": "org-acme", "id": "ou-alice", "email": "alice@example.com", "organization": "acme"}),
			json!({"namespace": "org-globex", "id": "ou-bob", "email": "bob@example.com", "organization": "globex"}),
		]
	);

	let rows = harness.run_json(&["get", "users", "--organization", "globex"]).await;
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["email"], "bob@example.com");

	let rows = harness
		.run_json(&["get", "users", "--email", "alice@example.com"])
		.await;
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["organization"], "acme");

	let err = harness.run_err(&["get", "users", "--email", "carol@example.com"]).await;
	assert!(err.contains("unable to find user with email carol@example.com"), "{err}");
}

#[tokio::test]
async fn test_get_users_reports_dangling_memberships() {
	let mut resources = common::fixtures();
	resources.retain(|r| r["metadata"]["name"] != "u-bob");
	let harness = Harness::with_resources(resources).await;

	let err = harness.run_err(&["get", "users"]).await;
	assert!(
		err.contains("organization user ou-bob in namespace org-globex doesn't have corresponding user resource"),
		"{err}"
	);
}

#[tokio::test]
async fn test_get_projects() {
	let harness = Harness::start().await;
	let rows = harness.run_json(&["get", "projects", "--organization", "acme"]).await;

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["name"], "web");
	assert_eq!(rows[0]["organization"]["name"], "acme");
	assert_eq!(rows[0]["namespace"], "project-web");
}
