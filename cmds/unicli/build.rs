use std::process::Command;

fn main() {
	println!("cargo:rerun-if-changed=../../.git/HEAD");
	println!("cargo:rerun-if-changed=../../.git/refs/tags");
	println!("cargo:rerun-if-env-changed=UNICLI_RELEASE_VERSION");

	println!("cargo:rustc-env=UNICLI_VERSION={}", version());
}

/// Release builds pass the version explicitly; development builds describe
/// the checkout (`v0.3.1-4-gabc1234-dirty`), falling back to the crate version.
fn version() -> String {
	if let Ok(release) = std::env::var("UNICLI_RELEASE_VERSION") {
		return release.trim_start_matches('v').to_string();
	}

	git(&["describe", "--tags", "--always", "--dirty"])
		.map(|described| described.trim_start_matches('v').to_string())
		.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

fn git(args: &[&str]) -> Option<String> {
	let output = Command::new("git").args(args).output().ok()?;
	if !output.status.success() {
		return None;
	}
	let stdout = String::from_utf8(output.stdout).ok()?;
	let trimmed = stdout.trim();
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}
