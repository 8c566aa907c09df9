//! `completion`: print a static completion script.
//!
//! Scripts printed here complete subcommands and flags. Resource names are
//! completed by the dynamic script, `source <(COMPLETE=bash unicli)`.

use std::io::Write;

use clap::{Args, Command};
use clap_complete::{generate, Shell};

#[derive(Args, Debug)]
pub struct CompletionArgs {
	/// Shell to generate completions for
	#[arg(value_enum)]
	pub shell: Shell,
}

pub fn run<W: Write>(args: CompletionArgs, command: &mut Command, mut writer: W) {
	let name = command.get_name().to_owned();
	generate(args.shell, command, name, &mut writer);
}
