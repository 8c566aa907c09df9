use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use unicli::{
	cli::{self, Cli},
	commands::util::BrokenPipeGuard,
	telemetry,
};

#[cfg(all(
	target_os = "linux",
	feature = "mimalloc",
	not(feature = "system-alloc")
))]
#[global_allocator]
static GLOBAL: mimallocator::Mimalloc = mimallocator::Mimalloc;

fn main() -> Result<()> {
	// Answers `COMPLETE=<shell> unicli ...` and exits.
	CompleteEnv::with_factory(Cli::command).complete();

	let cli = Cli::parse();

	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()
		.context("failed to start the async runtime")?;
	let _runtime = runtime.enter();

	let _telemetry = telemetry::init(cli.global.log_level)?;

	let stdout = BrokenPipeGuard::new(std::io::stdout());
	runtime.block_on(cli::run(cli, stdout))
}
