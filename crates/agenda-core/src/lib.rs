pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use std::ffi::OsString;
use std::io::Write;

use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting agenda CLI"
  );
  debug!(
    overrides = cli.overrides.len(),
    "parsed config overrides"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .overrides
      .into_iter()
      .map(|over| {
        (over.key, over.value)
      })
  )?;

  let renderer = render::Renderer::new(
    !cli.no_color,
    cli.json
  );

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  commands::dispatch(
    &cfg,
    &renderer,
    cli.command,
    &mut out
  )?;
  out.flush()?;

  info!("done");
  Ok(())
}
