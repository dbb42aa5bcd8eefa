//! CLI entry point for building a community hierarchy.
//!
//! Parses command-line arguments with clap, runs the pipeline, prints the
//! hierarchy as a one-element JSON array on stdout and exits with code 2
//! after printing `Caught exception: <message>` on stderr when anything
//! fails. Logging is initialised eagerly so every stage can emit structured
//! diagnostics via `tracing`.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use nestor_cli::{
    cli::{Cli, CliError, render_hierarchy, run_cli},
    logging,
};
use tracing::{error, field};

const FAILURE_EXIT_CODE: u8 = 2;

/// Parse CLI arguments, build the hierarchy and print it. Output is fully
/// rendered before anything reaches stdout.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let hierarchy = run_cli(&cli)?;
    let mut rendered = Vec::new();
    render_hierarchy(&hierarchy, &mut rendered).context("failed to render hierarchy")?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writer
        .write_all(&rendered)
        .context("failed to write hierarchy")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_failure(&err);
        return ExitCode::from(FAILURE_EXIT_CODE);
    }

    if let Err(err) = try_main() {
        let core = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
            CliError::Core(core) => Some(core),
            _ => None,
        });
        let code_field = core.map(|core| field::display(core.code().as_str()));
        let stage_field = core.map(|core| field::display(core.stage()));
        let producer_code_field = core
            .and_then(|core| core.producer_code())
            .map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code = code_field,
            stage = stage_field,
            producer_code = producer_code_field,
            "command execution failed"
        );
        report_failure(&err);
        return ExitCode::from(FAILURE_EXIT_CODE);
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "The failure line on stderr is part of the command's contract"
)]
fn report_failure(message: &dyn std::fmt::Display) {
    eprintln!("Caught exception: {message}");
}
