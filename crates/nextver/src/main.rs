//! nextver CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use nextver::{Cli, output};
use nextver_core::{pipeline, release, score};
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = observability::env_filter(cli.quiet, cli.verbose, "warn");
    observability::init(filter).context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        repo_root = %cli.repo_root,
        "CLI initialized"
    );

    let opts = cli.analysis_options();
    let analysis = pipeline::run(&opts);

    // Mutations are hard failures: report and exit before any output.
    let release_opts = cli.release_options();
    if release_opts.requested() {
        let new_version = analysis
            .next_version
            .clone()
            .unwrap_or_else(|| analysis.current_version.clone());
        if let Err(e) = release::perform(
            &release_opts,
            &opts.repo_root,
            &new_version,
            &analysis.current_version,
        ) {
            eprintln!("Error: {e}.");
            std::process::exit(e.exit_code());
        }
    }

    use std::io::Write;
    print!("{}", output::render(cli.output_mode(), &analysis));
    std::io::stdout().flush().context("failed to flush stdout")?;

    std::process::exit(score::exit_code(
        analysis.suggestion,
        cli.suggest_only,
        cli.strict_status,
        cli.json,
    ));
}
