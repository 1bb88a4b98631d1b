use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use lintbrush_core::config::{LintConfig, ViolationPolicy};
use lintbrush_core::report::builder::{RunContext, ToolInfo};
use lintbrush_core::report::render;
use lintbrush_core::{INFORMATION_URI, TOOL_NAME, lint};

mod args;

fn main() -> Result<()> {
    let args = args::Args::parse();

    init_logging(args.verbose);

    if args.files.is_empty() {
        error!("No files to lint");
        std::process::exit(1);
    }

    if !args.sarif {
        debug!("--sarif not given; SARIF is the only output format");
    }

    let ctx = RunContext::detect(ToolInfo {
        name: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        information_uri: INFORMATION_URI.to_string(),
    });

    let config = LintConfig {
        policy: if args.keep_going {
            ViolationPolicy::Accumulate
        } else {
            ViolationPolicy::Halt
        },
        ..LintConfig::default()
    };

    let outcome = lint(&args.files, &ctx, &config).context("build report")?;

    for err in &outcome.diagnostics {
        error!("{err}");
    }
    if let Some(violation) = &outcome.violation {
        error!("{violation}");
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            render::write_sarif(&outcome.report, BufWriter::new(file))
                .with_context(|| format!("write report to {}", path.display()))?;
        }
        None => {
            render::write_sarif(&outcome.report, std::io::stdout().lock())
                .context("write report to stdout")?;
        }
    }

    Ok(())
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}
