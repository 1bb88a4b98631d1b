pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod language;
pub mod provenance;
pub mod report;
pub mod rules;

use tracing::info;

use crate::artifact::registry::ArtifactRegistry;
use crate::config::LintConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{LintError, ReportError};
use crate::report::builder::{self, RunContext};
use crate::report::model::SarifReport;
use crate::rules::engine;

pub const TOOL_NAME: &str = "lintbrush";

pub const INFORMATION_URI: &str = "https://github.com/northwood-labs/lintbrush";

/// SARIF format version of emitted reports.
pub const SARIF_VERSION: &str = "2.1.0";

pub const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// Everything one invocation produced.
#[derive(Debug)]
pub struct LintOutcome {
    /// Always present, even when the batch stopped early.
    pub report: SarifReport,
    /// Recoverable per-file errors, plus violations under
    /// [`ViolationPolicy::Accumulate`](config::ViolationPolicy::Accumulate).
    pub diagnostics: Diagnostics,
    /// The violation that stopped the batch under the default policy.
    pub violation: Option<LintError>,
}

/// Run the default rules over `paths` and assemble the SARIF report.
///
/// Rule findings and per-file errors are part of the outcome, not errors.
/// `Err` is only returned when the report itself cannot be built.
pub fn lint(
    paths: &[String],
    ctx: &RunContext,
    config: &LintConfig,
) -> Result<LintOutcome, ReportError> {
    let mut report = SarifReport::new(SARIF_VERSION)?;

    let mut run = builder::start_run(ctx);
    run.artifacts = ArtifactRegistry::with_sample_len(config.sample_len);

    let rules = engine::default_rules();
    engine::register_rules(&mut run, &rules);

    let mut diagnostics = Diagnostics::new();
    let violation = engine::evaluate(&mut run, &rules, paths, config, &mut diagnostics).err();

    builder::record_invocation(&mut run, ctx, &diagnostics);

    info!(
        artifacts = run.artifacts.len(),
        results = run.results.len(),
        diagnostics = diagnostics.len(),
        halted = violation.is_some(),
        "lint finished"
    );

    report.add_run(run);

    Ok(LintOutcome {
        report,
        diagnostics,
        violation,
    })
}
