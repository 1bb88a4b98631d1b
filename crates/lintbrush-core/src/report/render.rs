use std::io::Write;

use crate::error::ReportError;
use crate::report::model::SarifReport;

/// Pretty-printed SARIF JSON, newline terminated.
pub fn render_sarif(report: &SarifReport) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

/// Write the pretty-printed report to `dest`.
pub fn write_sarif<W: Write>(report: &SarifReport, mut dest: W) -> Result<(), ReportError> {
    dest.write_all(render_sarif(report)?.as_bytes())?;
    dest.flush()?;
    Ok(())
}
