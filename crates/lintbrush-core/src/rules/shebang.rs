use std::fs::File;
use std::io::Read;

use crate::error::LintError;
use crate::report::model::Region;
use crate::rules::catalog::{Level, RuleId};
use crate::rules::engine::{Finding, Rule, Target};

pub const RULE_ID: &str = "CHECK_EXECUTABLES_HAVE_SHEBANGS";

const MARKER: &[u8; 2] = b"#!";

/// Executable files must start with `#!`.
///
/// Files without any execute bit are never opened. An executable that is
/// shorter than the marker is a violation, not a read error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShebangRule;

impl Rule for ShebangRule {
    fn id(&self) -> RuleId {
        RuleId::from(RULE_ID)
    }

    fn name(&self) -> &'static str {
        "ExecutablesHaveShebangs"
    }

    fn description(&self) -> &'static str {
        "Executable files must begin with a shebang (`#!`) line."
    }

    fn help_uri(&self) -> &'static str {
        "https://github.com/northwood-labs/lintbrush#check_executables_have_shebangs"
    }

    fn level(&self) -> Level {
        Level::Error
    }

    fn evaluate(&self, target: &Target<'_>) -> Result<Vec<Finding>, LintError> {
        if !target.is_executable() {
            return Ok(Vec::new());
        }

        let file = File::open(target.path()).map_err(|source| LintError::Open {
            path: target.location.to_string(),
            source,
        })?;

        let mut leading = Vec::with_capacity(MARKER.len());
        file.take(MARKER.len() as u64)
            .read_to_end(&mut leading)
            .map_err(|source| LintError::Read {
                rule: self.id(),
                path: target.location.to_string(),
                len: MARKER.len(),
                source,
            })?;

        if leading == MARKER {
            return Ok(Vec::new());
        }

        Ok(vec![Finding {
            location: target.location.to_string(),
            message: format!(
                "file {} is executable, but begins with `{}` instead of `#!`.",
                target.location,
                escape_newlines(&leading)
            ),
            region: Some(Region::lines(1, 1)),
        }])
    }
}

fn escape_newlines(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\n', "\\n")
}
