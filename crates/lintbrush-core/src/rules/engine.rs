//! Rule capability and batch evaluation.
//!
//! Every input path goes through the same steps, strictly in input order:
//!
//! 1. `lstat` the path. Paths that cannot be stat'ed are skipped silently.
//! 2. Register the artifact (always, whatever the rules decide).
//! 3. Evaluate every rule against it.
//!
//! Rule errors (`Open` / `Read`) are appended to the caller's
//! [`Diagnostics`]. Findings become SARIF results and, depending on the
//! [`ViolationPolicy`], either end the batch or are appended as well.

use std::fs::{self, Metadata};
use std::path::Path;

use tracing::{debug, info};

use crate::config::{LintConfig, ViolationPolicy};
use crate::diagnostics::Diagnostics;
use crate::error::LintError;
use crate::report::model::{
    Location, Message, Region, ReportingConfiguration, ReportingDescriptor, Run, SarifResult,
};
use crate::rules::catalog::{Level, RuleId};
use crate::rules::shebang::ShebangRule;

/// An input path together with its `lstat` metadata.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub location: &'a str,
    pub metadata: &'a Metadata,
}

impl Target<'_> {
    pub fn path(&self) -> &Path {
        Path::new(self.location)
    }

    /// True when any of the owner, group or other execute bits is set.
    #[cfg(unix)]
    pub fn is_executable(&self) -> bool {
        use std::os::unix::fs::PermissionsExt;
        self.metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    pub fn is_executable(&self) -> bool {
        false
    }
}

/// One problem a rule found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub location: String,
    pub message: String,
    pub region: Option<Region>,
}

pub trait Rule {
    fn id(&self) -> RuleId;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn help_uri(&self) -> &'static str;

    fn level(&self) -> Level {
        Level::Warning
    }

    /// Check one target. `Err` is a recoverable per-file problem; findings
    /// are returned in `Ok`.
    fn evaluate(&self, target: &Target<'_>) -> Result<Vec<Finding>, LintError>;

    fn descriptor(&self) -> ReportingDescriptor {
        ReportingDescriptor {
            id: self.id(),
            name: self.name().to_string(),
            short_description: Message::text(self.description()),
            help_uri: self.help_uri().to_string(),
            default_configuration: ReportingConfiguration {
                level: self.level(),
            },
        }
    }
}

/// The rules lintbrush runs by default.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(ShebangRule)]
}

/// List every rule under `tool.driver.rules`.
pub fn register_rules(run: &mut Run, rules: &[Box<dyn Rule>]) {
    for rule in rules {
        run.add_rule(rule.descriptor());
    }
}

/// Evaluate `rules` over `paths`, recording artifacts and results into `run`.
///
/// Returns `Err` only for a violation under [`ViolationPolicy::Halt`]; that
/// violation is the first one found and the remaining paths are not visited.
pub fn evaluate(
    run: &mut Run,
    rules: &[Box<dyn Rule>],
    paths: &[String],
    config: &LintConfig,
    diagnostics: &mut Diagnostics,
) -> Result<(), LintError> {
    info!(files = paths.len(), rules = rules.len(), "evaluating rules");

    for location in paths {
        let metadata = match fs::symlink_metadata(location) {
            Ok(m) => m,
            Err(err) => {
                debug!(path = %location, error = %err, "skipping input that cannot be stat'ed");
                continue;
            }
        };

        run.artifacts.record(location, &metadata);

        let target = Target {
            location,
            metadata: &metadata,
        };

        for rule in rules {
            let findings = match rule.evaluate(&target) {
                Ok(findings) => findings,
                Err(err) => {
                    debug!(path = %location, rule = %rule.id(), error = %err, "rule could not check file");
                    diagnostics.push(err);
                    continue;
                }
            };

            for finding in findings {
                let violation = record_finding(run, rule.as_ref(), finding);
                match config.policy {
                    ViolationPolicy::Halt => return Err(violation),
                    ViolationPolicy::Accumulate => diagnostics.push(violation),
                }
            }
        }
    }

    Ok(())
}

fn record_finding(run: &mut Run, rule: &dyn Rule, finding: Finding) -> LintError {
    let id = rule.id();

    run.add_result(SarifResult {
        rule_index: run.rule_index(&id),
        rule_id: id.clone(),
        level: rule.level(),
        message: Message::text(finding.message.clone()),
        locations: vec![Location::new(
            &finding.location,
            run.artifacts.position(&finding.location),
            finding.region,
        )],
    });

    LintError::Violation {
        rule: id,
        path: finding.location,
        message: finding.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFinds;

    impl Rule for AlwaysFinds {
        fn id(&self) -> RuleId {
            RuleId::from("ALWAYS")
        }
        fn name(&self) -> &'static str {
            "Always"
        }
        fn description(&self) -> &'static str {
            "finds something in every file"
        }
        fn help_uri(&self) -> &'static str {
            "https://example.com/always"
        }
        fn evaluate(&self, target: &Target<'_>) -> Result<Vec<Finding>, LintError> {
            Ok(vec![Finding {
                location: target.location.to_string(),
                message: format!("found in {}", target.location),
                region: None,
            }])
        }
    }

    fn files(dir: &Path, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| {
                let p = dir.join(n);
                fs::write(&p, b"x").unwrap();
                p.display().to_string()
            })
            .collect()
    }

    fn run_with(rules: &[Box<dyn Rule>]) -> Run {
        let mut run = Run::new("t", "u");
        register_rules(&mut run, rules);
        run
    }

    #[test]
    fn descriptor_defaults_to_warning() {
        let d = AlwaysFinds.descriptor();
        assert_eq!(d.id, RuleId::from("ALWAYS"));
        assert_eq!(d.default_configuration.level, Level::Warning);
        assert_eq!(d.short_description.text, "finds something in every file");
    }

    #[test]
    fn halt_stops_at_first_finding() {
        let dir = tempfile::tempdir().unwrap();
        let paths = files(dir.path(), &["a", "b"]);
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(AlwaysFinds)];
        let mut run = run_with(&rules);
        let mut diags = Diagnostics::new();

        let err = evaluate(&mut run, &rules, &paths, &LintConfig::default(), &mut diags)
            .unwrap_err();

        assert_eq!(err.path(), paths[0]);
        assert_eq!(run.artifacts.len(), 1);
        assert_eq!(run.results.len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn accumulate_visits_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = files(dir.path(), &["a", "b", "c"]);
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(AlwaysFinds)];
        let mut run = run_with(&rules);
        let mut diags = Diagnostics::new();
        let config = LintConfig {
            policy: ViolationPolicy::Accumulate,
            ..LintConfig::default()
        };

        evaluate(&mut run, &rules, &paths, &config, &mut diags).unwrap();

        assert_eq!(run.artifacts.len(), 3);
        assert_eq!(run.results.len(), 3);
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(LintError::is_violation));
        assert_eq!(run.results[2].rule_index, Some(0));
    }

    #[test]
    fn missing_paths_are_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = vec![dir.path().join("ghost").display().to_string()];
        paths.extend(files(dir.path(), &["real"]));
        let rules: Vec<Box<dyn Rule>> = Vec::new();
        let mut run = run_with(&rules);
        let mut diags = Diagnostics::new();

        evaluate(&mut run, &rules, &paths, &LintConfig::default(), &mut diags).unwrap();

        assert_eq!(run.artifacts.len(), 1);
        assert_eq!(run.artifacts.position(&paths[1]), Some(0));
        assert!(diags.is_empty());
    }

    #[test]
    fn duplicate_inputs_register_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = files(dir.path(), &["a"]).remove(0);
        let paths = vec![a.clone(), a.clone()];
        let rules: Vec<Box<dyn Rule>> = Vec::new();
        let mut run = run_with(&rules);
        let mut diags = Diagnostics::new();

        evaluate(&mut run, &rules, &paths, &LintConfig::default(), &mut diags).unwrap();
        assert_eq!(run.artifacts.len(), 1);
    }

    #[test]
    fn result_points_at_artifact_index() {
        let dir = tempfile::tempdir().unwrap();
        let paths = files(dir.path(), &["a"]);
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(AlwaysFinds)];
        let mut run = run_with(&rules);
        let mut diags = Diagnostics::new();

        let _ = evaluate(&mut run, &rules, &paths, &LintConfig::default(), &mut diags);

        let json = serde_json::to_value(&run.results[0]).unwrap();
        assert_eq!(json["ruleId"], "ALWAYS");
        assert_eq!(json["level"], "warning");
        assert_eq!(
            json["locations"][0]["physicalLocation"]["artifactLocation"]["index"],
            0
        );
    }
}
