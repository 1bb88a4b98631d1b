use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifact::registry::ArtifactRegistry;
use crate::error::ReportError;
use crate::rules::catalog::{Level, RuleId};
use crate::{SARIF_SCHEMA, SARIF_VERSION};

/// Top-level SARIF log.
///
/// Only the subset of SARIF 2.1.0 that lintbrush emits is modelled. Field
/// names follow the SARIF camelCase property names.
#[derive(Debug, Serialize)]
pub struct SarifReport {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<Run>,
}

impl SarifReport {
    /// Create an empty log for the given format version.
    ///
    /// Only `2.1.0` is supported.
    pub fn new(version: &str) -> Result<Self, ReportError> {
        if version != SARIF_VERSION {
            return Err(ReportError::UnsupportedVersion(version.to_string()));
        }

        Ok(Self {
            schema: SARIF_SCHEMA.to_string(),
            version: version.to_string(),
            runs: Vec::new(),
        })
    }

    pub fn add_run(&mut self, run: Run) -> &mut Self {
        self.runs.push(run);
        self
    }
}

/// One execution of the linter over one batch of inputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub tool: Tool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<Invocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_details: Option<RunAutomationDetails>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub version_control_provenance: Vec<VersionControlDetails>,
    pub artifacts: ArtifactRegistry,
    pub results: Vec<SarifResult>,
}

impl Run {
    pub fn new(tool_name: &str, information_uri: &str) -> Self {
        Self {
            tool: Tool {
                driver: ToolComponent {
                    name: tool_name.to_string(),
                    semantic_version: None,
                    information_uri: information_uri.to_string(),
                    rules: Vec::new(),
                },
            },
            invocations: Vec::new(),
            automation_details: None,
            version_control_provenance: Vec::new(),
            artifacts: ArtifactRegistry::new(),
            results: Vec::new(),
        }
    }

    pub fn with_semantic_version(mut self, version: &str) -> Self {
        self.tool.driver.semantic_version = Some(version.to_string());
        self
    }

    pub fn with_automation_details(mut self, details: RunAutomationDetails) -> Self {
        self.automation_details = Some(details);
        self
    }

    pub fn add_version_control_provenance(&mut self, details: VersionControlDetails) {
        self.version_control_provenance.push(details);
    }

    pub fn add_rule(&mut self, rule: ReportingDescriptor) {
        self.tool.driver.rules.push(rule);
    }

    /// Index of a rule in `tool.driver.rules`.
    pub fn rule_index(&self, id: &RuleId) -> Option<usize> {
        self.tool.driver.rules.iter().position(|r| &r.id == id)
    }

    pub fn add_result(&mut self, result: SarifResult) {
        self.results.push(result);
    }
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub driver: ToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolComponent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
    pub information_uri: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ReportingDescriptor>,
}

/// Rule metadata as listed under `tool.driver.rules`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingDescriptor {
    pub id: RuleId,
    pub name: String,
    pub short_description: Message,
    pub help_uri: String,
    pub default_configuration: ReportingConfiguration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportingConfiguration {
    pub level: Level,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub text: String,
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A file referenced by the run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub location: ArtifactLocation,
    pub length: u64,
    /// Keyed by algorithm name, e.g. `sha-256`. Empty when hashing failed.
    pub hashes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    pub uri: String,
}

/// A single rule verdict against one artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: RuleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    pub level: Level,
    pub message: Message,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub physical_location: PhysicalLocation,
}

impl Location {
    pub fn new(uri: &str, artifact_index: Option<usize>, region: Option<Region>) -> Self {
        Self {
            physical_location: PhysicalLocation {
                artifact_location: ResultArtifactLocation {
                    uri: uri.to_string(),
                    index: artifact_index,
                },
                region,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    pub artifact_location: ResultArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

/// Artifact reference from a result; `index` points into `run.artifacts`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultArtifactLocation {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

impl Region {
    pub fn lines(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line: Some(end_line),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAutomationDetails {
    pub description: Message,
    pub id: String,
    pub correlation_guid: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionControlDetails {
    pub repository_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    pub as_of_time_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub execution_successful: bool,
    pub start_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_execution_notifications: Vec<Notification>,
}

/// A tool-side problem that is not a rule result, such as an unreadable file.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: Message,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}
