//! Report assembly around an explicit, per-invocation [`RunContext`].

use chrono::{DateTime, Utc};

use crate::diagnostics::Diagnostics;
use crate::provenance::Provenance;
use crate::report::model::{
    Invocation, Location, Message, Notification, Run, RunAutomationDetails,
};
use crate::rules::catalog::Level;

/// Tool metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub information_uri: String,
}

/// Everything that identifies one invocation: who ran, when, and under
/// which correlation id. Built once and handed to the builder.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub tool: ToolInfo,
    pub started_at: DateTime<Utc>,
    /// Read once, when the batch finishes.
    pub clock: fn() -> DateTime<Utc>,
    pub correlation_guid: String,
    pub provenance: Option<Provenance>,
}

impl RunContext {
    /// Fresh context: current time and a new 20-character xid.
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            tool,
            started_at: Utc::now(),
            clock: Utc::now,
            correlation_guid: xid::new().to_string(),
            provenance: None,
        }
    }

    /// Like [`RunContext::new`], with provenance read from the environment.
    pub fn detect(tool: ToolInfo) -> Self {
        Self::new(tool).with_provenance(Provenance::from_env())
    }

    pub fn with_provenance(mut self, provenance: Option<Provenance>) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn description(&self) -> String {
        format!(
            "This scan was run with {} v{} on {}.",
            self.tool.name,
            self.tool.version,
            self.started_at.to_rfc3339()
        )
    }

    pub fn automation_id(&self) -> String {
        let (repository, branch) = match &self.provenance {
            Some(p) => (p.repository.as_str(), p.branch.as_deref().unwrap_or("unknown")),
            None => ("local", "unknown"),
        };
        format!(
            "{} run for {}/{}/{}",
            self.tool.name,
            repository,
            branch,
            self.started_at.format("%Y-%m-%d")
        )
    }
}

/// Create the run for this invocation, with tool identity, automation
/// details and provenance filled in. Artifacts and results start empty.
pub fn start_run(ctx: &RunContext) -> Run {
    let mut run = Run::new(&ctx.tool.name, &ctx.tool.information_uri)
        .with_semantic_version(&ctx.tool.version)
        .with_automation_details(RunAutomationDetails {
            description: Message::text(ctx.description()),
            id: ctx.automation_id(),
            correlation_guid: ctx.correlation_guid.clone(),
        });

    if let Some(provenance) = &ctx.provenance {
        run.add_version_control_provenance(provenance.to_sarif(ctx.started_at));
    }

    run
}

/// Attach the invocation record, stamping the end time from `ctx.clock`.
/// Every diagnostic that is not a rule violation becomes a tool execution
/// notification; violations are already results.
pub fn record_invocation(run: &mut Run, ctx: &RunContext, diagnostics: &Diagnostics) {
    let notifications: Vec<Notification> = diagnostics
        .iter()
        .filter(|err| !err.is_violation())
        .map(|err| Notification {
            level: Level::Error,
            message: Message::text(err.to_string()),
            locations: vec![Location::new(
                err.path(),
                run.artifacts.position(err.path()),
                None,
            )],
        })
        .collect();

    run.invocations.push(Invocation {
        execution_successful: notifications.is_empty(),
        start_time_utc: ctx.started_at,
        end_time_utc: (ctx.clock)(),
        tool_execution_notifications: notifications,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LintError;
    use crate::rules::catalog::RuleId;
    use std::io;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn finished_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T05:06:09Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ctx() -> RunContext {
        RunContext {
            tool: ToolInfo {
                name: "lintbrush".into(),
                version: "0.1.0".into(),
                information_uri: "https://github.com/northwood-labs/lintbrush".into(),
            },
            started_at: fixed_time(),
            clock: finished_time,
            correlation_guid: "cnh5qv8c8t4e0ff2fhk0".into(),
            provenance: None,
        }
    }

    #[test]
    fn new_context_draws_unique_correlation_ids() {
        let tool = ctx().tool;
        let a = RunContext::new(tool.clone());
        let b = RunContext::new(tool);

        assert_eq!(a.correlation_guid.len(), 20);
        assert_ne!(a.correlation_guid, b.correlation_guid);
    }

    #[test]
    fn start_run_fills_tool_and_automation() {
        let run = start_run(&ctx());
        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["tool"]["driver"]["name"], "lintbrush");
        assert_eq!(json["tool"]["driver"]["semanticVersion"], "0.1.0");
        assert_eq!(
            json["automationDetails"]["description"]["text"],
            "This scan was run with lintbrush v0.1.0 on 2024-03-04T05:06:07+00:00."
        );
        assert_eq!(
            json["automationDetails"]["id"],
            "lintbrush run for local/unknown/2024-03-04"
        );
        assert_eq!(
            json["automationDetails"]["correlationGuid"],
            "cnh5qv8c8t4e0ff2fhk0"
        );
        assert!(json.get("versionControlProvenance").is_none());
    }

    #[test]
    fn provenance_is_attached_when_known() {
        let ctx = ctx().with_provenance(Some(Provenance {
            repository: "acme/tools".into(),
            repository_uri: "https://github.com/acme/tools".into(),
            branch: Some("main".into()),
            revision: None,
        }));
        let run = start_run(&ctx);

        assert_eq!(run.version_control_provenance.len(), 1);
        assert_eq!(
            run.automation_details.unwrap().id,
            "lintbrush run for acme/tools/main/2024-03-04"
        );
    }

    #[test]
    fn invocation_lists_non_violation_diagnostics() {
        let ctx = ctx();
        let mut run = start_run(&ctx);
        let mut diags = Diagnostics::new();
        diags.push(LintError::Open {
            path: "a".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        diags.push(LintError::Violation {
            rule: RuleId::from("R"),
            path: "b".into(),
            message: "m".into(),
        });

        record_invocation(&mut run, &ctx, &diags);

        let inv = &run.invocations[0];
        assert!(!inv.execution_successful);
        assert_eq!(inv.tool_execution_notifications.len(), 1);
        assert!(inv.tool_execution_notifications[0].message.text.contains("`a`"));
    }

    #[test]
    fn clean_invocation_is_successful() {
        let ctx = ctx();
        let mut run = start_run(&ctx);
        record_invocation(&mut run, &ctx, &Diagnostics::new());

        let json = serde_json::to_value(&run.invocations).unwrap();
        assert_eq!(json[0]["executionSuccessful"], true);
        assert_eq!(json[0]["startTimeUtc"], "2024-03-04T05:06:07Z");
        assert_eq!(json[0]["endTimeUtc"], "2024-03-04T05:06:09Z");
        assert!(json[0].get("toolExecutionNotifications").is_none());
    }
}
