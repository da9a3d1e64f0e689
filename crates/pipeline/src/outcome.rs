use cleansheet_core::Table;
use serde::{Deserialize, Serialize};

/// Whether a command applied successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Failed,
}

/// The per-command record produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub kind: String,
    pub status: OutcomeStatus,
    /// Rows removed or changed by a successful command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CommandOutcome {
    /// Record a successful command
    #[must_use]
    pub fn ok(kind: &str, affected: u64) -> Self {
        CommandOutcome {
            kind: kind.to_string(),
            status: OutcomeStatus::Ok,
            affected: Some(affected),
            reason: None,
        }
    }

    /// Record a failed command
    #[must_use]
    pub fn failed<R: Into<String>>(kind: &str, reason: R) -> Self {
        CommandOutcome {
            kind: kind.to_string(),
            status: OutcomeStatus::Failed,
            affected: None,
            reason: Some(reason.into()),
        }
    }

    /// Check if the command succeeded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

/// The table after applying a command sequence, plus the ordered outcome
/// for every command that was attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub table: Table,
    pub outcomes: Vec<CommandOutcome>,
}

impl PipelineResult {
    /// Count the commands that failed
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_outcome_json() {
        let outcome = CommandOutcome::ok("trim", 3);
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"kind":"trim","status":"ok","affected":3}"#);
    }

    #[test]
    fn test_failed_outcome_json() {
        let outcome = CommandOutcome::failed("trim", "column 9 out of range (table has 2 columns)");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("affected").is_none());
        assert!(json["reason"].as_str().unwrap().contains("out of range"));
    }
}
