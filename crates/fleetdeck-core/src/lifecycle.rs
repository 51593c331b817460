//! Health check lifecycle
//!
//! ```text
//! pending ──► approved ──► executing ──► completed
//!    │                         │
//!    └──► rejected             └──► failed
//! ```
//!
//! `rejected`, `completed` and `failed` are terminal. A failed check is never
//! retried in place; the backend opens a new check instead.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::types::{CheckStatus, ExecutionResult, HealthCheck};

/// A reviewer's verdict on a pending check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> CheckStatus {
        match self {
            ReviewDecision::Approve => CheckStatus::Approved,
            ReviewDecision::Reject => CheckStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject => "reject",
        }
    }
}

impl CheckStatus {
    pub fn can_transition_to(&self, next: &CheckStatus) -> bool {
        matches!(
            (self, next),
            (CheckStatus::Pending, CheckStatus::Approved)
                | (CheckStatus::Pending, CheckStatus::Rejected)
                | (CheckStatus::Approved, CheckStatus::Executing)
                | (CheckStatus::Executing, CheckStatus::Completed)
                | (CheckStatus::Executing, CheckStatus::Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckStatus::Rejected | CheckStatus::Completed | CheckStatus::Failed
        )
    }
}

impl HealthCheck {
    fn transition(&mut self, next: CheckStatus) -> Result<()> {
        if !self.status.can_transition_to(&next) {
            return Err(Error::transition(&self.status, &next));
        }
        self.status = next;
        Ok(())
    }

    /// Apply a reviewer decision to a pending check
    pub fn review(&mut self, decision: ReviewDecision, at: DateTime<Utc>) -> Result<()> {
        self.transition(decision.target_status())?;
        self.reviewed_at = Some(at);
        Ok(())
    }

    /// Mark an approved check as running
    pub fn begin_execution(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.transition(CheckStatus::Executing)?;
        self.executed_at = Some(at);
        Ok(())
    }

    /// Record the results of one execute call and settle the status.
    ///
    /// The check completes only if every result in `results` succeeded; a
    /// single failure fails the whole check even when the others passed.
    pub fn finish_execution(&mut self, results: Vec<ExecutionResult>, at: DateTime<Utc>) -> Result<()> {
        let next = if results.iter().all(|r| r.success) {
            CheckStatus::Completed
        } else {
            CheckStatus::Failed
        };
        self.transition(next)?;
        self.execution_results.extend(results);
        self.completed_at = Some(at);
        Ok(())
    }

    /// Approve/Reject controls are offered only for pending checks with actions
    pub fn can_review(&self) -> bool {
        self.status == CheckStatus::Pending && !self.proposed_actions.is_empty()
    }

    /// Execute controls are offered only for approved checks with actions
    pub fn can_execute(&self) -> bool {
        self.status == CheckStatus::Approved && !self.proposed_actions.is_empty()
    }
}

/// Tabs of the health check list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckTab {
    #[default]
    All,
    Pending,
    /// approved or executing
    Approved,
    /// completed or failed
    Completed,
}

impl CheckTab {
    pub const ALL: [CheckTab; 4] = [
        CheckTab::All,
        CheckTab::Pending,
        CheckTab::Approved,
        CheckTab::Completed,
    ];

    pub fn matches(self, check: &HealthCheck) -> bool {
        match self {
            CheckTab::All => true,
            CheckTab::Pending => check.status == CheckStatus::Pending,
            CheckTab::Approved => matches!(check.status, CheckStatus::Approved | CheckStatus::Executing),
            CheckTab::Completed => matches!(check.status, CheckStatus::Completed | CheckStatus::Failed),
        }
    }

    pub fn count(self, checks: &[HealthCheck]) -> usize {
        checks.iter().filter(|c| self.matches(c)).count()
    }

    pub fn filter(self, checks: &[HealthCheck]) -> Vec<&HealthCheck> {
        checks.iter().filter(|c| self.matches(c)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckTab::All => "all",
            CheckTab::Pending => "pending",
            CheckTab::Approved => "approved",
            CheckTab::Completed => "completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            CheckTab::All => CheckTab::Pending,
            CheckTab::Pending => CheckTab::Approved,
            CheckTab::Approved => CheckTab::Completed,
            CheckTab::Completed => CheckTab::All,
        }
    }
}

impl std::str::FromStr for CheckTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(CheckTab::All),
            "pending" => Ok(CheckTab::Pending),
            "approved" => Ok(CheckTab::Approved),
            "completed" => Ok(CheckTab::Completed),
            _ => Err(Error::invalid(format!("Invalid tab: {}", s))),
        }
    }
}

impl std::fmt::Display for CheckTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommandOutput, ProposedAction, RiskLevel, Severity};

    fn check(status: CheckStatus) -> HealthCheck {
        HealthCheck {
            id: "hc-1".to_string(),
            hostname: "db-server-01".to_string(),
            status,
            severity: Severity::Warning,
            summary: "Disk nearly full".to_string(),
            details: String::new(),
            llm_response: String::new(),
            proposed_actions: vec![ProposedAction {
                description: "Rotate logs".to_string(),
                command: "logrotate -f /etc/logrotate.conf".to_string(),
                risk_level: RiskLevel::Low,
                expected_outcome: "Frees space".to_string(),
            }],
            execution_results: vec![],
            created_at: Utc::now(),
            reviewed_at: None,
            executed_at: None,
            completed_at: None,
        }
    }

    fn ok(cmd: &str) -> ExecutionResult {
        ExecutionResult::succeeded(cmd, CommandOutput::default())
    }

    #[test]
    fn test_transition_table() {
        use CheckStatus::*;
        assert!(Pending.can_transition_to(&Approved));
        assert!(Pending.can_transition_to(&Rejected));
        assert!(Approved.can_transition_to(&Executing));
        assert!(Executing.can_transition_to(&Completed));
        assert!(Executing.can_transition_to(&Failed));

        assert!(!Pending.can_transition_to(&Executing));
        assert!(!Approved.can_transition_to(&Completed));
        for terminal in [Rejected, Completed, Failed] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(&Pending));
        }
        assert!(!Other("queued".into()).can_transition_to(&Approved));
    }

    #[test]
    fn test_review_sets_reviewed_at() {
        let mut hc = check(CheckStatus::Pending);
        let now = Utc::now();
        hc.review(ReviewDecision::Approve, now).unwrap();
        assert_eq!(hc.status, CheckStatus::Approved);
        assert_eq!(hc.reviewed_at, Some(now));
    }

    #[test]
    fn test_review_twice_fails() {
        let mut hc = check(CheckStatus::Pending);
        hc.review(ReviewDecision::Reject, Utc::now()).unwrap();
        let err = hc.review(ReviewDecision::Approve, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(hc.status, CheckStatus::Rejected);
    }

    #[test]
    fn test_execute_all_success_completes() {
        let mut hc = check(CheckStatus::Approved);
        hc.begin_execution(Utc::now()).unwrap();
        hc.finish_execution(vec![ok("a"), ok("b")], Utc::now()).unwrap();
        assert_eq!(hc.status, CheckStatus::Completed);
        assert_eq!(hc.execution_results.len(), 2);
        assert!(hc.completed_at.is_some());
    }

    #[test]
    fn test_single_failure_fails_whole_batch() {
        let mut hc = check(CheckStatus::Approved);
        hc.begin_execution(Utc::now()).unwrap();
        hc.finish_execution(
            vec![ok("a"), ExecutionResult::failed("b", "exit 1"), ok("c")],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(hc.status, CheckStatus::Failed);
        assert_eq!(hc.execution_results.len(), 3);
    }

    #[test]
    fn test_execute_requires_approval() {
        let mut hc = check(CheckStatus::Pending);
        assert!(hc.begin_execution(Utc::now()).is_err());
        assert!(hc.executed_at.is_none());
    }

    #[test]
    fn test_gating() {
        assert!(check(CheckStatus::Pending).can_review());
        assert!(!check(CheckStatus::Pending).can_execute());
        assert!(check(CheckStatus::Approved).can_execute());

        let mut empty = check(CheckStatus::Pending);
        empty.proposed_actions.clear();
        assert!(!empty.can_review());
    }

    #[test]
    fn test_tabs() {
        let checks = vec![
            check(CheckStatus::Pending),
            check(CheckStatus::Approved),
            check(CheckStatus::Executing),
            check(CheckStatus::Completed),
            check(CheckStatus::Failed),
            check(CheckStatus::Rejected),
        ];
        assert_eq!(CheckTab::All.count(&checks), 6);
        assert_eq!(CheckTab::Pending.count(&checks), 1);
        assert_eq!(CheckTab::Approved.count(&checks), 2);
        assert_eq!(CheckTab::Completed.count(&checks), 2);
        assert_eq!("completed".parse::<CheckTab>().unwrap(), CheckTab::Completed);
    }
}
