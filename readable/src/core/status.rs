//! Status headline shown in front of a rendered result.

use serde_json::Value;

use crate::core::types::is_truthy;

/// Display status of a finished task, derived from the raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Ok,
    Changed,
    Skipped,
    Failed,
    Unreachable,
}

/// Classify a raw (unfiltered) result. Failures take precedence over
/// `skipped`, which takes precedence over `changed`.
pub fn classify(result: &Value) -> TaskStatus {
    let flag = |key: &str| result.get(key).is_some_and(is_truthy);
    if flag("unreachable") {
        TaskStatus::Unreachable
    } else if flag("failed") {
        TaskStatus::Failed
    } else if flag("skipped") {
        TaskStatus::Skipped
    } else if flag("changed") {
        TaskStatus::Changed
    } else {
        TaskStatus::Ok
    }
}

/// Headline such as `changed: [web1] =>`.
pub fn headline(status: TaskStatus, host: &str) -> String {
    match status {
        TaskStatus::Ok => format!("ok: [{host}] =>"),
        TaskStatus::Changed => format!("changed: [{host}] =>"),
        TaskStatus::Skipped => format!("skipping: [{host}] =>"),
        TaskStatus::Failed => format!("fatal: [{host}]: FAILED! =>"),
        TaskStatus::Unreachable => format!("fatal: [{host}]: UNREACHABLE! =>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_by_precedence() {
        assert_eq!(classify(&json!({})), TaskStatus::Ok);
        assert_eq!(classify(&json!({"changed": true})), TaskStatus::Changed);
        assert_eq!(
            classify(&json!({"changed": true, "skipped": true})),
            TaskStatus::Skipped
        );
        assert_eq!(
            classify(&json!({"changed": true, "failed": true})),
            TaskStatus::Failed
        );
        assert_eq!(
            classify(&json!({"failed": true, "unreachable": true})),
            TaskStatus::Unreachable
        );
        assert_eq!(classify(&json!({"failed": false})), TaskStatus::Ok);
    }

    #[test]
    fn headlines() {
        assert_eq!(headline(TaskStatus::Changed, "web1"), "changed: [web1] =>");
        assert_eq!(headline(TaskStatus::Failed, "db"), "fatal: [db]: FAILED! =>");
    }
}
