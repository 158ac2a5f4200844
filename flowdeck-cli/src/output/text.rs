//! Human-readable text output.

use std::fmt::Write;

use super::json::{CheckOutput, InstanceOutput, WorkflowListOutput};

/// Text formatter with optional ANSI colors.
pub struct TextFormatter {
    no_color: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    fn green(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[32m{text}\x1b[0m")
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[2m{text}\x1b[0m")
        }
    }

    /// Renders an instance table.
    pub fn instances(&self, instances: &[InstanceOutput]) -> String {
        if instances.is_empty() {
            return "No instances configured. Add one with 'flowdeck instance add'.".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<38} {:<20} {:<30} {}",
            "ID", "NAME", "BASE URL", "LAST USED"
        );
        for instance in instances {
            let marker = if instance.selected {
                self.green("*")
            } else {
                " ".to_string()
            };
            let _ = writeln!(
                out,
                "{marker}{:<37} {:<20} {:<30} {}",
                instance.id,
                instance.name,
                instance.base_url,
                instance.last_used_at.format("%Y-%m-%d %H:%M"),
            );
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Renders a workflow listing.
    pub fn workflows(&self, list: &WorkflowListOutput) -> String {
        let mut out = String::new();

        let provenance = if list.served_from_cache {
            self.dim("(cached)")
        } else {
            self.dim("(remote)")
        };
        let _ = writeln!(
            out,
            "{} workflows for {} {provenance}",
            list.count, list.instance_id
        );

        for workflow in &list.workflows {
            let id = workflow["id"].as_str().unwrap_or("?");
            let name = workflow["name"].as_str().unwrap_or("(unnamed)");
            let state = if workflow["active"].as_bool().unwrap_or(false) {
                self.green("active")
            } else {
                self.dim("inactive")
            };
            let _ = writeln!(out, "  {id:<20} {name:<40} {state}");
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Renders a connectivity check result.
    pub fn check(&self, check: &CheckOutput) -> String {
        format!(
            "{} {} reachable: {} workflows, {} ms",
            self.green("✓"),
            check.instance_id,
            check.workflow_count,
            check.response_time_ms
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_list() -> WorkflowListOutput {
        WorkflowListOutput {
            instance_id: "abc".to_string(),
            served_from_cache: true,
            count: 1,
            workflows: vec![json!({"id": "wf-1", "name": "Sync", "active": true})],
        }
    }

    #[test]
    fn test_empty_instances_hint() {
        let formatter = TextFormatter::new(true);
        let output = formatter.instances(&[]);
        assert!(output.contains("instance add"));
    }

    #[test]
    fn test_workflow_listing() {
        let formatter = TextFormatter::new(true);
        let output = formatter.workflows(&sample_list());
        assert!(output.contains("1 workflows for abc"));
        assert!(output.contains("(cached)"));
        assert!(output.contains("wf-1"));
        assert!(output.contains("active"));
    }

    #[test]
    fn test_no_color_strips_ansi() {
        let formatter = TextFormatter::new(true);
        let output = formatter.workflows(&sample_list());
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_check_line() {
        let formatter = TextFormatter::new(true);
        let output = formatter.check(&CheckOutput {
            ok: true,
            instance_id: "abc".to_string(),
            workflow_count: 7,
            response_time_ms: 42,
        });
        assert!(output.contains("7 workflows"));
        assert!(output.contains("42 ms"));
    }
}
