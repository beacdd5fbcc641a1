use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::{DecisionKind, RetentionResult};

/// Write a result as pretty JSON.
pub fn write_result_json(path: &Path, result: &RetentionResult) -> Result<()> {
    let content = serde_json::to_string_pretty(result).context("serialize retention result")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Render a Markdown summary for PR comments or job output.
pub fn render_result_md(result: &RetentionResult) -> String {
    let mut out = String::new();
    out.push_str("# Retention Summary\n\n");
    out.push_str(&format!(
        "- groups evaluated: {}\n- releases kept: {}\n- deployments excluded: {}\n\n",
        result.diagnostics.groups_evaluated,
        result.diagnostics.total_kept_releases,
        result.diagnostics.invalid_deployments_excluded
    ));

    if !result.kept_releases.is_empty() {
        out.push_str("## Kept Releases\n");
        out.push_str("| project | environment | rank | release | version | last deployed |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for kept in &result.kept_releases {
            out.push_str(&format!(
                "| {} | {} | {} | `{}` | {} | {} |\n",
                table_cell(&kept.project_id),
                table_cell(&kept.environment_id),
                kept.rank,
                table_cell(&kept.release_id),
                table_cell(kept.version.as_deref().unwrap_or("-")),
                kept.latest_deployed_at.to_rfc3339()
            ));
        }
        out.push('\n');
    }

    let excluded: Vec<_> = result
        .decisions
        .iter()
        .filter(|d| d.kind == DecisionKind::Diagnostic)
        .collect();
    if !excluded.is_empty() {
        out.push_str("## Excluded Deployments\n");
        for entry in excluded {
            out.push_str(&format!("- {}\n", entry.reason_text));
        }
    }
    out
}

/// Escape a value so a `|` cannot end its table cell early.
fn table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Write the Markdown summary.
pub fn write_result_md(path: &Path, result: &RetentionResult) -> Result<()> {
    let md = render_result_md(result);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
