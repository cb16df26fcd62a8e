//! Existence probe for required command-line tools.

use std::process::Command;

/// Return the subset of `tools` that do not resolve on `PATH`.
///
/// This is a plain existence probe (`which`), not a version check.
#[must_use]
pub fn find_missing(tools: &[&str]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| !is_on_path(tool))
        .map(|tool| (*tool).to_string())
        .collect()
}

fn is_on_path(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_present_tool() {
        // `sh` exists on any unix host the pipeline can run on
        assert!(find_missing(&["sh"]).is_empty());
    }

    #[test]
    fn test_reports_missing_tool() {
        let missing = find_missing(&["sh", "definitely-not-a-real-tool-xyz"]);
        assert_eq!(missing, vec!["definitely-not-a-real-tool-xyz"]);
    }
}
