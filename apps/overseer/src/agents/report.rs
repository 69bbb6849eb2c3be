// Final report composition

use super::types::Turn;

/// Compose the Markdown report sent to the human
///
/// The report has three sections: the goal, the model's synthesized summary,
/// and a verbatim transcript of every turn, each under a `[role]` header.
pub fn compose_report(goal: &str, summary: &str, transcript: &[Turn]) -> String {
    let mut report = String::new();

    report.push_str("# Goal\n\n");
    report.push_str(goal.trim_end());
    report.push_str("\n\n# Summary\n\n");
    report.push_str(summary.trim_end());
    report.push_str("\n\n# Transcript\n");

    for turn in transcript {
        report.push_str(&format!("\n### [{}]\n\n{}\n", turn.role, turn.text));
    }

    report
}
