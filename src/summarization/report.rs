/*!
 * Markdown rendering of a traceable summary.
 */

use super::pipeline::TraceableSummary;

pub const PART_ONE_HEADING: &str = "## Part 1: Key Sentences (Extractive Summary)";
pub const PART_TWO_HEADING: &str = "## Part 2: Final Summary (with Citations)";

/// Render the two-part report.
///
/// Part 1 lists key sentences in selector order as `` * **`S<n>`**: text ``.
/// Part 2 holds the narrative verbatim and is omitted when there is none.
pub fn render_report(heading: &str, locator: &str, summary: &TraceableSummary) -> String {
    let mut lines = vec![
        format!("# {}\n", heading),
        format!("**Source URL:** {}\n", locator),
        "---".to_string(),
        format!("{}\n", PART_ONE_HEADING),
    ];

    lines.extend(
        summary
            .key_sentences()
            .map(|(id, text)| format!("* **`{}`**: {}", id, text)),
    );

    if let Some(narrative) = &summary.narrative {
        lines.push("\n\n---".to_string());
        lines.push(format!("{}\n", PART_TWO_HEADING));
        lines.push(narrative.clone());
    }

    lines.join("\n")
}
