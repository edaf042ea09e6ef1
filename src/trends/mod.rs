/*!
 * Subreddit trend report.
 *
 * Pass 1 names a handful of trends over a sample of top posts; pass 2 maps each
 * post to at most one of them. Both passes degrade to "nothing found" on model
 * faults.
 */

pub mod analysis;
pub mod classify;
pub mod prompts;
pub mod report;

pub use analysis::{parse_trends, TrendAnalyzer};
pub use classify::{parse_trend_number, TrendAssignments};
pub use report::{render_trend_report, trend_report_file_name};

/// A discussion trend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trend {
    pub title: String,
    pub summary: String,
}

impl Trend {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}
