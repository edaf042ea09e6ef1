use chrono::NaiveDateTime;

use super::classify::TrendAssignments;
use super::Trend;

pub const UNMAPPED_NOTE: &str = "*No posts from the sample were strongly mapped to this trend.*";

/// `<subreddit>_trend_report_<YYYY-MM-DD>.md`
pub fn trend_report_file_name(subreddit: &str, generated_at: NaiveDateTime) -> String {
    format!("{}_trend_report_{}.md", subreddit, generated_at.format("%Y-%m-%d"))
}

/// Render the trend report; `assignments[i]` holds the posts of `trends[i]`
pub fn render_trend_report(
    subreddit: &str,
    trends: &[Trend],
    assignments: &TrendAssignments,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = format!("# Trend Report for r/{}\n", subreddit);
    out.push_str(&format!("**Generated on:** {}\n\n", generated_at.format("%Y-%m-%d %H:%M:%S")));

    for (index, trend) in trends.iter().enumerate() {
        out.push_str(&format!("## {}\n\n", trend.title));
        out.push_str(&format!("**Summary:** {}\n\n", trend.summary));

        match assignments.get(index).filter(|posts| !posts.is_empty()) {
            Some(posts) => {
                out.push_str("**Contributing Posts:**\n");
                for post in posts {
                    out.push_str(&format!("*   [{}]({})\n", post.title, post.url));
                }
            }
            None => {
                out.push_str(UNMAPPED_NOTE);
                out.push('\n');
            }
        }
        out.push_str("\n---\n\n");
    }

    out
}
