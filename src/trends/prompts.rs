/*!
 * Prompt templates for trend identification and post classification.
 */

use super::Trend;

pub const CLASSIFICATION_SYSTEM: &str = "You assign Reddit posts to discussion trends and answer with a single number.";

pub fn analysis_system(subreddit: &str) -> String {
    format!("You are an expert analyst for the r/{} subreddit.", subreddit)
}

/// Ask for `num_trends` trends over the consolidated post text
pub fn analysis_prompt(subreddit: &str, num_trends: usize, consolidated: &str) -> String {
    format!(
        "You are an expert community analyst. Analyze the following text from the r/{subreddit} subreddit.\n\
Identify the top {num_trends} major trends or recurring discussion topics.\n\
\n\
For each trend, provide a concise title and a 1-2 sentence summary.\n\
**Format your output EXACTLY as follows for each trend, with no extra text:**\n\
\n\
Trend Title: [The title of the trend]\n\
Summary: [The summary of the trend]\n\
---\n\
\n\
SUBREDDIT TEXT:\n\
===\n\
{consolidated}\n\
===",
        subreddit = subreddit,
        num_trends = num_trends,
        consolidated = consolidated,
    )
}

/// Numbered trend list used by the classifier, 1-based
pub fn numbered_trends(trends: &[Trend]) -> String {
    trends
        .iter()
        .enumerate()
        .map(|(i, trend)| format!("{}. Trend Title: {}\n   Summary: {}", i + 1, trend.title, trend.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn classification_prompt(post_text: &str, trends: &[Trend]) -> String {
    format!(
        "Below is the text from a single Reddit post. Following that is a numbered list of discussion trends, \
each with a title and a summary.\n\
\n\
POST TEXT:\n\
---\n\
{}\n\
---\n\
\n\
TRENDS:\n\
---\n\
{}\n\
---\n\
\n\
Which trend number is the MOST relevant to the post text?\n\
Respond with ONLY the number. If no trend is a good fit, respond with \"None\".",
        post_text,
        numbered_trends(trends)
    )
}
