/*!
 * Reddit access over the OAuth API.
 *
 * Authentication uses the application-only client-credentials grant, so a
 * registered app id and secret are required. The bearer token is requested
 * lazily and reused for the life of the client.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

use crate::app_config::RedditConfig;
use crate::errors::FetchError;
use super::{SourceDocument, SourceKind, SourceProvider};

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// A submission as returned in a listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub url: String,
    pub is_self: bool,
}

/// A comment; deleted authors come back as `None` or `[deleted]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RedditComment {
    pub author: Option<String>,
    pub body: String,
    pub stickied: bool,
}

impl RedditComment {
    fn known_author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty() && *a != "[deleted]")
    }
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// One post of a subreddit sample, ready for trend analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPost {
    pub title: String,
    pub url: String,
    pub text: String,
}

/// Authenticated Reddit API client
#[derive(Debug)]
pub struct RedditClient {
    client: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    token: Mutex<Option<String>>,
}

impl RedditClient {
    /// Fails with `FetchError::Credentials` when the app id or secret is missing
    pub fn new(config: &RedditConfig) -> Result<Self, FetchError> {
        if !config.has_credentials() {
            return Err(FetchError::Credentials(
                "Reddit client id and secret are required (REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET)".to_string(),
            ));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            user_agent: config.user_agent(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, FetchError> {
        let mut token = self.token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(existing.clone());
        }

        debug!("Requesting Reddit access token");
        let response = self.client.post(AUTH_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Credentials(format!("Reddit rejected the app credentials (HTTP {})", status)));
        }

        let parsed: TokenResponse = response.json().await
            .map_err(|e| FetchError::Credentials(format!("Unexpected token response: {}", e)))?;
        *token = Some(parsed.access_token.clone());
        Ok(parsed.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", API_BASE, path);
        debug!("GET {}", url);

        let response = self.client.get(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => response.json().await
                .map_err(|e| FetchError::Network(format!("Unexpected response from {}: {}", url, e))),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(url)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(FetchError::Credentials(format!("Access to {} was denied", url)))
            }
            status => Err(FetchError::Network(format!("{} returned HTTP {}", url, status))),
        }
    }

    /// A post and its top-level comments in display order
    pub async fn post_with_comments(&self, post_id: &str, comment_limit: usize) -> Result<(RedditPost, Vec<RedditComment>), FetchError> {
        let (posts, comments): (Listing<RedditPost>, Listing<RedditComment>) = self
            .get_json(
                &format!("/comments/{}", post_id),
                &[("limit", comment_limit.to_string()), ("depth", "1".to_string()), ("raw_json", "1".to_string())],
            )
            .await?;

        let post = posts.data.children.into_iter()
            .find(|thing| thing.kind == "t3")
            .map(|thing| thing.data)
            .ok_or_else(|| FetchError::NotFound(format!("post {}", post_id)))?;

        let comments = comments.data.children.into_iter()
            .filter(|thing| thing.kind == "t1")
            .map(|thing| thing.data)
            .collect();

        Ok((post, comments))
    }

    /// Top posts of `subreddit` over `time_filter`, each with up to `comments_per_post` comments
    pub async fn top_posts(
        &self,
        subreddit: &str,
        time_filter: &str,
        limit: usize,
        comments_per_post: usize,
    ) -> Result<Vec<ScrapedPost>, FetchError> {
        info!("Scraping top {} posts from r/{} for the last {}...", limit, subreddit, time_filter);
        let listing: Listing<RedditPost> = self
            .get_json(
                &format!("/r/{}/top", subreddit),
                &[("t", time_filter.to_string()), ("limit", limit.to_string()), ("raw_json", "1".to_string())],
            )
            .await?;

        let mut scraped = Vec::new();
        for post in listing.data.children.into_iter().filter(|t| t.kind == "t3").map(|t| t.data).take(limit) {
            let comments = match self.post_with_comments(&post.id, comments_per_post).await {
                Ok((_, comments)) => comments,
                Err(e) => {
                    warn!("Could not load comments of post {}: {}", post.id, e);
                    Vec::new()
                }
            };
            scraped.push(ScrapedPost {
                text: trend_post_text(&post, &comments, comments_per_post),
                title: post.title,
                url: post.url,
            });
        }

        info!("Scraped {} posts", scraped.len());
        Ok(scraped)
    }
}

/// Post id from a Reddit URL (`/comments/<id>/...` or `redd.it/<id>`) or a bare id
pub fn parse_post_id(locator: &str) -> Result<String, FetchError> {
    let locator = locator.trim();
    let invalid = || FetchError::InvalidLocator(format!("not a Reddit post URL or id: {}", locator));
    let is_id = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());

    if is_id(locator) {
        return Ok(locator.to_string());
    }

    let url = Url::parse(locator).map_err(|_| invalid())?;
    let host = url.host_str().unwrap_or_default();
    let segments: Vec<&str> = url.path_segments().map(|s| s.filter(|p| !p.is_empty()).collect()).unwrap_or_default();

    let candidate = if host == "redd.it" {
        segments.first().copied()
    } else if host == "reddit.com" || host.ends_with(".reddit.com") {
        segments.iter().position(|s| *s == "comments").and_then(|i| segments.get(i + 1)).copied()
    } else {
        None
    };

    candidate.filter(|id| is_id(id)).map(str::to_string).ok_or_else(invalid)
}

/// Text of a post for a single-post summary.
///
/// `Title`, optional `Body`, a comments separator, then `author: body` for the
/// first `comment_limit` comments that are not stickied and have a known author.
/// Newlines become spaces.
pub fn post_summary_text(post: &RedditPost, comments: &[RedditComment], comment_limit: usize) -> String {
    let mut text = format!("Title: {}\n", post.title);
    if !post.selftext.is_empty() {
        text.push_str(&format!("Body: {}\n", post.selftext));
    }
    text.push_str("\n--- COMMENTS ---\n");

    for comment in comments.iter().take(comment_limit).filter(|c| !c.stickied) {
        if let Some(author) = comment.known_author() {
            text.push_str(&format!("{}: {}\n", author, comment.body.replace('#', "")));
        }
    }

    text.replace('\n', " ").replace("  ", " ")
}

/// Text of a post for trend analysis
pub fn trend_post_text(post: &RedditPost, comments: &[RedditComment], comments_per_post: usize) -> String {
    let mut text = format!("POST TITLE: {}\n", post.title);
    if post.is_self {
        text.push_str(&format!("POST BODY: {}\n", post.selftext));
    }
    for comment in comments.iter().take(comments_per_post).filter(|c| !c.stickied) {
        text.push_str(&format!("COMMENT: {}\n", comment.body));
    }
    text
}

/// Single-post source
#[derive(Debug)]
pub struct RedditPostSource {
    client: RedditClient,
    comment_limit: usize,
}

impl RedditPostSource {
    pub fn new(client: RedditClient, comment_limit: usize) -> Self {
        Self { client, comment_limit }
    }

    pub fn from_config(config: &RedditConfig) -> Result<Self, FetchError> {
        Ok(Self::new(RedditClient::new(config)?, config.post_comment_limit))
    }
}

#[async_trait]
impl SourceProvider for RedditPostSource {
    async fn fetch(&self, locator: &str) -> Result<SourceDocument, FetchError> {
        let post_id = parse_post_id(locator)?;
        let (post, comments) = self.client.post_with_comments(&post_id, self.comment_limit).await?;
        info!("Fetched post '{}' with {} comments", post.title, comments.len());

        Ok(SourceDocument {
            name: post.id.clone(),
            locator: locator.to_string(),
            text: post_summary_text(&post, &comments, self.comment_limit),
            title: Some(post.title),
            kind: SourceKind::RedditPost,
        })
    }
}
