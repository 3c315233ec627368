//! REST gateway to the remote social network.
//!
//! Implements the [`SocialGraph`] capability against a v1.1-style HTTP
//! API: user lookup, paginated follower/friend id pages, user timelines,
//! and recent search. The client owns auth and rate-limit tolerance so
//! the analytics side never sees transport details.

use async_trait::async_trait;
use chirp_models::error::{AnalyticsError, Result};
use chirp_models::{ConnectionKind, NodeProfile, Post, SocialGraph, UserRef};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const IDS_PAGE_SIZE: usize = 5000;
const SEARCH_PAGE_SIZE: usize = 100;
const MAX_RATE_LIMIT_WAIT_SECS: u64 = 60;

// Wire types
#[derive(Debug, Deserialize)]
struct ApiUser {
    id_str: String,
    screen_name: String,
    #[serde(default)]
    protected: bool,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    id_str: String,
    text: String,
    #[serde(default)]
    favorite_count: u32,
    #[serde(default)]
    retweet_count: u32,
    created_at: String,
    user: ApiUser,
    retweeted_status: Option<Box<ApiStatus>>,
}

#[derive(Debug, Deserialize)]
struct IdPage {
    ids: Vec<u64>,
    #[serde(default)]
    next_cursor: i64,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    statuses: Vec<ApiStatus>,
}

pub struct RestClient {
    http: Client,
    base_url: String,
    bearer_token: String,
    timeline_limit: usize,
}

impl RestClient {
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self> {
        // Parse up front so a bad base URL fails at startup, not mid-crawl
        Url::parse(base_url)
            .map_err(|e| AnalyticsError::Config(format!("invalid API base URL: {}", e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnalyticsError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
            timeline_limit: 100,
        })
    }

    /// How many posts a single timeline fetch asks for.
    pub fn with_timeline_limit(mut self, limit: usize) -> Self {
        self.timeline_limit = limit;
        self
    }

    /// Reachability probe for smoke tests.
    pub async fn ping(&self) -> bool {
        self.http
            .get(&self.base_url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .is_ok()
    }

    /// GET with one retry honoring Retry-After when the API rate-limits.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, path);
        let mut retried = false;

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .query(query)
                .send()
                .await
                .map_err(|e| AnalyticsError::Network(format!("GET {} failed: {}", path, e)))?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS && !retried {
                retried = true;
                let wait = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5)
                    .min(MAX_RATE_LIMIT_WAIT_SECS);
                warn!(path, wait_seconds = wait, "rate limited; backing off");
                sleep(Duration::from_secs(wait)).await;
                continue;
            }

            return Ok(response);
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get(path, query).await?;
        json_body(response, path).await
    }
}

async fn json_body<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AnalyticsError::Api(format!(
            "GET {} returned {}",
            path, status
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AnalyticsError::Api(format!("GET {} returned malformed JSON: {}", path, e)))
}

fn to_post(status: ApiStatus) -> Post {
    let is_reshare = status.retweeted_status.is_some() || status.text.starts_with("RT ");
    Post {
        id: status.id_str,
        text: status.text,
        favorites: status.favorite_count,
        reshares: status.retweet_count,
        author: status.user.screen_name,
        created_at: parse_created_at(&status.created_at),
        is_reshare,
    }
}

fn parse_created_at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn looks_like_user_id(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit())
}

#[async_trait]
impl SocialGraph for RestClient {
    async fn resolve_user(&self, identifier: &str) -> Result<NodeProfile> {
        let key = if looks_like_user_id(identifier) {
            "user_id"
        } else {
            "screen_name"
        };
        let response = self
            .get("users/show.json", &[(key, identifier.to_string())])
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AnalyticsError::UnknownUser(identifier.to_string()));
        }

        let user: ApiUser = json_body(response, "users/show.json").await?;
        debug!(user_id = %user.id_str, screen_name = %user.screen_name, "resolved user");
        Ok(NodeProfile {
            user_id: user.id_str,
            screen_name: user.screen_name,
            is_private: user.protected,
        })
    }

    async fn fetch_connections(
        &self,
        user_id: &str,
        kind: ConnectionKind,
        limit: usize,
    ) -> Result<Vec<UserRef>> {
        let path = match kind {
            ConnectionKind::Followers => "followers/ids.json",
            ConnectionKind::Friends => "friends/ids.json",
        };

        let mut refs: Vec<UserRef> = Vec::new();
        let mut cursor: i64 = -1;

        while refs.len() < limit {
            let page: IdPage = self
                .get_json(
                    path,
                    &[
                        ("user_id", user_id.to_string()),
                        ("cursor", cursor.to_string()),
                        ("count", IDS_PAGE_SIZE.min(limit).to_string()),
                    ],
                )
                .await?;

            if page.ids.is_empty() {
                break;
            }
            refs.extend(page.ids.iter().map(|id| UserRef {
                user_id: id.to_string(),
            }));

            if page.next_cursor == 0 {
                break;
            }
            cursor = page.next_cursor;
        }

        refs.truncate(limit);
        debug!(user_id, kind = kind.as_str(), count = refs.len(), "fetched connections");
        Ok(refs)
    }

    async fn fetch_posts_for_user(
        &self,
        user_id: &str,
        filter_reshares: bool,
    ) -> Result<Vec<Post>> {
        let statuses: Vec<ApiStatus> = self
            .get_json(
                "statuses/user_timeline.json",
                &[
                    ("user_id", user_id.to_string()),
                    ("count", self.timeline_limit.to_string()),
                ],
            )
            .await?;

        let mut posts: Vec<Post> = statuses.into_iter().map(to_post).collect();
        if filter_reshares {
            posts.retain(|post| !post.is_reshare);
        }
        Ok(posts)
    }

    async fn fetch_posts_for_query(&self, query: &str, limit: usize) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = Vec::new();
        let mut max_id: Option<u64> = None;

        while posts.len() < limit {
            let mut params = vec![
                ("q", format!("{} -filter:retweets", query)),
                ("lang", "en".to_string()),
                ("result_type", "mixed".to_string()),
                (
                    "count",
                    SEARCH_PAGE_SIZE.min(limit - posts.len()).to_string(),
                ),
            ];
            if let Some(id) = max_id {
                params.push(("max_id", id.to_string()));
            }

            let page: SearchPage = self.get_json("search/tweets.json", &params).await?;
            if page.statuses.is_empty() {
                break;
            }

            max_id = page
                .statuses
                .iter()
                .filter_map(|s| s.id_str.parse::<u64>().ok())
                .min()
                .and_then(|lowest| lowest.checked_sub(1));

            // posts from protected accounts never enter the corpus
            posts.extend(
                page.statuses
                    .into_iter()
                    .filter(|s| !s.user.protected)
                    .map(to_post),
            );

            if max_id.is_none() {
                break;
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }
}
