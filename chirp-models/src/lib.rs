use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

// Post Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub favorites: u32,
    pub reshares: u32,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub is_reshare: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeProfile {
    pub user_id: String,
    pub screen_name: String,
    pub is_private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Followers,
    Friends,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Followers => "followers",
            ConnectionKind::Friends => "friends",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosCategory {
    Noun,
    Adjective,
    Both,
}

impl PosCategory {
    /// Whether a Penn-style tag falls inside this category.
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            PosCategory::Noun => tag.starts_with("NN"),
            PosCategory::Adjective => tag.starts_with("JJ"),
            PosCategory::Both => tag.starts_with("NN") || tag.starts_with("JJ"),
        }
    }
}

impl std::str::FromStr for PosCategory {
    type Err = error::AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noun" | "nouns" => Ok(PosCategory::Noun),
            "adjective" | "adjectives" => Ok(PosCategory::Adjective),
            "both" => Ok(PosCategory::Both),
            other => Err(error::AnalyticsError::Input(format!(
                "unknown part-of-speech category: {}",
                other
            ))),
        }
    }
}

// Frequency Types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub word: String,
    pub count: u32,
}

/// Ranked word counts, highest count first. Ties keep the order in which
/// the words were first seen, so the same input always renders the same
/// table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyEntry> {
        self.entries.iter()
    }

    /// Drop entries below a minimum count, keeping rank order.
    pub fn retain_min_count(&mut self, min_count: u32) {
        self.entries.retain(|e| e.count >= min_count);
    }
}

// Regression Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualRow {
    pub fitted: f64,
    pub actual: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub mean_residual: f64,
    /// Mean of the strictly positive residuals. None when every residual
    /// is zero or negative.
    pub avg_overestimate: Option<f64>,
    /// Mean of the strictly negative residuals. None when every residual
    /// is zero or positive.
    pub avg_underestimate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_error: f64,
    pub residuals: Vec<ResidualRow>,
}

// Significance Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementSample {
    pub user: String,
    pub favorites: Vec<f64>,
    pub reshares: Vec<f64>,
}

impl EngagementSample {
    pub fn from_posts(user: &str, posts: &[Post]) -> Self {
        Self {
            user: user.to_string(),
            favorites: posts.iter().map(|p| p.favorites as f64).collect(),
            reshares: posts.iter().map(|p| p.reshares as f64).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.reshares.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub favorites_statistic: f64,
    pub favorites_p_value: f64,
    pub reshares_statistic: f64,
    pub reshares_p_value: f64,
    pub favorites_significant: bool,
    pub reshares_significant: bool,
}

// Crawl Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedNode {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub root: NodeProfile,
    pub posts: Vec<Post>,
    pub visited: Vec<NodeProfile>,
    pub skipped: Vec<SkippedNode>,
}

// Capability trait for the remote social graph. Implementations own all
// transport concerns (auth, pagination, rate limits); callers pass an
// explicit handle instead of reaching for a process-wide client.
use async_trait::async_trait;

#[async_trait]
pub trait SocialGraph: Send + Sync {
    async fn resolve_user(&self, identifier: &str) -> error::Result<NodeProfile>;

    async fn fetch_connections(
        &self,
        user_id: &str,
        kind: ConnectionKind,
        limit: usize,
    ) -> error::Result<Vec<UserRef>>;

    async fn fetch_posts_for_user(
        &self,
        user_id: &str,
        filter_reshares: bool,
    ) -> error::Result<Vec<Post>>;

    async fn fetch_posts_for_query(&self, query: &str, limit: usize)
        -> error::Result<Vec<Post>>;
}
