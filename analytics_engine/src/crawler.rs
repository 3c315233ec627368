//! One-hop social-graph crawling.
//!
//! Aggregates original (non-reshare) posts from a root user and the
//! root's direct connections. The root must resolve; individual
//! connections are allowed to fail and are reported as skipped instead of
//! aborting the crawl.

use chirp_models::error::Result;
use chirp_models::{ConnectionKind, CrawlReport, NodeProfile, Post, SkippedNode, SocialGraph, UserRef};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Per-kind cap on enumerated connections.
    pub max_connections: usize,
    /// Also walk the accounts the root follows, after the followers.
    pub include_friends: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
            include_friends: false,
        }
    }
}

/// Crawl the root's one-hop neighborhood and aggregate its posts.
///
/// Visit order is the root, then followers, then (when configured)
/// friends, each in the order the graph returned them; a user id seen
/// twice is visited once. Private profiles other than the root are never
/// aggregated.
pub async fn crawl(
    graph: &dyn SocialGraph,
    root: &str,
    config: &CrawlConfig,
) -> Result<CrawlReport> {
    // An unresolvable root is fatal; there is nothing meaningful to crawl.
    let root_profile = graph.resolve_user(root).await?;

    let mut candidates: Vec<UserRef> = graph
        .fetch_connections(
            &root_profile.user_id,
            ConnectionKind::Followers,
            config.max_connections,
        )
        .await?;
    if config.include_friends {
        candidates.extend(
            graph
                .fetch_connections(
                    &root_profile.user_id,
                    ConnectionKind::Friends,
                    config.max_connections,
                )
                .await?,
        );
    }
    let candidate_count = candidates.len();

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(root_profile.user_id.clone());

    // The caller asked for the root directly, so it stays in even when
    // its profile is protected.
    let mut included: Vec<NodeProfile> = vec![root_profile.clone()];
    let mut skipped: Vec<SkippedNode> = Vec::new();

    for connection in candidates {
        if !seen.insert(connection.user_id.clone()) {
            continue;
        }
        match graph.resolve_user(&connection.user_id).await {
            Ok(profile) if profile.is_private => {
                debug!(user_id = %profile.user_id, "excluding private profile");
            }
            Ok(profile) => included.push(profile),
            Err(e) => {
                warn!(user_id = %connection.user_id, error = %e, "could not resolve connection");
                skipped.push(SkippedNode {
                    user_id: connection.user_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut posts: Vec<Post> = Vec::new();
    for node in &included {
        match graph.fetch_posts_for_user(&node.user_id, false).await {
            Ok(timeline) => {
                posts.extend(timeline.into_iter().filter(|post| !post.is_reshare));
            }
            Err(e) => {
                warn!(user_id = %node.user_id, error = %e, "could not fetch timeline");
                skipped.push(SkippedNode {
                    user_id: node.user_id.clone(),
                    reason: format!("timeline: {}", e),
                });
            }
        }
    }

    info!(
        root = %root_profile.screen_name,
        connections = candidate_count,
        included = included.len(),
        skipped = skipped.len(),
        posts = posts.len(),
        "network crawl complete"
    );

    Ok(CrawlReport {
        root: root_profile,
        posts,
        visited: included,
        skipped,
    })
}
