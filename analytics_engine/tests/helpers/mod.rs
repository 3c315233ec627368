//! In-memory social graph for exercising the crawl and analysis
//! pipelines without a network.

use async_trait::async_trait;
use chirp_models::error::{AnalyticsError, Result};
use chirp_models::{ConnectionKind, NodeProfile, Post, SocialGraph, UserRef};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryGraph {
    profiles: HashMap<String, NodeProfile>,
    followers: HashMap<String, Vec<String>>,
    friends: HashMap<String, Vec<String>>,
    timelines: HashMap<String, Vec<Post>>,
    broken_profiles: Vec<String>,
    broken_timelines: Vec<String>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user_id: &str, screen_name: &str, is_private: bool) {
        self.profiles.insert(
            user_id.to_string(),
            NodeProfile {
                user_id: user_id.to_string(),
                screen_name: screen_name.to_string(),
                is_private,
            },
        );
    }

    pub fn add_followers(&mut self, user_id: &str, ids: &[&str]) {
        self.followers
            .insert(user_id.to_string(), ids.iter().map(|s| s.to_string()).collect());
    }

    pub fn add_friends(&mut self, user_id: &str, ids: &[&str]) {
        self.friends
            .insert(user_id.to_string(), ids.iter().map(|s| s.to_string()).collect());
    }

    pub fn add_post(&mut self, user_id: &str, text: &str, favorites: u32, reshares: u32) {
        self.add_post_full(user_id, text, favorites, reshares, false);
    }

    pub fn add_post_full(
        &mut self,
        user_id: &str,
        text: &str,
        favorites: u32,
        reshares: u32,
        is_reshare: bool,
    ) {
        let timeline = self.timelines.entry(user_id.to_string()).or_default();
        let post = Post {
            id: format!("{}-{}", user_id, timeline.len()),
            text: text.to_string(),
            favorites,
            reshares,
            author: user_id.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            is_reshare,
        };
        timeline.push(post);
    }

    /// Make profile resolution fail for this id.
    pub fn break_profile(&mut self, user_id: &str) {
        self.broken_profiles.push(user_id.to_string());
    }

    /// Make timeline fetches fail for this id.
    pub fn break_timeline(&mut self, user_id: &str) {
        self.broken_timelines.push(user_id.to_string());
    }
}

#[async_trait]
impl SocialGraph for MemoryGraph {
    async fn resolve_user(&self, identifier: &str) -> Result<NodeProfile> {
        if self.broken_profiles.iter().any(|id| id == identifier) {
            return Err(AnalyticsError::Api(format!(
                "profile fetch failed for {}",
                identifier
            )));
        }
        self.profiles
            .get(identifier)
            .or_else(|| {
                self.profiles
                    .values()
                    .find(|p| p.screen_name == identifier)
            })
            .cloned()
            .ok_or_else(|| AnalyticsError::UnknownUser(identifier.to_string()))
    }

    async fn fetch_connections(
        &self,
        user_id: &str,
        kind: ConnectionKind,
        limit: usize,
    ) -> Result<Vec<UserRef>> {
        let source = match kind {
            ConnectionKind::Followers => &self.followers,
            ConnectionKind::Friends => &self.friends,
        };
        let mut refs: Vec<UserRef> = source
            .get(user_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|user_id| UserRef { user_id })
            .collect();
        refs.truncate(limit);
        Ok(refs)
    }

    async fn fetch_posts_for_user(
        &self,
        user_id: &str,
        filter_reshares: bool,
    ) -> Result<Vec<Post>> {
        if self.broken_timelines.iter().any(|id| id == user_id) {
            return Err(AnalyticsError::Network(format!(
                "timeline fetch failed for {}",
                user_id
            )));
        }
        let mut posts = self.timelines.get(user_id).cloned().unwrap_or_default();
        if filter_reshares {
            posts.retain(|p| !p.is_reshare);
        }
        Ok(posts)
    }

    async fn fetch_posts_for_query(&self, query: &str, limit: usize) -> Result<Vec<Post>> {
        let mut matches: Vec<Post> = self
            .timelines
            .values()
            .flatten()
            .filter(|p| p.text.contains(query))
            .cloned()
            .collect();
        matches.truncate(limit);
        Ok(matches)
    }
}
