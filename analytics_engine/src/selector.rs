//! Token selection over raw post text.
//!
//! Splits post text with a social-media-aware pattern (mentions, hashtags
//! and URLs stay whole), drops reshare markers and non-word artifacts, and
//! keeps the tokens whose part-of-speech matches the requested category.

use crate::pos;
use chirp_models::{PosCategory, Post};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// A selected word with its part-of-speech tag. Short-lived; produced by
/// [`select`] and consumed by the frequency tabulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: &'static str,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|@\w+|#\w+|\w+|[^\s\w]+").unwrap());

static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect()
});

const RESHARE_MARKER: &str = "RT";
const URL_FRAGMENT: &str = "https";

/// Split one post's text into raw units.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// The filter the original word selection applies before tagging: no
/// reshare markers, no mentions, alphanumeric only, more than one
/// character, and not the URL-scheme residue left by tokenization.
fn is_candidate(token: &str) -> bool {
    token != RESHARE_MARKER
        && !token.starts_with('@')
        && token.chars().all(char::is_alphanumeric)
        && token.chars().count() > 1
        && token != URL_FRAGMENT
}

/// Select tokens from the posts whose part-of-speech matches `category`.
/// Emission follows source order: post order, then within-post order.
/// Posts with empty text contribute nothing.
pub fn select(posts: &[Post], category: PosCategory) -> Vec<Token> {
    let mut selected = Vec::new();

    for post in posts {
        for raw in tokenize(&post.text) {
            if !is_candidate(raw) {
                continue;
            }
            let tag = pos::tag(raw);
            if category.matches(tag) {
                selected.push(Token {
                    text: raw.to_string(),
                    tag,
                });
            }
        }
    }

    selected
}

/// Plain word selection without tagging: the same candidate filter plus
/// English stopword removal.
pub fn strip(posts: &[Post]) -> Vec<String> {
    let mut words = Vec::new();

    for post in posts {
        for raw in tokenize(&post.text) {
            if is_candidate(raw) && !STOPWORDS.contains(&raw.to_lowercase()) {
                words.push(raw.to_string());
            }
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(text: &str) -> Post {
        Post {
            id: "1".to_string(),
            text: text.to_string(),
            favorites: 0,
            reshares: 0,
            author: "tester".to_string(),
            created_at: Utc::now(),
            is_reshare: false,
        }
    }

    #[test]
    fn discards_reshare_markers_mentions_and_urls() {
        let posts = vec![post("RT @joe check out https://x.co amazing cats")];
        let tokens = select(&posts, PosCategory::Both);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert!(!words.contains(&"RT"));
        assert!(!words.iter().any(|w| w.starts_with('@')));
        assert!(!words.iter().any(|w| w.contains("://")));
        assert!(!words.contains(&"https"));
        assert!(words.contains(&"amazing"));
        assert!(words.contains(&"cats"));
    }

    #[test]
    fn noun_category_excludes_adjectives() {
        let posts = vec![post("amazing cats")];
        let nouns = select(&posts, PosCategory::Noun);
        assert_eq!(nouns.len(), 1);
        assert_eq!(nouns[0].text, "cats");

        let adjectives = select(&posts, PosCategory::Adjective);
        assert_eq!(adjectives.len(), 1);
        assert_eq!(adjectives[0].text, "amazing");
    }

    #[test]
    fn emission_preserves_source_order() {
        let posts = vec![post("winter storms"), post("storms winter")];
        let tokens = select(&posts, PosCategory::Both);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["winter", "storms", "storms", "winter"]);
    }

    #[test]
    fn empty_text_contributes_nothing() {
        let posts = vec![post(""), post("cats")];
        let tokens = select(&posts, PosCategory::Noun);
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn single_character_tokens_are_dropped() {
        let posts = vec![post("a I cats")];
        let tokens = select(&posts, PosCategory::Both);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["cats"]);
    }

    #[test]
    fn strip_removes_stopwords_but_keeps_content_words() {
        let posts = vec![post("the cats are amazing")];
        let words = strip(&posts);
        assert!(words.contains(&"cats".to_string()));
        assert!(words.contains(&"amazing".to_string()));
        assert!(!words.contains(&"the".to_string()));
        assert!(!words.contains(&"are".to_string()));
    }

    #[test]
    fn hashtags_are_not_ordinary_words() {
        let posts = vec![post("#winter winter")];
        let tokens = select(&posts, PosCategory::Both);
        // the hashtag token fails the alphanumeric filter; the bare word stays
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "winter");
    }
}
