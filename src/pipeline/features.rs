//! Per-post features used to filter a collection before analysis

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `RT @name` at the start of the text
static RT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RT\s@[A-Za-z0-9_]+").expect("Invalid regex"));

/// `@name` at the start of the text
static REPLY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[A-Za-z0-9_]+").expect("Invalid regex"));

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("Invalid regex"));

/// Retweet, reply and exclusion flags for one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFeatures {
    pub is_rt: bool,
    pub is_reply: bool,
    /// The post fails the keyword or script filter
    pub exclude: bool,
    /// `@name` of the retweeted account
    pub rt_account: Option<String>,
}

impl PostFeatures {
    /// Retweet and reply flags read from plain text
    ///
    /// The retweeted account is the first mention in the text.
    pub fn from_text(text: &str) -> Self {
        let mut features = Self::default();
        if RT_PREFIX.is_match(text) {
            features.is_rt = true;
            features.rt_account = MENTION.find(text).map(|m| m.as_str().to_string());
        } else if REPLY_PREFIX.is_match(text) {
            features.is_reply = true;
        }
        features
    }
}
