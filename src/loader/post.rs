//! Structured social-media post record
//!
//! Mirrors the subset of the platform's post JSON the pipeline reads. The
//! platform has already extracted hashtags, mentions and links, so those are
//! handed to the extractor as hints instead of being re-recognized.

use crate::error::{Result, TokenizeError};
use crate::extract::EntityHint;
use crate::token::TagKind;
use serde::{Deserialize, Serialize};

/// One post as delivered by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPost {
    /// Full post text
    pub text: String,

    /// Platform-extracted entities
    pub entities: PostEntities,

    /// Original post, present when this one is a retweet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<RetweetedStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_screen_name: Option<String>,

    /// Numeric or string id, depending on the export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<serde_json::Value>,
}

/// Entity lists attached to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntities {
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub media: Vec<UrlEntity>,
}

/// Hashtag without its leading `#`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
}

/// Mention without its leading `@`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
}

/// Link as it appears in the text (usually shortened)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetweetedStatus {
    pub user: PostUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUser {
    pub screen_name: String,
}

impl StructuredPost {
    /// Build from an already parsed JSON value
    ///
    /// A record without `text` or `entities` is `UnexpectedInputShape`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| TokenizeError::UnexpectedInputShape(e.to_string()))
    }

    /// Parse one JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Entity literals to mask, links first so `#` or `@` inside a URL is
    /// never claimed by a hashtag or mention
    pub fn entity_hints(&self) -> Vec<EntityHint> {
        let urls = self
            .entities
            .urls
            .iter()
            .chain(self.entities.media.iter())
            .map(|u| EntityHint::new(u.url.clone(), TagKind::Url));
        let mentions = self
            .entities
            .user_mentions
            .iter()
            .map(|m| EntityHint::new(format!("@{}", m.screen_name), TagKind::Username));
        let hashtags = self
            .entities
            .hashtags
            .iter()
            .map(|h| EntityHint::new(format!("#{}", h.text), TagKind::Hashtag));

        urls.chain(mentions).chain(hashtags).collect()
    }

    /// `@name` of the retweeted account, if this is a retweet
    pub fn retweeted_account(&self) -> Option<String> {
        self.retweeted_status
            .as_ref()
            .map(|status| format!("@{}", status.user.screen_name))
    }

    /// Whether the post replies to another post or account
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_screen_name.is_some() || self.in_reply_to_status_id.is_some()
    }
}
