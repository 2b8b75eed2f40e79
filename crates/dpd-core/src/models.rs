//! # Domain Models
//!
//! These structs represent the core entities of the board.
//! Field names follow the durable JSON record shape, so a collection
//! serializes to exactly what `persist` writes and `load` reads back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Author name used whenever the poster leaves the field blank.
pub const ANONYMOUS: &str = "Anonymous";

/// The fixed set of discussion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ethics,
    Politics,
    Science,
    Education,
    Society,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Ethics,
        Category::Politics,
        Category::Science,
        Category::Education,
        Category::Society,
        Category::Other,
    ];

    /// The wire/storage name (e.g., "politics")
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ethics => "ethics",
            Category::Politics => "politics",
            Category::Science => "science",
            Category::Education => "education",
            Category::Society => "society",
            Category::Other => "other",
        }
    }

    /// Capitalized display label (e.g., "Politics")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ethics => "Ethics",
            Category::Politics => "Politics",
            Category::Science => "Science",
            Category::Education => "Education",
            Category::Society => "Society",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("unknown category '{s}'")))
    }
}

/// A threaded response attached to exactly one Topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Time-derived, unique within the owning topic
    pub id: i64,
    pub author: String,
    pub content: String,
    pub date: DateTime<Utc>,
    /// Client identity of the poster, when known
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// A top-level discussion item. `replies` is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Topic {
    /// Largest id held by this topic or any of its replies.
    pub fn max_id(&self) -> i64 {
        self.replies
            .iter()
            .map(|r| r.id)
            .fold(self.id, i64::max)
    }
}

/// The active category criterion of the board. Defaults to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Category(Category),
}

impl Filter {
    pub fn matches(&self, topic: &Topic) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(c) => topic.category == *c,
        }
    }

    /// "all" followed by every category, in menu order.
    pub fn choices() -> impl Iterator<Item = Filter> {
        std::iter::once(Filter::All).chain(Category::ALL.into_iter().map(Filter::Category))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Category(c) => f.write_str(c.as_str()),
        }
    }
}

impl FromStr for Filter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Category)
    }
}

/// What `load` does when the stored collection cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedDataPolicy {
    /// Report `MalformedData` and leave the stored bytes alone
    #[default]
    Fail,
    /// Fall back to the seed set; the next mutation overwrites the bad bytes
    Reseed,
}

/// Raw input for a new topic, as typed into a form or posted to the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTopic {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    pub category: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Raw input for a new reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReply {
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// A `NewTopic` that passed validation: trimmed, defaulted and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub user_id: Option<String>,
}

/// A `NewReply` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    pub author: String,
    pub content: String,
    pub user_id: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn author_or_anonymous(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => ANONYMOUS.to_string(),
    }
}

impl NewTopic {
    pub fn validate(&self) -> Result<TopicDraft, AppError> {
        Ok(TopicDraft {
            title: required("title", &self.title)?,
            content: required("content", &self.content)?,
            author: author_or_anonymous(self.author.as_deref()),
            category: self.category.parse()?,
            user_id: self.user_id.clone(),
        })
    }
}

impl NewReply {
    pub fn validate(&self) -> Result<ReplyDraft, AppError> {
        Ok(ReplyDraft {
            author: author_or_anonymous(self.author.as_deref()),
            content: required("content", &self.content)?,
            user_id: self.user_id.clone(),
        })
    }
}
