//! Data models for the blog platform.
//!
//! This module contains the records persisted by the store and the
//! change-sets handlers pass into it.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Format used for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    format_timestamp(Local::now().naive_local())
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts ISO-8601 with or without fractional seconds (`T` or space
/// separated) and RFC 3339 with an offset, kept as its wall time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub user_id: Option<i64>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to create a blog.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author: String,
    pub user_id: Option<i64>,
    pub tags: Vec<String>,
}

/// Partial update of a blog.
///
/// Empty titles and bodies are treated as "not provided"; tags are
/// replaced whenever present, including with an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    /// Password hash; never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub bio: String,
    pub avatar_url: String,
    pub social_links: Map<String, Value>,
    pub created_at: String,
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub bio: String,
}

/// Partial profile update. Blank strings leave the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: Option<Map<String, Value>>,
}

/// Comment left on a blog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author: String,
    pub blog_id: i64,
    pub created_at: String,
}

/// Site-wide settings shown on the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub ai_model: String,
    pub image_model: String,
    pub image_style: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "AI Blog Platform".to_string(),
            ai_model: "Llama 3.1 (Groq)".to_string(),
            image_model: "DALL-E 3 (OpenAI)".to_string(),
            image_style: "Digital Art".to_string(),
        }
    }
}

/// Named AI tools recorded in the usage log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiTool {
    BlogGenerator,
    Summarizer,
    HeadlineGenerator,
    ToneChanger,
    GrammarChecker,
    Translator,
    PlagiarismChecker,
    ImageCaptioner,
    ImageAnalyzer,
}

impl AiTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiTool::BlogGenerator => "blog_generator",
            AiTool::Summarizer => "summarizer",
            AiTool::HeadlineGenerator => "headline_generator",
            AiTool::ToneChanger => "tone_changer",
            AiTool::GrammarChecker => "grammar_checker",
            AiTool::Translator => "translator",
            AiTool::PlagiarismChecker => "plagiarism_checker",
            AiTool::ImageCaptioner => "image_captioner",
            AiTool::ImageAnalyzer => "image_analyzer",
        }
    }
}

impl fmt::Display for AiTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
