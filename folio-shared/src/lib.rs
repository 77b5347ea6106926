//! Shared types used across all Folio crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct InvalidSender(pub String);

impl fmt::Display for InvalidSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid sender: {}", self.0)
    }
}

impl std::error::Error for InvalidSender {}

impl FromStr for Sender {
    type Err = InvalidSender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(InvalidSender(other.to_string())),
        }
    }
}

/// Classified topical category of a visitor query.
///
/// The seven topical intents map one-to-one onto profile categories;
/// `General` is the catch-all when no category scores confidently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Experience,
    Skills,
    Projects,
    Awards,
    Contact,
    Certifications,
    Personal,
    General,
}

impl Intent {
    /// Topical intents in classifier iteration order. Ties between equal
    /// scores resolve to the earliest entry here.
    pub fn topical() -> [Self; 7] {
        [
            Self::Experience,
            Self::Skills,
            Self::Projects,
            Self::Awards,
            Self::Contact,
            Self::Certifications,
            Self::Personal,
        ]
    }

    /// Profile category key this intent reads from. `None` for `General`.
    pub fn category_key(&self) -> Option<&'static str> {
        match self {
            Self::Experience => Some("experience"),
            Self::Skills => Some("skills"),
            Self::Projects => Some("projects"),
            Self::Awards => Some("awards"),
            Self::Contact => Some("contact"),
            Self::Certifications => Some("certifications"),
            Self::Personal => Some("personal"),
            Self::General => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Awards => "awards",
            Self::Contact => "contact",
            Self::Certifications => "certifications",
            Self::Personal => "personal",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global application configuration (gateway + engine budgets). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity (e.g. "Folio Assistant").
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Path to the profile JSON document. When missing, the bundled demo profile is used.
    pub profile_path: String,
    /// Maximum retained messages per conversation before the oldest are evicted.
    pub max_messages: usize,
    /// Reply budget for a single query in milliseconds.
    pub reply_timeout_ms: u64,
    /// Maximum accepted query length in characters.
    pub max_query_len: usize,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `FOLIO_CONFIG` path > `config/gateway.toml` > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Folio Assistant")?
            .set_default("port", 8001_i64)?
            .set_default("profile_path", "config/profile.json")?
            .set_default("max_messages", 100_i64)?
            .set_default("reply_timeout_ms", 2000_i64)?
            .set_default("max_query_len", 500_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}
