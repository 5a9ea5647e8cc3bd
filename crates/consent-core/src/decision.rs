use crate::error::ConsentError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A visitor's recorded cookie choice.
///
/// Stored as `{"date": "<ISO-8601>", "analytics": <bool>}`. Unknown fields
/// are ignored on read so older builds can load records written by newer ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsentDecision {
    #[serde(rename = "date", with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub analytics: bool,
}

impl ConsentDecision {
    /// A decision made now. The timestamp is truncated to milliseconds,
    /// the precision of the stored format.
    pub fn new(analytics: bool) -> Self {
        Self {
            timestamp: Utc::now().trunc_subsecs(3),
            analytics,
        }
    }

    pub fn permits(&self, category: Category) -> bool {
        match category {
            Category::Necessary => true,
            Category::Analytics => self.analytics,
        }
    }

    pub fn to_json(&self) -> Result<String, ConsentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConsentError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Cookie categories offered in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Required for the site to work, including remembering this choice.
    Necessary,
    Analytics,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Necessary, Category::Analytics];

    /// Whether the visitor can switch this category off.
    pub fn is_adjustable(self) -> bool {
        matches!(self, Category::Analytics)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Necessary => "necessary",
            Category::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
