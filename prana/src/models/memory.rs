use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag on a stored memory. Unrecognized tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemoryType {
    Preference,
    LikedMeal,
    DislikedMeal,
    SuccessfulPlan,
    Other(String),
}

impl MemoryType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preference => "preference",
            Self::LikedMeal => "liked_meal",
            Self::DislikedMeal => "disliked_meal",
            Self::SuccessfulPlan => "successful_plan",
            Self::Other(tag) => tag,
        }
    }

    /// Tags describing what the user likes or avoids.
    pub fn is_preference(&self) -> bool {
        matches!(self, Self::Preference | Self::LikedMeal | Self::DislikedMeal)
    }
}

impl From<String> for MemoryType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "preference" => Self::Preference,
            "liked_meal" => Self::LikedMeal,
            "disliked_meal" => Self::DislikedMeal,
            "successful_plan" => Self::SuccessfulPlan,
            _ => Self::Other(value),
        }
    }
}

impl From<MemoryType> for String {
    fn from(value: MemoryType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Memory {
    pub id: String,
    pub user_id: i64,
    #[schema(value_type = String)]
    pub memory_type: MemoryType,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Memory {
    pub fn new(user_id: i64, memory_type: MemoryType, content: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            user_id,
            memory_type,
            content,
            created_at: now,
            last_accessed: Some(now),
        }
    }
}

/// A memory as it appears in a decision trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct RetrievedMemory {
    #[serde(rename = "type")]
    pub memory_type: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    /// RFC 3339 timestamp, or null when never accessed.
    pub last_accessed: Option<String>,
}

impl From<&Memory> for RetrievedMemory {
    fn from(memory: &Memory) -> Self {
        Self {
            memory_type: memory.memory_type.to_string(),
            content: memory.content.clone(),
            last_accessed: memory.last_accessed.map(|dt| dt.to_rfc3339()),
        }
    }
}
