use serde::{Deserialize, Serialize};

/// Answer to "may this user call this API again today?".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct QuotaStatus {
    pub allowed: bool,
    pub calls_used: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl QuotaStatus {
    pub fn evaluate(api: &str, calls_used: u32, limit: u32) -> Self {
        if calls_used >= limit {
            Self {
                allowed: false,
                calls_used,
                limit,
                remaining: None,
                reason: Some(format!("Daily limit reached for {api}")),
            }
        } else {
            Self {
                allowed: true,
                calls_used,
                limit,
                remaining: Some(limit - calls_used),
                reason: None,
            }
        }
    }
}
