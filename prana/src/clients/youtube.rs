//! YouTube Data API video search for yoga sessions.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::IntegrationsConfig;
use crate::error::{PranaError, Result};
use crate::models::VideoResult;

/// "Howto & Style".
const VIDEO_CATEGORY_ID: &str = "26";
const DESCRIPTION_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// YouTube's duration bucket for a session length, if any applies.
pub fn duration_filter(minutes: u32) -> Option<&'static str> {
    match minutes {
        0 => None,
        1..=15 => Some("short"),
        16..=30 => Some("medium"),
        _ => None,
    }
}

#[derive(Clone)]
pub struct YoutubeClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl YoutubeClient {
    pub fn new(config: &IntegrationsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PranaError::Internal(format!("Failed to create YouTube HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.youtube_base_url.trim_end_matches('/').to_string(),
            api_key: config.youtube_api_key.clone(),
        })
    }

    /// First matching video, `Ok(None)` when the search is empty.
    pub async fn search(&self, query: &str, duration_minutes: u32) -> Result<Option<VideoResult>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PranaError::Internal("YouTube API key not configured".to_string()))?;

        let mut params = vec![
            ("key", api_key),
            ("q", query),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", "1"),
            ("videoCategoryId", VIDEO_CATEGORY_ID),
        ];
        if let Some(bucket) = duration_filter(duration_minutes) {
            params.push(("videoDuration", bucket));
        }

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PranaError::Internal(format!("YouTube returned {status}")));
        }

        let body: SearchResponse = response.json().await?;
        let video = body.items.into_iter().find_map(|item| {
            let video_id = item.id.video_id?;
            Some(VideoResult {
                url: watch_url(&video_id),
                title: item.snippet.title,
                description: item.snippet.description.chars().take(DESCRIPTION_LIMIT).collect(),
                thumbnail: item
                    .snippet
                    .thumbnails
                    .default
                    .map(|t| t.url)
                    .unwrap_or_default(),
                channel: item.snippet.channel_title,
                video_id,
            })
        });

        Ok(video)
    }
}
