use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clients::YoutubeClient;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{EnergyTrend, SessionType, VideoResult, YogaExperience, YogaPlan, YOGA_AGENT_NAME};
use crate::services::nutrition::start_of_day;

const FALLBACK_VIDEO_ID: &str = "dQw4w9WgXcQ";
const FALLBACK_CHANNEL: &str = "Yoga Wellness";

/// Monday to Sunday.
pub const WEEKLY_SCHEDULE: [(SessionType, u32); 7] = [
    (SessionType::Energizing, 30),
    (SessionType::Strength, 25),
    (SessionType::Flexibility, 20),
    (SessionType::StressRelief, 30),
    (SessionType::Energizing, 25),
    (SessionType::Recovery, 40),
    (SessionType::StressRelief, 35),
];

const WEEKLY_STRESS_LEVEL: i32 = 50;

pub struct YogaService {
    db: Arc<dyn DatabaseBackend>,
    youtube: YoutubeClient,
}

fn keywords(session_type: SessionType, experience: YogaExperience) -> &'static [&'static str] {
    match session_type {
        SessionType::StressRelief => &["stress relief", "meditation", "gentle"],
        SessionType::Energizing => &["energizing", "morning", "vinyasa"],
        SessionType::Flexibility => &["flexibility", "stretching"],
        SessionType::Strength => &["strength", "power yoga"],
        SessionType::Recovery => &["restorative", "yin yoga", "recovery"],
        SessionType::Balanced if experience == YogaExperience::Beginner => &["beginner"],
        SessionType::Balanced => &["intermediate"],
    }
}

pub fn search_query(session_type: SessionType, duration_minutes: u32, experience: YogaExperience) -> String {
    format!(
        "yoga {} {duration_minutes} minutes",
        keywords(session_type, experience).join(" ")
    )
}

pub fn session_description(session_type: SessionType, duration_minutes: u32) -> String {
    let d = duration_minutes;
    match session_type {
        SessionType::StressRelief => format!(
            "A gentle {d}-minute session focused on stress relief, deep breathing, and relaxation. Perfect for calming the mind and body."
        ),
        SessionType::Energizing => format!(
            "An energizing {d}-minute flow to boost your energy and motivation. Great for morning practice."
        ),
        SessionType::Flexibility => format!(
            "A {d}-minute flexibility-focused session to improve range of motion and reduce stiffness."
        ),
        SessionType::Strength => format!(
            "A {d}-minute strength-building session to build core stability and muscular endurance."
        ),
        SessionType::Recovery => format!(
            "A restorative {d}-minute recovery session with gentle stretches and relaxation poses."
        ),
        SessionType::Balanced => format!("A {d}-minute balanced yoga session."),
    }
}

pub fn fallback_video(session_type: SessionType, duration_minutes: u32) -> VideoResult {
    VideoResult {
        video_id: FALLBACK_VIDEO_ID.to_string(),
        title: format!("{} Yoga Session", session_type.title()),
        description: format!("A {duration_minutes}-minute {session_type} yoga session"),
        thumbnail: String::new(),
        url: crate::clients::youtube::watch_url(FALLBACK_VIDEO_ID),
        channel: FALLBACK_CHANNEL.to_string(),
    }
}

impl YogaService {
    pub fn new(db: Arc<dyn DatabaseBackend>, youtube: YoutubeClient) -> Self {
        Self { db, youtube }
    }

    /// Best matching video, or the fallback when the search fails or comes
    /// back empty.
    pub async fn search_video(&self, query: &str, session_type: SessionType, duration_minutes: u32) -> VideoResult {
        match self.youtube.search(query, duration_minutes).await {
            Ok(Some(video)) => video,
            Ok(None) => {
                tracing::info!(query, "No yoga video found, using fallback");
                fallback_video(session_type, duration_minutes)
            }
            Err(error) => {
                tracing::warn!(query, error = %error, "YouTube search failed, using fallback");
                fallback_video(session_type, duration_minutes)
            }
        }
    }

    pub async fn generate_yoga_plan(
        &self,
        user_id: i64,
        session_type: SessionType,
        duration_minutes: u32,
        energy_trend: EnergyTrend,
        stress_level: i32,
        experience: YogaExperience,
    ) -> Result<YogaPlan> {
        tracing::debug!(
            user_id,
            session_type = %session_type,
            duration_minutes,
            energy_trend = %energy_trend,
            stress_level,
            "Generating yoga plan"
        );

        let query = search_query(session_type, duration_minutes, experience);
        let video = self.search_video(&query, session_type, duration_minutes).await;

        let plan = YogaPlan {
            id: nanoid::nanoid!(),
            user_id,
            date: Utc::now(),
            session_type,
            duration_minutes,
            youtube_video_id: video.video_id,
            youtube_title: video.title,
            youtube_url: video.url,
            description: session_description(session_type, duration_minutes),
            created_by_agent: YOGA_AGENT_NAME.to_string(),
        };

        self.db.create_yoga_plan(&plan).await?;
        Ok(plan)
    }

    /// One plan per weekday from [`WEEKLY_SCHEDULE`], all dated now.
    pub async fn generate_weekly_plan(&self, user_id: i64, experience: YogaExperience) -> Result<Vec<YogaPlan>> {
        let mut plans = Vec::with_capacity(WEEKLY_SCHEDULE.len());

        for (session_type, duration) in WEEKLY_SCHEDULE {
            let plan = self
                .generate_yoga_plan(
                    user_id,
                    session_type,
                    duration,
                    EnergyTrend::Medium,
                    WEEKLY_STRESS_LEVEL,
                    experience,
                )
                .await?;
            plans.push(plan);
        }

        tracing::info!(user_id, sessions = plans.len(), "Weekly yoga plan generated");
        Ok(plans)
    }

    pub async fn recent_plans(&self, user_id: i64, limit: u32) -> Result<Vec<YogaPlan>> {
        self.db.recent_yoga_plans(user_id, limit).await
    }

    /// Latest plan created since midnight UTC.
    pub async fn today_plan(&self, user_id: i64, now: DateTime<Utc>) -> Result<Option<YogaPlan>> {
        let plans = self.db.yoga_plans_since(user_id, start_of_day(now)).await?;
        Ok(plans.into_iter().last())
    }
}
