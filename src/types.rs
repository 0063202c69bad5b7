use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Persisted OAuth state for one Spotify account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub account_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub last_known_resource_id: Option<String>,
}

impl CredentialRecord {
    pub fn is_stale(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now >= self.expires_at - margin
    }

    /// Replaces access token and expiry together. The refresh token is only
    /// replaced when the provider rotated it. On error the record is unchanged.
    pub fn apply_token(&mut self, token: &TokenResponse, now: DateTime<Utc>) -> Result<()> {
        let expires_at = token.expires_at(now)?;
        self.access_token = token.access_token.clone();
        self.expires_at = expires_at;
        if let Some(refresh_token) = token.refresh_token.as_ref().filter(|t| !t.is_empty()) {
            self.refresh_token = refresh_token.clone();
        }
        Ok(())
    }
}

/// Body returned by the provider token endpoint for both grant types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// `now + expires_in`, rejecting lifetimes chrono cannot represent.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| Error::Upstream {
                service: "Spotify",
                status: 502,
                message: format!("token response has unusable expires_in `{}`", self.expires_in),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    // null for local files
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Outcome of one call to the "currently playing" endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    Playing(String),
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// WakaTime summaries as returned by `/users/current/summaries`.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummariesResponse {
    #[serde(default)]
    pub data: Vec<SummaryDay>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryDay {
    #[serde(default)]
    pub grand_total: GrandTotal,
    #[serde(default)]
    pub range: SummaryRange,
    #[serde(default)]
    pub languages: Vec<SummaryItem>,
    #[serde(default)]
    pub projects: Vec<SummaryItem>,
    #[serde(default)]
    pub editors: Vec<SummaryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrandTotal {
    pub hours: u64,
    pub minutes: u64,
    pub total_seconds: f64,
    pub digital: String,
    pub decimal: String,
    pub text: String,
}

impl Default for GrandTotal {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            total_seconds: 0.0,
            digital: "0:00".to_string(),
            decimal: "0.00".to_string(),
            text: "0 mins".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryRange {
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub text: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryItem {
    pub name: String,
    pub total_seconds: f64,
    pub percent: f64,
    pub text: String,
}

/// A single WakaTime day in the shape the reports are built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayStats {
    pub date: String,
    pub total_seconds: f64,
    pub human_readable: String,
    pub grand_total: GrandTotal,
    pub languages: Vec<SummaryItem>,
    pub projects: Vec<SummaryItem>,
    pub editors: Vec<SummaryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub start: String,
    pub end: String,
    pub total_seconds: f64,
    pub human_readable: String,
    pub languages: Vec<SummaryItem>,
    pub days: Vec<DayStats>,
}

// Response bodies of the `/wakatime` endpoints.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageTime {
    pub name: String,
    pub time: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: String,
    pub total_time: String,
    pub total_seconds: f64,
    pub languages: Vec<LanguageTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub date: String,
    pub total_time: String,
    pub total_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub period: String,
    pub total_time: String,
    pub total_seconds: f64,
    pub daily_breakdown: Vec<DailyBreakdown>,
    pub languages: Vec<LanguageTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub time: String,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryText {
    pub today: String,
    pub yesterday: String,
    pub this_week: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub today: TimeSpan,
    pub yesterday: TimeSpan,
    pub this_week: TimeSpan,
    pub summary: SummaryText,
}
