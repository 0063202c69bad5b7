use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url, header};
use serde::Deserialize;

use crate::{
    config::WakaTimeConfig,
    error::{Error, Result},
    types::{DayStats, SummariesResponse, SummaryDay, SummaryItem, WeeklyStats},
    utils::{self, format_time, iso_date},
    warning,
};

/// Optional narrowing of a summaries request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryFilter {
    pub editors: Option<String>,
    pub project: Option<String>,
    pub languages: Option<String>,
}

impl SummaryFilter {
    /// Fills the fields this filter leaves unset, or blank, from `defaults`.
    pub fn or(self, defaults: SummaryFilter) -> SummaryFilter {
        fn pick(value: Option<String>, fallback: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty()).or(fallback)
        }

        SummaryFilter {
            editors: pick(self.editors, defaults.editors),
            project: pick(self.project, defaults.project),
            languages: pick(self.languages, defaults.languages),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WakaTimeClient {
    http: Client,
    config: WakaTimeConfig,
}

impl WakaTimeClient {
    pub fn new(http: Client, config: WakaTimeConfig) -> Self {
        Self { http, config }
    }

    /// The configured editor filter, overridable per request.
    pub fn default_filter(&self) -> SummaryFilter {
        SummaryFilter {
            editors: self.config.editor.clone(),
            ..Default::default()
        }
    }

    /// Normalized per-day summaries between `start` and `end`, inclusive.
    pub async fn summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filter: &SummaryFilter,
    ) -> Result<Vec<DayStats>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("WakaTime API key not configured".to_string()))?;

        let mut params = vec![("start", iso_date(start)), ("end", iso_date(end))];
        if let Some(editors) = &filter.editors {
            params.push(("editors", editors.clone()));
        }
        if let Some(project) = &filter.project {
            params.push(("project", project.clone()));
        }
        if let Some(languages) = &filter.languages {
            params.push(("languages", languages.clone()));
        }

        let url = Url::parse_with_params(
            &format!(
                "{uri}/users/current/summaries",
                uri = self.config.api_url.trim_end_matches('/')
            ),
            &params,
        )
        .map_err(|e| Error::Config(format!("invalid WakaTime API URL: {e}")))?;

        // WakaTime takes the API key as the Basic auth user with no password.
        let res = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, utils::basic_auth(api_key, ""))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = match status {
                StatusCode::UNAUTHORIZED => "Invalid WakaTime API key".to_string(),
                StatusCode::NOT_FOUND => "WakaTime endpoint not found".to_string(),
                _ => {
                    let body = res.text().await.unwrap_or_default();
                    format!("{} {}", status, body).trim().to_string()
                }
            };
            warning!("WakaTime request failed: {}", message);
            return Err(Error::Upstream {
                service: "WakaTime",
                status: status.as_u16(),
                message,
            });
        }

        let summaries: SummariesResponse = res.json().await?;
        Ok(summaries.data.into_iter().map(normalize_day).collect())
    }

    /// Stats for a single day; an empty answer yields a zeroed day.
    pub async fn daily(&self, date: NaiveDate, filter: &SummaryFilter) -> Result<DayStats> {
        let days = self.summaries(date, date, filter).await?;
        Ok(days
            .into_iter()
            .next()
            .unwrap_or_else(|| empty_day(&iso_date(date))))
    }

    pub async fn today(&self, filter: &SummaryFilter) -> Result<DayStats> {
        self.daily(utils::today(), filter).await
    }

    pub async fn yesterday(&self, filter: &SummaryFilter) -> Result<DayStats> {
        self.daily(utils::yesterday_of(utils::today()), filter).await
    }

    /// The last seven days, today included.
    pub async fn weekly(&self, filter: &SummaryFilter) -> Result<WeeklyStats> {
        let (start, end) = utils::last_seven_days(utils::today());
        let days = self.summaries(start, end, filter).await?;
        Ok(weekly_stats(start, end, days))
    }

    /// Today, yesterday and the last week, fetched concurrently.
    ///
    /// Fails as soon as any of the three requests fails.
    pub async fn overview(
        &self,
        filter: &SummaryFilter,
    ) -> Result<(DayStats, DayStats, WeeklyStats)> {
        tokio::try_join!(
            self.today(filter),
            self.yesterday(filter),
            self.weekly(filter)
        )
    }
}

pub(crate) fn normalize_day(day: SummaryDay) -> DayStats {
    let total_seconds = day.grand_total.total_seconds;
    DayStats {
        date: day.range.date.unwrap_or_default(),
        total_seconds,
        human_readable: format_time(total_seconds),
        grand_total: day.grand_total,
        languages: day.languages,
        projects: day.projects,
        editors: day.editors,
    }
}

fn empty_day(date: &str) -> DayStats {
    let mut day = normalize_day(SummaryDay::default());
    day.date = date.to_string();
    day
}

pub(crate) fn weekly_stats(start: NaiveDate, end: NaiveDate, days: Vec<DayStats>) -> WeeklyStats {
    let total_seconds: f64 = days.iter().map(|d| d.total_seconds).sum();
    WeeklyStats {
        start: iso_date(start),
        end: iso_date(end),
        total_seconds,
        human_readable: format_time(total_seconds),
        languages: merge_items(days.iter().flat_map(|d| d.languages.iter()), total_seconds),
        days,
    }
}

// Sums items by name across days and recomputes their share of `total`.
fn merge_items<'a>(items: impl Iterator<Item = &'a SummaryItem>, total: f64) -> Vec<SummaryItem> {
    let mut by_name: HashMap<&str, f64> = HashMap::new();
    for item in items {
        *by_name.entry(item.name.as_str()).or_default() += item.total_seconds;
    }

    let mut merged: Vec<SummaryItem> = by_name
        .into_iter()
        .map(|(name, seconds)| SummaryItem {
            name: name.to_string(),
            total_seconds: seconds,
            percent: if total > 0.0 {
                (seconds / total * 10000.0).round() / 100.0
            } else {
                0.0
            },
            text: format_time(seconds),
        })
        .collect();
    merged.sort_by(|a, b| {
        b.total_seconds
            .total_cmp(&a.total_seconds)
            .then_with(|| a.name.cmp(&b.name))
    });
    merged
}
