//! GitHub contribution calendar, read through the GraphQL API.

use reqwest::Client;
use serde_json::{Value, json};

use crate::{
    config::GithubConfig,
    error::{Error, Result},
    utils, warning,
};

const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
            color
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(http: Client, config: GithubConfig) -> Self {
        Self { http, config }
    }

    /// The `contributionCalendar` object of `login` for one calendar year,
    /// passed through as returned by GitHub.
    pub async fn contributions(&self, login: &str, year: i32) -> Result<Value> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("GitHub token not configured".to_string()))?;
        let (from, to) = utils::year_bounds(year);

        let res = self
            .http
            .post(&self.config.graphql_url)
            .bearer_auth(token)
            // GitHub rejects API requests without a user agent
            .header(reqwest::header::USER_AGENT, env!("CARGO_PKG_NAME"))
            .json(&json!({
                "query": CONTRIBUTIONS_QUERY,
                "variables": { "login": login, "from": from, "to": to },
            }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warning!("GitHub GraphQL request failed with {}", status);
            return Err(upstream(format!("GitHub returned {status}")));
        }

        let mut body: Value = res.json().await?;
        if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
            warning!("GitHub GraphQL errors: {}", errors);
            return Err(upstream("Error fetching GitHub data".to_string()));
        }

        match body.pointer_mut("/data/user/contributionsCollection/contributionCalendar") {
            Some(calendar) if !calendar.is_null() => Ok(calendar.take()),
            _ => Err(upstream(format!("no contribution data for `{login}`"))),
        }
    }
}

fn upstream(message: String) -> Error {
    Error::Upstream {
        service: "GitHub",
        status: 500,
        message,
    }
}
