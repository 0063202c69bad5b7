//! WakaTime coding-time statistics.
//!
//! [`WakaTimeClient`] fetches daily summaries and normalizes them into
//! [`DayStats`](crate::types::DayStats); the [`report`] functions turn those
//! into the bodies served under `/api/v1/wakatime`.

mod client;
pub mod report;

pub use client::{SummaryFilter, WakaTimeClient};
