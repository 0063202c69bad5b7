use crate::{
    types::{
        DailyBreakdown, DailyReport, DayStats, LanguageTime, SummaryItem, SummaryReport,
        SummaryText, TimeSpan, WeeklyReport, WeeklyStats,
    },
    utils::format_time,
};

const TOP_LANGUAGES: usize = 5;

pub fn daily_report(day: &DayStats) -> DailyReport {
    DailyReport {
        date: day.date.clone(),
        total_time: format_time(day.total_seconds),
        total_seconds: day.total_seconds,
        languages: top_languages(&day.languages),
    }
}

pub fn weekly_report(week: &WeeklyStats) -> WeeklyReport {
    WeeklyReport {
        period: "Last 7 days".to_string(),
        total_time: format_time(week.total_seconds),
        total_seconds: week.total_seconds,
        daily_breakdown: week
            .days
            .iter()
            .map(|day| DailyBreakdown {
                date: day.date.clone(),
                total_time: format_time(day.total_seconds),
                total_seconds: day.total_seconds,
            })
            .collect(),
        languages: top_languages(&week.languages),
    }
}

pub fn summary_report(today: &DayStats, yesterday: &DayStats, week: &WeeklyStats) -> SummaryReport {
    let span = |seconds: f64| TimeSpan {
        time: format_time(seconds),
        seconds,
    };

    SummaryReport {
        today: span(today.total_seconds),
        yesterday: span(yesterday.total_seconds),
        this_week: span(week.total_seconds),
        summary: SummaryText {
            today: format_time(today.total_seconds),
            yesterday: format_time(yesterday.total_seconds),
            this_week: format_time(week.total_seconds),
        },
    }
}

fn top_languages(languages: &[SummaryItem]) -> Vec<LanguageTime> {
    languages
        .iter()
        .take(TOP_LANGUAGES)
        .map(|lang| LanguageTime {
            name: lang.name.clone(),
            time: format_time(lang.total_seconds),
            percentage: lang.percent,
        })
        .collect()
}
