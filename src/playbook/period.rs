use super::domain::Meeting;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Granularity selector shared by the chart series and the period totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub const fn ordered() -> [Self; 3] {
        [Self::Weekly, Self::Monthly, Self::Yearly]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    pub const fn bucket_count(self) -> u32 {
        match self {
            Self::Weekly | Self::Monthly => 6,
            Self::Yearly => 3,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(format!(
                "unknown period '{other}' (expected weekly, monthly, or yearly)"
            )),
        }
    }
}

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    fn days_into_week(self, date: NaiveDate) -> i64 {
        let weekday = date.weekday();
        let offset = match self {
            Self::Sunday => weekday.num_days_from_sunday(),
            Self::Monday => weekday.num_days_from_monday(),
        };
        i64::from(offset)
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(format!(
                "unknown week start '{other}' (expected sunday or monday)"
            )),
        }
    }
}

/// Which base markers count as an outcome in the period views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRule {
    /// Any recorded base marker counts, strikeouts included.
    #[default]
    AnyBase,
    /// Only home runs count, matching the per-profile cost-per-outcome.
    HomeOnly,
}

impl OutcomeRule {
    pub fn counts(self, meeting: &Meeting) -> bool {
        match self {
            Self::AnyBase => meeting.outcome().is_some(),
            Self::HomeOnly => meeting.is_home_run(),
        }
    }
}

impl FromStr for OutcomeRule {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any_base" | "any" => Ok(Self::AnyBase),
            "home_only" | "home" => Ok(Self::HomeOnly),
            other => Err(format!(
                "unknown outcome rule '{other}' (expected any_base or home_only)"
            )),
        }
    }
}

/// Calendar-aligned window, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Bucket {
    fn new(label: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label,
            start: midnight(start),
            end: midnight(end),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

fn january_first(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Buckets for `period` ending with the one containing `now`, oldest first.
pub fn buckets(period: Period, now: DateTime<Utc>, week_start: WeekStart) -> Vec<Bucket> {
    let today = now.date_naive();
    let count = period.bucket_count();

    match period {
        Period::Weekly => {
            let current = today - Duration::days(week_start.days_into_week(today));
            (0..count)
                .rev()
                .map(|offset| {
                    let start = current - Duration::weeks(i64::from(offset));
                    let label = format!("{}/{}", start.month(), start.day());
                    Bucket::new(label, start, start + Duration::weeks(1))
                })
                .collect()
        }
        Period::Monthly => {
            let current = today.with_day(1).unwrap_or(today);
            (0..count)
                .rev()
                .map(|offset| {
                    let start = current
                        .checked_sub_months(Months::new(offset))
                        .unwrap_or(NaiveDate::MIN);
                    let end = start
                        .checked_add_months(Months::new(1))
                        .unwrap_or(NaiveDate::MAX);
                    Bucket::new(start.format("%b").to_string(), start, end)
                })
                .collect()
        }
        Period::Yearly => {
            let year = today.year();
            (0..count as i32)
                .rev()
                .map(|offset| {
                    let bucket_year = year - offset;
                    Bucket::new(
                        bucket_year.to_string(),
                        january_first(bucket_year),
                        january_first(bucket_year + 1),
                    )
                })
                .collect()
        }
    }
}

/// Start of the rolling lookback used for the period totals.
///
/// Weekly looks back to midnight seven days ago; monthly and yearly look back
/// six months and three years from the current instant.
pub fn rolling_window_start(period: Period, now: DateTime<Utc>) -> DateTime<Utc> {
    match period {
        Period::Weekly => midnight(now.date_naive() - Duration::days(7)),
        Period::Monthly => now
            .checked_sub_months(Months::new(6))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        Period::Yearly => now
            .checked_sub_months(Months::new(36))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    }
}
