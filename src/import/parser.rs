use super::ImportError;
use crate::playbook::domain::{Base, Meeting, MeetingId, ProfileId};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_meetings<R: Read>(reader: R) -> Result<Vec<Meeting>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut meetings = Vec::new();

    for (index, record) in csv_reader.deserialize::<MeetingRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = index + 2;
        meetings.push(row.into_meeting(line)?);
    }

    Ok(meetings)
}

#[derive(Debug, Deserialize)]
struct MeetingRow {
    #[serde(rename = "Profile ID")]
    profile_id: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Amount", default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(rename = "Base", default, deserialize_with = "empty_string_as_none")]
    base: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
    #[serde(
        rename = "Performance Rating",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    performance_rating: Option<String>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl MeetingRow {
    fn into_meeting(self, line: usize) -> Result<Meeting, ImportError> {
        let invalid = |reason: String| ImportError::InvalidRow { line, reason };

        if self.profile_id.is_empty() {
            return Err(invalid("missing profile id".to_string()));
        }

        let amount_spent = match self.amount.as_deref() {
            Some(raw) => parse_amount(raw).ok_or_else(|| invalid(format!("bad amount '{raw}'")))?,
            None => 0.0,
        };
        let rating = parse_rating(self.rating.as_deref()).map_err(&invalid)?;
        let performance_rating =
            parse_rating(self.performance_rating.as_deref()).map_err(&invalid)?;
        let date = parse_datetime(&self.date)
            .ok_or_else(|| invalid(format!("bad date '{}'", self.date)))?;

        Ok(Meeting {
            id: MeetingId(format!("csv-{line:04}")),
            profile_id: ProfileId(self.profile_id),
            kind: self.kind,
            amount_spent,
            base: self.base.map(Base::from),
            rating,
            performance_rating,
            date,
            notes: self.notes,
        })
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .ok()
}

fn parse_rating(raw: Option<&str>) -> Result<Option<u8>, String> {
    raw.map(|value| {
        value
            .parse::<u8>()
            .map_err(|_| format!("bad rating '{value}'"))
    })
    .transpose()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (taken as UTC
/// midnight).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
