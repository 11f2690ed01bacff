//! The time window a report covers and the query string that selects it.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::{
    Date, Month, OffsetDateTime, Time, UtcOffset,
    macros::{format_description, time},
};

use crate::{error::ValidationError, report::ReportKind};

/// The period options offered on the report screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodKind {
    #[default]
    AllTime,
    ThisMonth,
    LastMonth,
    Custom,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 4] = [
        PeriodKind::AllTime,
        PeriodKind::ThisMonth,
        PeriodKind::LastMonth,
        PeriodKind::Custom,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            PeriodKind::AllTime => "all-time",
            PeriodKind::ThisMonth => "this-month",
            PeriodKind::LastMonth => "last-month",
            PeriodKind::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::AllTime => "All Time",
            PeriodKind::ThisMonth => "This Month",
            PeriodKind::LastMonth => "Last Month",
            PeriodKind::Custom => "Custom",
        }
    }
}

/// The query string shared by the report screen, print view and exports.
///
/// `start` and `end` are only used for custom periods and are kept as text
/// so that a half filled form can be shown back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub kind: ReportKind,
    #[serde(default)]
    pub period: PeriodKind,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl ReportQuery {
    /// Parse the selected period.
    ///
    /// # Errors
    /// Returns a [ValidationError::InvalidPeriod] if a custom period is
    /// missing a date, has a date that is not `YYYY-MM-DD`, or ends before it
    /// starts.
    pub fn period(&self) -> Result<ReportPeriod, ValidationError> {
        match self.period {
            PeriodKind::AllTime => Ok(ReportPeriod::AllTime),
            PeriodKind::ThisMonth => Ok(ReportPeriod::ThisMonth),
            PeriodKind::LastMonth => Ok(ReportPeriod::LastMonth),
            PeriodKind::Custom => {
                let start = parse_date(&self.start, "start")?;
                let end = parse_date(&self.end, "end")?;

                if start > end {
                    return Err(ValidationError::InvalidPeriod(
                        "the start date must not be after the end date".to_owned(),
                    ));
                }

                Ok(ReportPeriod::Custom { start, end })
            }
        }
    }

    /// The same query with a different report kind, as a URL query string.
    pub fn to_query_string(&self, kind: ReportKind) -> String {
        let mut query = format!("kind={}&period={}", kind.slug(), self.period.slug());

        if self.period == PeriodKind::Custom {
            for (key, value) in [("start", &self.start), ("end", &self.end)] {
                let format = format_description!("[year]-[month]-[day]");

                if let Ok(date) = Date::parse(value.trim(), format) {
                    query.push_str(&format!("&{key}={date}"));
                }
            }
        }

        query
    }
}

fn parse_date(text: &str, bound: &str) -> Result<Date, ValidationError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::InvalidPeriod(format!(
            "a custom period needs a {bound} date"
        )));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidPeriod(format!("\"{text}\" is not a valid {bound} date"))
    })
}

const END_OF_DAY: Time = time!(23:59:59.999_999_999);

/// The window of transaction dates a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    AllTime,
    ThisMonth,
    LastMonth,
    /// Both days are included.
    Custom { start: Date, end: Date },
}

impl ReportPeriod {
    /// The label printed on reports, e.g. "Custom: 01/03/2025 - 31/03/2025".
    pub fn label(&self) -> String {
        let format = format_description!("[day]/[month]/[year]");

        match self {
            ReportPeriod::AllTime => PeriodKind::AllTime.label().to_owned(),
            ReportPeriod::ThisMonth => PeriodKind::ThisMonth.label().to_owned(),
            ReportPeriod::LastMonth => PeriodKind::LastMonth.label().to_owned(),
            ReportPeriod::Custom { start, end } => format!(
                "Custom: {} - {}",
                start.format(format).unwrap_or_default(),
                end.format(format).unwrap_or_default()
            ),
        }
    }

    /// The first and last day of the period, or `None` for all time.
    pub fn date_range(&self, today: Date) -> Option<RangeInclusive<Date>> {
        match *self {
            ReportPeriod::AllTime => None,
            ReportPeriod::ThisMonth => Some(month_range(today.year(), today.month())),
            ReportPeriod::LastMonth => {
                let year = if today.month() == Month::January {
                    today.year() - 1
                } else {
                    today.year()
                };

                Some(month_range(year, today.month().previous()))
            }
            ReportPeriod::Custom { start, end } => Some(start..=end),
        }
    }

    /// The instants a transaction must have been created between to be in
    /// the period, from the start of the first day to the end of the last
    /// day in the local timezone.
    pub fn created_between(
        &self,
        now: OffsetDateTime,
        local_offset: UtcOffset,
    ) -> Option<RangeInclusive<OffsetDateTime>> {
        let today = now.to_offset(local_offset).date();

        self.date_range(today).map(|dates| {
            let start = dates.start().with_time(Time::MIDNIGHT).assume_offset(local_offset);
            let end = dates.end().with_time(END_OF_DAY).assume_offset(local_offset);

            start..=end
        })
    }
}

fn month_range(year: i32, month: Month) -> RangeInclusive<Date> {
    // Every year and month that reaches here comes from a valid date, so the
    // first of the month is always valid too.
    let first = Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN);
    let next_first = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
        _ => Date::from_calendar_date(year, month.next(), 1),
    };
    let last = next_first
        .ok()
        .and_then(Date::previous_day)
        .unwrap_or(Date::MAX);

    first..=last
}
