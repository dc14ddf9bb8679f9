// Parameters of one archiving sweep, shared by the console command and the HTTP endpoint.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::shared::core::primitives::SiteId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid site id: {0}")]
    InvalidSiteId(String),

    #[error("unknown period: {0}")]
    UnknownPeriod(String),

    #[error("at least one period is required")]
    NoPeriods,

    #[error("invalid date range (expected YYYY-MM-DD,YYYY-MM-DD): {0}")]
    InvalidDateRange(String),

    #[error("date range starts after it ends: {0}")]
    ReversedDateRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    Range,
}

impl Period {
    pub const DEFAULTS: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::Range => "range",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "range" => Ok(Period::Range),
            other => Err(RequestError::UnknownPeriod(other.to_string())),
        }
    }
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub url: Option<String>,
    pub force_idsites: Option<Vec<SiteId>>,
    pub skip_idsites: Vec<SiteId>,
    pub periods: Vec<Period>,
    pub date_range: Option<DateRange>,
}

impl Default for ArchiveRequest {
    fn default() -> Self {
        Self {
            url: None,
            force_idsites: None,
            skip_idsites: Vec::new(),
            periods: Period::DEFAULTS.to_vec(),
            date_range: None,
        }
    }
}

impl ArchiveRequest {
    /// Builds a request from the raw option strings both inbound adapters receive.
    pub fn from_options(
        url: Option<String>,
        force_idsites: Option<&str>,
        skip_idsites: Option<&str>,
        force_periods: Option<&str>,
        force_date_range: Option<&str>,
    ) -> Result<Self, RequestError> {
        Ok(Self {
            url: url.filter(|u| !u.trim().is_empty()),
            force_idsites: force_idsites.map(parse_site_ids).transpose()?,
            skip_idsites: skip_idsites.map(parse_site_ids).transpose()?.unwrap_or_default(),
            periods: match force_periods {
                Some(raw) => parse_periods(raw)?,
                None => Period::DEFAULTS.to_vec(),
            },
            date_range: force_date_range.map(parse_date_range).transpose()?,
        })
    }
}

pub fn parse_site_ids(raw: &str) -> Result<Vec<SiteId>, RequestError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<u32>()
            .map_err(|_| RequestError::InvalidSiteId(part.to_string()))?;
        if id == 0 {
            return Err(RequestError::InvalidSiteId(part.to_string()));
        }
        if !ids.contains(&SiteId(id)) {
            ids.push(SiteId(id));
        }
    }
    Ok(ids)
}

pub fn parse_periods(raw: &str) -> Result<Vec<Period>, RequestError> {
    let mut periods = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let period = part.parse::<Period>()?;
        if !periods.contains(&period) {
            periods.push(period);
        }
    }
    if periods.is_empty() {
        return Err(RequestError::NoPeriods);
    }
    Ok(periods)
}

pub fn parse_date_range(raw: &str) -> Result<DateRange, RequestError> {
    let invalid = || RequestError::InvalidDateRange(raw.to_string());
    let (start, end) = raw.split_once(',').ok_or_else(invalid)?;
    let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    if start > end {
        return Err(RequestError::ReversedDateRange(raw.to_string()));
    }
    Ok(DateRange { start, end })
}

#[cfg(test)]
mod archive_request_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_default_to_all_standard_periods() {
        let request = ArchiveRequest::from_options(None, None, None, None, None).unwrap();
        assert_eq!(request, ArchiveRequest::default());
        assert_eq!(request.periods.len(), 4);
        assert!(!request.periods.contains(&Period::Range));
    }

    #[rstest]
    fn it_should_parse_every_option() {
        let request = ArchiveRequest::from_options(
            Some("http://x/".into()),
            Some("3, 1,3"),
            Some("2"),
            Some("day,RANGE"),
            Some("2024-01-01,2024-01-31"),
        )
        .unwrap();
        assert_eq!(request.url.as_deref(), Some("http://x/"));
        assert_eq!(request.force_idsites, Some(vec![SiteId(3), SiteId(1)]));
        assert_eq!(request.skip_idsites, vec![SiteId(2)]);
        assert_eq!(request.periods, vec![Period::Day, Period::Range]);
        assert_eq!(
            request.date_range.unwrap().to_string(),
            "2024-01-01,2024-01-31"
        );
    }

    #[rstest]
    fn it_should_drop_a_blank_url() {
        let request = ArchiveRequest::from_options(Some("  ".into()), None, None, None, None).unwrap();
        assert!(request.url.is_none());
    }

    #[rstest]
    #[case("1,abc")]
    #[case("0")]
    #[case("-4")]
    fn it_should_reject_invalid_site_ids(#[case] raw: &str) {
        assert!(matches!(parse_site_ids(raw), Err(RequestError::InvalidSiteId(_))));
    }

    #[rstest]
    fn it_should_reject_unknown_or_missing_periods() {
        assert_eq!(
            parse_periods("day,fortnight"),
            Err(RequestError::UnknownPeriod("fortnight".into()))
        );
        assert_eq!(parse_periods(" , "), Err(RequestError::NoPeriods));
    }

    #[rstest]
    #[case("2024-01-01")]
    #[case("2024-01-01,yesterday")]
    #[case("01/01/2024,02/01/2024")]
    fn it_should_reject_malformed_date_ranges(#[case] raw: &str) {
        assert!(matches!(
            parse_date_range(raw),
            Err(RequestError::InvalidDateRange(_))
        ));
    }

    #[rstest]
    fn it_should_reject_a_reversed_date_range() {
        assert!(matches!(
            parse_date_range("2024-02-01,2024-01-01"),
            Err(RequestError::ReversedDateRange(_))
        ));
    }
}
