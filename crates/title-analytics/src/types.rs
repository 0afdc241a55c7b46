//! Typed catalog records and their derived dimensions.

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar months in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Whether a title is a film or a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TitleKind {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl TitleKind {
    /// Parse the raw `type` cell. Only the two catalog spellings are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Movie" => Some(TitleKind::Movie),
            "TV Show" => Some(TitleKind::TvShow),
            _ => None,
        }
    }

    /// Label as it appears in the source data.
    pub fn label(&self) -> &'static str {
        match self {
            TitleKind::Movie => "Movie",
            TitleKind::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The date a title was added together with the dimensions derived from it.
///
/// Either the whole value exists or none of it does, so year, month and
/// quarter can never disagree about whether the date was known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddedPeriod {
    pub date: NaiveDate,
    pub year: i32,
    pub month: Month,
    /// Calendar quarter, 1 through 4.
    pub quarter: u8,
}

impl AddedPeriod {
    pub fn from_date(date: NaiveDate) -> Self {
        let month0 = date.month0() as usize;
        Self {
            date,
            year: date.year(),
            month: MONTHS[month0],
            quarter: (month0 / 3 + 1) as u8,
        }
    }

    /// Full English month name, e.g. "September".
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

/// Length of a title, in the unit its kind implies.
///
/// The same free-text `duration` slot holds minutes for movies and a season
/// count for shows; the variant records which one was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Runtime {
    Minutes(Option<u32>),
    Seasons(Option<u32>),
}

/// Position of a record inside the catalog it was loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub usize);

/// One normalized catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecord {
    pub title: String,
    pub kind: TitleKind,
    /// Raw country cell; may hold several comma-separated countries.
    pub country: Option<String>,
    pub added: Option<AddedPeriod>,
    pub release_year: Option<i32>,
    /// Raw genre list; empty when the source cell was blank.
    pub listed_in: String,
    /// Raw cast list; empty when the source cell was blank.
    pub cast: String,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub runtime: Runtime,
}

impl TitleRecord {
    pub fn date_added(&self) -> Option<NaiveDate> {
        self.added.map(|p| p.date)
    }

    pub fn year_added(&self) -> Option<i32> {
        self.added.map(|p| p.year)
    }

    pub fn month_added(&self) -> Option<Month> {
        self.added.map(|p| p.month)
    }

    pub fn quarter_added(&self) -> Option<u8> {
        self.added.map(|p| p.quarter)
    }

    /// Runtime in minutes. Always `None` for TV shows.
    pub fn minutes(&self) -> Option<u32> {
        match self.runtime {
            Runtime::Minutes(minutes) => minutes,
            Runtime::Seasons(_) => None,
        }
    }

    /// Number of seasons. Always `None` for movies.
    pub fn seasons(&self) -> Option<u32> {
        match self.runtime {
            Runtime::Seasons(seasons) => seasons,
            Runtime::Minutes(_) => None,
        }
    }
}
