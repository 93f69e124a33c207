//! Data model for the scraped daily history feed and a read-only,
//! order-validated view over it.
//!
//! The feed is produced by the collection pipeline as a JSON array sorted
//! ascending by date; that contract is checked once here so everything
//! downstream can slice without re-validating.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::ValueEnum;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Per-section transaction stats. Every numeric field is optional: the
/// scrape can fail for one section while the others succeed, and absence
/// must stay distinguishable from a zero-activity day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionStats {
    pub units: Option<u64>,
    pub area: Option<f64>,
    /// Pre-computed by the collector as `area / units`; trusted as-is.
    pub avg_area: Option<f64>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingStats {
    pub total: Option<u64>,
    #[serde(default)]
    pub note: String,
}

/// One calendar day's snapshot of the Shanghai housing market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Capture timestamp, informational only.
    #[serde(default)]
    pub scraped_at: String,
    pub second_hand: SectionStats,
    pub new_house: SectionStats,
    pub listing: ListingStats,
}

/// The display window selected on the command line. A closed set so the
/// "everything" case is a named variant rather than a magic large number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Window {
    /// Last 30 days.
    #[value(name = "30")]
    Days30,
    /// Last 60 days.
    #[value(name = "60")]
    Days60,
    /// Entire history.
    All,
}

impl Window {
    pub const fn days(self) -> Option<usize> {
        match self {
            Self::Days30 => Some(30),
            Self::Days60 => Some(60),
            Self::All => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Days30 => "last 30 days",
            Self::Days60 => "last 60 days",
            Self::All => "full history",
        }
    }
}

/// Immutable, ascending-by-date view over the loaded records.
#[derive(Debug, Default)]
pub struct History {
    records: Vec<DayRecord>,
}

impl History {
    /// Validates the feed contract: unique dates, strictly ascending.
    /// An empty feed is valid (first-run state, nothing collected yet).
    pub fn from_records(records: Vec<DayRecord>) -> Result<Self> {
        let mut seen: FxHashSet<NaiveDate> = FxHashSet::default();
        for record in &records {
            if !seen.insert(record.date) {
                return Err(anyhow!("history contains {} twice", record.date));
            }
        }
        for pair in records.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(anyhow!(
                    "history is not sorted by date: {} appears before {}",
                    pair[0].date,
                    pair[1].date
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, or `None` when nothing has been collected.
    pub fn latest(&self) -> Option<&DayRecord> {
        self.records.last()
    }

    /// The most recent suffix selected by `window`, ascending order
    /// preserved. Shorter histories return everything they have.
    pub fn window(&self, window: Window) -> &[DayRecord] {
        window
            .days()
            .map_or(self.records.as_slice(), |days| self.last(days))
    }

    /// The last `min(len, n)` records as a suffix of the full sequence.
    pub fn last(&self, len: usize) -> &[DayRecord] {
        let start = self.records.len().saturating_sub(len);
        &self.records[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str) -> DayRecord {
        DayRecord {
            date: date.parse().unwrap(),
            scraped_at: String::new(),
            second_hand: SectionStats {
                units: None,
                area: None,
                avg_area: None,
                note: String::new(),
            },
            new_house: SectionStats {
                units: None,
                area: None,
                avg_area: None,
                note: String::new(),
            },
            listing: ListingStats {
                total: None,
                note: String::new(),
            },
        }
    }

    fn history(dates: &[&str]) -> History {
        History::from_records(dates.iter().map(|d| day(d)).collect()).unwrap()
    }

    #[test]
    fn latest_on_empty_history_is_none() {
        let history = History::from_records(Vec::new()).unwrap();
        assert!(history.latest().is_none());
        assert!(history.window(Window::All).is_empty());
    }

    #[test]
    fn latest_is_the_maximum_date() {
        let history = history(&["2025-08-01", "2025-08-02", "2025-08-03"]);
        assert_eq!(
            history.latest().unwrap().date,
            "2025-08-03".parse::<NaiveDate>().unwrap()
        );
    }

    #[test]
    fn window_returns_min_of_len_and_request_as_a_suffix() {
        let history = history(&["2025-08-01", "2025-08-02", "2025-08-03"]);

        let all = history.window(Window::All);
        assert_eq!(all.len(), 3);

        for (window, expected) in [(Window::Days30, 3), (Window::Days60, 3)] {
            let slice = history.window(window);
            assert_eq!(slice.len(), expected);
            assert_eq!(slice.first().unwrap().date, all[0].date);
        }

        // Suffix semantics for requests shorter than the history.
        let tail = history.last(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].date, "2025-08-02".parse::<NaiveDate>().unwrap());
        assert_eq!(tail[1].date, "2025-08-03".parse::<NaiveDate>().unwrap());
        assert!(history.last(0).is_empty());
        assert_eq!(history.last(99).len(), 3);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let records = vec![day("2025-08-01"), day("2025-08-01")];
        let err = History::from_records(records).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn out_of_order_dates_are_rejected() {
        let records = vec![day("2025-08-02"), day("2025-08-01")];
        let err = History::from_records(records).unwrap_err();
        assert!(err.to_string().contains("not sorted"));
    }

    #[test]
    fn record_deserializes_with_nulls_and_missing_notes() {
        let raw = r#"{
            "date": "2025-08-06",
            "scraped_at": "2025-08-06T08:30:00",
            "second_hand": {"units": 527, "area": 42244.63, "avg_area": 80.16, "note": "昨日网签成交（T+1）"},
            "new_house": {"units": null, "area": null, "avg_area": null, "note": "今日成交（当日累计）"},
            "listing": {"total": 178632}
        }"#;
        let record: DayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.second_hand.units, Some(527));
        assert_eq!(record.new_house.units, None);
        assert_eq!(record.listing.total, Some(178_632));
        assert!(record.listing.note.is_empty());
    }

    #[test]
    fn malformed_date_fails_fast() {
        let raw = r#"{
            "date": "06/08/2025",
            "second_hand": {"units": null, "area": null, "avg_area": null, "note": ""},
            "new_house": {"units": null, "area": null, "avg_area": null, "note": ""},
            "listing": {"total": null, "note": ""}
        }"#;
        assert!(serde_json::from_str::<DayRecord>(raw).is_err());
    }
}
