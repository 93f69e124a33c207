//! Core of the `fangstat` tool: derives stat cards and windowed table rows
//! from the scraped daily history, and writes the CSV export. The binary in
//! `main.rs` wires these into the CLI, terminal summary, and HTML report.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Writer;
use flate2::{Compression, write::GzEncoder};
use serde::Serialize;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

pub mod cli;
pub mod feed;
pub mod formatting;
pub mod history;
pub mod progress;
pub mod report;
pub mod summary;
pub mod trend;

use crate::history::{DayRecord, History};
use crate::trend::{Movement, movement, previous_observation};

/// One dashboard stat card: the latest formatted value plus the movement
/// against the previous observation of the same metric.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    /// Chinese display label, used by the HTML report.
    pub zh: &'static str,
    pub value: String,
    pub trend: Option<Movement>,
    /// The feed's note for this section on the latest day.
    pub note: String,
}

/// One row of the selected window, raw values only; formatting happens at
/// render time. Serialized as-is for the CSV export, where absent values
/// become empty cells rather than zeros.
#[derive(Debug, Clone, Serialize)]
pub struct WindowRow {
    pub date: NaiveDate,
    pub second_hand_units: Option<u64>,
    pub second_hand_area: Option<f64>,
    pub second_hand_avg_area: Option<f64>,
    pub new_house_units: Option<u64>,
    pub new_house_area: Option<f64>,
    pub listing_total: Option<u64>,
}

impl WindowRow {
    pub fn from_record(record: &DayRecord) -> Self {
        Self {
            date: record.date,
            second_hand_units: record.second_hand.units,
            second_hand_area: record.second_hand.area,
            second_hand_avg_area: record.second_hand.avg_area,
            new_house_units: record.new_house.units,
            new_house_area: record.new_house.area,
            listing_total: record.listing.total,
        }
    }
}

pub fn build_window_rows(records: &[DayRecord]) -> Vec<WindowRow> {
    records.iter().map(WindowRow::from_record).collect()
}

/// The six dashboard metrics, in display order. Empty when the history is
/// empty; the presentation layers render a waiting state instead.
pub fn build_stat_cards(history: &History) -> Vec<StatCard> {
    let Some(latest) = history.latest() else {
        return Vec::new();
    };
    let records = history.records();

    vec![
        StatCard {
            label: "Second-hand units",
            zh: "二手房成交套数",
            value: formatting::format_count(latest.second_hand.units),
            trend: card_trend(records, |r| as_value(r.second_hand.units)),
            note: latest.second_hand.note.clone(),
        },
        StatCard {
            label: "Second-hand area",
            zh: "二手房成交面积",
            value: formatting::format_area(latest.second_hand.area),
            trend: card_trend(records, |r| r.second_hand.area),
            note: latest.second_hand.note.clone(),
        },
        StatCard {
            label: "Avg. area per unit",
            zh: "二手房套均面积",
            value: formatting::format_area(latest.second_hand.avg_area),
            trend: card_trend(records, |r| r.second_hand.avg_area),
            note: latest.second_hand.note.clone(),
        },
        StatCard {
            label: "New-house units",
            zh: "新房成交套数",
            value: formatting::format_count(latest.new_house.units),
            trend: card_trend(records, |r| as_value(r.new_house.units)),
            note: latest.new_house.note.clone(),
        },
        StatCard {
            label: "New-house area",
            zh: "新房成交面积",
            value: formatting::format_area(latest.new_house.area),
            trend: card_trend(records, |r| r.new_house.area),
            note: latest.new_house.note.clone(),
        },
        StatCard {
            label: "Listings for sale",
            zh: "二手房挂牌量",
            value: formatting::format_count(latest.listing.total),
            trend: card_trend(records, |r| as_value(r.listing.total)),
            note: latest.listing.note.clone(),
        },
    ]
}

fn card_trend(
    records: &[DayRecord],
    accessor: impl Fn(&DayRecord) -> Option<f64> + Copy,
) -> Option<Movement> {
    let current = records.last().and_then(accessor);
    movement(previous_observation(records, accessor), current)
}

#[allow(clippy::cast_precision_loss)]
fn as_value(count: Option<u64>) -> Option<f64> {
    count.map(|v| v as f64)
}

/// Serializes the window to CSV; with `archive` the bytes are gzipped and
/// written next to the requested path with a `.gz` suffix. Returns the path
/// actually written.
pub async fn save_window_csv(rows: &[WindowRow], path: &Path, archive: bool) -> Result<PathBuf> {
    let mut writer = Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .context("failed to serialize history row")?;
    }
    let serialized = finalize_writer(writer, "history CSV writer")?;

    if archive {
        let archive_path = append_gz_extension(path);
        write_output_file(&archive_path, &gzip_bytes(&serialized)?).await?;
        Ok(archive_path)
    } else {
        write_output_file(path, &serialized).await?;
        Ok(path.to_path_buf())
    }
}

pub async fn write_output_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

fn finalize_writer(mut writer: Writer<Vec<u8>>, label: &str) -> Result<Vec<u8>> {
    writer
        .flush()
        .with_context(|| format!("failed to flush {label}"))?;
    writer
        .into_inner()
        .with_context(|| format!("failed to finalize {label}"))
}

fn gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .context("failed to compress CSV output")?;
    encoder.finish().context("failed to finalize CSV archive")
}

fn append_gz_extension(path: &Path) -> PathBuf {
    path.file_name().map_or_else(
        || path.join("history.csv.gz"),
        |name| {
            let mut name = name.to_os_string();
            name.push(".gz");
            path.with_file_name(name)
        },
    )
}
