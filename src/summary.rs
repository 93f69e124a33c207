use crate::formatting;
use crate::trend::Direction;
use crate::{StatCard, WindowRow};
use chrono::{DateTime, Local, NaiveDate};
use colored::Colorize;
use std::path::Path;

const COMPACT_ROWS: usize = 10;

pub struct SummaryPaths<'a> {
    pub csv: Option<&'a Path>,
    pub html: Option<&'a Path>,
}

pub struct SummaryContext<'a> {
    pub run_started_at: &'a DateTime<Local>,
    pub total_days: usize,
    pub window_label: &'static str,
    pub latest_date: Option<NaiveDate>,
    pub cards: &'a [StatCard],
    pub rows: &'a [WindowRow],
    pub paths: SummaryPaths<'a>,
    pub full_output: bool,
}

pub fn print_summary(context: &SummaryContext<'_>) {
    println!();
    print_summary_header(context);
    print_summary_paths(&context.paths);
    println!();

    if context.cards.is_empty() {
        println!(
            "{}",
            "No records collected yet; waiting for the first scrape.".bright_black()
        );
        return;
    }

    println!("{}", "Latest Snapshot".bold().bright_magenta());
    print_stat_cards(context.cards);
    println!();
    println!(
        "{}",
        format!("History ({})", context.window_label)
            .bold()
            .bright_magenta()
    );
    let table_width = print_history_table(context.rows, context.full_output);
    if table_width > 0 {
        let divider = "=".repeat(table_width);
        println!("{}", divider.bright_cyan());
    }
}

fn print_summary_header(context: &SummaryContext<'_>) {
    println!(
        "{}",
        "===================== Fangstat Daily Update ====================="
            .bold()
            .bright_cyan()
    );
    println!(
        "{} {}",
        "Run started".bright_yellow().bold(),
        context
            .run_started_at
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
            .bright_white()
    );
    let latest = context
        .latest_date
        .map_or_else(|| "-".to_string(), |date| date.to_string());
    println!(
        "{} {} | {} | {}",
        "Coverage".bright_yellow().bold(),
        format!("Days on record: {}", context.total_days).bright_white(),
        format!("Showing: {}", context.window_label).bright_white(),
        format!("Latest: {latest}").bright_white()
    );
}

fn print_summary_paths(paths: &SummaryPaths<'_>) {
    print_path_line("History CSV", paths.csv, "not saved (use --save-csv)");
    print_path_line("HTML Report", paths.html, "not saved (use --save-html)");
}

fn print_path_line(label: &str, path: Option<&Path>, hint: &str) {
    let label_colored = label.bright_yellow().bold();
    match path {
        Some(path) => println!(
            "{} {}",
            label_colored,
            format!("{}", path.display()).bright_white()
        ),
        None => println!("{} {}", label_colored, hint.bright_black()),
    }
}

fn print_stat_cards(cards: &[StatCard]) {
    for card in cards {
        let trend_label = card.trend.as_ref().map_or_else(
            || "-".to_string(),
            |movement| format!("{} {}", movement.direction.arrow(), movement.pct),
        );
        let line = format!("{:<18} {:>14} {:>9}", card.label, card.value, trend_label);
        let line = match card.trend.as_ref().map(|movement| movement.direction) {
            Some(Direction::Up) => line.bright_green(),
            Some(Direction::Down) => line.bright_red(),
            Some(Direction::Flat) | None => line.bright_white(),
        };
        if card.note.is_empty() {
            println!("{line}");
        } else {
            println!("{line}  {}", card.note.bright_black());
        }
    }
}

fn print_history_table(rows: &[WindowRow], full_output: bool) -> usize {
    if rows.is_empty() {
        let message = "No rows in the selected window.";
        println!("{}", message.bright_black());
        return message.len();
    }

    let header = format!(
        "{:>6} | {:>8} | {:>12} | {:>9} | {:>8} | {:>12} | {:>9}",
        "Date", "SH Units", "SH Area", "SH Avg", "NH Units", "NH Area", "Listings"
    );
    let separator =
        "-------+----------+--------------+-----------+----------+--------------+----------";
    let mut max_width = header.len().max(separator.len());
    println!("{}", header.bold().bright_white());
    println!("{}", separator.bright_black());

    let visible = if full_output {
        rows
    } else {
        tail(rows, COMPACT_ROWS)
    };
    for row in visible {
        let line = format!(
            "{:>6} | {:>8} | {:>12} | {:>9} | {:>8} | {:>12} | {:>9}",
            formatting::format_month_day(row.date),
            formatting::format_count(row.second_hand_units),
            formatting::format_area(row.second_hand_area),
            formatting::format_area(row.second_hand_avg_area),
            formatting::format_count(row.new_house_units),
            formatting::format_area(row.new_house_area),
            formatting::format_count(row.listing_total),
        );
        max_width = max_width.max(line.len());
        println!("{}", line.bright_green());
    }

    let hidden = rows.len() - visible.len();
    if hidden > 0 {
        let message = format!("... {hidden} earlier rows (use --full-output to display all).");
        max_width = max_width.max(message.len());
        println!("{}", message.bright_black());
    }

    max_width
}

fn tail(rows: &[WindowRow], len: usize) -> &[WindowRow] {
    &rows[rows.len().saturating_sub(len)..]
}
