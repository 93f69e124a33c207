use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use fangstat::cli::{self, Cli};
use fangstat::feed;
use fangstat::history::History;
use fangstat::progress::{ProgressState, Stage, run_with_spinner};
use fangstat::report::{HtmlReportContext, HtmlReportPaths, save_html_report};
use fangstat::summary::{SummaryContext, SummaryPaths, print_summary};
use fangstat::{build_stat_cards, build_window_rows, save_window_csv};
use reqwest::Client;
use std::time::Duration;

const HTTP_TIMEOUT_SECONDS: u64 = 20;

#[tokio::main]
async fn main() -> Result<()> {
    colored::control::set_override(true);

    let mut cli = Cli::parse();

    if let Some(command) = cli.command.take() {
        cli::handle_command(command)?;
        return Ok(());
    }

    let run_started_at = Local::now();
    let progress = ProgressState::new(!cli.no_progress, true);

    let records = if let Some(url) = cli.fetch.as_deref() {
        let client = Client::builder()
            .user_agent(concat!("fangstat-fetcher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .context("failed to build HTTP client")?;
        run_with_spinner(&progress, Stage::Load, url, feed::fetch(&client, url)).await?
    } else {
        let label = cli.data.display().to_string();
        run_with_spinner(&progress, Stage::Load, &label, feed::load_file(&cli.data)).await?
    };

    let history = History::from_records(records)?;
    let cards = build_stat_cards(&history);
    let rows = build_window_rows(history.window(cli.window));

    let saved_csv = match cli.save_csv.as_deref() {
        Some(path) => {
            let label = path.display().to_string();
            let saved = run_with_spinner(
                &progress,
                Stage::Render,
                &label,
                save_window_csv(&rows, path, cli.archive_csv),
            )
            .await?;
            Some(saved)
        }
        None => None,
    };

    if let Some(path) = cli.save_html.as_deref() {
        let context = HtmlReportContext {
            run_started_at: &run_started_at,
            total_days: history.len(),
            window_label: cli.window.label(),
            cards: &cards,
            rows: &rows,
            full_output: cli.full_output,
            paths: HtmlReportPaths {
                csv: saved_csv.as_deref(),
            },
            output_path: path,
        };
        let label = path.display().to_string();
        run_with_spinner(
            &progress,
            Stage::Render,
            &label,
            save_html_report(path, &context),
        )
        .await?;
    }

    progress.clear();

    print_summary(&SummaryContext {
        run_started_at: &run_started_at,
        total_days: history.len(),
        window_label: cli.window.label(),
        latest_date: history.latest().map(|record| record.date),
        cards: &cards,
        rows: &rows,
        paths: SummaryPaths {
            csv: saved_csv.as_deref(),
            html: cli.save_html.as_deref(),
        },
        full_output: cli.full_output,
    });

    Ok(())
}
