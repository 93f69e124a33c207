use crate::trend::Movement;
use crate::write_output_file;
use crate::{StatCard, WindowRow, formatting};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;

pub struct HtmlReportPaths<'a> {
    pub csv: Option<&'a Path>,
}

pub struct HtmlReportContext<'a> {
    pub run_started_at: &'a DateTime<Local>,
    pub total_days: usize,
    pub window_label: &'static str,
    pub cards: &'a [StatCard],
    pub rows: &'a [WindowRow],
    pub full_output: bool,
    pub paths: HtmlReportPaths<'a>,
    pub output_path: &'a Path,
}

pub async fn save_html_report(output_path: &Path, context: &HtmlReportContext<'_>) -> Result<()> {
    let html = render_html_report(context);
    let minified = minify_html::minify(html.as_bytes(), &minify_html::Cfg::new());
    write_output_file(output_path, &minified).await
}

fn render_html_report(context: &HtmlReportContext<'_>) -> String {
    let generated_at = context
        .run_started_at
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string();
    let coverage = format!(
        "{} days on record, showing {}",
        context.total_days, context.window_label
    );
    let title = format!(
        "上海房地产日报 - {}",
        context.run_started_at.format("%Y-%m-%d")
    );

    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"zh-CN\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("<meta name=\"color-scheme\" content=\"light\">\n");
    html.push_str(&format!(
        "<link rel=\"preconnect\" href=\"{CDN_FONTS_GOOGLEAPIS}\">\n"
    ));
    html.push_str(&format!(
        "<link rel=\"preconnect\" href=\"{CDN_FONTS_GSTATIC}\" crossorigin>\n"
    ));
    html.push_str(&format!(
        "<link href=\"{CDN_FONTS_STYLESHEET}\" rel=\"stylesheet\">\n"
    ));
    html.push_str("<style>\n");
    html.push_str(REPORT_STYLE);
    html.push_str("\n</style>\n</head>\n<body>\n");
    html.push_str("<div class=\"page\">\n");

    html.push_str("<header class=\"hero\">\n");
    html.push_str(&format!(
        "<div class=\"pill\">Fangstat v{}</div>\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("<h1>上海房地产日报</h1>\n");
    html.push_str("<p class=\"subtitle\">Daily second-hand, new-house, and listing statistics for the Shanghai housing market, collected from 网上房地产 (fangdi.com.cn).</p>\n");
    html.push_str("<div class=\"meta\">\n");
    html.push_str(&format!(
        "<div><span class=\"label\">Generated</span><span class=\"value mono\">{}</span></div>\n",
        escape_html(&generated_at)
    ));
    html.push_str(&format!(
        "<div><span class=\"label\">Coverage</span><span class=\"value mono\">{}</span></div>\n",
        escape_html(&coverage)
    ));
    html.push_str("</div>\n");
    html.push_str("</header>\n");

    if context.cards.is_empty() {
        html.push_str("<section class=\"empty\">\n");
        html.push_str("<p>暂无数据，等待首次采集。</p>\n");
        html.push_str(
            "<p class=\"muted\">No records collected yet; waiting for the first scrape.</p>\n",
        );
        html.push_str("</section>\n");
    } else {
        html.push_str(&render_cards(context.cards));
        html.push_str(&render_chart_section(context.rows));
        html.push_str(&render_table_section(
            context.rows,
            context.full_output,
        ));
    }

    html.push_str(&render_downloads(context));

    html.push_str("<footer class=\"footer\">\n");
    html.push_str("<div>数据来源: 网上房地产 fangdi.com.cn。二手房为昨日网签口径（T+1），新房为当日累计。</div>\n");
    html.push_str("</footer>\n");
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_cards(cards: &[StatCard]) -> String {
    let mut section = String::from("<section class=\"cards\">\n");
    for card in cards {
        section.push_str("<div class=\"card\">\n");
        section.push_str(&format!(
            "<div class=\"card-label\">{}</div>\n",
            escape_html(card.zh)
        ));
        section.push_str(&format!(
            "<div class=\"card-value\">{}</div>\n",
            escape_html(&card.value)
        ));
        section.push_str(&format!(
            "<div class=\"card-trend\">{}</div>\n",
            render_trend_pill(card.trend.as_ref())
        ));
        if !card.note.is_empty() {
            section.push_str(&format!(
                "<div class=\"card-note\">{}</div>\n",
                escape_html(&card.note)
            ));
        }
        section.push_str("</div>\n");
    }
    section.push_str("</section>\n");
    section
}

fn render_trend_pill(trend: Option<&Movement>) -> String {
    trend.map_or_else(
        || "<span class=\"trend neutral\">-</span>".to_string(),
        |movement| {
            format!(
                "<span class=\"trend {}\">{} {}</span>",
                movement.direction.css_class(),
                movement.direction.arrow(),
                movement.pct
            )
        },
    )
}

fn render_chart_section(rows: &[WindowRow]) -> String {
    let mut section = String::from("<section class=\"chart-section\">\n");
    section.push_str("<div class=\"section-header\">\n<h2>成交走势</h2>\n");
    section.push_str("<div class=\"legend\">");
    section.push_str("<span class=\"swatch second-hand\"></span>二手房 ");
    section.push_str("<span class=\"swatch new-house\"></span>新房");
    section.push_str("</div>\n</div>\n");
    section.push_str("<div class=\"chart\">\n");
    section.push_str(&render_units_chart(rows));
    section.push_str("</div>\n</section>\n");
    section
}

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 220.0;
const PAD_LEFT: f64 = 46.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 14.0;
const PAD_BOTTOM: f64 = 28.0;

/// Inline SVG of daily units sold across the window. Days without an
/// observation leave a gap in the line; they are never drawn as zero.
fn render_units_chart(rows: &[WindowRow]) -> String {
    let second_hand: Vec<Option<u64>> = rows.iter().map(|row| row.second_hand_units).collect();
    let new_house: Vec<Option<u64>> = rows.iter().map(|row| row.new_house_units).collect();

    let max = second_hand
        .iter()
        .chain(new_house.iter())
        .filter_map(|value| *value)
        .max()
        .filter(|&max| max > 0);
    let Some(max) = max else {
        return "<p class=\"muted\">窗口内暂无成交数据。</p>\n".to_string();
    };

    let baseline = CHART_HEIGHT - PAD_BOTTOM;
    let mut svg = format!(
        "<svg viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" role=\"img\" aria-label=\"Daily units sold\">\n"
    );
    svg.push_str(&format!(
        "<line class=\"axis\" x1=\"{PAD_LEFT}\" y1=\"{baseline}\" x2=\"{:.1}\" y2=\"{baseline}\"/>\n",
        CHART_WIDTH - PAD_RIGHT
    ));
    svg.push_str(&format!(
        "<text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
        PAD_LEFT - 6.0,
        PAD_TOP + 4.0,
        formatting::format_count(Some(max))
    ));
    svg.push_str(&format!(
        "<text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">0</text>\n",
        PAD_LEFT - 6.0,
        baseline + 4.0
    ));

    svg.push_str(&render_series("second-hand", &second_hand, max));
    svg.push_str(&render_series("new-house", &new_house, max));

    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        svg.push_str(&format!(
            "<text class=\"tick\" x=\"{PAD_LEFT}\" y=\"{:.1}\">{}</text>\n",
            CHART_HEIGHT - 8.0,
            formatting::format_month_day(first.date)
        ));
        if rows.len() > 1 {
            svg.push_str(&format!(
                "<text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
                CHART_WIDTH - PAD_RIGHT,
                CHART_HEIGHT - 8.0,
                formatting::format_month_day(last.date)
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_series(class: &str, values: &[Option<u64>], max: u64) -> String {
    let mut out = String::new();
    let mut run: Vec<(f64, f64)> = Vec::new();

    for (idx, value) in values.iter().enumerate() {
        match value {
            Some(value) => {
                let point = (chart_x(idx, values.len()), chart_y(*value, max));
                out.push_str(&format!(
                    "<circle class=\"dot {class}\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\"/>\n",
                    point.0, point.1
                ));
                run.push(point);
            }
            None => {
                out.push_str(&flush_run(class, &run));
                run.clear();
            }
        }
    }
    out.push_str(&flush_run(class, &run));
    out
}

fn flush_run(class: &str, run: &[(f64, f64)]) -> String {
    if run.len() < 2 {
        return String::new();
    }
    let points: Vec<String> = run
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect();
    format!(
        "<polyline class=\"line {class}\" points=\"{}\"/>\n",
        points.join(" ")
    )
}

#[allow(clippy::cast_precision_loss)]
fn chart_x(idx: usize, len: usize) -> f64 {
    let span = CHART_WIDTH - PAD_LEFT - PAD_RIGHT;
    if len < 2 {
        return PAD_LEFT + span / 2.0;
    }
    PAD_LEFT + span * idx as f64 / (len - 1) as f64
}

#[allow(clippy::cast_precision_loss)]
fn chart_y(value: u64, max: u64) -> f64 {
    let span = CHART_HEIGHT - PAD_TOP - PAD_BOTTOM;
    PAD_TOP + span * (1.0 - value as f64 / max as f64)
}

fn render_table_section(rows: &[WindowRow], full_output: bool) -> String {
    let mut section = String::from("<section class=\"table-section\">\n");
    section.push_str("<div class=\"section-header\">\n<div>\n<h2>历史数据</h2>\n");
    let visible = if full_output {
        rows.len()
    } else {
        rows.len().min(COMPACT_TABLE_ROWS)
    };
    if visible < rows.len() {
        section.push_str(&format!(
            "<div class=\"hint\">Showing the latest {visible} of {} days. Run with --full-output to include every row.</div>\n",
            rows.len()
        ));
    }
    section.push_str("</div>\n</div>\n");
    section.push_str("<div class=\"table-wrap\">\n<table>\n");
    section.push_str("<thead><tr><th>日期</th><th>二手套数</th><th>二手面积</th><th>套均</th><th>新房套数</th><th>新房面积</th><th>挂牌量</th></tr></thead>\n");
    section.push_str("<tbody>\n");
    // Most recent first in the report table.
    for row in rows.iter().rev().take(visible) {
        section.push_str("<tr>");
        section.push_str(&format!(
            "<td class=\"num\">{}</td>",
            formatting::format_month_day(row.date)
        ));
        for cell in [
            formatting::format_count(row.second_hand_units),
            formatting::format_area(row.second_hand_area),
            formatting::format_area(row.second_hand_avg_area),
            formatting::format_count(row.new_house_units),
            formatting::format_area(row.new_house_area),
            formatting::format_count(row.listing_total),
        ] {
            section.push_str(&format!("<td class=\"num\">{}</td>", escape_html(&cell)));
        }
        section.push_str("</tr>\n");
    }
    section.push_str("</tbody>\n</table>\n</div>\n</section>\n");
    section
}

const COMPACT_TABLE_ROWS: usize = 10;

fn render_downloads(context: &HtmlReportContext<'_>) -> String {
    let mut section = String::from("<section class=\"downloads\">\n<h3>Downloads</h3>\n");
    let Some(csv) = context.paths.csv else {
        section
            .push_str("<p class=\"muted\">No CSV file was saved. Use --save-csv.</p>\n</section>\n");
        return section;
    };

    let full_display = csv.to_string_lossy();
    let display_name = csv
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(full_display.as_ref());
    section.push_str("<div class=\"download-item\">\n");
    section.push_str("<div class=\"download-label\">History CSV</div>\n");
    if let Some(rel) = relative_link(context.output_path, csv) {
        section.push_str(&format!(
            "<a class=\"download-link\" href=\"{}\" title=\"{}\">{}</a>\n",
            escape_html(&rel),
            escape_html(full_display.as_ref()),
            escape_html(display_name)
        ));
    } else {
        section.push_str(&format!(
            "<span class=\"download-path\" title=\"{}\">{}</span>\n",
            escape_html(full_display.as_ref()),
            escape_html(display_name)
        ));
    }
    section.push_str("</div>\n</section>\n");
    section
}

fn relative_link(html_path: &Path, target: &Path) -> Option<String> {
    let html_dir = html_path.parent()?;
    let target_dir = target.parent()?;
    if html_dir == target_dir {
        target
            .file_name()
            .and_then(|name| name.to_str())
            .map(std::string::ToString::to_string)
    } else {
        None
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const CDN_FONTS_GOOGLEAPIS: &str = "https://fonts.googleapis.com";
const CDN_FONTS_GSTATIC: &str = "https://fonts.gstatic.com";
const CDN_FONTS_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Noto+Serif+SC:wght@600;700&family=JetBrains+Mono:wght@400;500&family=Noto+Sans+SC:wght@400;500;700&display=swap";

const REPORT_STYLE: &str = r#"
:root {
  color-scheme: light;
  --bg-top: #f7f4ee;
  --bg-bottom: #efe8dc;
  --ink: #201c17;
  --muted: #6d655c;
  --card: #ffffff;
  --up: #2f6f54;
  --up-soft: rgba(129, 178, 154, 0.2);
  --down: #8b2d17;
  --down-soft: rgba(224, 122, 95, 0.22);
  --accent: #b3512f;
  --accent-cool: #3d405b;
  --border: #e3d7c7;
  --shadow: 0 24px 60px rgba(28, 25, 23, 0.12);
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: "Noto Sans SC", "PingFang SC", "Segoe UI", sans-serif;
  color: var(--ink);
  background:
    radial-gradient(circle at top left, #ffffff 0%, transparent 45%),
    linear-gradient(150deg, var(--bg-top), var(--bg-bottom));
}

.page {
  max-width: 1080px;
  margin: 0 auto;
  padding: 48px 24px 64px;
}

.hero {
  background: linear-gradient(120deg, #ffffff, #fdf3ec);
  border: 1px solid var(--border);
  border-radius: 24px;
  padding: 32px 36px;
  box-shadow: var(--shadow);
}

.pill {
  display: inline-flex;
  align-items: center;
  padding: 6px 14px;
  border-radius: 999px;
  background: rgba(61, 64, 91, 0.12);
  color: var(--accent-cool);
  font-size: 13px;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.08em;
}

h1 {
  font-family: "Noto Serif SC", "Songti SC", serif;
  font-size: clamp(2.2rem, 4vw, 3rem);
  margin: 16px 0 8px;
}

.subtitle {
  margin: 0 0 16px;
  color: var(--muted);
  max-width: 640px;
  line-height: 1.6;
}

.meta {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
  gap: 12px;
}

.label {
  display: block;
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.1em;
  color: var(--muted);
  margin-bottom: 4px;
}

.value {
  font-weight: 600;
}

.mono {
  font-family: "JetBrains Mono", "SFMono-Regular", ui-monospace, monospace;
}

.empty {
  margin: 28px 0;
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 18px;
  padding: 36px;
  text-align: center;
  font-size: 18px;
}

.cards {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin: 28px 0;
}

.card {
  background: var(--card);
  border-radius: 18px;
  padding: 18px 20px;
  border: 1px solid var(--border);
  box-shadow: 0 16px 40px rgba(34, 30, 24, 0.08);
}

.card-label {
  font-size: 13px;
  color: var(--muted);
  margin-bottom: 8px;
}

.card-value {
  font-size: 26px;
  font-weight: 700;
  color: var(--accent-cool);
  font-variant-numeric: tabular-nums;
}

.card-trend {
  margin-top: 8px;
}

.card-note {
  margin-top: 8px;
  font-size: 12px;
  color: var(--muted);
}

.trend {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  padding: 2px 10px;
  border-radius: 999px;
  font-size: 12px;
  font-weight: 600;
  min-width: 52px;
}

.trend.up {
  background: var(--up-soft);
  color: var(--up);
}

.trend.down {
  background: var(--down-soft);
  color: var(--down);
}

.trend.neutral {
  background: rgba(61, 64, 91, 0.12);
  color: var(--accent-cool);
}

.chart-section,
.table-section {
  margin: 32px 0 24px;
}

.section-header {
  display: flex;
  justify-content: space-between;
  align-items: flex-end;
  gap: 16px;
  flex-wrap: wrap;
  margin-bottom: 16px;
}

.section-header h2 {
  margin: 0 0 6px;
  font-family: "Noto Serif SC", "Songti SC", serif;
  font-size: 1.7rem;
}

.hint {
  color: var(--muted);
  font-size: 13px;
}

.legend {
  color: var(--muted);
  font-size: 13px;
}

.swatch {
  display: inline-block;
  width: 12px;
  height: 12px;
  border-radius: 3px;
  margin: 0 6px 0 12px;
  vertical-align: -1px;
}

.swatch.second-hand {
  background: var(--accent);
}

.swatch.new-house {
  background: var(--accent-cool);
}

.chart {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 20px;
  padding: 18px;
  box-shadow: var(--shadow);
}

.chart svg {
  display: block;
  width: 100%;
  height: auto;
}

.line {
  fill: none;
  stroke-width: 2.5;
  stroke-linejoin: round;
  stroke-linecap: round;
}

.line.second-hand {
  stroke: var(--accent);
}

.line.new-house {
  stroke: var(--accent-cool);
}

.dot.second-hand {
  fill: var(--accent);
}

.dot.new-house {
  fill: var(--accent-cool);
}

.axis {
  stroke: var(--border);
  stroke-width: 1;
}

.tick {
  font-size: 11px;
  fill: var(--muted);
  font-family: "JetBrains Mono", ui-monospace, monospace;
}

.table-wrap {
  border-radius: 20px;
  overflow: auto;
  border: 1px solid var(--border);
  background: var(--card);
  box-shadow: var(--shadow);
  max-height: 70vh;
}

table {
  width: 100%;
  border-collapse: collapse;
  min-width: 720px;
}

thead th {
  position: sticky;
  top: 0;
  background: var(--accent-cool);
  color: #f8fafc;
  text-align: right;
  font-size: 12px;
  letter-spacing: 0.08em;
  padding: 14px 16px;
  z-index: 2;
}

tbody td {
  padding: 12px 16px;
  border-bottom: 1px solid rgba(227, 215, 199, 0.6);
  font-size: 14px;
}

tbody tr:nth-child(even) {
  background: rgba(247, 244, 238, 0.6);
}

tbody tr:hover {
  background: rgba(179, 81, 47, 0.1);
}

.num {
  text-align: right;
  font-variant-numeric: tabular-nums;
  font-family: "JetBrains Mono", "SFMono-Regular", ui-monospace, monospace;
}

.downloads {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 18px;
  padding: 20px 24px;
  box-shadow: 0 16px 40px rgba(34, 30, 24, 0.08);
}

.downloads h3 {
  margin: 0 0 12px;
  font-family: "Noto Serif SC", "Songti SC", serif;
  font-size: 1.4rem;
}

.download-item {
  padding: 12px 14px;
  border-radius: 12px;
  border: 1px solid rgba(227, 215, 199, 0.7);
  background: rgba(247, 244, 238, 0.6);
  max-width: 320px;
}

.download-label {
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--muted);
  margin-bottom: 6px;
}

.download-link,
.download-path {
  color: var(--accent);
  font-weight: 600;
  text-decoration: none;
  word-break: break-all;
}

.download-link:hover {
  text-decoration: underline;
}

.muted {
  color: var(--muted);
}

.footer {
  margin-top: 28px;
  color: var(--muted);
  font-size: 13px;
  text-align: center;
}

@media (max-width: 720px) {
  .page {
    padding: 32px 16px 48px;
  }

  .hero {
    padding: 24px;
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::{Direction, Movement};
    use chrono::TimeZone;

    fn row(date: &str, sh_units: Option<u64>, nh_units: Option<u64>) -> WindowRow {
        WindowRow {
            date: date.parse().unwrap(),
            second_hand_units: sh_units,
            second_hand_area: None,
            second_hand_avg_area: None,
            new_house_units: nh_units,
            new_house_area: None,
            listing_total: None,
        }
    }

    #[test]
    fn escape_html_covers_the_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'quote'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;quote&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("二手房 527套"), "二手房 527套");
    }

    #[test]
    fn trend_pill_carries_direction_class_and_label() {
        let movement = Movement {
            direction: Direction::Up,
            pct: "+3.2%".to_string(),
        };
        let pill = render_trend_pill(Some(&movement));
        assert!(pill.contains("trend up"));
        assert!(pill.contains("↑ +3.2%"));
        assert_eq!(render_trend_pill(None), "<span class=\"trend neutral\">-</span>");
    }

    #[test]
    fn gap_days_split_the_chart_line() {
        let rows = vec![
            row("2025-08-04", Some(100), None),
            row("2025-08-05", None, None),
            row("2025-08-06", Some(120), None),
        ];
        let svg = render_units_chart(&rows);
        // Two isolated points: dots only, no connecting line across the gap.
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn continuous_days_draw_one_line_per_series() {
        let rows = vec![
            row("2025-08-04", Some(100), Some(50)),
            row("2025-08-05", Some(110), Some(55)),
            row("2025-08-06", Some(120), Some(60)),
        ];
        let svg = render_units_chart(&rows);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 6);
        assert!(svg.contains("line second-hand"));
        assert!(svg.contains("line new-house"));
    }

    #[test]
    fn chart_without_observations_reports_no_data() {
        let rows = vec![row("2025-08-04", None, None)];
        let svg = render_units_chart(&rows);
        assert!(svg.contains("暂无成交数据"));
        assert!(!svg.contains("<svg"));
    }

    #[test]
    fn relative_link_only_for_sibling_files() {
        assert_eq!(
            relative_link(
                Path::new("data/output/report.html"),
                Path::new("data/output/history.csv")
            ),
            Some("history.csv".to_string())
        );
        assert_eq!(
            relative_link(
                Path::new("data/output/report.html"),
                Path::new("elsewhere/history.csv")
            ),
            None
        );
    }

    #[test]
    fn report_renders_waiting_state_for_empty_history() {
        let run_started_at = Local.with_ymd_and_hms(2025, 8, 6, 9, 0, 0).unwrap();
        let context = HtmlReportContext {
            run_started_at: &run_started_at,
            total_days: 0,
            window_label: "last 30 days",
            cards: &[],
            rows: &[],
            full_output: false,
            paths: HtmlReportPaths { csv: None },
            output_path: Path::new("data/output/report.html"),
        };
        let html = render_html_report(&context);
        assert!(html.contains("暂无数据，等待首次采集。"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn report_renders_cards_and_table_rows() {
        let run_started_at = Local.with_ymd_and_hms(2025, 8, 6, 9, 0, 0).unwrap();
        let cards = vec![StatCard {
            label: "Second-hand units",
            zh: "二手房成交套数",
            value: "527".to_string(),
            trend: Some(Movement {
                direction: Direction::Down,
                pct: "-1.9%".to_string(),
            }),
            note: "昨日网签成交（T+1）".to_string(),
        }];
        let rows = vec![
            row("2025-08-05", Some(537), Some(210)),
            row("2025-08-06", Some(527), Some(250)),
        ];
        let context = HtmlReportContext {
            run_started_at: &run_started_at,
            total_days: 2,
            window_label: "last 30 days",
            cards: &cards,
            rows: &rows,
            full_output: false,
            paths: HtmlReportPaths { csv: None },
            output_path: Path::new("data/output/report.html"),
        };
        let html = render_html_report(&context);
        assert!(html.contains("二手房成交套数"));
        assert!(html.contains("trend down"));
        assert!(html.contains("<polyline"));
        // Most recent first in the table body.
        let tbody = &html[html.find("<tbody").unwrap()..];
        assert!(tbody.find("8/6").unwrap() < tbody.find("8/5").unwrap());
    }
}
