//! "Fund our backlog" badge: view model and SVG rendering.

use askama::Template;

use pledge_core::{goal_progress, money::format_cents, Issue};

use crate::errors::Result;

/// Served with a non-200 status whenever the badge cannot be produced, so an
/// embedding `<img>` never shows a broken image.
pub const PLACEHOLDER_SVG: &str =
    r#"<svg width="1" height="1" viewBox="0 0 1 1" xmlns="http://www.w3.org/2000/svg"></svg>"#;

const WIDTH: u32 = 400;
const HEADER_HEIGHT: u32 = 48;
const ROW_HEIGHT: u32 = 52;
const FOOTER_HEIGHT: u32 = 32;
const BAR_WIDTH: u32 = 120;
const MAX_TITLE_CHARS: usize = 44;

pub struct BadgeRow {
    pub y: u32,
    pub title: String,
    pub number: u64,
    pub funding_label: String,
    /// Filled part of the progress bar, clamped to the bar.
    pub bar_fill: u32,
    pub has_goal: bool,
}

#[derive(Template)]
#[template(path = "fund_our_backlog.svg", escape = "html")]
pub struct FundOurBacklogView {
    pub width: u32,
    pub height: u32,
    pub bar_x: u32,
    pub bar_width: u32,
    pub rows: Vec<BadgeRow>,
    pub footer_y: u32,
    pub more_label: String,
}

impl FundOurBacklogView {
    pub fn new(issues: &[Issue], max_rows: usize) -> Self {
        let rows: Vec<BadgeRow> = issues
            .iter()
            .take(max_rows)
            .enumerate()
            .map(|(i, issue)| badge_row(issue, HEADER_HEIGHT + i as u32 * ROW_HEIGHT))
            .collect();

        let footer_y = HEADER_HEIGHT + rows.len() as u32 * ROW_HEIGHT;
        let more = issues.len().saturating_sub(rows.len());
        let more_label = match (issues.is_empty(), more) {
            (true, _) => "No funded issues yet".to_string(),
            (false, 0) => "Back an issue with a pledge".to_string(),
            (false, 1) => "+ 1 more issue seeking funding".to_string(),
            (false, n) => format!("+ {n} more issues seeking funding"),
        };

        Self {
            width: WIDTH,
            height: footer_y + FOOTER_HEIGHT,
            bar_x: WIDTH - BAR_WIDTH - 16,
            bar_width: BAR_WIDTH,
            rows,
            footer_y,
            more_label,
        }
    }
}

fn badge_row(issue: &Issue, y: u32) -> BadgeRow {
    let funded = issue
        .funding
        .pledges_sum
        .as_ref()
        .map(|s| s.amount)
        .unwrap_or(0);
    let progress = goal_progress(funded, &issue.funding);

    let funding_label = match issue.funding.goal_amount() {
        Some(goal) => format!(
            "${} / ${} funded",
            format_cents(funded, false, true),
            format_cents(goal, false, true)
        ),
        None => format!("${} funded", format_cents(funded, false, true)),
    };

    let bar_fill = progress
        .map(|pct| ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as u32)
        .unwrap_or(0);

    BadgeRow {
        y,
        title: truncate_title(&issue.title),
        number: issue.number,
        funding_label,
        bar_fill,
        has_goal: progress.is_some(),
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
    cut.push('…');
    cut
}

pub fn render_badge(issues: &[Issue], max_rows: usize) -> Result<String> {
    Ok(FundOurBacklogView::new(issues, max_rows).render()?)
}
