//! Threshold filtering and report rendering.
//!
//! Reports are Telegram HTML: symbols are bold, everything else plain text.

use crate::exchange::FundingRateSample;
use crate::utils::{exceeds_abs, round_to_precision};
use chrono::NaiveTime;
use rust_decimal::Decimal;

pub const REPORT_TITLE: &str = "Funding Rate Report";
pub const NO_MATCH_LINE: &str = "No matching symbols.";

/// Selects samples at or beyond the threshold and renders the report.
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    threshold_pct: Decimal,
}

impl AlertFormatter {
    pub fn new(threshold_pct: Decimal) -> Self {
        Self { threshold_pct }
    }

    pub fn threshold_pct(&self) -> Decimal {
        self.threshold_pct
    }

    /// Present samples with `|rate| >= threshold`, in input order.
    pub fn qualifying<'a>(&self, samples: &'a [FundingRateSample]) -> Vec<(&'a str, Decimal)> {
        samples
            .iter()
            .filter_map(|s| s.rate_pct.map(|rate| (s.symbol.as_str(), rate)))
            .filter(|(_, rate)| exceeds_abs(*rate, self.threshold_pct))
            .collect()
    }

    /// Render the full message, stamped with `at` as `HH:MM`.
    pub fn render(&self, samples: &[FundingRateSample], at: NaiveTime) -> String {
        let lines: Vec<String> = self
            .qualifying(samples)
            .into_iter()
            .map(|(symbol, rate)| render_line(symbol, rate))
            .collect();

        let body = if lines.is_empty() {
            NO_MATCH_LINE.to_string()
        } else {
            lines.join("\n")
        };

        format!(
            "✅ <b>{}</b>\n🕒 {}\n\n{}",
            REPORT_TITLE,
            at.format("%H:%M"),
            body
        )
    }
}

fn render_line(symbol: &str, rate_pct: Decimal) -> String {
    format!(
        "<b>{}</b> → {:.2}%",
        escape_html(symbol),
        round_to_precision(rate_pct, 2)
    )
}

/// Escape the three characters Telegram's HTML mode treats as markup.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
