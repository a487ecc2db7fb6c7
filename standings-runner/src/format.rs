//! Display helpers for percentages, ratios, currency, and the leaderboard table.

use crate::ranking::{RankedEntry, RankingMetric};

/// Signed percentage with two decimals: `+12.34%`, `-3.00%`, `0.00%`.
pub fn format_pct(value: f64) -> String {
    let value = normalize_zero(value);
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Drawdown shown as a loss: `12.5` → `-12.50%`.
pub fn format_drawdown(value: f64) -> String {
    format_pct(-value)
}

/// Dimensionless ratio with two decimals.
pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", normalize_zero(value))
}

/// Currency with thousands separators: `$12,345.67`, `-$1,000.00`.
pub fn format_currency(value: f64) -> String {
    let value = normalize_zero(value);
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

// -0.0 and values that round to zero print without a sign
fn normalize_zero(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

/// Plain-text leaderboard, one row per entity.
pub fn render_table(entries: &[RankedEntry], metric: RankingMetric) -> String {
    let id_width = entries
        .iter()
        .map(|e| e.record.entity_id.len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = format!(
        "{:>4}  {:<id_width$}  {:>14}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}\n",
        "#", "Team", "Value", "Return", "Max DD", "Sharpe", "Sortino", "Calmar",
    );
    for entry in entries {
        let r = &entry.record;
        out.push_str(&format!(
            "{:>4}  {:<id_width$}  {:>14}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}\n",
            entry.rank,
            r.entity_id,
            format_currency(r.current_value),
            format_pct(r.total_return),
            format_drawdown(r.max_drawdown),
            format_ratio(r.sharpe_ratio),
            format_ratio(r.sortino_ratio),
            format_ratio(r.calmar_ratio),
        ));
    }
    let direction = if metric.is_higher_better() { "desc" } else { "asc" };
    out.push_str(&format!(
        "{} teams ranked by {metric} ({direction})\n",
        entries.len()
    ));
    out
}
