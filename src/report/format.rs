//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis core stays free of presentation concerns
//! - the same text sections feed both the terminal and the narrative prompts

use crate::analysis::score::{
    CORRELATION_POSITIVE, CORRELATION_STRONG_INVERSE, LIQUIDITY_CONTRACTING_PCT,
    LIQUIDITY_EXPANDING_PCT, SPREAD_CALM, SPREAD_STRESSED,
};
use crate::analysis::{AnalysisOutput, CompositeScore, CorrelationMatrix, SignalReadings};
use crate::domain::{AnalysisConfig, NET_LIQUIDITY};
use crate::report::{AssetLine, MarketSummary};

/// Full report: data, correlations, signals and the composite score.
pub fn format_run_summary(summary: &MarketSummary, output: &AnalysisOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== liq - Net Liquidity / Dollar / Credit signals ===\n");
    out.push_str(&format!(
        "Range: {} .. {} ({} rows) | lookback={}d | window={} | as-of {}\n",
        summary.first_date,
        summary.last_date,
        summary.rows,
        config.lookback.days,
        config.window,
        config.lookback.as_of,
    ));

    out.push_str("\nMarket data:\n");
    out.push_str(&format_data_summary(summary));

    out.push_str("\nCorrelations:\n");
    out.push_str(&format_correlation_summary(output));

    out.push_str("\nSignals:\n");
    out.push_str(&format_signals_summary(&output.readings, config));

    out.push('\n');
    out.push_str(&format_score(&output.score));

    out
}

pub fn format_data_summary(summary: &MarketSummary) -> String {
    let mut out = String::new();
    for line in &summary.assets {
        out.push_str(&format_asset_line(line));
        out.push('\n');
    }
    out
}

fn format_asset_line(line: &AssetLine) -> String {
    let level = format_level(&line.column, line.latest);
    let change = match line.change_pct {
        Some(v) => format!("{v:+.2}% / {}d", line.change_periods),
        None => format!("n/a / {}d", line.change_periods),
    };
    let vol = line
        .volatility_pct
        .map(|v| format!(" | vol {v:.2}%"))
        .unwrap_or_default();
    format!("- {:<14} {:>14} ({change}){vol}", line.label, level)
}

fn format_level(column: &str, value: f64) -> String {
    match column {
        // Millions of USD -> trillions.
        NET_LIQUIDITY => format!("${:.2}T", value / 1e6),
        "BTC" => format!("${}", group_thousands(value)),
        "NASDAQ" | "SP500" => group_thousands(value),
        "HYSpread" => format!("{value:.2}%"),
        _ => format!("{value:.2}"),
    }
}

/// Round to an integer and insert thousands separators.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

pub fn format_correlation_summary(output: &AnalysisOutput) -> String {
    let mut out = String::new();
    let pairs = [
        (NET_LIQUIDITY, "BTC"),
        (NET_LIQUIDITY, "NASDAQ"),
        ("DXY", "BTC"),
        ("HYSpread", "SP500"),
    ];
    for (a, b) in pairs {
        out.push_str(&format!(
            "- {a} ↔ {b}: full {} | rolling {}\n",
            fmt_opt(output.matrix.get(a, b), 3),
            fmt_opt(output.rolling.latest(a, b), 3),
        ));
    }
    out
}

pub fn format_signals_summary(readings: &SignalReadings, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "1. Net liquidity: {} ({} / {}d)\n",
        liquidity_state(readings.liquidity_change_pct),
        fmt_opt_signed_pct(readings.liquidity_change_pct),
        config.liquidity_periods,
    ));
    out.push_str(&format!(
        "2. DXY-BTC relationship: {} ({})\n",
        correlation_state(readings.currency_risk_correlation),
        fmt_opt(readings.currency_risk_correlation, 3),
    ));
    out.push_str(&format!(
        "3. HY spread: {} ({})\n",
        credit_state(readings.credit_spread),
        readings
            .credit_spread
            .map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "n/a".to_string()),
    ));
    let divergence = if readings.divergence_count > 0 {
        format!(
            "present ({} of last {} days)",
            readings.divergence_count, config.divergence_lookback
        )
    } else {
        "none".to_string()
    };
    out.push_str(&format!("4. Divergence: {divergence}\n"));
    out
}

pub fn format_score(score: &CompositeScore) -> String {
    let c = &score.contributions;
    let mut out = String::new();
    out.push_str(&format!("Composite score: {:+} -> {}\n", score.score, score.label));
    out.push_str(&format!(
        "  liquidity {} | dollar {} | credit {} | divergence {:+}\n",
        fmt_contribution(c.liquidity),
        fmt_contribution(c.correlation),
        fmt_contribution(c.credit),
        c.divergence,
    ));
    out
}

/// Square matrix table with column headers.
pub fn format_matrix(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10}", ""));
    for name in matrix.columns() {
        out.push_str(&format!("{name:>10}"));
    }
    out.push('\n');
    for (i, row) in matrix.rows().iter().enumerate() {
        out.push_str(&format!("{:<10}", matrix.columns()[i]));
        for cell in row {
            out.push_str(&format!("{:>10}", fmt_opt(*cell, 3)));
        }
        out.push('\n');
    }
    out
}

pub fn liquidity_state(change_pct: Option<f64>) -> &'static str {
    match change_pct {
        Some(v) if v > LIQUIDITY_EXPANDING_PCT => "expanding",
        Some(v) if v < LIQUIDITY_CONTRACTING_PCT => "contracting",
        Some(_) => "neutral",
        None => "n/a",
    }
}

pub fn correlation_state(corr: Option<f64>) -> &'static str {
    match corr {
        Some(v) if v < CORRELATION_STRONG_INVERSE => "strong inverse",
        Some(v) if v > CORRELATION_POSITIVE => "abnormal co-movement",
        Some(_) => "weak inverse",
        None => "n/a",
    }
}

pub fn credit_state(spread: Option<f64>) -> &'static str {
    match spread {
        Some(v) if v > SPREAD_STRESSED => "stress",
        Some(v) if v > SPREAD_CALM => "caution",
        Some(_) => "stable",
        None => "n/a",
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

fn fmt_opt_signed_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:+.2}%"),
        None => "n/a".to_string(),
    }
}

fn fmt_contribution(c: Option<i32>) -> String {
    match c {
        Some(c) => format!("{c:+}"),
        None => "n/a".to_string(),
    }
}
