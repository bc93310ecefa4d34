//! Composite signal score.
//!
//! Four readings are thresholded independently and their contributions summed:
//!
//! | reading                          | condition | contribution |
//! |----------------------------------|-----------|--------------|
//! | net liquidity trailing change    | > +2%     | +1           |
//! |                                  | < -2%     | -1           |
//! | dollar ↔ risk-asset correlation  | < -0.5    | +1           |
//! |                                  | > 0       | -1           |
//! | HY spread level                  | < 4.0     | +1           |
//! |                                  | > 5.0     | -2           |
//! | recent divergence count          | > 0       | -1           |
//!
//! Values between thresholds contribute 0. The score is therefore bounded to
//! `[-5, +3]`.

use std::fmt;

use serde::Serialize;

pub const LIQUIDITY_EXPANDING_PCT: f64 = 2.0;
pub const LIQUIDITY_CONTRACTING_PCT: f64 = -2.0;
pub const CORRELATION_STRONG_INVERSE: f64 = -0.5;
pub const CORRELATION_POSITIVE: f64 = 0.0;
pub const SPREAD_CALM: f64 = 4.0;
pub const SPREAD_STRESSED: f64 = 5.0;

pub const SCORE_MIN: i32 = -5;
pub const SCORE_MAX: i32 = 3;

/// Latest readings feeding the scorer. `None` means the reading is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalReadings {
    /// Trailing net liquidity change, in percent (3.0 means +3%).
    pub liquidity_change_pct: Option<f64>,
    /// Latest rolling correlation between the dollar and the risk asset.
    pub currency_risk_correlation: Option<f64>,
    /// Latest HY spread level, in percent.
    pub credit_spread: Option<f64>,
    /// Divergences in the recent lookback.
    pub divergence_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalLabel {
    StrongBuy,
    WeakBuy,
    Neutral,
    WeakSell,
    StrongSell,
}

impl SignalLabel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 2 => SignalLabel::StrongBuy,
            1 => SignalLabel::WeakBuy,
            0 => SignalLabel::Neutral,
            -1 => SignalLabel::WeakSell,
            _ => SignalLabel::StrongSell,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "strong-buy",
            SignalLabel::WeakBuy => "weak-buy",
            SignalLabel::Neutral => "neutral",
            SignalLabel::WeakSell => "weak-sell",
            SignalLabel::StrongSell => "strong-sell",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reading contributions; `None` where the reading was unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contributions {
    pub liquidity: Option<i32>,
    pub correlation: Option<i32>,
    pub credit: Option<i32>,
    pub divergence: i32,
}

impl Contributions {
    pub fn total(&self) -> i32 {
        self.liquidity.unwrap_or(0)
            + self.correlation.unwrap_or(0)
            + self.credit.unwrap_or(0)
            + self.divergence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositeScore {
    pub score: i32,
    pub label: SignalLabel,
    pub contributions: Contributions,
}

/// Score a set of readings. Pure: the same readings always give the same score.
pub fn score(readings: &SignalReadings) -> CompositeScore {
    let contributions = Contributions {
        liquidity: finite(readings.liquidity_change_pct).map(liquidity_contribution),
        correlation: finite(readings.currency_risk_correlation).map(correlation_contribution),
        credit: finite(readings.credit_spread).map(credit_contribution),
        divergence: divergence_contribution(readings.divergence_count),
    };
    let score = contributions.total();
    debug_assert!((SCORE_MIN..=SCORE_MAX).contains(&score));
    CompositeScore {
        score,
        label: SignalLabel::from_score(score),
        contributions,
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

pub fn liquidity_contribution(change_pct: f64) -> i32 {
    if change_pct > LIQUIDITY_EXPANDING_PCT {
        1
    } else if change_pct < LIQUIDITY_CONTRACTING_PCT {
        -1
    } else {
        0
    }
}

pub fn correlation_contribution(corr: f64) -> i32 {
    if corr < CORRELATION_STRONG_INVERSE {
        1
    } else if corr > CORRELATION_POSITIVE {
        -1
    } else {
        0
    }
}

pub fn credit_contribution(spread: f64) -> i32 {
    if spread < SPREAD_CALM {
        1
    } else if spread > SPREAD_STRESSED {
        -2
    } else {
        0
    }
}

pub fn divergence_contribution(count: usize) -> i32 {
    if count > 0 { -1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(liq: f64, corr: f64, spread: f64, div: usize) -> SignalReadings {
        SignalReadings {
            liquidity_change_pct: Some(liq),
            currency_risk_correlation: Some(corr),
            credit_spread: Some(spread),
            divergence_count: div,
        }
    }

    #[test]
    fn best_case_is_strong_buy() {
        let s = score(&readings(3.0, -0.6, 3.5, 0));
        assert_eq!(
            s.contributions,
            Contributions {
                liquidity: Some(1),
                correlation: Some(1),
                credit: Some(1),
                divergence: 0
            }
        );
        assert_eq!(s.score, SCORE_MAX);
        assert_eq!(s.label, SignalLabel::StrongBuy);
    }

    #[test]
    fn worst_case_is_strong_sell() {
        let s = score(&readings(-3.0, 0.2, 5.5, 2));
        assert_eq!(
            s.contributions,
            Contributions {
                liquidity: Some(-1),
                correlation: Some(-1),
                credit: Some(-2),
                divergence: -1
            }
        );
        assert_eq!(s.score, SCORE_MIN);
        assert_eq!(s.label, SignalLabel::StrongSell);
    }

    #[test]
    fn values_on_or_between_thresholds_contribute_zero() {
        let s = score(&readings(2.0, -0.5, 4.0, 0));
        assert_eq!(s.score, 0);
        assert_eq!(s.label, SignalLabel::Neutral);
        assert_eq!(s.contributions.credit, Some(0));
        assert_eq!(s.contributions.correlation, Some(0));
        assert_eq!(s.contributions.liquidity, Some(0));
    }

    #[test]
    fn missing_readings_contribute_nothing() {
        let s = score(&SignalReadings {
            liquidity_change_pct: None,
            currency_risk_correlation: Some(f64::NAN),
            credit_spread: Some(4.5),
            divergence_count: 1,
        });
        assert_eq!(s.contributions.liquidity, None);
        assert_eq!(s.contributions.correlation, None);
        assert_eq!(s.score, -1);
        assert_eq!(s.label, SignalLabel::WeakSell);
    }

    #[test]
    fn labels_cover_full_range() {
        assert_eq!(SignalLabel::from_score(3), SignalLabel::StrongBuy);
        assert_eq!(SignalLabel::from_score(2), SignalLabel::StrongBuy);
        assert_eq!(SignalLabel::from_score(1), SignalLabel::WeakBuy);
        assert_eq!(SignalLabel::from_score(0), SignalLabel::Neutral);
        assert_eq!(SignalLabel::from_score(-1), SignalLabel::WeakSell);
        assert_eq!(SignalLabel::from_score(-2), SignalLabel::StrongSell);
        assert_eq!(SignalLabel::from_score(-5), SignalLabel::StrongSell);
    }

    #[test]
    fn score_is_reproducible() {
        let r = readings(1.0, -0.7, 4.2, 0);
        assert_eq!(score(&r), score(&r));
    }
}
