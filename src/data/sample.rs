//! Synthetic raw series for offline runs.
//!
//! Each symbol is simulated at its native FRED frequency so the aligner sees
//! the same shape of input it gets live: weekly balance-sheet data on
//! Wednesdays, business-daily market closes with the odd missing value, and a
//! seven-day crypto series. A shared market factor drives risk assets up, the
//! dollar down and spreads tighter, which keeps correlations realistic.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{LookbackWindow, RawSeries, Symbol};
use crate::error::{AppError, EXIT_CONFIG};

/// Probability that a business-day observation is reported as missing.
const MISSING_PROB: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frequency {
    Weekly,
    BusinessDaily,
    Daily,
}

impl Frequency {
    fn observes(self, date: NaiveDate) -> bool {
        match self {
            Frequency::Weekly => date.weekday() == Weekday::Wed,
            Frequency::BusinessDaily => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Frequency::Daily => true,
        }
    }
}

/// Simulation parameters for one symbol.
struct Profile {
    symbol: Symbol,
    frequency: Frequency,
    start: f64,
    /// Daily idiosyncratic volatility (log-return, or absolute for spreads).
    vol: f64,
    /// Loading on the shared market factor.
    beta: f64,
}

fn profiles() -> [Profile; 8] {
    [
        Profile { symbol: Symbol::Walcl, frequency: Frequency::Weekly, start: 7_000_000.0, vol: 0.001, beta: 0.0005 },
        Profile { symbol: Symbol::Tga, frequency: Frequency::Weekly, start: 750_000.0, vol: 0.02, beta: 0.0 },
        Profile { symbol: Symbol::Rrp, frequency: Frequency::BusinessDaily, start: 400.0, vol: 0.03, beta: -0.002 },
        Profile { symbol: Symbol::Dxy, frequency: Frequency::BusinessDaily, start: 120.0, vol: 0.003, beta: -0.002 },
        Profile { symbol: Symbol::HySpread, frequency: Frequency::BusinessDaily, start: 3.8, vol: 0.03, beta: -0.02 },
        Profile { symbol: Symbol::Btc, frequency: Frequency::Daily, start: 60_000.0, vol: 0.025, beta: 0.015 },
        Profile { symbol: Symbol::Nasdaq, frequency: Frequency::BusinessDaily, start: 16_000.0, vol: 0.006, beta: 0.01 },
        Profile { symbol: Symbol::Sp500, frequency: Frequency::BusinessDaily, start: 5_000.0, vol: 0.005, beta: 0.008 },
    ]
}

/// Generate one raw series per [`Symbol`] covering `window`.
pub fn generate_sample(window: &LookbackWindow, seed: u64) -> Result<Vec<RawSeries>, AppError> {
    let mut rng = StdRng::seed_from_u64(sample_seed(window, seed));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Noise distribution error: {e}")))?;

    let profiles = profiles();
    let mut levels: Vec<f64> = profiles.iter().map(|p| p.start).collect();
    let mut out: Vec<Vec<(NaiveDate, Option<f64>)>> = vec![Vec::new(); profiles.len()];

    let mut date = window.start();
    while date <= window.as_of {
        let market = normal.sample(&mut rng);
        for (i, p) in profiles.iter().enumerate() {
            let shock = p.vol * normal.sample(&mut rng) + p.beta * market;
            levels[i] = step(p.symbol, levels[i], shock);

            if p.frequency.observes(date) {
                let missing = p.frequency == Frequency::BusinessDaily && rng.gen_bool(MISSING_PROB);
                out[i].push((date, (!missing).then_some(levels[i])));
            }
        }
        date += Duration::days(1);
    }

    Ok(profiles
        .iter()
        .zip(out)
        .map(|(p, obs)| RawSeries::new(p.symbol.column(), obs))
        .collect())
}

fn step(symbol: Symbol, level: f64, shock: f64) -> f64 {
    match symbol {
        // Spreads move additively and mean-revert towards ~4%.
        Symbol::HySpread => (level + shock + 0.01 * (3.8 - level)).max(2.0),
        _ => level * shock.exp(),
    }
}

fn sample_seed(window: &LookbackWindow, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    window.as_of.hash(&mut hasher);
    window.days.hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}
