//! Net liquidity derivation.
//!
//! ```text
//! NetLiq = WALCL - TGA - RRP * 1000
//! ```
//!
//! WALCL and TGA are reported in millions of USD while RRP is reported in
//! billions, so RRP is scaled into millions before subtracting.

use crate::analysis::error::{AnalysisError, Result};
use crate::domain::{AlignedTable, NET_LIQUIDITY, Symbol};

/// Billions -> millions.
pub const RRP_UNIT_SCALE: f64 = 1000.0;

/// Append the `NetLiq` column to a copy of `table`.
pub fn derive_net_liquidity(table: &AlignedTable) -> Result<AlignedTable> {
    let component = |symbol: Symbol| {
        table
            .column(symbol.column())
            .ok_or_else(|| AnalysisError::missing(symbol.column()))
    };
    let walcl = component(Symbol::Walcl)?;
    let tga = component(Symbol::Tga)?;
    let rrp = component(Symbol::Rrp)?;

    let net: Vec<f64> = walcl
        .iter()
        .zip(tga)
        .zip(rrp)
        .map(|((w, t), r)| net_liquidity(*w, *t, *r))
        .collect();

    Ok(table.with_column(NET_LIQUIDITY, net))
}

/// Net liquidity in millions from balance sheet (M), TGA (M) and reverse repo (B).
pub fn net_liquidity(walcl_mn: f64, tga_mn: f64, rrp_bn: f64) -> f64 {
    walcl_mn - tga_mn - rrp_bn * RRP_UNIT_SCALE
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::analysis::align::align;
    use crate::domain::{LookbackWindow, RawSeries};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn components(with_rrp: bool) -> Vec<RawSeries> {
        let mut out = vec![
            RawSeries::new("WALCL", vec![(d(4), Some(6_000_000.0)), (d(11), Some(6_100_000.0))]),
            RawSeries::new("TGA", vec![(d(4), Some(700_000.0)), (d(11), Some(650_000.0))]),
        ];
        if with_rrp {
            out.push(RawSeries::new(
                "RRP",
                vec![(d(4), Some(300.0)), (d(5), Some(250.0)), (d(11), Some(200.0))],
            ));
        }
        out
    }

    #[test]
    fn derives_in_millions() {
        assert_eq!(net_liquidity(6_000_000.0, 700_000.0, 300.0), 5_000_000.0);

        let table = align(&components(true), &LookbackWindow::new(d(30), 60)).unwrap();
        let derived = derive_net_liquidity(&table).unwrap();
        assert_eq!(
            derived.column(NET_LIQUIDITY).unwrap(),
            &[5_000_000.0, 5_050_000.0, 5_250_000.0]
        );
        // Input columns stay intact and the input table is not modified.
        assert_eq!(derived.column("RRP"), table.column("RRP"));
        assert!(table.column(NET_LIQUIDITY).is_none());
    }

    #[test]
    fn missing_component_is_reported() {
        let table = align(&components(false), &LookbackWindow::new(d(30), 60)).unwrap();
        let err = derive_net_liquidity(&table).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingComponent {
                column: "RRP".to_string()
            }
        );
    }
}
