//! Product weight normalization.
//!
//! Raw weights arrive in four notations: multipacks (`12 x 100g`), ounces
//! (`16oz`), grams or millilitres (`500g`, `100ml`), and kilograms
//! (`0.77kg`). Each notation contributes to a per-row total in kilograms;
//! the notations are mutually exclusive, so at most one contribution is
//! ever non-zero. A value matching no notation totals zero and is removed
//! by the zero-weight drop. Bare numerics count as kilograms, so cleaned
//! output parses back to the same value.

use std::sync::OnceLock;

use polars::prelude::DataFrame;
use regex::Regex;

use crate::common::{filter_rows, numeric_column_f64, parse_f64, set_f64_column, string_column};
use crate::error::Result;

pub(crate) const OUNCES_PER_KILOGRAM: f64 = 35.27;

fn multipack_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+) x (\d+)").expect("hardcoded pattern"))
}

fn ounces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)oz$").expect("hardcoded pattern"))
}

fn grams_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?) ?(?:g|ml)\b.*$").expect("hardcoded pattern"))
}

fn kilograms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)(?:kg)?$").expect("hardcoded pattern"))
}

/// Kilogram contribution of each notation for one raw weight value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WeightContributions {
    pub multipack_kg: f64,
    pub ounces_kg: f64,
    pub grams_kg: f64,
    pub kilograms_kg: f64,
}

impl WeightContributions {
    pub fn total(&self) -> f64 {
        self.multipack_kg + self.ounces_kg + self.grams_kg + self.kilograms_kg
    }

    pub fn matched_notations(&self) -> usize {
        [
            self.multipack_kg,
            self.ounces_kg,
            self.grams_kg,
            self.kilograms_kg,
        ]
        .iter()
        .filter(|v| **v != 0.0)
        .count()
    }
}

pub(crate) fn parse_weight(raw: &str) -> WeightContributions {
    let trimmed = raw.trim();
    let mut out = WeightContributions::default();
    if let Some(caps) = multipack_re().captures(trimmed) {
        let count = parse_f64(&caps[1]).unwrap_or(0.0);
        let each = parse_f64(&caps[2]).unwrap_or(0.0);
        out.multipack_kg = count * each / 1000.0;
    }
    if let Some(caps) = ounces_re().captures(trimmed) {
        out.ounces_kg = parse_f64(&caps[1]).unwrap_or(0.0) / OUNCES_PER_KILOGRAM;
    }
    if let Some(caps) = grams_re().captures(trimmed) {
        out.grams_kg = parse_f64(&caps[1]).unwrap_or(0.0) / 1000.0;
    }
    if let Some(caps) = kilograms_re().captures(trimmed) {
        out.kilograms_kg = parse_f64(&caps[1]).unwrap_or(0.0);
    }
    out
}

/// Replaces the string weight column with its total in kilograms. Missing
/// values and values matching no notation become zero.
pub(crate) fn convert_weights(df: &mut DataFrame) -> Result<()> {
    let raw = string_column(df, "weight")?;
    let values: Vec<Option<f64>> = raw
        .iter()
        .map(|value| Some(parse_weight(value).total()))
        .collect();
    set_f64_column(df, "weight", values)?;
    Ok(())
}

/// Multiplies Toaster and Kettle weights below fifty grams by a thousand.
/// Those rows were keyed into the source in grams. Returns the repair
/// count.
pub(crate) fn repair_homeware_weights(df: &mut DataFrame) -> Result<usize> {
    let names = string_column(df, "product_name")?;
    let mut weights = numeric_column_f64(df, "weight")?;
    let mut repaired = 0usize;
    for (idx, name) in names.iter().enumerate() {
        let miskeyed = (name.contains("Toaster") || name.contains("Kettle"))
            && weights[idx].is_some_and(|w| w < 0.050);
        if miskeyed && let Some(weight) = weights[idx].as_mut() {
            *weight *= 1000.0;
            repaired += 1;
        }
    }
    if repaired > 0 {
        set_f64_column(df, "weight", weights)?;
    }
    Ok(repaired)
}

/// Drops rows whose weight is zero. Returns the dropped count.
pub(crate) fn drop_zero_weights(df: &mut DataFrame) -> Result<usize> {
    let weights = numeric_column_f64(df, "weight")?;
    let keep: Vec<bool> = weights
        .iter()
        .map(|w| w.is_some_and(|v| v != 0.0))
        .collect();
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped > 0 {
        filter_rows(df, &keep)?;
    }
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn multipack_sums_pack_contents() {
        let parsed = parse_weight("2 x 200g");
        assert!(close(parsed.total(), 0.4));
        assert!(close(parsed.multipack_kg, 0.4));
        assert_eq!(parsed.matched_notations(), 1);
    }

    #[test]
    fn ounces_convert_at_fixed_rate() {
        let parsed = parse_weight("16oz");
        assert!(close(parsed.total(), 16.0 / OUNCES_PER_KILOGRAM));
        assert_eq!(parsed.matched_notations(), 1);
    }

    #[test]
    fn grams_and_millilitres_divide_by_thousand() {
        assert!(close(parse_weight("500g").total(), 0.5));
        assert!(close(parse_weight("100ml").total(), 0.1));
        assert!(close(parse_weight("77g .").total(), 0.077));
    }

    #[test]
    fn kilograms_pass_through_with_or_without_unit() {
        assert!(close(parse_weight("0.77kg").total(), 0.77));
        assert!(close(parse_weight("0.4").total(), 0.4));
        assert_eq!(parse_weight("0.4").matched_notations(), 1);
    }

    #[test]
    fn corrupt_values_total_zero() {
        let parsed = parse_weight("MX180RYSHX");
        assert_eq!(parsed.total(), 0.0);
        assert_eq!(parsed.matched_notations(), 0);
        assert_eq!(parse_weight("").total(), 0.0);
    }

    #[test]
    fn notations_are_mutually_exclusive() {
        for raw in ["2 x 200g", "16oz", "500g", "100ml", "0.77kg", "0.4", "412g"] {
            assert!(parse_weight(raw).matched_notations() <= 1, "overlap on {raw}");
        }
    }

    #[test]
    fn homeware_repair_targets_gram_keyed_rows() {
        let mut df = DataFrame::new(vec![
            Column::new(
                "product_name".into(),
                ["Stainless Steel Toaster", "Copper Kettle", "Velvet Sofa"],
            ),
            Column::new("weight".into(), [0.02f64, 2.0, 0.03]),
        ])
        .unwrap();
        let repaired = repair_homeware_weights(&mut df).unwrap();
        assert_eq!(repaired, 1);
        let weights = df.column("weight").unwrap();
        assert!(close(weights.f64().unwrap().get(0).unwrap(), 20.0));
        assert!(close(weights.f64().unwrap().get(1).unwrap(), 2.0));
        assert!(close(weights.f64().unwrap().get(2).unwrap(), 0.03));
    }

    #[test]
    fn zero_weights_are_dropped() {
        let mut df = DataFrame::new(vec![
            Column::new("product_name".into(), ["a", "b", "c"]),
            Column::new("weight".into(), [0.4f64, 0.0, 1.2]),
        ])
        .unwrap();
        let dropped = drop_zero_weights(&mut df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(df.height(), 2);
    }
}
