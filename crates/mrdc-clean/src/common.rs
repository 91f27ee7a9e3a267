//! Frame helpers shared by the entity cleaners.
//!
//! Cleaners materialize a column into a `Vec`, transform it, and write it
//! back. Row drops go through a boolean mask over the whole frame so every
//! column stays aligned.

use std::collections::{HashMap, HashSet};

use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, NamedFrom, NewChunkedArray, Series,
};

use crate::error::Result;

pub(crate) use mrdc_ingest::{
    any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64, parse_i64,
};

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Cell values of `name` as trimmed strings. Nulls become empty strings.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Ok(values)
}

/// Like [`string_column`] but keeps nulls as `None`, so missing stays
/// distinguishable from empty text.
pub(crate) fn opt_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => values.push(None),
            value => values.push(Some(any_to_string(value).trim().to_string())),
        }
    }
    Ok(values)
}

pub(crate) fn numeric_column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_f64(value));
    }
    Ok(values)
}

pub(crate) fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub(crate) fn set_opt_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub(crate) fn set_f64_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<f64>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub(crate) fn set_i64_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<i64>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub(crate) fn set_i32_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<i32>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub(crate) fn filter_rows(df: &mut DataFrame, keep: &[bool]) -> Result<()> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(())
}

pub(crate) fn count_dropped(keep: &[bool]) -> usize {
    keep.iter().filter(|flag| !**flag).count()
}

/// Drops every row containing at least one null cell. Returns the number of
/// rows removed.
pub(crate) fn drop_missing_rows(df: &mut DataFrame) -> Result<usize> {
    let height = df.height();
    let mut keep = vec![true; height];
    for column in df.get_columns() {
        for (idx, slot) in keep.iter_mut().enumerate() {
            if matches!(column.get(idx).unwrap_or(AnyValue::Null), AnyValue::Null) {
                *slot = false;
            }
        }
    }
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped > 0 {
        filter_rows(df, &keep)?;
    }
    Ok(dropped)
}

/// Removes the named columns when present. Absent names are ignored.
pub(crate) fn drop_columns(df: &mut DataFrame, names: &[&str]) {
    for name in names {
        if let Ok(reduced) = df.drop(name) {
            *df = reduced;
        }
    }
}

/// Keeps the first row for each distinct key and drops later repeats.
/// Returns the number of rows removed.
pub(crate) fn deduplicate<S: AsRef<str>>(df: &mut DataFrame, keys: &[S]) -> Result<usize> {
    if keys.is_empty() || df.height() == 0 {
        return Ok(0);
    }
    let mut key_columns = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        if !has_column(df, key) {
            continue;
        }
        key_columns.push(string_column(df, key)?);
    }
    if key_columns.is_empty() {
        return Ok(0);
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut key = String::new();
        for col_vals in &key_columns {
            key.push_str(&col_vals[idx]);
            key.push('|');
        }
        keep.push(seen.insert(key));
    }
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped > 0 {
        filter_rows(df, &keep)?;
    }
    Ok(dropped)
}

/// Replaces values of `column` that exactly match a map key. Everything
/// else, nulls included, passes through untouched.
pub(crate) fn apply_value_map(
    df: &mut DataFrame,
    column: &str,
    mapping: &HashMap<String, String>,
) -> Result<()> {
    let values = opt_string_column(df, column)?
        .into_iter()
        .map(|value| value.map(|v| mapping.get(&v).cloned().unwrap_or(v)))
        .collect();
    set_opt_string_column(df, column, values)?;
    Ok(())
}

pub(crate) fn map_values<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(N);
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }
    map
}

/// Projects the frame down to `names`, in that order. Columns not listed
/// are discarded.
pub(crate) fn select_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    Ok(df.select(names.iter().copied())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("code".into(), ["GGB", "GB", "DE", "GGB"]),
            Column::new(
                "note".into(),
                [Some("a".to_string()), None, Some("c".to_string()), Some("a".to_string())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn string_column_blanks_nulls() {
        let df = frame();
        assert_eq!(string_column(&df, "note").unwrap(), vec!["a", "", "c", "a"]);
        let opt = opt_string_column(&df, "note").unwrap();
        assert_eq!(opt[1], None);
        assert_eq!(opt[0].as_deref(), Some("a"));
    }

    #[test]
    fn value_map_replaces_exact_matches_only() {
        let mut df = frame();
        let mapping = map_values([("GGB", "GB")]);
        apply_value_map(&mut df, "code", &mapping).unwrap();
        assert_eq!(
            string_column(&df, "code").unwrap(),
            vec!["GB", "GB", "DE", "GB"]
        );
    }

    #[test]
    fn missing_rows_are_dropped_and_counted() {
        let mut df = frame();
        let dropped = drop_missing_rows(&mut df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(df.height(), 3);
        assert_eq!(string_column(&df, "code").unwrap(), vec!["GGB", "DE", "GGB"]);
    }

    #[test]
    fn deduplicate_keeps_first_occurrence() {
        let mut df = frame();
        let dropped = deduplicate(&mut df, &["code"]).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(string_column(&df, "code").unwrap(), vec!["GGB", "GB", "DE"]);
    }

    #[test]
    fn select_reorders_and_drops() {
        let df = frame();
        let out = select_columns(&df, &["note", "code"]).unwrap();
        assert_eq!(
            out.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec!["note", "code"]
        );
    }
}
