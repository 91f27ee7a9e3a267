//! Column coercion driven by the entity schemas in `mrdc-model`.

use chrono::{NaiveDate, NaiveDateTime};
use mrdc_model::{
    ColumnSpec, Entity, ParsePolicy, SemanticType, canonical_columns, coercion_schema,
    required_columns,
};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::common::{
    has_column, opt_string_column, parse_f64, parse_i64, select_columns, set_f64_column,
    set_i32_column, set_i64_column, set_opt_string_column,
};
use crate::dates::{ISO_DATE, ISO_DATETIME, iso_date, iso_datetime, parse_mixed_date, parse_month_year};
use crate::error::{CleanError, Result};

/// Fails when the raw frame lacks a column the cleaner operates on.
pub(crate) fn ensure_required_columns(entity: Entity, df: &DataFrame) -> Result<()> {
    for name in required_columns(entity) {
        if !has_column(df, name) {
            return Err(CleanError::MissingColumn {
                entity,
                column: (*name).to_string(),
            });
        }
    }
    Ok(())
}

/// Applies the entity's coercion schema to the frame in place.
///
/// Lenient columns turn unparsable cells into nulls; strict columns abort
/// with a contract error, because the stages that ran before them guarantee
/// every remaining value parses.
pub(crate) fn coerce_columns(entity: Entity, df: &mut DataFrame) -> Result<()> {
    for spec in coercion_schema(entity) {
        if !has_column(df, spec.name) {
            return Err(CleanError::MissingColumn {
                entity,
                column: spec.name.to_string(),
            });
        }
        coerce_column(entity, df, spec)?;
    }
    Ok(())
}

fn coerce_column(entity: Entity, df: &mut DataFrame, spec: &ColumnSpec) -> Result<()> {
    let raw = opt_string_column(df, spec.name)?;
    let mut nulled = 0usize;
    match spec.semantic {
        SemanticType::Text => {
            set_opt_string_column(df, spec.name, raw)?;
            return Ok(());
        }
        SemanticType::Integer => {
            let mut values: Vec<Option<i64>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                match (cell.as_deref().and_then(parse_i64), spec.policy) {
                    (Some(parsed), _) => values.push(Some(parsed)),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_i64_column(df, spec.name, values)?;
        }
        SemanticType::SmallInteger => {
            let mut values: Vec<Option<i32>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                let parsed = cell
                    .as_deref()
                    .and_then(parse_i64)
                    .and_then(|v| i32::try_from(v).ok());
                match (parsed, spec.policy) {
                    (Some(parsed), _) => values.push(Some(parsed)),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_i32_column(df, spec.name, values)?;
        }
        SemanticType::Float => {
            let mut values: Vec<Option<f64>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                match (cell.as_deref().and_then(parse_f64), spec.policy) {
                    (Some(parsed), _) => values.push(Some(parsed)),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_f64_column(df, spec.name, values)?;
        }
        SemanticType::Date => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                let parsed = cell.as_deref().and_then(parse_mixed_date);
                match (parsed, spec.policy) {
                    (Some(date), _) => values.push(Some(iso_date(date))),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_opt_string_column(df, spec.name, values)?;
        }
        SemanticType::DateTime => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                let parsed = cell
                    .as_deref()
                    .and_then(|v| NaiveDateTime::parse_from_str(v.trim(), ISO_DATETIME).ok());
                match (parsed, spec.policy) {
                    (Some(stamp), _) => values.push(Some(iso_datetime(stamp))),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_opt_string_column(df, spec.name, values)?;
        }
        SemanticType::MonthYear => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(raw.len());
            for cell in &raw {
                let valid = cell.as_deref().filter(|v| parse_month_year(v).is_some());
                match (valid, spec.policy) {
                    (Some(value), _) => values.push(Some(value.trim().to_string())),
                    (None, ParsePolicy::Lenient) => {
                        if cell.is_some() {
                            nulled += 1;
                        }
                        values.push(None);
                    }
                    (None, ParsePolicy::Strict) => {
                        return Err(strict_violation(entity, spec.name, cell.as_deref()));
                    }
                }
            }
            set_opt_string_column(df, spec.name, values)?;
        }
    }
    if nulled > 0 {
        debug!(
            entity = %entity,
            column = spec.name,
            nulled,
            "coercion nulled unparsable values"
        );
    }
    Ok(())
}

/// Materializes a date column whose values were coerced to ISO form and
/// proven non-null by earlier stages. Anything else is a contract
/// violation.
pub(crate) fn required_date_column(
    entity: Entity,
    df: &DataFrame,
    name: &'static str,
) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(df.height());
    for cell in opt_string_column(df, name)? {
        let parsed = cell
            .as_deref()
            .and_then(|v| NaiveDate::parse_from_str(v, ISO_DATE).ok());
        let Some(date) = parsed else {
            return Err(CleanError::Contract {
                entity,
                stage: "date-column",
                detail: format!("column {name:?} holds {cell:?} after coercion"),
            });
        };
        dates.push(date);
    }
    Ok(dates)
}

/// Projects the cleaned frame onto the entity's canonical columns, in
/// canonical order.
pub(crate) fn select_canonical(entity: Entity, df: &DataFrame) -> Result<DataFrame> {
    let mut names = Vec::new();
    for spec in canonical_columns(entity) {
        if !has_column(df, spec.name) {
            return Err(CleanError::MissingColumn {
                entity,
                column: spec.name.to_string(),
            });
        }
        names.push(spec.name);
    }
    select_columns(df, &names)
}

fn strict_violation(entity: Entity, column: &'static str, value: Option<&str>) -> CleanError {
    let detail = match value {
        Some(value) => format!("column {column:?} holds unparsable value {value:?}"),
        None => format!("column {column:?} holds a null value"),
    };
    CleanError::Contract {
        entity,
        stage: "coerce",
        detail,
    }
}
