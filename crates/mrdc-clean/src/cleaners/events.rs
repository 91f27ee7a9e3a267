//! Event cleaning.
//!
//! Sale events arrive with the date split across `year`, `month`, and
//! `day` columns plus an `hh:mm:ss` timestamp, with single-digit parts
//! unpadded. The cleaner pads the parts, rejects malformed timestamps,
//! assembles one datetime per row, and keeps only the assembled stamp with
//! the period label and event uuid.

use mrdc_model::Entity;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::coerce::{ensure_required_columns, select_canonical};
use crate::common::{
    count_dropped, filter_rows, opt_string_column, set_opt_string_column,
};
use crate::context::CleanContext;
use crate::dates::{iso_datetime, parse_compact_datetime};
use crate::error::Result;
use crate::validate::is_timestamp;

const DATE_PART_COLUMNS: [&str; 4] = ["year", "month", "day", "timestamp"];

fn pad_single_digits(df: &mut DataFrame, name: &str) -> Result<()> {
    let values: Vec<Option<String>> = opt_string_column(df, name)?
        .into_iter()
        .map(|cell| {
            cell.map(|v| {
                if v.len() == 1 && v.bytes().all(|b| b.is_ascii_digit()) {
                    format!("0{v}")
                } else {
                    v
                }
            })
        })
        .collect();
    set_opt_string_column(df, name, values)?;
    Ok(())
}

pub struct EventCleaner;

impl super::EntityCleaner for EventCleaner {
    fn entity(&self) -> Entity {
        Entity::Event
    }

    fn description(&self) -> &'static str {
        "sale events with split datetime parts"
    }

    fn clean(&self, mut df: DataFrame, _ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::Event, &df)?;

        for name in DATE_PART_COLUMNS {
            pad_single_digits(&mut df, name)?;
        }

        let stamps = opt_string_column(&df, "timestamp")?;
        let keep: Vec<bool> = stamps
            .iter()
            .map(|s| s.as_deref().is_some_and(is_timestamp))
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(entity = %Entity::Event, dropped, "dropped rows with malformed timestamps");
        }

        let years = opt_string_column(&df, "year")?;
        let months = opt_string_column(&df, "month")?;
        let days = opt_string_column(&df, "day")?;
        let stamps = opt_string_column(&df, "timestamp")?;
        let mut datetimes: Vec<Option<String>> = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let assembled = match (&years[idx], &months[idx], &days[idx], &stamps[idx]) {
                (Some(year), Some(month), Some(day), Some(stamp)) => {
                    parse_compact_datetime(&format!("{year}{month}{day} {stamp}"))
                        .map(iso_datetime)
                }
                _ => None,
            };
            datetimes.push(assembled);
        }
        let keep: Vec<bool> = datetimes.iter().map(Option::is_some).collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(
                entity = %Entity::Event,
                dropped,
                "dropped rows whose date parts do not assemble"
            );
        }
        let kept: Vec<Option<String>> = datetimes.into_iter().flatten().map(Some).collect();
        set_opt_string_column(&mut df, "datetime", kept)?;

        select_canonical(Entity::Event, &df)
    }
}
