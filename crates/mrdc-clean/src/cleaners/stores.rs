//! Store cleaning.
//!
//! The feed carries a dead `lat` column alongside the real `latitude`, a
//! typo'd continent value on a handful of rows, staff counts polluted with
//! letters, and coordinates that are either junk text or physically
//! impossible. One row per feed describes the web store; it has no
//! coordinates at all and must survive with nulls rather than be dropped.

use mrdc_model::Entity;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::coerce::{coerce_columns, ensure_required_columns, select_canonical};
use crate::common::{
    apply_value_map, count_dropped, drop_columns, filter_rows, map_values, numeric_column_f64,
    opt_string_column, set_f64_column, set_opt_string_column,
};
use crate::context::CleanContext;
use crate::error::Result;
use crate::validate::in_open_range;

const COORDINATE_LIMIT: f64 = 90.0;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub struct StoreCleaner;

impl super::EntityCleaner for StoreCleaner {
    fn entity(&self) -> Entity {
        Entity::Store
    }

    fn description(&self) -> &'static str {
        "store details including the web store"
    }

    fn clean(&self, mut df: DataFrame, _ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::Store, &df)?;

        drop_columns(&mut df, &["lat"]);

        apply_value_map(
            &mut df,
            "continent",
            &map_values([("eeEurope", "Europe"), ("eeAmerica", "America")]),
        )?;

        let continents = opt_string_column(&df, "continent")?;
        let keep: Vec<bool> = continents
            .iter()
            .map(|c| matches!(c.as_deref(), Some("Europe") | Some("America")))
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(entity = %Entity::Store, dropped, "dropped rows with unknown continent");
        }

        let staff: Vec<Option<String>> = opt_string_column(&df, "staff_numbers")?
            .into_iter()
            .map(|cell| cell.map(|v| v.chars().filter(char::is_ascii_digit).collect()))
            .collect();
        set_opt_string_column(&mut df, "staff_numbers", staff)?;

        coerce_columns(Entity::Store, &mut df)?;

        for name in ["longitude", "latitude"] {
            let values: Vec<Option<f64>> = numeric_column_f64(&df, name)?
                .into_iter()
                .map(|cell| {
                    cell.map(round4)
                        .filter(|v| in_open_range(*v, COORDINATE_LIMIT))
                })
                .collect();
            set_f64_column(&mut df, name, values)?;
        }

        let addresses: Vec<Option<String>> = opt_string_column(&df, "address")?
            .into_iter()
            .map(|cell| cell.map(|v| v.replace('\n', ", ")))
            .collect();
        set_opt_string_column(&mut df, "address", addresses)?;

        select_canonical(Entity::Store, &df)
    }
}
