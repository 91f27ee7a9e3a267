//! Order cleaning.
//!
//! Orders are the fact feed and arrive nearly clean. The work here is
//! dropping the columns the upstream export leaks (`level_0` and a stray
//! `1`, plus names that belong on the user dimension) and coercing the
//! numeric columns.

use mrdc_model::Entity;
use polars::prelude::DataFrame;

use crate::coerce::{coerce_columns, ensure_required_columns, select_canonical};
use crate::common::drop_columns;
use crate::context::CleanContext;
use crate::error::Result;

pub struct OrderCleaner;

impl super::EntityCleaner for OrderCleaner {
    fn entity(&self) -> Entity {
        Entity::Order
    }

    fn description(&self) -> &'static str {
        "order facts"
    }

    fn clean(&self, mut df: DataFrame, _ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::Order, &df)?;

        drop_columns(&mut df, &["level_0", "first_name", "last_name", "1"]);

        coerce_columns(Entity::Order, &mut df)?;

        select_canonical(Entity::Order, &df)
    }
}
