//! User cleaning.
//!
//! Membership rows arrive with mixed-format dates, a recurring `GGB`
//! country code typo, and occasional fully corrupt rows whose every cell
//! is a random token. The corrupt rows fall out naturally: their date
//! cells fail to parse, turn null, and the missing-row drop removes them.

use mrdc_model::Entity;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::coerce::{
    coerce_columns, ensure_required_columns, required_date_column, select_canonical,
};
use crate::common::{
    apply_value_map, count_dropped, drop_missing_rows, filter_rows, map_values, opt_string_column,
};
use crate::context::CleanContext;
use crate::error::Result;
use crate::validate::{is_uuid, join_order_valid, keep_for_age};

pub struct UserCleaner;

impl super::EntityCleaner for UserCleaner {
    fn entity(&self) -> Entity {
        Entity::User
    }

    fn description(&self) -> &'static str {
        "membership records with mixed-format dates"
    }

    fn clean(&self, mut df: DataFrame, ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::User, &df)?;
        coerce_columns(Entity::User, &mut df)?;

        let dropped = drop_missing_rows(&mut df)?;
        if dropped > 0 {
            warn!(entity = %Entity::User, dropped, "dropped rows with missing values");
        }

        apply_value_map(&mut df, "country_code", &map_values([("GGB", "GB")]))?;

        let dob = required_date_column(Entity::User, &df, "date_of_birth")?;
        let keep: Vec<bool> = dob
            .iter()
            .map(|d| keep_for_age(*d, ctx.now(), ctx.age_policy()))
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(
                entity = %Entity::User,
                dropped,
                policy = ?ctx.age_policy(),
                "dropped rows outside the age window"
            );
        }

        let dob = required_date_column(Entity::User, &df, "date_of_birth")?;
        let join = required_date_column(Entity::User, &df, "join_date")?;
        let keep: Vec<bool> = dob
            .iter()
            .zip(&join)
            .map(|(d, j)| join_order_valid(*d, *j, ctx.now()))
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(
                entity = %Entity::User,
                dropped,
                "dropped rows joining before birth or in the future"
            );
        }

        let uuids = opt_string_column(&df, "user_uuid")?;
        let keep: Vec<bool> = uuids
            .iter()
            .map(|u| u.as_deref().is_some_and(is_uuid))
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(entity = %Entity::User, dropped, "dropped rows with malformed user uuid");
        }

        select_canonical(Entity::User, &df)
    }
}
