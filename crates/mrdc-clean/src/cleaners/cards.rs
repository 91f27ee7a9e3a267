//! Card cleaning.
//!
//! Card numbers arrive as text with stray `?` padding and the odd fully
//! corrupt row. After the shape filters only digit strings remain, so the
//! closing coercion runs strict: a number that fails to parse as an
//! integer at that point means a filter upstream let something through.

use mrdc_model::Entity;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::coerce::{coerce_columns, ensure_required_columns, select_canonical};
use crate::common::{
    count_dropped, drop_missing_rows, filter_rows, set_i64_column, set_string_column,
    string_column,
};
use crate::context::CleanContext;
use crate::error::Result;
use crate::validate::is_digits;

pub struct CardCleaner;

impl super::EntityCleaner for CardCleaner {
    fn entity(&self) -> Entity {
        Entity::Card
    }

    fn description(&self) -> &'static str {
        "payment card details"
    }

    fn clean(&self, mut df: DataFrame, ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::Card, &df)?;

        let dropped = drop_missing_rows(&mut df)?;
        if dropped > 0 {
            warn!(entity = %Entity::Card, dropped, "dropped rows with missing values");
        }

        let numbers: Vec<String> = string_column(&df, "card_number")?
            .into_iter()
            .map(|value| value.trim_matches(['?', ' ']).to_string())
            .collect();
        set_string_column(&mut df, "card_number", numbers)?;

        let numbers = string_column(&df, "card_number")?;
        let keep: Vec<bool> = numbers.iter().map(|n| is_digits(n)).collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(entity = %Entity::Card, dropped, "dropped rows with non-digit card numbers");
        }

        let numbers = string_column(&df, "card_number")?;
        let providers = string_column(&df, "card_provider")?;
        let registry = ctx.card_lengths();
        let keep: Vec<bool> = numbers
            .iter()
            .zip(&providers)
            .map(|(number, provider)| {
                u32::try_from(number.len())
                    .is_ok_and(|digits| registry.is_valid(provider, digits))
            })
            .collect();
        let dropped = count_dropped(&keep);
        if dropped > 0 {
            filter_rows(&mut df, &keep)?;
            warn!(
                entity = %Entity::Card,
                dropped,
                "dropped rows where card length does not match the provider"
            );
        }

        coerce_columns(Entity::Card, &mut df)?;

        let fresh_index: Vec<Option<i64>> = (0..df.height() as i64).map(Some).collect();
        set_i64_column(&mut df, "index", fresh_index)?;

        select_canonical(Entity::Card, &df)
    }
}
