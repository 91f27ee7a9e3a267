//! Product cleaning.
//!
//! Everything difficult about products lives in the weight column; the
//! conversion and repair logic is in [`crate::weight`]. Corrupt rows carry
//! weights that match no notation, total zero, and get dropped. The feed
//! also repeats whole products under fresh codes, so the catalog is
//! deduplicated by product name before coercion.

use mrdc_model::Entity;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::coerce::{coerce_columns, ensure_required_columns, select_canonical};
use crate::common::deduplicate;
use crate::context::CleanContext;
use crate::error::Result;
use crate::weight::{convert_weights, drop_zero_weights, repair_homeware_weights};

pub struct ProductCleaner;

impl super::EntityCleaner for ProductCleaner {
    fn entity(&self) -> Entity {
        Entity::Product
    }

    fn description(&self) -> &'static str {
        "product catalog with weight normalization"
    }

    fn clean(&self, mut df: DataFrame, _ctx: &CleanContext) -> Result<DataFrame> {
        ensure_required_columns(Entity::Product, &df)?;

        convert_weights(&mut df)?;

        let repaired = repair_homeware_weights(&mut df)?;
        if repaired > 0 {
            warn!(entity = %Entity::Product, repaired, "rescaled gram-keyed homeware weights");
        }

        let dropped = drop_zero_weights(&mut df)?;
        if dropped > 0 {
            warn!(entity = %Entity::Product, dropped, "dropped rows with zero weight");
        }

        let dropped = deduplicate(&mut df, &["product_name"])?;
        if dropped > 0 {
            warn!(entity = %Entity::Product, dropped, "dropped duplicate product names");
        }

        coerce_columns(Entity::Product, &mut df)?;

        select_canonical(Entity::Product, &df)
    }
}
