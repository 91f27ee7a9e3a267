//! Entity cleaners and their registry.
//!
//! Each cleaner owns the full pipeline for one entity: required-column
//! checks, value repairs, row filters, schema coercion, and the final
//! projection onto the canonical column set. Cleaners are stateless unit
//! structs; per-run state (clock, card registry, policy switches) travels
//! in [`CleanContext`].

use std::collections::HashMap;
use std::sync::OnceLock;

use polars::prelude::DataFrame;
use tracing::info;

use mrdc_model::Entity;

use crate::context::CleanContext;
use crate::error::{CleanError, Result};

mod cards;
mod events;
mod orders;
mod products;
mod stores;
mod users;

pub use cards::CardCleaner;
pub use events::EventCleaner;
pub use orders::OrderCleaner;
pub use products::ProductCleaner;
pub use stores::StoreCleaner;
pub use users::UserCleaner;

/// One entity's cleaning pipeline.
///
/// `clean` consumes the raw frame and returns the cleaned frame carrying
/// exactly the entity's canonical columns, or a fatal error. Row-level
/// data problems never surface as errors; the cleaner drops or repairs the
/// affected rows and logs the counts.
pub trait EntityCleaner: Send + Sync {
    /// The entity this cleaner handles.
    fn entity(&self) -> Entity;

    /// Short human description for run summaries.
    fn description(&self) -> &'static str;

    fn clean(&self, df: DataFrame, ctx: &CleanContext) -> Result<DataFrame>;
}

/// Registry of entity cleaners indexed by entity.
pub struct CleanerRegistry {
    cleaners: HashMap<Entity, Box<dyn EntityCleaner>>,
}

impl CleanerRegistry {
    pub fn new() -> Self {
        Self {
            cleaners: HashMap::new(),
        }
    }

    /// Registers a cleaner for its entity, replacing any previous one.
    pub fn register(&mut self, cleaner: Box<dyn EntityCleaner>) {
        self.cleaners.insert(cleaner.entity(), cleaner);
    }

    pub fn get(&self, entity: Entity) -> Option<&dyn EntityCleaner> {
        self.cleaners.get(&entity).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.cleaners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaners.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.cleaners.keys().copied()
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(UserCleaner));
        registry.register(Box::new(CardCleaner));
        registry.register(Box::new(StoreCleaner));
        registry.register(Box::new(ProductCleaner));
        registry.register(Box::new(OrderCleaner));
        registry.register(Box::new(EventCleaner));
        registry
    }
}

static DEFAULT_REGISTRY: OnceLock<CleanerRegistry> = OnceLock::new();

/// Shared registry holding all six entity cleaners, built on first use.
pub fn default_registry() -> &'static CleanerRegistry {
    DEFAULT_REGISTRY.get_or_init(CleanerRegistry::default)
}

/// Cleans one raw frame with the registered cleaner for its entity.
pub fn clean_frame(entity: Entity, df: DataFrame, ctx: &CleanContext) -> Result<DataFrame> {
    let Some(cleaner) = default_registry().get(entity) else {
        return Err(CleanError::Contract {
            entity,
            stage: "registry",
            detail: "no cleaner registered".to_string(),
        });
    };
    let rows_in = df.height();
    let cleaned = cleaner.clean(df, ctx)?;
    info!(
        entity = %entity,
        rows_in,
        rows_out = cleaned.height(),
        "cleaned frame"
    );
    Ok(cleaned)
}
