pub mod cleaners;
mod coerce;
mod common;
pub mod context;
pub mod dates;
pub mod error;
pub mod frame;
mod validate;
mod weight;

pub use cleaners::{
    CardCleaner, CleanerRegistry, EntityCleaner, EventCleaner, OrderCleaner, ProductCleaner,
    StoreCleaner, UserCleaner, clean_frame, default_registry,
};
pub use context::{AgePolicy, CleanContext};
pub use dates::{ISO_DATE, ISO_DATETIME, MIXED_DATE_FORMATS, parse_mixed_date};
pub use error::{CleanError, Result};
pub use frame::EntityFrame;
