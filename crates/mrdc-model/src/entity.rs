use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Business entities flowing through the pipeline. Each entity has its own
/// raw source, cleaning rules, and destination table in the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    /// Registered customers (dimension).
    User,
    /// Payment card details (dimension).
    Card,
    /// Physical and online store records (dimension).
    Store,
    /// Product catalogue entries (dimension).
    Product,
    /// Sales orders (the fact table).
    Order,
    /// Sale date/time events (dimension).
    Event,
}

/// All entities in pipeline order: dimensions first, the fact table, then
/// the date events that reference it.
pub const ALL_ENTITIES: [Entity; 6] = [
    Entity::User,
    Entity::Card,
    Entity::Store,
    Entity::Product,
    Entity::Order,
    Entity::Event,
];

impl Entity {
    /// Short lowercase identifier used in CLI arguments and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Card => "card",
            Entity::Store => "store",
            Entity::Product => "product",
            Entity::Order => "order",
            Entity::Event => "event",
        }
    }

    /// Destination relation in the target star schema.
    pub fn table_name(&self) -> &'static str {
        match self {
            Entity::User => "dim_users",
            Entity::Card => "dim_card_details",
            Entity::Store => "dim_store_details",
            Entity::Product => "dim_products",
            Entity::Order => "orders_table",
            Entity::Event => "dim_date_times",
        }
    }

    /// File stem the run command looks for in a data directory
    /// (`users.csv`, `events.json`, ...).
    pub fn dataset_stem(&self) -> &'static str {
        match self {
            Entity::User => "users",
            Entity::Card => "cards",
            Entity::Store => "stores",
            Entity::Product => "products",
            Entity::Order => "orders",
            Entity::Event => "events",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Entity::User => "registered customers",
            Entity::Card => "payment card details",
            Entity::Store => "store records",
            Entity::Product => "product catalogue",
            Entity::Order => "sales orders",
            Entity::Event => "sale date/time events",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Entity {
    type Err = ModelError;

    /// Accepts the short identifier, the dataset stem, or the destination
    /// table name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        for entity in ALL_ENTITIES {
            if normalized == entity.as_str()
                || normalized == entity.dataset_stem()
                || normalized == entity.table_name()
            {
                return Ok(entity);
            }
        }
        Err(ModelError::UnknownEntity(s.to_string()))
    }
}
