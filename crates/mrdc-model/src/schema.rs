use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Canonical semantic type a cleaned column must carry.
///
/// Dates and datetimes are stored in frames as ISO-8601 strings
/// (`%Y-%m-%d`, `%Y-%m-%d %H:%M:%S`); the coercer proves validity while
/// parsing. `MonthYear` covers card expiry values (`MM/YY`), which are kept
/// in their source form because a month/year pair is not a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Text,
    Integer,
    SmallInteger,
    Float,
    Date,
    DateTime,
    MonthYear,
}

/// What a coercion failure on a column means.
///
/// `Lenient` turns unparsable values into missing; `Strict` aborts the
/// cleaning call, because an earlier stage guaranteed the column was
/// well formed and a failure here is a broken pipeline invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    Lenient,
    Strict,
}

/// One column's coercion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub semantic: SemanticType,
    pub policy: ParsePolicy,
}

const fn col(name: &'static str, semantic: SemanticType, policy: ParsePolicy) -> ColumnSpec {
    ColumnSpec {
        name,
        semantic,
        policy,
    }
}

use ParsePolicy::{Lenient, Strict};
use SemanticType::{Date, DateTime, Float, Integer, MonthYear, SmallInteger, Text};

/// Raw columns a cleaner operates on. A source missing any of these cannot
/// be cleaned; the cleaner aborts with a contract error instead of guessing.
pub fn required_columns(entity: Entity) -> &'static [&'static str] {
    match entity {
        Entity::User => &["date_of_birth", "join_date", "country_code", "user_uuid"],
        Entity::Card => &[
            "card_number",
            "expiry_date",
            "card_provider",
            "date_payment_confirmed",
        ],
        Entity::Store => &[
            "address",
            "longitude",
            "lat",
            "staff_numbers",
            "opening_date",
            "latitude",
            "continent",
        ],
        Entity::Product => &["product_name", "weight", "date_added"],
        Entity::Order => &[
            "level_0",
            "index",
            "first_name",
            "last_name",
            "1",
            "product_quantity",
        ],
        Entity::Event => &[
            "timestamp",
            "month",
            "year",
            "day",
            "time_period",
            "date_uuid",
        ],
    }
}

/// Per-entity coercion targets. Columns not listed stay text; coercion order
/// follows each cleaner's stage order, so strict card columns are only
/// reached after the digit filter has run.
pub fn coercion_schema(entity: Entity) -> &'static [ColumnSpec] {
    match entity {
        Entity::User => const {
            &[
                col("index", Integer, Lenient),
                col("date_of_birth", Date, Lenient),
                col("join_date", Date, Lenient),
            ]
        },
        Entity::Card => const {
            &[
                col("card_number", Integer, Strict),
                col("expiry_date", MonthYear, Strict),
                col("date_payment_confirmed", Date, Strict),
            ]
        },
        Entity::Store => const {
            &[
                col("index", Integer, Lenient),
                col("longitude", Float, Lenient),
                col("latitude", Float, Lenient),
                col("staff_numbers", SmallInteger, Lenient),
                col("opening_date", Date, Lenient),
            ]
        },
        Entity::Product => const {
            &[
                col("index", Integer, Lenient),
                col("date_added", Date, Lenient),
            ]
        },
        Entity::Order => const {
            &[
                col("index", Integer, Lenient),
                col("card_number", Integer, Lenient),
                col("product_quantity", Integer, Lenient),
            ]
        },
        Entity::Event => &[],
    }
}

/// Columns of the cleaned frame, in output order, with their canonical
/// types. Drives the load seam's column affinity and ordering checks.
pub fn canonical_columns(entity: Entity) -> &'static [ColumnSpec] {
    match entity {
        Entity::User => const {
            &[
                col("index", Integer, Lenient),
                col("first_name", Text, Lenient),
                col("last_name", Text, Lenient),
                col("date_of_birth", Date, Lenient),
                col("company", Text, Lenient),
                col("email_address", Text, Lenient),
                col("address", Text, Lenient),
                col("country", Text, Lenient),
                col("country_code", Text, Lenient),
                col("phone_number", Text, Lenient),
                col("join_date", Date, Lenient),
                col("user_uuid", Text, Lenient),
            ]
        },
        Entity::Card => const {
            &[
                col("index", Integer, Strict),
                col("card_number", Integer, Strict),
                col("expiry_date", MonthYear, Strict),
                col("card_provider", Text, Strict),
                col("date_payment_confirmed", Date, Strict),
            ]
        },
        Entity::Store => const {
            &[
                col("index", Integer, Lenient),
                col("address", Text, Lenient),
                col("longitude", Float, Lenient),
                col("latitude", Float, Lenient),
                col("locality", Text, Lenient),
                col("store_code", Text, Lenient),
                col("staff_numbers", SmallInteger, Lenient),
                col("opening_date", Date, Lenient),
                col("store_type", Text, Lenient),
                col("country_code", Text, Lenient),
                col("continent", Text, Lenient),
            ]
        },
        Entity::Product => const {
            &[
                col("index", Integer, Lenient),
                col("product_name", Text, Lenient),
                col("product_price", Text, Lenient),
                col("weight", Float, Lenient),
                col("category", Text, Lenient),
                col("EAN", Text, Lenient),
                col("date_added", Date, Lenient),
                col("uuid", Text, Lenient),
                col("removed", Text, Lenient),
                col("product_code", Text, Lenient),
            ]
        },
        Entity::Order => const {
            &[
                col("index", Integer, Lenient),
                col("date_uuid", Text, Lenient),
                col("user_uuid", Text, Lenient),
                col("card_number", Integer, Lenient),
                col("store_code", Text, Lenient),
                col("product_code", Text, Lenient),
                col("product_quantity", Integer, Lenient),
            ]
        },
        Entity::Event => const {
            &[
                col("datetime", DateTime, Lenient),
                col("time_period", Text, Lenient),
                col("date_uuid", Text, Lenient),
            ]
        },
    }
}

impl SemanticType {
    /// SQLite column affinity for the load seam.
    pub fn sql_affinity(&self) -> &'static str {
        match self {
            SemanticType::Integer | SemanticType::SmallInteger => "INTEGER",
            SemanticType::Float => "REAL",
            SemanticType::Text
            | SemanticType::Date
            | SemanticType::DateTime
            | SemanticType::MonthYear => "TEXT",
        }
    }
}
