#![deny(unsafe_code)]

pub mod card_lengths;
pub mod error;

pub use crate::card_lengths::{
    CardLengthRegistry, default_standards_root, load_default_card_lengths,
};
pub use crate::error::StandardsError;
