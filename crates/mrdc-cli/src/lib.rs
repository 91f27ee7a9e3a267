//! Library half of the `mrdc` binary: logging setup and the staged
//! ingest-clean-load pipeline.

pub mod logging;
pub mod pipeline;
