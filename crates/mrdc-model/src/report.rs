use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Sqlite,
}

/// Result of one entity's ingest-clean-load pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityOutcome {
    pub entity: Entity,
    pub rows_in: usize,
    pub rows_out: usize,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl EntityOutcome {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcomes: Vec<EntityOutcome>,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}
