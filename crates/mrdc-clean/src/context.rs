use chrono::{NaiveDateTime, Utc};
use mrdc_standards::{CardLengthRegistry, StandardsError, load_default_card_lengths};

/// How the user age window is enforced.
///
/// The historical rule combined the lower and upper bound with a logical OR,
/// which passes every parseable date of birth and only rejects rows where the
/// date is missing. `Bounded` combines them with AND so both limits actually
/// apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgePolicy {
    /// OR of the two bounds. Matches the long-standing production behavior.
    #[default]
    Permissive,
    /// AND of the two bounds: at least 16 and at most 120 years old.
    Bounded,
}

/// Shared state for a cleaning run: the reference clock, the card length
/// registry, and policy switches.
#[derive(Debug, Clone)]
pub struct CleanContext {
    now: NaiveDateTime,
    card_lengths: CardLengthRegistry,
    age_policy: AgePolicy,
}

impl CleanContext {
    pub fn new(card_lengths: CardLengthRegistry) -> Self {
        Self {
            now: Utc::now().naive_utc(),
            card_lengths,
            age_policy: AgePolicy::default(),
        }
    }

    /// Loads the card length registry from the default standards directory.
    pub fn load_default() -> Result<Self, StandardsError> {
        Ok(Self::new(load_default_card_lengths()?))
    }

    /// Pins the reference clock. Date comparisons ("joined in the future",
    /// age bounds) are evaluated against this instant.
    #[must_use]
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    #[must_use]
    pub fn with_age_policy(mut self, policy: AgePolicy) -> Self {
        self.age_policy = policy;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn card_lengths(&self) -> &CardLengthRegistry {
        &self.card_lengths
    }

    pub fn age_policy(&self) -> AgePolicy {
        self.age_policy
    }
}
