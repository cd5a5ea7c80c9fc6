//! Utility functions for the rating engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique race ID
pub fn generate_race_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        assert_ne!(generate_race_id(), generate_race_id());
    }

    #[test]
    fn test_current_timestamp_advances() {
        let first = current_timestamp();
        let second = current_timestamp();
        assert!(second >= first);
    }
}
