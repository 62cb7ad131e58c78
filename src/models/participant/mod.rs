// Participant module

use serde::{Deserialize, Serialize};

use crate::models::slot::TimeSlot;

/// Longest participant name the join form accepts.
pub const MAX_NAME_LENGTH: usize = 50;

/// A participant as listed by the event service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Locally cached join session for one event, so reopening the event
/// resumes the previous identity and selection without re-joining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSession {
    pub participant_id: String,
    pub name: String,
    /// Last selection acknowledged by the event service
    pub slots: Vec<TimeSlot>,
}

/// Validate a join-form name before sending it to the service
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Participant name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Participant name is too long (max {} characters)",
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_name("Ala").is_ok());
        assert!(validate_name("  Jan Kowalski  ").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        let name = "ż".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&name).is_ok());
    }
}
