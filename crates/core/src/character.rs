//! Advisory character hints attached to a generation request.
//!
//! Characters bias the provider toward consistent rendering across scenes.
//! They have no server-side identity and must never affect scene count or
//! ordering.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_str_api(s: &str) -> Result<Self, CoreError> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(CoreError::Validation(format!(
                "Invalid gender '{s}'. Must be one of: male, female"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Child,
    Young,
    Middle,
    Old,
}

impl AgeBracket {
    pub fn from_str_api(s: &str) -> Result<Self, CoreError> {
        match s {
            "child" => Ok(Self::Child),
            "young" => Ok(Self::Young),
            "middle" => Ok(Self::Middle),
            "old" => Ok(Self::Old),
            _ => Err(CoreError::Validation(format!(
                "Invalid age bracket '{s}'. Must be one of: child, young, middle, old"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Young => "young",
            Self::Middle => "middle",
            Self::Old => "old",
        }
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// One advisory character description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub gender: Gender,
    pub age: AgeBracket,
}

/// Validate a character before it is added to a generation request.
/// The name is required and must be non-empty after trimming.
pub fn validate_character(character: &Character) -> Result<(), CoreError> {
    if character.name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Character name must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn character(name: &str) -> Character {
        Character {
            name: name.to_string(),
            description: "a traveler".to_string(),
            gender: Gender::Female,
            age: AgeBracket::Young,
        }
    }

    // -- enum conversions --

    #[test]
    fn gender_roundtrip() {
        for g in [Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_str_api(g.as_str()).unwrap(), g);
        }
    }

    #[test]
    fn gender_invalid() {
        assert!(Gender::from_str_api("other").is_err());
    }

    #[test]
    fn age_bracket_roundtrip() {
        for a in [
            AgeBracket::Child,
            AgeBracket::Young,
            AgeBracket::Middle,
            AgeBracket::Old,
        ] {
            assert_eq!(AgeBracket::from_str_api(a.as_str()).unwrap(), a);
        }
    }

    #[test]
    fn age_bracket_invalid() {
        assert!(AgeBracket::from_str_api("ancient").is_err());
    }

    // -- validate_character --

    #[test]
    fn valid_character_accepted() {
        assert!(validate_character(&character("Linh")).is_ok());
    }

    #[test]
    fn empty_name_rejected() {
        assert!(validate_character(&character("")).is_err());
    }

    #[test]
    fn whitespace_name_rejected() {
        assert!(validate_character(&character("   ")).is_err());
    }
}
