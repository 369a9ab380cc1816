/// Validated identifier newtypes for teams and games.
///
/// Both identifiers are opaque provider strings. The only shape constraint is
/// that they are non-empty and carry no surrounding whitespace, which is
/// enforced at construction via [`TryFrom<&str>`] and re-checked on
/// deserialization so invalid ids cannot enter the engine from JSON.
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Errors produced when constructing an identifier from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewtypeError {
    /// The string did not satisfy the identifier shape.
    #[error("invalid {type_name}: expected {expected}, got {got:?}")]
    InvalidFormat {
        /// Name of the type that rejected the input.
        type_name: &'static str,
        /// A human-readable description of the expected format.
        expected: &'static str,
        /// The input that was rejected.
        got: String,
    },
}

fn check_identifier(type_name: &'static str, s: &str) -> Result<(), NewtypeError> {
    if s.is_empty() || s.trim() != s {
        return Err(NewtypeError::InvalidFormat {
            type_name,
            expected: "non-empty string without surrounding whitespace",
            got: s.to_owned(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TeamId
// ---------------------------------------------------------------------------

/// Provider identifier of a team leaf.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamId(String);

impl TryFrom<&str> for TeamId {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        check_identifier("TeamId", s)?;
        Ok(Self(s.to_owned()))
    }
}

impl Deref for TeamId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TeamId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// Provider identifier of a game, shared by the decided and undecided forms
/// of the same fixture.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(String);

impl TryFrom<&str> for GameId {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        check_identifier("GameId", s)?;
        Ok(Self(s.to_owned()))
    }
}

impl Deref for GameId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GameId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn team_id_accepts_provider_strings() {
        let id = TeamId::try_from("2579").expect("numeric id");
        assert_eq!(&*id, "2579");
        assert!(TeamId::try_from("usc-trojans").is_ok());
    }

    #[test]
    fn empty_and_padded_ids_are_rejected() {
        assert!(TeamId::try_from("").is_err());
        assert!(GameId::try_from(" 401520").is_err());
        assert!(GameId::try_from("401520\n").is_err());
    }

    #[test]
    fn error_names_the_type() {
        let err = GameId::try_from("").expect_err("empty");
        assert!(err.to_string().contains("GameId"), "{err}");
    }

    #[test]
    fn deserialize_revalidates() {
        let ok: GameId = serde_json::from_str("\"401520281\"").expect("valid");
        assert_eq!(ok.to_string(), "401520281");
        let bad: Result<TeamId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
