//! Typed Ids

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use thiserror::Error;

/// Rejected identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidId {
    /// Zero or negative.
    #[error("identifier must be a positive integer, got {0}")]
    NotPositive(i64),

    /// Not an integer at all.
    #[error("identifier is not an integer: {0:?}")]
    Malformed(String),
}

/// A positive database identifier tagged with the entity it belongs to.
pub struct TypedId<T>(i64, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw identifier, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidId::NotPositive`] when `id <= 0`.
    pub fn new(id: i64) -> Result<Self, InvalidId> {
        if id <= 0 {
            return Err(InvalidId::NotPositive(id));
        }

        Ok(Self(id, PhantomData))
    }

    /// Wrap an identifier read back from storage.
    pub(crate) const fn from_db(id: i64) -> Self {
        Self(id, PhantomData)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> TryFrom<i64> for TypedId<T> {
    type Error = InvalidId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = InvalidId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let id = value
            .trim()
            .parse::<i64>()
            .map_err(|_parse_error| InvalidId::Malformed(value.to_string()))?;

        Self::new(id)
    }
}

impl<T> From<TypedId<T>> for i64 {
    fn from(value: TypedId<T>) -> Self {
        value.into_inner()
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = i64::deserialize(deserializer)?;

        Self::new(id).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing;

    type ThingId = TypedId<Thing>;

    #[test]
    fn rejects_zero_and_negative_ids() {
        assert_eq!(ThingId::new(0), Err(InvalidId::NotPositive(0)));
        assert_eq!(ThingId::new(-7), Err(InvalidId::NotPositive(-7)));
    }

    #[test]
    fn parses_from_path_segments() {
        assert_eq!("42".parse::<ThingId>().map(ThingId::into_inner), Ok(42));
        assert!(matches!(
            "abc".parse::<ThingId>(),
            Err(InvalidId::Malformed(_))
        ));
        assert!(matches!(
            "-1".parse::<ThingId>(),
            Err(InvalidId::NotPositive(-1))
        ));
    }

    #[test]
    fn deserialize_rejects_non_positive_ids() {
        let result = serde_json::from_str::<ThingId>("0");

        assert!(result.is_err(), "zero id should not deserialize");
    }
}
