//! Partial profile updates.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

/// Presence-aware update for a single optional field.
///
/// Deserializes a missing key as `Omitted` (with `#[serde(default)]` on the
/// containing field), an explicit `null` as `Cleared`, and a value as `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Omitted,
    Cleared,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// True when the caller mentioned the field at all, even as `null`.
    #[must_use]
    pub const fn is_provided(&self) -> bool {
        !matches!(self, Self::Omitted)
    }

    /// Returns the new value when one was supplied.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Omitted | Self::Cleared => None,
        }
    }
}

impl<T: Clone> FieldUpdate<T> {
    /// Writes the update into `target`.
    ///
    /// `Cleared` leaves the stored value untouched, the same as `Omitted`.
    pub fn apply_to(&self, target: &mut Option<T>) {
        if let Self::Set(value) = self {
            *target = Some(value.clone());
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Omitted, Self::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Cleared, Self::Set))
    }
}

/// Profile changes requested for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub first_name: FieldUpdate<String>,
    #[serde(default)]
    pub last_name: FieldUpdate<String>,
}

impl ProfilePatch {
    /// Builds a patch from plain optional values; `None` means "leave as is".
    #[must_use]
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// True when no field was provided.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.first_name.is_provided() && !self.last_name.is_provided()
    }
}

impl Validate for ProfilePatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        if !self.is_empty() {
            return Ok(());
        }

        let mut errors = ValidationErrors::new();
        errors.add(
            "profile",
            ValidationError::new("empty_patch")
                .with_message("At least one of first_name or last_name is required".into()),
        );
        Err(errors)
    }
}
