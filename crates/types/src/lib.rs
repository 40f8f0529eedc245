/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a validated SLA budget.
#[derive(Debug, thiserror::Error)]
pub enum SlaError {
    /// The budget was zero or negative
    #[error("SLA budget must be a positive number of minutes")]
    NonPositive,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A service-level deadline budget in minutes, guaranteed strictly positive.
///
/// Fixed at action creation time; the overdue projection compares elapsed
/// minutes against this budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlaMinutes(i64);

impl SlaMinutes {
    /// Creates a new `SlaMinutes` from the given minute count.
    ///
    /// # Returns
    ///
    /// Returns `Ok(SlaMinutes)` for a strictly positive count,
    /// or `Err(SlaError::NonPositive)` for zero or negative input.
    pub fn new(minutes: i64) -> Result<Self, SlaError> {
        if minutes <= 0 {
            return Err(SlaError::NonPositive);
        }
        Ok(Self(minutes))
    }

    /// Returns the budget as a minute count.
    pub fn minutes(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SlaMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for SlaMinutes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SlaMinutes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let minutes = i64::deserialize(deserializer)?;
        SlaMinutes::new(minutes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Chest X-ray  ").unwrap();
        assert_eq!(text.as_str(), "Chest X-ray");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn sla_minutes_accepts_positive() {
        let sla = SlaMinutes::new(30).unwrap();
        assert_eq!(sla.minutes(), 30);
    }

    #[test]
    fn sla_minutes_rejects_zero_and_negative() {
        assert!(matches!(SlaMinutes::new(0), Err(SlaError::NonPositive)));
        assert!(matches!(SlaMinutes::new(-15), Err(SlaError::NonPositive)));
    }

    #[test]
    fn sla_minutes_deserialise_rejects_non_positive() {
        let err = serde_json::from_str::<SlaMinutes>("0");
        assert!(err.is_err());
        let ok: SlaMinutes = serde_json::from_str("45").unwrap();
        assert_eq!(ok.minutes(), 45);
    }
}
