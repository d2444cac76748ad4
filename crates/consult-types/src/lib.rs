//! Validated primitives shared across the consultation crates.
//!
//! - [`NonEmptyText`]: trimmed text with at least one non-whitespace character
//! - [`PatientAge`]: an age the form accepts (1 to 120 years)
//! - [`Username`]: a credential-store key

/// Errors that can occur when constructing validated values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The age was zero or above the supported maximum
    #[error("age must be between {min} and {max}, got {got}")]
    AgeOutOfRange { min: u32, max: u32, got: u32 },
    /// The username contained characters outside the allowed set
    #[error("username may only contain letters, digits, '.', '-', '_' and '@'")]
    InvalidUsername,
    /// The input exceeded the maximum length
    #[error("text exceeds maximum length of {0} characters")]
    TooLong(usize),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
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

    pub fn into_inner(self) -> String {
        self.0
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

/// Patient age in whole years, as accepted by the consultation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientAge(u32);

impl PatientAge {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 120;

    /// # Errors
    ///
    /// Returns `TextError::AgeOutOfRange` for 0 or anything above [`PatientAge::MAX`].
    pub fn new(years: u32) -> Result<Self, TextError> {
        if !(Self::MIN..=Self::MAX).contains(&years) {
            return Err(TextError::AgeOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                got: years,
            });
        }
        Ok(Self(years))
    }

    pub fn years(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PatientAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name for the credential store.
///
/// Trimmed and lower-cased on construction, so `Doctor1` and `doctor1` are the same user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LEN: usize = 64;

    /// # Errors
    ///
    /// Returns `TextError::Empty`, `TextError::TooLong` or `TextError::InvalidUsername`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let name = input.as_ref().trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(TextError::Empty);
        }
        if name.len() > Self::MAX_LEN {
            return Err(TextError::TooLong(Self::MAX_LEN));
        }
        let ok = name
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'.' | b'-' | b'_' | b'@'));
        if !ok {
            return Err(TextError::InvalidUsername);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Ada  ").unwrap().as_str(), "Ada");
        assert_eq!(NonEmptyText::new(" \t ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn non_empty_text_deserialisation_rejects_blank() {
        let err = serde_json::from_str::<NonEmptyText>("\"   \"").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn patient_age_bounds() {
        assert!(PatientAge::new(0).is_err());
        assert_eq!(PatientAge::new(1).unwrap().years(), 1);
        assert_eq!(PatientAge::new(120).unwrap().years(), 120);
        assert_eq!(
            PatientAge::new(121).unwrap_err(),
            TextError::AgeOutOfRange {
                min: 1,
                max: 120,
                got: 121
            }
        );
    }

    #[test]
    fn username_is_normalised_and_restricted() {
        assert_eq!(Username::new(" Doctor1 ").unwrap().as_str(), "doctor1");
        assert_eq!(Username::new("").unwrap_err(), TextError::Empty);
        assert_eq!(
            Username::new("drop table;").unwrap_err(),
            TextError::InvalidUsername
        );
        assert_eq!(
            Username::new("a".repeat(65)).unwrap_err(),
            TextError::TooLong(64)
        );
    }
}
