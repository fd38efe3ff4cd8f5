//! Shared types for the madrasati platform.

use serde::{Deserialize, Serialize};

/// Content/UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    Fr,
    Ar,
}

impl Default for Locale {
    fn default() -> Self {
        Self::Fr
    }
}

impl Locale {
    /// Get the locale code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fr" => Some(Self::Fr),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }
}

/// A piece of content carried in both platform languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub fr: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn new(fr: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            fr: fr.into(),
            ar: ar.into(),
        }
    }

    /// Text for the requested locale, falling back to the other language
    /// when the requested one is blank.
    pub fn resolve(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.fr, &self.ar),
            Locale::Ar => (&self.ar, &self.fr),
        };
        if wanted.trim().is_empty() {
            fallback
        } else {
            wanted
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Student
    }
}

impl Role {
    /// Get the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Teachers and admins manage content.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

/// The enrollment attributes of a student that audience rules read.
///
/// All fields are optional: a freshly registered account may not have picked
/// a class yet, and an absent field simply fails any declared dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Level code, e.g. "TC", "1BAC", "2BAC".
    pub level: Option<String>,
    /// Branch (filière) code, e.g. "SCI", "LET".
    pub branch: Option<String>,
    /// Class code, e.g. "TCSF1".
    pub class_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_locale_round_trip() {
        assert_eq!(Locale::from_str("fr"), Some(Locale::Fr));
        assert_eq!(Locale::from_str("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_str("en"), None);
        assert_eq!(Locale::Ar.as_str(), "ar");
    }

    #[test]
    fn test_resolve_prefers_requested_language() {
        let text = LocalizedText::new("Mathématiques", "الرياضيات");
        assert_eq!(text.resolve(Locale::Fr), "Mathématiques");
        assert_eq!(text.resolve(Locale::Ar), "الرياضيات");
    }

    #[test]
    fn test_resolve_falls_back_when_blank() {
        let text = LocalizedText::new("Physique", "");
        assert_eq!(text.resolve(Locale::Ar), "Physique");

        let text = LocalizedText::new("   ", "الفيزياء");
        assert_eq!(text.resolve(Locale::Fr), "الفيزياء");
    }

    #[test]
    fn test_role_staff() {
        assert!(!Role::Student.is_staff());
        assert!(Role::Teacher.is_staff());
        assert!(Role::Admin.is_staff());
        assert_eq!(Role::from_str("teacher"), Some(Role::Teacher));
        assert_eq!(Role::from_str("principal"), None);
    }
}
