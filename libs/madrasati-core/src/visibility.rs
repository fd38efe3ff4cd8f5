//! Audience rules deciding which content a student can see.
//!
//! Courses, quizzes and exercises carry optional target codes for level,
//! branch (filière) and class. Untagged content is public. Filtering always
//! runs over lists already fetched into memory, one item at a time.

use serde::{Deserialize, Serialize};

use crate::types::StudentProfile;

/// Target codes a content item may declare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceTags {
    /// Level codes, e.g. "TC", "1BAC", "2BAC".
    pub levels: Vec<String>,
    /// Branch codes, e.g. "SCI", "LET".
    pub branches: Vec<String>,
    /// Class codes, e.g. "TCSF1".
    pub classes: Vec<String>,
}

impl AudienceTags {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty() && self.branches.is_empty() && self.classes.is_empty()
    }
}

/// Who a content item is shown to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// No tags declared: visible to every student.
    Unrestricted,
    /// Visible only to students matching the declared tags.
    RestrictedTo(AudienceTags),
}

impl Audience {
    /// Build from raw tag lists, collapsing the all-empty case.
    pub fn from_tags(levels: Vec<String>, branches: Vec<String>, classes: Vec<String>) -> Self {
        let tags = AudienceTags {
            levels,
            branches,
            classes,
        };
        if tags.is_empty() {
            Self::Unrestricted
        } else {
            Self::RestrictedTo(tags)
        }
    }

    /// Whether a student with the given profile may see the item.
    ///
    /// A class-code match is the most specific rule and wins outright.
    /// Otherwise every declared dimension among levels/branches must match
    /// the profile; an undeclared dimension is not checked, and a declared
    /// dimension with no corresponding profile field fails.
    pub fn allows(&self, profile: &StudentProfile) -> bool {
        let tags = match self {
            Self::Unrestricted => return true,
            Self::RestrictedTo(tags) => tags,
        };

        if let Some(class_code) = &profile.class_code {
            if tags.classes.contains(class_code) {
                return true;
            }
        }

        // Class restriction alone, and it did not match above.
        if tags.levels.is_empty() && tags.branches.is_empty() {
            return false;
        }

        if !tags.levels.is_empty() {
            match &profile.level {
                Some(level) if tags.levels.contains(level) => {}
                _ => return false,
            }
        }

        if !tags.branches.is_empty() {
            match &profile.branch {
                Some(branch) if tags.branches.contains(branch) => {}
                _ => return false,
            }
        }

        true
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self::Unrestricted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(levels: &[&str], branches: &[&str], classes: &[&str]) -> Audience {
        Audience::from_tags(
            levels.iter().map(|s| s.to_string()).collect(),
            branches.iter().map(|s| s.to_string()).collect(),
            classes.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn student(level: Option<&str>, branch: Option<&str>, class_code: Option<&str>) -> StudentProfile {
        StudentProfile {
            level: level.map(String::from),
            branch: branch.map(String::from),
            class_code: class_code.map(String::from),
        }
    }

    #[test]
    fn test_empty_tags_collapse_to_unrestricted() {
        assert_eq!(tags(&[], &[], &[]), Audience::Unrestricted);
    }

    #[test]
    fn test_untagged_content_is_visible_to_everyone() {
        let audience = Audience::Unrestricted;
        assert!(audience.allows(&student(None, None, None)));
        assert!(audience.allows(&student(Some("1BAC"), Some("SCI"), Some("1BSF2"))));
    }

    #[test]
    fn test_class_match_wins_regardless_of_other_dimensions() {
        let audience = tags(&["2BAC"], &["LET"], &["TCSF1"]);
        // Level and branch both mismatch, class matches.
        let profile = student(Some("TC"), Some("SCI"), Some("TCSF1"));
        assert!(audience.allows(&profile));
    }

    #[test]
    fn test_level_and_branch_both_required_when_declared() {
        let audience = tags(&["1BAC"], &["SCI"], &[]);
        assert!(audience.allows(&student(Some("1BAC"), Some("SCI"), None)));
        assert!(!audience.allows(&student(Some("1BAC"), Some("LET"), None)));
        assert!(!audience.allows(&student(Some("2BAC"), Some("SCI"), None)));
    }

    #[test]
    fn test_undeclared_dimension_is_not_checked() {
        let audience = tags(&["1BAC"], &[], &[]);
        assert!(audience.allows(&student(Some("1BAC"), Some("SCI"), None)));
        assert!(audience.allows(&student(Some("1BAC"), Some("LET"), None)));
        assert!(audience.allows(&student(Some("1BAC"), None, None)));
    }

    #[test]
    fn test_declared_dimension_with_absent_profile_field_hides() {
        let audience = tags(&["1BAC"], &[], &[]);
        assert!(!audience.allows(&student(None, Some("SCI"), None)));
    }

    #[test]
    fn test_class_only_restriction_hides_other_classes() {
        let audience = tags(&[], &[], &["TCSF1"]);
        assert!(audience.allows(&student(None, None, Some("TCSF1"))));
        assert!(!audience.allows(&student(None, None, Some("TCSF2"))));
        assert!(!audience.allows(&student(Some("TC"), Some("SCI"), None)));
    }

    #[test]
    fn test_class_mismatch_falls_through_to_level_and_branch() {
        let audience = tags(&["TC"], &[], &["TCSF1"]);
        // Wrong class but matching level still passes through rule three.
        assert!(audience.allows(&student(Some("TC"), None, Some("TCSF2"))));
        assert!(!audience.allows(&student(Some("1BAC"), None, Some("TCSF2"))));
    }

    #[test]
    fn test_filtering_a_fetched_list() {
        let items = vec![
            ("open", Audience::Unrestricted),
            ("sciences", tags(&["1BAC"], &["SCI"], &[])),
            ("one_class", tags(&[], &[], &["1BSF2"])),
        ];
        let profile = student(Some("1BAC"), Some("SCI"), Some("1BSF1"));

        let visible: Vec<&str> = items
            .iter()
            .filter(|(_, audience)| audience.allows(&profile))
            .map(|(name, _)| *name)
            .collect();

        assert_eq!(visible, vec!["open", "sciences"]);
    }
}
