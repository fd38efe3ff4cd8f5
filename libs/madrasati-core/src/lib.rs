//! Core domain library shared by the madrasati backend (and future clients).
//!
//! Provides:
//! - Fuzzy matching of typed quiz answers (Levenshtein distance)
//! - Audience rules deciding which content a student can see
//! - Fill-in-the-blank sentence templates and their grading
//! - Quiz scoring and course progress arithmetic
//! - Shared types (Locale, LocalizedText, Role, StudentProfile)

pub mod blanks;
pub mod error;
pub mod grading;
pub mod matching;
pub mod progress;
pub mod types;
pub mod visibility;

pub use blanks::{BlankTemplate, BlanksGrade};
pub use error::{Result, TemplateError};
pub use grading::{
    grade_question, grade_quiz, Question, QuestionGrade, QuestionKind, QuizGrade, Submission,
    PASS_MARK_PERCENT,
};
pub use matching::{
    answer_matches, levenshtein_distance, match_answer, normalized_similarity, MatchResult,
    MATCH_THRESHOLD,
};
pub use progress::CourseProgress;
pub use types::{Locale, LocalizedText, Role, StudentProfile};
pub use visibility::{Audience, AudienceTags};
