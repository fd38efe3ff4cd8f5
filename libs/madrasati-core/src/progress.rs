//! Course completion arithmetic.

use serde::{Deserialize, Serialize};

/// Snapshot of how far a student is through a course.
///
/// A unit is either a lesson (completed by reading it) or a quiz (completed
/// by a passing attempt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub lessons_completed: usize,
    pub lessons_total: usize,
    pub quizzes_passed: usize,
    pub quizzes_total: usize,
    pub percent: f64,
}

impl CourseProgress {
    /// Completed units over total units, as a percentage.
    ///
    /// Counts are clamped to their totals. A course with no units is
    /// counted as not started rather than finished.
    pub fn compute(
        lessons_completed: usize,
        lessons_total: usize,
        quizzes_passed: usize,
        quizzes_total: usize,
    ) -> Self {
        let lessons_completed = lessons_completed.min(lessons_total);
        let quizzes_passed = quizzes_passed.min(quizzes_total);

        let total = lessons_total + quizzes_total;
        let done = lessons_completed + quizzes_passed;
        let percent = if total == 0 {
            0.0
        } else {
            done as f64 / total as f64 * 100.0
        };

        Self {
            lessons_completed,
            lessons_total,
            quizzes_passed,
            quizzes_total,
            percent,
        }
    }

    /// Whether every unit is done. Certificates require this.
    pub fn is_complete(&self) -> bool {
        let total = self.lessons_total + self.quizzes_total;
        total > 0 && self.lessons_completed + self.quizzes_passed == total
    }
}
