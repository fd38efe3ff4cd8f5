//! Scoring of quiz submissions.
//!
//! Aggregation is plain arithmetic over per-question results: multiple
//! choice is exact, fill-in-the-blank goes through the fuzzy matcher, and a
//! question earns either all of its points or none.

use serde::{Deserialize, Serialize};

use crate::blanks::{BlankTemplate, BlanksGrade};

/// Percentage at or above which an attempt passes (the 10/20 pass mark).
pub const PASS_MARK_PERCENT: f64 = 50.0;

/// What a question asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum QuestionKind {
    MultipleChoice {
        choice_count: usize,
        correct_choice: usize,
    },
    FillBlanks {
        template: BlankTemplate,
    },
}

/// A gradeable question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub points: u32,
    pub kind: QuestionKind,
}

/// A student's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Submission {
    Choice(usize),
    Blanks(Vec<String>),
}

/// Outcome for a single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionGrade {
    pub correct: bool,
    pub points_earned: u32,
    pub points_possible: u32,
    /// Slot detail for fill-in-the-blank questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blanks: Option<BlanksGrade>,
}

/// Grade one question.
///
/// A missing submission, or one of the wrong kind for the question, grades
/// as incorrect. Never an error: degenerate input is a wrong answer, not a
/// failure.
pub fn grade_question(question: &Question, submission: Option<&Submission>) -> QuestionGrade {
    let (correct, blanks) = match (&question.kind, submission) {
        (QuestionKind::MultipleChoice { correct_choice, .. }, Some(Submission::Choice(picked))) => {
            (picked == correct_choice, None)
        }
        (QuestionKind::FillBlanks { template }, Some(Submission::Blanks(answers))) => {
            let grade = template.grade(answers);
            (grade.all_correct, Some(grade))
        }
        _ => (false, None),
    };

    QuestionGrade {
        correct,
        points_earned: if correct { question.points } else { 0 },
        points_possible: question.points,
        blanks,
    }
}

/// Overall result of one quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizGrade {
    pub earned: u32,
    pub possible: u32,
    pub percent: f64,
    pub passed: bool,
    pub questions: Vec<QuestionGrade>,
}

/// Grade a whole quiz.
///
/// `submissions` is aligned with `questions`; a `None` entry means the
/// student left that question unanswered. A zero-point quiz scores 0%.
pub fn grade_quiz(questions: &[Question], submissions: &[Option<Submission>]) -> QuizGrade {
    let graded: Vec<QuestionGrade> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| grade_question(question, submissions.get(i).and_then(Option::as_ref)))
        .collect();

    let earned: u32 = graded.iter().map(|g| g.points_earned).sum();
    let possible: u32 = graded.iter().map(|g| g.points_possible).sum();
    let percent = if possible == 0 {
        0.0
    } else {
        f64::from(earned) / f64::from(possible) * 100.0
    };

    QuizGrade {
        earned,
        possible,
        percent,
        passed: percent >= PASS_MARK_PERCENT,
        questions: graded,
    }
}
