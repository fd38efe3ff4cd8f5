//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique code to avoid collisions between test runs.
pub fn unique_code(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a register request body.
pub fn register_request(full_name: &str, role: Option<&str>) -> serde_json::Value {
    match role {
        Some(r) => json!({ "full_name": full_name, "role": r }),
        None => json!({ "full_name": full_name }),
    }
}

/// Create a published course body with no audience tags.
pub fn course_request(subject_code: &str, title_fr: &str) -> serde_json::Value {
    json!({
        "subject_code": subject_code,
        "title_fr": title_fr,
        "title_ar": "",
        "published": true,
    })
}

/// Create a published course body with audience tags.
pub fn targeted_course_request(
    subject_code: &str,
    title_fr: &str,
    levels: &[&str],
    branches: &[&str],
    classes: &[&str],
) -> serde_json::Value {
    json!({
        "subject_code": subject_code,
        "title_fr": title_fr,
        "target_levels": levels,
        "target_branches": branches,
        "target_classes": classes,
        "published": true,
    })
}

/// Create a lesson body.
pub fn lesson_request(title_fr: &str) -> serde_json::Value {
    json!({
        "position": 0,
        "title_fr": title_fr,
        "body_fr": format!("Contenu de {}", title_fr),
    })
}

/// Create a quiz body with no audience tags.
pub fn quiz_request(title_fr: &str) -> serde_json::Value {
    json!({ "title_fr": title_fr })
}

/// Create a multiple choice question body.
pub fn mcq_question_request(
    prompt_fr: &str,
    choices: &[&str],
    correct_choice: i32,
    points: i32,
) -> serde_json::Value {
    json!({
        "kind": "multiple_choice",
        "prompt_fr": prompt_fr,
        "choices_fr": choices,
        "correct_choice": correct_choice,
        "points": points,
    })
}

/// Create a fill-in-the-blank question body.
pub fn fill_blanks_question_request(
    prompt_fr: &str,
    template: &str,
    points: i32,
) -> serde_json::Value {
    json!({
        "kind": "fill_blanks",
        "prompt_fr": prompt_fr,
        "template": template,
        "points": points,
    })
}

/// Create an attempt body answering one question with blanks.
pub fn blanks_attempt_request(question_id: &str, blanks: &[&str]) -> serde_json::Value {
    json!({
        "answers": [
            { "question_id": question_id, "blanks": blanks }
        ]
    })
}

/// Create an attempt body answering one question with a choice.
pub fn choice_attempt_request(question_id: &str, choice: usize) -> serde_json::Value {
    json!({
        "answers": [
            { "question_id": question_id, "choice": choice }
        ]
    })
}

/// Create an exercise body.
pub fn exercise_request(title_fr: &str) -> serde_json::Value {
    json!({
        "title_fr": title_fr,
        "statement_fr": format!("Énoncé de {}", title_fr),
        "solution_fr": format!("Solution de {}", title_fr),
    })
}
