//! Quiz and grading endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::{require_staff, AuthenticatedUser};
use crate::routes::courses::fetch_visible_course;
use crate::AppState;
use madrasati_core::grade_quiz;

/// Fetch a quiz, hiding it (404) from callers outside its audience or the
/// audience of its course.
async fn fetch_visible_quiz(
    state: &AppState,
    auth: &AuthenticatedUser,
    quiz_id: Uuid,
) -> Result<(DbQuiz, DbCourse)> {
    let quiz = state
        .db
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let course = fetch_visible_course(state, auth, quiz.course_id).await?;

    if !auth.is_staff() && !quiz.audience().allows(&auth.profile) {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    Ok((quiz, course))
}

/// Student rendering of a question: masked sentence, no expected answers,
/// no correct choice index.
fn question_view(question: &DbQuestion, locale: Locale) -> Result<QuestionView> {
    let (text, blank_count) = if question.kind == "fill_blanks" {
        let source = question.template.as_deref().unwrap_or_default();
        let template = BlankTemplate::parse(source).map_err(|e| {
            ApiError::Internal(format!(
                "stored template for question {} is invalid: {}",
                question.id, e
            ))
        })?;
        (Some(template.display()), Some(template.blank_count()))
    } else {
        (None, None)
    };

    Ok(QuestionView {
        id: question.id,
        position: question.position,
        kind: question.kind.clone(),
        prompt: question.prompt().resolve(locale).to_string(),
        text,
        blank_count,
        choices: question.choices(locale),
        points: question.points,
    })
}

/// GET /api/quizzes/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<QuizView>> {
    let (quiz, _course) = fetch_visible_quiz(&state, &auth, quiz_id).await?;

    let questions = state.db.list_questions(quiz.id).await?;

    let mut views = Vec::with_capacity(questions.len());
    for question in &questions {
        views.push(question_view(question, auth.locale)?);
    }

    Ok(Json(QuizView {
        id: quiz.id,
        course_id: quiz.course_id,
        title: quiz.title().resolve(auth.locale).to_string(),
        questions: views,
    }))
}

/// POST /api/courses/{id}/quizzes
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<CreateQuizRequest>,
) -> Result<Json<QuizSummary>> {
    require_staff(&auth)?;

    state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let quiz = DbQuiz {
        id: Uuid::new_v4(),
        course_id,
        title_fr: request.title_fr,
        title_ar: request.title_ar,
        target_levels: request.target_levels,
        target_branches: request.target_branches,
        target_classes: request.target_classes,
        created_at: Utc::now(),
    };
    state.db.insert_quiz(&quiz).await?;

    Ok(Json(QuizSummary {
        id: quiz.id,
        title: quiz.title().resolve(auth.locale).to_string(),
        question_count: 0,
    }))
}

/// POST /api/quizzes/{id}/questions
/// Validates the question shape up front so grading never sees a malformed
/// template or a correct choice that points outside the list.
pub async fn add_question(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<CreateQuestionRequest>,
) -> Result<Json<QuestionView>> {
    require_staff(&auth)?;

    state
        .db
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    match request.kind.as_str() {
        "multiple_choice" => {
            let choice_count = request.choices_fr.len().max(request.choices_ar.len());
            if choice_count < 2 {
                return Err(ApiError::BadRequest(
                    "Multiple choice questions need at least two choices".to_string(),
                ));
            }
            let correct = request.correct_choice.ok_or_else(|| {
                ApiError::BadRequest("correct_choice is required".to_string())
            })?;
            if correct < 0 || correct as usize >= choice_count {
                return Err(ApiError::BadRequest(
                    "correct_choice is out of range".to_string(),
                ));
            }
        }
        "fill_blanks" => {
            let source = request
                .template
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("template is required".to_string()))?;
            BlankTemplate::parse(source)
                .map_err(|e| ApiError::Parse(format!("Invalid template: {}", e)))?;
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "Unknown question kind: {}",
                other
            )))
        }
    }

    let question = DbQuestion {
        id: Uuid::new_v4(),
        quiz_id,
        position: request.position,
        kind: request.kind,
        prompt_fr: request.prompt_fr,
        prompt_ar: request.prompt_ar,
        template: request.template,
        choices_fr: request.choices_fr,
        choices_ar: request.choices_ar,
        correct_choice: request.correct_choice,
        points: request.points.max(1),
    };
    state.db.insert_question(&question).await?;

    question_view(&question, auth.locale).map(Json)
}

/// PUT /api/quizzes/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<UpdateQuizRequest>,
) -> Result<Json<QuizSummary>> {
    require_staff(&auth)?;

    let mut current = state
        .db
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    if let Some(title_fr) = request.title_fr {
        current.title_fr = title_fr;
    }
    if let Some(title_ar) = request.title_ar {
        current.title_ar = title_ar;
    }
    if let Some(target_levels) = request.target_levels {
        current.target_levels = target_levels;
    }
    if let Some(target_branches) = request.target_branches {
        current.target_branches = target_branches;
    }
    if let Some(target_classes) = request.target_classes {
        current.target_classes = target_classes;
    }

    state.db.update_quiz(&current).await?;

    let question_count = state.db.count_questions(current.id).await? as usize;

    Ok(Json(QuizSummary {
        id: current.id,
        title: current.title().resolve(auth.locale).to_string(),
        question_count,
    }))
}

/// PUT /api/questions/{id}
/// Re-validates the question shape after applying the changes.
pub async fn update_question(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(question_id): Path<Uuid>,
    Json(request): Json<UpdateQuestionRequest>,
) -> Result<Json<QuestionView>> {
    require_staff(&auth)?;

    let mut current = state
        .db
        .get_question(question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if let Some(position) = request.position {
        current.position = position;
    }
    if let Some(prompt_fr) = request.prompt_fr {
        current.prompt_fr = prompt_fr;
    }
    if let Some(prompt_ar) = request.prompt_ar {
        current.prompt_ar = prompt_ar;
    }
    if let Some(template) = request.template {
        current.template = Some(template);
    }
    if let Some(choices_fr) = request.choices_fr {
        current.choices_fr = choices_fr;
    }
    if let Some(choices_ar) = request.choices_ar {
        current.choices_ar = choices_ar;
    }
    if let Some(correct_choice) = request.correct_choice {
        current.correct_choice = Some(correct_choice);
    }
    if let Some(points) = request.points {
        current.points = points.max(1);
    }

    match current.kind.as_str() {
        "multiple_choice" => {
            let choice_count = current.choices_fr.len().max(current.choices_ar.len());
            if choice_count < 2 {
                return Err(ApiError::BadRequest(
                    "Multiple choice questions need at least two choices".to_string(),
                ));
            }
            let correct = current.correct_choice.ok_or_else(|| {
                ApiError::BadRequest("correct_choice is required".to_string())
            })?;
            if correct < 0 || correct as usize >= choice_count {
                return Err(ApiError::BadRequest(
                    "correct_choice is out of range".to_string(),
                ));
            }
        }
        _ => {
            let source = current
                .template
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("template is required".to_string()))?;
            BlankTemplate::parse(source)
                .map_err(|e| ApiError::Parse(format!("Invalid template: {}", e)))?;
        }
    }

    state.db.update_question(&current).await?;

    question_view(&current, auth.locale).map(Json)
}

/// DELETE /api/quizzes/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_staff(&auth)?;

    let deleted = state.db.delete_quiz(quiz_id).await?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// DELETE /api/questions/{id}
pub async fn remove_question(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(question_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_staff(&auth)?;

    let deleted = state.db.delete_question(question_id).await?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// POST /api/quizzes/{id}/attempts
/// Grades a submission and records the attempt
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>> {
    let (quiz, course) = fetch_visible_quiz(&state, &auth, quiz_id).await?;

    if !state.db.is_enrolled(auth.user_id, course.id).await? {
        return Err(ApiError::BadRequest(
            "Not enrolled in this course".to_string(),
        ));
    }

    let db_questions = state.db.list_questions(quiz.id).await?;
    if db_questions.is_empty() {
        return Err(ApiError::BadRequest("Quiz has no questions".to_string()));
    }

    let mut questions = Vec::with_capacity(db_questions.len());
    for question in &db_questions {
        questions.push(question.to_core()?);
    }

    // Align submissions with question order; unanswered questions stay None.
    let submissions: Vec<Option<Submission>> = db_questions
        .iter()
        .map(|question| {
            payload
                .answers
                .iter()
                .find(|answer| answer.question_id == question.id)
                .and_then(|answer| {
                    if let Some(choice) = answer.choice {
                        Some(Submission::Choice(choice))
                    } else {
                        answer.blanks.clone().map(Submission::Blanks)
                    }
                })
        })
        .collect();

    let grade = grade_quiz(&questions, &submissions);

    let detail = serde_json::to_string(&grade)
        .map_err(|e| ApiError::Internal(format!("failed to serialize grade: {}", e)))?;

    let attempt = DbQuizAttempt {
        id: Uuid::new_v4(),
        quiz_id: quiz.id,
        student_id: auth.user_id,
        earned: grade.earned as i32,
        possible: grade.possible as i32,
        percent: grade.percent,
        passed: grade.passed,
        detail,
        submitted_at: Utc::now(),
    };
    state.db.insert_attempt(&attempt).await?;

    tracing::info!(
        "Graded attempt {} for quiz {}: {}/{}",
        attempt.id,
        quiz.id,
        grade.earned,
        grade.possible
    );

    Ok(Json(SubmitAttemptResponse {
        attempt_id: attempt.id,
        grade,
    }))
}

/// GET /api/quizzes/{id}/attempts
/// The caller's attempt history for this quiz
pub async fn list_attempts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<AttemptListResponse>> {
    let (quiz, _course) = fetch_visible_quiz(&state, &auth, quiz_id).await?;

    let attempts = state.db.list_attempts(auth.user_id, quiz.id).await?;

    Ok(Json(AttemptListResponse {
        attempts: attempts
            .iter()
            .map(|attempt| attempt.to_api_attempt())
            .collect(),
    }))
}
