//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{ApiError, Result};

// Re-export shared types from madrasati-core
pub use madrasati_core::{
    Audience, AudienceTags, BlankTemplate, CourseProgress, Locale, LocalizedText, Question,
    QuestionKind, QuizGrade, Role, StudentProfile, Submission,
};

// === Database Entity Types ===

/// Account row. The token is the opaque bearer credential handed out at
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub token: String,
    pub full_name: String,
    pub role: String,
    pub locale: String,
    pub level: Option<String>,
    pub branch: Option<String>,
    pub class_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl DbUser {
    pub fn role(&self) -> Role {
        Role::from_str(&self.role).unwrap_or_default()
    }

    pub fn locale(&self) -> Locale {
        Locale::from_str(&self.locale).unwrap_or_default()
    }

    /// The attributes the audience rules read.
    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            level: self.level.clone(),
            branch: self.branch.clone(),
            class_code: self.class_code.clone(),
        }
    }

    pub fn to_api_user(&self) -> UserView {
        UserView {
            id: self.id,
            full_name: self.full_name.clone(),
            role: self.role.clone(),
            locale: self.locale.clone(),
            level: self.level.clone(),
            branch: self.branch.clone(),
            class_code: self.class_code.clone(),
            created_at: self.created_at,
        }
    }
}

/// Level in the academic hierarchy (Tronc Commun, 1BAC, 2BAC).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLevel {
    pub code: String,
    pub name_fr: String,
    pub name_ar: String,
    pub position: i32,
}

/// Branch (filière) within a level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBranch {
    pub code: String,
    pub name_fr: String,
    pub name_ar: String,
}

/// Concrete class group, e.g. TCSF1.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchoolClass {
    pub code: String,
    pub level_code: String,
    pub branch_code: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubject {
    pub code: String,
    pub name_fr: String,
    pub name_ar: String,
}

/// Course stored in PostgreSQL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourse {
    pub id: Uuid,
    pub subject_code: String,
    pub teacher_id: Uuid,
    pub title_fr: String,
    pub title_ar: String,
    pub summary_fr: String,
    pub summary_ar: String,
    pub target_levels: Vec<String>,
    pub target_branches: Vec<String>,
    pub target_classes: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCourse {
    pub fn audience(&self) -> Audience {
        Audience::from_tags(
            self.target_levels.clone(),
            self.target_branches.clone(),
            self.target_classes.clone(),
        )
    }

    pub fn title(&self) -> LocalizedText {
        LocalizedText::new(self.title_fr.clone(), self.title_ar.clone())
    }

    pub fn summary(&self) -> LocalizedText {
        LocalizedText::new(self.summary_fr.clone(), self.summary_ar.clone())
    }

    pub fn to_summary(&self, locale: Locale) -> CourseSummary {
        CourseSummary {
            id: self.id,
            subject_code: self.subject_code.clone(),
            title: self.title().resolve(locale).to_string(),
            summary: self.summary().resolve(locale).to_string(),
            published: self.published,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub position: i32,
    pub title_fr: String,
    pub title_ar: String,
    pub body_fr: String,
    pub body_ar: String,
}

impl DbLesson {
    pub fn to_api_lesson(&self, locale: Locale) -> LessonView {
        LessonView {
            id: self.id,
            position: self.position,
            title: LocalizedText::new(self.title_fr.clone(), self.title_ar.clone())
                .resolve(locale)
                .to_string(),
            body: LocalizedText::new(self.body_fr.clone(), self.body_ar.clone())
                .resolve(locale)
                .to_string(),
        }
    }
}

/// Quiz stored in PostgreSQL. Carries its own audience tags so a quiz can
/// be narrower than its course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title_fr: String,
    pub title_ar: String,
    pub target_levels: Vec<String>,
    pub target_branches: Vec<String>,
    pub target_classes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DbQuiz {
    pub fn audience(&self) -> Audience {
        Audience::from_tags(
            self.target_levels.clone(),
            self.target_branches.clone(),
            self.target_classes.clone(),
        )
    }

    pub fn title(&self) -> LocalizedText {
        LocalizedText::new(self.title_fr.clone(), self.title_ar.clone())
    }
}

/// Question stored in PostgreSQL.
///
/// `kind` is "multiple_choice" or "fill_blanks"; fill-in-the-blank questions
/// keep the authored template source and re-parse it at grading time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    pub kind: String,
    pub prompt_fr: String,
    pub prompt_ar: String,
    pub template: Option<String>,
    pub choices_fr: Vec<String>,
    pub choices_ar: Vec<String>,
    pub correct_choice: Option<i32>,
    pub points: i32,
}

impl DbQuestion {
    pub fn prompt(&self) -> LocalizedText {
        LocalizedText::new(self.prompt_fr.clone(), self.prompt_ar.clone())
    }

    /// Choices for the locale, falling back to the other language when the
    /// requested list was never filled in.
    pub fn choices(&self, locale: Locale) -> Vec<String> {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.choices_fr, &self.choices_ar),
            Locale::Ar => (&self.choices_ar, &self.choices_fr),
        };
        if wanted.is_empty() {
            fallback.clone()
        } else {
            wanted.clone()
        }
    }

    /// Convert to the gradeable core question.
    pub fn to_core(&self) -> Result<Question> {
        let kind = match self.kind.as_str() {
            "multiple_choice" => {
                let correct = self.correct_choice.ok_or_else(|| {
                    ApiError::Internal(format!("question {} has no correct choice", self.id))
                })?;
                QuestionKind::MultipleChoice {
                    choice_count: self.choices_fr.len().max(self.choices_ar.len()),
                    correct_choice: correct.max(0) as usize,
                }
            }
            "fill_blanks" => {
                let source = self.template.as_deref().unwrap_or_default();
                let template = BlankTemplate::parse(source).map_err(|e| {
                    ApiError::Internal(format!("stored template for question {} is invalid: {}", self.id, e))
                })?;
                QuestionKind::FillBlanks { template }
            }
            other => {
                return Err(ApiError::Internal(format!(
                    "question {} has unknown kind '{}'",
                    self.id, other
                )))
            }
        };

        Ok(Question {
            points: self.points.max(0) as u32,
            kind,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbExercise {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title_fr: String,
    pub title_ar: String,
    pub statement_fr: String,
    pub statement_ar: String,
    pub solution_fr: String,
    pub solution_ar: String,
    pub target_levels: Vec<String>,
    pub target_branches: Vec<String>,
    pub target_classes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DbExercise {
    pub fn audience(&self) -> Audience {
        Audience::from_tags(
            self.target_levels.clone(),
            self.target_branches.clone(),
            self.target_classes.clone(),
        )
    }

    pub fn to_api_exercise(&self, locale: Locale, with_solution: bool) -> ExerciseView {
        ExerciseView {
            id: self.id,
            course_id: self.course_id,
            title: LocalizedText::new(self.title_fr.clone(), self.title_ar.clone())
                .resolve(locale)
                .to_string(),
            statement: LocalizedText::new(self.statement_fr.clone(), self.statement_ar.clone())
                .resolve(locale)
                .to_string(),
            solution: with_solution.then(|| {
                LocalizedText::new(self.solution_fr.clone(), self.solution_ar.clone())
                    .resolve(locale)
                    .to_string()
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuizAttempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub student_id: Uuid,
    pub earned: i32,
    pub possible: i32,
    pub percent: f64,
    pub passed: bool,
    /// Serialized `QuizGrade` for per-question review.
    pub detail: String,
    pub submitted_at: DateTime<Utc>,
}

impl DbQuizAttempt {
    pub fn to_api_attempt(&self) -> AttemptView {
        AttemptView {
            id: self.id,
            quiz_id: self.quiz_id,
            earned: self.earned,
            possible: self.possible,
            percent: self.percent,
            passed: self.passed,
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCertificate {
    pub id: Uuid,
    pub serial: String,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl DbCertificate {
    pub fn to_api_certificate(&self) -> CertificateView {
        CertificateView {
            id: self.id,
            serial: self.serial.clone(),
            course_id: self.course_id,
            issued_at: self.issued_at,
        }
    }
}

/// Uploaded course document tracked against its object-store key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbResource {
    pub id: Uuid,
    pub course_id: Uuid,
    pub file_name: String,
    pub content_type: Option<String>,
    pub s3_key: String,
    pub content_hash: String,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl DbResource {
    pub fn to_api_resource(&self) -> ResourceView {
        ResourceView {
            id: self.id,
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            content_hash: self.content_hash.clone(),
            uploaded_at: self.uploaded_at,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub role: Option<String>,
    pub locale: Option<String>,
    pub level: Option<String>,
    pub branch: Option<String>,
    pub class_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub locale: String,
    pub level: Option<String>,
    pub branch: Option<String>,
    pub class_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub locale: Option<String>,
    pub level: Option<String>,
    pub branch: Option<String>,
    pub class_code: Option<String>,
}

// Course types

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub subject_code: String,
    pub title: String,
    pub summary: String,
    pub published: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    pub course: CourseSummary,
    pub lessons: Vec<LessonView>,
    pub quizzes: Vec<QuizSummary>,
    pub exercises: Vec<ExerciseSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonView {
    pub id: Uuid,
    pub position: i32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub subject_code: String,
    pub title_fr: String,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub summary_fr: String,
    #[serde(default)]
    pub summary_ar: String,
    #[serde(default)]
    pub target_levels: Vec<String>,
    #[serde(default)]
    pub target_branches: Vec<String>,
    #[serde(default)]
    pub target_classes: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub subject_code: Option<String>,
    pub title_fr: Option<String>,
    pub title_ar: Option<String>,
    pub summary_fr: Option<String>,
    pub summary_ar: Option<String>,
    pub target_levels: Option<Vec<String>>,
    pub target_branches: Option<Vec<String>>,
    pub target_classes: Option<Vec<String>>,
    pub published: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    #[serde(default)]
    pub position: i32,
    pub title_fr: String,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub body_fr: String,
    #[serde(default)]
    pub body_ar: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLessonRequest {
    pub position: Option<i32>,
    pub title_fr: Option<String>,
    pub title_ar: Option<String>,
    pub body_fr: Option<String>,
    pub body_ar: Option<String>,
}

// Quiz types

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    pub title_fr: String,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub target_levels: Vec<String>,
    #[serde(default)]
    pub target_branches: Vec<String>,
    #[serde(default)]
    pub target_classes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub position: i32,
    pub kind: String,
    pub prompt_fr: String,
    #[serde(default)]
    pub prompt_ar: String,
    pub template: Option<String>,
    #[serde(default)]
    pub choices_fr: Vec<String>,
    #[serde(default)]
    pub choices_ar: Vec<String>,
    pub correct_choice: Option<i32>,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuizRequest {
    pub title_fr: Option<String>,
    pub title_ar: Option<String>,
    pub target_levels: Option<Vec<String>>,
    pub target_branches: Option<Vec<String>>,
    pub target_classes: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuestionRequest {
    pub position: Option<i32>,
    pub prompt_fr: Option<String>,
    pub prompt_ar: Option<String>,
    pub template: Option<String>,
    pub choices_fr: Option<Vec<String>>,
    pub choices_ar: Option<Vec<String>>,
    pub correct_choice: Option<i32>,
    pub points: Option<i32>,
}

/// Student-facing rendering of a question. Expected answers and the correct
/// choice index are withheld.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub position: i32,
    pub kind: String,
    pub prompt: String,
    /// Masked sentence for fill-in-the-blank questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub choices: Vec<String>,
    pub points: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizView {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub question_id: Uuid,
    pub choice: Option<usize>,
    pub blanks: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<AnswerPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAttemptResponse {
    pub attempt_id: Uuid,
    pub grade: QuizGrade,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptView {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub earned: i32,
    pub possible: i32,
    pub percent: f64,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptListResponse {
    pub attempts: Vec<AttemptView>,
}

// Exercise types

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    pub title_fr: String,
    #[serde(default)]
    pub title_ar: String,
    pub statement_fr: String,
    #[serde(default)]
    pub statement_ar: String,
    #[serde(default)]
    pub solution_fr: String,
    #[serde(default)]
    pub solution_ar: String,
    #[serde(default)]
    pub target_levels: Vec<String>,
    #[serde(default)]
    pub target_branches: Vec<String>,
    #[serde(default)]
    pub target_classes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateExerciseRequest {
    pub title_fr: Option<String>,
    pub title_ar: Option<String>,
    pub statement_fr: Option<String>,
    pub statement_ar: Option<String>,
    pub solution_fr: Option<String>,
    pub solution_ar: Option<String>,
    pub target_levels: Option<Vec<String>>,
    pub target_branches: Option<Vec<String>>,
    pub target_classes: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseView {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub statement: String,
    /// Included only for staff or after a passed attempt in the course.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<ExerciseView>,
}

// Enrollment types

#[derive(Debug, Serialize, Deserialize)]
pub struct EnrollmentView {
    pub course: CourseSummary,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnrollmentListResponse {
    pub enrollments: Vec<EnrollmentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub course_id: Uuid,
    pub progress: CourseProgress,
    pub certificate_issued: bool,
}

// Certificate types

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueCertificateRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CertificateView {
    pub id: Uuid,
    pub serial: String,
    pub course_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CertificateListResponse {
    pub certificates: Vec<CertificateView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyCertificateResponse {
    pub valid: bool,
    pub serial: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

// Academic structure types

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertLevelRequest {
    pub name_fr: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertBranchRequest {
    pub name_fr: String,
    #[serde(default)]
    pub name_ar: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertClassRequest {
    pub level_code: String,
    pub branch_code: Option<String>,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertSubjectRequest {
    pub name_fr: String,
    #[serde(default)]
    pub name_ar: String,
}

// Resource types

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResourceRequest {
    pub file_name: String,
    pub content: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: Option<String>,
    pub content_hash: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub resources: Vec<ResourceView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceDownloadResponse {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: String,
}
