//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new account with a generated bearer token
    pub async fn create_user(
        &self,
        full_name: &str,
        role: &str,
        locale: &str,
        level: Option<&str>,
        branch: Option<&str>,
        class_code: Option<&str>,
    ) -> Result<DbUser> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (token, full_name, role, locale, level, branch, class_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, token, full_name, role, locale, level, branch, class_code,
                      created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(full_name)
        .bind(role)
        .bind(locale)
        .bind(level)
        .bind(branch)
        .bind(class_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get account by bearer token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, token, full_name, role, locale, level, branch, class_code,
                   created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get account by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, token, full_name, role, locale, level, branch, class_code,
                   created_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update account last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrite the locale and enrollment attributes of an account
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        locale: &str,
        level: Option<&str>,
        branch: Option<&str>,
        class_code: Option<&str>,
    ) -> Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            UPDATE users
            SET locale = $2, level = $3, branch = $4, class_code = $5
            WHERE id = $1
            RETURNING id, token, full_name, role, locale, level, branch, class_code,
                      created_at, last_seen_at
            "#,
        )
        .bind(user_id)
        .bind(locale)
        .bind(level)
        .bind(branch)
        .bind(class_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    // === Academic Structure Repository ===

    /// Upsert a level keyed by its code
    pub async fn upsert_level(&self, code: &str, req: &UpsertLevelRequest) -> Result<DbLevel> {
        let level = sqlx::query_as::<_, DbLevel>(
            r#"
            INSERT INTO levels (code, name_fr, name_ar, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO UPDATE SET
                name_fr = EXCLUDED.name_fr,
                name_ar = EXCLUDED.name_ar,
                position = EXCLUDED.position
            RETURNING code, name_fr, name_ar, position
            "#,
        )
        .bind(code)
        .bind(&req.name_fr)
        .bind(&req.name_ar)
        .bind(req.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(level)
    }

    pub async fn list_levels(&self) -> Result<Vec<DbLevel>> {
        let levels = sqlx::query_as::<_, DbLevel>(
            r#"
            SELECT code, name_fr, name_ar, position
            FROM levels
            ORDER BY position, code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    pub async fn delete_level(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM levels WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn upsert_branch(&self, code: &str, req: &UpsertBranchRequest) -> Result<DbBranch> {
        let branch = sqlx::query_as::<_, DbBranch>(
            r#"
            INSERT INTO branches (code, name_fr, name_ar)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO UPDATE SET
                name_fr = EXCLUDED.name_fr,
                name_ar = EXCLUDED.name_ar
            RETURNING code, name_fr, name_ar
            "#,
        )
        .bind(code)
        .bind(&req.name_fr)
        .bind(&req.name_ar)
        .fetch_one(&self.pool)
        .await?;

        Ok(branch)
    }

    pub async fn list_branches(&self) -> Result<Vec<DbBranch>> {
        let branches = sqlx::query_as::<_, DbBranch>(
            r#"
            SELECT code, name_fr, name_ar
            FROM branches
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    pub async fn delete_branch(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM branches WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn upsert_class(&self, code: &str, req: &UpsertClassRequest) -> Result<DbSchoolClass> {
        let class = sqlx::query_as::<_, DbSchoolClass>(
            r#"
            INSERT INTO school_classes (code, level_code, branch_code, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO UPDATE SET
                level_code = EXCLUDED.level_code,
                branch_code = EXCLUDED.branch_code,
                name = EXCLUDED.name
            RETURNING code, level_code, branch_code, name
            "#,
        )
        .bind(code)
        .bind(&req.level_code)
        .bind(&req.branch_code)
        .bind(&req.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    pub async fn list_classes(&self) -> Result<Vec<DbSchoolClass>> {
        let classes = sqlx::query_as::<_, DbSchoolClass>(
            r#"
            SELECT code, level_code, branch_code, name
            FROM school_classes
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    pub async fn delete_class(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM school_classes WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn upsert_subject(&self, code: &str, req: &UpsertSubjectRequest) -> Result<DbSubject> {
        let subject = sqlx::query_as::<_, DbSubject>(
            r#"
            INSERT INTO subjects (code, name_fr, name_ar)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO UPDATE SET
                name_fr = EXCLUDED.name_fr,
                name_ar = EXCLUDED.name_ar
            RETURNING code, name_fr, name_ar
            "#,
        )
        .bind(code)
        .bind(&req.name_fr)
        .bind(&req.name_ar)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn get_subject(&self, code: &str) -> Result<Option<DbSubject>> {
        let subject = sqlx::query_as::<_, DbSubject>(
            r#"
            SELECT code, name_fr, name_ar
            FROM subjects
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn list_subjects(&self) -> Result<Vec<DbSubject>> {
        let subjects = sqlx::query_as::<_, DbSubject>(
            r#"
            SELECT code, name_fr, name_ar
            FROM subjects
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    pub async fn delete_subject(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Course Repository ===

    pub async fn insert_course(&self, course: &DbCourse) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, subject_code, teacher_id, title_fr, title_ar,
                                 summary_fr, summary_ar, target_levels, target_branches,
                                 target_classes, published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(course.id)
        .bind(&course.subject_code)
        .bind(course.teacher_id)
        .bind(&course.title_fr)
        .bind(&course.title_ar)
        .bind(&course.summary_fr)
        .bind(&course.summary_ar)
        .bind(&course.target_levels)
        .bind(&course.target_branches)
        .bind(&course.target_classes)
        .bind(course.published)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_course(&self, course: &DbCourse) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE courses
            SET subject_code = $2, title_fr = $3, title_ar = $4, summary_fr = $5,
                summary_ar = $6, target_levels = $7, target_branches = $8,
                target_classes = $9, published = $10, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(course.id)
        .bind(&course.subject_code)
        .bind(&course.title_fr)
        .bind(&course.title_ar)
        .bind(&course.summary_fr)
        .bind(&course.summary_ar)
        .bind(&course.target_levels)
        .bind(&course.target_branches)
        .bind(&course.target_classes)
        .bind(course.published)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_course(&self, course_id: Uuid) -> Result<Option<DbCourse>> {
        let course = sqlx::query_as::<_, DbCourse>(
            r#"
            SELECT id, subject_code, teacher_id, title_fr, title_ar, summary_fr, summary_ar,
                   target_levels, target_branches, target_classes, published,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// All published courses. Audience filtering happens in memory, after
    /// the fetch, never in the query.
    pub async fn list_published_courses(&self) -> Result<Vec<DbCourse>> {
        let courses = sqlx::query_as::<_, DbCourse>(
            r#"
            SELECT id, subject_code, teacher_id, title_fr, title_ar, summary_fr, summary_ar,
                   target_levels, target_branches, target_classes, published,
                   created_at, updated_at
            FROM courses
            WHERE published = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Every course, drafts included (staff catalog)
    pub async fn list_all_courses(&self) -> Result<Vec<DbCourse>> {
        let courses = sqlx::query_as::<_, DbCourse>(
            r#"
            SELECT id, subject_code, teacher_id, title_fr, title_ar, summary_fr, summary_ar,
                   target_levels, target_branches, target_classes, published,
                   created_at, updated_at
            FROM courses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn delete_course(&self, course_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Lesson Repository ===

    pub async fn insert_lesson(&self, lesson: &DbLesson) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lessons (id, course_id, position, title_fr, title_ar, body_fr, body_ar)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.course_id)
        .bind(lesson.position)
        .bind(&lesson.title_fr)
        .bind(&lesson.title_ar)
        .bind(&lesson.body_fr)
        .bind(&lesson.body_ar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_lesson(&self, lesson_id: Uuid) -> Result<Option<DbLesson>> {
        let lesson = sqlx::query_as::<_, DbLesson>(
            r#"
            SELECT id, course_id, position, title_fr, title_ar, body_fr, body_ar
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn list_lessons(&self, course_id: Uuid) -> Result<Vec<DbLesson>> {
        let lessons = sqlx::query_as::<_, DbLesson>(
            r#"
            SELECT id, course_id, position, title_fr, title_ar, body_fr, body_ar
            FROM lessons
            WHERE course_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    pub async fn update_lesson(&self, lesson: &DbLesson) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE lessons
            SET position = $2, title_fr = $3, title_ar = $4, body_fr = $5, body_ar = $6
            WHERE id = $1
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.position)
        .bind(&lesson.title_fr)
        .bind(&lesson.title_ar)
        .bind(&lesson.body_fr)
        .bind(&lesson.body_ar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_lesson(&self, lesson_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_lessons(&self, course_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // === Quiz Repository ===

    pub async fn insert_quiz(&self, quiz: &DbQuiz) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quizzes (id, course_id, title_fr, title_ar, target_levels,
                                 target_branches, target_classes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(quiz.id)
        .bind(quiz.course_id)
        .bind(&quiz.title_fr)
        .bind(&quiz.title_ar)
        .bind(&quiz.target_levels)
        .bind(&quiz.target_branches)
        .bind(&quiz.target_classes)
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<DbQuiz>> {
        let quiz = sqlx::query_as::<_, DbQuiz>(
            r#"
            SELECT id, course_id, title_fr, title_ar, target_levels, target_branches,
                   target_classes, created_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn list_quizzes(&self, course_id: Uuid) -> Result<Vec<DbQuiz>> {
        let quizzes = sqlx::query_as::<_, DbQuiz>(
            r#"
            SELECT id, course_id, title_fr, title_ar, target_levels, target_branches,
                   target_classes, created_at
            FROM quizzes
            WHERE course_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn update_quiz(&self, quiz: &DbQuiz) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE quizzes
            SET title_fr = $2, title_ar = $3, target_levels = $4,
                target_branches = $5, target_classes = $6
            WHERE id = $1
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.title_fr)
        .bind(&quiz.title_ar)
        .bind(&quiz.target_levels)
        .bind(&quiz.target_branches)
        .bind(&quiz.target_classes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_quizzes(&self, course_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // === Question Repository ===

    pub async fn insert_question(&self, question: &DbQuestion) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, quiz_id, position, kind, prompt_fr, prompt_ar,
                                   template, choices_fr, choices_ar, correct_choice, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(question.id)
        .bind(question.quiz_id)
        .bind(question.position)
        .bind(&question.kind)
        .bind(&question.prompt_fr)
        .bind(&question.prompt_ar)
        .bind(&question.template)
        .bind(&question.choices_fr)
        .bind(&question.choices_ar)
        .bind(question.correct_choice)
        .bind(question.points)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_question(&self, question_id: Uuid) -> Result<Option<DbQuestion>> {
        let question = sqlx::query_as::<_, DbQuestion>(
            r#"
            SELECT id, quiz_id, position, kind, prompt_fr, prompt_ar, template,
                   choices_fr, choices_ar, correct_choice, points
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn list_questions(&self, quiz_id: Uuid) -> Result<Vec<DbQuestion>> {
        let questions = sqlx::query_as::<_, DbQuestion>(
            r#"
            SELECT id, quiz_id, position, kind, prompt_fr, prompt_ar, template,
                   choices_fr, choices_ar, correct_choice, points
            FROM questions
            WHERE quiz_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn update_question(&self, question: &DbQuestion) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE questions
            SET position = $2, prompt_fr = $3, prompt_ar = $4, template = $5,
                choices_fr = $6, choices_ar = $7, correct_choice = $8, points = $9
            WHERE id = $1
            "#,
        )
        .bind(question.id)
        .bind(question.position)
        .bind(&question.prompt_fr)
        .bind(&question.prompt_ar)
        .bind(&question.template)
        .bind(&question.choices_fr)
        .bind(&question.choices_ar)
        .bind(question.correct_choice)
        .bind(question.points)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_question(&self, question_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_questions(&self, quiz_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // === Exercise Repository ===

    pub async fn insert_exercise(&self, exercise: &DbExercise) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exercises (id, course_id, title_fr, title_ar, statement_fr,
                                   statement_ar, solution_fr, solution_ar, target_levels,
                                   target_branches, target_classes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(exercise.id)
        .bind(exercise.course_id)
        .bind(&exercise.title_fr)
        .bind(&exercise.title_ar)
        .bind(&exercise.statement_fr)
        .bind(&exercise.statement_ar)
        .bind(&exercise.solution_fr)
        .bind(&exercise.solution_ar)
        .bind(&exercise.target_levels)
        .bind(&exercise.target_branches)
        .bind(&exercise.target_classes)
        .bind(exercise.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_exercise(&self, exercise_id: Uuid) -> Result<Option<DbExercise>> {
        let exercise = sqlx::query_as::<_, DbExercise>(
            r#"
            SELECT id, course_id, title_fr, title_ar, statement_fr, statement_ar,
                   solution_fr, solution_ar, target_levels, target_branches,
                   target_classes, created_at
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exercise)
    }

    pub async fn list_exercises(&self, course_id: Uuid) -> Result<Vec<DbExercise>> {
        let exercises = sqlx::query_as::<_, DbExercise>(
            r#"
            SELECT id, course_id, title_fr, title_ar, statement_fr, statement_ar,
                   solution_fr, solution_ar, target_levels, target_branches,
                   target_classes, created_at
            FROM exercises
            WHERE course_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn update_exercise(&self, exercise: &DbExercise) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exercises
            SET title_fr = $2, title_ar = $3, statement_fr = $4, statement_ar = $5,
                solution_fr = $6, solution_ar = $7, target_levels = $8,
                target_branches = $9, target_classes = $10
            WHERE id = $1
            "#,
        )
        .bind(exercise.id)
        .bind(&exercise.title_fr)
        .bind(&exercise.title_ar)
        .bind(&exercise.statement_fr)
        .bind(&exercise.statement_ar)
        .bind(&exercise.solution_fr)
        .bind(&exercise.solution_ar)
        .bind(&exercise.target_levels)
        .bind(&exercise.target_branches)
        .bind(&exercise.target_classes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_exercise(&self, exercise_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(exercise_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Enrollment Repository ===

    /// Enroll a student. Enrolling twice returns the existing row.
    pub async fn enroll(&self, student_id: Uuid, course_id: Uuid) -> Result<DbEnrollment> {
        let enrollment = sqlx::query_as::<_, DbEnrollment>(
            r#"
            INSERT INTO enrollments (student_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (student_id, course_id) DO UPDATE SET
                course_id = EXCLUDED.course_id
            RETURNING id, student_id, course_id, enrolled_at
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    pub async fn unenroll(&self, student_id: Uuid, course_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_enrolled(&self, student_id: Uuid, course_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_enrollments(&self, student_id: Uuid) -> Result<Vec<DbEnrollment>> {
        let enrollments = sqlx::query_as::<_, DbEnrollment>(
            r#"
            SELECT id, student_id, course_id, enrolled_at
            FROM enrollments
            WHERE student_id = $1
            ORDER BY enrolled_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    // === Lesson Completion Repository ===

    /// Mark a lesson read. Marking twice keeps the first timestamp.
    pub async fn mark_lesson_complete(&self, student_id: Uuid, lesson_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lesson_completions (student_id, lesson_id)
            VALUES ($1, $2)
            ON CONFLICT (student_id, lesson_id) DO NOTHING
            "#,
        )
        .bind(student_id)
        .bind(lesson_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count_completed_lessons(&self, student_id: Uuid, course_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM lesson_completions lc
            JOIN lessons l ON lc.lesson_id = l.id
            WHERE lc.student_id = $1 AND l.course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // === Quiz Attempt Repository ===

    pub async fn insert_attempt(&self, attempt: &DbQuizAttempt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quiz_attempts (id, quiz_id, student_id, earned, possible,
                                       percent, passed, detail, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(attempt.id)
        .bind(attempt.quiz_id)
        .bind(attempt.student_id)
        .bind(attempt.earned)
        .bind(attempt.possible)
        .bind(attempt.percent)
        .bind(attempt.passed)
        .bind(&attempt.detail)
        .bind(attempt.submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_attempts(&self, student_id: Uuid, quiz_id: Uuid) -> Result<Vec<DbQuizAttempt>> {
        let attempts = sqlx::query_as::<_, DbQuizAttempt>(
            r#"
            SELECT id, quiz_id, student_id, earned, possible, percent, passed,
                   detail, submitted_at
            FROM quiz_attempts
            WHERE student_id = $1 AND quiz_id = $2
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    /// Quizzes in the course with at least one passing attempt
    pub async fn count_passed_quizzes(&self, student_id: Uuid, course_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT qa.quiz_id)
            FROM quiz_attempts qa
            JOIN quizzes q ON qa.quiz_id = q.id
            WHERE qa.student_id = $1 AND q.course_id = $2 AND qa.passed
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // === Certificate Repository ===

    pub async fn insert_certificate(&self, certificate: &DbCertificate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO certificates (id, serial, student_id, course_id, issued_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(certificate.id)
        .bind(&certificate.serial)
        .bind(certificate.student_id)
        .bind(certificate.course_id)
        .bind(certificate.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_certificate_for(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<DbCertificate>> {
        let certificate = sqlx::query_as::<_, DbCertificate>(
            r#"
            SELECT id, serial, student_id, course_id, issued_at
            FROM certificates
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certificate)
    }

    pub async fn get_certificate_by_serial(&self, serial: &str) -> Result<Option<DbCertificate>> {
        let certificate = sqlx::query_as::<_, DbCertificate>(
            r#"
            SELECT id, serial, student_id, course_id, issued_at
            FROM certificates
            WHERE serial = $1
            "#,
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certificate)
    }

    pub async fn list_certificates(&self, student_id: Uuid) -> Result<Vec<DbCertificate>> {
        let certificates = sqlx::query_as::<_, DbCertificate>(
            r#"
            SELECT id, serial, student_id, course_id, issued_at
            FROM certificates
            WHERE student_id = $1
            ORDER BY issued_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(certificates)
    }

    // === Resource Repository ===

    /// Upsert an uploaded document. Re-uploading a file keeps the original
    /// row id and refreshes its key, hash and timestamp.
    pub async fn insert_resource(&self, resource: &DbResource) -> Result<DbResource> {
        let stored = sqlx::query_as::<_, DbResource>(
            r#"
            INSERT INTO resources (id, course_id, file_name, content_type, s3_key,
                                   content_hash, uploaded_by, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (course_id, file_name) DO UPDATE SET
                content_type = EXCLUDED.content_type,
                s3_key = EXCLUDED.s3_key,
                content_hash = EXCLUDED.content_hash,
                uploaded_by = EXCLUDED.uploaded_by,
                uploaded_at = NOW()
            RETURNING id, course_id, file_name, content_type, s3_key, content_hash,
                      uploaded_by, uploaded_at
            "#,
        )
        .bind(resource.id)
        .bind(resource.course_id)
        .bind(&resource.file_name)
        .bind(&resource.content_type)
        .bind(&resource.s3_key)
        .bind(&resource.content_hash)
        .bind(resource.uploaded_by)
        .bind(resource.uploaded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    pub async fn get_resource(&self, resource_id: Uuid) -> Result<Option<DbResource>> {
        let resource = sqlx::query_as::<_, DbResource>(
            r#"
            SELECT id, course_id, file_name, content_type, s3_key, content_hash,
                   uploaded_by, uploaded_at
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resource)
    }

    pub async fn list_resources(&self, course_id: Uuid) -> Result<Vec<DbResource>> {
        let resources = sqlx::query_as::<_, DbResource>(
            r#"
            SELECT id, course_id, file_name, content_type, s3_key, content_hash,
                   uploaded_by, uploaded_at
            FROM resources
            WHERE course_id = $1
            ORDER BY file_name
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(resources)
    }
}
