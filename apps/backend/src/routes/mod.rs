pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod enrollments;
pub mod exercises;
pub mod lessons;
pub mod quizzes;
pub mod resources;
pub mod users;
