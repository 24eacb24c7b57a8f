pub mod create_admin;
pub mod seeder;
