pub mod auth;
pub mod faculties;
pub mod lecturers;
pub mod programs;
pub mod students;
pub mod terms;
