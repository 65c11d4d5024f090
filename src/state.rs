use std::sync::Arc;

use registrar_config::{CorsConfig, JwtConfig, PasswordConfig};
use registrar_db::PgPool;

use crate::modules::auth::repository::{PgUserRepository, UserRepository};
use crate::modules::faculties::repository::{FacultyRepository, PgFacultyRepository};
use crate::modules::lecturers::repository::{LecturerRepository, PgLecturerRepository};
use crate::modules::programs::repository::{PgProgramRepository, ProgramRepository};
use crate::modules::students::repository::{PgStudentRepository, StudentRepository};
use crate::modules::terms::repository::{PgTermRepository, TermRepository};

#[derive(Clone)]
pub struct AppState {
    pub faculties: Arc<dyn FacultyRepository>,
    pub programs: Arc<dyn ProgramRepository>,
    pub lecturers: Arc<dyn LecturerRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub terms: Arc<dyn TermRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub password_config: PasswordConfig,
}

impl AppState {
    /// Wires every repository to the same Postgres pool.
    pub fn from_pool(
        pool: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        password_config: PasswordConfig,
    ) -> Self {
        Self {
            faculties: Arc::new(PgFacultyRepository::new(pool.clone())),
            programs: Arc::new(PgProgramRepository::new(pool.clone())),
            lecturers: Arc::new(PgLecturerRepository::new(pool.clone())),
            students: Arc::new(PgStudentRepository::new(pool.clone())),
            terms: Arc::new(PgTermRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            jwt_config,
            cors_config,
            password_config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("password_config", &self.password_config)
            .finish_non_exhaustive()
    }
}

pub fn init_app_state(pool: PgPool) -> AppState {
    AppState::from_pool(
        pool,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        PasswordConfig::from_env(),
    )
}
