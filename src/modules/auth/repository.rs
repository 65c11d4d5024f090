use async_trait::async_trait;
use registrar_core::RepoResult;
use registrar_db::{PgPool, SqlxResultExt};

use super::model::{NewUser, User};

/// Storage contract for credentials, including the existence checks that
/// back `ref_id`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    async fn student_exists(&self, id_mahasiswa: &str) -> RepoResult<bool>;

    async fn lecturer_exists(&self, id_dosen: &str) -> RepoResult<bool>;

    async fn create(&self, user: &NewUser) -> RepoResult<User>;
}

const COLUMNS: &str = "id_user, username, password_hash, role, ref_id, created_at, updated_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, value: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .repo()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
            username,
        )
        .await
    }

    async fn student_exists(&self, id_mahasiswa: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa WHERE id_mahasiswa = $1)",
            id_mahasiswa,
        )
        .await
    }

    async fn lecturer_exists(&self, id_dosen: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM dosen WHERE id_dosen = $1)",
            id_dosen,
        )
        .await
    }

    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash, role, ref_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.ref_id)
        .fetch_one(&self.pool)
        .await
        .repo()
    }
}
