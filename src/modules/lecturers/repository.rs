use async_trait::async_trait;
use registrar_core::{PageRequest, RepoResult};
use registrar_db::{PgPool, SqlxResultExt};
use sqlx::{Postgres, QueryBuilder};

use super::model::{Lecturer, LecturerFields, LecturerFilter, LecturerPatch};

/// Storage contract for lecturers.
#[async_trait]
pub trait LecturerRepository: Send + Sync {
    async fn list(&self, filter: &LecturerFilter, page: &PageRequest)
    -> RepoResult<Vec<Lecturer>>;

    async fn get(&self, id: &str) -> RepoResult<Option<Lecturer>>;

    async fn exists_id(&self, id: &str) -> RepoResult<bool>;

    async fn exists_nidn(&self, nidn: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    async fn create(&self, id: &str, fields: &LecturerFields) -> RepoResult<Lecturer>;

    async fn replace(&self, id: &str, fields: &LecturerFields) -> RepoResult<Option<Lecturer>>;

    async fn update(&self, id: &str, patch: &LecturerPatch) -> RepoResult<Option<Lecturer>>;

    /// Courses naming the lecturer as responsible lecturer.
    async fn has_courses(&self, id: &str) -> RepoResult<bool>;

    /// Classes taught by the lecturer.
    async fn has_classes(&self, id: &str) -> RepoResult<bool>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

const COLUMNS: &str =
    "id_dosen, nidn, nama_dosen, email, no_hp, jabatan_akademik, created_at, updated_at";

pub struct PgLecturerRepository {
    pool: PgPool,
}

impl PgLecturerRepository {
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

    async fn exists_excluding(
        &self,
        sql: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .repo()
    }
}

#[async_trait]
impl LecturerRepository for PgLecturerRepository {
    async fn list(
        &self,
        filter: &LecturerFilter,
        page: &PageRequest,
    ) -> RepoResult<Vec<Lecturer>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM dosen WHERE 1=1"));

        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            qb.push(" AND (nama_dosen ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR nidn ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(format!(" ORDER BY {} LIMIT ", page.order_by))
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        qb.build_query_as::<Lecturer>()
            .fetch_all(&self.pool)
            .await
            .repo()
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Lecturer>> {
        sqlx::query_as::<_, Lecturer>(&format!("SELECT {COLUMNS} FROM dosen WHERE id_dosen = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM dosen WHERE id_dosen = $1)", id)
            .await
    }

    async fn exists_nidn(&self, nidn: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.exists_excluding(
            "SELECT EXISTS(SELECT 1 FROM dosen
             WHERE nidn = $1 AND ($2::text IS NULL OR id_dosen <> $2))",
            nidn,
            exclude_id,
        )
        .await
    }

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.exists_excluding(
            "SELECT EXISTS(SELECT 1 FROM dosen
             WHERE email = $1 AND ($2::text IS NULL OR id_dosen <> $2))",
            email,
            exclude_id,
        )
        .await
    }

    async fn create(&self, id: &str, fields: &LecturerFields) -> RepoResult<Lecturer> {
        sqlx::query_as::<_, Lecturer>(&format!(
            "INSERT INTO dosen (id_dosen, nidn, nama_dosen, email, no_hp, jabatan_akademik)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.nidn)
        .bind(&fields.nama_dosen)
        .bind(&fields.email)
        .bind(&fields.no_hp)
        .bind(&fields.jabatan_akademik)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn replace(&self, id: &str, fields: &LecturerFields) -> RepoResult<Option<Lecturer>> {
        sqlx::query_as::<_, Lecturer>(&format!(
            "UPDATE dosen
             SET nidn = $2, nama_dosen = $3, email = $4, no_hp = $5, jabatan_akademik = $6,
                 updated_at = NOW()
             WHERE id_dosen = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.nidn)
        .bind(&fields.nama_dosen)
        .bind(&fields.email)
        .bind(&fields.no_hp)
        .bind(&fields.jabatan_akademik)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn update(&self, id: &str, patch: &LecturerPatch) -> RepoResult<Option<Lecturer>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE dosen SET updated_at = NOW()");
        let columns = [
            ("nidn", &patch.nidn),
            ("nama_dosen", &patch.nama_dosen),
            ("email", &patch.email),
            ("no_hp", &patch.no_hp),
            ("jabatan_akademik", &patch.jabatan_akademik),
        ];
        for (column, value) in columns {
            if let Some(value) = value {
                qb.push(format!(", {column} = ")).push_bind(value);
            }
        }
        qb.push(" WHERE id_dosen = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Lecturer>()
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn has_courses(&self, id: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM mata_kuliah WHERE id_dosen_pengampu = $1)",
            id,
        )
        .await
    }

    async fn has_classes(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM kelas_kuliah WHERE id_dosen = $1)", id)
            .await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM dosen WHERE id_dosen = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .repo()?;
        Ok(result.rows_affected() > 0)
    }
}
