use async_trait::async_trait;
use registrar_core::{PageRequest, RepoResult};
use registrar_db::{PgPool, SqlxResultExt};
use sqlx::{Postgres, QueryBuilder};

use super::model::{Faculty, FacultyFields, FacultyFilter, FacultyPatch};

/// Storage contract for faculties.
#[async_trait]
pub trait FacultyRepository: Send + Sync {
    async fn list(&self, filter: &FacultyFilter, page: &PageRequest) -> RepoResult<Vec<Faculty>>;

    async fn get(&self, id: &str) -> RepoResult<Option<Faculty>>;

    async fn exists_id(&self, id: &str) -> RepoResult<bool>;

    /// Case-insensitive name lookup, ignoring `exclude_id`.
    async fn exists_name(&self, name: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    async fn create(&self, id: &str, fields: &FacultyFields) -> RepoResult<Faculty>;

    /// `None` when no row has `id`.
    async fn replace(&self, id: &str, fields: &FacultyFields) -> RepoResult<Option<Faculty>>;

    /// Writes only the supplied columns. An empty patch returns the current row.
    async fn update(&self, id: &str, patch: &FacultyPatch) -> RepoResult<Option<Faculty>>;

    async fn has_programs(&self, id: &str) -> RepoResult<bool>;

    /// `false` when no row was deleted.
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

const COLUMNS: &str = "id_fakultas, nama_fakultas, singkatan, created_at, updated_at";

pub struct PgFacultyRepository {
    pool: PgPool,
}

impl PgFacultyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FacultyRepository for PgFacultyRepository {
    async fn list(&self, filter: &FacultyFilter, page: &PageRequest) -> RepoResult<Vec<Faculty>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM fakultas WHERE 1=1"));

        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            qb.push(" AND (nama_fakultas ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR singkatan ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(format!(" ORDER BY {} LIMIT ", page.order_by))
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        qb.build_query_as::<Faculty>()
            .fetch_all(&self.pool)
            .await
            .repo()
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Faculty>> {
        sqlx::query_as::<_, Faculty>(&format!(
            "SELECT {COLUMNS} FROM fakultas WHERE id_fakultas = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM fakultas WHERE id_fakultas = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .repo()
    }

    async fn exists_name(&self, name: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM fakultas
             WHERE LOWER(nama_fakultas) = LOWER($1) AND ($2::text IS NULL OR id_fakultas <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn create(&self, id: &str, fields: &FacultyFields) -> RepoResult<Faculty> {
        sqlx::query_as::<_, Faculty>(&format!(
            "INSERT INTO fakultas (id_fakultas, nama_fakultas, singkatan)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.nama_fakultas)
        .bind(&fields.singkatan)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn replace(&self, id: &str, fields: &FacultyFields) -> RepoResult<Option<Faculty>> {
        sqlx::query_as::<_, Faculty>(&format!(
            "UPDATE fakultas SET nama_fakultas = $2, singkatan = $3, updated_at = NOW()
             WHERE id_fakultas = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.nama_fakultas)
        .bind(&fields.singkatan)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn update(&self, id: &str, patch: &FacultyPatch) -> RepoResult<Option<Faculty>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE fakultas SET updated_at = NOW()");
        if let Some(nama) = &patch.nama_fakultas {
            qb.push(", nama_fakultas = ").push_bind(nama);
        }
        if let Some(singkatan) = &patch.singkatan {
            qb.push(", singkatan = ").push_bind(singkatan);
        }
        qb.push(" WHERE id_fakultas = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Faculty>()
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn has_programs(&self, id: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM prodi WHERE id_fakultas = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .repo()
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM fakultas WHERE id_fakultas = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .repo()?;
        Ok(result.rows_affected() > 0)
    }
}
