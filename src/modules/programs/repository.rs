use async_trait::async_trait;
use registrar_core::{PageRequest, RepoResult};
use registrar_db::{PgPool, SqlxResultExt};
use registrar_models::DegreeLevel;
use sqlx::{Postgres, QueryBuilder};

use super::model::{Program, ProgramFields, ProgramFilter, ProgramPatch};

/// Storage contract for study programs.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn list(&self, filter: &ProgramFilter, page: &PageRequest) -> RepoResult<Vec<Program>>;

    async fn get(&self, id: &str) -> RepoResult<Option<Program>>;

    async fn exists_id(&self, id: &str) -> RepoResult<bool>;

    async fn exists_faculty(&self, id_fakultas: &str) -> RepoResult<bool>;

    async fn exists_code(&self, kode_prodi: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    /// Whether another program of the same faculty and level carries `name`
    /// (case-insensitive).
    async fn exists_name_in_faculty_level(
        &self,
        id_fakultas: &str,
        jenjang: DegreeLevel,
        name: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool>;

    async fn create(&self, id: &str, fields: &ProgramFields) -> RepoResult<Program>;

    async fn replace(&self, id: &str, fields: &ProgramFields) -> RepoResult<Option<Program>>;

    async fn update(&self, id: &str, patch: &ProgramPatch) -> RepoResult<Option<Program>>;

    async fn has_students(&self, id: &str) -> RepoResult<bool>;

    async fn has_courses(&self, id: &str) -> RepoResult<bool>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

const COLUMNS: &str =
    "id_prodi, id_fakultas, nama_prodi, jenjang, kode_prodi, akreditasi, created_at, updated_at";

pub struct PgProgramRepository {
    pool: PgPool,
}

impl PgProgramRepository {
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
impl ProgramRepository for PgProgramRepository {
    async fn list(&self, filter: &ProgramFilter, page: &PageRequest) -> RepoResult<Vec<Program>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM prodi WHERE 1=1"));

        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            qb.push(" AND (nama_prodi ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR kode_prodi ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(id_fakultas) = &filter.id_fakultas {
            qb.push(" AND id_fakultas = ").push_bind(id_fakultas);
        }
        if let Some(jenjang) = filter.jenjang {
            qb.push(" AND jenjang = ").push_bind(jenjang);
        }
        if let Some(akreditasi) = filter.akreditasi {
            qb.push(" AND akreditasi = ").push_bind(akreditasi);
        }

        qb.push(format!(" ORDER BY {} LIMIT ", page.order_by))
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        qb.build_query_as::<Program>()
            .fetch_all(&self.pool)
            .await
            .repo()
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Program>> {
        sqlx::query_as::<_, Program>(&format!("SELECT {COLUMNS} FROM prodi WHERE id_prodi = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM prodi WHERE id_prodi = $1)", id)
            .await
    }

    async fn exists_faculty(&self, id_fakultas: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM fakultas WHERE id_fakultas = $1)",
            id_fakultas,
        )
        .await
    }

    async fn exists_code(&self, kode_prodi: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM prodi
             WHERE kode_prodi = $1 AND ($2::text IS NULL OR id_prodi <> $2))",
        )
        .bind(kode_prodi)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn exists_name_in_faculty_level(
        &self,
        id_fakultas: &str,
        jenjang: DegreeLevel,
        name: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM prodi
             WHERE id_fakultas = $1 AND jenjang = $2 AND LOWER(nama_prodi) = LOWER($3)
               AND ($4::text IS NULL OR id_prodi <> $4))",
        )
        .bind(id_fakultas)
        .bind(jenjang)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn create(&self, id: &str, fields: &ProgramFields) -> RepoResult<Program> {
        sqlx::query_as::<_, Program>(&format!(
            "INSERT INTO prodi (id_prodi, id_fakultas, nama_prodi, jenjang, kode_prodi, akreditasi)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.id_fakultas)
        .bind(&fields.nama_prodi)
        .bind(fields.jenjang)
        .bind(&fields.kode_prodi)
        .bind(fields.akreditasi)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn replace(&self, id: &str, fields: &ProgramFields) -> RepoResult<Option<Program>> {
        sqlx::query_as::<_, Program>(&format!(
            "UPDATE prodi
             SET id_fakultas = $2, nama_prodi = $3, jenjang = $4, kode_prodi = $5,
                 akreditasi = $6, updated_at = NOW()
             WHERE id_prodi = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.id_fakultas)
        .bind(&fields.nama_prodi)
        .bind(fields.jenjang)
        .bind(&fields.kode_prodi)
        .bind(fields.akreditasi)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn update(&self, id: &str, patch: &ProgramPatch) -> RepoResult<Option<Program>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE prodi SET updated_at = NOW()");
        if let Some(id_fakultas) = &patch.id_fakultas {
            qb.push(", id_fakultas = ").push_bind(id_fakultas);
        }
        if let Some(nama) = &patch.nama_prodi {
            qb.push(", nama_prodi = ").push_bind(nama);
        }
        if let Some(jenjang) = patch.jenjang {
            qb.push(", jenjang = ").push_bind(jenjang);
        }
        if let Some(kode) = &patch.kode_prodi {
            qb.push(", kode_prodi = ").push_bind(kode);
        }
        if let Some(akreditasi) = patch.akreditasi {
            qb.push(", akreditasi = ").push_bind(akreditasi);
        }
        qb.push(" WHERE id_prodi = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Program>()
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn has_students(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM mahasiswa WHERE id_prodi = $1)", id)
            .await
    }

    async fn has_courses(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM mata_kuliah WHERE id_prodi = $1)", id)
            .await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM prodi WHERE id_prodi = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .repo()?;
        Ok(result.rows_affected() > 0)
    }
}
