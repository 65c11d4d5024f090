use async_trait::async_trait;
use registrar_core::{PageRequest, RepoResult};
use registrar_db::{PgPool, SqlxResultExt};
use sqlx::{Postgres, QueryBuilder};

use super::model::{NewTerm, Term, TermFields, TermFilter, TermPatch};

/// Storage contract for academic terms.
#[async_trait]
pub trait TermRepository: Send + Sync {
    async fn list(&self, filter: &TermFilter, page: &PageRequest) -> RepoResult<Vec<Term>>;

    async fn get(&self, id: &str) -> RepoResult<Option<Term>>;

    async fn exists_id(&self, id: &str) -> RepoResult<bool>;

    async fn create(&self, term: &NewTerm) -> RepoResult<Term>;

    async fn replace(&self, id: &str, fields: &TermFields) -> RepoResult<Option<Term>>;

    async fn update(&self, id: &str, patch: &TermPatch) -> RepoResult<Option<Term>>;

    /// Classes scheduled in the term.
    async fn has_classes(&self, id: &str) -> RepoResult<bool>;

    /// Course registrations (KRS) filed for the term.
    async fn has_registrations(&self, id: &str) -> RepoResult<bool>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

const COLUMNS: &str =
    "id_semester, tahun_ajaran, term, tanggal_mulai, tanggal_selesai, created_at, updated_at";

pub struct PgTermRepository {
    pool: PgPool,
}

impl PgTermRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, id: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .repo()
    }
}

#[async_trait]
impl TermRepository for PgTermRepository {
    async fn list(&self, filter: &TermFilter, page: &PageRequest) -> RepoResult<Vec<Term>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM semester WHERE 1=1"));

        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            qb.push(" AND (id_semester ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR tahun_ajaran ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR term ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(tahun_ajaran) = &filter.tahun_ajaran {
            qb.push(" AND tahun_ajaran = ").push_bind(tahun_ajaran);
        }
        if let Some(term) = filter.term {
            qb.push(" AND term = ").push_bind(term);
        }

        qb.push(format!(" ORDER BY {} LIMIT ", page.order_by))
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        qb.build_query_as::<Term>()
            .fetch_all(&self.pool)
            .await
            .repo()
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Term>> {
        sqlx::query_as::<_, Term>(&format!(
            "SELECT {COLUMNS} FROM semester WHERE id_semester = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM semester WHERE id_semester = $1)",
            id,
        )
        .await
    }

    async fn create(&self, term: &NewTerm) -> RepoResult<Term> {
        sqlx::query_as::<_, Term>(&format!(
            "INSERT INTO semester (id_semester, tahun_ajaran, term, tanggal_mulai, tanggal_selesai)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&term.id_semester)
        .bind(&term.fields.tahun_ajaran)
        .bind(term.fields.term)
        .bind(term.fields.tanggal_mulai)
        .bind(term.fields.tanggal_selesai)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn replace(&self, id: &str, fields: &TermFields) -> RepoResult<Option<Term>> {
        sqlx::query_as::<_, Term>(&format!(
            "UPDATE semester
             SET tahun_ajaran = $2, term = $3, tanggal_mulai = $4, tanggal_selesai = $5,
                 updated_at = NOW()
             WHERE id_semester = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.tahun_ajaran)
        .bind(fields.term)
        .bind(fields.tanggal_mulai)
        .bind(fields.tanggal_selesai)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn update(&self, id: &str, patch: &TermPatch) -> RepoResult<Option<Term>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE semester SET updated_at = NOW()");
        if let Some(tahun_ajaran) = &patch.tahun_ajaran {
            qb.push(", tahun_ajaran = ").push_bind(tahun_ajaran);
        }
        if let Some(term) = patch.term {
            qb.push(", term = ").push_bind(term);
        }
        if let Some(tanggal_mulai) = patch.tanggal_mulai {
            qb.push(", tanggal_mulai = ").push_bind(tanggal_mulai);
        }
        if let Some(tanggal_selesai) = patch.tanggal_selesai {
            qb.push(", tanggal_selesai = ").push_bind(tanggal_selesai);
        }
        qb.push(" WHERE id_semester = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Term>()
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn has_classes(&self, id: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM kelas_kuliah WHERE id_semester = $1)",
            id,
        )
        .await
    }

    async fn has_registrations(&self, id: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM krs WHERE id_semester = $1)", id)
            .await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM semester WHERE id_semester = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .repo()?;
        Ok(result.rows_affected() > 0)
    }
}
