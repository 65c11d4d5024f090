use async_trait::async_trait;
use registrar_core::{PageRequest, RepoResult};
use registrar_db::{PgPool, SqlxResultExt};
use sqlx::{Postgres, QueryBuilder};

use super::model::{Student, StudentFields, StudentFilter, StudentPatch};

/// Storage contract for students. `angkatan` is derived by the store.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn list(&self, filter: &StudentFilter, page: &PageRequest) -> RepoResult<Vec<Student>>;

    async fn get(&self, id: &str) -> RepoResult<Option<Student>>;

    async fn exists_id(&self, id: &str) -> RepoResult<bool>;

    async fn exists_program(&self, id_prodi: &str) -> RepoResult<bool>;

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    async fn exists_nik(&self, nik: &str, exclude_id: Option<&str>) -> RepoResult<bool>;

    async fn create(&self, id: &str, fields: &StudentFields) -> RepoResult<Student>;

    async fn replace(&self, id: &str, fields: &StudentFields) -> RepoResult<Option<Student>>;

    async fn update(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>>;

    /// Course registrations (KRS) of the student.
    async fn has_registrations(&self, id: &str) -> RepoResult<bool>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

const COLUMNS: &str = "id_mahasiswa, id_prodi, nik, nama_lengkap, jenis_kelamin, tempat_lahir, \
     tanggal_lahir, alamat, email, no_hp, tahun_masuk, status, angkatan, created_at, updated_at";

pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
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
impl StudentRepository for PgStudentRepository {
    async fn list(&self, filter: &StudentFilter, page: &PageRequest) -> RepoResult<Vec<Student>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM mahasiswa WHERE 1=1"));

        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            qb.push(" AND (nama_lengkap ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR id_mahasiswa ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(id_prodi) = &filter.id_prodi {
            qb.push(" AND id_prodi = ").push_bind(id_prodi);
        }
        if let Some(angkatan) = filter.angkatan {
            qb.push(" AND angkatan = ").push_bind(angkatan);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }

        qb.push(format!(" ORDER BY {} LIMIT ", page.order_by))
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        qb.build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await
            .repo()
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM mahasiswa WHERE id_mahasiswa = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa WHERE id_mahasiswa = $1)",
            id,
        )
        .await
    }

    async fn exists_program(&self, id_prodi: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM prodi WHERE id_prodi = $1)",
            id_prodi,
        )
        .await
    }

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.exists_excluding(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa
             WHERE email = $1 AND ($2::text IS NULL OR id_mahasiswa <> $2))",
            email,
            exclude_id,
        )
        .await
    }

    async fn exists_nik(&self, nik: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.exists_excluding(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa
             WHERE nik = $1 AND ($2::text IS NULL OR id_mahasiswa <> $2))",
            nik,
            exclude_id,
        )
        .await
    }

    async fn create(&self, id: &str, fields: &StudentFields) -> RepoResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO mahasiswa (id_mahasiswa, id_prodi, nik, nama_lengkap, jenis_kelamin,
                 tempat_lahir, tanggal_lahir, alamat, email, no_hp, tahun_masuk, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.id_prodi)
        .bind(&fields.nik)
        .bind(&fields.nama_lengkap)
        .bind(fields.jenis_kelamin)
        .bind(&fields.tempat_lahir)
        .bind(fields.tanggal_lahir)
        .bind(&fields.alamat)
        .bind(&fields.email)
        .bind(&fields.no_hp)
        .bind(fields.tahun_masuk)
        .bind(fields.status)
        .fetch_one(&self.pool)
        .await
        .repo()
    }

    async fn replace(&self, id: &str, fields: &StudentFields) -> RepoResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "UPDATE mahasiswa
             SET id_prodi = $2, nik = $3, nama_lengkap = $4, jenis_kelamin = $5,
                 tempat_lahir = $6, tanggal_lahir = $7, alamat = $8, email = $9, no_hp = $10,
                 tahun_masuk = $11, status = $12, updated_at = NOW()
             WHERE id_mahasiswa = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.id_prodi)
        .bind(&fields.nik)
        .bind(&fields.nama_lengkap)
        .bind(fields.jenis_kelamin)
        .bind(&fields.tempat_lahir)
        .bind(fields.tanggal_lahir)
        .bind(&fields.alamat)
        .bind(&fields.email)
        .bind(&fields.no_hp)
        .bind(fields.tahun_masuk)
        .bind(fields.status)
        .fetch_optional(&self.pool)
        .await
        .repo()
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE mahasiswa SET updated_at = NOW()");
        let text_columns = [
            ("id_prodi", &patch.id_prodi),
            ("nik", &patch.nik),
            ("nama_lengkap", &patch.nama_lengkap),
            ("tempat_lahir", &patch.tempat_lahir),
            ("alamat", &patch.alamat),
            ("email", &patch.email),
            ("no_hp", &patch.no_hp),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                qb.push(format!(", {column} = ")).push_bind(value);
            }
        }
        if let Some(sex) = patch.jenis_kelamin {
            qb.push(", jenis_kelamin = ").push_bind(sex);
        }
        if let Some(tanggal_lahir) = patch.tanggal_lahir {
            qb.push(", tanggal_lahir = ").push_bind(tanggal_lahir);
        }
        if let Some(tahun_masuk) = patch.tahun_masuk {
            qb.push(", tahun_masuk = ").push_bind(tahun_masuk);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status);
        }
        qb.push(" WHERE id_mahasiswa = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Student>()
            .fetch_optional(&self.pool)
            .await
            .repo()
    }

    async fn has_registrations(&self, id: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM krs WHERE id_mahasiswa = $1)",
            id,
        )
        .await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM mahasiswa WHERE id_mahasiswa = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .repo()?;
        Ok(result.rows_affected() > 0)
    }
}
