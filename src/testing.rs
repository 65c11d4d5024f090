//! In-memory repositories for tests.
//!
//! [`InMemoryStore`] implements every repository trait over shared maps and
//! enforces the same unique and foreign key rules as the Postgres schema, so
//! services see the same storage errors they would in production. Dependent
//! rows (courses, classes, course registrations) are plain reference sets
//! seeded through the `add_*` helpers.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use registrar_config::{CorsConfig, JwtConfig, PasswordConfig};
use registrar_core::{PageRequest, RepoResult, RepositoryError, SortDirection};
use registrar_models::DegreeLevel;

use crate::modules::auth::model::{NewUser, User};
use crate::modules::auth::repository::UserRepository;
use crate::modules::faculties::model::{Faculty, FacultyFields, FacultyFilter, FacultyPatch};
use crate::modules::faculties::repository::FacultyRepository;
use crate::modules::lecturers::model::{Lecturer, LecturerFields, LecturerFilter, LecturerPatch};
use crate::modules::lecturers::repository::LecturerRepository;
use crate::modules::programs::model::{Program, ProgramFields, ProgramFilter, ProgramPatch};
use crate::modules::programs::repository::ProgramRepository;
use crate::modules::students::model::{Student, StudentFields, StudentFilter, StudentPatch};
use crate::modules::students::repository::StudentRepository;
use crate::modules::terms::model::{NewTerm, Term, TermFields, TermFilter, TermPatch};
use crate::modules::terms::repository::TermRepository;
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

#[derive(Default)]
struct Tables {
    faculties: BTreeMap<String, Faculty>,
    programs: BTreeMap<String, Program>,
    lecturers: BTreeMap<String, Lecturer>,
    students: BTreeMap<String, Student>,
    terms: BTreeMap<String, Term>,
    users: BTreeMap<String, User>,
    next_user_id: i64,
    course_programs: HashSet<String>,
    course_lecturers: HashSet<String>,
    class_lecturers: HashSet<String>,
    class_terms: HashSet<String>,
    registration_students: HashSet<String>,
    registration_terms: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    writes: Arc<AtomicUsize>,
    fail_storage: Arc<AtomicBool>,
    fail_next_write_unique: Arc<AtomicBool>,
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn contains_opt(haystack: &Option<String>, needle: &str) -> bool {
    haystack.as_deref().is_some_and(|h| contains(h, needle))
}

fn stamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// Sorts by the string key of the requested column, then applies the window.
fn paginate<T, F>(mut rows: Vec<T>, page: &PageRequest, key: F) -> Vec<T>
where
    F: Fn(&T, &str) -> String,
{
    let column = page.order_by.column;
    rows.sort_by_key(|row| key(row, column));
    if page.order_by.direction == SortDirection::Desc {
        rows.reverse();
    }
    rows.into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

fn unique(constraint: &str) -> RepositoryError {
    RepositoryError::UniqueViolation(constraint.to_string())
}

fn foreign_key(constraint: &str) -> RepositoryError {
    RepositoryError::ForeignKeyViolation(constraint.to_string())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_storage(&self) -> RepoResult<()> {
        if self.fail_storage.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(())
    }

    /// Every mutating call goes through here.
    fn begin_write(&self) -> RepoResult<()> {
        self.check_storage()?;
        if self.fail_next_write_unique.swap(false, Ordering::SeqCst) {
            return Err(unique("simulated_concurrent_insert"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Number of write calls that reached storage.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every call fail with an opaque storage error.
    pub fn set_storage_failure(&self, fail: bool) {
        self.fail_storage.store(fail, Ordering::SeqCst);
    }

    /// The next write fails with a unique violation, as if a concurrent
    /// request inserted the same key after the service checks ran.
    pub fn fail_next_write_with_unique_violation(&self) {
        self.fail_next_write_unique.store(true, Ordering::SeqCst);
    }

    pub fn add_course(&self, id_prodi: &str, id_dosen_pengampu: Option<&str>) {
        let mut tables = self.lock();
        tables.course_programs.insert(id_prodi.to_string());
        if let Some(id_dosen) = id_dosen_pengampu {
            tables.course_lecturers.insert(id_dosen.to_string());
        }
    }

    pub fn add_class(&self, id_dosen: &str, id_semester: &str) {
        let mut tables = self.lock();
        tables.class_lecturers.insert(id_dosen.to_string());
        tables.class_terms.insert(id_semester.to_string());
    }

    pub fn add_registration(&self, id_mahasiswa: &str, id_semester: &str) {
        let mut tables = self.lock();
        tables.registration_students.insert(id_mahasiswa.to_string());
        tables.registration_terms.insert(id_semester.to_string());
    }

    /// Drops every course, class and course registration.
    pub fn clear_dependents(&self) {
        let mut tables = self.lock();
        tables.course_programs.clear();
        tables.course_lecturers.clear();
        tables.class_lecturers.clear();
        tables.class_terms.clear();
        tables.registration_students.clear();
        tables.registration_terms.clear();
    }

    pub fn jwt_config() -> JwtConfig {
        JwtConfig::new(TEST_JWT_SECRET)
    }

    /// Application state with every repository backed by this store and
    /// the cheapest bcrypt cost.
    pub fn state(&self) -> AppState {
        AppState {
            faculties: Arc::new(self.clone()),
            programs: Arc::new(self.clone()),
            lecturers: Arc::new(self.clone()),
            students: Arc::new(self.clone()),
            terms: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            jwt_config: Self::jwt_config(),
            cors_config: CorsConfig::from_list("http://localhost:3000"),
            password_config: PasswordConfig { bcrypt_cost: 4 },
        }
    }
}

impl Tables {
    fn faculty_name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        self.faculties.values().any(|f| {
            f.nama_fakultas.to_lowercase() == name.to_lowercase()
                && Some(f.id_fakultas.as_str()) != exclude_id
        })
    }

    fn program_code_taken(&self, code: &str, exclude_id: Option<&str>) -> bool {
        self.programs
            .values()
            .any(|p| p.kode_prodi == code && Some(p.id_prodi.as_str()) != exclude_id)
    }

    fn program_triple_taken(
        &self,
        id_fakultas: &str,
        jenjang: DegreeLevel,
        name: &str,
        exclude_id: Option<&str>,
    ) -> bool {
        self.programs.values().any(|p| {
            p.id_fakultas == id_fakultas
                && p.jenjang == jenjang
                && p.nama_prodi.to_lowercase() == name.to_lowercase()
                && Some(p.id_prodi.as_str()) != exclude_id
        })
    }

    fn check_program(&self, program: &Program) -> RepoResult<()> {
        let id = Some(program.id_prodi.as_str());
        if self.program_code_taken(&program.kode_prodi, id) {
            return Err(unique("prodi_kode_prodi_key"));
        }
        if self.program_triple_taken(&program.id_fakultas, program.jenjang, &program.nama_prodi, id)
        {
            return Err(unique("prodi_fakultas_jenjang_nama_key"));
        }
        if !self.faculties.contains_key(&program.id_fakultas) {
            return Err(foreign_key("prodi_id_fakultas_fkey"));
        }
        Ok(())
    }

    fn check_lecturer(&self, lecturer: &Lecturer) -> RepoResult<()> {
        for other in self.lecturers.values() {
            if other.id_dosen == lecturer.id_dosen {
                continue;
            }
            if lecturer.nidn.is_some() && other.nidn == lecturer.nidn {
                return Err(unique("dosen_nidn_key"));
            }
            if lecturer.email.is_some() && other.email == lecturer.email {
                return Err(unique("dosen_email_key"));
            }
        }
        Ok(())
    }

    fn check_student(&self, student: &Student) -> RepoResult<()> {
        for other in self.students.values() {
            if other.id_mahasiswa == student.id_mahasiswa {
                continue;
            }
            if student.nik.is_some() && other.nik == student.nik {
                return Err(unique("mahasiswa_nik_key"));
            }
            if student.email.is_some() && other.email == student.email {
                return Err(unique("mahasiswa_email_key"));
            }
        }
        if !self.programs.contains_key(&student.id_prodi) {
            return Err(foreign_key("mahasiswa_id_prodi_fkey"));
        }
        Ok(())
    }
}

#[async_trait]
impl FacultyRepository for InMemoryStore {
    async fn list(&self, filter: &FacultyFilter, page: &PageRequest) -> RepoResult<Vec<Faculty>> {
        self.check_storage()?;
        let rows = self
            .lock()
            .faculties
            .values()
            .filter(|f| {
                filter.q.as_deref().is_none_or(|q| {
                    contains(&f.nama_fakultas, q) || contains_opt(&f.singkatan, q)
                })
            })
            .cloned()
            .collect();
        Ok(paginate(rows, page, |f: &Faculty, column| match column {
            "created_at" => stamp(f.created_at),
            "updated_at" => stamp(f.updated_at),
            _ => f.nama_fakultas.clone(),
        }))
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Faculty>> {
        self.check_storage()?;
        Ok(self.lock().faculties.get(id).cloned())
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().faculties.contains_key(id))
    }

    async fn exists_name(&self, name: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().faculty_name_taken(name, exclude_id))
    }

    async fn create(&self, id: &str, fields: &FacultyFields) -> RepoResult<Faculty> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.faculties.contains_key(id) {
            return Err(unique("fakultas_pkey"));
        }
        if tables.faculty_name_taken(&fields.nama_fakultas, None) {
            return Err(unique("fakultas_nama_lower_key"));
        }
        let now = Utc::now();
        let faculty = Faculty {
            id_fakultas: id.to_string(),
            nama_fakultas: fields.nama_fakultas.clone(),
            singkatan: fields.singkatan.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.faculties.insert(id.to_string(), faculty.clone());
        Ok(faculty)
    }

    async fn replace(&self, id: &str, fields: &FacultyFields) -> RepoResult<Option<Faculty>> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.faculty_name_taken(&fields.nama_fakultas, Some(id)) {
            return Err(unique("fakultas_nama_lower_key"));
        }
        let Some(faculty) = tables.faculties.get_mut(id) else {
            return Ok(None);
        };
        faculty.nama_fakultas = fields.nama_fakultas.clone();
        faculty.singkatan = fields.singkatan.clone();
        faculty.updated_at = Utc::now();
        Ok(Some(faculty.clone()))
    }

    async fn update(&self, id: &str, patch: &FacultyPatch) -> RepoResult<Option<Faculty>> {
        self.begin_write()?;
        let mut tables = self.lock();
        if let Some(name) = &patch.nama_fakultas
            && tables.faculty_name_taken(name, Some(id))
        {
            return Err(unique("fakultas_nama_lower_key"));
        }
        let Some(faculty) = tables.faculties.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.nama_fakultas {
            faculty.nama_fakultas = name.clone();
        }
        if let Some(singkatan) = &patch.singkatan {
            faculty.singkatan = Some(singkatan.clone());
        }
        faculty.updated_at = Utc::now();
        Ok(Some(faculty.clone()))
    }

    async fn has_programs(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().programs.values().any(|p| p.id_fakultas == id))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.programs.values().any(|p| p.id_fakultas == id) {
            return Err(foreign_key("prodi_id_fakultas_fkey"));
        }
        Ok(tables.faculties.remove(id).is_some())
    }
}

#[async_trait]
impl ProgramRepository for InMemoryStore {
    async fn list(&self, filter: &ProgramFilter, page: &PageRequest) -> RepoResult<Vec<Program>> {
        self.check_storage()?;
        let rows = self
            .lock()
            .programs
            .values()
            .filter(|p| {
                filter.q.as_deref().is_none_or(|q| {
                    contains(&p.nama_prodi, q) || contains(&p.kode_prodi, q)
                })
            })
            .filter(|p| filter.id_fakultas.as_ref().is_none_or(|id| &p.id_fakultas == id))
            .filter(|p| filter.jenjang.is_none_or(|j| p.jenjang == j))
            .filter(|p| filter.akreditasi.is_none_or(|a| p.akreditasi == Some(a)))
            .cloned()
            .collect();
        Ok(paginate(rows, page, |p: &Program, column| match column {
            "kode_prodi" => p.kode_prodi.clone(),
            "jenjang" => p.jenjang.to_string(),
            "akreditasi" => p.akreditasi.map(|a| a.to_string()).unwrap_or_default(),
            "created_at" => stamp(p.created_at),
            "updated_at" => stamp(p.updated_at),
            _ => p.nama_prodi.clone(),
        }))
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Program>> {
        self.check_storage()?;
        Ok(self.lock().programs.get(id).cloned())
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().programs.contains_key(id))
    }

    async fn exists_faculty(&self, id_fakultas: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().faculties.contains_key(id_fakultas))
    }

    async fn exists_code(&self, kode_prodi: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().program_code_taken(kode_prodi, exclude_id))
    }

    async fn exists_name_in_faculty_level(
        &self,
        id_fakultas: &str,
        jenjang: DegreeLevel,
        name: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self
            .lock()
            .program_triple_taken(id_fakultas, jenjang, name, exclude_id))
    }

    async fn create(&self, id: &str, fields: &ProgramFields) -> RepoResult<Program> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.programs.contains_key(id) {
            return Err(unique("prodi_pkey"));
        }
        let now = Utc::now();
        let program = Program {
            id_prodi: id.to_string(),
            id_fakultas: fields.id_fakultas.clone(),
            nama_prodi: fields.nama_prodi.clone(),
            jenjang: fields.jenjang,
            kode_prodi: fields.kode_prodi.clone(),
            akreditasi: fields.akreditasi,
            created_at: now,
            updated_at: now,
        };
        tables.check_program(&program)?;
        tables.programs.insert(id.to_string(), program.clone());
        Ok(program)
    }

    async fn replace(&self, id: &str, fields: &ProgramFields) -> RepoResult<Option<Program>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.programs.get(id) else {
            return Ok(None);
        };
        let program = Program {
            id_fakultas: fields.id_fakultas.clone(),
            nama_prodi: fields.nama_prodi.clone(),
            jenjang: fields.jenjang,
            kode_prodi: fields.kode_prodi.clone(),
            akreditasi: fields.akreditasi,
            updated_at: Utc::now(),
            ..current.clone()
        };
        tables.check_program(&program)?;
        tables.programs.insert(id.to_string(), program.clone());
        Ok(Some(program))
    }

    async fn update(&self, id: &str, patch: &ProgramPatch) -> RepoResult<Option<Program>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.programs.get(id) else {
            return Ok(None);
        };
        let mut program = current.clone();
        if let Some(v) = &patch.id_fakultas {
            program.id_fakultas = v.clone();
        }
        if let Some(v) = &patch.nama_prodi {
            program.nama_prodi = v.clone();
        }
        if let Some(v) = patch.jenjang {
            program.jenjang = v;
        }
        if let Some(v) = &patch.kode_prodi {
            program.kode_prodi = v.clone();
        }
        if let Some(v) = patch.akreditasi {
            program.akreditasi = Some(v);
        }
        program.updated_at = Utc::now();
        tables.check_program(&program)?;
        tables.programs.insert(id.to_string(), program.clone());
        Ok(Some(program))
    }

    async fn has_students(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().students.values().any(|s| s.id_prodi == id))
    }

    async fn has_courses(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().course_programs.contains(id))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.students.values().any(|s| s.id_prodi == id) || tables.course_programs.contains(id)
        {
            return Err(foreign_key("mahasiswa_id_prodi_fkey"));
        }
        Ok(tables.programs.remove(id).is_some())
    }
}

#[async_trait]
impl LecturerRepository for InMemoryStore {
    async fn list(&self, filter: &LecturerFilter, page: &PageRequest) -> RepoResult<Vec<Lecturer>> {
        self.check_storage()?;
        let rows = self
            .lock()
            .lecturers
            .values()
            .filter(|l| {
                filter.q.as_deref().is_none_or(|q| {
                    contains(&l.nama_dosen, q) || contains_opt(&l.nidn, q) || contains_opt(&l.email, q)
                })
            })
            .cloned()
            .collect();
        Ok(paginate(rows, page, |l: &Lecturer, column| match column {
            "nidn" => l.nidn.clone().unwrap_or_default(),
            "email" => l.email.clone().unwrap_or_default(),
            "created_at" => stamp(l.created_at),
            "updated_at" => stamp(l.updated_at),
            _ => l.nama_dosen.clone(),
        }))
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Lecturer>> {
        self.check_storage()?;
        Ok(self.lock().lecturers.get(id).cloned())
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().lecturers.contains_key(id))
    }

    async fn exists_nidn(&self, nidn: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().lecturers.values().any(|l| {
            l.nidn.as_deref() == Some(nidn) && Some(l.id_dosen.as_str()) != exclude_id
        }))
    }

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().lecturers.values().any(|l| {
            l.email.as_deref() == Some(email) && Some(l.id_dosen.as_str()) != exclude_id
        }))
    }

    async fn create(&self, id: &str, fields: &LecturerFields) -> RepoResult<Lecturer> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.lecturers.contains_key(id) {
            return Err(unique("dosen_pkey"));
        }
        let now = Utc::now();
        let lecturer = Lecturer {
            id_dosen: id.to_string(),
            nidn: fields.nidn.clone(),
            nama_dosen: fields.nama_dosen.clone(),
            email: fields.email.clone(),
            no_hp: fields.no_hp.clone(),
            jabatan_akademik: fields.jabatan_akademik.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.check_lecturer(&lecturer)?;
        tables.lecturers.insert(id.to_string(), lecturer.clone());
        Ok(lecturer)
    }

    async fn replace(&self, id: &str, fields: &LecturerFields) -> RepoResult<Option<Lecturer>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.lecturers.get(id) else {
            return Ok(None);
        };
        let lecturer = Lecturer {
            nidn: fields.nidn.clone(),
            nama_dosen: fields.nama_dosen.clone(),
            email: fields.email.clone(),
            no_hp: fields.no_hp.clone(),
            jabatan_akademik: fields.jabatan_akademik.clone(),
            updated_at: Utc::now(),
            ..current.clone()
        };
        tables.check_lecturer(&lecturer)?;
        tables.lecturers.insert(id.to_string(), lecturer.clone());
        Ok(Some(lecturer))
    }

    async fn update(&self, id: &str, patch: &LecturerPatch) -> RepoResult<Option<Lecturer>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.lecturers.get(id) else {
            return Ok(None);
        };
        let mut lecturer = current.clone();
        if let Some(v) = &patch.nidn {
            lecturer.nidn = Some(v.clone());
        }
        if let Some(v) = &patch.nama_dosen {
            lecturer.nama_dosen = v.clone();
        }
        if let Some(v) = &patch.email {
            lecturer.email = Some(v.clone());
        }
        if let Some(v) = &patch.no_hp {
            lecturer.no_hp = Some(v.clone());
        }
        if let Some(v) = &patch.jabatan_akademik {
            lecturer.jabatan_akademik = Some(v.clone());
        }
        lecturer.updated_at = Utc::now();
        tables.check_lecturer(&lecturer)?;
        tables.lecturers.insert(id.to_string(), lecturer.clone());
        Ok(Some(lecturer))
    }

    async fn has_courses(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().course_lecturers.contains(id))
    }

    async fn has_classes(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().class_lecturers.contains(id))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.course_lecturers.contains(id) || tables.class_lecturers.contains(id) {
            return Err(foreign_key("kelas_kuliah_id_dosen_fkey"));
        }
        Ok(tables.lecturers.remove(id).is_some())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn list(&self, filter: &StudentFilter, page: &PageRequest) -> RepoResult<Vec<Student>> {
        self.check_storage()?;
        let rows = self
            .lock()
            .students
            .values()
            .filter(|s| {
                filter.q.as_deref().is_none_or(|q| {
                    contains(&s.nama_lengkap, q)
                        || contains_opt(&s.email, q)
                        || contains(&s.id_mahasiswa, q)
                })
            })
            .filter(|s| filter.id_prodi.as_ref().is_none_or(|id| &s.id_prodi == id))
            .filter(|s| filter.angkatan.is_none_or(|a| s.angkatan == a))
            .filter(|s| filter.status.is_none_or(|st| s.status == st))
            .cloned()
            .collect();
        Ok(paginate(rows, page, |s: &Student, column| match column {
            "tahun_masuk" => format!("{:06}", s.tahun_masuk),
            "created_at" => stamp(s.created_at),
            "updated_at" => stamp(s.updated_at),
            _ => s.nama_lengkap.clone(),
        }))
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Student>> {
        self.check_storage()?;
        Ok(self.lock().students.get(id).cloned())
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().students.contains_key(id))
    }

    async fn exists_program(&self, id_prodi: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().programs.contains_key(id_prodi))
    }

    async fn exists_email(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().students.values().any(|s| {
            s.email.as_deref() == Some(email) && Some(s.id_mahasiswa.as_str()) != exclude_id
        }))
    }

    async fn exists_nik(&self, nik: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().students.values().any(|s| {
            s.nik.as_deref() == Some(nik) && Some(s.id_mahasiswa.as_str()) != exclude_id
        }))
    }

    async fn create(&self, id: &str, fields: &StudentFields) -> RepoResult<Student> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.students.contains_key(id) {
            return Err(unique("mahasiswa_pkey"));
        }
        let now = Utc::now();
        let student = Student {
            id_mahasiswa: id.to_string(),
            id_prodi: fields.id_prodi.clone(),
            nik: fields.nik.clone(),
            nama_lengkap: fields.nama_lengkap.clone(),
            jenis_kelamin: fields.jenis_kelamin,
            tempat_lahir: fields.tempat_lahir.clone(),
            tanggal_lahir: fields.tanggal_lahir,
            alamat: fields.alamat.clone(),
            email: fields.email.clone(),
            no_hp: fields.no_hp.clone(),
            tahun_masuk: fields.tahun_masuk,
            status: fields.status,
            angkatan: fields.tahun_masuk,
            created_at: now,
            updated_at: now,
        };
        tables.check_student(&student)?;
        tables.students.insert(id.to_string(), student.clone());
        Ok(student)
    }

    async fn replace(&self, id: &str, fields: &StudentFields) -> RepoResult<Option<Student>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.students.get(id) else {
            return Ok(None);
        };
        let student = Student {
            id_prodi: fields.id_prodi.clone(),
            nik: fields.nik.clone(),
            nama_lengkap: fields.nama_lengkap.clone(),
            jenis_kelamin: fields.jenis_kelamin,
            tempat_lahir: fields.tempat_lahir.clone(),
            tanggal_lahir: fields.tanggal_lahir,
            alamat: fields.alamat.clone(),
            email: fields.email.clone(),
            no_hp: fields.no_hp.clone(),
            tahun_masuk: fields.tahun_masuk,
            status: fields.status,
            angkatan: fields.tahun_masuk,
            updated_at: Utc::now(),
            ..current.clone()
        };
        tables.check_student(&student)?;
        tables.students.insert(id.to_string(), student.clone());
        Ok(Some(student))
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(current) = tables.students.get(id) else {
            return Ok(None);
        };
        let mut student = current.clone();
        if let Some(v) = &patch.id_prodi {
            student.id_prodi = v.clone();
        }
        if let Some(v) = &patch.nik {
            student.nik = Some(v.clone());
        }
        if let Some(v) = &patch.nama_lengkap {
            student.nama_lengkap = v.clone();
        }
        if let Some(v) = patch.jenis_kelamin {
            student.jenis_kelamin = v;
        }
        if let Some(v) = &patch.tempat_lahir {
            student.tempat_lahir = Some(v.clone());
        }
        if let Some(v) = patch.tanggal_lahir {
            student.tanggal_lahir = Some(v);
        }
        if let Some(v) = &patch.alamat {
            student.alamat = Some(v.clone());
        }
        if let Some(v) = &patch.email {
            student.email = Some(v.clone());
        }
        if let Some(v) = &patch.no_hp {
            student.no_hp = Some(v.clone());
        }
        if let Some(v) = patch.tahun_masuk {
            student.tahun_masuk = v;
            student.angkatan = v;
        }
        if let Some(v) = patch.status {
            student.status = v;
        }
        student.updated_at = Utc::now();
        tables.check_student(&student)?;
        tables.students.insert(id.to_string(), student.clone());
        Ok(Some(student))
    }

    async fn has_registrations(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().registration_students.contains(id))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.registration_students.contains(id) {
            return Err(foreign_key("krs_id_mahasiswa_fkey"));
        }
        Ok(tables.students.remove(id).is_some())
    }
}

#[async_trait]
impl TermRepository for InMemoryStore {
    async fn list(&self, filter: &TermFilter, page: &PageRequest) -> RepoResult<Vec<Term>> {
        self.check_storage()?;
        let rows = self
            .lock()
            .terms
            .values()
            .filter(|t| {
                filter.q.as_deref().is_none_or(|q| {
                    contains(&t.id_semester, q)
                        || contains(&t.tahun_ajaran, q)
                        || contains(t.term.as_str(), q)
                })
            })
            .filter(|t| filter.tahun_ajaran.as_ref().is_none_or(|y| &t.tahun_ajaran == y))
            .filter(|t| filter.term.is_none_or(|term| t.term == term))
            .cloned()
            .collect();
        Ok(paginate(rows, page, |t: &Term, column| match column {
            "tahun_ajaran" => t.tahun_ajaran.clone(),
            "term" => t.term.to_string(),
            "tanggal_mulai" => t.tanggal_mulai.map(|d| d.to_string()).unwrap_or_default(),
            "tanggal_selesai" => t.tanggal_selesai.map(|d| d.to_string()).unwrap_or_default(),
            "created_at" => stamp(t.created_at),
            "updated_at" => stamp(t.updated_at),
            _ => t.id_semester.clone(),
        }))
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Term>> {
        self.check_storage()?;
        Ok(self.lock().terms.get(id).cloned())
    }

    async fn exists_id(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().terms.contains_key(id))
    }

    async fn create(&self, term: &NewTerm) -> RepoResult<Term> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.terms.contains_key(&term.id_semester) {
            return Err(unique("semester_pkey"));
        }
        let now = Utc::now();
        let row = Term {
            id_semester: term.id_semester.clone(),
            tahun_ajaran: term.fields.tahun_ajaran.clone(),
            term: term.fields.term,
            tanggal_mulai: term.fields.tanggal_mulai,
            tanggal_selesai: term.fields.tanggal_selesai,
            created_at: now,
            updated_at: now,
        };
        tables.terms.insert(row.id_semester.clone(), row.clone());
        Ok(row)
    }

    async fn replace(&self, id: &str, fields: &TermFields) -> RepoResult<Option<Term>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(term) = tables.terms.get_mut(id) else {
            return Ok(None);
        };
        term.tahun_ajaran = fields.tahun_ajaran.clone();
        term.term = fields.term;
        term.tanggal_mulai = fields.tanggal_mulai;
        term.tanggal_selesai = fields.tanggal_selesai;
        term.updated_at = Utc::now();
        Ok(Some(term.clone()))
    }

    async fn update(&self, id: &str, patch: &TermPatch) -> RepoResult<Option<Term>> {
        self.begin_write()?;
        let mut tables = self.lock();
        let Some(term) = tables.terms.get_mut(id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.tahun_ajaran {
            term.tahun_ajaran = v.clone();
        }
        if let Some(v) = patch.term {
            term.term = v;
        }
        if let Some(v) = patch.tanggal_mulai {
            term.tanggal_mulai = Some(v);
        }
        if let Some(v) = patch.tanggal_selesai {
            term.tanggal_selesai = Some(v);
        }
        term.updated_at = Utc::now();
        Ok(Some(term.clone()))
    }

    async fn has_classes(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().class_terms.contains(id))
    }

    async fn has_registrations(&self, id: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().registration_terms.contains(id))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.class_terms.contains(id) || tables.registration_terms.contains(id) {
            return Err(foreign_key("krs_id_semester_fkey"));
        }
        Ok(tables.terms.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.check_storage()?;
        Ok(self.lock().users.get(username).cloned())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().users.contains_key(username))
    }

    async fn student_exists(&self, id_mahasiswa: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().students.contains_key(id_mahasiswa))
    }

    async fn lecturer_exists(&self, id_dosen: &str) -> RepoResult<bool> {
        self.check_storage()?;
        Ok(self.lock().lecturers.contains_key(id_dosen))
    }

    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        self.begin_write()?;
        let mut tables = self.lock();
        if tables.users.contains_key(&user.username) {
            return Err(unique("users_username_key"));
        }
        tables.next_user_id += 1;
        let now = Utc::now();
        let row = User {
            id_user: tables.next_user_id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            ref_id: user.ref_id.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.username.clone(), row.clone());
        Ok(row)
    }
}
