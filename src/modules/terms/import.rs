//! Semester CSV import.
//!
//! Expected header: `id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai`.
//! The header is line 1, so the first data row is line 2. Every data row is
//! checked with [`TermService::validate_for_create`]; a dry run stops there,
//! a commit then creates each valid row independently.

use csv::{ReaderBuilder, StringRecord, Trim};
use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::model::CreateTermDto;
use super::repository::TermRepository;
use super::service::TermService;

pub const EXPECTED_HEADER: &str = "id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai";
const COLUMN_COUNT: usize = 5;

/// A rejected data row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RowError {
    /// 1-based line number, counting the header as line 1
    pub line: u64,
    pub record: Vec<String>,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ImportReport {
    DryRun {
        dry_run: bool,
        total_rows: usize,
        valid_rows: usize,
        invalid_rows: usize,
        errors: Vec<RowError>,
    },
    Commit {
        dry_run: bool,
        imported: usize,
        failed: usize,
        errors: Vec<RowError>,
    },
}

#[derive(Debug, Clone)]
enum ParsedRow {
    Rejected(RowError),
    Candidate {
        line: u64,
        record: Vec<String>,
        dto: CreateTermDto,
    },
}

fn to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Reads the header and every data row. Only a missing or wrong header
/// fails the whole file; row problems are reported per row.
fn parse_rows(data: &[u8]) -> AppResult<Vec<ParsedRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);
    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        _ => return Err(AppError::invalid_input("invalid CSV header")),
    };
    let first = header.get(0).unwrap_or_default().to_lowercase();
    if header.len() < COLUMN_COUNT || first != "id_semester" {
        return Err(AppError::invalid_input(format!(
            "expected header: {EXPECTED_HEADER}"
        )));
    }

    let mut rows = Vec::new();
    let mut line: u64 = 1;
    for result in records {
        line += 1;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                warn!(error = %err, line, "stopped reading CSV");
                break;
            }
            Err(_) => {
                rows.push(ParsedRow::Rejected(RowError {
                    line,
                    record: Vec::new(),
                    error: "invalid csv row".to_string(),
                }));
                continue;
            }
        };
        let fields = to_vec(&record);

        if fields.len() < COLUMN_COUNT {
            rows.push(ParsedRow::Rejected(RowError {
                line,
                record: fields,
                error: "not enough columns".to_string(),
            }));
            continue;
        }

        let mut date_error = None;
        for (field, value) in [("tanggal_mulai", &fields[3]), ("tanggal_selesai", &fields[4])] {
            if let Err(err) = validation::optional_date(field, Some(value.clone())) {
                date_error = Some(err.to_string());
                break;
            }
        }
        if let Some(error) = date_error {
            rows.push(ParsedRow::Rejected(RowError {
                line,
                record: fields,
                error,
            }));
            continue;
        }

        let dto = CreateTermDto {
            id_semester: fields[0].clone(),
            tahun_ajaran: fields[1].clone(),
            term: fields[2].clone(),
            tanggal_mulai: normalize_optional(Some(fields[3].clone())),
            tanggal_selesai: normalize_optional(Some(fields[4].clone())),
        };
        rows.push(ParsedRow::Candidate {
            line,
            record: fields,
            dto,
        });
    }

    Ok(rows)
}

/// Domain failures become row errors; storage failures abort the import.
fn row_error(line: u64, record: Vec<String>, err: AppError) -> AppResult<RowError> {
    match err {
        AppError::Internal(_) => Err(err),
        err => Ok(RowError {
            line,
            record,
            error: err.to_string(),
        }),
    }
}

#[instrument(skip(repo, data), fields(bytes = data.len()))]
pub async fn import_terms(
    repo: &dyn TermRepository,
    data: &[u8],
    dry_run: bool,
) -> AppResult<ImportReport> {
    let mut errors = Vec::new();
    let mut valid = Vec::new();

    for row in parse_rows(data)? {
        match row {
            ParsedRow::Rejected(err) => errors.push(err),
            ParsedRow::Candidate { line, record, dto } => {
                match TermService::validate_for_create(repo, dto.clone(), true).await {
                    Ok(_) => valid.push((line, record, dto)),
                    Err(err) => errors.push(row_error(line, record, err)?),
                }
            }
        }
    }

    if dry_run {
        info!(
            valid_rows = valid.len(),
            invalid_rows = errors.len(),
            "term import dry run finished"
        );
        return Ok(ImportReport::DryRun {
            dry_run: true,
            total_rows: valid.len() + errors.len(),
            valid_rows: valid.len(),
            invalid_rows: errors.len(),
            errors,
        });
    }

    let mut imported = 0;
    for (line, record, dto) in valid {
        match TermService::create(repo, dto).await {
            Ok(_) => imported += 1,
            Err(err) => errors.push(row_error(line, record, err)?),
        }
    }

    info!(imported, failed = errors.len(), "term import committed");
    Ok(ImportReport::Commit {
        dry_run: false,
        imported,
        failed: errors.len(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(rows: &[ParsedRow]) -> Vec<(u64, &str)> {
        rows.iter()
            .filter_map(|row| match row {
                ParsedRow::Rejected(err) => Some((err.line, err.error.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_is_required() {
        assert!(matches!(
            parse_rows(b""),
            Err(AppError::InvalidInput(msg)) if msg == "invalid CSV header"
        ));
        assert!(matches!(
            parse_rows(b"id,tahun_ajaran,term,tanggal_mulai,tanggal_selesai\n"),
            Err(AppError::InvalidInput(msg)) if msg.starts_with("expected header")
        ));
        assert!(parse_rows(b"id_semester,tahun_ajaran,term\n").is_err());
        assert!(parse_rows(b"ID_SEMESTER,a,b,c,d\n").unwrap().is_empty());
    }

    #[test]
    fn test_rows_keep_line_numbers() {
        let csv = "id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai\n\
                   20241, 2024/2025 ,Ganjil,2024-09-01,2025-01-31\n\
                   20242,2024/2025\n\
                   20243,2024/2025,Antara,2025-13-01,\n\
                   20251,2025/2026,Ganjil,,2026-02-30\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rejected(&rows),
            vec![
                (3, "not enough columns"),
                (4, "tanggal_mulai invalid (YYYY-MM-DD)"),
                (5, "tanggal_selesai invalid (YYYY-MM-DD)"),
            ]
        );
        match &rows[0] {
            ParsedRow::Candidate { line, dto, .. } => {
                assert_eq!(*line, 2);
                assert_eq!(dto.tahun_ajaran, "2024/2025");
                assert_eq!(dto.tanggal_mulai.as_deref(), Some("2024-09-01"));
            }
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn test_blank_dates_are_absent() {
        let csv = "id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai\n20241,2024/2025,Ganjil,,\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        match &rows[0] {
            ParsedRow::Candidate { dto, .. } => {
                assert_eq!(dto.tanggal_mulai, None);
                assert_eq!(dto.tanggal_selesai, None);
            }
            other => panic!("unexpected row: {other:?}"),
        }
    }
}
