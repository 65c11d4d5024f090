//! Text-backed enumerations stored as `VARCHAR` columns.
//!
//! Each enum serializes to its exact wire text, parses with [`FromStr`]
//! (failing with `InvalidInput`) and binds to Postgres as a plain string.

use std::fmt;
use std::str::FromStr;

use registrar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Type, postgres::PgTypeInfo};
use utoipa::ToSchema;

/// Defines an enum whose variants map one-to-one onto fixed strings.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident($field:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Trims `value` before matching it.
            pub fn parse_trimmed(value: &str) -> AppResult<Self> {
                value.trim().parse()
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(AppError::invalid_input(format!(
                        "{} must be one of: {}",
                        $field,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
                s.parse::<Self>().map_err(|e| e.to_string().into())
            }
        }
    };
}

text_enum! {
    /// Program degree level.
    DegreeLevel("jenjang") {
        D3 => "D3",
        D4 => "D4",
        S1 => "S1",
        S2 => "S2",
        S3 => "S3",
    }
}

text_enum! {
    /// Program accreditation grade.
    Accreditation("akreditasi") {
        A => "A",
        B => "B",
        C => "C",
        Baik => "Baik",
        BaikSekali => "Baik Sekali",
        Unggul => "Unggul",
    }
}

text_enum! {
    Sex("jenis_kelamin") {
        Male => "L",
        Female => "P",
    }
}

text_enum! {
    /// Enrollment status of a student.
    StudentStatus("status") {
        Active => "Aktif",
        Leave => "Cuti",
        Graduated => "Lulus",
        DroppedOut => "Drop Out",
        Inactive => "Non-Aktif",
    }
}

impl Default for StudentStatus {
    fn default() -> Self {
        Self::Active
    }
}

text_enum! {
    /// Position of a term within the academic year.
    TermName("term") {
        Odd => "Ganjil",
        Even => "Genap",
        Short => "Antara",
    }
}

impl TermName {
    /// Maps the trailing digit of a term id: 1, 2 or 3.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Odd),
            2 => Some(Self::Even),
            3 => Some(Self::Short),
            _ => None,
        }
    }

    pub fn digit(&self) -> u8 {
        match self {
            Self::Odd => 1,
            Self::Even => 2,
            Self::Short => 3,
        }
    }
}

text_enum! {
    /// Credential role.
    UserRole("role") {
        Admin => "admin",
        Operator => "operator",
        Lecturer => "dosen",
        Student => "mahasiswa",
    }
}

impl UserRole {
    /// Admins and operators manage master data.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_text() {
        assert_eq!("Baik Sekali".parse::<Accreditation>().unwrap(), Accreditation::BaikSekali);
        assert_eq!("Drop Out".parse::<StudentStatus>().unwrap(), StudentStatus::DroppedOut);
        assert_eq!("mahasiswa".parse::<UserRole>().unwrap(), UserRole::Student);
        assert!("s1".parse::<DegreeLevel>().is_err());
        assert!("Aktif ".parse::<StudentStatus>().is_err());
    }

    #[test]
    fn test_parse_trimmed() {
        assert_eq!(Sex::parse_trimmed(" P ").unwrap(), Sex::Female);
    }

    #[test]
    fn test_invalid_value_is_invalid_input() {
        let err = "X".parse::<Sex>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains("jenis_kelamin")));
    }

    #[test]
    fn test_serde_uses_wire_text() {
        assert_eq!(
            serde_json::to_value(StudentStatus::Inactive).unwrap(),
            serde_json::json!("Non-Aktif")
        );
        let level: DegreeLevel = serde_json::from_value(serde_json::json!("S2")).unwrap();
        assert_eq!(level, DegreeLevel::S2);
    }

    #[test]
    fn test_term_digits() {
        for term in TermName::ALL {
            assert_eq!(TermName::from_digit(term.digit()), Some(*term));
        }
        assert_eq!(TermName::from_digit(4), None);
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Operator.is_staff());
        assert!(!UserRole::Lecturer.is_staff());
        assert!(!UserRole::Student.is_staff());
    }
}
