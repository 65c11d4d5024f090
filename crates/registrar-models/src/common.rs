//! Response envelopes shared by every resource.

use registrar_core::PaginationMeta;
use serde::Serialize;
use utoipa::ToSchema;

/// `{"data": ...}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"data": [...], "meta": {"page", "per_page"}}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// `{"message": "...", "data": ...}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn created(data: T) -> Self {
        Self {
            message: "created".to_string(),
            data,
        }
    }

    pub fn updated(data: T) -> Self {
        Self {
            message: "updated".to_string(),
            data,
        }
    }

    pub fn deleted(data: T) -> Self {
        Self {
            message: "deleted".to_string(),
            data,
        }
    }
}
