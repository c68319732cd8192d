// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão de sucesso: { "success": true, "data": ..., "message": ... }
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data, message: None }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data, message: Some(message.into()) }
    }
}

// Metadados de paginação das listagens.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self { page, limit, total, total_pages }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self { success: true, data, meta: PageMeta::new(page, limit, total) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_rounds_total_pages_up() {
        let meta = PageMeta::new(1, 20, 41);
        assert_eq!(meta.total_pages, 3);

        let meta = PageMeta::new(1, 20, 40);
        assert_eq!(meta.total_pages, 2);

        let meta = PageMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
    }
}
