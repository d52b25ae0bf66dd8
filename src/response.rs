use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    /// A complete, unpaginated listing of `total` items.
    pub fn unpaged(total: i64) -> Self {
        Self::new(1, total, total)
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaged_meta_covers_everything_on_one_page() {
        let meta = Meta::unpaged(7);
        assert_eq!(meta.page, Some(1));
        assert_eq!(meta.per_page, Some(7));
        assert_eq!(meta.total, Some(7));
    }

    #[test]
    fn success_wraps_data() {
        let resp = ApiResponse::success("OK", 3, None);
        assert_eq!(resp.message, "OK");
        assert_eq!(resp.data, Some(3));
        assert!(resp.meta.is_none());
    }
}
