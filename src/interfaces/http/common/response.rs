//! Response envelopes

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::Page;

/// Envelope for message-only results such as deletes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: None,
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub page_size: u64,
    pub cur_page: u64,
    pub total_pages: u64,
    /// Size of the whole filtered result set
    pub total_elements: u64,
    pub result: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            page_size: page.size,
            cur_page: page.page,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            result: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PageRequest;

    #[test]
    fn paginated_response_uses_camel_case() {
        let page = Page::new(vec![1, 2], 12, PageRequest::new(2, 2));
        let body = PaginatedResponse::from_page(page, |n| n * 10);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pageSize": 2,
                "curPage": 2,
                "totalPages": 6,
                "totalElements": 12,
                "result": [10, 20]
            })
        );
    }

    #[test]
    fn message_response_has_null_data() {
        let json = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["message"], "Deleted");
        assert!(json["data"].is_null());
    }
}
