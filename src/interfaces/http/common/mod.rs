//! Building blocks shared by every HTTP module

mod error;
mod response;
mod validated_json;

pub use error::{error_path_middleware, ApiError, ApiResult, ErrorBody};
pub use response::{ApiResponse, PaginatedResponse};
pub use validated_json::ValidatedJson;
