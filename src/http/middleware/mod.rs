pub mod logging;
pub mod rate_limit;
pub mod request_id;

pub use logging::{request_logging, request_logging_simple};
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimitLayer};
pub use request_id::{extract_request_id, stamp_request_id, RequestId, REQUEST_ID_HEADER};
