mod init_tracing;
mod prompt_sanitizer;
mod request_id;

pub use init_tracing::{TracingConfig, init_tracing};
pub use prompt_sanitizer::sanitize_prompt;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
