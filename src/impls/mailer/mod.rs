pub mod http;
pub mod log_only;
