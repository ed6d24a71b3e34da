pub mod error_detail;
pub mod panic;
