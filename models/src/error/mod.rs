pub mod data_source_error;
pub mod error_kind;
