pub mod errors;

pub type Result<T, E = errors::FailureRecord> = core::result::Result<T, E>;

pub use errors::FailureRecord;
