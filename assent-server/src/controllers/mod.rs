pub mod access;
pub mod home;
pub mod policies;
pub mod todos;

use assent_slo::{errors, FailureRecord};

/// Fallback of the router and of every method router: unknown routes and
/// unregistered methods alike answer `404`.
pub async fn not_found() -> FailureRecord {
    errors::not_found("Resource not found")
}
