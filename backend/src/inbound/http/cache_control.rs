//! Cache policy for per-user listings.

use actix_web::http::header::{CacheControl, CacheDirective};

/// `Cache-Control: private, no-cache, must-revalidate`.
///
/// Appointment listings change with every booking and belong to one caller,
/// so shared caches must not keep them.
pub fn private_no_cache_header() -> CacheControl {
    CacheControl(vec![
        CacheDirective::Private,
        CacheDirective::NoCache,
        CacheDirective::MustRevalidate,
    ])
}
