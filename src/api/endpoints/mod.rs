pub mod auth;
pub mod emergency;
pub mod history;
pub mod home;
pub mod homecare;
pub mod logs;
pub mod modules;
pub mod reports;

use serde::Serialize;

/// Outcome of a positional edit/delete. `changed: false` covers the
/// silent no-op cases (out-of-range index, unknown patient).
#[derive(Debug, Serialize)]
pub struct MutationOutcome {
    pub changed: bool,
}
