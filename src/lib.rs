//! Revenue reporter workspace root.
//!
//! Re-exports the workspace libraries; the operator binaries live in
//! `src/bin/`.

pub use mock_backend;
pub use revenue_client;
