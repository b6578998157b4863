//! Currency diff: the endpoint's domain logic.
//!
//! # Data Flow
//! ```text
//! GET /api/diff/{currency_id}
//!     → service.rs (DiffService)
//!         → rates::DualFetch (today + yesterday snapshots)
//!         → outcome.rs (Risen / Fallen)
//!         → gifs lookups (search term → id → bytes)
//!     → DiffReport
//! ```

pub mod error;
pub mod outcome;
pub mod service;

pub use error::{DiffError, DiffResult};
pub use outcome::Outcome;
pub use service::{DiffReport, DiffService, DiffSettings};
