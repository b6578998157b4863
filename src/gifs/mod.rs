//! GIF resolution.
//!
//! # Data Flow
//! ```text
//! search term
//!     → lookup.rs (CandidateIdLookup: cached id set or upstream search)
//!     → selector.rs (random id when the ids came from upstream)
//!     → lookup.rs (GifAssetLookup: cached bytes or media download)
//! ```

pub mod lookup;
pub mod selector;

pub use lookup::{normalize_query, CandidateIdLookup, GifAsset, GifAssetLookup};
pub use selector::{CandidateSelector, EmptyCandidateSet};
