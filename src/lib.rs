//! Currency mood service library.
//!
//! Compares today's exchange rate of a currency with yesterday's and answers
//! with a GIF: "rich" when it rose, "broke" otherwise.

pub mod cache;
pub mod config;
pub mod diff;
pub mod gifs;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rates;
pub mod resilience;
pub mod upstream;

pub use config::schema::ServiceConfig;
pub use diff::DiffService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
