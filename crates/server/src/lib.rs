//! HTTP surface for the Krishi Mitra agent
//!
//! Thin glue: request/response schemas, CORS, and wiring of the pipeline
//! components into one application state. Everything interesting happens in
//! the other crates.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
