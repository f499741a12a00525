//! Web front-end: search page, graph details page and JSON endpoints.

mod http;
mod pages;

pub use http::{create_router, AppState, HttpServer};
