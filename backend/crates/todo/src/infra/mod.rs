//! Infrastructure Layer
//!
//! Backend gateway over HTTP.

pub mod http;

pub use http::HttpTodoGateway;
