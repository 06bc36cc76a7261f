//! Infrastructure Layer
//!
//! Backend gateway over HTTP and the local session store.

pub mod http;
pub mod session_store;

pub use http::HttpAuthGateway;
pub use session_store::KeyValueSessionRepository;
