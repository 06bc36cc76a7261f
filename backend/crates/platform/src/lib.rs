//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Backend API client (reqwest) and its error type
//! - Bearer token inspection (JWT expiry)
//! - Local key-value storage (file / memory)
//! - Client-side rate limiting
//! - Password policy and strength scoring
//! - Input sanitizing and HTML escaping
//! - Environment configuration

pub mod client;
pub mod config;
pub mod password;
pub mod rate_limit;
pub mod sanitize;
pub mod storage;
pub mod token;
