//! Application Configuration
//!
//! Configuration for the Todo application layer.

/// Todo application configuration
#[derive(Debug, Clone)]
pub struct TodoConfig {
    /// Backend collection holding the records
    pub collection: String,
    /// Records requested per page when loading the full list
    pub page_size: u32,
    /// Backend sort expression for the list
    pub sort: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            collection: "todos".to_string(),
            page_size: 200,
            sort: "-created".to_string(),
        }
    }
}
