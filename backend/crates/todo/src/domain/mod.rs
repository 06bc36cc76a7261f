//! Domain Layer - Todo records and their rules
//!
//! This layer contains:
//! - Domain entities (Todo, TodoDraft, TodoPatch, TodoStats)
//! - Domain value objects (Priority, TodoTitle, TodoDescription)
//! - Gateway trait (interface to the backend)

pub mod entities;
pub mod repository;
pub mod value_objects;
