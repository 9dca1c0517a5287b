//! Traits for document storage
//!
//! `Entity` describes a stored type and its cache policy; `Repository` is
//! the storage interface every backend implements.

pub mod entity;
pub mod repository;

pub use entity::Entity;
pub use repository::{Repository, RepositoryFactory};
