//! `tiendita-core`: domain foundation building blocks for the storefront.
//!
//! This crate contains **pure domain** primitives (no backend, no UI concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BannerId, CategoryId, ProductId, SubcategoryId, UserId};
pub use value_object::ValueObject;
