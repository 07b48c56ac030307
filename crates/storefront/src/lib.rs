//! `tiendita-storefront`: application layer of the storefront.
//!
//! Everything persistent (rows, images, sessions) lives in a hosted backend
//! reached through the [`Backend`] trait; this crate maps its rows into the
//! catalog domain and sequences one backend operation per user action.

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod preferences;
pub mod records;
pub mod service;
pub mod session;

pub use backend::{Backend, BackendError, ImageUpload, Order, Row, Table};
pub use config::{ConfigError, StorefrontConfig};
pub use error::StorefrontError;
pub use memory::InMemoryBackend;
pub use preferences::{
    InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceError, PreferenceStore, Preferences,
    Theme, ViewMode,
};
pub use service::{Marketplace, Storefront};
pub use session::{AdminPolicy, SessionUser};
