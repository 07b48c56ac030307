//! Hosted backend collaborator: relational tables, object storage and auth.
//!
//! The storefront consumes it as a black box of plain rows in, plain rows or
//! errors out. Implementations must not be assumed to order unrelated calls;
//! the service awaits each one before issuing the next.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::session::SessionUser;

/// A table row as JSON object (column -> value).
pub type Row = serde_json::Map<String, JsonValue>;

/// Tables the storefront reads and writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Products,
    Categories,
    Subcategories,
    Announcements,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Products => "products",
            Table::Categories => "categories",
            Table::Subcategories => "subcategories",
            Table::Announcements => "announcements",
        }
    }

    /// Column the backend fills with the insertion time.
    pub fn created_column(self) -> &'static str {
        match self {
            Table::Products => "fecha_creacion",
            _ => "created_at",
        }
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort order of a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// A file picked in the admin form, uploaded before the product is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The table has not been created in this project yet.
    #[error("relation \"public.{0}\" does not exist")]
    MissingTable(String),

    #[error("{0}")]
    Request(String),

    #[error("storage upload failed for '{path}': {message}")]
    Upload { path: String, message: String },

    #[error("auth error: {0}")]
    Auth(String),
}

impl BackendError {
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn is_missing_table(&self) -> bool {
        matches!(self, BackendError::MissingTable(_))
    }
}

/// Operations the storefront needs from the hosted platform.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All rows of `table`, sorted.
    async fn query(&self, table: Table, order: Order) -> Result<Vec<Row>, BackendError>;

    async fn insert(&self, table: Table, row: Row) -> Result<(), BackendError>;

    /// Merge `patch` into the row whose `id` matches; no match is not an error.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<(), BackendError>;

    /// Delete the row whose `id` matches; no match is not an error.
    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError>;

    /// Store `bytes` under `bucket/path` and return its public URL.
    async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, BackendError>;

    /// Start the OAuth sign-in flow.
    async fn sign_in(&self) -> Result<(), BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Current session user, updated on every auth state change.
    fn on_auth_change(&self) -> watch::Receiver<Option<SessionUser>>;
}
