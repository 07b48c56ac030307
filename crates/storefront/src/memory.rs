//! In-memory [`Backend`] for tests/dev.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::watch;
use uuid::Uuid;

use crate::backend::{Backend, BackendError, Order, Row, Table};
use crate::session::SessionUser;

/// Tables, storage and auth state kept in process memory.
///
/// Mirrors what the hosted backend does on its side: missing `id` columns get
/// a fresh uuid and missing creation columns get a strictly increasing
/// timestamp. Failures can be injected per table and for uploads.
#[derive(Debug)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    missing_tables: RwLock<HashSet<Table>>,
    failing_tables: RwLock<HashSet<Table>>,
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    uploads_before_failure: RwLock<Option<usize>>,
    clock: RwLock<DateTime<Utc>>,
    oauth_user: RwLock<Option<SessionUser>>,
    auth: watch::Sender<Option<SessionUser>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let (auth, _) = watch::channel(None);
        Self {
            tables: RwLock::new(HashMap::new()),
            missing_tables: RwLock::new(HashSet::new()),
            failing_tables: RwLock::new(HashSet::new()),
            files: RwLock::new(BTreeMap::new()),
            uploads_before_failure: RwLock::new(None),
            clock: RwLock::new(DateTime::<Utc>::MIN_UTC),
            oauth_user: RwLock::new(None),
            auth,
        }
    }

    /// User that the next `sign_in` authenticates as.
    pub fn with_oauth_user(self, user: SessionUser) -> Self {
        *write(&self.oauth_user) = Some(user);
        self
    }

    /// Make `table` behave as if it was never created.
    pub fn without_table(self, table: Table) -> Self {
        write(&self.missing_tables).insert(table);
        self
    }

    /// Make every operation on `table` fail with a request error.
    pub fn fail_table(&self, table: Table) {
        write(&self.failing_tables).insert(table);
    }

    /// Allow `count` more uploads, then fail every following one.
    pub fn fail_uploads_after(&self, count: usize) {
        *write(&self.uploads_before_failure) = Some(count);
    }

    /// Seed a row without going through the insert defaults.
    pub fn seed(&self, table: Table, row: Row) {
        write(&self.tables).entry(table).or_default().push(row);
    }

    /// Stored rows in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        read(&self.tables).get(&table).cloned().unwrap_or_default()
    }

    /// Keys (`bucket/path`) of every stored file.
    pub fn stored_files(&self) -> Vec<String> {
        read(&self.files).keys().cloned().collect()
    }

    /// Replace the session directly, as a restored session would.
    pub fn set_session(&self, user: Option<SessionUser>) {
        self.auth.send_replace(user);
    }

    fn check_table(&self, table: Table) -> Result<(), BackendError> {
        if read(&self.missing_tables).contains(&table) {
            return Err(BackendError::MissingTable(table.name().to_string()));
        }
        if read(&self.failing_tables).contains(&table) {
            return Err(BackendError::request(format!("{table}: service unavailable")));
        }
        Ok(())
    }

    fn next_timestamp(&self) -> String {
        let mut clock = write(&self.clock);
        let now = Utc::now();
        let next = if now > *clock {
            now
        } else {
            *clock + Duration::milliseconds(1)
        };
        *clock = next;
        next.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(JsonValue::as_str)
}

/// Nulls first, then numbers, then strings; mixed kinds compare by kind.
fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    fn rank(v: Option<&JsonValue>) -> u8 {
        match v {
            None | Some(JsonValue::Null) => 0,
            Some(JsonValue::Bool(_)) => 1,
            Some(JsonValue::Number(_)) => 2,
            Some(JsonValue::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn query(&self, table: Table, order: Order) -> Result<Vec<Row>, BackendError> {
        self.check_table(table)?;
        let mut rows = self.rows(table);
        rows.sort_by(|a, b| {
            let ord = compare_values(a.get(order.column), b.get(order.column));
            if order.ascending { ord } else { ord.reverse() }
        });
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<(), BackendError> {
        self.check_table(table)?;
        if row_id(&row).is_none() {
            row.insert("id".into(), JsonValue::String(Uuid::now_v7().to_string()));
        }
        let created = table.created_column();
        if row.get(created).is_none_or(JsonValue::is_null) {
            row.insert(created.into(), JsonValue::String(self.next_timestamp()));
        }
        write(&self.tables).entry(table).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<(), BackendError> {
        self.check_table(table)?;
        let key = id.to_string();
        let mut tables = write(&self.tables);
        if let Some(row) = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(key.as_str())))
        {
            row.extend(patch);
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError> {
        self.check_table(table)?;
        let key = id.to_string();
        if let Some(rows) = write(&self.tables).get_mut(&table) {
            rows.retain(|r| row_id(r) != Some(key.as_str()));
        }
        Ok(())
    }

    async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, BackendError> {
        {
            let mut budget = write(&self.uploads_before_failure);
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(BackendError::Upload {
                        path: path.to_string(),
                        message: "storage quota exceeded".to_string(),
                    });
                }
                *remaining -= 1;
            }
        }

        let key = format!("{bucket}/{path}");
        let mut files = write(&self.files);
        if files.contains_key(&key) {
            return Err(BackendError::Upload {
                path: path.to_string(),
                message: "The resource already exists".to_string(),
            });
        }
        files.insert(key.clone(), bytes);
        Ok(format!("memory://{key}"))
    }

    async fn sign_in(&self) -> Result<(), BackendError> {
        let user = read(&self.oauth_user)
            .clone()
            .ok_or_else(|| BackendError::Auth("no OAuth account available".to_string()))?;
        self.auth.send_replace(Some(user));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.auth.send_replace(None);
        Ok(())
    }

    fn on_auth_change(&self) -> watch::Receiver<Option<SessionUser>> {
        self.auth.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tiendita_core::UserId;

    fn row(value: JsonValue) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_creation_time() {
        let backend = InMemoryBackend::new();
        backend
            .insert(Table::Categories, row(json!({ "name": "Hogar" })))
            .await
            .unwrap();

        let rows = backend.rows(Table::Categories);
        assert_eq!(rows.len(), 1);
        assert!(row_id(&rows[0]).is_some());
        assert!(rows[0].get("created_at").and_then(JsonValue::as_str).is_some());
    }

    #[tokio::test]
    async fn query_orders_by_column() {
        let backend = InMemoryBackend::new();
        for name in ["b", "c", "a"] {
            backend
                .insert(Table::Categories, row(json!({ "name": name })))
                .await
                .unwrap();
        }

        let asc = backend.query(Table::Categories, Order::asc("name")).await.unwrap();
        let names: Vec<&str> = asc.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let newest = backend
            .query(Table::Categories, Order::desc("created_at"))
            .await
            .unwrap();
        let names: Vec<&str> = newest.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() {
        let backend = InMemoryBackend::new();
        let id = Uuid::now_v7();
        backend.seed(Table::Announcements, row(json!({ "id": id.to_string(), "active": true, "message": "hola" })));

        backend
            .update(Table::Announcements, id, row(json!({ "active": false })))
            .await
            .unwrap();
        let rows = backend.rows(Table::Announcements);
        assert_eq!(rows[0]["active"], json!(false));
        assert_eq!(rows[0]["message"], json!("hola"));

        backend.delete(Table::Announcements, Uuid::now_v7()).await.unwrap();
        assert_eq!(backend.rows(Table::Announcements).len(), 1);
        backend.delete(Table::Announcements, id).await.unwrap();
        assert!(backend.rows(Table::Announcements).is_empty());
    }

    #[tokio::test]
    async fn missing_and_failing_tables() {
        let backend = InMemoryBackend::new().without_table(Table::Subcategories);
        let err = backend
            .query(Table::Subcategories, Order::asc("name"))
            .await
            .unwrap_err();
        assert!(err.is_missing_table());
        assert_eq!(err.to_string(), "relation \"public.subcategories\" does not exist");

        backend.fail_table(Table::Products);
        let err = backend
            .query(Table::Products, Order::desc("fecha_creacion"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Request(_)));
    }

    #[tokio::test]
    async fn uploads_fail_after_budget_and_on_duplicates() {
        let backend = InMemoryBackend::new();
        let url = backend.upload_file("product-images", "u/1-a.jpg", vec![1]).await.unwrap();
        assert_eq!(url, "memory://product-images/u/1-a.jpg");
        assert!(backend.upload_file("product-images", "u/1-a.jpg", vec![2]).await.is_err());

        backend.fail_uploads_after(1);
        backend.upload_file("product-images", "u/2-b.jpg", vec![]).await.unwrap();
        let err = backend
            .upload_file("product-images", "u/3-c.jpg", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Upload { .. }));
        assert_eq!(backend.stored_files().len(), 2);
    }

    #[tokio::test]
    async fn auth_changes_are_observable() {
        let user = SessionUser::new(UserId::new(), "admin@example.com");
        let backend = InMemoryBackend::new().with_oauth_user(user.clone());
        let mut rx = backend.on_auth_change();
        assert_eq!(*rx.borrow(), None);

        backend.sign_in().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref(), Some(&user));

        backend.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }

    #[tokio::test]
    async fn sign_in_without_account_fails() {
        let backend = InMemoryBackend::new();
        assert!(matches!(backend.sign_in().await, Err(BackendError::Auth(_))));
    }
}
