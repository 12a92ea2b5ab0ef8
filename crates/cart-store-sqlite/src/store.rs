// crates/cart-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backed by SQLite.
// Purpose: Persist cart line items with per-collection tables.
// Dependencies: cart-core, bigdecimal, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`RecordStore`] using `SQLite`. Every
//! collection name maps to one table created lazily on first access. Each
//! table enforces `UNIQUE (session_id, product_id, row_key)`, and upserts run
//! inside an immediate transaction with `ON CONFLICT ... DO UPDATE`, so two
//! writers racing on the same line item never produce duplicate rows.
//! Database contents are untrusted: rows failing validation are reported as
//! [`StoreError::Corrupt`] instead of being silently repaired.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use bigdecimal::BigDecimal;
use cart_core::CollectionName;
use cart_core::CustomerId;
use cart_core::ItemName;
use cart_core::LineItem;
use cart_core::LineItemId;
use cart_core::LineItemPatch;
use cart_core::NewLineItem;
use cart_core::Price;
use cart_core::ProductId;
use cart_core::Quantity;
use cart_core::RecordFilter;
use cart_core::RecordStore;
use cart_core::RowKey;
use cart_core::SessionId;
use cart_core::StoreError;
use cart_core::UpsertOutcome;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Table holding store metadata; unavailable as a collection name.
const META_TABLE: &str = "store_meta";
/// Prefix `SQLite` reserves for internal tables.
const SQLITE_RESERVED_PREFIX: &str = "sqlite_";
/// Column list shared by every line-item query.
const LINE_ITEM_COLUMNS: &str =
    "id, row_key, session_id, product_id, customer_id, quantity, price, name, options";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` record store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default timeouts and pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }

    /// Checks the database path against length limits without touching disk.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when the path is empty or too long.
    pub fn validate(&self) -> Result<(), SqliteStoreError> {
        validate_path_limits(&self.path)
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw row payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row failed validation.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
#[allow(clippy::needless_pass_by_value, reason = "Used directly with map_err.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Connection plus the set of collection tables already ensured.
struct SqliteState {
    /// Shared connection.
    connection: Connection,
    /// Collections whose tables exist.
    prepared: BTreeSet<CollectionName>,
}

/// `SQLite`-backed cart record store.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - Every collection table carries the line-item uniqueness constraint.
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Connection state guarded by a mutex.
    state: Arc<Mutex<SqliteState>>,
}

impl SqliteRecordStore {
    /// Opens an `SQLite`-backed record store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        config.validate()?;
        reject_directory_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        info!(
            target: "cart::store",
            path = %config.path.display(),
            journal_mode = config.journal_mode.pragma_value(),
            "sqlite record store opened"
        );
        Ok(Self {
            config,
            state: Arc::new(Mutex::new(SqliteState {
                connection,
                prepared: BTreeSet::new(),
            })),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Verifies the store can execute a simple SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the mutex is poisoned or the query fails.
    pub fn readiness(&self) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .connection
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(db_error)?;
        Ok(())
    }

    /// Locks the connection state.
    fn lock(&self) -> Result<MutexGuard<'_, SqliteState>, SqliteStoreError> {
        self.state.lock().map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }

    /// Locks the connection and ensures the collection table exists.
    fn lock_collection(
        &self,
        collection: &CollectionName,
    ) -> Result<MutexGuard<'_, SqliteState>, SqliteStoreError> {
        let mut guard = self.lock()?;
        if !guard.prepared.contains(collection) {
            create_collection_table(&guard.connection, collection)?;
            guard.prepared.insert(collection.clone());
            debug!(target: "cart::store", collection = %collection, "sqlite collection ready");
        }
        Ok(guard)
    }

    /// Reads matching rows.
    fn select_rows(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<Vec<LineItem>, SqliteStoreError> {
        let guard = self.lock_collection(collection)?;
        let (clause, values) = filter_clause(filter)?;
        let sql =
            format!("SELECT {LINE_ITEM_COLUMNS} FROM {} {clause}", table_ident(collection));
        let mut statement = guard.connection.prepare(&sql).map_err(db_error)?;
        let rows = statement.query_map(params_from_iter(values), map_line_item_row).map_err(db_error)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(decode_line_item(row.map_err(db_error)?)?);
        }
        Ok(items)
    }

    /// Inserts a new row.
    fn insert_row(
        &self,
        collection: &CollectionName,
        item: &NewLineItem,
    ) -> Result<LineItemId, SqliteStoreError> {
        let guard = self.lock_collection(collection)?;
        let sql = format!(
            "INSERT INTO {} (row_key, session_id, product_id, customer_id, quantity, price, \
             name, options) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            table_ident(collection)
        );
        let id: i64 = guard
            .connection
            .query_row(&sql, params_from_iter(insert_values(item)?), |row| row.get(0))
            .map_err(db_error)?;
        decode_id(id)
    }

    /// Applies a patch to matching rows.
    fn update_rows(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
        patch: &LineItemPatch,
    ) -> Result<u64, SqliteStoreError> {
        let guard = self.lock_collection(collection)?;
        let Some((assignments, mut values)) = patch_assignments(patch)? else {
            return Ok(0);
        };
        let (clause, filter_values) = filter_clause(filter)?;
        values.extend(filter_values);
        let sql = format!("UPDATE {} SET {assignments} {clause}", table_ident(collection));
        let touched =
            guard.connection.execute(&sql, params_from_iter(values)).map_err(db_error)?;
        u64::try_from(touched).map_err(|_| SqliteStoreError::Invalid("update count overflow".to_string()))
    }

    /// Deletes matching rows.
    fn delete_rows(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<u64, SqliteStoreError> {
        let guard = self.lock_collection(collection)?;
        let (clause, values) = filter_clause(filter)?;
        let sql = format!("DELETE FROM {} {clause}", table_ident(collection));
        let removed =
            guard.connection.execute(&sql, params_from_iter(values)).map_err(db_error)?;
        u64::try_from(removed).map_err(|_| SqliteStoreError::Invalid("delete count overflow".to_string()))
    }

    /// Inserts or merges a row inside one immediate transaction.
    fn upsert_row(
        &self,
        collection: &CollectionName,
        item: &NewLineItem,
        merge: &LineItemPatch,
    ) -> Result<UpsertOutcome, SqliteStoreError> {
        let mut guard = self.lock_collection(collection)?;
        let table = table_ident(collection);
        let tx = guard
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(db_error)?;
        let existing: Option<i64> = tx
            .query_row(
                &format!(
                    "SELECT id FROM {table} WHERE session_id = ? AND product_id = ? AND \
                     row_key = ?"
                ),
                params![item.session_id.as_str(), item.product_id.as_str(), item.row_key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        let (assignments, merge_values) = match patch_assignments(merge)? {
            Some(assignments) => assignments,
            None => ("quantity = quantity".to_string(), Vec::new()),
        };
        let mut values = insert_values(item)?;
        values.extend(merge_values);
        let sql = format!(
            "INSERT INTO {table} (row_key, session_id, product_id, customer_id, quantity, price, \
             name, options) VALUES (?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT (session_id, product_id, \
             row_key) DO UPDATE SET {assignments} RETURNING id"
        );
        let id: i64 =
            tx.query_row(&sql, params_from_iter(values), |row| row.get(0)).map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        let id = decode_id(id)?;
        Ok(if existing.is_some() { UpsertOutcome::Merged(id) } else { UpsertOutcome::Created(id) })
    }
}

impl RecordStore for SqliteRecordStore {
    fn select(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<Vec<LineItem>, StoreError> {
        self.select_rows(collection, filter).map_err(StoreError::from)
    }

    fn insert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
    ) -> Result<LineItemId, StoreError> {
        self.insert_row(collection, &item).map_err(StoreError::from)
    }

    fn update(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
        patch: &LineItemPatch,
    ) -> Result<u64, StoreError> {
        self.update_rows(collection, filter, patch).map_err(StoreError::from)
    }

    fn delete(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<u64, StoreError> {
        self.delete_rows(collection, filter).map_err(StoreError::from)
    }

    fn upsert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
        merge: &LineItemPatch,
    ) -> Result<UpsertOutcome, StoreError> {
        self.upsert_row(collection, &item, merge).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Query Building
// ============================================================================

/// Returns the quoted table identifier for a collection.
///
/// Collection names are restricted to identifier characters, so quoting is
/// sufficient.
fn table_ident(collection: &CollectionName) -> String {
    format!("\"{}\"", collection.as_str())
}

/// Builds a `WHERE` clause and its bound values from a filter.
fn filter_clause(filter: &RecordFilter) -> Result<(String, Vec<Value>), SqliteStoreError> {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    if let Some(id) = filter.id {
        conditions.push("id = ?");
        values.push(Value::Integer(to_sql_integer(id.get(), "id")?));
    }
    if let Some(session_id) = &filter.session_id {
        conditions.push("session_id = ?");
        values.push(Value::Text(session_id.as_str().to_string()));
    }
    if let Some(product_id) = &filter.product_id {
        conditions.push("product_id = ?");
        values.push(Value::Text(product_id.as_str().to_string()));
    }
    if let Some(row_key) = &filter.row_key {
        conditions.push("row_key = ?");
        values.push(Value::Text(row_key.as_str().to_string()));
    }
    if conditions.is_empty() {
        return Ok((String::new(), values));
    }
    Ok((format!("WHERE {}", conditions.join(" AND ")), values))
}

/// Builds a `SET` assignment list from a patch; `None` when it writes nothing.
fn patch_assignments(
    patch: &LineItemPatch,
) -> Result<Option<(String, Vec<Value>)>, SqliteStoreError> {
    let mut assignments = Vec::new();
    let mut values = Vec::new();
    if let Some(product_id) = &patch.product_id {
        assignments.push("product_id = ?");
        values.push(Value::Text(product_id.as_str().to_string()));
    }
    if let Some(customer_id) = patch.customer_id {
        assignments.push("customer_id = ?");
        values.push(Value::Integer(to_sql_integer(customer_id.get(), "customer_id")?));
    }
    if let Some(quantity) = patch.quantity {
        assignments.push("quantity = ?");
        values.push(Value::Integer(to_sql_integer(quantity.get(), "quantity")?));
    }
    if let Some(price) = &patch.price {
        assignments.push("price = ?");
        values.push(Value::Text(price.to_string()));
    }
    if let Some(name) = &patch.name {
        assignments.push("name = ?");
        values.push(Value::Text(name.as_str().to_string()));
    }
    if let Some(options) = &patch.options {
        assignments.push("options = ?");
        values.push(Value::Text(options.clone()));
    }
    if assignments.is_empty() {
        return Ok(None);
    }
    Ok(Some((assignments.join(", "), values)))
}

/// Returns bound values for an insert, in column order.
fn insert_values(item: &NewLineItem) -> Result<Vec<Value>, SqliteStoreError> {
    Ok(vec![
        Value::Text(item.row_key.as_str().to_string()),
        Value::Text(item.session_id.as_str().to_string()),
        Value::Text(item.product_id.as_str().to_string()),
        Value::Integer(to_sql_integer(item.customer_id.get(), "customer_id")?),
        Value::Integer(to_sql_integer(item.quantity.get(), "quantity")?),
        Value::Text(item.price.to_string()),
        Value::Text(item.name.as_str().to_string()),
        Value::Text(item.options.clone()),
    ])
}

/// Converts an unsigned value into the `SQLite` integer range.
fn to_sql_integer(value: u64, field: &str) -> Result<i64, SqliteStoreError> {
    i64::try_from(value)
        .map_err(|_| SqliteStoreError::Invalid(format!("{field} exceeds sqlite integer range")))
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Line-item row as read from `SQLite`, before validation.
struct RawLineItem {
    /// Row identifier.
    id: i64,
    /// Row key column.
    row_key: String,
    /// Session column.
    session_id: String,
    /// Product column.
    product_id: String,
    /// Customer column.
    customer_id: i64,
    /// Quantity column.
    quantity: i64,
    /// Price column.
    price: String,
    /// Name column.
    name: String,
    /// Options column.
    options: String,
}

/// Reads the raw columns of a line-item row.
fn map_line_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLineItem> {
    Ok(RawLineItem {
        id: row.get(0)?,
        row_key: row.get(1)?,
        session_id: row.get(2)?,
        product_id: row.get(3)?,
        customer_id: row.get(4)?,
        quantity: row.get(5)?,
        price: row.get(6)?,
        name: row.get(7)?,
        options: row.get(8)?,
    })
}

/// Validates a raw row into a line item.
fn decode_line_item(raw: RawLineItem) -> Result<LineItem, SqliteStoreError> {
    let id = decode_id(raw.id)?;
    let corrupt = |field: &str| SqliteStoreError::Corrupt(format!("row {id}: invalid {field}"));
    let customer_id = u64::try_from(raw.customer_id).map_err(|_| corrupt("customer_id"))?;
    let quantity = u64::try_from(raw.quantity)
        .ok()
        .and_then(Quantity::from_raw)
        .ok_or_else(|| corrupt("quantity"))?;
    let price = BigDecimal::from_str(&raw.price)
        .ok()
        .and_then(|value| Price::from_decimal(value).ok())
        .ok_or_else(|| corrupt("price"))?;
    Ok(LineItem {
        id,
        row_key: RowKey::new(raw.row_key),
        session_id: SessionId::new(raw.session_id),
        product_id: ProductId::parse(&raw.product_id).map_err(|_| corrupt("product_id"))?,
        customer_id: CustomerId::new(customer_id),
        quantity,
        price,
        name: ItemName::parse(&raw.name).map_err(|_| corrupt("name"))?,
        options: raw.options,
    })
}

/// Validates a stored row identifier.
fn decode_id(raw: i64) -> Result<LineItemId, SqliteStoreError> {
    u64::try_from(raw)
        .ok()
        .and_then(LineItemId::from_raw)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid row id: {raw}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_path_limits(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    Ok(())
}

/// Rejects a store path naming an existing directory.
fn reject_directory_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_error)?;
    Ok(())
}

/// Initializes the metadata table or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}

/// Creates the table backing a collection when it does not exist yet.
fn create_collection_table(
    connection: &Connection,
    collection: &CollectionName,
) -> Result<(), SqliteStoreError> {
    let name = collection.as_str();
    if name.eq_ignore_ascii_case(META_TABLE)
        || name.to_ascii_lowercase().starts_with(SQLITE_RESERVED_PREFIX)
    {
        return Err(SqliteStoreError::Invalid(format!("collection name is reserved: {name}")));
    }
    let table = table_ident(collection);
    connection
        .execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                row_key TEXT NOT NULL,
                session_id TEXT NOT NULL,
                product_id TEXT NOT NULL,
                customer_id INTEGER NOT NULL DEFAULT 0,
                quantity INTEGER NOT NULL,
                price TEXT NOT NULL,
                name TEXT NOT NULL,
                options TEXT NOT NULL DEFAULT '',
                UNIQUE (session_id, product_id, row_key)
            );
            CREATE INDEX IF NOT EXISTS \"idx_{name}_row_key\" ON {table} (row_key);"
        ))
        .map_err(db_error)
}
