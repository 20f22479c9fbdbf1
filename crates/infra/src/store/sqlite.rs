//! SQLite-backed item store.
//!
//! Schema is created on connect (`CREATE TABLE IF NOT EXISTS`). `total_value`
//! is stored for readers of the raw table but always recomputed from quantity
//! and unit value when rows are loaded.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use itemtrack_core::ItemId;
use itemtrack_inventory::{Item, ItemChanges, NewItem};

use super::{ItemStore, StoreError};

/// Durable item store on a SQLite database.
///
/// ## Atomicity
///
/// `create_batch` inserts every row inside one transaction; a failure on any
/// row rolls the whole batch back. `update` reads, applies the edit through
/// the domain model, and writes back inside one transaction.
#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Connect (creating the database file if missing) and ensure the schema.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database; keep one.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                code        TEXT    NOT NULL,
                description TEXT    NOT NULL,
                category    TEXT    NULL,
                unit        TEXT    NULL,
                quantity    REAL    NOT NULL,
                unit_value  REAL    NOT NULL,
                total_value REAL    NOT NULL,
                assigned_at TEXT    NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| map_sqlx_error("create_items_table", e))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load<'e, E>(executor: E, id: ItemId) -> Result<Item, StoreError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            r#"
            SELECT id, code, description, category, unit, quantity, unit_value, assigned_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("select_item", e))?
        .ok_or(StoreError::NotFound(id))?;

        item_from_row(&row)
    }
}

#[async_trait::async_trait]
impl ItemStore for SqliteItemStore {
    #[instrument(skip(self, item), fields(code = %item.code), err)]
    async fn create(&self, item: NewItem) -> Result<ItemId, StoreError> {
        let id = insert_item(&self.pool, &item, Utc::now()).await?;
        tracing::debug!(item_id = %id, "item stored");
        Ok(id)
    }

    #[instrument(skip(self, items), fields(item_count = items.len()), err)]
    async fn create_batch(&self, items: Vec<NewItem>) -> Result<Vec<ItemId>, StoreError> {
        if items.is_empty() {
            return Ok(vec![]);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let now = Utc::now();
        let mut ids = Vec::with_capacity(items.len());
        for item in &items {
            match insert_item(&mut *tx, item, now).await {
                Ok(id) => ids.push(id),
                Err(err) => {
                    if let Err(e) = tx.rollback().await {
                        tracing::error!(error = %e, "rollback after failed insert failed");
                    }
                    return Err(err);
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(ids)
    }

    #[instrument(skip(self), err)]
    async fn list_all_by_recency(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, description, category, unit, quantity, unit_value, assigned_at
            FROM items
            ORDER BY assigned_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", e))?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        Self::load(&self.pool, id).await
    }

    #[instrument(skip(self, changes), fields(item_id = %id), err)]
    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut item = Self::load(&mut *tx, id).await?;
        item.apply_changes(changes);

        sqlx::query(
            r#"
            UPDATE items
            SET code = ?1,
                description = ?2,
                category = ?3,
                unit = ?4,
                quantity = ?5,
                unit_value = ?6,
                total_value = ?7
            WHERE id = ?8
            "#,
        )
        .bind(item.code())
        .bind(item.description())
        .bind(item.category())
        .bind(item.unit())
        .bind(item.quantity())
        .bind(item.unit_value())
        .bind(item.total_value())
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_item", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(item)
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

async fn insert_item<'e, E>(
    executor: E,
    item: &NewItem,
    assigned_at: DateTime<Utc>,
) -> Result<ItemId, StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO items (
            code,
            description,
            category,
            unit,
            quantity,
            unit_value,
            total_value,
            assigned_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&item.code)
    .bind(&item.description)
    .bind(&item.category)
    .bind(&item.unit)
    .bind(item.quantity)
    .bind(item.unit_value)
    .bind(item.total_value())
    .bind(assigned_at)
    .execute(executor)
    .await
    .map_err(|e| map_sqlx_error("insert_item", e))?;

    Ok(ItemId::new(result.last_insert_rowid()))
}

fn item_from_row(row: &SqliteRow) -> Result<Item, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_item_row", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let assigned_at: DateTime<Utc> = row.try_get("assigned_at").map_err(decode)?;
    let new = NewItem {
        code: row.try_get("code").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        unit: row.try_get("unit").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
        unit_value: row.try_get("unit_value").map_err(decode)?,
    };

    Ok(Item::create(ItemId::new(id), new, assigned_at))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    tracing::error!(operation, error = %err, "sqlite operation failed");
    StoreError::Storage(format!("{operation}: {err}"))
}
