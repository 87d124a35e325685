//! `SQLite` implementation of [`ConfigurationManager`].
//!
//! A category is one `configuration` row whose `value` column holds the item
//! map as JSON. Parent/child links live in `category_children`.

use std::collections::BTreeMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use controlhub_app::ports::ConfigurationManager;
use controlhub_domain::category::{Category, CategoryItem};
use controlhub_domain::error::{ControlHubError, NotFoundError};
use controlhub_domain::time::now;

use crate::error::{StorageError, decode_error};

struct Wrapper(Category);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Category> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let name: String = row.try_get("key")?;
        let description: String = row.try_get("description")?;
        let value: String = row.try_get("value")?;

        let items: BTreeMap<String, CategoryItem> =
            serde_json::from_str(&value).map_err(decode_error)?;

        Ok(Self(Category {
            name,
            description,
            items,
        }))
    }
}

const SELECT_BY_KEY: &str = "SELECT key, description, value FROM configuration WHERE key = ?";
const EXISTS_BY_KEY: &str = "SELECT COUNT(*) FROM configuration WHERE key = ?";

const UPSERT: &str = r"
    INSERT INTO configuration (key, description, value, ts)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET
        description = excluded.description,
        value = excluded.value,
        ts = excluded.ts
";

const INSERT_CHILD: &str =
    "INSERT OR IGNORE INTO category_children (parent, child) VALUES (?, ?)";
const SELECT_CHILDREN: &str =
    "SELECT child FROM category_children WHERE parent = ? ORDER BY child";

// UNION drops rows already visited, so cyclic links terminate.
const SELECT_TREE: &str = r"
    WITH RECURSIVE tree(name) AS (
        SELECT ?
        UNION
        SELECT category_children.child
        FROM category_children
        JOIN tree ON category_children.parent = tree.name
    )
    SELECT name FROM tree
";

const DELETE_BY_KEY: &str = "DELETE FROM configuration WHERE key = ?";
const DELETE_LINKS: &str = "DELETE FROM category_children WHERE parent = ? OR child = ?";

/// `SQLite`-backed configuration category manager.
pub struct SqliteConfigurationManager {
    pool: SqlitePool,
}

impl SqliteConfigurationManager {
    /// Create a new manager using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ConfigurationManager for SqliteConfigurationManager {
    async fn get_category_all_items(
        &self,
        name: &str,
    ) -> Result<Option<Category>, ControlHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_KEY)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn create_category(&self, category: Category) -> Result<(), ControlHubError> {
        let value = serde_json::to_string(&category.items).map_err(StorageError::from)?;

        sqlx::query(UPSERT)
            .bind(&category.name)
            .bind(&category.description)
            .bind(&value)
            .bind(now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(category = %category.name, "category saved");
        Ok(())
    }

    async fn create_child_category(
        &self,
        parent: &str,
        children: &[String],
    ) -> Result<Vec<String>, ControlHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for name in std::iter::once(parent).chain(children.iter().map(String::as_str)) {
            let (count,): (i64,) = sqlx::query_as(EXISTS_BY_KEY)
                .bind(name)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if count == 0 {
                return Err(NotFoundError::Category {
                    name: name.to_string(),
                }
                .into());
            }
        }

        for child in children {
            sqlx::query(INSERT_CHILD)
                .bind(parent)
                .bind(child)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        let rows: Vec<(String,)> = sqlx::query_as(SELECT_CHILDREN)
            .bind(parent)
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|(child,)| child).collect())
    }

    async fn delete_category_and_children_recursively(
        &self,
        name: &str,
    ) -> Result<(), ControlHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let tree: Vec<(String,)> = sqlx::query_as(SELECT_TREE)
            .bind(name)
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        for (key,) in &tree {
            sqlx::query(DELETE_BY_KEY)
                .bind(key)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            sqlx::query(DELETE_LINKS)
                .bind(key)
                .bind(key)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;

        tracing::debug!(category = %name, removed = tree.len(), "category tree deleted");
        Ok(())
    }
}
