//! `SQLite` implementation of [`ScriptRepository`].
//!
//! Steps are stored as JSON text and only decoded at this boundary.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use controlhub_app::ports::ScriptRepository;
use controlhub_domain::error::{ConflictError, ControlHubError};
use controlhub_domain::script::{Script, ScriptUpdate, Steps};

use crate::error::{StorageError, decode_error, unique_violation_or_storage};

struct Wrapper(Script);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Script> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let name: String = row.try_get("name")?;
        let steps_json: String = row.try_get("steps")?;
        let acl: Option<String> = row.try_get("acl")?;

        let steps: Steps = serde_json::from_str(&steps_json).map_err(decode_error)?;

        Ok(Self(Script { name, steps, acl }))
    }
}

const INSERT: &str = "INSERT INTO control_script (name, steps, acl) VALUES (?, ?, ?)";
const SELECT_BY_NAME: &str = "SELECT * FROM control_script WHERE name = ?";
const SELECT_ALL: &str = "SELECT * FROM control_script ORDER BY name";
const SELECT_BY_ACL: &str = "SELECT * FROM control_script WHERE acl = ? ORDER BY name";

// NULL parameters keep the stored column.
const UPDATE: &str = r"
    UPDATE control_script
    SET steps = COALESCE(?, steps), acl = COALESCE(?, acl)
    WHERE name = ?
";

const DELETE_BY_NAME: &str = "DELETE FROM control_script WHERE name = ?";

/// `SQLite`-backed automation script repository.
pub struct SqliteScriptRepository {
    pool: SqlitePool,
}

impl SqliteScriptRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScriptRepository for SqliteScriptRepository {
    async fn create(&self, script: Script) -> Result<Script, ControlHubError> {
        let steps_json = serde_json::to_string(&script.steps).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(&script.name)
            .bind(&steps_json)
            .bind(script.acl.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                unique_violation_or_storage(err, || ConflictError::DuplicateScript {
                    name: script.name.clone(),
                })
            })?;

        Ok(script)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Script>, ControlHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Script>, ControlHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_by_acl(&self, acl: &str) -> Result<Vec<Script>, ControlHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ACL)
            .bind(acl)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, name: &str, update: &ScriptUpdate) -> Result<(), ControlHubError> {
        let steps_json = update
            .steps
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(steps_json)
            .bind(update.acl.as_deref())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ControlHubError> {
        sqlx::query(DELETE_BY_NAME)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use serde_json::{Value, json};

    async fn setup() -> SqliteScriptRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteScriptRepository::new(db.pool().clone())
    }

    fn script(value: Value) -> Script {
        Script::from_payload(&value).unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_script_without_acl() {
        let repo = setup().await;
        repo.create(script(json!({"name": "test", "steps": []})))
            .await
            .unwrap();

        let fetched = repo.get_by_name("test").await.unwrap().unwrap();
        assert!(fetched.acl.is_none());
        assert_eq!(
            serde_json::to_value(&fetched).unwrap(),
            json!({"name": "test", "steps": []})
        );
    }

    #[tokio::test]
    async fn should_preserve_step_order_and_extra_keys() {
        let repo = setup().await;
        let steps = json!([
            {"write": {"order": 1, "service": "sine", "values": {"sinusoid": "$x$"}}},
            {"delay": {"order": 0, "duration": 9003}},
            {"configure": {"order": 2, "category": "rand", "name": "interval", "value": "5"}}
        ]);
        repo.create(script(json!({"name": "test", "steps": steps.clone(), "acl": ""})))
            .await
            .unwrap();

        let fetched = repo.get_by_name("test").await.unwrap().unwrap();
        assert_eq!(fetched.steps.to_value(), steps);
        assert_eq!(fetched.acl.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn should_map_primary_key_collision_to_duplicate_conflict() {
        let repo = setup().await;
        repo.create(script(json!({"name": "test", "steps": []})))
            .await
            .unwrap();

        let result = repo
            .create(script(json!({"name": "test", "steps": [{"delay": {"order": 0}}]})))
            .await;
        assert!(matches!(
            result,
            Err(ControlHubError::Conflict(ConflictError::DuplicateScript { .. }))
        ));
        let fetched = repo.get_by_name("test").await.unwrap().unwrap();
        assert!(fetched.steps.is_empty());
    }

    #[tokio::test]
    async fn should_only_write_supplied_fields_on_update() {
        let repo = setup().await;
        repo.create(script(json!({"name": "test", "steps": [{"delay": {"order": 0}}], "acl": "a"})))
            .await
            .unwrap();

        let update = ScriptUpdate::from_payload(&json!({"acl": "b"})).unwrap();
        repo.update("test", &update).await.unwrap();
        let fetched = repo.get_by_name("test").await.unwrap().unwrap();
        assert_eq!(fetched.acl.as_deref(), Some("b"));
        assert_eq!(fetched.steps.len(), 1);

        let update = ScriptUpdate::from_payload(&json!({"steps": []})).unwrap();
        repo.update("test", &update).await.unwrap();
        let fetched = repo.get_by_name("test").await.unwrap().unwrap();
        assert!(fetched.steps.is_empty());
        assert_eq!(fetched.acl.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn should_find_scripts_by_acl() {
        let repo = setup().await;
        repo.create(script(json!({"name": "one", "steps": [], "acl": "testACL"})))
            .await
            .unwrap();
        repo.create(script(json!({"name": "two", "steps": []})))
            .await
            .unwrap();

        let found = repo.get_by_acl("testACL").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "one");
    }

    #[tokio::test]
    async fn should_delete_script() {
        let repo = setup().await;
        repo.create(script(json!({"name": "test", "steps": []})))
            .await
            .unwrap();

        repo.delete("test").await.unwrap();
        assert!(repo.get_by_name("test").await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
