//! `SQLite` implementation of [`AclRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use controlhub_app::ports::AclRepository;
use controlhub_domain::acl::Acl;
use controlhub_domain::error::{ConflictError, ControlHubError};

use crate::error::{StorageError, decode_error, unique_violation_or_storage};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Acl);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Acl> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let name: String = row.try_get("name")?;
        let service_json: String = row.try_get("service")?;
        let url_json: String = row.try_get("url")?;

        let service = serde_json::from_str(&service_json).map_err(decode_error)?;
        let url = serde_json::from_str(&url_json).map_err(decode_error)?;

        Ok(Self(Acl { name, service, url }))
    }
}

const INSERT: &str = "INSERT INTO control_acl (name, service, url) VALUES (?, ?, ?)";
const SELECT_BY_NAME: &str = "SELECT * FROM control_acl WHERE name = ?";
const SELECT_ALL: &str = "SELECT * FROM control_acl ORDER BY name";
const UPDATE: &str = "UPDATE control_acl SET service = ?, url = ? WHERE name = ?";
const DELETE_BY_NAME: &str = "DELETE FROM control_acl WHERE name = ?";

/// `SQLite`-backed ACL repository.
pub struct SqliteAclRepository {
    pool: SqlitePool,
}

impl SqliteAclRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn encode(acl: &Acl) -> Result<(String, String), StorageError> {
    Ok((
        serde_json::to_string(&acl.service)?,
        serde_json::to_string(&acl.url)?,
    ))
}

impl AclRepository for SqliteAclRepository {
    async fn create(&self, acl: Acl) -> Result<Acl, ControlHubError> {
        let (service_json, url_json) = encode(&acl)?;

        sqlx::query(INSERT)
            .bind(&acl.name)
            .bind(&service_json)
            .bind(&url_json)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                unique_violation_or_storage(err, || ConflictError::DuplicateAcl {
                    name: acl.name.clone(),
                })
            })?;

        Ok(acl)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Acl>, ControlHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Acl>, ControlHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, acl: Acl) -> Result<Acl, ControlHubError> {
        let (service_json, url_json) = encode(&acl)?;

        sqlx::query(UPDATE)
            .bind(&service_json)
            .bind(&url_json)
            .bind(&acl.name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(acl)
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
    use serde_json::json;

    async fn setup() -> SqliteAclRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAclRepository::new(db.pool().clone())
    }

    fn acl(name: &str) -> Acl {
        Acl::from_payload(&json!({
            "name": name,
            "service": [{"name": "IEC-104"}, {"type": "notification"}],
            "url": [{"URL": "/api/south/operation"}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_acl() {
        let repo = setup().await;
        repo.create(acl("testACL")).await.unwrap();

        let fetched = repo.get_by_name("testACL").await.unwrap().unwrap();
        assert_eq!(fetched, acl("testACL"));
    }

    #[tokio::test]
    async fn should_return_none_when_acl_not_found() {
        let repo = setup().await;
        assert!(repo.get_by_name("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_map_primary_key_collision_to_duplicate_conflict() {
        let repo = setup().await;
        repo.create(acl("testACL")).await.unwrap();

        let result = repo.create(acl("testACL")).await;
        assert!(matches!(
            result,
            Err(ControlHubError::Conflict(ConflictError::DuplicateAcl { ref name })) if name == "testACL"
        ));
    }

    #[tokio::test]
    async fn should_list_acls_by_name() {
        let repo = setup().await;
        repo.create(acl("b")).await.unwrap();
        repo.create(acl("a")).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|acl| acl.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn should_update_rules() {
        let repo = setup().await;
        repo.create(acl("testACL")).await.unwrap();

        let mut updated = acl("testACL");
        updated.url.clear();
        repo.update(updated).await.unwrap();

        let fetched = repo.get_by_name("testACL").await.unwrap().unwrap();
        assert!(fetched.url.is_empty());
        assert_eq!(fetched.service.len(), 2);
    }

    #[tokio::test]
    async fn should_delete_acl() {
        let repo = setup().await;
        repo.create(acl("testACL")).await.unwrap();

        repo.delete("testACL").await.unwrap();
        assert!(repo.get_by_name("testACL").await.unwrap().is_none());
    }
}
