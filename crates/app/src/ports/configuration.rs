//! Configuration manager port: named categories and their nesting.

use std::future::Future;
use std::sync::Arc;

use controlhub_domain::category::Category;
use controlhub_domain::error::ControlHubError;

/// Stores configuration [`Category`]s and the parent → children links
/// between them.
pub trait ConfigurationManager {
    /// Get a category with all of its items.
    fn get_category_all_items(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, ControlHubError>> + Send;

    /// Create `category`, replacing the items of an existing one with the same
    /// name.
    fn create_category(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send;

    /// Link `children` under `parent` and return every child of `parent`.
    ///
    /// Fails with a not-found error when `parent` or a child does not exist.
    fn create_child_category(
        &self,
        parent: &str,
        children: &[String],
    ) -> impl Future<Output = Result<Vec<String>, ControlHubError>> + Send;

    /// Delete `name` together with every category below it.
    fn delete_category_and_children_recursively(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send;
}

impl<T: ConfigurationManager + Send + Sync> ConfigurationManager for Arc<T> {
    fn get_category_all_items(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, ControlHubError>> + Send {
        (**self).get_category_all_items(name)
    }

    fn create_category(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        (**self).create_category(category)
    }

    fn create_child_category(
        &self,
        parent: &str,
        children: &[String],
    ) -> impl Future<Output = Result<Vec<String>, ControlHubError>> + Send {
        (**self).create_child_category(parent, children)
    }

    fn delete_category_and_children_recursively(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        (**self).delete_category_and_children_recursively(name)
    }
}
