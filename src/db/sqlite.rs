use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use crate::db::models::{Drink, Ingredient};
use crate::db::schema::SQLITE_INIT;
use crate::error::BaristaError;

pub type SqlitePool = Pool<Sqlite>;

/// SQLite-backed drink store. Handlers go through this type for every
/// storage mutation; isolation between concurrent requests is left to the
/// database.
#[derive(Clone)]
pub struct DrinkStore {
    pool: SqlitePool,
}

impl DrinkStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (and create if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, BaristaError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Initialize the schema by executing the bundled DDL. Idempotent.
    pub async fn init_schema(&self) -> Result<(), BaristaError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// All drinks, in no guaranteed order.
    pub async fn list(&self) -> Result<Vec<Drink>, BaristaError> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drinks")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Drink>, BaristaError> {
        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Persist a new drink and return it with its assigned id.
    pub async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, BaristaError> {
        let recipe_json = serde_json::to_string(recipe)?;
        let result = sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
            .bind(title)
            .bind(&recipe_json)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        debug!(id, title, "inserted drink");
        Ok(Drink {
            id,
            title: title.to_string(),
            recipe: recipe.to_vec(),
        })
    }

    /// Overwrite only the provided fields. Skips the write entirely when
    /// both are `None`.
    pub async fn update(
        &self,
        id: i64,
        new_title: Option<String>,
        new_recipe: Option<Vec<Ingredient>>,
    ) -> Result<Drink, BaristaError> {
        let mut drink = self.get(id).await?.ok_or(BaristaError::NotFound)?;

        let dirty = new_title.is_some() || new_recipe.is_some();
        if let Some(title) = new_title {
            drink.title = title;
        }
        if let Some(recipe) = new_recipe {
            drink.recipe = recipe;
        }
        if dirty {
            let recipe_json = serde_json::to_string(&drink.recipe)?;
            sqlx::query("UPDATE drinks SET title = ?, recipe = ? WHERE id = ?")
                .bind(&drink.title)
                .bind(&recipe_json)
                .bind(id)
                .execute(&self.pool)
                .await?;
            debug!(id, "updated drink");
        }
        Ok(drink)
    }

    /// Hard delete. The id is never handed out again (AUTOINCREMENT).
    pub async fn delete(&self, id: i64) -> Result<(), BaristaError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BaristaError::NotFound);
        }
        debug!(id, "deleted drink");
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<Drink, BaristaError> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let recipe_json: String = row.try_get("recipe")?;
        let recipe: Vec<Ingredient> =
            serde_json::from_str(&recipe_json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Drink { id, title, recipe })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> DrinkStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let store = DrinkStore::new(pool);
        store.init_schema().await.expect("schema init");
        store
    }

    fn water() -> Vec<Ingredient> {
        vec![Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }]
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let store = memory_store().await;
        store.init_schema().await.expect("second init");
        store.insert("Water", &water()).await.expect("insert");
        store.init_schema().await.expect("third init");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_then_list_round_trips() {
        let store = memory_store().await;
        let inserted = store.insert("Water", &water()).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![inserted]);
    }

    #[tokio::test]
    async fn update_title_only_leaves_recipe_untouched() {
        let store = memory_store().await;
        let drink = store.insert("Water", &water()).await.unwrap();
        let updated = store
            .update(drink.id, Some("Sparkling Water".to_string()), None)
            .await
            .unwrap();
        assert_eq!(updated.title, "Sparkling Water");
        assert_eq!(updated.recipe, drink.recipe);

        let fetched = store.get(drink.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_no_op() {
        let store = memory_store().await;
        let drink = store.insert("Water", &water()).await.unwrap();
        let unchanged = store.update(drink.id, None, None).await.unwrap();
        assert_eq!(unchanged, drink);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_store_unchanged() {
        let store = memory_store().await;
        store.insert("Water", &water()).await.unwrap();
        let err = store
            .update(9999, Some("Nope".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BaristaError::NotFound));
        assert_eq!(store.list().await.unwrap()[0].title, "Water");
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = memory_store().await;
        let drink = store.insert("Water", &water()).await.unwrap();
        store.delete(drink.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get(drink.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let store = memory_store().await;
        let err = store.delete(42).await.unwrap_err();
        assert!(matches!(err, BaristaError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_title_violates_unique_constraint() {
        let store = memory_store().await;
        store.insert("Water", &water()).await.unwrap();
        let err = store.insert("Water", &water()).await.unwrap_err();
        assert!(matches!(err, BaristaError::Database(_)));
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = memory_store().await;
        let first = store.insert("Water", &water()).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert("Tonic", &water()).await.unwrap();
        assert!(second.id > first.id);
    }
}
