use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, NewDrink};

/// Storage for drinks. Each call is a single-row (or full-table read) operation.
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError>;

    async fn get(&self, id: i32) -> Result<Option<Drink>, DatabaseError>;

    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError>;

    /// `None` when no drink has `id`
    async fn update(&self, id: i32, drink: NewDrink) -> Result<Option<Drink>, DatabaseError>;

    /// `false` when no drink has `id`
    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub(crate) fn decode_row(row: DrinkRow) -> Result<Drink, DatabaseError> {
    let id = row.id;
    Drink::try_from(row).map_err(|source| DatabaseError::CorruptRecipe { id, source })
}

pub struct PgDrinkRepository {
    pool: PgPool,
}

impl PgDrinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrinkRepository for PgDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(decode_row)
            .collect()
    }

    async fn get(&self, id: i32) -> Result<Option<Drink>, DatabaseError> {
        sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode_row)
            .transpose()
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError> {
        let recipe = drink.recipe.encode()?;

        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(&drink.title)
        .bind(recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;

        decode_row(row)
    }

    async fn update(&self, id: i32, drink: NewDrink) -> Result<Option<Drink>, DatabaseError> {
        let recipe = drink.recipe.encode()?;

        sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = $1, recipe = $2 WHERE id = $3 RETURNING id, title, recipe",
        )
        .bind(&drink.title)
        .bind(recipe)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?
        .map(decode_row)
        .transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
