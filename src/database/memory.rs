//! In-process drink storage, used by tests and local demos without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, NewDrink};
use crate::database::repository::{decode_row, DrinkRepository};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, DrinkRow>,
}

impl Table {
    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|row| row.title == title && Some(row.id) != except)
    }
}

/// Keeps rows in their stored form so recipes go through the same text
/// encoding as the Postgres table.
#[derive(Default)]
pub struct MemoryDrinkRepository {
    table: RwLock<Table>,
}

impl MemoryDrinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(title: &str) -> DatabaseError {
    DatabaseError::Conflict(format!("drink titled '{}' already exists", title))
}

#[async_trait]
impl DrinkRepository for MemoryDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        let table = self.table.read().await;
        table.rows.values().cloned().map(decode_row).collect()
    }

    async fn get(&self, id: i32) -> Result<Option<Drink>, DatabaseError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().map(decode_row).transpose()
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError> {
        let recipe = drink.recipe.encode()?;
        let mut table = self.table.write().await;

        if table.title_taken(&drink.title, None) {
            return Err(conflict(&drink.title));
        }

        table.next_id += 1;
        let row = DrinkRow {
            id: table.next_id,
            title: drink.title,
            recipe,
        };
        table.rows.insert(row.id, row.clone());
        decode_row(row)
    }

    async fn update(&self, id: i32, drink: NewDrink) -> Result<Option<Drink>, DatabaseError> {
        let recipe = drink.recipe.encode()?;
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.title_taken(&drink.title, Some(id)) {
            return Err(conflict(&drink.title));
        }

        let row = DrinkRow {
            id,
            title: drink.title,
            recipe,
        };
        table.rows.insert(id, row.clone());
        decode_row(row).map(Some)
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
