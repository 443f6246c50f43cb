use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

/// Longest title the `drinks` table accepts
pub const MAX_TITLE_LEN: usize = 80;

/// One layer of a drink: what goes in, how it is drawn, and how much of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Public projection of an ingredient, quantities removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientShort {
    pub name: String,
    pub color: String,
}

/// Ordered ingredient list. Accepts a lone ingredient object on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<Ingredient>),
            One(Ingredient),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(items) => Recipe(items),
            OneOrMany::One(item) => Recipe(vec![item]),
        })
    }
}

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Recipe(ingredients)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text form stored in the `recipe` column
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn short(&self) -> Vec<IngredientShort> {
        self.0
            .iter()
            .map(|i| IngredientShort {
                name: i.name.clone(),
                color: i.color.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Recipe,
}

/// Public menu view
#[derive(Debug, Clone, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

/// Staff view with the full recipe
#[derive(Debug, Clone, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Recipe,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.short(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

/// Row as stored, recipe still encoded
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = serde_json::Error;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe: Recipe::decode(&row.recipe)?,
        })
    }
}

/// Validated fields for an insert or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("title and recipe are required")]
    MissingField,

    #[error("{0}")]
    Malformed(String),
}

/// Request body for POST /drinks and PATCH /drinks/:id
#[derive(Debug, Default, Deserialize)]
pub struct DrinkPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Value>,
}

impl DrinkPayload {
    pub fn validate(self) -> Result<NewDrink, PayloadError> {
        let title = self.title.map(|t| t.trim().to_string()).unwrap_or_default();
        let recipe = self.recipe.unwrap_or(Value::Null);

        if title.is_empty() || is_blank(&recipe) {
            return Err(PayloadError::MissingField);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(PayloadError::Malformed(format!(
                "title longer than {} characters",
                MAX_TITLE_LEN
            )));
        }

        let recipe: Recipe = serde_json::from_value(recipe)
            .map_err(|e| PayloadError::Malformed(format!("invalid recipe: {}", e)))?;

        Ok(NewDrink { title, recipe })
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
