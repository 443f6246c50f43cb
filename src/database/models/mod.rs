pub mod drink;

pub use drink::{
    Drink, DrinkLong, DrinkPayload, DrinkRow, DrinkShort, Ingredient, IngredientShort, NewDrink,
    PayloadError, Recipe,
};
