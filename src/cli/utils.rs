use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Drink;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// One-line text rendering, e.g. `#2 mocha: espresso (brown) x1, chocolate (brown) x2`
pub fn describe_drink(drink: &Drink, detail: bool) -> String {
    let ingredients: Vec<String> = drink
        .recipe
        .ingredients()
        .iter()
        .map(|i| {
            if detail {
                format!("{} ({}) x{}", i.name, i.color, i.parts)
            } else {
                format!("{} ({})", i.name, i.color)
            }
        })
        .collect();

    format!("#{} {}: {}", drink.id, drink.title, ingredients.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Ingredient, Recipe};

    #[test]
    fn describes_drink_with_and_without_quantities() {
        let drink = Drink {
            id: 2,
            title: "cortado".to_string(),
            recipe: Recipe::new(vec![
                Ingredient { name: "espresso".into(), color: "brown".into(), parts: 1 },
                Ingredient { name: "milk".into(), color: "white".into(), parts: 1 },
            ]),
        };

        assert_eq!(describe_drink(&drink, false), "#2 cortado: espresso (brown), milk (white)");
        assert_eq!(
            describe_drink(&drink, true),
            "#2 cortado: espresso (brown) x1, milk (white) x1"
        );
    }
}
