/*
 * Responsibility
 * - Drink request/response DTOs
 * - Two recipe projections: the public short form omits ingredient names,
 *   the long form (barista-only) carries everything
 */
use serde::{Deserialize, Serialize};

use crate::repos::drink_repo::DrinkRow;

/// One ingredient of a drink recipe, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipePart {
    pub color: String,
    pub name: String,
    pub parts: i32,
}

/// Public projection of a recipe part: color and proportion only.
#[derive(Debug, Serialize)]
pub struct RecipePartShort {
    pub color: String,
    pub parts: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.recipe.is_empty() {
            return Err("recipe must have at least one part");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipePart>>,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(recipe) = &self.recipe
            && recipe.is_empty()
        {
            return Err("recipe must have at least one part");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePartShort>,
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl DrinkShort {
    pub fn from_row(row: DrinkRow) -> Result<Self, serde_json::Error> {
        let recipe: Vec<RecipePart> = serde_json::from_str(&row.recipe)?;
        Ok(Self {
            id: row.drink_id,
            title: row.title,
            recipe: recipe
                .into_iter()
                .map(|p| RecipePartShort {
                    color: p.color,
                    parts: p.parts,
                })
                .collect(),
        })
    }
}

impl DrinkLong {
    pub fn from_row(row: DrinkRow) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: row.drink_id,
            title: row.title,
            recipe: serde_json::from_str(&row.recipe)?,
        })
    }
}

/// Envelope the frontend expects on every drinks response.
#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> DrinkRow {
        DrinkRow {
            drink_id: 7,
            title: "matcha latte".to_string(),
            recipe: r#"[{"color": "green", "name": "matcha", "parts": 1},
                        {"color": "white", "name": "milk", "parts": 3}]"#
                .to_string(),
        }
    }

    #[test]
    fn short_projection_drops_ingredient_names() {
        let short = DrinkShort::from_row(row()).expect("valid recipe json");
        let json = serde_json::to_value(&short).expect("serialize");

        assert_eq!(json["recipe"][0]["color"], "green");
        assert_eq!(json["recipe"][0]["parts"], 1);
        assert!(json["recipe"][0].get("name").is_none());
    }

    #[test]
    fn long_projection_keeps_everything() {
        let long = DrinkLong::from_row(row()).expect("valid recipe json");
        assert_eq!(long.recipe.len(), 2);
        assert_eq!(long.recipe[1].name, "milk");
    }

    #[test]
    fn corrupt_recipe_json_is_an_error() {
        let mut bad = row();
        bad.recipe = "not json".to_string();
        assert!(DrinkShort::from_row(bad).is_err());
    }

    #[test]
    fn create_request_validation() {
        let req = CreateDrinkRequest {
            title: " ".to_string(),
            recipe: vec![],
        };
        assert!(req.validate().is_err());

        let req = CreateDrinkRequest {
            title: "water".to_string(),
            recipe: vec![RecipePart {
                color: "blue".to_string(),
                name: "water".to_string(),
                parts: 1,
            }],
        };
        assert!(req.validate().is_ok());
    }
}
