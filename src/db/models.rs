use serde::{Deserialize, Serialize};

/// One ingredient of a recipe: name, color and how many parts go in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// A titled recipe made of ingredients. `id` is store-assigned and never
/// reused once freed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Ingredient projection for the public listing: amount withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIngredient {
    pub name: String,
    pub color: String,
}

/// Public view of a drink. A strict field-subset of [`LongDrink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full view of a drink, exposing every ingredient field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    name: i.name.clone(),
                    color: i.color.clone(),
                })
                .collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}
