use diesel::prelude::*;

use crate::domain::recipe::IngredientAmount;

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::recipe_ingredients,
    belongs_to(super::recipe::Recipe, foreign_key = recipe_id),
    belongs_to(super::ingredient::Ingredient, foreign_key = ingredient_id)
)]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: f64,
}

impl NewRecipeIngredient {
    pub fn new(recipe_id: i32, value: &IngredientAmount) -> Self {
        Self {
            recipe_id,
            ingredient_id: value.ingredient_id,
            amount: value.amount,
        }
    }
}
