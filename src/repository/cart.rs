use std::collections::HashSet;

use diesel::prelude::*;

use crate::domain::shopping_list::CartLine;
use crate::models::cart_item::NewCartItem;
use crate::repository::{
    CartReader, CartWriter, DieselRepository, RepositoryError, RepositoryResult,
};

impl CartReader for DieselRepository {
    fn is_in_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id))
                .filter(cart_items::recipe_id.eq(recipe_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn cart_recipe_ids(&self, user_id: i32, recipe_ids: &[i32]) -> RepositoryResult<HashSet<i32>> {
        use crate::schema::cart_items;

        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.conn()?;
        let ids = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .filter(cart_items::recipe_id.eq_any(recipe_ids))
            .select(cart_items::recipe_id)
            .load::<i32>(&mut conn)?;

        Ok(ids.into_iter().collect())
    }

    fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>> {
        use crate::schema::{cart_items, ingredients, recipe_ingredients};

        let mut conn = self.conn()?;

        let cart_recipes = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .select(cart_items::recipe_id);

        let rows = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
            .order(recipe_ingredients::id.asc())
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load::<(String, String, f64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(name, measurement_unit, amount)| CartLine::new(name, measurement_unit, amount))
            .collect())
    }
}

impl CartWriter for DieselRepository {
    fn add_to_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        diesel::insert_into(cart_items::table)
            .values(&NewCartItem { user_id, recipe_id })
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_from_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let target = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .filter(cart_items::recipe_id.eq(recipe_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
