use std::collections::HashSet;

use diesel::prelude::*;

use crate::models::favorite::NewFavorite;
use crate::repository::{
    DieselRepository, FavoriteReader, FavoriteWriter, RepositoryError, RepositoryResult,
};

impl FavoriteReader for DieselRepository {
    fn is_favorited(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool> {
        use crate::schema::favorites;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(recipe_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn favorited_recipe_ids(
        &self,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>> {
        use crate::schema::favorites;

        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.conn()?;
        let ids = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq_any(recipe_ids))
            .select(favorites::recipe_id)
            .load::<i32>(&mut conn)?;

        Ok(ids.into_iter().collect())
    }
}

impl FavoriteWriter for DieselRepository {
    fn add_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::favorites;

        let mut conn = self.conn()?;
        diesel::insert_into(favorites::table)
            .values(&NewFavorite { user_id, recipe_id })
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::favorites;

        let mut conn = self.conn()?;
        let target = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
