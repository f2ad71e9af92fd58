use diesel::prelude::*;

use crate::{
    domain::ingredient::{
        Ingredient as DomainIngredient, IngredientListQuery, NewIngredient as DomainNewIngredient,
    },
    models::ingredient::{Ingredient as DbIngredient, NewIngredient as DbNewIngredient},
    repository::{
        DieselRepository, IngredientReader, IngredientWriter, LIKE_ESCAPE, RepositoryError,
        RepositoryResult, prefix_pattern,
    },
};

impl IngredientReader for DieselRepository {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let ingredient = ingredients::table
            .find(id)
            .first::<DbIngredient>(&mut conn)
            .optional()?;

        Ok(ingredient.map(Into::into))
    }

    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainIngredient>)> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = ingredients::table.into_boxed::<diesel::sqlite::Sqlite>();

            // SQLite LIKE is case-insensitive for ASCII letters.
            if let Some(prefix) = &query.name_prefix {
                items = items.filter(
                    ingredients::name
                        .like(prefix_pattern(prefix))
                        .escape(LIKE_ESCAPE),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((ingredients::name.asc(), ingredients::id.asc()));

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let db_ingredients = items.load::<DbIngredient>(&mut conn)?;

        Ok((total, db_ingredients.into_iter().map(Into::into).collect()))
    }
}

impl IngredientWriter for DieselRepository {
    fn create_ingredient(
        &self,
        new_ingredient: &DomainNewIngredient,
    ) -> RepositoryResult<DomainIngredient> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let insertable = DbNewIngredient::from(new_ingredient);

        let created = diesel::insert_into(ingredients::table)
            .values(&insertable)
            .get_result::<DbIngredient>(&mut conn)?;

        Ok(created.into())
    }

    fn create_ingredients(
        &self,
        new_ingredients: &[DomainNewIngredient],
    ) -> RepositoryResult<usize> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_ingredients {
                let db_new = DbNewIngredient::from(new);

                diesel::insert_into(ingredients::table)
                    .values(&db_new)
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }
}
