use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::recipe::{
        IngredientAmount, NewRecipe as DomainNewRecipe, Recipe as DomainRecipe,
        RecipeIngredient as DomainRecipeIngredient, RecipeListQuery,
        UpdateRecipe as DomainUpdateRecipe,
    },
    domain::tag::Tag as DomainTag,
    models::recipe::{
        NewRecipe as DbNewRecipe, Recipe as DbRecipe, UpdateRecipe as DbUpdateRecipe,
    },
    models::recipe_ingredient::NewRecipeIngredient,
    models::recipe_tag::NewRecipeTag,
    models::tag::Tag as DbTag,
    repository::{
        DieselRepository, LIKE_ESCAPE, RecipeReader, RecipeWriter, RepositoryError,
        RepositoryResult, prefix_pattern,
    },
};

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<DomainRecipe>> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let recipe = recipes::table
            .find(id)
            .first::<DbRecipe>(&mut conn)
            .optional()?;

        match recipe {
            Some(recipe) => Ok(attach_relations(&mut conn, vec![recipe])?.pop()),
            None => Ok(None),
        }
    }

    fn list_recipes(
        &self,
        query: RecipeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainRecipe>)> {
        use crate::schema::{cart_items, favorites, recipe_tags, recipes, tags};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = recipes::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(author_id) = query.author_id {
                items = items.filter(recipes::author_id.eq(author_id));
            }

            if !query.tag_slugs.is_empty() {
                let tagged = recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(&query.tag_slugs))
                    .select(recipe_tags::recipe_id);
                items = items.filter(recipes::id.eq_any(tagged));
            }

            if let Some(filter) = query.favorited {
                let favorite_ids = favorites::table
                    .filter(favorites::user_id.eq(filter.user_id))
                    .select(favorites::recipe_id);
                items = if filter.is_member {
                    items.filter(recipes::id.eq_any(favorite_ids))
                } else {
                    items.filter(recipes::id.ne_all(favorite_ids))
                };
            }

            if let Some(filter) = query.in_shopping_cart {
                let cart_ids = cart_items::table
                    .filter(cart_items::user_id.eq(filter.user_id))
                    .select(cart_items::recipe_id);
                items = if filter.is_member {
                    items.filter(recipes::id.eq_any(cart_ids))
                } else {
                    items.filter(recipes::id.ne_all(cart_ids))
                };
            }

            if let Some(prefix) = &query.search {
                items = items.filter(
                    recipes::name
                        .like(prefix_pattern(prefix))
                        .escape(LIKE_ESCAPE),
                );
            }

            items
        };

        // Get the total count before applying pagination
        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(recipes::id.desc());

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let db_recipes = items.load::<DbRecipe>(&mut conn)?;

        if db_recipes.is_empty() {
            return Ok((total, Vec::new()));
        }

        Ok((total, attach_relations(&mut conn, db_recipes)?))
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(&self, new_recipe: &DomainNewRecipe) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_new = DbNewRecipe::from(new_recipe);

            let created = diesel::insert_into(recipes::table)
                .values(&db_new)
                .get_result::<DbRecipe>(conn)?;

            insert_quantities(conn, created.id, &new_recipe.ingredients)?;
            insert_tags(conn, created.id, &new_recipe.tag_ids)?;

            load_recipe(conn, created.id)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::{recipe_ingredients, recipe_tags, recipes};

        let mut conn = self.conn()?;

        // The row update and both replacements commit or roll back together.
        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateRecipe::from(updates);

            let updated = diesel::update(recipes::table.find(recipe_id))
                .set(&db_updates)
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            insert_quantities(conn, recipe_id, &updates.ingredients)?;

            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            insert_tags(conn, recipe_id, &updates.tag_ids)?;

            load_recipe(conn, recipe_id)
        })
    }

    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        // Quantities, tag links, favorites and cart entries go with it (ON DELETE CASCADE).
        let deleted = diesel::delete(recipes::table.find(recipe_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn load_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> RepositoryResult<DomainRecipe> {
    use crate::schema::recipes;

    let recipe = recipes::table.find(recipe_id).first::<DbRecipe>(conn)?;
    attach_relations(conn, vec![recipe])?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

fn attach_relations(
    conn: &mut SqliteConnection,
    rows: Vec<DbRecipe>,
) -> RepositoryResult<Vec<DomainRecipe>> {
    let recipe_ids: Vec<i32> = rows.iter().map(|recipe| recipe.id).collect();
    let mut quantities = load_quantities(conn, &recipe_ids)?;
    let mut tags = load_tags(conn, &recipe_ids)?;

    let recipes = rows
        .into_iter()
        .map(|row| {
            let mut recipe: DomainRecipe = row.into();
            recipe.ingredients = quantities.remove(&recipe.id).unwrap_or_default();
            recipe.tags = tags.remove(&recipe.id).unwrap_or_default();
            recipe
        })
        .collect();

    Ok(recipes)
}

fn load_quantities(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainRecipeIngredient>>> {
    use crate::schema::{ingredients, recipe_ingredients};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load::<(i32, i32, String, String, f64)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainRecipeIngredient>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in rows {
        map.entry(recipe_id).or_default().push(DomainRecipeIngredient {
            id,
            name,
            measurement_unit,
            amount,
        });
    }

    Ok(map)
}

fn load_tags(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{recipe_tags, tags};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in rows {
        map.entry(recipe_id).or_default().push(tag.into());
    }

    Ok(map)
}

fn insert_quantities(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    amounts: &[IngredientAmount],
) -> RepositoryResult<()> {
    use crate::schema::{ingredients, recipe_ingredients};

    if amounts.is_empty() {
        return Ok(());
    }

    let requested: Vec<i32> = amounts.iter().map(|amount| amount.ingredient_id).collect();
    let known: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&requested))
        .select(ingredients::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();

    if let Some(missing) = requested.iter().find(|id| !known.contains(id)) {
        return Err(RepositoryError::ConstraintViolation(format!(
            "ingredient {missing} does not exist"
        )));
    }

    let rows: Vec<NewRecipeIngredient> = amounts
        .iter()
        .map(|amount| NewRecipeIngredient::new(recipe_id, amount))
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn insert_tags(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    tag_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::{recipe_tags, tags};

    if tag_ids.is_empty() {
        return Ok(());
    }

    let known: HashSet<i32> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();

    if let Some(missing) = tag_ids.iter().find(|id| !known.contains(id)) {
        return Err(RepositoryError::ConstraintViolation(format!(
            "tag {missing} does not exist"
        )));
    }

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}
