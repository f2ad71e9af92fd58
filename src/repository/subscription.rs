use std::collections::HashSet;

use diesel::prelude::*;

use crate::domain::user::User as DomainUser;
use crate::models::subscription::NewSubscription;
use crate::models::user::User as DbUser;
use crate::pagination::Pagination;
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, SubscriptionReader, SubscriptionWriter,
};

impl SubscriptionReader for DieselRepository {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::author_id.eq(author_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn subscribed_author_ids(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>> {
        use crate::schema::subscriptions;

        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.conn()?;
        let ids = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq_any(author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(&mut conn)?;

        Ok(ids.into_iter().collect())
    }

    fn list_subscriptions(
        &self,
        user_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let followed = subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .select(subscriptions::author_id);
            users::table
                .filter(users::id.eq_any(followed))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((users::username.asc(), users::id.asc()));

        if let Some(pagination) = &pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let db_users = items.load::<DbUser>(&mut conn)?;

        Ok((total, db_users.into_iter().map(Into::into).collect()))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn subscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        diesel::insert_into(subscriptions::table)
            .values(&NewSubscription { user_id, author_id })
            .execute(&mut conn)?;

        Ok(())
    }

    fn unsubscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let target = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq(author_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
