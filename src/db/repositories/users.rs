use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::models::user::{NewUser, User, UserChangeset, UserFilter, UserSortKey};
use crate::schema::users;
use crate::utils::ListParams;

pub struct UsersRepo;

impl UsersRepo {
    fn filtered<'a>(params: &ListParams<UserSortKey>, filter: &UserFilter) -> users::BoxedQuery<'a, Pg> {
        let mut query = users::table.into_boxed();
        if let Some(pattern) = params.search_pattern() {
            query = query.filter(
                users::name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }
        if let Some(role) = filter.role {
            query = query.filter(users::role.eq(role));
        }
        query
    }

    pub fn list(
        conn: &mut PgConnection,
        params: &ListParams<UserSortKey>,
        filter: &UserFilter,
    ) -> QueryResult<(Vec<User>, i64)> {
        let total = Self::filtered(params, filter).count().get_result::<i64>(conn)?;

        let query = Self::filtered(params, filter);
        let query = match params.sort {
            UserSortKey::Name => sort_by!(query, users::name, params.order),
            UserSortKey::Email => sort_by!(query, users::email, params.order),
            UserSortKey::Role => sort_by!(query, users::role, params.order),
            UserSortKey::CreatedAt => sort_by!(query, users::created_at, params.order),
        };
        let rows = query
            .then_order_by(users::id.asc())
            .limit(params.per_page)
            .offset(params.offset())
            .select(User::as_select())
            .load(conn)?;
        Ok((rows, total))
    }

    pub fn find_by_id(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Option<User>> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_many(conn: &mut PgConnection, ids: &[Uuid]) -> QueryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        users::table
            .filter(users::id.eq_any(ids))
            .select(User::as_select())
            .load(conn)
    }

    pub fn all(conn: &mut PgConnection) -> QueryResult<Vec<User>> {
        users::table
            .order(users::created_at.asc())
            .select(User::as_select())
            .load(conn)
    }

    pub fn email_taken(conn: &mut PgConnection, email: &str, except: Option<Uuid>) -> QueryResult<bool> {
        let mut query = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .into_boxed();
        if let Some(id) = except {
            query = query.filter(users::id.ne(id));
        }
        diesel::select(diesel::dsl::exists(query)).get_result(conn)
    }

    pub fn insert(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn update(conn: &mut PgConnection, user_id: Uuid, changes: &UserChangeset) -> QueryResult<User> {
        diesel::update(users::table.find(user_id))
            .set(changes)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn set_role(conn: &mut PgConnection, user_id: Uuid, role: UserRole) -> QueryResult<usize> {
        diesel::update(users::table.find(user_id))
            .set((users::role.eq(role), users::updated_at.eq(chrono::Utc::now())))
            .execute(conn)
    }

    pub fn set_image(conn: &mut PgConnection, user_id: Uuid, image: &str) -> QueryResult<usize> {
        diesel::update(users::table.find(user_id))
            .set((users::image.eq(image), users::updated_at.eq(chrono::Utc::now())))
            .execute(conn)
    }

    pub fn delete(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
        diesel::delete(users::table.find(user_id)).execute(conn)
    }

    pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
        users::table.count().get_result(conn)
    }

    pub fn count_by_role(conn: &mut PgConnection) -> QueryResult<Vec<(UserRole, i64)>> {
        users::table
            .group_by(users::role)
            .select((users::role, count_star()))
            .load(conn)
    }
}
