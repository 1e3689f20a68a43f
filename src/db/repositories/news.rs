use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::NewsStatus;
use crate::db::models::news::{NewNews, News, NewsChangeset, NewsFilter, NewsSortKey};
use crate::schema::news;
use crate::utils::ListParams;

/// Which rows a caller may see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewsVisibility {
    All,
    /// Published items plus the caller's own drafts.
    PublishedOrAuthoredBy(Uuid),
}

pub struct NewsRepo;

impl NewsRepo {
    fn filtered<'a>(
        params: &ListParams<NewsSortKey>,
        filter: &NewsFilter,
        visibility: NewsVisibility,
    ) -> news::BoxedQuery<'a, Pg> {
        let mut query = news::table.into_boxed();
        if let NewsVisibility::PublishedOrAuthoredBy(user_id) = visibility {
            query = query.filter(
                news::status
                    .eq(NewsStatus::Published)
                    .or(news::author_id.eq(user_id)),
            );
        }
        if let Some(pattern) = params.search_pattern() {
            query = query.filter(
                news::title
                    .ilike(pattern.clone())
                    .or(news::content.ilike(pattern)),
            );
        }
        if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            query = query.filter(news::category.eq(category.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(news::status.eq(status));
        }
        query
    }

    pub fn list(
        conn: &mut PgConnection,
        params: &ListParams<NewsSortKey>,
        filter: &NewsFilter,
        visibility: NewsVisibility,
    ) -> QueryResult<(Vec<News>, i64)> {
        let total = Self::filtered(params, filter, visibility)
            .count()
            .get_result::<i64>(conn)?;

        let query = Self::filtered(params, filter, visibility);
        let query = match params.sort {
            NewsSortKey::Title => sort_by!(query, news::title, params.order),
            NewsSortKey::PublishDate => sort_by!(query, news::publish_date, params.order),
            NewsSortKey::CreatedAt => sort_by!(query, news::created_at, params.order),
        };
        let rows = query
            .then_order_by(news::id.asc())
            .limit(params.per_page)
            .offset(params.offset())
            .select(News::as_select())
            .load(conn)?;
        Ok((rows, total))
    }

    pub fn find_by_id(conn: &mut PgConnection, news_id: Uuid) -> QueryResult<Option<News>> {
        news::table
            .find(news_id)
            .select(News::as_select())
            .first(conn)
            .optional()
    }

    pub fn insert(conn: &mut PgConnection, new_news: &NewNews) -> QueryResult<News> {
        diesel::insert_into(news::table)
            .values(new_news)
            .returning(News::as_returning())
            .get_result(conn)
    }

    pub fn update(conn: &mut PgConnection, news_id: Uuid, changes: &NewsChangeset) -> QueryResult<News> {
        diesel::update(news::table.find(news_id))
            .set(changes)
            .returning(News::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut PgConnection, news_id: Uuid) -> QueryResult<usize> {
        diesel::delete(news::table.find(news_id)).execute(conn)
    }

    pub fn count_by_status(conn: &mut PgConnection) -> QueryResult<Vec<(NewsStatus, i64)>> {
        news::table
            .group_by(news::status)
            .select((news::status, count_star()))
            .load(conn)
    }
}
