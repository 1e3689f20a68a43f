use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::NewsStatus,
    db::models::{
        api::Page,
        news::{
            CreateNewsRequest, NewNews, News, NewsChangeset, NewsFilter, NewsInfo, NewsSortKey,
            UpdateNewsRequest,
        },
        user::UserBasicInfo,
    },
    db::repositories::{NewsRepo, NewsVisibility, UsersRepo},
    error::AppError,
    services::context::RequestContext,
    utils::ListQuery,
    validation::{
        news::{MAX_TITLE_LEN, validate_category, validate_create_news},
        normalize_optional_text, normalize_patch_text, require_text,
    },
};

/// Publish date stored for an item in `status`: published items keep the
/// requested date or get `now`, drafts carry none.
pub fn resolve_publish_date(
    status: NewsStatus,
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        NewsStatus::Published => Some(requested.unwrap_or(now)),
        NewsStatus::Draft => None,
    }
}

pub struct NewsService;

impl NewsService {
    pub fn list(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        query: &ListQuery,
        filter: &NewsFilter,
    ) -> Result<Page<NewsInfo>, AppError> {
        let params = query.resolve::<NewsSortKey>()?;
        let (items, total_count) = NewsRepo::list(conn, &params, filter, ctx.news_visibility())?;
        Ok(Page {
            items: Self::with_authors(conn, items)?,
            total_count,
            pagination: params.pagination(total_count),
        })
    }

    pub fn get(conn: &mut PgConnection, ctx: &RequestContext, news_id: Uuid) -> Result<NewsInfo, AppError> {
        let news = Self::find_visible(conn, ctx, news_id)?;
        Self::with_author(conn, news)
    }

    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreateNewsRequest,
    ) -> Result<NewsInfo, AppError> {
        ctx.ensure_can_create_news()?;
        validate_create_news(&req.title, &req.content, &req.category)?;

        let status = req.status.unwrap_or_default();
        let new_news = NewNews {
            title: req.title.trim().to_string(),
            content: req.content.clone(),
            image: normalize_optional_text(req.image.clone()),
            category: req.category.trim().to_string(),
            status,
            publish_date: resolve_publish_date(status, req.publish_date, Utc::now()),
            author_id: ctx.user_id,
        };
        let news = NewsRepo::insert(conn, &new_news)?;
        tracing::info!(news_id = %news.id, status = %news.status.as_str(), "News created");
        Self::with_author(conn, news)
    }

    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        news_id: Uuid,
        req: &UpdateNewsRequest,
    ) -> Result<NewsInfo, AppError> {
        let existing = Self::find(conn, news_id)?;
        ctx.ensure_author_or_lab_leader(existing.author_id)?;

        let title = req
            .title
            .as_deref()
            .map(|title| require_text("title", title, MAX_TITLE_LEN))
            .transpose()?;
        if let Some(content) = req.content.as_deref() {
            if content.trim().is_empty() {
                return Err(AppError::validation_field("content", "Content cannot be empty"));
            }
        }
        let category = req.category.as_deref().map(validate_category).transpose()?;

        let status = req.status.unwrap_or(existing.status);
        let requested = req.publish_date.unwrap_or(existing.publish_date);

        let changes = NewsChangeset {
            title,
            content: req.content.clone(),
            image: normalize_patch_text(req.image.clone()),
            category,
            status: req.status,
            publish_date: Some(resolve_publish_date(status, requested, Utc::now())),
            updated_at: Some(Utc::now()),
        };
        let news = NewsRepo::update(conn, news_id, &changes)?;
        tracing::info!(news_id = %news.id, updated_by = %ctx.user_id, "News updated");
        Self::with_author(conn, news)
    }

    /// Publish or unpublish, stamping or clearing the publish date.
    pub fn set_status(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        news_id: Uuid,
        status: NewsStatus,
    ) -> Result<NewsInfo, AppError> {
        let existing = Self::find(conn, news_id)?;
        ctx.ensure_author_or_lab_leader(existing.author_id)?;

        if existing.status == status {
            return Self::with_author(conn, existing);
        }

        let changes = NewsChangeset {
            status: Some(status),
            publish_date: Some(resolve_publish_date(status, existing.publish_date, Utc::now())),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        let news = NewsRepo::update(conn, news_id, &changes)?;
        tracing::info!(news_id = %news.id, status = %status.as_str(), "News status changed");
        Self::with_author(conn, news)
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, news_id: Uuid) -> Result<(), AppError> {
        let existing = Self::find(conn, news_id)?;
        ctx.ensure_author_or_lab_leader(existing.author_id)?;

        NewsRepo::delete(conn, news_id)?;
        tracing::info!(news_id = %news_id, deleted_by = %ctx.user_id, "News deleted");
        Ok(())
    }

    fn find(conn: &mut PgConnection, news_id: Uuid) -> Result<News, AppError> {
        NewsRepo::find_by_id(conn, news_id)?.ok_or_else(|| AppError::not_found("News"))
    }

    // hidden drafts answer 404 rather than 403
    fn find_visible(conn: &mut PgConnection, ctx: &RequestContext, news_id: Uuid) -> Result<News, AppError> {
        let news = Self::find(conn, news_id)?;
        let visible = match ctx.news_visibility() {
            NewsVisibility::All => true,
            NewsVisibility::PublishedOrAuthoredBy(user_id) => {
                news.status == NewsStatus::Published || news.author_id == user_id
            }
        };
        if visible { Ok(news) } else { Err(AppError::not_found("News")) }
    }

    fn with_author(conn: &mut PgConnection, news: News) -> Result<NewsInfo, AppError> {
        let author = UsersRepo::find_by_id(conn, news.author_id)?
            .ok_or_else(|| AppError::internal(format!("News {} has no author row", news.id)))?;
        Ok(NewsInfo::new(news, UserBasicInfo::from(&author)))
    }

    fn with_authors(conn: &mut PgConnection, items: Vec<News>) -> Result<Vec<NewsInfo>, AppError> {
        let author_ids: Vec<Uuid> = items.iter().map(|n| n.author_id).collect();
        let authors: HashMap<Uuid, UserBasicInfo> = UsersRepo::find_many(conn, &author_ids)?
            .iter()
            .map(|user| (user.id, UserBasicInfo::from(user)))
            .collect();

        items
            .into_iter()
            .map(|news| {
                let author = authors
                    .get(&news.author_id)
                    .cloned()
                    .ok_or_else(|| AppError::internal(format!("News {} has no author row", news.id)))?;
                Ok(NewsInfo::new(news, author))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn publishing_stamps_now_when_no_date_given() {
        let now = Utc::now();
        assert_eq!(resolve_publish_date(NewsStatus::Published, None, now), Some(now));
    }

    #[test]
    fn publishing_keeps_requested_date() {
        let now = Utc::now();
        let scheduled = Utc.with_ymd_and_hms(2030, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(
            resolve_publish_date(NewsStatus::Published, Some(scheduled), now),
            Some(scheduled)
        );
    }

    #[test]
    fn drafts_have_no_publish_date() {
        let now = Utc::now();
        assert_eq!(resolve_publish_date(NewsStatus::Draft, Some(now), now), None);
        assert_eq!(resolve_publish_date(NewsStatus::Draft, None, now), None);
    }
}
