use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::{
        api::{Page, error_codes},
        publication::{
            CreatePublicationRequest, NewPublication, Publication, PublicationChangeset,
            PublicationFilter, PublicationInfo, PublicationSortKey, UpdatePublicationRequest,
        },
        user::UserBasicInfo,
    },
    db::repositories::{PublicationsRepo, UsersRepo},
    error::{AppError, unique_violation_constraint},
    services::context::RequestContext,
    utils::ListQuery,
    validation::{
        normalize_optional_text, normalize_patch_text,
        publication::{
            normalize_authors, normalize_doi, publication_year_range, validate_publication_title,
        },
    },
};

pub struct PublicationsService;

impl PublicationsService {
    pub fn list(
        conn: &mut PgConnection,
        query: &ListQuery,
        filter: &PublicationFilter,
    ) -> Result<Page<PublicationInfo>, AppError> {
        let params = query.resolve::<PublicationSortKey>()?;
        let years = filter.year.map(publication_year_range).transpose()?;
        let (items, total_count) = PublicationsRepo::list(conn, &params, filter, years)?;
        Ok(Page {
            items: Self::with_registrants(conn, items)?,
            total_count,
            pagination: params.pagination(total_count),
        })
    }

    pub fn get(conn: &mut PgConnection, publication_id: Uuid) -> Result<PublicationInfo, AppError> {
        let publication = Self::find(conn, publication_id)?;
        Self::with_registrant(conn, publication)
    }

    /// Any lab member may register a publication; they become its owner.
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreatePublicationRequest,
    ) -> Result<PublicationInfo, AppError> {
        let title = validate_publication_title(&req.title)?;
        let authors = normalize_authors(&req.authors)?;
        let doi = normalize_optional_text(req.doi.clone())
            .map(|doi| normalize_doi(&doi))
            .transpose()?;

        if let Some(doi) = doi.as_deref() {
            if PublicationsRepo::doi_taken(conn, doi, None)? {
                return Err(doi_conflict());
            }
        }

        let new_publication = NewPublication {
            title,
            authors,
            journal: normalize_optional_text(req.journal.clone()),
            kind: req.kind.unwrap_or_default(),
            publication_date: req.publication_date,
            doi,
            abstract_text: normalize_optional_text(req.abstract_text.clone()),
            url: normalize_optional_text(req.url.clone()),
            author_id: ctx.user_id,
        };
        let publication =
            PublicationsRepo::insert(conn, &new_publication).map_err(map_publication_write_error)?;
        tracing::info!(publication_id = %publication.id, "Publication registered");
        Self::with_registrant(conn, publication)
    }

    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        publication_id: Uuid,
        req: &UpdatePublicationRequest,
    ) -> Result<PublicationInfo, AppError> {
        let existing = Self::find(conn, publication_id)?;
        ctx.ensure_author_or_lab_leader(existing.author_id)?;

        let title = req.title.as_deref().map(validate_publication_title).transpose()?;
        let authors = req.authors.as_deref().map(normalize_authors).transpose()?;
        let doi = match normalize_patch_text(req.doi.clone()) {
            Some(Some(doi)) => Some(Some(normalize_doi(&doi)?)),
            other => other,
        };

        if let Some(Some(doi)) = doi.as_ref() {
            if PublicationsRepo::doi_taken(conn, doi, Some(publication_id))? {
                return Err(doi_conflict());
            }
        }

        let changes = PublicationChangeset {
            title,
            authors,
            journal: normalize_patch_text(req.journal.clone()),
            kind: req.kind,
            publication_date: req.publication_date,
            doi,
            abstract_text: normalize_patch_text(req.abstract_text.clone()),
            url: normalize_patch_text(req.url.clone()),
            updated_at: Some(Utc::now()),
        };
        let publication = PublicationsRepo::update(conn, publication_id, &changes)
            .map_err(map_publication_write_error)?;
        tracing::info!(publication_id = %publication.id, updated_by = %ctx.user_id, "Publication updated");
        Self::with_registrant(conn, publication)
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, publication_id: Uuid) -> Result<(), AppError> {
        let existing = Self::find(conn, publication_id)?;
        ctx.ensure_author_or_lab_leader(existing.author_id)?;

        PublicationsRepo::delete(conn, publication_id)?;
        tracing::info!(publication_id = %publication_id, deleted_by = %ctx.user_id, "Publication deleted");
        Ok(())
    }

    fn find(conn: &mut PgConnection, publication_id: Uuid) -> Result<Publication, AppError> {
        PublicationsRepo::find_by_id(conn, publication_id)?
            .ok_or_else(|| AppError::not_found("Publication"))
    }

    fn with_registrant(conn: &mut PgConnection, publication: Publication) -> Result<PublicationInfo, AppError> {
        let user = UsersRepo::find_by_id(conn, publication.author_id)?.ok_or_else(|| {
            AppError::internal(format!("Publication {} has no registrant row", publication.id))
        })?;
        Ok(PublicationInfo::new(publication, UserBasicInfo::from(&user)))
    }

    fn with_registrants(
        conn: &mut PgConnection,
        items: Vec<Publication>,
    ) -> Result<Vec<PublicationInfo>, AppError> {
        let user_ids: Vec<Uuid> = items.iter().map(|p| p.author_id).collect();
        let users: HashMap<Uuid, UserBasicInfo> = UsersRepo::find_many(conn, &user_ids)?
            .iter()
            .map(|user| (user.id, UserBasicInfo::from(user)))
            .collect();

        items
            .into_iter()
            .map(|publication| {
                let user = users.get(&publication.author_id).cloned().ok_or_else(|| {
                    AppError::internal(format!("Publication {} has no registrant row", publication.id))
                })?;
                Ok(PublicationInfo::new(publication, user))
            })
            .collect()
    }
}

fn doi_conflict() -> AppError {
    AppError::conflict_with_code(
        "A publication with this DOI is already registered",
        Some("doi".to_string()),
        error_codes::PUBLICATION_DOI_EXISTS,
    )
}

fn map_publication_write_error(err: diesel::result::Error) -> AppError {
    match unique_violation_constraint(&err).as_deref() {
        Some("publications_doi_key") => doi_conflict(),
        _ => AppError::Database(err),
    }
}
