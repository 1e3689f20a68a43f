use chrono::NaiveDate;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::publication::{
    NewPublication, Publication, PublicationChangeset, PublicationFilter, PublicationSortKey,
};
use crate::schema::publications;
use crate::utils::ListParams;

pub struct PublicationsRepo;

impl PublicationsRepo {
    fn filtered<'a>(
        params: &ListParams<PublicationSortKey>,
        filter: &PublicationFilter,
        years: Option<(NaiveDate, NaiveDate)>,
    ) -> publications::BoxedQuery<'a, Pg> {
        let mut query = publications::table.into_boxed();
        if let Some(pattern) = params.search_pattern() {
            // authors is TEXT[]; match against its joined form
            let authors_text = diesel::dsl::sql::<diesel::sql_types::Text>(
                "array_to_string(publications.authors, ' ')",
            );
            query = query.filter(
                publications::title
                    .ilike(pattern.clone())
                    .or(publications::journal.ilike(pattern.clone()))
                    .or(authors_text.ilike(pattern)),
            );
        }
        if let Some(kind) = filter.kind {
            query = query.filter(publications::kind.eq(kind));
        }
        if let Some((from, to)) = years {
            query = query.filter(
                publications::publication_date
                    .ge(from)
                    .and(publications::publication_date.lt(to)),
            );
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(publications::author_id.eq(author_id));
        }
        query
    }

    pub fn list(
        conn: &mut PgConnection,
        params: &ListParams<PublicationSortKey>,
        filter: &PublicationFilter,
        years: Option<(NaiveDate, NaiveDate)>,
    ) -> QueryResult<(Vec<Publication>, i64)> {
        let total = Self::filtered(params, filter, years).count().get_result::<i64>(conn)?;

        let query = Self::filtered(params, filter, years);
        let query = match params.sort {
            PublicationSortKey::Title => sort_by!(query, publications::title, params.order),
            PublicationSortKey::PublicationDate => {
                sort_by!(query, publications::publication_date, params.order)
            }
            PublicationSortKey::CreatedAt => sort_by!(query, publications::created_at, params.order),
        };
        let rows = query
            .then_order_by(publications::id.asc())
            .limit(params.per_page)
            .offset(params.offset())
            .select(Publication::as_select())
            .load(conn)?;
        Ok((rows, total))
    }

    pub fn find_by_id(conn: &mut PgConnection, publication_id: Uuid) -> QueryResult<Option<Publication>> {
        publications::table
            .find(publication_id)
            .select(Publication::as_select())
            .first(conn)
            .optional()
    }

    pub fn doi_taken(conn: &mut PgConnection, doi: &str, except: Option<Uuid>) -> QueryResult<bool> {
        let mut query = publications::table
            .filter(publications::doi.eq(doi.to_string()))
            .into_boxed();
        if let Some(id) = except {
            query = query.filter(publications::id.ne(id));
        }
        diesel::select(diesel::dsl::exists(query)).get_result(conn)
    }

    pub fn insert(conn: &mut PgConnection, new_publication: &NewPublication) -> QueryResult<Publication> {
        diesel::insert_into(publications::table)
            .values(new_publication)
            .returning(Publication::as_returning())
            .get_result(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        publication_id: Uuid,
        changes: &PublicationChangeset,
    ) -> QueryResult<Publication> {
        diesel::update(publications::table.find(publication_id))
            .set(changes)
            .returning(Publication::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut PgConnection, publication_id: Uuid) -> QueryResult<usize> {
        diesel::delete(publications::table.find(publication_id)).execute(conn)
    }

    /// Publication dates, optionally limited to one registering author.
    pub fn dates(conn: &mut PgConnection, author_id: Option<Uuid>) -> QueryResult<Vec<NaiveDate>> {
        let mut query = publications::table.into_boxed();
        if let Some(id) = author_id {
            query = query.filter(publications::author_id.eq(id));
        }
        query.select(publications::publication_date).load(conn)
    }
}
