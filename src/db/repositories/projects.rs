use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::ProjectState;
use crate::db::models::project::{NewProject, Project, ProjectChangeset, ProjectFilter, ProjectSortKey};
use crate::schema::projects;
use crate::utils::ListParams;

pub struct ProjectsRepo;

impl ProjectsRepo {
    fn filtered<'a>(params: &ListParams<ProjectSortKey>, filter: &ProjectFilter) -> projects::BoxedQuery<'a, Pg> {
        let mut query = projects::table.into_boxed();
        if let Some(pattern) = params.search_pattern() {
            query = query.filter(
                projects::name
                    .ilike(pattern.clone())
                    .or(projects::description.ilike(pattern)),
            );
        }
        if let Some(team_id) = filter.team_id {
            query = query.filter(projects::team_id.eq(team_id));
        }
        if let Some(state) = filter.state {
            query = query.filter(projects::state.eq(state));
        }
        query
    }

    pub fn list(
        conn: &mut PgConnection,
        params: &ListParams<ProjectSortKey>,
        filter: &ProjectFilter,
    ) -> QueryResult<(Vec<Project>, i64)> {
        let total = Self::filtered(params, filter).count().get_result::<i64>(conn)?;

        let query = Self::filtered(params, filter);
        let query = match params.sort {
            ProjectSortKey::Name => sort_by!(query, projects::name, params.order),
            ProjectSortKey::State => sort_by!(query, projects::state, params.order),
            ProjectSortKey::ExpectedEndDate => sort_by!(query, projects::expected_end_date, params.order),
            ProjectSortKey::CreatedAt => sort_by!(query, projects::created_at, params.order),
        };
        let rows = query
            .then_order_by(projects::id.asc())
            .limit(params.per_page)
            .offset(params.offset())
            .select(Project::as_select())
            .load(conn)?;
        Ok((rows, total))
    }

    pub fn find_by_id(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<Option<Project>> {
        projects::table
            .find(project_id)
            .select(Project::as_select())
            .first(conn)
            .optional()
    }

    pub fn for_team(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<Vec<Project>> {
        projects::table
            .filter(projects::team_id.eq(team_id))
            .order(projects::created_at.desc())
            .select(Project::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut PgConnection, new_project: &NewProject) -> QueryResult<Project> {
        diesel::insert_into(projects::table)
            .values(new_project)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn update(conn: &mut PgConnection, project_id: Uuid, changes: &ProjectChangeset) -> QueryResult<Project> {
        diesel::update(projects::table.find(project_id))
            .set(changes)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<usize> {
        diesel::delete(projects::table.find(project_id)).execute(conn)
    }

    /// Project counts per state, restricted to `team_ids` when given.
    pub fn count_by_state(
        conn: &mut PgConnection,
        team_ids: Option<&[Uuid]>,
    ) -> QueryResult<Vec<(ProjectState, i64)>> {
        match team_ids {
            Some(ids) => projects::table
                .filter(projects::team_id.eq_any(ids))
                .group_by(projects::state)
                .select((projects::state, count_star()))
                .load(conn),
            None => projects::table
                .group_by(projects::state)
                .select((projects::state, count_star()))
                .load(conn),
        }
    }
}
