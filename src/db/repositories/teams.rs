use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::team::{NewTeam, NewTeamMember, Team, TeamChangeset, TeamMember, TeamSortKey};
use crate::db::models::user::User;
use crate::schema::{projects, team_members, teams, users};
use crate::utils::ListParams;

pub struct TeamsRepo;

impl TeamsRepo {
    fn filtered<'a>(params: &ListParams<TeamSortKey>) -> teams::BoxedQuery<'a, Pg> {
        let mut query = teams::table.into_boxed();
        if let Some(pattern) = params.search_pattern() {
            query = query.filter(
                teams::name
                    .ilike(pattern.clone())
                    .or(teams::acronym.ilike(pattern)),
            );
        }
        query
    }

    pub fn list(conn: &mut PgConnection, params: &ListParams<TeamSortKey>) -> QueryResult<(Vec<Team>, i64)> {
        let total = Self::filtered(params).count().get_result::<i64>(conn)?;

        let query = Self::filtered(params);
        let query = match params.sort {
            TeamSortKey::Name => sort_by!(query, teams::name, params.order),
            TeamSortKey::Acronym => sort_by!(query, teams::acronym, params.order),
            TeamSortKey::CreatedAt => sort_by!(query, teams::created_at, params.order),
        };
        let rows = query
            .then_order_by(teams::id.asc())
            .limit(params.per_page)
            .offset(params.offset())
            .select(Team::as_select())
            .load(conn)?;
        Ok((rows, total))
    }

    pub fn all(conn: &mut PgConnection) -> QueryResult<Vec<Team>> {
        teams::table
            .order(teams::name.asc())
            .select(Team::as_select())
            .load(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<Option<Team>> {
        teams::table
            .find(team_id)
            .select(Team::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_many(conn: &mut PgConnection, ids: &[Uuid]) -> QueryResult<Vec<Team>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        teams::table
            .filter(teams::id.eq_any(ids))
            .order(teams::name.asc())
            .select(Team::as_select())
            .load(conn)
    }

    pub fn led_by(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Team>> {
        teams::table
            .filter(teams::leader_id.eq(user_id))
            .order(teams::name.asc())
            .select(Team::as_select())
            .load(conn)
    }

    pub fn is_leader_of_any(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            teams::table.filter(teams::leader_id.eq(user_id)),
        ))
        .get_result(conn)
    }

    /// Teams the user belongs to, with their membership row.
    pub fn memberships_of(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<(TeamMember, Team)>> {
        team_members::table
            .inner_join(teams::table)
            .filter(team_members::user_id.eq(user_id))
            .order(teams::name.asc())
            .select((TeamMember::as_select(), Team::as_select()))
            .load(conn)
    }

    pub fn name_taken(conn: &mut PgConnection, name: &str, except: Option<Uuid>) -> QueryResult<bool> {
        let mut query = teams::table
            .filter(teams::name.ilike(crate::utils::list_query::escape_like(name)))
            .into_boxed();
        if let Some(id) = except {
            query = query.filter(teams::id.ne(id));
        }
        diesel::select(diesel::dsl::exists(query)).get_result(conn)
    }

    pub fn acronym_taken(conn: &mut PgConnection, acronym: &str, except: Option<Uuid>) -> QueryResult<bool> {
        let mut query = teams::table.filter(teams::acronym.eq(acronym)).into_boxed();
        if let Some(id) = except {
            query = query.filter(teams::id.ne(id));
        }
        diesel::select(diesel::dsl::exists(query)).get_result(conn)
    }

    pub fn insert(conn: &mut PgConnection, new_team: &NewTeam) -> QueryResult<Team> {
        diesel::insert_into(teams::table)
            .values(new_team)
            .returning(Team::as_returning())
            .get_result(conn)
    }

    pub fn update(conn: &mut PgConnection, team_id: Uuid, changes: &TeamChangeset) -> QueryResult<Team> {
        diesel::update(teams::table.find(team_id))
            .set(changes)
            .returning(Team::as_returning())
            .get_result(conn)
    }

    /// Memberships and projects go with the team through `ON DELETE CASCADE`.
    pub fn delete(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<usize> {
        diesel::delete(teams::table.find(team_id)).execute(conn)
    }

    pub fn members(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<Vec<(TeamMember, User)>> {
        team_members::table
            .inner_join(users::table)
            .filter(team_members::team_id.eq(team_id))
            .order(users::name.asc())
            .select((TeamMember::as_select(), User::as_select()))
            .load(conn)
    }

    pub fn is_member(conn: &mut PgConnection, team_id: Uuid, user_id: Uuid) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            team_members::table.find((team_id, user_id)),
        ))
        .get_result(conn)
    }

    pub fn add_member(conn: &mut PgConnection, team_id: Uuid, user_id: Uuid) -> QueryResult<TeamMember> {
        diesel::insert_into(team_members::table)
            .values(&NewTeamMember { team_id, user_id })
            .returning(TeamMember::as_returning())
            .get_result(conn)
    }

    /// Inserts the membership unless it already exists.
    pub fn ensure_member(conn: &mut PgConnection, team_id: Uuid, user_id: Uuid) -> QueryResult<usize> {
        diesel::insert_into(team_members::table)
            .values(&NewTeamMember { team_id, user_id })
            .on_conflict_do_nothing()
            .execute(conn)
    }

    pub fn remove_member(conn: &mut PgConnection, team_id: Uuid, user_id: Uuid) -> QueryResult<usize> {
        diesel::delete(team_members::table.find((team_id, user_id))).execute(conn)
    }

    pub fn member_team_ids(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Uuid>> {
        team_members::table
            .filter(team_members::user_id.eq(user_id))
            .select(team_members::team_id)
            .load(conn)
    }

    pub fn member_counts(conn: &mut PgConnection, team_ids: &[Uuid]) -> QueryResult<HashMap<Uuid, i64>> {
        if team_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64)> = team_members::table
            .filter(team_members::team_id.eq_any(team_ids))
            .group_by(team_members::team_id)
            .select((team_members::team_id, count_star()))
            .load(conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn project_counts(conn: &mut PgConnection, team_ids: &[Uuid]) -> QueryResult<HashMap<Uuid, i64>> {
        if team_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64)> = projects::table
            .filter(projects::team_id.eq_any(team_ids))
            .group_by(projects::team_id)
            .select((projects::team_id, count_star()))
            .load(conn)?;
        Ok(rows.into_iter().collect())
    }
}
