use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::{NewsStatus, ProjectState, UserRole},
    db::models::{
        dashboard::{
            CountBucket, DashboardStats, LabOverview, MemberOverview, TeamHeadcount,
            TeamLeaderOverview,
        },
        team::Team,
    },
    db::repositories::{NewsRepo, ProjectsRepo, PublicationsRepo, TeamsRepo, UsersRepo},
    error::AppError,
    services::context::RequestContext,
};

/// One bucket per variant of `order`, in that order, zero-filled.
pub fn ordered_buckets<T: PartialEq>(
    order: &[T],
    counts: &[(T, i64)],
    label: impl Fn(&T) -> &'static str,
) -> Vec<CountBucket> {
    order
        .iter()
        .map(|variant| {
            let count = counts
                .iter()
                .filter(|(key, _)| key == variant)
                .map(|(_, count)| *count)
                .sum();
            CountBucket::new(label(variant), count)
        })
        .collect()
}

/// Publication counts per calendar year, oldest first.
pub fn bucket_by_year(dates: &[NaiveDate]) -> Vec<CountBucket> {
    let mut years: BTreeMap<i32, i64> = BTreeMap::new();
    for date in dates {
        *years.entry(date.year()).or_default() += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| CountBucket::new(year.to_string(), count))
        .collect()
}

pub struct DashboardService;

impl DashboardService {
    pub fn stats(conn: &mut PgConnection, ctx: &RequestContext) -> Result<DashboardStats, AppError> {
        let stats = match ctx.role {
            UserRole::LabLeader => DashboardStats::LabLeader(Self::lab_overview(conn)?),
            UserRole::TeamLeader => {
                let teams = TeamsRepo::led_by(conn, ctx.user_id)?;
                DashboardStats::TeamLeader(TeamLeaderOverview {
                    projects_by_state: Self::projects_by_state(conn, Some(&teams))?,
                    led_teams: Self::headcounts(conn, &teams)?,
                    own_publications_per_year: Self::publications_per_year(conn, Some(ctx.user_id))?,
                })
            }
            UserRole::TeamMember => {
                let team_ids = TeamsRepo::member_team_ids(conn, ctx.user_id)?;
                let teams = TeamsRepo::find_many(conn, &team_ids)?;
                DashboardStats::TeamMember(MemberOverview {
                    projects_by_state: Self::projects_by_state(conn, Some(&teams))?,
                    teams: Self::headcounts(conn, &teams)?,
                    own_publications_per_year: Self::publications_per_year(conn, Some(ctx.user_id))?,
                })
            }
        };
        Ok(stats)
    }

    fn lab_overview(conn: &mut PgConnection) -> Result<LabOverview, AppError> {
        let users_by_role = UsersRepo::count_by_role(conn)?;
        let news_by_status = NewsRepo::count_by_status(conn)?;
        let teams = TeamsRepo::all(conn)?;

        Ok(LabOverview {
            total_users: UsersRepo::count(conn)?,
            users_by_role: ordered_buckets(&UserRole::ALL, &users_by_role, UserRole::as_str),
            total_teams: teams.len() as i64,
            projects_by_state: Self::projects_by_state(conn, None)?,
            news_by_status: ordered_buckets(&NewsStatus::ALL, &news_by_status, NewsStatus::as_str),
            publications_per_year: Self::publications_per_year(conn, None)?,
            members_per_team: Self::headcounts(conn, &teams)?,
        })
    }

    /// Scoped to `teams` when given; an empty scope yields all-zero buckets.
    fn projects_by_state(conn: &mut PgConnection, teams: Option<&[Team]>) -> Result<Vec<CountBucket>, AppError> {
        let counts = match teams {
            Some([]) => Vec::new(),
            Some(teams) => {
                let ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
                ProjectsRepo::count_by_state(conn, Some(&ids))?
            }
            None => ProjectsRepo::count_by_state(conn, None)?,
        };
        Ok(ordered_buckets(&ProjectState::ALL, &counts, ProjectState::as_str))
    }

    fn publications_per_year(conn: &mut PgConnection, author_id: Option<Uuid>) -> Result<Vec<CountBucket>, AppError> {
        let dates = PublicationsRepo::dates(conn, author_id)?;
        Ok(bucket_by_year(&dates))
    }

    fn headcounts(conn: &mut PgConnection, teams: &[Team]) -> Result<Vec<TeamHeadcount>, AppError> {
        let ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let counts = TeamsRepo::member_counts(conn, &ids)?;
        let mut headcounts: Vec<TeamHeadcount> = teams
            .iter()
            .map(|team| TeamHeadcount {
                team_id: team.id,
                name: team.name.clone(),
                acronym: team.acronym.clone(),
                members: counts.get(&team.id).copied().unwrap_or(0),
            })
            .collect();
        headcounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(headcounts)
    }
}
