use serde::Serialize;
use uuid::Uuid;

/// One bar/slice of a chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

impl CountBucket {
    pub fn new(key: impl Into<String>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct TeamHeadcount {
    pub team_id: Uuid,
    pub name: String,
    pub acronym: String,
    pub members: i64,
}

#[derive(Serialize, Debug)]
pub struct LabOverview {
    pub total_users: i64,
    pub users_by_role: Vec<CountBucket>,
    pub total_teams: i64,
    pub projects_by_state: Vec<CountBucket>,
    pub news_by_status: Vec<CountBucket>,
    pub publications_per_year: Vec<CountBucket>,
    pub members_per_team: Vec<TeamHeadcount>,
}

#[derive(Serialize, Debug)]
pub struct TeamLeaderOverview {
    pub led_teams: Vec<TeamHeadcount>,
    pub projects_by_state: Vec<CountBucket>,
    pub own_publications_per_year: Vec<CountBucket>,
}

#[derive(Serialize, Debug)]
pub struct MemberOverview {
    pub teams: Vec<TeamHeadcount>,
    pub projects_by_state: Vec<CountBucket>,
    pub own_publications_per_year: Vec<CountBucket>,
}

#[derive(Serialize, Debug)]
#[serde(tag = "scope")]
pub enum DashboardStats {
    LabLeader(LabOverview),
    TeamLeader(TeamLeaderOverview),
    TeamMember(MemberOverview),
}
