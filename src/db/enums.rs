use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Lab-wide role of a user. Serialized with the exact strings the SPA uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum UserRole {
    LabLeader,
    TeamLeader,
    TeamMember,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::LabLeader, UserRole::TeamLeader, UserRole::TeamMember];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::LabLeader => "LabLeader",
            UserRole::TeamLeader => "TeamLeader",
            UserRole::TeamMember => "TeamMember",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LabLeader" => Ok(UserRole::LabLeader),
            "TeamLeader" => Ok(UserRole::TeamLeader),
            "TeamMember" => Ok(UserRole::TeamMember),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for UserRole {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|_| "Unrecognized enum variant".into())
    }
}

impl ToSql<Text, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Planning,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectState {
    pub const ALL: [ProjectState; 5] = [
        ProjectState::Planning,
        ProjectState::InProgress,
        ProjectState::Completed,
        ProjectState::OnHold,
        ProjectState::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectState::Planning => "PLANNING",
            ProjectState::InProgress => "IN_PROGRESS",
            ProjectState::Completed => "COMPLETED",
            ProjectState::OnHold => "ON_HOLD",
            ProjectState::Cancelled => "CANCELLED",
        }
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        ProjectState::Planning
    }
}

impl FromStr for ProjectState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNING" => Ok(ProjectState::Planning),
            "IN_PROGRESS" => Ok(ProjectState::InProgress),
            "COMPLETED" => Ok(ProjectState::Completed),
            "ON_HOLD" => Ok(ProjectState::OnHold),
            "CANCELLED" => Ok(ProjectState::Cancelled),
            other => Err(format!("Unknown project state: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for ProjectState {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|_| "Unrecognized enum variant".into())
    }
}

impl ToSql<Text, Pg> for ProjectState {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Draft,
    Published,
}

impl NewsStatus {
    pub const ALL: [NewsStatus; 2] = [NewsStatus::Draft, NewsStatus::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Published => "published",
        }
    }
}

impl Default for NewsStatus {
    fn default() -> Self {
        NewsStatus::Draft
    }
}

impl FromStr for NewsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NewsStatus::Draft),
            "published" => Ok(NewsStatus::Published),
            other => Err(format!("Unknown news status: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for NewsStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|_| "Unrecognized enum variant".into())
    }
}

impl ToSql<Text, Pg> for NewsStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    Article,
    Conference,
    BookChapter,
    Thesis,
    Preprint,
}

impl PublicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationKind::Article => "article",
            PublicationKind::Conference => "conference",
            PublicationKind::BookChapter => "book_chapter",
            PublicationKind::Thesis => "thesis",
            PublicationKind::Preprint => "preprint",
        }
    }
}

impl Default for PublicationKind {
    fn default() -> Self {
        PublicationKind::Article
    }
}

impl FromStr for PublicationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(PublicationKind::Article),
            "conference" => Ok(PublicationKind::Conference),
            "book_chapter" => Ok(PublicationKind::BookChapter),
            "thesis" => Ok(PublicationKind::Thesis),
            "preprint" => Ok(PublicationKind::Preprint),
            other => Err(format!("Unknown publication kind: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for PublicationKind {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|_| "Unrecognized enum variant".into())
    }
}

impl ToSql<Text, Pg> for PublicationKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}
