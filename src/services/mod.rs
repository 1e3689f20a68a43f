pub mod accounts_service;
pub mod context;
pub mod dashboard_service;
pub mod news_service;
pub mod projects_service;
pub mod publications_service;
pub mod seed_service;
pub mod team_members_service;
pub mod teams_service;
pub mod users_service;

pub use accounts_service::AccountsService;
pub use context::RequestContext;
pub use dashboard_service::DashboardService;
pub use news_service::NewsService;
pub use projects_service::ProjectsService;
pub use publications_service::PublicationsService;
pub use seed_service::SeedService;
pub use team_members_service::TeamMembersService;
pub use teams_service::TeamsService;
pub use users_service::UsersService;
