pub mod auth;
pub mod dashboard;
pub mod health;
pub mod news;
pub mod projects;
pub mod publications;
pub mod teams;
pub mod users;

use crate::{
    AppState,
    db::enums::UserRole,
    middleware::auth::{auth_middleware, require_role},
};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

const LAB_LEADER_ONLY: &[UserRole] = &[UserRole::LabLeader];

pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token));

    // user administration is additionally gated on the role before the handler runs
    let lab_leader_only = || from_fn_with_state(LAB_LEADER_ONLY, require_role);

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/auth/password", put(auth::change_password))
        .route(
            "/users",
            get(users::list_users).merge(post(users::create_user).route_layer(lab_leader_only())),
        )
        .route(
            "/users/:user_id",
            get(users::get_user).merge(
                put(users::update_user)
                    .delete(users::delete_user)
                    .route_layer(lab_leader_only()),
            ),
        )
        .route("/user/teams", get(teams::get_user_teams))
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/:team_id",
            get(teams::get_team).put(teams::update_team).delete(teams::delete_team),
        )
        .route(
            "/teams/:team_id/members",
            get(teams::get_team_members).post(teams::add_team_member),
        )
        .route(
            "/teams/:team_id/members/:user_id",
            delete(teams::remove_team_member),
        )
        .route("/projects", get(projects::get_projects).post(projects::create_project))
        .route(
            "/projects/:project_id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/news", get(news::get_news_list).post(news::create_news))
        .route(
            "/news/:news_id",
            get(news::get_news).put(news::update_news).delete(news::delete_news),
        )
        .route("/news/:news_id/publish", post(news::publish_news))
        .route("/news/:news_id/unpublish", post(news::unpublish_news))
        .route(
            "/publications",
            get(publications::get_publications).post(publications::create_publication),
        )
        .route(
            "/publications/:publication_id",
            get(publications::get_publication)
                .put(publications::update_publication)
                .delete(publications::delete_publication),
        )
        .route("/dashboard/stats", get(dashboard::get_stats))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
