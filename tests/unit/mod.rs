mod auth;
mod dashboard;
mod list_query;
mod news;
mod policy;
mod project;
mod publication;
mod team;
mod user;
