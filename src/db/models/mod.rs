pub mod api;
pub mod auth;
pub mod dashboard;
pub mod news;
pub mod project;
pub mod publication;
pub mod team;
pub mod user;

pub use api::*;
pub use auth::*;
pub use dashboard::*;
pub use news::*;
pub use project::*;
pub use publication::*;
pub use team::*;
pub use user::*;
