/// Applies a dynamic sort direction to a boxed query.
macro_rules! sort_by {
    ($query:expr, $column:expr, $order:expr) => {
        match $order {
            $crate::utils::SortOrder::Asc => $query.order($column.asc()),
            $crate::utils::SortOrder::Desc => $query.order($column.desc()),
        }
    };
}

pub mod news;
pub mod projects;
pub mod publications;
pub mod teams;
pub mod users;

pub use news::{NewsRepo, NewsVisibility};
pub use projects::ProjectsRepo;
pub use publications::PublicationsRepo;
pub use teams::TeamsRepo;
pub use users::UsersRepo;
