pub mod avatar;
pub mod list_query;

pub use avatar::AvatarService;
pub use list_query::{ListParams, ListQuery, SortKey, SortOrder};

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`),
/// so partial updates can clear nullable columns.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
