pub mod prelude;

pub mod group_members;
pub mod resources;
pub mod study_groups;
pub mod study_sessions;
pub mod users;
