pub use super::group_members::Entity as GroupMembers;
pub use super::resources::Entity as Resources;
pub use super::study_groups::Entity as StudyGroups;
pub use super::study_sessions::Entity as StudySessions;
pub use super::users::Entity as Users;
