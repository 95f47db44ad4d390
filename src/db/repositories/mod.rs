pub mod group;
pub mod membership;
pub mod resource;
pub mod session;
pub mod user;
