//! Page components, one per routable view.

pub mod admin_users;
pub mod forbidden;
pub mod home;
pub mod login;
pub mod not_found;
pub mod profile;
