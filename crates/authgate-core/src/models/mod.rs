//! Data models shared by the store and the front-ends.

pub mod user;

pub use user::User;
