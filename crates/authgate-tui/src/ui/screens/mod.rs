//! One module per route.

pub mod home;
pub mod sign_in;
pub mod sign_up;
