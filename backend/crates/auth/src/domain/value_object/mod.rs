//! Value Object Module

pub mod display_name;
pub mod email;
pub mod identity_id;
pub mod role;
pub mod user_password;
