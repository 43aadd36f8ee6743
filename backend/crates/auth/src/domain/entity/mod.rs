pub mod identity;
pub mod reset_ticket;
