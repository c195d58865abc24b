//! Domain layer: reply composition and delivery

pub mod delivery;
pub mod email_address;
pub mod replies;
