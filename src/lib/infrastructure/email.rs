//! Outbound mail relays

pub mod smtp;
