//! Reply handlers

pub mod compose_reply;
pub mod send_reply;
