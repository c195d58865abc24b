//! Text generation providers

pub mod openai;
