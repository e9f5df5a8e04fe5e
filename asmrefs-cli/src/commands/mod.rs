pub mod common;
pub mod direct;
pub mod resolve;
