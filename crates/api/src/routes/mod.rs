//! API Routes

pub mod health;
pub mod predict;
