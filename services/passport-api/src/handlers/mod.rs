//! HTTP handlers for the passport API.

pub mod buttons;
pub mod health;
pub mod historical;
pub mod passport;
pub mod risk;
