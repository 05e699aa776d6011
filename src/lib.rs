//! Intake bot: webhook-driven conversation flow for a chat widget.

pub mod config;
pub mod error;
pub mod flow;
pub mod hours;
pub mod platform;
pub mod store;
pub mod webhook;
