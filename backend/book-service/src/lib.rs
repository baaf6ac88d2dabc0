//! Book catalog service
//!
//! Owns `Book` records. Reads are public; writes go through the auth gateway.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod security;
