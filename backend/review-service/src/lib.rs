//! Review service
//!
//! Owns `Review` records. Each review points at a book in the book service by
//! id; see [`book_client`] for how those references are followed.

pub mod book_client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod security;
