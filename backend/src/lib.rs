//! # Product API
//!
//! A small REST service for a single `products` table: list, create, read,
//! partially update and delete products, plus a `/health` probe.
//!
//! ## Architecture
//!
//! - [`api`]: Domain types shared by every layer
//! - [`db`]: Repository trait, in-memory and Postgres backends, service layer
//! - [`http`]: Axum router, handlers, request validation, error mapping
//! - [`config`]: Command-line / environment configuration for the server binary

pub mod api;

pub mod db;

#[cfg(feature = "http-server")]
pub mod config;

#[cfg(feature = "http-server")]
pub mod http;
