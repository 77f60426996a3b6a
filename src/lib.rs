//! A minimal HTTP gateway for container operations.
//!
//! `podgate` exposes a handful of JSON endpoints that list containers, pull
//! images, and create-and-start containers on a Docker or Podman engine, and
//! serves a small static UI alongside them.
//!
//! # Architecture
//!
//! Engine settings (endpoint, TLS material, API version pin) are resolved once
//! at start-up into an explicit [`engine::EngineSettings`] value. Each request
//! opens its own engine client through [`engine::ConnectEngine`], performs one
//! gateway operation from [`api`], and drops the client before replying.
//!
//! # Modules
//!
//! - [`api`]: Gateway operations, independent of HTTP
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Container engine connection and client abstractions
//! - [`error`]: Semantic error types for the application
//! - [`server`]: HTTP routes, static UI, and listener

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod server;
