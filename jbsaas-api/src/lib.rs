//! # JBSAAS API Server Library
//!
//! This library provides the core functionality for the JBSAAS API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `clients`: External provider clients (content, billing, OAuth)
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
