/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `blog`: Public blog endpoints (widget-facing, cacheable)
/// - `profiles`: Business profile CRUD
/// - `posts`: Post lifecycle (draft, schedule, publish)
/// - `analytics`: Per-post engagement metrics
/// - `calendar`: Calendar events
/// - `oauth`: Social account connection handshake
/// - `generate`: AI content generation
/// - `scheduling`: Posting-slot suggestions
/// - `billing`: Checkout and subscription status
/// - `compliance`: AHPRA/ABN validation and register lookups

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod blog;
pub mod calendar;
pub mod compliance;
pub mod generate;
pub mod health;
pub mod oauth;
pub mod posts;
pub mod profiles;
pub mod scheduling;
