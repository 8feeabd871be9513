/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `contacts`: Contact CRUD endpoints

pub mod auth;
pub mod contacts;
pub mod health;
