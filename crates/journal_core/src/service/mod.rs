//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the session and CLI layers decoupled from storage details.

pub mod export;
pub mod journal_service;
