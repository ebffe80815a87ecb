//! Core types for R4Mvc.
//!
//! Provides the MVC domain model ([`model::ControllerDescriptor`], [`model::View`],
//! [`model::StaticFile`]), the immutable declaration tree handed to the renderer,
//! generation settings, and the shared error type.

pub mod config;
pub mod declaration;
pub mod error;
pub mod model;
pub mod naming;

pub use error::GenerationError;
