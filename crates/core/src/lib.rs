//! Core domain logic for the edra learning platform backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence layer, the event infrastructure and any future worker or
//! CLI tooling. It contains:
//!
//! - shared [`types`] and the [`error::CoreError`] taxonomy,
//! - the quiz setting snapshot consumed by the override engine ([`quiz`]),
//! - the override engine itself ([`overrides`]): record model, validation
//!   pipeline, collaborator seams and the orchestrating manager,
//! - capability identifiers and the authorization seam ([`capability`]),
//! - tracing bootstrap helpers ([`logging`]).

pub mod capability;
pub mod directory;
pub mod error;
pub mod logging;
pub mod overrides;
pub mod quiz;
pub mod types;
