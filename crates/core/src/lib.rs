//! `webpos-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no UI, no transport).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, OrderId, ProductId, SubmissionId};
