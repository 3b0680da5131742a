//! Domain model for administered accounts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep credential-bearing columns out of serialized payloads.
//!
//! # Invariants
//! - Every account is identified by a stable positive integer `UserId`.
//! - Secret columns (`password_hash`, account tokens) never serialize.

pub mod user;
