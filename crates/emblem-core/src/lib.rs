//! # emblem-core
//!
//! Foundation types for per-context badge tracking.
//!
//! This crate provides the shared vocabulary for the badge service:
//!
//! - **Branded IDs**: [`ids::ConnectionId`] issued by the connection source
//! - **Contexts**: [`context::BindingContext`] — frame or service-worker identity
//! - **Values**: [`value::BadgeValue`] with the saturated display rule
//! - **Errors**: [`errors::DropReason`] classification, [`errors::EmblemError`]
//! - **Logging**: [`logging::init_logging`] subscriber installation
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `emblem-service`.

#![deny(unsafe_code)]

pub mod context;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod value;
