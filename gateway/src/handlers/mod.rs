//! Event-type handlers.
//!
//! Each handler owns the validation and forwarding pipeline for one
//! `event_type`. The dispatcher routes to them through the [`Registry`]
//! built at startup.
//!
//! [`Registry`]: crate::dispatch::Registry

pub mod acessos;
