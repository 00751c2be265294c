//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the surrounding wallet engine calls
//! - **Outbound (Driven)**: The extended-key engine this subsystem needs

pub mod inbound;
pub mod outbound;
