//! # medslot core
//!
//! Domain types and pure scheduling logic for doctor time slots: strict parsing
//! of availability windows, slot generation, and the overlap rules every slot
//! store applies.

pub mod conflict;
pub mod errors;
pub mod generator;
pub mod models;
