//! View-model derivation — pure functions from raw API records to rows.
//!
//! DESIGN
//! ======
//! Every function here is synchronous, side-effect-free and idempotent.
//! Empty or absent input yields an empty `Vec` or `None`; nothing panics.
//! Rows are built fresh on every pass and never mutated in place.

pub mod format;
pub mod latest;
pub mod laps;
pub mod meetings;
pub mod pits;
pub mod race_control;
pub mod schedule;
pub mod session;
pub mod standings;
pub mod timing;
pub mod tyre;
pub mod weather;
