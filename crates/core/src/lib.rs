//! Structural health monitoring domain logic.
//!
//! Everything in this crate is pure: callers load assets, readings and
//! threshold tables and pass them in. No function here holds state between
//! calls, so evaluations are safe to run concurrently across assets.

pub mod anomaly;
pub mod error;
pub mod health;
pub mod reading;
pub mod report;
pub mod sensor;
pub mod thresholds;
pub mod trend;
pub mod types;
