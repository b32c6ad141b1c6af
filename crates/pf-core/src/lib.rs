//! pf-core: shared foundation for paintflow.
//!
//! Contains:
//! - units (uom SI types + constructors for volumes and flow rates)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact indices for stations and tanks)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
