//! pf-components: component library for the paint plant.
//!
//! Provides models for the flow elements of a mixing station:
//! - Valves on supply tank outlets
//! - Pumps draining the mixing tank
//! - Tanks with capacity/empty clamping
//!
//! Outlets implement the `FlowControl` trait and are deterministic
//! functions of their setting, suitable for per-tick evaluation.
//!
//! # Example
//!
//! ```
//! use pf_components::{FlowControl, Outlet, Tank, Valve};
//! use pf_core::units::{liters, lps};
//! use pf_pigments::{Pigment, PigmentMix};
//!
//! let valve = Valve::new("cyan", lps(2.0), 0.5).unwrap();
//! let mut tank = Tank::new(
//!     "cyan",
//!     liters(100.0),
//!     liters(10.0),
//!     PigmentMix::pure(Pigment::Cyan),
//!     Outlet::Valve(valve),
//! )
//! .unwrap();
//!
//! let step = tank.advance(0.0, 1.0);
//! assert!((step.outflow - 1.0).abs() < 1e-9);
//! assert!((tank.level() - 9.0).abs() < 1e-9);
//! ```

pub mod common;
pub mod error;
pub mod pump;
pub mod tank;
pub mod traits;
pub mod valve;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use pump::Pump;
pub use tank::{Tank, TankStep};
pub use traits::{FlowControl, Outlet};
pub use valve::Valve;
