//! pf-pigments: paint descriptors and the subtractive colour model.
//!
//! - [`Pigment`]: the five base pigments a station stocks
//! - [`PigmentMix`]: normalized volume fractions over the base pigments
//! - [`Rgb`]: reflectance triple rendered from a mix via Kubelka–Munk
//! - [`blend`]: order-independent, volume-weighted mixing of paint portions
//!
//! # Example
//!
//! ```
//! use pf_pigments::{blend, Pigment, PigmentMix, Portion};
//!
//! let empty = PigmentMix::empty();
//! let cyan = PigmentMix::pure(Pigment::Cyan);
//! let yellow = PigmentMix::pure(Pigment::Yellow);
//!
//! let mixed = blend(
//!     Portion::new(&empty, 0.0),
//!     &[Portion::new(&cyan, 1.0), Portion::new(&yellow, 1.0)],
//! );
//!
//! let rgb = mixed.to_rgb();
//! assert!(rgb.g > rgb.r && rgb.g > rgb.b);
//! ```

pub mod blend;
pub mod color;
pub mod error;
pub mod mix;
pub mod pigment;

pub use blend::{Portion, blend, mix_portions};
pub use color::Rgb;
pub use error::{PigmentError, PigmentResult};
pub use mix::PigmentMix;
pub use pigment::Pigment;
