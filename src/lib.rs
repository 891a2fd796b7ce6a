//! Draw a digit with the mouse, release the button, get a live prediction.
//!
//! The crate splits into a display-free core (types, session state machine,
//! normalizer, classifier seam) and a thin minifb window layer; everything in
//! the core runs under tests with synthetic events and stub classifiers.

pub mod draw;
pub mod error;
pub mod infer;
pub mod model;
pub mod normalize;
pub mod session;
pub mod types;
