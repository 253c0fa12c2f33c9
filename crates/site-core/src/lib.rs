//! Platform-free logic for the lumen landing page.
//!
//! Everything here compiles and tests on the host: the slide motion state
//! machine, layout snapshots, orientation classification, and the neural
//! scene model. The wasm front-end (`site-web`) feeds these with DOM
//! measurements and events and mirrors their outputs back into the page.

pub mod constants;
pub mod geometry;
pub mod motion;
pub mod orientation;
pub mod scene;

pub use geometry::*;
pub use motion::*;
pub use orientation::*;
pub use scene::*;
