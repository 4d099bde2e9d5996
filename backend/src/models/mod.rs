//! Domain models shared by synthesis, the wizard and the HTTP layer.

pub mod answers;
pub mod candidate;
pub mod filters;
pub mod light_curve;
pub mod stellar;

pub use answers::*;
pub use candidate::*;
pub use filters::*;
pub use light_curve::*;
