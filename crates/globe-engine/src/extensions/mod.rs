// extensions/mod.rs
//
// Interpolation building blocks shared by the choreographer and the effects.
// Decoupled from GlobeContext: nothing here knows about attacks or cameras.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec3, ease, ease_vec3, two_segment};
pub use tween::Tween;
