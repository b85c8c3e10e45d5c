pub mod arc;
pub mod attack;
pub mod impact;
pub mod lighting;
pub mod choreographer;
pub mod popup;
pub mod render;
