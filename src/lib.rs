pub mod animator;
pub mod command;
pub mod config;
pub mod receiver;
pub mod render;
pub mod strip;

pub mod prelude {
    pub use crate::{animator::*, command::*, config::*, receiver::*, strip::*};
    pub use crate::render::AnimationPhase;
}

pub use smart_leds::RGB8;
