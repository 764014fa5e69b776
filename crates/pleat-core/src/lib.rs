pub mod config;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod fusion;
pub mod geometry;
pub mod hand;
pub mod math;
pub mod orientation;
pub mod pointer;
pub mod sample;
pub mod session;
pub mod wall;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub static WALL_WGSL: &str = include_str!("../shaders/wall.wgsl");

pub use config::*;
pub use constants::*;
pub use error::*;
pub use estimator::*;
pub use fusion::*;
pub use geometry::*;
pub use hand::*;
pub use orientation::*;
pub use pointer::*;
pub use sample::*;
pub use session::*;
pub use wall::*;
#[cfg(not(target_arch = "wasm32"))]
pub use worker::*;
