//! Interactive environments driving the engine in a closed loop.

pub mod alien;
pub mod discrimination;
pub mod pong;
