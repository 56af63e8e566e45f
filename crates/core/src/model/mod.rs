#![forbid(unsafe_code)]

mod capabilities;
mod channel;
mod entities;
mod write;

pub use capabilities::*;
pub use channel::*;
pub use entities::*;
pub use write::*;
