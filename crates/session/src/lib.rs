pub mod events;
pub mod keysym;
pub mod loopback;

pub use events::*;
pub use loopback::*;
