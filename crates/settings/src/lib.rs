pub mod store;
pub mod viewer;

pub use store::*;
pub use viewer::*;
