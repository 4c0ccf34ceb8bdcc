//! Native viewer application: the screen controller that ties the projection
//! core to a remote session and persisted settings, plus a headless demo
//! binary.

pub mod controller;

pub use controller::{Command, ScreenController};
