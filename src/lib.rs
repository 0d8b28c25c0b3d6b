//! Screen overlay annotation: the annotation model, the toolbar controllers
//! and the application context that ties them to platform collaborators.
//!
//! The binary hosts [`app::App`] in [`daemon`] mode or drives it from a
//! script in [`replay`] mode.

pub mod app;
pub mod config;
pub mod daemon;
pub mod draw;
pub mod input;
pub mod platform;
pub mod replay;
pub mod toolbar;
pub mod util;

pub use config::Config;
