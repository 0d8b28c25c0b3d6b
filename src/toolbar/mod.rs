//! Floating toolbar: idle fade, button layout, edge snapping and key routing.
//!
//! The toolbar is a small always-on-top strip holding the tool buttons, the
//! color swatch and the width controls. It fades when idle, can be dragged by
//! its grip and snaps to nearby screen edges when dropped.

pub mod fade;
pub mod focus;
pub mod layout;
pub mod render;
pub mod snap;

pub use fade::FadeController;
pub use focus::{KeyRouting, STACKING_ORDER, WindowRole};
pub use layout::{ToolbarButton, ToolbarLayout};
pub use render::{ToolbarView, render_toolbar};
pub use snap::{FALLBACK_SCREEN, SnapSettings, ToolbarPlacement, screen_or_default};
