//! Annotation model and Cairo-based rendering.
//!
//! This module defines the core drawing types used for screen annotation:
//! - [`Color`]: RGBA color representation with the toolbar palette
//! - [`Annotation`]: one stroke, shape or text label with its style
//! - [`AnnotationStore`]: ordered collection with hit-testing and erasing
//! - Rendering functions for Cairo-based output

pub mod annotation;
pub mod color;
pub mod dirty;
pub mod render;
pub mod store;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, PathStyle};
pub use color::Color;
pub use dirty::DirtyTracker;
pub use render::{clear_surface, render_annotation, render_annotations, render_provisional};
pub use store::AnnotationStore;

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
