// src/ui/mod.rs
//! Trellis UI system: a retained-mode widget tree for frame-driven displays
//!
//! This module provides:
//! - The `ScreenItem` contract shared by every node of the tree
//! - Composite layouts (absolute or stacked placement)
//! - Scrollable viewports composed through an off-screen surface
//! - Leaf widgets and buttons with click debounce
//! - Style sheets persisted with postcard

pub mod components;
pub mod core;
pub mod elements;
pub mod layouts;
pub mod styling;
pub mod surface;
pub mod timer;

// Re-export commonly used items
pub use components::{Button, Widget, WidgetKind};
pub use self::core::{
    ClickEvent, CueName, DragEvent, EventChannel, Feedback, HighlightEvent, ItemId, ScreenItem,
    ScreenState,
};
pub use elements::Element;
pub use layouts::{Direction, HorizontalAlignment, Layout, Placement, ScrollLayout, VerticalAlignment};
pub use styling::{StyleConfig, StyleError, StyleResult, StyleSheet};
pub use surface::Surface;
pub use timer::{CountdownTimer, Duration, FrameClock};
