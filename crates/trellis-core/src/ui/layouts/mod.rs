// src/ui/layouts/mod.rs
//! Layout containers for arranging tree items

pub mod layout;
pub mod scroll;

pub use layout::{Direction, HorizontalAlignment, Layout, Placement, VerticalAlignment};
pub use scroll::{SCROLLBAR_THICKNESS, ScrollLayout};
