// src/ui/components/mod.rs
//! UI components library

pub mod button;
pub mod widget;

pub use button::{Button, CLICK_DEBOUNCE};
pub use widget::{LABEL_CAPACITY, Widget, WidgetKind};
