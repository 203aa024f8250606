//! Styling for widgets
//!
//! - [`colors`] - RGB565 color constants used by the default style sheets
//! - [`sheet`] - the [`StyleSheet`] handed to widgets at construction, and its
//!   persisted [`StyleConfig`] form
//!
//! # Examples
//!
//! ```ignore
//! use trellis_core::ui::styling::StyleSheet;
//!
//! let style = StyleSheet::default();
//! let button = Button::with_label(&style, Point::new(10, 10), Size::new(120, 40), "Play");
//! ```

pub mod colors;
pub mod sheet;

pub use colors::{
    COLOR_ACCENT, COLOR_ACCENT_DIM, COLOR_BACKGROUND, COLOR_FOREGROUND, COLOR_STROKE, DARK_GRAY,
    LIGHT_GRAY, WHITE,
};
pub use sheet::{StyleConfig, StyleError, StyleResult, StyleSheet};
