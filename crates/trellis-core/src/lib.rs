//! Hardware-independent core library for trellis
//!
//! This crate contains the retained-mode widget tree: the composite
//! [`Layout`](ui::Layout) container, the scrollable
//! [`ScrollLayout`](ui::ScrollLayout) viewport that composites its children
//! through an off-screen surface, the debounced [`Button`](ui::Button) state
//! machine, and the [`WidgetScreen`](screen::WidgetScreen) host adapter.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the demo binary and tests).

#![no_std]

extern crate alloc;

pub mod screen;
pub mod ui;
