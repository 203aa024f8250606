// src/ui/core.rs
//! Core UI traits and types for the trellis widget tree

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::Cell;

use critical_section::Mutex;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::warn;

use super::timer::FrameClock;

/// Opaque handle addressing one item of the tree.
///
/// Handles are allocated from a global counter when an item is constructed,
/// so two live items never share one. The counter sits behind a
/// critical section, which also covers targets without atomic
/// compare-and-swap (thumbv6m, riscv32imc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

static NEXT_ITEM_ID: Mutex<Cell<u32>> = Mutex::new(Cell::new(1));

impl ItemId {
    pub(crate) fn next() -> Self {
        critical_section::with(|cs| {
            let counter = NEXT_ITEM_ID.borrow(cs);
            let id = counter.get();
            counter.set(id.wrapping_add(1));
            Self(id)
        })
    }

    /// Raw numeric value, for logging.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A pointer or touch was released over a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub position: Point,
}

impl ClickEvent {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y))
    }
}

/// A pointer is hovering over a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightEvent {
    pub position: Point,
}

impl HighlightEvent {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y))
    }
}

/// A drag gesture that started at `start` and moved by `delta` this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEvent {
    pub start: Point,
    pub delta: Point,
}

impl DragEvent {
    pub fn new(start: Point, delta: Point) -> Self {
        Self { start, delta }
    }
}

/// Per-frame screen state handed down the tree during update and draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenState {
    /// Whether the owning screen currently has focus.
    pub active: bool,
    /// Positional offset of the screen's running transition.
    pub transition: Point,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            active: true,
            transition: Point::zero(),
        }
    }
}

impl ScreenState {
    /// The same state with the transition offset removed.
    ///
    /// Items composed inside a scroll viewport do not transition on their own.
    pub fn without_transition(&self) -> Self {
        Self {
            transition: Point::zero(),
            ..*self
        }
    }
}

/// Maximum length in bytes of a cue name.
pub const CUE_NAME_CAPACITY: usize = 32;

/// Name of a feedback cue resolved by the host's audio service.
pub type CueName = heapless::String<CUE_NAME_CAPACITY>;

/// Maximum number of cue requests buffered between two host drains.
pub const FEEDBACK_CAPACITY: usize = 8;

/// Queue of feedback-cue playback requests raised during input routing.
///
/// The tree only decides *when* a cue should play; the host drains this
/// queue once per frame and hands each name to its audio service.
#[derive(Debug, Default)]
pub struct Feedback {
    pending: heapless::Vec<CueName, FEEDBACK_CAPACITY>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request playback of `cue`. Requests beyond capacity are dropped.
    pub fn request(&mut self, cue: &CueName) {
        if self.pending.push(cue.clone()).is_err() {
            warn!("Feedback queue full, dropping cue {}", cue.as_str());
        }
    }

    /// Take every pending request, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = CueName> + '_ {
        core::mem::take(&mut self.pending).into_iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending requests, oldest first.
    pub fn pending(&self) -> &[CueName] {
        &self.pending
    }
}

/// Listener callbacks invoked in registration order when an event is accepted.
pub struct EventChannel<E> {
    listeners: Vec<Box<dyn FnMut(&E)>>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E> core::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventChannel<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every listener with `event`.
    ///
    /// Returns `false` without doing any work when nobody is listening.
    pub fn emit(&mut self, event: &E) -> bool {
        if self.listeners.is_empty() {
            return false;
        }
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Whether a rectangle covers no pixels.
pub fn is_empty_rect(rect: &Rectangle) -> bool {
    rect.size.width == 0 || rect.size.height == 0
}

/// Exclusive bottom-right corner (`left + width`, `top + height`).
pub fn bottom_right(rect: &Rectangle) -> Point {
    rect.top_left + Point::new(rect.size.width as i32, rect.size.height as i32)
}

/// Smallest rectangle containing both operands.
///
/// An empty operand is skipped rather than unioned, so a zero-size child
/// parked somewhere never stretches the aggregate.
pub fn union_rect(a: Rectangle, b: Rectangle) -> Rectangle {
    if is_empty_rect(&a) {
        return b;
    }
    if is_empty_rect(&b) {
        return a;
    }

    let min_x = a.top_left.x.min(b.top_left.x);
    let min_y = a.top_left.y.min(b.top_left.y);

    let a_end = bottom_right(&a);
    let b_end = bottom_right(&b);
    let max_x = a_end.x.max(b_end.x);
    let max_y = a_end.y.max(b_end.y);

    Rectangle::new(
        Point::new(min_x, min_y),
        Size::new((max_x - min_x) as u32, (max_y - min_y) as u32),
    )
}

/// Capability set shared by every participant of the tree.
///
/// The draw methods are generic over the host's `DrawTarget`, which makes this
/// trait not object-safe; heterogeneous children are stored as
/// [`Element`](super::elements::Element) instead.
pub trait ScreenItem {
    /// Handle used to address this item inside its parent.
    fn id(&self) -> ItemId;

    /// Top-left anchor of the item.
    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Shift the item by `delta`.
    fn translate(&mut self, delta: Point) {
        let position = self.position();
        self.set_position(position + delta);
    }

    /// Screen-space rectangle occupied by the item.
    fn rect(&self) -> Rectangle;

    /// Ordering key: lower layers draw first.
    fn layer(&self) -> f32;

    fn set_layer(&mut self, layer: f32);

    fn scale(&self) -> f32;

    fn set_scale(&mut self, scale: f32);

    fn set_highlighted(&mut self, highlighted: bool);

    fn set_clicked(&mut self, clicked: bool);

    fn set_draw_when_inactive(&mut self, draw: bool);

    /// Advance per-frame state (timers, transient flags).
    fn update(&mut self, screen: &ScreenState, clock: &FrameClock);

    /// First draw pass. Must complete for the whole tree before [`Self::draw`].
    fn draw_background<D>(&mut self, _target: &mut D, _screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Ok(())
    }

    /// Second draw pass.
    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Returns `true` when the item reports itself highlighted.
    fn check_highlight(&mut self, highlight: &HighlightEvent, feedback: &mut Feedback) -> bool;

    /// Returns `true` when the item accepts the click.
    fn check_click(&mut self, click: &ClickEvent, feedback: &mut Feedback) -> bool;

    /// Returns `true` when the item consumes the drag.
    fn check_drag(&mut self, drag: &DragEvent, feedback: &mut Feedback) -> bool;
}
