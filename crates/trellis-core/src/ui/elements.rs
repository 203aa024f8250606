// src/ui/elements.rs
//! Concrete tree element enum.
//!
//! Layouts need to own heterogeneous children *without* trait objects.
//! `DrawTarget` is generic, which makes [`ScreenItem`] **not object-safe**,
//! so every node kind the tree supports is listed here and dispatched with a
//! `match`.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::components::{Button, Widget};
use crate::ui::core::{ClickEvent, DragEvent, Feedback, HighlightEvent, ItemId, ScreenItem, ScreenState};
use crate::ui::layouts::{Layout, ScrollLayout};
use crate::ui::timer::FrameClock;

/// A node of the widget tree.
#[derive(Debug)]
pub enum Element {
    Widget(Widget),
    Layout(Layout),
    Scroll(ScrollLayout),
    Button(Button),
}

impl Element {
    /// Child container of a layout or scroll layout.
    ///
    /// Buttons own a layout too, but it is not exposed for lookup.
    pub fn container(&self) -> Option<&Layout> {
        match self {
            Element::Layout(layout) => Some(layout),
            Element::Scroll(scroll) => Some(scroll.layout()),
            Element::Widget(_) | Element::Button(_) => None,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Element::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            Element::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Element::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Element::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_layout_mut(&mut self) -> Option<&mut Layout> {
        match self {
            Element::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn as_scroll(&self) -> Option<&ScrollLayout> {
        match self {
            Element::Scroll(scroll) => Some(scroll),
            _ => None,
        }
    }

    pub fn as_scroll_mut(&mut self) -> Option<&mut ScrollLayout> {
        match self {
            Element::Scroll(scroll) => Some(scroll),
            _ => None,
        }
    }
}

impl From<Widget> for Element {
    fn from(widget: Widget) -> Self {
        Element::Widget(widget)
    }
}

impl From<Layout> for Element {
    fn from(layout: Layout) -> Self {
        Element::Layout(layout)
    }
}

impl From<ScrollLayout> for Element {
    fn from(scroll: ScrollLayout) -> Self {
        Element::Scroll(scroll)
    }
}

impl From<Button> for Element {
    fn from(button: Button) -> Self {
        Element::Button(button)
    }
}

impl ScreenItem for Element {
    fn id(&self) -> ItemId {
        match self {
            Element::Widget(w) => w.id(),
            Element::Layout(l) => l.id(),
            Element::Scroll(s) => s.id(),
            Element::Button(b) => b.id(),
        }
    }

    fn position(&self) -> Point {
        match self {
            Element::Widget(w) => w.position(),
            Element::Layout(l) => l.position(),
            Element::Scroll(s) => s.position(),
            Element::Button(b) => b.position(),
        }
    }

    fn set_position(&mut self, position: Point) {
        match self {
            Element::Widget(w) => w.set_position(position),
            Element::Layout(l) => l.set_position(position),
            Element::Scroll(s) => s.set_position(position),
            Element::Button(b) => b.set_position(position),
        }
    }

    fn rect(&self) -> Rectangle {
        match self {
            Element::Widget(w) => w.rect(),
            Element::Layout(l) => l.rect(),
            Element::Scroll(s) => s.rect(),
            Element::Button(b) => b.rect(),
        }
    }

    fn layer(&self) -> f32 {
        match self {
            Element::Widget(w) => w.layer(),
            Element::Layout(l) => l.layer(),
            Element::Scroll(s) => s.layer(),
            Element::Button(b) => b.layer(),
        }
    }

    fn set_layer(&mut self, layer: f32) {
        match self {
            Element::Widget(w) => w.set_layer(layer),
            Element::Layout(l) => l.set_layer(layer),
            Element::Scroll(s) => s.set_layer(layer),
            Element::Button(b) => b.set_layer(layer),
        }
    }

    fn scale(&self) -> f32 {
        match self {
            Element::Widget(w) => w.scale(),
            Element::Layout(l) => l.scale(),
            Element::Scroll(s) => s.scale(),
            Element::Button(b) => b.scale(),
        }
    }

    fn set_scale(&mut self, scale: f32) {
        match self {
            Element::Widget(w) => w.set_scale(scale),
            Element::Layout(l) => l.set_scale(scale),
            Element::Scroll(s) => s.set_scale(scale),
            Element::Button(b) => b.set_scale(scale),
        }
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        match self {
            Element::Widget(w) => w.set_highlighted(highlighted),
            Element::Layout(l) => l.set_highlighted(highlighted),
            Element::Scroll(s) => s.set_highlighted(highlighted),
            Element::Button(b) => b.set_highlighted(highlighted),
        }
    }

    fn set_clicked(&mut self, clicked: bool) {
        match self {
            Element::Widget(w) => w.set_clicked(clicked),
            Element::Layout(l) => l.set_clicked(clicked),
            Element::Scroll(s) => s.set_clicked(clicked),
            Element::Button(b) => b.set_clicked(clicked),
        }
    }

    fn set_draw_when_inactive(&mut self, draw: bool) {
        match self {
            Element::Widget(w) => w.set_draw_when_inactive(draw),
            Element::Layout(l) => l.set_draw_when_inactive(draw),
            Element::Scroll(s) => s.set_draw_when_inactive(draw),
            Element::Button(b) => b.set_draw_when_inactive(draw),
        }
    }

    fn update(&mut self, screen: &ScreenState, clock: &FrameClock) {
        match self {
            Element::Widget(w) => w.update(screen, clock),
            Element::Layout(l) => l.update(screen, clock),
            Element::Scroll(s) => s.update(screen, clock),
            Element::Button(b) => b.update(screen, clock),
        }
    }

    fn draw_background<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self {
            Element::Widget(w) => w.draw_background(target, screen),
            Element::Layout(l) => l.draw_background(target, screen),
            Element::Scroll(s) => s.draw_background(target, screen),
            Element::Button(b) => b.draw_background(target, screen),
        }
    }

    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self {
            Element::Widget(w) => w.draw(target, screen),
            Element::Layout(l) => l.draw(target, screen),
            Element::Scroll(s) => s.draw(target, screen),
            Element::Button(b) => b.draw(target, screen),
        }
    }

    fn check_highlight(&mut self, highlight: &HighlightEvent, feedback: &mut Feedback) -> bool {
        match self {
            Element::Widget(w) => w.check_highlight(highlight, feedback),
            Element::Layout(l) => l.check_highlight(highlight, feedback),
            Element::Scroll(s) => s.check_highlight(highlight, feedback),
            Element::Button(b) => b.check_highlight(highlight, feedback),
        }
    }

    fn check_click(&mut self, click: &ClickEvent, feedback: &mut Feedback) -> bool {
        match self {
            Element::Widget(w) => w.check_click(click, feedback),
            Element::Layout(l) => l.check_click(click, feedback),
            Element::Scroll(s) => s.check_click(click, feedback),
            Element::Button(b) => b.check_click(click, feedback),
        }
    }

    fn check_drag(&mut self, drag: &DragEvent, feedback: &mut Feedback) -> bool {
        match self {
            Element::Widget(w) => w.check_drag(drag, feedback),
            Element::Layout(l) => l.check_drag(drag, feedback),
            Element::Scroll(s) => s.check_drag(drag, feedback),
            Element::Button(b) => b.check_drag(drag, feedback),
        }
    }
}
