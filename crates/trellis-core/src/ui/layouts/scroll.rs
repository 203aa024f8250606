// src/ui/layouts/scroll.rs
//! Scrollable viewport composited through an off-screen surface
//!
//! A [`ScrollLayout`] clips its children to a viewport rectangle. Children are
//! drawn into a [`Surface`] sized to the viewport and the surface is blitted
//! onto the host target, followed by the scrollbars when a pointer is over
//! the viewport.
//!
//! Scrolling never moves the viewport. Changing the scroll offset by `d`
//! translates every child by `-d`, so at offset `(0, 200)` the content that
//! rested 200 px below the viewport's top edge is now flush with it.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::debug;

use super::layout::{HorizontalAlignment, Layout, VerticalAlignment};
use crate::ui::core::{
    ClickEvent, DragEvent, EventChannel, Feedback, HighlightEvent, ItemId, ScreenItem,
    ScreenState, bottom_right, union_rect,
};
use crate::ui::elements::Element;
use crate::ui::styling::StyleSheet;
use crate::ui::surface::Surface;
use crate::ui::timer::FrameClock;

/// Width of the vertical bar and height of the horizontal bar, in pixels.
pub const SCROLLBAR_THICKNESS: u32 = 16;

/// Viewport that scrolls, clips and composites its children.
///
/// # Invariants
/// - `min_scroll <= scroll_position <= max_scroll` on each axis after every
///   public call returns.
/// - The surface, when present, has exactly the viewport's size.
#[derive(Debug)]
pub struct ScrollLayout {
    layout: Layout,
    size: Size,
    scroll: Point,
    min_scroll: Point,
    max_scroll: Point,
    vertical_bar: Option<Rectangle>,
    horizontal_bar: Option<Rectangle>,
    draw_scrollbars: bool,
    scrollbar_color: Rgb565,
    surface: Option<Surface>,
    surfaces_created: u32,
}

impl ScrollLayout {
    /// Viewport of `size` anchored at `position` (top-left until aligned otherwise).
    pub fn new(style: &StyleSheet, position: Point, size: Size) -> Self {
        let mut scroll = Self {
            layout: Layout::new(position),
            size,
            scroll: Point::zero(),
            min_scroll: Point::zero(),
            max_scroll: Point::zero(),
            vertical_bar: None,
            horizontal_bar: None,
            draw_scrollbars: false,
            scrollbar_color: style.scrollbar_color,
            surface: None,
            surfaces_created: 0,
        };
        scroll.recompute_scroll_bounds();
        scroll
    }

    /// Anchor the viewport differently relative to its position.
    pub fn with_alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.relocate(self.layout.position(), horizontal, vertical);
        self.recompute_scroll_bounds();
        self
    }

    pub fn with_layer(mut self, layer: f32) -> Self {
        self.layout.set_layer(layer);
        self
    }

    /// Children container. Read-only: edits go through the scroll layout so
    /// scroll bounds stay in sync.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn on_click(&mut self) -> &mut EventChannel<ClickEvent> {
        self.layout.on_click()
    }

    pub fn on_highlight(&mut self) -> &mut EventChannel<HighlightEvent> {
        self.layout.on_highlight()
    }

    pub fn on_drag(&mut self) -> &mut EventChannel<DragEvent> {
        self.layout.on_drag()
    }

    /// On-screen rectangle the children are clipped to.
    pub fn viewport(&self) -> Rectangle {
        let position = self.layout.position();
        let width = self.size.width as i32;
        let height = self.size.height as i32;

        let x = match self.layout.horizontal_alignment() {
            HorizontalAlignment::Left => position.x,
            HorizontalAlignment::Center => position.x - width / 2,
            HorizontalAlignment::Right => position.x - width,
        };
        let y = match self.layout.vertical_alignment() {
            VerticalAlignment::Top => position.y,
            VerticalAlignment::Center => position.y - height / 2,
            VerticalAlignment::Bottom => position.y - height,
        };

        Rectangle::new(Point::new(x, y), self.size)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the viewport. The composition surface is dropped and recreated
    /// at the new size on the next draw.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.surface = None;
        self.recompute_scroll_bounds();
    }

    pub fn scroll_position(&self) -> Point {
        self.scroll
    }

    pub fn min_scroll(&self) -> Point {
        self.min_scroll
    }

    pub fn max_scroll(&self) -> Point {
        self.max_scroll
    }

    /// Scroll to `position`, clamped to the scroll bounds.
    pub fn set_scroll_position(&mut self, position: Point) {
        let clamped = self.constrain_scroll(position);
        let delta = self.scroll - clamped;
        if delta != Point::zero() {
            self.layout.translate_items(delta);
            self.scroll = clamped;
        }
        self.update_scrollbars();
    }

    /// Scroll by `delta`, clamped to the scroll bounds.
    pub fn scroll_by(&mut self, delta: Point) {
        self.set_scroll_position(self.scroll + delta);
    }

    pub fn vertical_scrollbar(&self) -> Option<Rectangle> {
        self.vertical_bar
    }

    pub fn horizontal_scrollbar(&self) -> Option<Rectangle> {
        self.horizontal_bar
    }

    /// Whether the scrollbars are drawn this frame.
    pub fn draws_scrollbars(&self) -> bool {
        self.draw_scrollbars
    }

    /// Size of the current composition surface, if one exists.
    pub fn surface_size(&self) -> Option<Size> {
        self.surface.as_ref().map(OriginDimensions::size)
    }

    /// Number of composition surfaces allocated so far.
    pub fn surfaces_created(&self) -> u32 {
        self.surfaces_created
    }

    /// Add a child, positioned relative to the content's resting place.
    ///
    /// The item is shifted by the current scroll offset so that it lands where
    /// it would be had the content never scrolled. Scroll-layout children never
    /// carry the screen transition; only the composed viewport does.
    pub fn add_item(&mut self, item: impl Into<Element>) -> ItemId {
        let mut item = item.into();
        item.translate(Point::zero() - self.scroll);
        let id = self.layout.add_item(item);
        self.recompute_scroll_bounds();
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Element> {
        let removed = self.layout.remove_item(id)?;
        self.recompute_scroll_bounds();
        Some(removed)
    }

    pub fn item(&self, id: ItemId) -> Option<&Element> {
        self.layout.item(id)
    }

    pub fn sort(&mut self) {
        self.layout.sort();
    }

    /// Content rectangle at scroll offset zero, unioned with the viewport.
    fn total_rect(&self) -> Rectangle {
        let viewport = self.viewport();
        match self.layout.content_rect() {
            Some(content) => union_rect(viewport, content.translate(self.scroll)),
            None => viewport,
        }
    }

    /// Re-derive scroll bounds from the current content, re-clamp the offset,
    /// and refresh scrollbar geometry.
    fn recompute_scroll_bounds(&mut self) {
        let viewport = self.viewport();
        let total = self.total_rect();

        let min = total.top_left - viewport.top_left;
        let max = bottom_right(&total) - bottom_right(&viewport);

        if min != self.min_scroll || max != self.max_scroll {
            debug!(
                "ScrollLayout {}: scroll bounds ({}, {})..=({}, {})",
                self.layout.id().get(),
                min.x,
                min.y,
                max.x,
                max.y
            );
        }

        self.min_scroll = min;
        self.max_scroll = max;
        self.set_scroll_position(self.scroll);
    }

    fn constrain_scroll(&self, mut value: Point) -> Point {
        if value.x < self.min_scroll.x {
            value.x = self.min_scroll.x;
        } else if value.x > self.max_scroll.x {
            value.x = self.max_scroll.x;
        }

        if value.y < self.min_scroll.y {
            value.y = self.min_scroll.y;
        } else if value.y > self.max_scroll.y {
            value.y = self.max_scroll.y;
        }

        value
    }

    fn update_scrollbars(&mut self) {
        let viewport = self.viewport();
        let window_w = viewport.size.width as f32;
        let window_h = viewport.size.height as f32;

        let span = self.max_scroll - self.min_scroll;
        let total_w = window_w + span.x as f32;
        let total_h = window_h + span.y as f32;

        let ratio_x = ratio(window_w, total_w);
        let ratio_y = ratio(window_h, total_h);

        let bar_w = window_w * ratio_x;
        let bar_h = window_h * ratio_y;

        let travel_x = (window_w - bar_w) * ratio((self.scroll.x - self.min_scroll.x) as f32, span.x as f32);
        let travel_y = (window_h - bar_h) * ratio((self.scroll.y - self.min_scroll.y) as f32, span.y as f32);

        let right = viewport.top_left.x + viewport.size.width as i32;
        let bottom = viewport.top_left.y + viewport.size.height as i32;

        self.vertical_bar = (0.0 < ratio_y && ratio_y < 1.0).then(|| {
            Rectangle::new(
                Point::new(
                    right - SCROLLBAR_THICKNESS as i32,
                    viewport.top_left.y + travel_y as i32,
                ),
                Size::new(SCROLLBAR_THICKNESS, bar_h as u32),
            )
        });

        self.horizontal_bar = (0.0 < ratio_x && ratio_x < 1.0).then(|| {
            Rectangle::new(
                Point::new(
                    viewport.top_left.x + travel_x as i32,
                    bottom - SCROLLBAR_THICKNESS as i32,
                ),
                Size::new(bar_w as u32, SCROLLBAR_THICKNESS),
            )
        });
    }

    /// Move the anchor and alignment, keeping children fixed relative to the
    /// viewport's top-left corner.
    fn relocate(
        &mut self,
        position: Point,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) {
        let before = self.viewport().top_left;
        self.layout.set_anchor(position);
        self.layout.set_alignment(horizontal, vertical);
        let after = self.viewport().top_left;
        self.layout.translate_items(after - before);
    }

    /// Draw every child into the composition surface, with the viewport's
    /// top-left corner temporarily moved to the surface origin.
    fn compose(&mut self, screen: &ScreenState, background: bool) {
        let saved_position = self.layout.position();
        let saved_horizontal = self.layout.horizontal_alignment();
        let saved_vertical = self.layout.vertical_alignment();

        self.relocate(Point::zero(), HorizontalAlignment::Left, VerticalAlignment::Top);

        let size = self.size;
        if self.surface.is_none() {
            self.surfaces_created += 1;
            debug!(
                "ScrollLayout {}: created {}x{} composition surface",
                self.layout.id().get(),
                size.width,
                size.height
            );
        }
        let surface = self.surface.get_or_insert_with(|| Surface::new(size));

        let inner = screen.without_transition();
        let result = if background {
            surface.clear_transparent();
            self.layout.draw_background(surface, &inner)
        } else {
            self.layout.draw(surface, &inner)
        };

        self.relocate(saved_position, saved_horizontal, saved_vertical);

        result.unwrap_or_else(|never| match never {});
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl ScreenItem for ScrollLayout {
    fn id(&self) -> ItemId {
        self.layout.id()
    }

    fn position(&self) -> Point {
        self.layout.position()
    }

    /// Move the viewport and its children together.
    fn set_position(&mut self, position: Point) {
        self.layout.set_position(position);
        self.recompute_scroll_bounds();
    }

    /// The viewport; content outside it is clipped.
    fn rect(&self) -> Rectangle {
        self.viewport()
    }

    fn layer(&self) -> f32 {
        self.layout.layer()
    }

    fn set_layer(&mut self, layer: f32) {
        self.layout.set_layer(layer);
    }

    fn scale(&self) -> f32 {
        self.layout.scale()
    }

    fn set_scale(&mut self, scale: f32) {
        self.layout.set_scale(scale);
        self.recompute_scroll_bounds();
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.layout.set_highlighted(highlighted);
    }

    fn set_clicked(&mut self, clicked: bool) {
        self.layout.set_clicked(clicked);
    }

    fn set_draw_when_inactive(&mut self, draw: bool) {
        self.layout.set_draw_when_inactive(draw);
    }

    fn update(&mut self, screen: &ScreenState, clock: &FrameClock) {
        self.draw_scrollbars = false;
        self.recompute_scroll_bounds();
        self.layout.update(screen, clock);
    }

    fn draw_background<D>(&mut self, _target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.compose(screen, true);
        Ok(())
    }

    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.compose(screen, false);

        let origin = self.viewport().top_left + screen.transition;
        if let Some(surface) = &self.surface {
            surface.blit(target, origin)?;
        }

        if self.draw_scrollbars {
            let style = PrimitiveStyle::with_fill(self.scrollbar_color);
            for bar in [self.vertical_bar, self.horizontal_bar].into_iter().flatten() {
                bar.translate(screen.transition)
                    .into_styled(style)
                    .draw(target)?;
            }
        }

        Ok(())
    }

    fn check_highlight(&mut self, highlight: &HighlightEvent, feedback: &mut Feedback) -> bool {
        let children = self.layout.check_highlight(highlight, feedback);
        let inside = self.viewport().contains(highlight.position);
        if inside {
            self.draw_scrollbars = true;
        }
        children || inside
    }

    fn check_click(&mut self, click: &ClickEvent, feedback: &mut Feedback) -> bool {
        if !self.viewport().contains(click.position) {
            return false;
        }
        self.layout.check_click(click, feedback)
    }

    /// Any drag starting inside the viewport scrolls it; children are not asked.
    fn check_drag(&mut self, drag: &DragEvent, _feedback: &mut Feedback) -> bool {
        if !self.viewport().contains(drag.start) {
            return false;
        }

        self.scroll_by(drag.delta);
        self.draw_scrollbars = true;
        self.layout.on_drag().emit(drag);
        true
    }
}
