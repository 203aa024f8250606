// src/ui/layouts/layout.rs
//! Composite container owning an ordered list of tree items

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::core::{
    ClickEvent, DragEvent, EventChannel, Feedback, HighlightEvent, ItemId, ScreenItem,
    ScreenState, is_empty_rect, union_rect,
};
use crate::ui::elements::Element;
use crate::ui::timer::FrameClock;

/// Horizontal anchoring of a container relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Position is the left edge
    #[default]
    Left,
    /// Position is the horizontal center
    Center,
    /// Position is the right edge
    Right,
}

/// Vertical anchoring of a container relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Position is the top edge
    #[default]
    Top,
    /// Position is the vertical center
    Center,
    /// Position is the bottom edge
    Bottom,
}

/// Direction for stacked placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// How a layout positions the items added to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Items keep the position they were built with.
    #[default]
    Absolute,
    /// Items are placed one after another from the layout's position.
    ///
    /// Removing an item re-flows the remaining ones.
    Stack { direction: Direction, spacing: u32 },
}

/// Composite container.
///
/// The layout's rectangle is never stored: it is the union of its children's
/// non-empty rectangles, or a zero-size rectangle at `position` when there is
/// nothing to union. Children are drawn and updated in collection order; call
/// [`Layout::sort`] to order them by layer.
///
/// # Examples
/// ```ignore
/// let mut column = Layout::stacked(Point::new(10, 10), Direction::Vertical, 4);
/// let play = column.add_item(Button::with_label(&style, Point::zero(), Size::new(100, 30), "Play"));
/// column.add_item(Button::with_label(&style, Point::zero(), Size::new(100, 30), "Quit"));
///
/// column.on_click().subscribe(|click| info!("menu clicked at {:?}", click.position));
/// ```
#[derive(Debug)]
pub struct Layout {
    id: ItemId,
    items: Vec<Element>,
    position: Point,
    layer: f32,
    scale: f32,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    placement: Placement,
    on_click: EventChannel<ClickEvent>,
    on_highlight: EventChannel<HighlightEvent>,
    on_drag: EventChannel<DragEvent>,
}

impl Layout {
    /// Empty layout with absolute placement.
    pub fn new(position: Point) -> Self {
        Self {
            id: ItemId::next(),
            items: Vec::new(),
            position,
            layer: 0.0,
            scale: 1.0,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            placement: Placement::Absolute,
            on_click: EventChannel::new(),
            on_highlight: EventChannel::new(),
            on_drag: EventChannel::new(),
        }
    }

    /// Empty layout stacking its items along `direction`, `spacing` pixels apart.
    pub fn stacked(position: Point, direction: Direction, spacing: u32) -> Self {
        let mut layout = Self::new(position);
        layout.placement = Placement::Stack { direction, spacing };
        layout
    }

    pub fn with_alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }

    pub fn with_layer(mut self, layer: f32) -> Self {
        self.layer = layer;
        self
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    /// Change alignment without moving any item.
    pub(crate) fn set_alignment(
        &mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn items(&self) -> &[Element] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Listeners notified when a child accepts a click.
    pub fn on_click(&mut self) -> &mut EventChannel<ClickEvent> {
        &mut self.on_click
    }

    /// Listeners notified when a child reports itself highlighted.
    pub fn on_highlight(&mut self) -> &mut EventChannel<HighlightEvent> {
        &mut self.on_highlight
    }

    /// Listeners notified when a drag is consumed.
    pub fn on_drag(&mut self) -> &mut EventChannel<DragEvent> {
        &mut self.on_drag
    }

    /// Append an item and return its handle.
    pub fn add_item(&mut self, item: impl Into<Element>) -> ItemId {
        let item = item.into();
        let id = item.id();
        self.items.push(item);
        if matches!(self.placement, Placement::Stack { .. }) {
            self.reflow();
        }

        debug!(
            "Layout {}: added item {} ({} items)",
            self.id.get(),
            id.get(),
            self.items.len()
        );
        id
    }

    /// Remove the first item with handle `id`, handing it back to the caller.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Element> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let item = self.items.remove(index);
        if matches!(self.placement, Placement::Stack { .. }) {
            self.reflow();
        }

        debug!("Layout {}: removed item {}", self.id.get(), id.get());
        Some(item)
    }

    /// Direct child with handle `id`.
    pub fn item(&self, id: ItemId) -> Option<&Element> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Element> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Item with handle `id` anywhere below this layout, including inside
    /// nested layouts and scroll layouts.
    pub fn find(&self, id: ItemId) -> Option<&Element> {
        for item in &self.items {
            if item.id() == id {
                return Some(item);
            }
            if let Some(found) = item.container().and_then(|inner| inner.find(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable lookup through nested plain layouts.
    ///
    /// Scroll layouts are not entered: their children may only change through
    /// the scroll layout itself.
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Element> {
        for item in self.items.iter_mut() {
            if item.id() == id {
                return Some(item);
            }
            if let Element::Layout(inner) = item {
                if let Some(found) = inner.find_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Stable ascending sort by layer.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| a.layer().total_cmp(&b.layer()));
    }

    /// Union of the children's non-empty rectangles, if any.
    pub fn content_rect(&self) -> Option<Rectangle> {
        let content = self
            .items
            .iter()
            .map(ScreenItem::rect)
            .fold(Rectangle::zero(), union_rect);

        if is_empty_rect(&content) {
            None
        } else {
            Some(content)
        }
    }

    /// Shift every child by `delta` without moving the layout's anchor.
    pub(crate) fn translate_items(&mut self, delta: Point) {
        if delta == Point::zero() {
            return;
        }
        for item in self.items.iter_mut() {
            item.translate(delta);
        }
    }

    /// Move the anchor without moving any child.
    pub(crate) fn set_anchor(&mut self, position: Point) {
        self.position = position;
    }

    fn reflow(&mut self) {
        let Placement::Stack { direction, spacing } = self.placement else {
            return;
        };

        let mut cursor = self.position;
        for item in self.items.iter_mut() {
            item.set_position(cursor);
            let size = item.rect().size;
            cursor = match direction {
                Direction::Horizontal => {
                    Point::new(cursor.x + size.width as i32 + spacing as i32, cursor.y)
                }
                Direction::Vertical => {
                    Point::new(cursor.x, cursor.y + size.height as i32 + spacing as i32)
                }
            };
        }
    }
}

impl ScreenItem for Layout {
    fn id(&self) -> ItemId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    /// Move the layout, carrying every child along by the same delta.
    fn set_position(&mut self, position: Point) {
        let delta = position - self.position;
        self.position = position;
        self.translate_items(delta);
    }

    fn rect(&self) -> Rectangle {
        self.content_rect()
            .unwrap_or_else(|| Rectangle::new(self.position, Size::zero()))
    }

    fn layer(&self) -> f32 {
        self.layer
    }

    fn set_layer(&mut self, layer: f32) {
        self.layer = layer;
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        for item in self.items.iter_mut() {
            item.set_scale(scale);
        }
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        for item in self.items.iter_mut() {
            item.set_highlighted(highlighted);
        }
    }

    fn set_clicked(&mut self, clicked: bool) {
        for item in self.items.iter_mut() {
            item.set_clicked(clicked);
        }
    }

    fn set_draw_when_inactive(&mut self, draw: bool) {
        for item in self.items.iter_mut() {
            item.set_draw_when_inactive(draw);
        }
    }

    fn update(&mut self, screen: &ScreenState, clock: &FrameClock) {
        for item in self.items.iter_mut() {
            item.update(screen, clock);
        }
    }

    fn draw_background<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for item in self.items.iter_mut() {
            item.draw_background(target, screen)?;
        }
        Ok(())
    }

    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for item in self.items.iter_mut() {
            item.draw(target, screen)?;
        }
        Ok(())
    }

    /// Every child is tested, so each one updates its own highlight flag.
    fn check_highlight(&mut self, highlight: &HighlightEvent, feedback: &mut Feedback) -> bool {
        let mut highlighted = false;
        for item in self.items.iter_mut() {
            highlighted |= item.check_highlight(highlight, feedback);
        }

        if highlighted {
            self.on_highlight.emit(highlight);
        }
        highlighted
    }

    fn check_click(&mut self, click: &ClickEvent, feedback: &mut Feedback) -> bool {
        if !self.rect().contains(click.position) {
            return false;
        }

        let accepted = self
            .items
            .iter_mut()
            .any(|item| item.check_click(click, feedback));

        if accepted {
            self.on_click.emit(click);
        }
        accepted
    }

    fn check_drag(&mut self, drag: &DragEvent, feedback: &mut Feedback) -> bool {
        if !self.rect().contains(drag.start) {
            return false;
        }

        let accepted = self
            .items
            .iter_mut()
            .any(|item| item.check_drag(drag, feedback));

        if accepted {
            self.on_drag.emit(drag);
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::{Button, Widget};
    use crate::ui::styling::StyleSheet;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn panel(x: i32, y: i32, w: u32, h: u32) -> Widget {
        Widget::panel(&StyleSheet::default(), Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_empty_layout_rect_is_zero_size_at_position() {
        let layout = Layout::new(Point::new(7, 9));
        assert_eq!(layout.rect(), Rectangle::new(Point::new(7, 9), Size::zero()));
    }

    #[test]
    fn test_rect_is_union_of_non_empty_children() {
        let mut layout = Layout::new(Point::zero());
        layout.add_item(panel(10, 10, 20, 20));
        layout.add_item(panel(50, 40, 10, 10));
        layout.add_item(Widget::shim(Point::new(-100, -100), Size::zero()));

        assert_eq!(
            layout.rect(),
            Rectangle::new(Point::new(10, 10), Size::new(50, 40))
        );
    }

    #[test]
    fn test_rect_tracks_removal() {
        let mut layout = Layout::new(Point::new(3, 3));
        let a = layout.add_item(panel(0, 0, 10, 10));
        let b = layout.add_item(panel(100, 100, 10, 10));

        assert!(layout.remove_item(b).is_some());
        assert_eq!(layout.rect(), Rectangle::new(Point::zero(), Size::new(10, 10)));

        assert!(layout.remove_item(b).is_none());
        assert!(layout.remove_item(a).is_some());
        assert_eq!(layout.rect(), Rectangle::new(Point::new(3, 3), Size::zero()));
    }

    #[test]
    fn test_click_outside_rect_is_rejected() {
        let style = StyleSheet::default();
        let mut feedback = Feedback::new();
        let mut layout = Layout::new(Point::zero());
        layout.add_item(Button::new(&style, Point::zero(), Size::new(10, 10)));

        assert!(!layout.check_click(&ClickEvent::at(50, 50), &mut feedback));
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_click_short_circuits_at_first_acceptor() {
        let style = StyleSheet::default();
        let mut feedback = Feedback::new();
        let mut layout = Layout::new(Point::zero());
        let first = layout.add_item(Button::new(&style, Point::zero(), Size::new(20, 20)));
        let second = layout.add_item(Button::new(&style, Point::new(5, 5), Size::new(20, 20)));

        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        layout.on_click().subscribe(move |_| counter.set(counter.get() + 1));

        assert!(layout.check_click(&ClickEvent::at(10, 10), &mut feedback));
        assert_eq!(fired.get(), 1);

        let first = layout.item(first).and_then(Element::as_button).unwrap();
        let second = layout.item(second).and_then(Element::as_button).unwrap();
        assert!(first.is_clicked());
        assert!(!second.is_clicked());
    }

    #[test]
    fn test_highlight_tests_every_child() {
        let mut feedback = Feedback::new();
        let mut layout = Layout::new(Point::zero());
        let a = layout.add_item(panel(0, 0, 20, 20));
        let b = layout.add_item(panel(5, 5, 20, 20));
        let c = layout.add_item(panel(100, 100, 5, 5));

        assert!(layout.check_highlight(&HighlightEvent::at(10, 10), &mut feedback));

        let highlighted = |id| {
            layout
                .item(id)
                .and_then(Element::as_widget)
                .map(Widget::is_highlighted)
        };
        assert_eq!(highlighted(a), Some(true));
        assert_eq!(highlighted(b), Some(true));
        assert_eq!(highlighted(c), Some(false));
    }

    #[test]
    fn test_highlight_sets_only_the_accepting_child() {
        let mut feedback = Feedback::new();
        let mut layout = Layout::new(Point::zero());
        let first = layout.add_item(panel(0, 0, 10, 10));
        let second = layout.add_item(panel(20, 0, 10, 10));
        let third = layout.add_item(panel(40, 0, 10, 10));

        assert!(layout.check_highlight(&HighlightEvent::at(25, 5), &mut feedback));

        let highlighted = |id| {
            layout
                .item(id)
                .and_then(Element::as_widget)
                .map(Widget::is_highlighted)
        };
        assert_eq!(highlighted(first), Some(false));
        assert_eq!(highlighted(second), Some(true));
        assert_eq!(highlighted(third), Some(false));
    }

    #[test]
    fn test_highlight_misses_everything() {
        let mut feedback = Feedback::new();
        let mut layout = Layout::new(Point::zero());
        layout.add_item(panel(0, 0, 20, 20));

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        layout.on_highlight().subscribe(move |_| flag.set(true));

        assert!(!layout.check_highlight(&HighlightEvent::at(50, 50), &mut feedback));
        assert!(!fired.get());
    }

    #[test]
    fn test_set_position_carries_children() {
        let mut layout = Layout::new(Point::new(10, 10));
        let id = layout.add_item(panel(10, 10, 5, 5));

        layout.set_position(Point::new(30, 40));
        assert_eq!(layout.item(id).map(ScreenItem::position), Some(Point::new(30, 40)));
        assert_eq!(layout.rect().top_left, Point::new(30, 40));
    }

    #[test]
    fn test_stack_places_items_in_sequence() {
        let mut column = Layout::stacked(Point::new(5, 5), Direction::Vertical, 2);
        let a = column.add_item(panel(0, 0, 40, 10));
        let b = column.add_item(panel(0, 0, 40, 20));
        let c = column.add_item(panel(0, 0, 40, 10));

        let top = |layout: &Layout, id| layout.item(id).map(|item| item.position().y);
        assert_eq!(top(&column, a), Some(5));
        assert_eq!(top(&column, b), Some(17));
        assert_eq!(top(&column, c), Some(39));

        column.remove_item(b);
        assert_eq!(top(&column, c), Some(17));
    }

    #[test]
    fn test_horizontal_stack() {
        let mut row = Layout::stacked(Point::zero(), Direction::Horizontal, 4);
        row.add_item(panel(0, 0, 10, 10));
        let b = row.add_item(panel(0, 0, 10, 10));

        assert_eq!(row.item(b).map(ScreenItem::position), Some(Point::new(14, 0)));
    }

    #[test]
    fn test_sort_is_stable_by_layer() {
        let mut layout = Layout::new(Point::zero());
        let top = layout.add_item(panel(0, 0, 1, 1).with_layer(2.0));
        let low_a = layout.add_item(panel(0, 0, 1, 1).with_layer(1.0));
        let low_b = layout.add_item(panel(0, 0, 1, 1).with_layer(1.0));

        layout.sort();

        let order: Vec<ItemId> = layout.items().iter().map(ScreenItem::id).collect();
        assert_eq!(order, [low_a, low_b, top]);
    }

    #[test]
    fn test_flags_fan_out() {
        let mut layout = Layout::new(Point::zero());
        let a = layout.add_item(panel(0, 0, 10, 10));
        let b = layout.add_item(panel(20, 0, 10, 10));

        layout.set_clicked(true);
        layout.set_scale(2.0);

        for id in [a, b] {
            let widget = layout.item(id).and_then(Element::as_widget).unwrap();
            assert!(widget.is_clicked());
            assert_eq!(widget.rect().size, Size::new(20, 20));
        }
    }

    #[test]
    fn test_find_reaches_nested_layouts() {
        let mut inner = Layout::new(Point::zero());
        let deep = inner.add_item(panel(0, 0, 5, 5));

        let mut outer = Layout::new(Point::zero());
        outer.add_item(inner);

        assert!(outer.item(deep).is_none());
        assert!(outer.find(deep).is_some());
        assert!(outer.find_mut(deep).is_some());
    }

    #[test]
    fn test_find_mut_skips_scroll_layouts() {
        let style = StyleSheet::default();
        let mut scroll = crate::ui::layouts::ScrollLayout::new(&style, Point::zero(), Size::new(10, 10));
        let hidden = scroll.add_item(panel(0, 0, 5, 5));

        let mut outer = Layout::new(Point::zero());
        outer.add_item(scroll);

        assert!(outer.find(hidden).is_some());
        assert!(outer.find_mut(hidden).is_none());
    }
}
