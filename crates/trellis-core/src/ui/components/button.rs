// src/ui/components/button.rs
//! Debounced button backed by its own layout
//!
//! A button draws nothing itself. Its visuals are a [`Layout`] holding a
//! background panel plus whatever else is added (labels, icons), and its
//! rectangle is that layout's aggregate rectangle.
//!
//! State machine:
//!
//! ```text
//! Idle --click accepted--> Clicked (debounce running) --timer expires--> Idle
//! ```
//!
//! Highlight is level-triggered: it follows the pointer on every
//! `check_highlight`, with the highlighted cue requested only when the button
//! becomes highlighted.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use super::widget::{LABEL_CAPACITY, Widget};
use crate::ui::core::{
    ClickEvent, CueName, DragEvent, EventChannel, Feedback, HighlightEvent, ItemId, ScreenItem,
    ScreenState,
};
use crate::ui::elements::Element;
use crate::ui::layouts::Layout;
use crate::ui::styling::StyleSheet;
use crate::ui::timer::{CountdownTimer, Duration, FrameClock};

/// How long a button reports itself clicked after accepting a click.
pub const CLICK_DEBOUNCE: Duration = Duration::from_millis(200);

// Menu entry sizing
const HORIZONTAL_PADDING: u32 = 20;
const VERTICAL_PADDING: u32 = 12;
const MIN_WIDTH: u32 = 100;
const MIN_HEIGHT: u32 = 44;

/// Clickable, highlightable compound widget.
#[derive(Debug)]
pub struct Button {
    id: ItemId,
    layout: Layout,
    background: ItemId,
    label: Option<ItemId>,
    size: Size,
    rect: Rectangle,
    layer: f32,
    highlighted: bool,
    click_timer: CountdownTimer,
    quiet: bool,
    description: Option<heapless::String<LABEL_CAPACITY>>,
    highlighted_sound: CueName,
    clicked_sound: CueName,
    selection_change_sound: CueName,
    on_click: EventChannel<ClickEvent>,
    on_highlight: EventChannel<HighlightEvent>,
    on_left: EventChannel<ItemId>,
    on_right: EventChannel<ItemId>,
}

impl Button {
    /// Button whose visuals are a single background panel of `size`.
    pub fn new(style: &StyleSheet, position: Point, size: Size) -> Self {
        let mut layout = Layout::new(position);
        let background = layout.add_item(Widget::panel(style, position, size));
        let rect = layout.rect();

        Self {
            id: ItemId::next(),
            layout,
            background,
            label: None,
            size,
            rect,
            layer: 0.0,
            highlighted: false,
            click_timer: CountdownTimer::new(),
            quiet: style.quiet,
            description: None,
            highlighted_sound: style.highlighted_sound.clone(),
            clicked_sound: style.clicked_sound.clone(),
            selection_change_sound: style.selection_change_sound.clone(),
            on_click: EventChannel::new(),
            on_highlight: EventChannel::new(),
            on_left: EventChannel::new(),
            on_right: EventChannel::new(),
        }
    }

    /// Button with a text label centered on its background.
    pub fn with_label(style: &StyleSheet, position: Point, size: Size, text: &str) -> Self {
        let mut button = Self::new(style, position, size);
        let label = button.layout.add_item(Widget::label(style, position, text));
        button.label = Some(label);
        button.center_label();
        button.calculate_rect();
        button
    }

    /// Labelled button sized to fit its text, as used for menu entries.
    ///
    /// The button will size itself to fit the label with standard padding.
    /// Minimum size is 100x44 for touchability.
    pub fn menu_entry(style: &StyleSheet, position: Point, text: &str) -> Self {
        let char_size = FONT_6X10.character_size;
        let text_width = text.chars().count().min(LABEL_CAPACITY) as u32 * char_size.width;

        let width = (text_width + 2 * HORIZONTAL_PADDING).max(MIN_WIDTH);
        let height = (char_size.height + 2 * VERTICAL_PADDING).max(MIN_HEIGHT);

        Self::with_label(style, position, Size::new(width, height), text)
    }

    /// Attach a longer description shown by menus that support one.
    pub fn with_description(mut self, text: &str) -> Self {
        let mut description = heapless::String::new();
        for ch in text.chars() {
            if description.push(ch).is_err() {
                break;
            }
        }
        self.description = Some(description);
        self
    }

    pub fn with_layer(mut self, layer: f32) -> Self {
        self.layer = layer;
        self
    }

    /// Visual sub-tree.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Handle of the background panel inside [`Self::layout`].
    pub fn background(&self) -> ItemId {
        self.background
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Text of the button's label, if it was built with one.
    pub fn label_text(&self) -> Option<&str> {
        self.label
            .and_then(|id| self.layout.item(id))
            .and_then(Element::as_widget)
            .and_then(Widget::text)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the background panel and re-center the label.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        if let Some(panel) = self
            .layout
            .item_mut(self.background)
            .and_then(Element::as_widget_mut)
        {
            panel.set_size(size);
        }
        self.center_label();
        self.calculate_rect();
    }

    /// True while the click debounce is running.
    pub fn is_clicked(&self) -> bool {
        self.click_timer.has_time_remaining()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Suppress (or restore) every cue request from this button.
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn on_click(&mut self) -> &mut EventChannel<ClickEvent> {
        &mut self.on_click
    }

    pub fn on_highlight(&mut self) -> &mut EventChannel<HighlightEvent> {
        &mut self.on_highlight
    }

    /// Listeners for a "previous option" selection, receiving this button's handle.
    pub fn on_left(&mut self) -> &mut EventChannel<ItemId> {
        &mut self.on_left
    }

    /// Listeners for a "next option" selection, receiving this button's handle.
    pub fn on_right(&mut self) -> &mut EventChannel<ItemId> {
        &mut self.on_right
    }

    /// Step the entry's selection left. Returns `false` when nobody listens.
    pub fn select_left(&mut self, feedback: &mut Feedback) -> bool {
        if self.on_left.is_empty() {
            return false;
        }
        if !self.quiet {
            feedback.request(&self.selection_change_sound);
        }
        self.on_left.emit(&self.id)
    }

    /// Step the entry's selection right. Returns `false` when nobody listens.
    pub fn select_right(&mut self, feedback: &mut Feedback) -> bool {
        if self.on_right.is_empty() {
            return false;
        }
        if !self.quiet {
            feedback.request(&self.selection_change_sound);
        }
        self.on_right.emit(&self.id)
    }

    /// Add content to the button's visuals.
    pub fn add_item(&mut self, item: impl Into<Element>) -> ItemId {
        let id = self.layout.add_item(item);
        self.calculate_rect();
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Element> {
        let removed = self.layout.remove_item(id)?;
        if self.label == Some(id) {
            self.label = None;
        }
        self.calculate_rect();
        Some(removed)
    }

    fn center_label(&mut self) {
        let Some(label_id) = self.label else {
            return;
        };
        let origin = self.layout.position();
        let size = self.size;

        if let Some(label) = self.layout.item_mut(label_id) {
            let text = label.rect().size;
            let offset = Point::new(
                (size.width.saturating_sub(text.width) / 2) as i32,
                (size.height.saturating_sub(text.height) / 2) as i32,
            );
            label.set_position(origin + offset);
        }
    }

    fn calculate_rect(&mut self) {
        self.rect = self.layout.rect();
    }
}

impl ScreenItem for Button {
    fn id(&self) -> ItemId {
        self.id
    }

    fn position(&self) -> Point {
        self.layout.position()
    }

    fn set_position(&mut self, position: Point) {
        self.layout.set_position(position);
        self.calculate_rect();
    }

    fn rect(&self) -> Rectangle {
        self.rect
    }

    fn layer(&self) -> f32 {
        self.layer
    }

    fn set_layer(&mut self, layer: f32) {
        self.layer = layer;
    }

    fn scale(&self) -> f32 {
        self.layout.scale()
    }

    fn set_scale(&mut self, scale: f32) {
        self.layout.set_scale(scale);
        self.calculate_rect();
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
        self.layout.set_highlighted(highlighted);
    }

    fn set_clicked(&mut self, clicked: bool) {
        self.layout.set_clicked(clicked);
    }

    fn set_draw_when_inactive(&mut self, draw: bool) {
        self.layout.set_draw_when_inactive(draw);
    }

    fn update(&mut self, screen: &ScreenState, clock: &FrameClock) {
        self.click_timer.update(clock);
        self.layout.update(screen, clock);
        self.layout.set_clicked(self.is_clicked());
    }

    fn draw_background<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.layout.draw_background(target, screen)
    }

    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.layout.draw(target, screen)
    }

    fn check_highlight(&mut self, highlight: &HighlightEvent, feedback: &mut Feedback) -> bool {
        let inside = self.rect.contains(highlight.position);
        if inside && !self.highlighted {
            if !self.quiet {
                feedback.request(&self.highlighted_sound);
            }
            self.on_highlight.emit(highlight);
        }

        self.set_highlighted(inside);
        inside
    }

    fn check_click(&mut self, click: &ClickEvent, feedback: &mut Feedback) -> bool {
        if !self.rect.contains(click.position) {
            return false;
        }

        debug!("Button {} clicked", self.id.get());
        self.click_timer.start(CLICK_DEBOUNCE);
        if !self.quiet {
            feedback.request(&self.clicked_sound);
        }
        self.on_click.emit(click);
        true
    }

    fn check_drag(&mut self, _drag: &DragEvent, _feedback: &mut Feedback) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn button() -> Button {
        Button::new(&StyleSheet::default(), Point::new(10, 10), Size::new(40, 20))
    }

    fn background_clicked(button: &Button) -> bool {
        button
            .layout()
            .item(button.background())
            .and_then(Element::as_widget)
            .is_some_and(Widget::is_clicked)
    }

    #[test]
    fn test_rect_is_layout_rect() {
        let button = button();
        assert_eq!(
            button.rect(),
            Rectangle::new(Point::new(10, 10), Size::new(40, 20))
        );
    }

    #[test]
    fn test_click_starts_debounce() {
        let mut button = button();
        let mut feedback = Feedback::new();
        let screen = ScreenState::default();

        assert!(button.check_click(&ClickEvent::at(15, 15), &mut feedback));
        assert!(button.is_clicked());

        button.update(&screen, &FrameClock::with_elapsed(Duration::from_millis(190)));
        assert!(button.is_clicked());
        assert!(background_clicked(&button));

        button.update(&screen, &FrameClock::with_elapsed(Duration::from_millis(20)));
        assert!(!button.is_clicked());
        assert!(!background_clicked(&button));
    }

    #[test]
    fn test_click_outside_is_ignored() {
        let mut button = button();
        let mut feedback = Feedback::new();

        assert!(!button.check_click(&ClickEvent::at(0, 0), &mut feedback));
        assert!(!button.is_clicked());
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_click_requests_cue_and_notifies() {
        let mut button = button();
        let mut feedback = Feedback::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        button.on_click().subscribe(move |_| counter.set(counter.get() + 1));

        button.check_click(&ClickEvent::at(15, 15), &mut feedback);

        assert_eq!(clicks.get(), 1);
        let cues: alloc::vec::Vec<&str> = feedback.pending().iter().map(|c| c.as_str()).collect();
        assert_eq!(cues, ["clicked"]);
    }

    #[test]
    fn test_quiet_button_requests_no_cues() {
        let style = StyleSheet::default().quiet();
        let mut button = Button::new(&style, Point::zero(), Size::new(10, 10));
        let mut feedback = Feedback::new();

        button.check_highlight(&HighlightEvent::at(5, 5), &mut feedback);
        button.check_click(&ClickEvent::at(5, 5), &mut feedback);

        assert!(button.is_quiet());
        assert!(button.is_clicked());
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_highlight_cue_once_per_transition() {
        let mut button = button();
        let mut feedback = Feedback::new();

        assert!(button.check_highlight(&HighlightEvent::at(15, 15), &mut feedback));
        assert!(button.check_highlight(&HighlightEvent::at(16, 16), &mut feedback));
        assert_eq!(feedback.len(), 1);

        assert!(!button.check_highlight(&HighlightEvent::at(0, 0), &mut feedback));
        assert!(!button.is_highlighted());

        assert!(button.check_highlight(&HighlightEvent::at(15, 15), &mut feedback));
        assert_eq!(feedback.len(), 2);
    }

    #[test]
    fn test_highlight_reaches_sub_layout() {
        let mut button = button();
        let mut feedback = Feedback::new();
        button.check_highlight(&HighlightEvent::at(15, 15), &mut feedback);

        let panel = button
            .layout()
            .item(button.background())
            .and_then(Element::as_widget)
            .unwrap();
        assert!(panel.is_highlighted());
    }

    #[test]
    fn test_label_is_centered() {
        let style = StyleSheet::default();
        let button = Button::with_label(&style, Point::zero(), Size::new(60, 30), "OK");

        assert_eq!(button.label_text(), Some("OK"));
        let label = button
            .layout()
            .items()
            .iter()
            .find(|item| item.id() != button.background())
            .unwrap();
        assert_eq!(label.position(), Point::new(24, 10));
        assert_eq!(button.rect().size, Size::new(60, 30));
    }

    #[test]
    fn test_menu_entry_auto_size() {
        let style = StyleSheet::default();
        let short = Button::menu_entry(&style, Point::zero(), "Go");
        assert_eq!(short.size(), Size::new(100, 44));

        let long = Button::menu_entry(&style, Point::zero(), "Calibrate sensors now");
        assert_eq!(long.size(), Size::new(21 * 6 + 40, 44));
    }

    #[test]
    fn test_set_size_recomputes_rect() {
        let mut button = button();
        button.set_size(Size::new(80, 30));
        assert_eq!(button.rect().size, Size::new(80, 30));
    }

    #[test]
    fn test_add_and_remove_content() {
        let style = StyleSheet::default();
        let mut button = button();
        let badge = button.add_item(Widget::panel(&style, Point::new(45, 5), Size::new(10, 10)));
        assert_eq!(
            button.rect(),
            Rectangle::new(Point::new(10, 5), Size::new(45, 25))
        );

        assert!(button.remove_item(badge).is_some());
        assert_eq!(button.rect().top_left, Point::new(10, 10));
    }

    #[test]
    fn test_set_position_moves_visuals() {
        let mut button = button();
        button.set_position(Point::new(100, 50));
        assert_eq!(button.rect().top_left, Point::new(100, 50));
        assert!(button.check_click(&ClickEvent::at(110, 55), &mut Feedback::new()));
    }

    #[test]
    fn test_selection_needs_listener() {
        let mut entry = Button::menu_entry(&StyleSheet::default(), Point::zero(), "Volume");
        let mut feedback = Feedback::new();

        assert!(!entry.select_left(&mut feedback));
        assert!(feedback.is_empty());

        let steps = Rc::new(Cell::new(0i32));
        let right = steps.clone();
        entry.on_right().subscribe(move |_| right.set(right.get() + 1));

        assert!(entry.select_right(&mut feedback));
        assert_eq!(steps.get(), 1);
        assert_eq!(feedback.pending()[0].as_str(), "selection_change");
    }

    #[test]
    fn test_description() {
        let entry = Button::menu_entry(&StyleSheet::default(), Point::zero(), "Sound")
            .with_description("Toggle interface sounds");
        assert_eq!(entry.description(), Some("Toggle interface sounds"));
    }
}
