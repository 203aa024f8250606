// src/screen.rs
//! Host screen adapter.
//!
//! A [`WidgetScreen`] owns the top-level [`Layout`] of one screen, advances it
//! with the host's frame clock, routes input into it, and buffers the feedback
//! cues the tree requests so the host can hand them to its audio service.
//!
//! Each frame the host calls, in order:
//!
//! 1. [`WidgetScreen::update`] with the frame's elapsed time
//! 2. `check_highlight` / `check_click` / `check_drag` for that frame's input
//! 3. [`WidgetScreen::draw`]
//!
//! `update` clears per-frame visual state (such as scrollbar visibility)
//! that input then sets again, so routing input before `update` loses it.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::core::{
    ClickEvent, CueName, DragEvent, Feedback, HighlightEvent, ItemId, ScreenItem, ScreenState,
};
use crate::ui::elements::Element;
use crate::ui::layouts::Layout;
use crate::ui::timer::{CountdownTimer, Duration, FrameClock};

/// Idle time before a screen reports that attract mode is due.
pub const ATTRACT_MODE_TIME: Duration = Duration::from_secs(15);

/// Maximum length in bytes of a screen name.
pub const SCREEN_NAME_CAPACITY: usize = 32;

/// One full-screen widget tree driven by the host's frame loop.
#[derive(Debug)]
pub struct WidgetScreen {
    name: heapless::String<SCREEN_NAME_CAPACITY>,
    layout: Layout,
    area: Rectangle,
    state: ScreenState,
    clock: FrameClock,
    idle_timer: CountdownTimer,
    feedback: Feedback,
}

impl WidgetScreen {
    /// Empty screen covering `size` pixels from the origin.
    pub fn new(name: &str, size: Size) -> Self {
        let mut screen_name = heapless::String::new();
        for ch in name.chars() {
            if screen_name.push(ch).is_err() {
                break;
            }
        }

        let mut idle_timer = CountdownTimer::new();
        idle_timer.start(ATTRACT_MODE_TIME);

        Self {
            name: screen_name,
            layout: Layout::new(Point::zero()),
            area: Rectangle::new(Point::zero(), size),
            state: ScreenState::default(),
            clock: FrameClock::new(),
            idle_timer,
            feedback: Feedback::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole screen area. Screens always sit at the origin.
    pub fn rect(&self) -> Rectangle {
        self.area
    }

    pub fn position(&self) -> Point {
        Point::zero()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Top-level layout, for subscribing to its events.
    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn add_item(&mut self, item: impl Into<Element>) -> ItemId {
        self.layout.add_item(item)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Element> {
        self.layout.remove_item(id)
    }

    /// Item with handle `id` anywhere in the tree.
    pub fn find(&self, id: ItemId) -> Option<&Element> {
        self.layout.find(id)
    }

    /// Mutable lookup through nested plain layouts.
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Element> {
        self.layout.find_mut(id)
    }

    /// Step the menu entry `id` left. Returns `false` when there is no such
    /// button or nobody listens to it.
    pub fn select_left(&mut self, id: ItemId) -> bool {
        match self.layout.find_mut(id).and_then(Element::as_button_mut) {
            Some(entry) => entry.select_left(&mut self.feedback),
            None => false,
        }
    }

    /// Step the menu entry `id` right.
    pub fn select_right(&mut self, id: ItemId) -> bool {
        match self.layout.find_mut(id).and_then(Element::as_button_mut) {
            Some(entry) => entry.select_right(&mut self.feedback),
            None => false,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Give or take focus. Inactive screens only draw items flagged
    /// `draw_when_inactive` and do not count towards attract mode.
    pub fn set_active(&mut self, active: bool) {
        if self.state.active != active {
            debug!("Screen {}: active = {}", self.name, active);
        }
        self.state.active = active;
    }

    /// Offset of the screen's running transition, applied when drawing.
    pub fn set_transition(&mut self, offset: Point) {
        self.state.transition = offset;
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Advance one frame. Call before routing the frame's input.
    pub fn update(&mut self, elapsed: Duration) {
        self.clock.tick(elapsed);
        if self.state.active {
            self.idle_timer.update(&self.clock);
        }
        self.layout.update(&self.state, &self.clock);
    }

    /// Draw the whole tree: every background first, then every foreground.
    /// Call after the frame's input has been routed.
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.layout.draw_background(target, &self.state)?;
        self.layout.draw(target, &self.state)
    }

    pub fn check_highlight(&mut self, highlight: &HighlightEvent) -> bool {
        self.layout.check_highlight(highlight, &mut self.feedback)
    }

    pub fn check_click(&mut self, click: &ClickEvent) -> bool {
        self.reset_input_timer();
        let accepted = self.layout.check_click(click, &mut self.feedback);
        debug!(
            "Screen {}: click at ({}, {}) accepted = {}",
            self.name, click.position.x, click.position.y, accepted
        );
        accepted
    }

    pub fn check_drag(&mut self, drag: &DragEvent) -> bool {
        self.reset_input_timer();
        let accepted = self.layout.check_drag(drag, &mut self.feedback);
        debug!(
            "Screen {}: drag from ({}, {}) by ({}, {}) accepted = {}",
            self.name, drag.start.x, drag.start.y, drag.delta.x, drag.delta.y, accepted
        );
        accepted
    }

    /// Restart the idle countdown.
    pub fn reset_input_timer(&mut self) {
        self.idle_timer.start(ATTRACT_MODE_TIME);
    }

    /// True once the screen has been active for [`ATTRACT_MODE_TIME`]
    /// without a click or drag.
    pub fn attract_mode_due(&self) -> bool {
        !self.idle_timer.has_time_remaining()
    }

    /// Cue requests not yet handed to the audio service.
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Take every pending cue request, oldest first.
    pub fn drain_feedback(&mut self) -> impl Iterator<Item = CueName> + '_ {
        self.feedback.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::{Button, Widget};
    use crate::ui::layouts::ScrollLayout;
    use crate::ui::styling::StyleSheet;
    use alloc::vec::Vec;
    use embedded_graphics::mock_display::MockDisplay;

    fn frame() -> Duration {
        Duration::from_millis(100)
    }

    #[test]
    fn test_screen_rect_is_screen_area() {
        let screen = WidgetScreen::new("menu", Size::new(320, 240));
        assert_eq!(screen.rect(), Rectangle::new(Point::zero(), Size::new(320, 240)));
        assert_eq!(screen.position(), Point::zero());
        assert_eq!(screen.name(), "menu");
    }

    #[test]
    fn test_attract_mode_after_idle_time() {
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        for _ in 0..149 {
            screen.update(frame());
        }
        assert!(!screen.attract_mode_due());

        screen.update(frame());
        assert!(screen.attract_mode_due());
    }

    #[test]
    fn test_input_resets_idle_timer() {
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        for _ in 0..140 {
            screen.update(frame());
        }
        screen.check_click(&ClickEvent::at(1, 1));
        for _ in 0..140 {
            screen.update(frame());
        }
        assert!(!screen.attract_mode_due());

        screen.check_drag(&DragEvent::new(Point::zero(), Point::new(0, 4)));
        for _ in 0..140 {
            screen.update(frame());
        }
        assert!(!screen.attract_mode_due());
    }

    #[test]
    fn test_idle_timer_paused_while_inactive() {
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        screen.set_active(false);
        for _ in 0..200 {
            screen.update(frame());
        }
        assert!(!screen.attract_mode_due());
    }

    #[test]
    fn test_click_routes_to_button_and_queues_cue() {
        let style = StyleSheet::default();
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        let id = screen.add_item(Button::new(&style, Point::new(10, 10), Size::new(20, 10)));

        assert!(screen.check_click(&ClickEvent::at(15, 15)));
        assert!(!screen.check_click(&ClickEvent::at(50, 50)));

        let button = screen.find(id).and_then(Element::as_button).unwrap();
        assert!(button.is_clicked());

        let cues: Vec<CueName> = screen.drain_feedback().collect();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].as_str(), "clicked");
        assert!(screen.feedback().is_empty());
    }

    #[test]
    fn test_draw_runs_both_passes() {
        let mut style = StyleSheet::default();
        style.outline_color = None;
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        screen.add_item(Widget::panel(&style, Point::new(0, 0), Size::new(8, 8)));

        let mut scroll = ScrollLayout::new(&style, Point::new(20, 20), Size::new(10, 10));
        scroll.add_item(Widget::panel(&style, Point::new(20, 20), Size::new(10, 30)));
        screen.add_item(scroll);

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        screen.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(4, 4)), Some(style.background_color));
        assert_eq!(display.get_pixel(Point::new(25, 25)), Some(style.background_color));
        assert_eq!(display.get_pixel(Point::new(25, 35)), None);
    }

    #[test]
    fn test_drag_scrolls_nested_viewport() {
        let style = StyleSheet::default();
        let mut screen = WidgetScreen::new("menu", Size::new(200, 200));
        let mut scroll = ScrollLayout::new(&style, Point::new(0, 0), Size::new(100, 100));
        scroll.add_item(Widget::panel(&style, Point::zero(), Size::new(100, 300)));
        let id = screen.add_item(scroll);

        assert!(screen.check_drag(&DragEvent::new(Point::new(50, 50), Point::new(0, 250))));

        let scroll = screen.find(id).and_then(Element::as_scroll).unwrap();
        assert_eq!(scroll.scroll_position(), Point::new(0, 200));
    }

    #[test]
    fn test_frame_order_shows_scrollbar_after_hover() {
        let mut style = StyleSheet::default();
        style.outline_color = None;
        style.scrollbar_color = Rgb565::RED;
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        let mut scroll = ScrollLayout::new(&style, Point::zero(), Size::new(40, 40));
        scroll.add_item(Widget::panel(&style, Point::zero(), Size::new(40, 80)));
        screen.add_item(scroll);

        screen.update(frame());
        assert!(screen.check_highlight(&HighlightEvent::at(5, 5)));
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        screen.draw(&mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(39, 0)), Some(Rgb565::RED));

        // Input routed before update is cleared by it.
        assert!(screen.check_highlight(&HighlightEvent::at(5, 5)));
        screen.update(frame());
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        screen.draw(&mut display).unwrap();
        assert_eq!(
            display.get_pixel(Point::new(39, 0)),
            Some(style.highlighted_background_color)
        );
    }

    #[test]
    fn test_selection_reaches_nested_entry() {
        let style = StyleSheet::default();
        let mut screen = WidgetScreen::new("menu", Size::new(200, 200));
        let mut column = Layout::stacked(Point::zero(), crate::ui::layouts::Direction::Vertical, 4);
        let mut entry = Button::menu_entry(&style, Point::zero(), "Volume");
        entry.on_left().subscribe(|_| {});
        let id = column.add_item(entry);
        screen.add_item(column);

        assert!(screen.select_left(id));
        assert!(!screen.select_right(id));
        assert_eq!(screen.feedback().len(), 1);
    }

    #[test]
    fn test_inactive_screen_draws_only_flagged_items() {
        let mut style = StyleSheet::default();
        style.outline_color = None;
        let mut screen = WidgetScreen::new("menu", Size::new(64, 64));
        screen.add_item(Widget::panel(&style, Point::zero(), Size::new(4, 4)));
        let pinned = screen.add_item(Widget::panel(&style, Point::new(10, 0), Size::new(4, 4)));
        if let Some(item) = screen.find_mut(pinned) {
            item.set_draw_when_inactive(true);
        }

        screen.set_active(false);
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        screen.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(1, 1)), None);
        assert_eq!(display.get_pixel(Point::new(11, 1)), Some(style.background_color));
    }
}
