// src/ui/components/widget.rs
//! Leaf widgets: spacers, filled panels and text labels

use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::ui::core::{ClickEvent, DragEvent, Feedback, HighlightEvent, ItemId, ScreenItem, ScreenState};
use crate::ui::styling::StyleSheet;
use crate::ui::timer::FrameClock;

/// Maximum length in bytes of a label's text.
pub const LABEL_CAPACITY: usize = 48;

/// What a leaf widget renders inside its rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// Occupies space, draws nothing.
    Shim,
    /// Filled rectangle with an optional outline.
    Panel,
    /// Single line of text in a mono font, sized from the text.
    Label(heapless::String<LABEL_CAPACITY>),
}

/// Leaf item of the tree.
#[derive(Debug)]
pub struct Widget {
    id: ItemId,
    kind: WidgetKind,
    position: Point,
    size: Size,
    layer: f32,
    scale: f32,
    highlighted: bool,
    clicked: bool,
    draw_when_inactive: bool,
    background_color: Rgb565,
    highlighted_background_color: Rgb565,
    clicked_background_color: Rgb565,
    text_color: Rgb565,
    highlighted_text_color: Rgb565,
    outline_color: Option<Rgb565>,
}

impl Widget {
    fn new(kind: WidgetKind, style: &StyleSheet, position: Point, size: Size) -> Self {
        Self {
            id: ItemId::next(),
            kind,
            position,
            size,
            layer: 0.0,
            scale: 1.0,
            highlighted: false,
            clicked: false,
            draw_when_inactive: false,
            background_color: style.background_color,
            highlighted_background_color: style.highlighted_background_color,
            clicked_background_color: style.clicked_background_color,
            text_color: style.text_color,
            highlighted_text_color: style.highlighted_text_color,
            outline_color: style.outline_color,
        }
    }

    /// Empty spacer of a fixed size.
    pub fn shim(position: Point, size: Size) -> Self {
        Self::new(WidgetKind::Shim, &StyleSheet::default(), position, size)
    }

    pub fn panel(style: &StyleSheet, position: Point, size: Size) -> Self {
        Self::new(WidgetKind::Panel, style, position, size)
    }

    /// Text label. Characters past [`LABEL_CAPACITY`] bytes are dropped.
    pub fn label(style: &StyleSheet, position: Point, text: &str) -> Self {
        let mut content = heapless::String::new();
        for ch in text.chars() {
            if content.push(ch).is_err() {
                break;
            }
        }

        let char_size = FONT_6X10.character_size;
        let size = Size::new(
            char_size.width * content.chars().count() as u32,
            char_size.height,
        );

        Self::new(WidgetKind::Label(content), style, position, size)
    }

    pub fn with_layer(mut self, layer: f32) -> Self {
        self.layer = layer;
        self
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    /// Text of a label, `None` for other kinds.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Label(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Unscaled size.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_clicked(&self) -> bool {
        self.clicked
    }

    fn fill_color(&self) -> Rgb565 {
        if self.clicked {
            self.clicked_background_color
        } else if self.highlighted {
            self.highlighted_background_color
        } else {
            self.background_color
        }
    }
}

impl ScreenItem for Widget {
    fn id(&self) -> ItemId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn rect(&self) -> Rectangle {
        let size = Size::new(
            (self.size.width as f32 * self.scale) as u32,
            (self.size.height as f32 * self.scale) as u32,
        );
        Rectangle::new(self.position, size)
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
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    fn set_clicked(&mut self, clicked: bool) {
        self.clicked = clicked;
    }

    fn set_draw_when_inactive(&mut self, draw: bool) {
        self.draw_when_inactive = draw;
    }

    fn update(&mut self, _screen: &ScreenState, _clock: &FrameClock) {}

    fn draw<D>(&mut self, target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !screen.active && !self.draw_when_inactive {
            return Ok(());
        }

        let area = self.rect().translate(screen.transition);

        match &self.kind {
            WidgetKind::Shim => {}
            WidgetKind::Panel => {
                let mut style = PrimitiveStyleBuilder::new().fill_color(self.fill_color());
                if let Some(outline) = self.outline_color {
                    style = style.stroke_color(outline).stroke_width(1);
                }
                area.into_styled(style.build()).draw(target)?;
            }
            WidgetKind::Label(text) => {
                let color = if self.highlighted {
                    self.highlighted_text_color
                } else {
                    self.text_color
                };
                let text_style = MonoTextStyle::new(&FONT_6X10, color);
                Text::with_baseline(text, area.top_left, text_style, Baseline::Top).draw(target)?;
            }
        }

        Ok(())
    }

    fn check_highlight(&mut self, highlight: &HighlightEvent, _feedback: &mut Feedback) -> bool {
        self.highlighted = self.rect().contains(highlight.position);
        self.highlighted
    }

    fn check_click(&mut self, _click: &ClickEvent, _feedback: &mut Feedback) -> bool {
        false
    }

    fn check_drag(&mut self, _drag: &DragEvent, _feedback: &mut Feedback) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn test_label_is_sized_from_text() {
        let label = Widget::label(&StyleSheet::default(), Point::new(4, 4), "Play");
        assert_eq!(label.rect(), Rectangle::new(Point::new(4, 4), Size::new(24, 10)));
        assert_eq!(label.text(), Some("Play"));
    }

    #[test]
    fn test_scale_shrinks_rect() {
        let mut panel = Widget::panel(&StyleSheet::default(), Point::zero(), Size::new(40, 20));
        panel.set_scale(0.5);
        assert_eq!(panel.rect().size, Size::new(20, 10));
        assert_eq!(panel.size(), Size::new(40, 20));
    }

    #[test]
    fn test_highlight_follows_pointer() {
        let mut feedback = Feedback::new();
        let mut panel = Widget::panel(&StyleSheet::default(), Point::new(10, 10), Size::new(10, 10));

        assert!(panel.check_highlight(&HighlightEvent::at(12, 12), &mut feedback));
        assert!(panel.is_highlighted());
        assert!(!panel.check_highlight(&HighlightEvent::at(30, 30), &mut feedback));
        assert!(!panel.is_highlighted());
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_leaf_never_accepts_clicks() {
        let mut feedback = Feedback::new();
        let mut panel = Widget::panel(&StyleSheet::default(), Point::zero(), Size::new(10, 10));
        assert!(!panel.check_click(&ClickEvent::at(5, 5), &mut feedback));
    }

    #[test]
    fn test_panel_fill_tracks_state() {
        let mut style = StyleSheet::default();
        style.outline_color = None;
        let mut panel = Widget::panel(&style, Point::zero(), Size::new(2, 2));
        let screen = ScreenState::default();

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        panel.draw(&mut display, &screen).unwrap();
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(style.background_color));

        panel.set_clicked(true);
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        panel.draw(&mut display, &screen).unwrap();
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(style.clicked_background_color));
    }

    #[test]
    fn test_inactive_screen_skips_drawing() {
        let mut panel = Widget::panel(&StyleSheet::default(), Point::zero(), Size::new(2, 2));
        let screen = ScreenState {
            active: false,
            transition: Point::zero(),
        };

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        panel.draw(&mut display, &screen).unwrap();
        assert_eq!(display.affected_area().size, Size::zero());

        panel.set_draw_when_inactive(true);
        panel.draw(&mut display, &screen).unwrap();
        assert_eq!(display.affected_area().size, Size::new(2, 2));
    }

    #[test]
    fn test_transition_offsets_drawing() {
        let mut style = StyleSheet::default();
        style.outline_color = None;
        let mut panel = Widget::panel(&style, Point::zero(), Size::new(1, 1));
        let screen = ScreenState {
            active: true,
            transition: Point::new(3, 2),
        };

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        panel.draw(&mut display, &screen).unwrap();
        assert_eq!(display.get_pixel(Point::new(3, 2)), Some(style.background_color));
        assert_eq!(display.get_pixel(Point::zero()), None);
    }
}
