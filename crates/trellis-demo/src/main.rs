//! Headless frame-loop demo for the trellis widget tree.
//!
//! Builds a menu screen with a column of buttons and a scrolling list, then
//! plays a scripted input sequence through it. Frames are rendered into an
//! off-screen [`Surface`] standing in for the display, and the outcome of
//! every step is logged.
//!
//! Run with `RUST_LOG=debug` to also see layout and scroll-bound logging from
//! the core.

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{info, warn};

use trellis_core::screen::WidgetScreen;
use trellis_core::ui::{
    Button, ClickEvent, Direction, DragEvent, Duration, Element, HighlightEvent, ItemId, Layout,
    ScrollLayout, StyleSheet, Surface, Widget,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 320;
const DISPLAY_HEIGHT_PX: u32 = 240;

/// Simulated frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Number of rows in the scrolling list.
const LIST_ROWS: usize = 12;

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

/// One synthetic input delivered at the start of a frame.
#[derive(Debug, Clone, Copy)]
enum Input {
    Hover(i32, i32),
    Click(i32, i32),
    Drag { from: (i32, i32), by: (i32, i32) },
    Left(ItemId),
    Right(ItemId),
    Idle,
}

/// Handles of the items the script pokes at.
struct Menu {
    play: ItemId,
    volume: ItemId,
    list: ItemId,
}

fn build_menu(screen: &mut WidgetScreen, style: &StyleSheet, clicks: &Rc<Cell<u32>>) -> Menu {
    let mut column = Layout::stacked(Point::new(16, 16), Direction::Vertical, 8);

    let mut play = Button::menu_entry(style, Point::zero(), "Play")
        .with_description("Start a new session");
    let counter = clicks.clone();
    play.on_click().subscribe(move |click| {
        counter.set(counter.get() + 1);
        info!("Play clicked at ({}, {})", click.position.x, click.position.y);
    });
    let play_id = column.add_item(play);

    let volume_level = Rc::new(Cell::new(5i32));
    let mut volume = Button::menu_entry(style, Point::zero(), "Volume");
    let level = volume_level.clone();
    volume.on_left().subscribe(move |_| {
        level.set((level.get() - 1).max(0));
        info!("Volume -> {}", level.get());
    });
    let level = volume_level;
    volume.on_right().subscribe(move |_| {
        level.set((level.get() + 1).min(10));
        info!("Volume -> {}", level.get());
    });
    let volume_id = column.add_item(volume);

    column.add_item(Button::menu_entry(&style.clone().quiet(), Point::zero(), "Quit"));
    screen.add_item(column);

    let mut list = ScrollLayout::new(style, Point::new(150, 16), Size::new(150, 200));
    let backdrop = Size::new(150, 20 + LIST_ROWS as u32 * 34);
    list.add_item(Widget::panel(style, Point::new(150, 16), backdrop).with_layer(-1.0));
    for row in 0..LIST_ROWS {
        let y = 26 + row as i32 * 34;
        let label = format!("Item {:02}", row + 1);
        list.add_item(Button::with_label(style, Point::new(160, y), Size::new(112, 28), &label));
    }
    list.sort();
    list.on_drag()
        .subscribe(|drag| info!("List dragged by ({}, {})", drag.delta.x, drag.delta.y));
    let list_id = screen.add_item(list);

    Menu {
        play: play_id,
        volume: volume_id,
        list: list_id,
    }
}

fn script(menu: &Menu) -> Vec<Input> {
    vec![
        Input::Idle,
        Input::Hover(40, 30),
        Input::Click(40, 30),
        Input::Idle,
        Input::Right(menu.volume),
        Input::Right(menu.volume),
        Input::Left(menu.volume),
        Input::Hover(200, 100),
        Input::Drag { from: (200, 100), by: (0, 120) },
        Input::Drag { from: (200, 100), by: (0, 400) },
        Input::Click(200, 60),
        Input::Drag { from: (200, 100), by: (0, -1000) },
        Input::Idle,
    ]
}

fn apply(screen: &mut WidgetScreen, input: Input) {
    match input {
        Input::Hover(x, y) => {
            let hit = screen.check_highlight(&HighlightEvent::at(x, y));
            info!("Hover ({}, {}) -> highlighted = {}", x, y, hit);
        }
        Input::Click(x, y) => {
            let hit = screen.check_click(&ClickEvent::at(x, y));
            info!("Click ({}, {}) -> accepted = {}", x, y, hit);
        }
        Input::Drag { from, by } => {
            let drag = DragEvent::new(Point::new(from.0, from.1), Point::new(by.0, by.1));
            let hit = screen.check_drag(&drag);
            info!("Drag from {:?} by {:?} -> consumed = {}", from, by, hit);
        }
        Input::Left(id) => {
            let stepped = screen.select_left(id);
            info!("Select left on {} -> stepped = {}", id.get(), stepped);
        }
        Input::Right(id) => {
            let stepped = screen.select_right(id);
            info!("Select right on {} -> stepped = {}", id.get(), stepped);
        }
        Input::Idle => {}
    }
}

fn main() {
    env_logger::init();

    info!("Starting trellis demo");

    let style = StyleSheet::default();
    let persisted = match style.to_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not persist style sheet: {}", e);
            return;
        }
    };
    let style = match StyleSheet::from_bytes(&persisted) {
        Ok(style) => style,
        Err(e) => {
            warn!("Could not restore style sheet: {}", e);
            return;
        }
    };
    info!("Style sheet restored from {} bytes", persisted.len());

    let mut display = Surface::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let mut screen = WidgetScreen::new("main menu", display.size());

    let clicks = Rc::new(Cell::new(0u32));
    let menu = build_menu(&mut screen, &style, &clicks);

    for (frame, input) in script(&menu).into_iter().enumerate() {
        screen.update(FRAME_DURATION);
        apply(&mut screen, input);

        display.clear(Rgb565::BLACK).unwrap_or_else(|never| match never {});
        screen.draw(&mut display).unwrap_or_else(|never| match never {});

        for cue in screen.drain_feedback() {
            info!("Cue requested: {}", cue);
        }

        if let Some(list) = screen.find(menu.list).and_then(Element::as_scroll) {
            info!(
                "Frame {:>2}: scroll = ({}, {}), scrollbar = {:?}",
                frame,
                list.scroll_position().x,
                list.scroll_position().y,
                list.vertical_scrollbar().map(|bar| (bar.top_left.y, bar.size.height))
            );
        }
    }

    let play_clicked = screen
        .find(menu.play)
        .and_then(Element::as_button)
        .is_some_and(Button::is_clicked);
    info!(
        "Done: {} play click(s), play still debouncing = {}, {} opaque pixels in last frame",
        clicks.get(),
        play_clicked,
        display.opaque_pixels()
    );
}
