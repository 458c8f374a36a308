//! Desktop simulator for the wrist-rs tile/widget UI.
//!
//! Runs the wrist-core [`UiController`] against an SDL2 window via
//! `embedded-graphics-simulator`. Mouse input is fed through the same
//! gesture recognizer and touch channel the firmware uses, and committed
//! frames are decoded from the panel's 12-bit wire format.
//!
//! # Key bindings
//!
//! | Key | Action                          |
//! |-----|---------------------------------|
//! | B   | Side button                     |
//! | U   | Toggle USB power                |
//! | E   | Toggle eco mode                 |
//! | Q   | Quit                            |
//!
//! Click for taps, drag for swipes.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, info, warn};

use wrist_core::UiConfig;
use wrist_core::graphics::packing::unpack_pixels;
use wrist_core::graphics::{Color, Image};
use wrist_core::input::{GestureRecognizer, RawTouch, TOUCH_QUEUE_DEPTH, TouchChannel, TouchEvent};
use wrist_core::peripherals::{
    DisplaySink, Haptic, PowerMonitor, SideButton, SleepControl, TouchSource,
};
use wrist_core::ui::widgets::FontSize;
use wrist_core::ui::{
    Action, Notification, NotificationKind, Tile, TileId, UiController, Widget, WidgetId,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Touch events travel from the SDL loop to the controller through here,
/// the same way the touch task feeds them on hardware.
static TOUCH_CHANNEL: TouchChannel<CriticalSectionRawMutex> = TouchChannel::new();

const OPEN_SETTINGS: u16 = 1;
const BRIGHTNESS: u16 = 2;
const WIFI: u16 = 3;

/// 16x16 bell icon, one bit per pixel, LSB first.
static BELL_ICON: [u8; 32] = [
    0x80, 0x01, 0xc0, 0x03, 0xe0, 0x07, 0xf0, 0x0f, 0xf0, 0x0f, 0xf0, 0x0f, 0xf0, 0x0f, 0xf0,
    0x0f, 0xf8, 0x1f, 0xf8, 0x1f, 0xfc, 0x3f, 0xfe, 0x7f, 0xfe, 0x7f, 0x00, 0x00, 0xc0, 0x03,
    0x80, 0x01,
];

// ---------------------------------------------------------------------------
// Simulated board
// ---------------------------------------------------------------------------

/// Implements every peripheral trait over the SDL display and keyboard.
struct SimBoard {
    display: SimulatorDisplay<Rgb565>,
    scratch: Vec<Color>,
    touch: Receiver<'static, CriticalSectionRawMutex, TouchEvent, TOUCH_QUEUE_DEPTH>,
    backlight: u16,
    button: bool,
    usb: bool,
    asleep: bool,
}

impl SimBoard {
    fn new(config: &UiConfig) -> Self {
        let (w, h) = (config.screen_width, config.screen_height);
        Self {
            display: SimulatorDisplay::new(Size::new(w, h)),
            scratch: vec![Color::BLACK; (w * h) as usize],
            touch: TOUCH_CHANNEL.receiver(),
            backlight: config.backlight_default,
            button: false,
            usb: false,
            asleep: false,
        }
    }

    /// Scale a channel by the backlight level so dimming is visible.
    fn lit(&self, color: Color) -> Rgb565 {
        let level = u32::from(self.backlight.min(1000));
        let scale = |c: u8| ((u32::from(c) * level) / 1000) as u8;
        Rgb565::from(Color::rgb(
            scale(color.r()),
            scale(color.g()),
            scale(color.b()),
        ))
    }
}

impl DisplaySink for SimBoard {
    type Error = Infallible;

    fn commit(&mut self, frame: &[u8]) -> Result<(), Infallible> {
        let decoded = unpack_pixels(frame, &mut self.scratch);
        let width = self.display.size().width as usize;
        let pixels: Vec<Pixel<Rgb565>> = self.scratch[..decoded]
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Pixel(
                    Point::new((i % width) as i32, (i / width) as i32),
                    self.lit(c),
                )
            })
            .collect();
        self.display.draw_iter(pixels)
    }

    fn set_backlight(&mut self, level: u16) {
        debug!("backlight -> {}", level);
        self.backlight = level;
    }
}

impl TouchSource for SimBoard {
    fn next_event(&mut self) -> Option<TouchEvent> {
        self.touch.next_event()
    }
}

impl SideButton for SimBoard {
    fn is_pressed(&mut self) -> bool {
        core::mem::take(&mut self.button)
    }
}

impl PowerMonitor for SimBoard {
    fn battery_percent(&mut self) -> u8 {
        if self.usb { 100 } else { 76 }
    }

    fn is_usb_plugged(&mut self) -> bool {
        self.usb
    }
}

impl Haptic for SimBoard {
    fn vibrate(&mut self, duration_ms: u32) {
        debug!("bzz ({} ms)", duration_ms);
    }
}

impl SleepControl for SimBoard {
    fn enter_deep_sleep(&mut self) {
        info!("deep sleep (press B or click to wake)");
        self.asleep = true;
    }
}

// ---------------------------------------------------------------------------
// Demo UI
// ---------------------------------------------------------------------------

struct Demo {
    modal: TileId,
    brightness: WidgetId,
    status: WidgetId,
}

fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

/// Four tiles: home in the middle, controls to the right, an activity page
/// to the left and a scrolling menu below home. Plus one modal.
fn build_demo(ui: &mut UiController) -> wrist_core::UiResult<Demo> {
    let home = ui.add_tile(Tile::new());
    let controls = ui.add_tile(Tile::new().with_background(Color::DARK_GRAY));
    let activity = ui.add_tile(Tile::new());
    let menu = ui.add_tile(Tile::new().with_background(Color::rgb(0x1, 0x1, 0x3)));
    let modal = ui.add_tile(Tile::modal(30, 60, 180, 120).with_background(Color::GRAY));

    ui.link_right(home, controls)?;
    ui.link_left(home, activity)?;
    ui.link_bottom(home, menu)?;

    // Home
    let mut clock = Widget::label(rect(40, 60, 160, 40), "12:34");
    clock.set_bg_color(Color::BLACK);
    clock.set_front_color(Color::WHITE);
    clock.set_border_color(Color::BLACK);
    ui.add_widget(Some(home), clock)?;
    ui.add_widget(
        Some(home),
        Widget::image(rect(112, 20, 16, 16), Image::mono(16, 16, &BELL_ICON)),
    )?;
    ui.add_widget(
        Some(home),
        Widget::button(rect(60, 150, 120, 40), "Settings")
            .with_handler(Action::Custom(OPEN_SETTINGS)),
    )?;

    // Controls
    ui.add_widget(
        Some(controls),
        Widget::label(rect(20, 20, 200, 30), "Controls"),
    )?;
    ui.add_widget(
        Some(controls),
        Widget::switch(rect(20, 60, 80, 36)).with_handler(Action::Custom(WIFI)),
    )?;
    ui.add_widget(
        Some(controls),
        Widget::slider(rect(20, 110, 200, 30)).with_handler(Action::Custom(BRIGHTNESS)),
    )?;
    let brightness = ui.add_widget(Some(controls), Widget::progress(rect(20, 160, 200, 16)))?;
    ui.add_widget(
        Some(controls),
        Widget::button(rect(20, 190, 200, 40), "Home").with_handler(Action::GoHome),
    )?;

    // Activity
    let status = ui.add_widget(Some(activity), Widget::label(rect(20, 30, 200, 30), "Syncing"))?;
    ui.add_widget(Some(activity), Widget::spinner(rect(45, 110, 150, 20)))?;
    let frame = ui.add_widget(Some(activity), Widget::container(rect(20, 170, 200, 50)))?;
    let mut note = Widget::label(rect(4, 10, 192, 30), "tap to go home");
    note.set_handler(Some(Action::SelectTile(home)));
    if let Some(label) = note.as_label_mut() {
        label.set_font_size(FontSize::Small);
    }
    let note = ui.add_widget(None, note)?;
    ui.container_add(frame, note)?;

    // Menu
    let list = ui.add_widget(
        Some(menu),
        Widget::listbox(rect(10, 10, 220, 220)).with_handler(Action::Custom(0)),
    )?;
    for entry in [
        "Alarms", "Timers", "Steps", "Heart rate", "Weather", "Music", "Notes", "Compass",
        "Torch", "About",
    ] {
        let item = ui.add_widget(None, Widget::label(rect(0, 0, 0, 36), entry))?;
        ui.listbox_add(list, item)?;
    }

    // Modal
    ui.add_widget(Some(modal), Widget::label(rect(10, 10, 160, 30), "Settings"))?;
    ui.add_widget(
        Some(modal),
        Widget::button(rect(40, 70, 100, 36), "OK").with_handler(Action::CloseModal),
    )?;

    ui.select_tile(home)?;
    ui.set_default_tile(home)?;

    Ok(Demo {
        modal,
        brightness,
        status,
    })
}

/// React to widget handlers the controller does not act on itself.
fn on_notification(
    ui: &mut UiController,
    board: &mut SimBoard,
    demo: &Demo,
    notification: Notification,
) -> wrist_core::UiResult<()> {
    info!(
        "widget {} fired {:?} ({:?})",
        notification.widget.index(),
        notification.action,
        notification.kind
    );
    board.vibrate(20);

    match (notification.action, notification.kind) {
        (Action::Custom(OPEN_SETTINGS), _) => ui.set_modal(demo.modal)?,
        (Action::Custom(BRIGHTNESS), NotificationKind::ValueChanged(value)) => {
            if let Some(progress) = ui.widget_mut(demo.brightness)?.as_progress_mut() {
                progress.set_value(value);
            }
        }
        (Action::Custom(WIFI), NotificationKind::Switched(state)) => {
            if let Some(label) = ui.widget_mut(demo.status)?.as_label_mut() {
                label.set_text(&format!("Wifi {:?}", state));
            }
        }
        _ => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let config = UiConfig::default();
    info!("Starting wrist-rs simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        config.screen_width, config.screen_height, WINDOW_SCALE
    );
    info!("Keys: B=Button  U=USB  E=Eco  Q=Quit; click to tap, drag to swipe");

    let mut ui = UiController::new(config.clone());
    let demo = match build_demo(&mut ui) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("Failed to build demo UI: {}", e);
            return;
        }
    };

    let mut board = SimBoard::new(&config);
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Wrist Simulator", &output_settings);

    let sender = TOUCH_CHANNEL.sender();
    let mut recognizer = GestureRecognizer::new();
    let started = Instant::now();

    // The SDL window is lazily initialized on the first `update()` call.
    ui.render(&mut board);
    window.update(&board.display);

    'running: loop {
        let frame_start = Instant::now();
        let now = embassy_time::Instant::now();
        let timestamp_ms = started.elapsed().as_millis() as u64;
        let mut woken = false;

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::B => {
                        board.button = true;
                        woken = true;
                    }
                    Keycode::U => {
                        board.usb = !board.usb;
                        info!("USB {}", if board.usb { "plugged" } else { "unplugged" });
                    }
                    Keycode::E => {
                        if ui.is_eco_mode() {
                            ui.disable_eco_mode(&mut board);
                        } else {
                            ui.enable_eco_mode(now);
                        }
                    }
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    woken = true;
                    recognizer.feed_into(
                        RawTouch {
                            pressed: true,
                            point,
                            timestamp_ms,
                        },
                        &sender,
                    );
                }

                SimulatorEvent::MouseMove { point } if recognizer.is_pressed() => {
                    recognizer.feed_into(
                        RawTouch {
                            pressed: true,
                            point,
                            timestamp_ms,
                        },
                        &sender,
                    );
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    recognizer.feed_into(
                        RawTouch {
                            pressed: false,
                            point,
                            timestamp_ms,
                        },
                        &sender,
                    );
                }

                _ => {}
            }
        }

        // On hardware the wake-up is a reset; here the loop just resumes
        if board.asleep && woken {
            board.asleep = false;
            board.button = false;
            while board.next_event().is_some() {}
            ui.wake(&mut board, now);
        }

        // --- UI tick ------------------------------------------------------
        if !board.asleep {
            if let Err(e) = ui.process_events(&mut board, now) {
                warn!("UI tick failed: {}", e);
            }
            while let Some(notification) = ui.poll_notification() {
                if let Err(e) = on_notification(&mut ui, &mut board, &demo, notification) {
                    warn!("notification handling failed: {}", e);
                }
            }
        }

        window.update(&board.display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
