use std::time::Instant;

use touchkit_core::{
    Application, Config,
    display::{Display, HEIGHT, WIDTH},
    framebuffer::Canvas,
    fs::Filesystem,
    input::Clock,
    ui::InputRequest,
};

use crate::display::{BACKLIGHT_PIN, MinifbPanel};
use crate::fs::DesktopFs;

mod display;
mod fs;

const DEMOS: [&str; 6] = [
    "Text input",
    "Password",
    "Number",
    "Browse files",
    "View file",
    "Edit file",
];

struct StdClock(Instant);

impl Clock for StdClock {
    fn now_ms(&mut self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

fn config_from_env() -> Config {
    let mut config = Config::default();
    if let Some(ms) = std::env::var("TOUCHKIT_STANDBY_MS")
        .ok()
        .and_then(|value| value.parse().ok())
    {
        log::info!("Standby after {} ms", ms);
        config.standby_ms = Some(ms);
        config.backlight_pin = Some(BACKLIGHT_PIN);
        config.sleep_units = 100;
    }
    config
}

fn pick_file<D: Display, C: Clock, F: Filesystem>(
    app: &mut Application<D, C>,
    fs: &F,
    root: &str,
) -> Option<String> {
    app.browse_file(fs, root, Some(root)).map(|result| result.path)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    log::info!("Touchkit desktop started, browsing {}", root);

    let mut window = minifb::Window::new(
        "Touchkit Desktop",
        WIDTH,
        HEIGHT,
        minifb::WindowOptions::default(),
    )
    .unwrap_or_else(|e| {
        panic!("Unable to open window: {}", e);
    });
    window.set_target_fps(60);

    let canvas = Canvas::new(MinifbPanel::new(window), WIDTH as u32, HEIGHT as u32);
    let mut app = Application::new(canvas, StdClock(Instant::now()), config_from_env());
    let fs = DesktopFs;
    let mut name = String::new();

    while let Some(choice) = app.listbox(Some("Touchkit"), &DEMOS) {
        match choice.index {
            1 => {
                if let Some(result) = app.input("Your name", &name, "Normal", 40) {
                    name = result.text;
                    app.message("Hello", &format!("Hello, {}!", name));
                }
            }
            2 => {
                let request = InputRequest::new("Password")
                    .default_text("secret")
                    .max_len(16)
                    .password(true);
                if let Some(result) = app.input_with(&request) {
                    let count = result.text.chars().count();
                    app.message("Password", &format!("{} characters entered", count));
                }
            }
            3 => {
                if let Some(result) = app.input("Amount", "", "Numeric", 12) {
                    app.message("Amount", &result.text);
                }
            }
            4 => {
                if let Some(result) = app.browse_file(&fs, &root, Some(root.as_str())) {
                    let how = if result.long_press { "Long press" } else { "Tap" };
                    app.message(how, &result.path);
                }
            }
            5 => {
                if let Some(path) = pick_file(&mut app, &fs, &root) {
                    app.view_file(&fs, &path);
                }
            }
            6 => {
                if let Some(path) = pick_file(&mut app, &fs, &root) {
                    app.edit_file(&fs, &path);
                }
            }
            _ => {}
        }
    }

    log::info!("Touchkit desktop finished");
}
