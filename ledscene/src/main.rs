mod preview;
mod scenes;

use std::{
    process::ExitCode,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use hub75::{Hub75, MemoryPanel, PanelConfig};
use image::Texture;
use render::{FrameBuffer, Renderer};
use settings::Settings;

/// How long the panels may take to respond to the initialization sequence
const INITIALIZATION_TIMEOUT: Duration = Duration::from_secs(2);

pub fn main() -> ExitCode {
    // Register a custom panic handler
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!(
            "ledscene has panicked. This is a bug. Please open an issue at {}, including the debug information below. Thanks!\n",
            env!("CARGO_PKG_REPOSITORY")
        );
        previous_hook(info);
    }));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::init();
    log::debug!("{settings:?}");

    run(&settings)
}

fn run(settings: &Settings) -> ExitCode {
    let config = PanelConfig {
        panel_width: settings.panel_width,
        panel_height: settings.panel_height,
        chain_length: settings.chain_length,
        refresh_rate: settings.refresh_rate,
        brightness: settings.brightness,
    };

    let panel = MemoryPanel::new();
    let mut driver = match Hub75::start(config, panel.clone()) {
        Ok(driver) => driver,
        Err(error) => {
            log::error!("Failed to start the panel driver: {error}");
            return ExitCode::FAILURE;
        },
    };

    if !driver.wait_until_initialized(INITIALIZATION_TIMEOUT) {
        log::error!("The panels did not initialize within {INITIALIZATION_TIMEOUT:?}");
        return ExitCode::FAILURE;
    }

    // A broken texture is not fatal, the scene falls back to its built-in one
    let texture = settings.texture.as_ref().and_then(|path| {
        Texture::load(path)
            .map_err(|error| log::error!("Failed to load texture {}: {error}", path.display()))
            .ok()
            .map(Arc::new)
    });

    let (width, height) = (config.width(), config.height());
    let mut demo = match scenes::build(settings.scene, width, height, texture) {
        Ok(demo) => demo,
        Err(error) => {
            log::error!("Failed to build the {} scene: {error}", settings.scene);
            return ExitCode::FAILURE;
        },
    };

    log::info!("Playing the {} scene on a {width}x{height} display", settings.scene);

    let renderer = Renderer::new(width, height);
    let mut frame_buffer = FrameBuffer::new(width, height);
    let mut frame = 0;

    while settings.frames.map_or(true, |frames| frame < frames) {
        let started = Instant::now();

        frame_buffer.clear();
        if let Err(error) = demo.draw(frame, &renderer, &mut frame_buffer) {
            log::error!("Failed to render frame {frame}: {error}");
            return ExitCode::FAILURE;
        }
        driver.set_buffer_direct(&frame_buffer, true);

        if settings.preview {
            driver.wait_for_refresh(settings.frame_interval);
            preview::show(&panel, &config);
        }

        frame += 1;
        if let Some(remaining) = settings.frame_interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!(
        "Rendered {frame} frames, the panels refreshed {} times",
        driver.refresh_count()
    );
    ExitCode::SUCCESS
}
