use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::{Duration, Instant},
};

use math::{Bitmap, Color};
use render::{decode_records, FrameBuffer, PixelRecord};

use crate::{Panel, PanelConfig, PanelError};

/// The full contents of a panel chain, as submitted by the producer
pub type Frame = Bitmap<Color>;

/// State shared between the producer and the refresh thread
#[derive(Debug)]
struct Shared {
    /// The most recently submitted frame
    ///
    /// Frames are never modified once they are published, the producer swaps
    /// in a new one instead.
    active: Mutex<Arc<Frame>>,
    brightness: AtomicU8,
    initialized: AtomicBool,
    running: AtomicBool,
    clear_requested: AtomicBool,
    refreshes: AtomicU64,
}

impl Shared {
    fn active(&self) -> MutexGuard<'_, Arc<Frame>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a chain of HUB75 panels in sync with the submitted frames
///
/// Frames are double buffered: the producer draws into a shadow frame and
/// publishes it by swapping a pointer, so the refresh thread always sees a
/// complete frame. Dropping the driver stops the refresh thread.
#[derive(Debug)]
pub struct Hub75 {
    config: PanelConfig,
    shared: Arc<Shared>,
    shadow: Frame,
    refresh_thread: Option<thread::JoinHandle<()>>,
}

impl Hub75 {
    /// Spawn the refresh thread, which initializes `panel` before presenting any frames
    ///
    /// The panel handshake happens in the background, use [Hub75::is_initialized]
    /// or [Hub75::wait_until_initialized] to find out when the panels are ready.
    pub fn start<P: Panel + 'static>(config: PanelConfig, panel: P) -> Result<Self, PanelError> {
        config.validate()?;

        let blank = Frame::filled(config.width(), config.height(), Color::BLACK);
        let shared = Arc::new(Shared {
            active: Mutex::new(Arc::new(blank.clone())),
            brightness: AtomicU8::new(config.brightness),
            initialized: AtomicBool::new(false),
            running: AtomicBool::new(true),
            clear_requested: AtomicBool::new(false),
            refreshes: AtomicU64::new(0),
        });

        let refresh_thread = {
            let shared = shared.clone();
            thread::Builder::new()
                .name("hub75-refresh".to_string())
                .spawn(move || refresh(config, panel, &shared))
                .map_err(PanelError::Spawn)?
        };

        log::info!(
            "Driving {} panel(s) of {}x{} pixels at {} Hz",
            config.chain_length,
            config.panel_width,
            config.panel_height,
            config.refresh_rate
        );

        Ok(Self {
            config,
            shared,
            shadow: blank,
            refresh_thread: Some(refresh_thread),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Acquire)
    }

    /// Block until the panels are initialized or `timeout` has passed
    ///
    /// Returns whether the panels are initialized.
    pub fn wait_until_initialized(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, || self.is_initialized())
    }

    /// How many refresh cycles have completed so far
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.shared.refreshes.load(Ordering::Acquire)
    }

    /// Block until a frame submitted before this call is visible on the panels
    ///
    /// Returns `false` if that did not happen within `timeout`.
    pub fn wait_for_refresh(&self, timeout: Duration) -> bool {
        // The refresh in progress might have taken its snapshot before the
        // latest submission
        let target = self.refresh_count() + 2;
        self.wake_refresh_thread();
        self.wait_for(timeout, || {
            self.wake_refresh_thread();
            self.refresh_count() >= target
        })
    }

    fn wait_for<F: Fn() -> bool>(&self, timeout: Duration, condition: F) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if condition() {
                return true;
            }
            if Instant::now() >= deadline || self.refresh_thread_finished() {
                return condition();
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn refresh_thread_finished(&self) -> bool {
        self.refresh_thread
            .as_ref()
            .map_or(true, thread::JoinHandle::is_finished)
    }

    fn wake_refresh_thread(&self) {
        if let Some(handle) = &self.refresh_thread {
            handle.thread().unpark();
        }
    }

    /// A snapshot of the most recently submitted frame
    #[must_use]
    pub fn active_frame(&self) -> Arc<Frame> {
        self.shared.active().clone()
    }

    /// Submit a list of pixels
    ///
    /// Pixels outside of the panel chain are ignored. If `clear_previous` is
    /// set, every pixel that is not part of `pixels` becomes black, otherwise
    /// it keeps the color of the previous frame.
    pub fn set_buffer(&mut self, pixels: &[PixelRecord], clear_previous: bool) {
        self.submit(pixels.iter().copied(), clear_previous);
    }

    /// Submit pixels in their packed binary form, see [PixelRecord::to_bytes]
    pub fn set_buffer_packed(&mut self, bytes: &[u8], clear_previous: bool) {
        self.submit(decode_records(bytes), clear_previous);
    }

    /// Submit every pixel of a frame buffer that is not fully transparent
    pub fn set_buffer_direct(&mut self, frame_buffer: &FrameBuffer, clear_previous: bool) {
        self.submit(frame_buffer.covered_pixels(), clear_previous);
    }

    fn submit<I: IntoIterator<Item = PixelRecord>>(&mut self, pixels: I, clear_previous: bool) {
        if !self.is_initialized() {
            log::debug!("Dropping frame, the panels are not initialized yet");
            return;
        }

        if clear_previous {
            self.shadow.fill(Color::BLACK);
        }

        for PixelRecord { x, y, color } in pixels {
            if let Some(pixel) = self.shadow.get_mut(x, y) {
                *pixel = color;
            }
        }

        self.publish();
    }

    fn publish(&mut self) {
        let frame = Arc::new(self.shadow.clone());
        *self.shared.active() = frame;
        self.wake_refresh_thread();
    }

    /// Turn every pixel black
    pub fn clear(&mut self) {
        if !self.is_initialized() {
            return;
        }

        self.shadow.fill(Color::BLACK);
        self.shared.clear_requested.store(true, Ordering::Release);
        self.publish();
    }

    /// Set the brightness, `255` being full brightness
    pub fn set_brightness(&mut self, brightness: u8) {
        log::debug!("Setting panel brightness to {brightness}");
        self.shared.brightness.store(brightness, Ordering::Release);
        self.wake_refresh_thread();
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.shared.brightness.load(Ordering::Acquire)
    }
}

impl Drop for Hub75 {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);

        if let Some(handle) = self.refresh_thread.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("The panel refresh thread panicked");
            }
        }
    }
}

/// Body of the refresh thread
fn refresh<P: Panel>(config: PanelConfig, mut panel: P, shared: &Shared) {
    if let Err(error) = panel.begin(&config) {
        log::error!("Failed to initialize the panels: {error}");
        return;
    }

    // Brightness is applied to the pixel values, the hardware always runs at full power
    panel.set_brightness(u8::MAX);
    panel.clear_screen();

    let mut presented = Bitmap::filled(config.width(), config.height(), [0_u8; 3]);
    shared.initialized.store(true, Ordering::Release);
    log::info!("Panels are initialized");

    let interval = config.refresh_interval();
    while shared.running.load(Ordering::Acquire) {
        let started = Instant::now();

        if shared.clear_requested.swap(false, Ordering::AcqRel) {
            panel.clear_screen();
            presented.fill([0; 3]);
        }

        let frame = shared.active().clone();
        let level = shared.brightness.load(Ordering::Acquire);
        present(&mut panel, &frame, &mut presented, level);
        panel.end_refresh();
        shared.refreshes.fetch_add(1, Ordering::AcqRel);

        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            thread::park_timeout(remaining);
        }
    }

    log::debug!("Stopping panel refresh");
}

/// Push every pixel whose output differs from what the panels currently show
fn present<P: Panel>(panel: &mut P, frame: &Frame, presented: &mut Bitmap<[u8; 3]>, level: u8) {
    let width = frame.width();
    for (index, (color, shown)) in frame
        .data()
        .iter()
        .zip(presented.data_mut().iter_mut())
        .enumerate()
    {
        let output = Color::scaled(color.premultiplied(), level);
        if output != *shown {
            panel.draw_pixel(index % width, index / width, output);
            *shown = output;
        }
    }
}
