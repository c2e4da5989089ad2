use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use math::Bitmap;

use crate::{PanelConfig, PanelError};

/// The hardware side of a panel chain
///
/// Coordinates passed to a panel always address the whole chain, colors are
/// final output values that already include alpha and brightness.
pub trait Panel: Send {
    /// Run the initialization sequence
    fn begin(&mut self, config: &PanelConfig) -> Result<(), PanelError>;

    fn draw_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]);

    /// Set the global brightness of the hardware, `255` being full brightness
    fn set_brightness(&mut self, level: u8);

    fn clear_screen(&mut self);

    /// Called once the pixels of a refresh pass were drawn
    ///
    /// Every pass draws the changes of exactly one submitted frame.
    fn end_refresh(&mut self) {}
}

#[derive(Debug, Default)]
struct MemoryPanelState {
    config: Option<PanelConfig>,

    /// One bitmap per panel in the chain
    panels: Vec<Bitmap<[u8; 3]>>,
    brightness: u8,
    pixel_writes: usize,
    fail_handshake: bool,
}

/// A simulated panel chain that keeps its pixels in memory
///
/// Clones share the same pixels, so one clone can be handed to a
/// [Hub75](crate::Hub75) driver while another one is used to inspect the output.
#[derive(Clone, Debug, Default)]
pub struct MemoryPanel {
    state: Arc<Mutex<MemoryPanelState>>,
}

impl MemoryPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A panel that never completes its initialization sequence
    #[must_use]
    pub fn unresponsive() -> Self {
        let panel = Self::default();
        panel.state().fail_handshake = true;
        panel
    }

    fn state(&self) -> MutexGuard<'_, MemoryPanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state().config.is_some()
    }

    /// The color currently shown at `(x, y)` of the chain
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        let state = self.state();
        let location = state.config?.locate(x, y)?;
        Some(state.panels[location.panel].get_pixel(location.x, location.y))
    }

    /// The contents of a single panel of the chain
    #[must_use]
    pub fn panel_pixels(&self, panel: usize) -> Option<Bitmap<[u8; 3]>> {
        self.state().panels.get(panel).cloned()
    }

    /// How many pixels have been drawn since the panel was created
    #[must_use]
    pub fn pixel_writes(&self) -> usize {
        self.state().pixel_writes
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.state().brightness
    }
}

impl Panel for MemoryPanel {
    fn begin(&mut self, config: &PanelConfig) -> Result<(), PanelError> {
        let mut state = self.state();
        if state.fail_handshake {
            return Err(PanelError::HandshakeFailed);
        }

        state.panels = (0..config.chain_length)
            .map(|_| Bitmap::filled(config.panel_width, config.panel_height, [0; 3]))
            .collect();
        state.config = Some(*config);
        Ok(())
    }

    fn draw_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let mut state = self.state();
        let Some(location) = state.config.and_then(|config| config.locate(x, y)) else {
            return;
        };

        state.panels[location.panel].set_pixel(location.x, location.y, rgb);
        state.pixel_writes += 1;
    }

    fn set_brightness(&mut self, level: u8) {
        self.state().brightness = level;
    }

    fn clear_screen(&mut self) {
        for panel in &mut self.state().panels {
            panel.fill([0; 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPanel, Panel};
    use crate::{PanelConfig, PanelError};

    #[test]
    fn pixels_are_routed_to_their_panel() {
        let mut panel = MemoryPanel::new();
        let config = PanelConfig {
            panel_width: 4,
            panel_height: 2,
            chain_length: 2,
            ..Default::default()
        };
        panel.begin(&config).unwrap();

        panel.draw_pixel(5, 1, [1, 2, 3]);
        panel.draw_pixel(8, 0, [9, 9, 9]);

        assert_eq!(panel.pixel(5, 1), Some([1, 2, 3]));
        assert_eq!(panel.panel_pixels(1).unwrap().get_pixel(1, 1), [1, 2, 3]);
        assert_eq!(panel.panel_pixels(0).unwrap().get_pixel(1, 1), [0, 0, 0]);
        assert_eq!(panel.pixel_writes(), 1);
    }

    #[test]
    fn clones_share_state() {
        let mut panel = MemoryPanel::new();
        let observer = panel.clone();
        panel.begin(&PanelConfig::default()).unwrap();
        panel.set_brightness(12);

        assert!(observer.is_initialized());
        assert_eq!(observer.brightness(), 12);
    }

    #[test]
    fn unresponsive_panel() {
        let mut panel = MemoryPanel::unresponsive();
        assert!(matches!(
            panel.begin(&PanelConfig::default()),
            Err(PanelError::HandshakeFailed)
        ));
        assert!(!panel.is_initialized());
    }
}
