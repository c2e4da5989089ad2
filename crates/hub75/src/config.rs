use std::time::Duration;

use crate::PanelError;

/// Geometry and timing of a chain of identical panels
///
/// The panels are chained horizontally, the addressable area is
/// `panel_width * chain_length` pixels wide and `panel_height` pixels high.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub panel_width: usize,
    pub panel_height: usize,
    pub chain_length: usize,

    /// Refreshes per second
    pub refresh_rate: u32,

    /// Initial brightness, `255` is full brightness
    pub brightness: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_width: 64,
            panel_height: 32,
            chain_length: 1,
            refresh_rate: 120,
            brightness: 90,
        }
    }
}

/// A pixel on one specific panel of the chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLocation {
    /// Position in the chain, starting at zero
    pub panel: usize,
    pub x: usize,
    pub y: usize,
}

impl PanelConfig {
    #[must_use]
    pub fn width(&self) -> usize {
        self.panel_width * self.chain_length
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.panel_height
    }

    pub fn validate(&self) -> Result<(), PanelError> {
        if self.panel_width == 0 || self.panel_height == 0 {
            return Err(PanelError::InvalidConfig("panel dimensions must not be zero"));
        }
        if self.chain_length == 0 {
            return Err(PanelError::InvalidConfig("chain length must not be zero"));
        }
        if self.refresh_rate == 0 {
            return Err(PanelError::InvalidConfig("refresh rate must not be zero"));
        }
        Ok(())
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate.max(1)
    }

    /// Find the panel that displays pixel `(x, y)` of the whole chain
    #[must_use]
    pub fn locate(&self, x: usize, y: usize) -> Option<PanelLocation> {
        if self.panel_width == 0 || x >= self.width() || y >= self.height() {
            return None;
        }

        Some(PanelLocation {
            panel: x / self.panel_width,
            x: x % self.panel_width,
            y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelConfig, PanelLocation};
    use std::time::Duration;

    #[test]
    fn chained_panels() {
        let config = PanelConfig {
            chain_length: 3,
            ..Default::default()
        };
        assert_eq!((config.width(), config.height()), (192, 32));
        assert_eq!(
            config.locate(130, 7),
            Some(PanelLocation {
                panel: 2,
                x: 2,
                y: 7
            })
        );
        assert_eq!(config.locate(192, 0), None);
        assert_eq!(config.locate(0, 32), None);
    }

    #[test]
    fn validation() {
        assert!(PanelConfig::default().validate().is_ok());

        let no_panels = PanelConfig {
            chain_length: 0,
            ..Default::default()
        };
        assert!(no_panels.validate().is_err());
    }

    #[test]
    fn refresh_interval() {
        let config = PanelConfig {
            refresh_rate: 100,
            ..Default::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_millis(10));
    }
}
