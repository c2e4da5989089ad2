use std::{path::PathBuf, time::Duration};

use crate::{SceneKind, Settings};

#[derive(clap::Parser, Debug)]
#[command(name = "ledscene", version, about = "Animated vector scenes on HUB75 LED panels", long_about = None)]
pub struct Arguments {
    /// Scene to play
    #[arg(value_enum)]
    scene: Option<SceneKind>,

    /// Width of a single panel in pixels
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=512))]
    panel_width: Option<u16>,

    /// Height of a single panel in pixels
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=512))]
    panel_height: Option<u16>,

    /// Number of chained panels
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=16))]
    chain_length: Option<u16>,

    /// Panel brightness (0-255)
    #[arg(short, long)]
    brightness: Option<u8>,

    /// Panel refresh rate in Hz
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    refresh_rate: Option<u32>,

    /// Milliseconds between two rendered frames
    #[arg(long, value_parser = parse_milliseconds)]
    frame_interval: Option<Duration>,

    /// Stop after rendering this many frames
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Texture to apply to the scene (.bmp)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    texture: Option<PathBuf>,

    /// Print the panel contents to the terminal
    #[clap(
        long,
        action = clap::ArgAction::SetTrue,
    )]
    preview: bool,
}

impl Arguments {
    pub fn update_settings(self, settings: &mut Settings) {
        if let Some(scene) = self.scene {
            settings.scene = scene;
        }

        if let Some(panel_width) = self.panel_width {
            settings.panel_width = panel_width.into();
        }

        if let Some(panel_height) = self.panel_height {
            settings.panel_height = panel_height.into();
        }

        if let Some(chain_length) = self.chain_length {
            settings.chain_length = chain_length.into();
        }

        if let Some(brightness) = self.brightness {
            settings.brightness = brightness;
        }

        if let Some(refresh_rate) = self.refresh_rate {
            settings.refresh_rate = refresh_rate;
        }

        if let Some(frame_interval) = self.frame_interval {
            settings.frame_interval = frame_interval;
        }

        if self.frames.is_some() {
            settings.frames = self.frames;
        }

        if self.texture.is_some() {
            settings.texture = self.texture;
        }

        settings.preview |= self.preview;
    }
}

fn parse_milliseconds(s: &str) -> Result<Duration, String> {
    s.parse()
        .map(Duration::from_millis)
        .map_err(|e: std::num::ParseIntError| format!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::Arguments;
    use crate::{SceneKind, Settings};
    use clap::Parser;
    use std::time::Duration;

    fn settings_from(args: &[&str]) -> Settings {
        let mut settings = Settings::default();
        Arguments::try_parse_from(std::iter::once("ledscene").chain(args.iter().copied()))
            .unwrap()
            .update_settings(&mut settings);
        settings
    }

    #[test]
    fn defaults_are_kept() {
        assert_eq!(settings_from(&[]), Settings::default());
    }

    #[test]
    fn arguments_override_defaults() {
        let settings = settings_from(&[
            "collision",
            "--panel-width",
            "32",
            "--chain-length",
            "2",
            "-b",
            "200",
            "--frame-interval",
            "50",
            "-n",
            "10",
            "--preview",
        ]);

        assert_eq!(settings.scene, SceneKind::Collision);
        assert_eq!(settings.panel_width, 32);
        assert_eq!(settings.panel_height, 64);
        assert_eq!(settings.display_width(), 64);
        assert_eq!(settings.brightness, 200);
        assert_eq!(settings.frame_interval, Duration::from_millis(50));
        assert_eq!(settings.frames, Some(10));
        assert!(settings.preview);
    }

    #[test]
    fn reject_invalid_arguments() {
        let parse = |args: &[&str]| {
            Arguments::try_parse_from(std::iter::once("ledscene").chain(args.iter().copied()))
        };

        assert!(parse(&["--panel-width", "0"]).is_err());
        assert!(parse(&["--brightness", "300"]).is_err());
        assert!(parse(&["fireworks"]).is_err());
    }
}
