//! Responsible for creating and managing the ledscene settings

mod cli;

use std::{fmt, path::PathBuf, time::Duration};

use clap::Parser;

pub use cli::Arguments;

/// The demo scenes that can be played
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    /// One of every shape type
    Shapes,

    /// Planets orbiting a sun, built from nested collections
    #[default]
    SolarSystem,

    /// Two shapes that change color when they collide
    Collision,

    /// Scrolling text
    Text,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shapes => "shapes",
            Self::SolarSystem => "solar-system",
            Self::Collision => "collision",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Holds all the configurable information for a ledscene instance
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Width of a single panel, in pixels
    pub panel_width: usize,

    /// Height of a single panel, in pixels
    pub panel_height: usize,

    /// Number of horizontally chained panels
    pub chain_length: usize,

    pub brightness: u8,

    /// Panel refreshes per second
    pub refresh_rate: u32,

    /// Time between two rendered frames
    pub frame_interval: Duration,

    /// Stop after this many frames, run forever if `None`
    pub frames: Option<u64>,

    pub scene: SceneKind,

    /// `.bmp` file to use as a texture
    pub texture: Option<PathBuf>,

    /// Print the panel contents to the terminal after every frame
    pub preview: bool,
}

impl Settings {
    /// Default settings overlayed with the command line arguments of the process
    #[must_use]
    pub fn init() -> Self {
        let mut settings = Self::default();

        let args = Arguments::parse();

        args.update_settings(&mut settings);

        settings
    }

    /// Width of the whole panel chain
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.panel_width * self.chain_length
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            panel_width: 64,
            panel_height: 64,
            chain_length: 1,
            brightness: 90,
            refresh_rate: 120,
            frame_interval: Duration::from_millis(30),
            frames: None,
            scene: SceneKind::default(),
            texture: None,
            preview: false,
        }
    }
}
