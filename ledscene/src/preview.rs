//! Show the contents of a simulated panel chain in a terminal
//!
//! Every character cell displays two pixels stacked on top of each other,
//! using the upper half block with a foreground and a background color.

use std::fmt::Write;

use hub75::{MemoryPanel, PanelConfig};

const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Render the panels as a string of ANSI escape sequences
#[must_use]
pub fn render(panel: &MemoryPanel, config: &PanelConfig) -> String {
    let mut output = String::new();

    for y in (0..config.height()).step_by(2) {
        for x in 0..config.width() {
            let top = panel.pixel(x, y).unwrap_or_default();
            let bottom = panel.pixel(x, y + 1).unwrap_or_default();

            // Writing to a String never fails
            let _ = write!(
                output,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{UPPER_HALF_BLOCK}",
                top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]
            );
        }
        output.push_str("\x1b[0m\n");
    }

    output
}

/// Draw the panels over the previous preview
pub fn show(panel: &MemoryPanel, config: &PanelConfig) {
    // Move the cursor back to the top left corner instead of scrolling
    print!("\x1b[H{}", render(panel, config));
}

#[cfg(test)]
mod tests {
    use super::{render, UPPER_HALF_BLOCK};
    use hub75::{MemoryPanel, Panel, PanelConfig};

    #[test]
    fn two_pixels_per_cell() {
        let config = PanelConfig {
            panel_width: 2,
            panel_height: 3,
            ..Default::default()
        };
        let mut panel = MemoryPanel::new();
        panel.begin(&config).unwrap();
        panel.draw_pixel(0, 0, [255, 0, 0]);
        panel.draw_pixel(0, 1, [0, 0, 255]);

        let preview = render(&panel, &config);
        let lines: Vec<_> = preview.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m"));
        assert_eq!(lines[0].matches(UPPER_HALF_BLOCK).count(), 2);

        // The odd last row is padded with black
        assert!(lines[1].starts_with("\x1b[38;2;0;0;0m\x1b[48;2;0;0;0m"));
    }
}
