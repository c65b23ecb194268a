//! Terminal rendering module for rich markdown output
//!
//! Renders phase reports and live step transitions using termimad, with
//! a plain-text fallback for `--no-color`.

use anyhow::Result;
use concierge_core::{Step, StepStatus};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            self.skin.print_text(markdown);
        } else {
            print!("{markdown}");
        }
        Ok(())
    }

    /// Print a single live step transition line.
    ///
    /// Active steps stay terse; completed steps append their details so
    /// the run reads as a log of what each step produced.
    pub fn step_line(&self, step: &Step) {
        let mut line = format!("{} {}", status_glyph(step.status), step.label);
        if step.status == StepStatus::Completed && !step.details.is_empty() {
            let detail: Vec<String> = step
                .details
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            line.push_str(&format!("  ({})", detail.join(", ")));
        }

        if self.rich_enabled {
            let color = match step.status {
                StepStatus::Completed => "\x1b[32m",
                StepStatus::Error => "\x1b[31m",
                StepStatus::Active => "\x1b[33m",
                StepStatus::Pending => "\x1b[2m",
            };
            println!("{color}{line}\x1b[0m");
        } else {
            println!("{line}");
        }
    }
}

fn status_glyph(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "○",
        StepStatus::Active => "➤",
        StepStatus::Completed => "✓",
        StepStatus::Error => "✗",
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_status_glyphs() {
        assert_eq!(status_glyph(StepStatus::Completed), "✓");
        assert_eq!(status_glyph(StepStatus::Error), "✗");
    }
}
