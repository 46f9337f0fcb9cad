//! Console stand-in for the OLED.
//!
//! Renders through the same [`GraphicsDisplay`] as the real panel so
//! layout bugs show up on the host, and echoes the text of each committed
//! frame to the log.  Repeated identical frames (a progress bar ticking
//! under the same banner) drop to `trace` level to keep the log readable.

use log::{Level, info, log_enabled, trace};

use crate::app::ports::{Display, DisplayError};
use crate::drivers::oled::{FrameBuffer, GraphicsDisplay};

pub struct ConsoleScreen {
    screen: GraphicsDisplay<FrameBuffer>,
    lines: Vec<String>,
    last_frame: Vec<String>,
}

impl Default for ConsoleScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleScreen {
    pub fn new() -> Self {
        Self {
            screen: GraphicsDisplay::new(FrameBuffer::new()),
            lines: Vec::new(),
            last_frame: Vec::new(),
        }
    }

    /// Text of the last committed frame, top to bottom.
    pub fn text(&self) -> &[String] {
        &self.last_frame
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.screen.panel()
    }
}

impl Display for ConsoleScreen {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lines.clear();
        self.screen.clear()
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        self.lines.push(text.to_string());
        self.screen.draw_text(x, y, text)
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        outline: bool,
        filled: bool,
    ) -> Result<(), DisplayError> {
        self.screen.draw_rect(x, y, width, height, outline, filled)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.screen.flush()?;
        if self.lines != self.last_frame {
            info!("SCREEN | {}", self.lines.join(" / "));
            self.last_frame = self.lines.clone();
        }
        if log_enabled!(Level::Trace) {
            trace!("SCREEN |\n{}", self.screen.panel().to_ascii());
        }
        Ok(())
    }
}
