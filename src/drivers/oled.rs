//! 128x64 monochrome panel behind the [`Display`] port.
//!
//! [`GraphicsDisplay`] renders text and rectangles with `embedded-graphics`
//! onto any [`Panel`]: a buffered draw target that can be wiped and pushed
//! out.  Two panels ship with the crate:
//!
//! - [`FrameBuffer`]: in-memory pixels, used on the host and in tests.
//! - `Ssd1306` in buffered graphics mode (feature `oled`), the I²C OLED on
//!   the appliance.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::app::ports::{Display, DisplayError, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Buffered draw target.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Wipe the buffer without touching the hardware.
    fn clear_frame(&mut self);

    /// Send the buffer to the hardware.
    fn flush_frame(&mut self) -> Result<(), DisplayError>;
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

pub struct GraphicsDisplay<T> {
    panel: T,
}

impl<T: Panel> GraphicsDisplay<T> {
    pub fn new(panel: T) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &T {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut T {
        &mut self.panel
    }
}

impl<T: Panel> Display for GraphicsDisplay<T> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.panel.clear_frame();
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        Text::with_baseline(text, Point::new(x, y), text_style(), Baseline::Top)
            .draw(&mut self.panel)
            .map(|_| ())
            .map_err(|_| DisplayError::Draw)
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
        if !(outline || filled) || width == 0 || height == 0 {
            return Ok(());
        }
        let mut style = PrimitiveStyleBuilder::new();
        if filled {
            style = style.fill_color(BinaryColor::On);
        }
        if outline {
            style = style.stroke_color(BinaryColor::On).stroke_width(1);
        }
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(style.build())
            .draw(&mut self.panel)
            .map_err(|_| DisplayError::Draw)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.panel.flush_frame()
    }
}

// ───────────────────────────────────────────────────────────────
// In-memory panel
// ───────────────────────────────────────────────────────────────

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Screen-sized pixel buffer.  Pixels outside the screen are clipped.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: Vec<bool>,
    flushes: u32,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; WIDTH * HEIGHT],
            flushes: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&on| on).count()
    }

    /// Frames pushed so far.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// One character per pixel, `#` for lit.  Rows are newline separated.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((WIDTH + 1) * HEIGHT);
        for row in self.pixels.chunks(WIDTH) {
            out.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.pixels[y * WIDTH + x] = color.is_on();
                }
            }
        }
        Ok(())
    }
}

impl Panel for FrameBuffer {
    fn clear_frame(&mut self) {
        self.pixels.fill(false);
    }

    fn flush_frame(&mut self) -> Result<(), DisplayError> {
        self.flushes += 1;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// SSD1306 over I²C
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "oled")]
mod ssd1306_panel {
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::{GraphicsDisplay, Panel};
    use crate::app::ports::DisplayError as PortError;
    use crate::pins;

    /// The appliance's panel: SSD1306 128x64 in buffered mode.
    pub type Oled<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

    impl<DI, SIZE> Panel for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
    where
        DI: WriteOnlyDataCommand,
        SIZE: DisplaySize,
    {
        fn clear_frame(&mut self) {
            self.clear_buffer();
        }

        fn flush_frame(&mut self) -> Result<(), PortError> {
            self.flush().map_err(|e| {
                log::warn!("OLED flush failed: {:?}", e);
                PortError::Bus
            })
        }
    }

    /// Bring up the OLED on `i2c` with a blank screen.
    pub fn init<I2C>(i2c: I2C) -> Result<GraphicsDisplay<Oled<I2C>>, PortError>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        let interface = I2CDisplayInterface::new_custom_address(i2c, pins::OLED_I2C_ADDRESS);
        let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        oled.init().map_err(|_| PortError::Bus)?;
        oled.clear_buffer();
        oled.flush().map_err(|_| PortError::Bus)?;
        Ok(GraphicsDisplay::new(oled))
    }
}

#[cfg(feature = "oled")]
pub use ssd1306_panel::{Oled, init};
