use crate::draw;
use crate::input::TouchAssembler;
use crate::pill::PillShape;
use crate::touch::Rotation;
use crate::{Color, Display, Error, FontExtents, Point, Rect, TextSize, TouchSample};

/// Linux framebuffer backend. Draws with cairo straight into the mapped
/// framebuffer memory and reads touch input from evdev. The configured
/// rotation is applied as a cairo transform, so all drawing happens in
/// logical coordinates.
pub struct FbPanel {
    fb: linuxfb::Framebuffer,
    mmap: memmap::MmapMut,
    original_content: Vec<u8>,
    cairo_ctx: Option<CairoCtx>,
    old_hw_cursor: Option<Vec<u8>>,
    ev_devices: Option<Vec<evdev::Device>>,
    assembler: TouchAssembler,
    rotation: Rotation,
}

struct CairoCtx {
    #[allow(dead_code)]
    surface: cairo::Surface,
    context: cairo::Context,
}
// The panel only ever draws from the single coordination task.
unsafe impl Send for CairoCtx {}

impl std::fmt::Debug for FbPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FbPanel")
            .field("mmap", &self.mmap)
            .field("rotation", &self.rotation)
            .finish()
    }
}

impl Drop for FbPanel {
    fn drop(&mut self) {
        self.mmap.copy_from_slice(&self.original_content);
        if self.old_hw_cursor.is_some() {
            use std::io::prelude::*;

            let filename = Self::get_hw_cursor_filename();
            let file = std::fs::OpenOptions::new().write(true).open(filename);
            if let Ok(mut file) = file {
                if file.write_all(self.old_hw_cursor.as_ref().unwrap()).is_err() {
                    log::warn!("Writing to a {} file failed", filename);
                }
            } else {
                log::warn!("Failure to restore cursor in {}", filename);
            }
        }
    }
}

impl FbPanel {
    pub fn new(device: &str, rotation: Rotation) -> Result<Self, Error> {
        let fb = linuxfb::Framebuffer::new(device)?;

        log::debug!("Size in pixels: {:?}", fb.get_size());
        log::debug!("Bytes per pixel: {:?}", fb.get_bytes_per_pixel());
        log::debug!("Pixel layout: {:?}", fb.get_pixel_layout());

        let mmap = fb.map()?;
        let original_content = mmap.to_vec();

        let mut old_hw_cursor: Option<Vec<u8>> = None;
        {
            use std::io::prelude::*;

            let filename = Self::get_hw_cursor_filename();
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .open(filename);
            match file {
                Ok(mut file) => {
                    let mut data = Vec::new();
                    if file.read_to_end(&mut data).is_ok() {
                        old_hw_cursor = Some(data);
                    }
                    let disabled = file
                        .seek(std::io::SeekFrom::Start(0))
                        .and_then(|_| file.write_all(&[0]));
                    if disabled.is_err() {
                        log::info!("Failed to disable hw cursor in {}", filename);
                        old_hw_cursor = None;
                    }
                }
                Err(e) => match e.kind() {
                    std::io::ErrorKind::PermissionDenied => log::info!(
                        "Failed to disable hw cursor, not enough permissions to modify {}?",
                        filename
                    ),
                    _ => log::info!("Failure to access {}", filename),
                },
            }
        }

        Ok(FbPanel {
            fb,
            mmap,
            original_content,
            cairo_ctx: None,
            old_hw_cursor,
            ev_devices: None,
            assembler: TouchAssembler::default(),
            rotation,
        })
    }

    fn fb_width(&self) -> usize {
        self.fb.get_size().0 as usize
    }

    fn fb_height(&self) -> usize {
        self.fb.get_size().1 as usize
    }

    fn bytes_per_pixel(&self) -> usize {
        self.fb.get_bytes_per_pixel() as usize
    }

    fn context(&self) -> Option<&cairo::Context> {
        self.cairo_ctx.as_ref().map(|ctx| &ctx.context)
    }

    fn get_hw_cursor_filename() -> &'static str {
        "/sys/class/graphics/fbcon/cursor_blink"
    }
}

impl Display for FbPanel {
    fn width(&self) -> usize {
        if self.rotation.swaps_axes() {
            self.fb_height()
        } else {
            self.fb_width()
        }
    }

    fn height(&self) -> usize {
        if self.rotation.swaps_axes() {
            self.fb_width()
        } else {
            self.fb_height()
        }
    }

    fn start(&mut self) -> Result<(), Error> {
        use std::f64::consts::{FRAC_PI_2, PI};

        let width = self.fb_width() as i32;
        let height = self.fb_height() as i32;
        let bpp = self.bytes_per_pixel();
        // Retrieve a slice for the current backbuffer:
        let frame: &mut [u8] = &mut self.mmap[..];

        let surface = unsafe {
            let color_format = if bpp == 2 {
                4 /*CAIRO_FORMAT_RGB16_565*/
            } else {
                0 /*CAIRO_FORMAT_ARGB32*/
            };
            let stride = cairo_sys::cairo_format_stride_for_width(color_format, width);
            cairo::Surface::from_raw_none(cairo_sys::cairo_image_surface_create_for_data(
                frame.as_mut_ptr(),
                color_format,
                width,
                height,
                stride,
            ))
        };

        let context = cairo::Context::new(&surface)?;
        match self.rotation {
            Rotation::Deg0 => (),
            Rotation::Deg90 => {
                context.translate(width as f64, 0.0);
                context.rotate(FRAC_PI_2);
            }
            Rotation::Deg180 => {
                context.translate(width as f64, height as f64);
                context.rotate(PI);
            }
            Rotation::Deg270 => {
                context.translate(0.0, height as f64);
                context.rotate(3.0 * FRAC_PI_2);
            }
        }
        self.cairo_ctx = Some(CairoCtx { surface, context });
        Ok(())
    }

    fn started(&self) -> bool {
        self.cairo_ctx.is_some()
    }

    fn finish(&mut self) {
        self.cairo_ctx = None;
    }

    fn clear(&mut self, color: &Color) -> Result<(), Error> {
        if let Some(context) = self.context() {
            context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
            context.paint()?;
        }
        Ok(())
    }

    fn set_color(&mut self, color: &Color) {
        if let Some(context) = self.context() {
            context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
        }
    }

    fn set_font(&mut self, name: &str) -> Result<(), Error> {
        if let Some(context) = self.context() {
            let font = cairo::FontFace::toy_create(
                name,
                cairo::FontSlant::Normal,
                cairo::FontWeight::Normal,
            )?;
            context.set_font_face(&font);
        }
        Ok(())
    }

    fn set_font_size(&mut self, size: f64) {
        if let Some(context) = self.context() {
            context.set_font_size(size);
        }
    }

    fn text_size(&self, what: &str) -> Result<TextSize, Error> {
        match self.context() {
            Some(context) => {
                let extents = context.text_extents(what)?;
                Ok(TextSize {
                    width: extents.width(),
                    height: extents.height(),
                })
            }
            None => Ok(TextSize::default()),
        }
    }

    fn font_extents(&self) -> Result<FontExtents, Error> {
        match self.context() {
            Some(context) => {
                let extents = context.font_extents()?;
                Ok(FontExtents {
                    ascent: extents.ascent(),
                    descent: extents.descent(),
                    height: extents.height(),
                })
            }
            None => Ok(FontExtents::default()),
        }
    }

    fn render_text(&mut self, r#where: &Point, what: &str) -> Result<(), Error> {
        if let Some(context) = self.context() {
            context.move_to(r#where.x, r#where.y);
            context.show_text(what)?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        if let Some(context) = self.context() {
            context.rectangle(rect.x, rect.y, rect.w, rect.h);
            context.fill()?;
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        if let Some(context) = self.context() {
            context.set_line_width(1.0);
            context.rectangle(rect.x, rect.y, rect.w, rect.h);
            context.stroke()?;
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: &Point, to: &Point) -> Result<(), Error> {
        if let Some(context) = self.context() {
            context.set_line_width(1.0);
            context.move_to(from.x, from.y);
            context.line_to(to.x, to.y);
            context.stroke()?;
        }
        Ok(())
    }

    fn fill_pill(&mut self, shape: &PillShape) -> Result<(), Error> {
        if let Some(context) = self.context() {
            draw::fill_pill(context, shape)?;
        }
        Ok(())
    }

    fn init_events(&mut self) {
        let devices = evdev::enumerate();
        if !devices.is_empty() {
            for device in devices.iter() {
                log::debug!("Found input devices: {:?}", device);
            }
            self.ev_devices = Some(devices);
        }
    }

    fn poll_touch(&mut self) -> Vec<TouchSample> {
        let mut samples = vec![];
        if let Some(devices) = &mut self.ev_devices {
            for device in devices.iter_mut() {
                match device.events() {
                    Ok(raw_events) => {
                        for event in raw_events {
                            let e: crate::input::Event = event.into();
                            log::trace!("Raw event: {:?}", &e);
                            self.assembler.feed(&e, &mut samples);
                        }
                    }
                    Err(e) => {
                        log::debug!("error {:?} ", e);
                    }
                }
            }
        }

        samples
    }
}
