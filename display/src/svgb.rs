use crate::draw;
use crate::pill::PillShape;
use crate::{Color, Display, Error, FontExtents, Point, Rect, TextSize, TouchSample};

/// SVG backend, used to render a frame to a file on machines without a
/// framebuffer. Has no input devices, so it never reports touches.
pub struct CairoSvg {
    #[allow(dead_code)]
    surface: Option<cairo::SvgSurface>,
    context: Option<cairo::Context>,
    width: usize,
    height: usize,
    output: std::path::PathBuf,
}

unsafe impl Send for CairoSvg {}

impl CairoSvg {
    pub fn new<P: Into<std::path::PathBuf>>(width: usize, height: usize, output: P) -> Self {
        Self {
            surface: None,
            context: None,
            width,
            height,
            output: output.into(),
        }
    }
}

impl Display for CairoSvg {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn start(&mut self) -> Result<(), Error> {
        let surface = cairo::SvgSurface::new(
            self.width as f64,
            self.height as f64,
            Some(&self.output),
        )?;
        self.context = Some(cairo::Context::new(&surface)?);
        self.surface = Some(surface);
        Ok(())
    }

    fn started(&self) -> bool {
        self.context.is_some()
    }

    fn finish(&mut self) {
        self.context = None;
        self.surface = None;
    }

    fn clear(&mut self, color: &Color) -> Result<(), Error> {
        if let Some(context) = &self.context {
            context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
            context.paint()?;
        }
        Ok(())
    }

    fn set_color(&mut self, color: &Color) {
        if let Some(context) = &self.context {
            context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
        }
    }

    fn set_font(&mut self, name: &str) -> Result<(), Error> {
        if let Some(context) = &self.context {
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
        if let Some(context) = &self.context {
            context.set_font_size(size);
        }
    }

    fn text_size(&self, what: &str) -> Result<TextSize, Error> {
        match &self.context {
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
        match &self.context {
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
        if let Some(context) = &self.context {
            context.move_to(r#where.x, r#where.y);
            context.show_text(what)?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        if let Some(context) = &self.context {
            context.rectangle(rect.x, rect.y, rect.w, rect.h);
            context.fill()?;
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        if let Some(context) = &self.context {
            context.set_line_width(1.0);
            context.rectangle(rect.x, rect.y, rect.w, rect.h);
            context.stroke()?;
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: &Point, to: &Point) -> Result<(), Error> {
        if let Some(context) = &self.context {
            context.set_line_width(1.0);
            context.move_to(from.x, from.y);
            context.line_to(to.x, to.y);
            context.stroke()?;
        }
        Ok(())
    }

    fn fill_pill(&mut self, shape: &PillShape) -> Result<(), Error> {
        if let Some(context) = &self.context {
            draw::fill_pill(context, shape)?;
        }
        Ok(())
    }

    fn init_events(&mut self) {}

    fn poll_touch(&mut self) -> Vec<TouchSample> {
        vec![]
    }
}
