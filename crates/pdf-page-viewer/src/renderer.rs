use crate::constants::{MAX_RENDER_HEIGHT, MAX_RENDER_WIDTH, MIN_RENDER_WIDTH};
use crate::error::{Result, ViewerError};
use crate::payload::{PageNumber, decode_data_uri};
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Parses a document and rasterises its pages.
pub trait DocumentRenderer {
    /// Loads the document behind `data_uri` and returns its page count.
    fn load(&mut self, data_uri: &str) -> Result<u32>;

    /// Renders `page` about `target_width` pixels wide, with neither side above `max_side`.
    fn render_page(&self, page: PageNumber, target_width: u32, max_side: u32) -> Result<RgbImage>;
}

fn find_pdfium_library() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().map_err(|e| {
        ViewerError::RendererUnavailable(format!("Failed to get executable path: {}", e))
    })?;

    let exe_dir = exe_path.parent().ok_or_else(|| {
        ViewerError::RendererUnavailable("Executable has no parent directory".into())
    })?;

    let library_path = exe_dir.join(Pdfium::pdfium_platform_library_name());

    if library_path.exists() {
        return Ok(library_path);
    }

    Err(ViewerError::RendererUnavailable(format!(
        "PDFium library not found at {}",
        library_path.display()
    )))
}

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = match find_pdfium_library() {
        Ok(path) => Pdfium::bind_to_library(&path).map_err(|e| {
            ViewerError::RendererUnavailable(format!(
                "Failed to bind to PDF library at {}: {}",
                path.display(),
                e
            ))
        })?,
        Err(local_err) => {
            log::debug!("{}, falling back to system library", local_err);
            Pdfium::bind_to_system_library().map_err(|e| {
                ViewerError::RendererUnavailable(format!(
                    "Failed to bind to system PDF library: {}",
                    e
                ))
            })?
        }
    };

    Ok(Pdfium::new(bindings))
}

/// [`DocumentRenderer`] backed by PDFium.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
    bytes: Option<Vec<u8>>,
    page_count: u32,
}

impl std::fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRenderer")
            .field("loaded", &self.bytes.is_some())
            .field("page_count", &self.page_count)
            .finish()
    }
}

impl PdfiumRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pdfium: bind_pdfium()?,
            bytes: None,
            page_count: 0,
        })
    }
}

impl DocumentRenderer for PdfiumRenderer {
    fn load(&mut self, data_uri: &str) -> Result<u32> {
        self.bytes = None;
        self.page_count = 0;

        let bytes = decode_data_uri(data_uri)?;

        let page_count = {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(&bytes, None)
                .map_err(|e| ViewerError::InvalidPdf(format!("Failed to load PDF: {}", e)))?;
            u32::from(document.pages().len())
        };

        if page_count == 0 {
            return Err(ViewerError::InvalidPdf("Document has no pages".into()));
        }

        self.bytes = Some(bytes);
        self.page_count = page_count;

        Ok(page_count)
    }

    fn render_page(&self, page: PageNumber, target_width: u32, max_side: u32) -> Result<RgbImage> {
        let bytes = self.bytes.as_ref().ok_or(ViewerError::NoDocument)?;

        if page.get() > self.page_count {
            return Err(ViewerError::PageOutOfRange {
                page: page.get(),
                page_count: self.page_count,
            });
        }

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| ViewerError::RenderFailed(format!("Failed to load PDF: {}", e)))?;

        let index = u16::try_from(page.index()).map_err(|_| ViewerError::PageOutOfRange {
            page: page.get(),
            page_count: self.page_count,
        })?;

        let pdf_page = document
            .pages()
            .get(index)
            .map_err(|e| ViewerError::RenderFailed(format!("Failed to get page: {}", e)))?;

        let (width, height) = render_size(
            pdf_page.width().value,
            pdf_page.height().value,
            target_width,
            max_side,
        );

        let mut bitmap = PdfBitmap::empty(
            width as i32,
            height as i32,
            PdfBitmapFormat::BGRx,
            self.pdfium.bindings(),
        )
        .map_err(|e| ViewerError::RenderFailed(format!("Failed to create bitmap: {:?}", e)))?;

        pdf_page
            .render_into_bitmap(&mut bitmap, width as i32, height as i32, None)
            .map_err(|e| ViewerError::RenderFailed(format!("Failed to render bitmap: {:?}", e)))?;

        Ok(bgrx_to_rgb(&bitmap.as_raw_bytes(), width, height))
    }
}

/// Pixel size for a page of `page_width` x `page_height` points drawn
/// `target_width` pixels wide. Both sides stay within `max_side` and the
/// render limits; the aspect ratio is kept when a limit applies.
pub fn render_size(page_width: f32, page_height: f32, target_width: u32, max_side: u32) -> (u32, u32) {
    let max_width = MAX_RENDER_WIDTH.min(max_side).max(1);
    let max_height = MAX_RENDER_HEIGHT.min(max_side).max(1);
    let height_per_width = page_height / page_width.max(0.001);

    let width = target_width.clamp(MIN_RENDER_WIDTH.min(max_width), max_width);
    let height = (width as f32 * height_per_width).round() as u32;
    if height <= max_height {
        return (width, height.max(1));
    }

    let width = (max_height as f32 / height_per_width.max(0.001)).round() as u32;
    (width.clamp(1, max_width), max_height)
}

fn bgrx_to_rgb(pixels: &[u8], width: u32, height: u32) -> RgbImage {
    let mut rgb_image = RgbImage::new(width, height);

    for (i, chunk) in pixels.chunks_exact(4).enumerate() {
        if i >= (width * height) as usize {
            break;
        }
        let x = i as u32 % width;
        let y = i as u32 / width;
        rgb_image.put_pixel(x, y, image::Rgb([chunk[2], chunk[1], chunk[0]]));
    }

    rgb_image
}
