//! Page rendering orchestration.
//!
//! Walks the configured page list in order, drawing each page's caption and,
//! when an image block is present, fetching the asset and placing every grid
//! slot the layout engine hands back. The document is only written to disk
//! after every page has rendered, so a failure mid-run leaves no partial
//! output behind.

use crate::assets;
use crate::config::{Caption, Config, ImageBlock};
use crate::fonts::FontCatalog;
use crate::layout::{self, ContentBox, ImageSize};
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use printpdf::{
    Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfLayerReference, Pt, Px, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Summary of a finished render, for the final user-facing report.
pub struct RenderStats {
    pub page_count: usize,
}

/// Render every configured page and write the document to `config.name`.
pub fn render(config: &Config, progress: &ProgressBar) -> Result<RenderStats> {
    let page_width = Mm::from(Pt(config.pagesize.width));
    let page_height = Mm::from(Pt(config.pagesize.height));

    let (doc, first_page, first_layer) =
        PdfDocument::new(config.name.as_str(), page_width, page_height, "Layer 1");

    let fonts = FontCatalog::load(&doc, &config.fonts)
        .with_context(|| "Failed to register document fonts")?;

    for (i, page) in config.pages.iter().enumerate() {
        progress.set_message(format!("page {}", i + 1));

        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(page_width, page_height, "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        let caption_height = place_caption(&layer, config, &fonts, &page.caption)
            .with_context(|| format!("Failed to draw caption on page {}", i + 1))?;

        if let Some(image) = &page.image {
            place_images(&layer, config, image, caption_height)
                .with_context(|| format!("Failed to place images on page {}", i + 1))?;
        }

        progress.inc(1);
    }

    let file = File::create(&config.name)
        .with_context(|| format!("Failed to create output file {}", config.name))?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .with_context(|| format!("Failed to write {}", config.name))?;

    Ok(RenderStats {
        page_count: config.pages.len(),
    })
}

/// Draw the caption centered horizontally with its baseline at the bottom
/// margin, and return the vertical height it reserves.
///
/// The reserved height is the font size; descenders may extend below the
/// bottom margin.
fn place_caption(
    layer: &PdfLayerReference,
    config: &Config,
    fonts: &FontCatalog,
    caption: &Caption,
) -> Result<f32> {
    let size = caption.size.unwrap_or(config.caption.size);
    let font_name = caption.font.as_deref().unwrap_or(&config.caption.font);
    let [r, g, b] = caption.color.unwrap_or(config.caption.color);
    let font = fonts.get(font_name)?;

    let box_width = config.pagesize.width - config.margin.left - config.margin.right;
    let text_width = font.width_of_text(&caption.text, size);
    let x = config.margin.left + (box_width - text_width) * 0.5;

    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    layer.use_text(
        caption.text.as_str(),
        size,
        Mm::from(Pt(x)),
        Mm::from(Pt(config.margin.bottom)),
        &font.font_ref,
    );

    Ok(size)
}

/// Fetch the page's image and draw one copy per layout slot in the content box
/// above the caption.
fn place_images(
    layer: &PdfLayerReference,
    config: &Config,
    block: &ImageBlock,
    caption_height: f32,
) -> Result<()> {
    let path = assets::fetch(&block.url)?;
    let (px_width, px_height) = image::image_dimensions(&path)
        .with_context(|| format!("Failed to read image dimensions of {}", path.display()))?;

    let content = ContentBox {
        width: config.pagesize.width - config.margin.left - config.margin.right,
        height: config.pagesize.height
            - config.margin.top
            - config.margin.bottom
            - caption_height,
    };
    if content.width <= 0.0 || content.height <= 0.0 {
        bail!(
            "margins and caption leave no room for images ({:.1} x {:.1} pt)",
            content.width,
            content.height
        );
    }

    let placements = layout::compute_placements(
        ImageSize {
            width: px_width as f32,
            height: px_height as f32,
        },
        block.number,
        &config.layouts,
        content,
    )?;

    let pixels = load_rgb_pixels(&path)?;
    for placement in placements {
        let image = Image::from(ImageXObject {
            width: Px(px_width as usize),
            height: Px(px_height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: pixels.clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        let x = config.margin.left + placement.x;
        let y = config.margin.bottom + caption_height + placement.y;

        // at 72 dpi one pixel is one point, so scale maps pixels to points
        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm::from(Pt(x))),
                translate_y: Some(Mm::from(Pt(y))),
                scale_x: Some(placement.width / px_width as f32),
                scale_y: Some(placement.height / px_height as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    Ok(())
}

/// Decode the cached image to raw RGB8, compositing any alpha channel over
/// white. Transparent PNGs otherwise come out black in the rendered page.
fn load_rgb_pixels(path: &Path) -> Result<Vec<u8>> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    let rgba = img.to_rgba8();

    let mut pixels = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = u32::from(a);
        for channel in [r, g, b] {
            pixels.push(((u32::from(channel) * a + 255 * (255 - a)) / 255) as u8);
        }
    }

    Ok(pixels)
}
