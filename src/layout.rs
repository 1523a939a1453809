//! Image grid layout and fitting.
//!
//! Given a source image's pixel dimensions, a desired image count, and the
//! content box left over on the page, this module picks the grid shape for that
//! count from the layout table and computes a placement for every slot:
//!
//! 1. The content box is partitioned into `rows x cols` uniform cells, where
//!    `cols` is the *longest* row of the grid shape. Shorter rows keep the same
//!    cell size and pick up extra centering margin instead - this keeps the
//!    image scale uniform across all rows of the page.
//! 2. The image is scaled by whichever dimension would overflow its cell more
//!    (the larger of the width and height fit ratios), preserving aspect ratio.
//!    Images smaller than their cell scale up by the same rule.
//! 3. The resulting block is centered vertically in the box; each row is
//!    centered horizontally on its own, so a short row floats to the middle
//!    rather than hanging left. Images within a row abut.
//!
//! Coordinates are in points relative to the content box, origin bottom-left
//! (PDF convention). Grid shapes list their rows top-to-bottom as they read in
//! the YAML config, so the first listed row gets the highest y.

use crate::error::Error;

/// One grid shape: rows of slot markers, listed top-to-bottom. Only the marker
/// count per row matters; the marker values come from the YAML `x` strings.
pub type LayoutEntry = Vec<Vec<String>>;

/// Intrinsic pixel dimensions of the source image.
#[derive(Debug, Clone, Copy)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

/// Page area available for image placement, in points: the page size minus
/// margins and the caption's reserved height.
#[derive(Debug, Clone, Copy)]
pub struct ContentBox {
    pub width: f32,
    pub height: f32,
}

/// Where one image instance lands: grid position, rendered size, and origin
/// relative to the content box.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Row index within the grid shape, 0 = first listed (topmost) row.
    pub row: usize,
    /// Column index within the row, left to right.
    pub col: usize,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// Compute a placement for every slot of the grid shape for `image_count`.
///
/// Fails with [`Error::UnsupportedImageCount`] when the count is zero or
/// exceeds the layout table. A count of zero never reaches here in normal
/// operation; pages without an image block skip layout entirely.
pub fn compute_placements(
    image: ImageSize,
    image_count: usize,
    layouts: &[LayoutEntry],
    content: ContentBox,
) -> Result<Vec<Placement>, Error> {
    if image_count == 0 || image_count > layouts.len() {
        return Err(Error::UnsupportedImageCount {
            requested: image_count,
            max: layouts.len(),
        });
    }
    let entry = &layouts[image_count - 1];

    let row_count = entry.len();
    let col_count = entry.iter().map(Vec::len).max().unwrap_or(0);

    // cell grid divides by the longest row; see module docs
    let cell_w = content.width / col_count as f32;
    let cell_h = content.height / row_count as f32;

    let fit_w = image.width / cell_w;
    let fit_h = image.height / cell_h;
    let scale = fit_w.max(fit_h);

    let rendered_w = image.width / scale;
    let rendered_h = image.height / scale;

    let bottom = (content.height - rendered_h * row_count as f32) * 0.5;

    let mut placements = Vec::with_capacity(image_count);
    for (row, slots) in entry.iter().enumerate() {
        let left = (content.width - rendered_w * slots.len() as f32) * 0.5;
        let y = bottom + (row_count - 1 - row) as f32 * rendered_h;
        for col in 0..slots.len() {
            placements.push(Placement {
                row,
                col,
                width: rendered_w,
                height: rendered_h,
                x: left + rendered_w * col as f32,
                y,
            });
        }
    }

    Ok(placements)
}
