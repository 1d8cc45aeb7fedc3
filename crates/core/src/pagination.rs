//! Vertical tiling of a tall image onto fixed-size pages.

use serde::{Deserialize, Serialize};

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4_LANDSCAPE: PageSize = PageSize {
        width: 297.0,
        height: 210.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4_LANDSCAPE
    }
}

/// Where the scaled image sits on one page. `offset_y` is zero or negative:
/// later pages shift the image up to reveal the next slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePlacement {
    pub offset_y: f64,
    pub image_width: f64,
    pub image_height: f64,
}

/// Scale an `image_width` × `image_height` image to the page width and tile
/// it down as many pages as its height needs. Always yields at least one
/// page for a non-degenerate image.
pub fn paginate(image_width: f64, image_height: f64, page: PageSize) -> Vec<PagePlacement> {
    if !(image_width > 0.0 && image_height > 0.0 && page.height > 0.0) {
        return Vec::new();
    }
    let scaled_height = image_height * page.width / image_width;
    let placement = |offset_y| PagePlacement {
        offset_y,
        image_width: page.width,
        image_height: scaled_height,
    };

    let mut pages = vec![placement(0.0)];
    let mut remaining = scaled_height - page.height;
    while remaining > 0.0 {
        pages.push(placement(remaining - scaled_height));
        remaining -= page.height;
    }
    pages
}
