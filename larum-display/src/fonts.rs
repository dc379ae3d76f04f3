//! Bitmap font candidate ladder
//!
//! Metrics for the fonts compiled into the firmware's display assets,
//! largest first, exactly as the layout engine expects to try them. The
//! indices here are the `font_index` values handed to the backend.

use larum_core::layout::FontMetrics;

/// All candidates, largest first
pub const FONT_CANDIDATES: [FontMetrics; 7] = [
    FontMetrics::new(38, 22),
    FontMetrics::new(32, 18),
    FontMetrics::new(24, 14),
    FontMetrics::new(16, 9),
    FontMetrics::new(12, 7),
    FontMetrics::new(8, 5),
    FontMetrics::new(6, 4),
];

/// The lower end of the ladder, for secondary lines
pub const SMALL_FONTS: [FontMetrics; 4] = [
    FontMetrics::new(16, 9),
    FontMetrics::new(12, 7),
    FontMetrics::new(8, 5),
    FontMetrics::new(6, 4),
];

/// Backend font index of the first entry in [`SMALL_FONTS`]
pub const SMALL_FONTS_BASE_INDEX: usize = 3;
