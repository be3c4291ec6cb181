//! Pixel geometry exchanged with the rendering layer.

use serde::{Deserialize, Serialize};

/// A positioned rectangle for one rendered segment of an item, plus the
/// four continuation-anchor flags.
///
/// An anchor flag is true when the rendered edge on that side coincides
/// with the item's true start/end. A cleared flag means the segment was
/// truncated at a grid-cell or window boundary and the renderer should
/// show a "continues beyond this cell" affordance instead of a hard
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each edge carries an independent truncation flag"
)]
pub struct MappedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub show_left_anchor: bool,
    pub show_right_anchor: bool,
    pub show_top_anchor: bool,
    pub show_bottom_anchor: bool,
}

impl MappedRect {
    /// A rect anchored on all four sides, i.e. nothing truncated.
    #[must_use]
    pub const fn anchored(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            show_left_anchor: true,
            show_right_anchor: true,
            show_top_anchor: true,
            show_bottom_anchor: true,
        }
    }
}

/// Pre-measured pixel dimensions of the active grid's container,
/// supplied by the embedding UI. This core never measures the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}
