//! Placement math for chrome containers

use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// Size request for a chrome container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupSize {
    /// Width and height in cells.
    Fixed(u16, u16),
    /// Percentage of the host area, per axis.
    Percentage(u16, u16),
}

impl Default for PopupSize {
    fn default() -> Self {
        Self::Fixed(48, 12)
    }
}

fn resolve(size: PopupSize, area: Rect) -> (u16, u16) {
    match size {
        PopupSize::Fixed(width, height) => (width.min(area.width), height.min(area.height)),
        PopupSize::Percentage(width_pct, height_pct) => {
            let width = u32::from(area.width) * u32::from(width_pct.min(100)) / 100;
            let height = u32::from(area.height) * u32::from(height_pct.min(100)) / 100;
            (width as u16, height as u16)
        }
    }
}

/// Center a container of `size` in `area`.
pub(crate) fn centered(size: PopupSize, area: Rect) -> Rect {
    let (width, height) = resolve(size, area);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Anchor a full-width strip of `height` cells to the bottom edge of
/// `area`.
pub(crate) fn bottom_anchored(height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + area.height - height,
        width: area.width,
        height,
    }
}

/// Interior of `container` once a full border is accounted for.
pub(crate) fn inset(container: Rect) -> Rect {
    Rect {
        x: container.x + 1,
        y: container.y + 1,
        width: container.width.saturating_sub(2),
        height: container.height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    #[test]
    fn fixed_size_is_centered() {
        let container = centered(PopupSize::Fixed(40, 10), AREA);
        assert_eq!(container, Rect { x: 20, y: 7, width: 40, height: 10 });
    }

    #[test]
    fn fixed_size_is_clamped_to_the_area() {
        let container = centered(PopupSize::Fixed(200, 100), AREA);
        assert_eq!(container.width, 80);
        assert_eq!(container.height, 24);
    }

    #[test]
    fn percentage_size_scales_with_the_area() {
        let container = centered(PopupSize::Percentage(50, 50), AREA);
        assert_eq!((container.width, container.height), (40, 12));
        assert_eq!((container.x, container.y), (20, 6));
    }

    #[test]
    fn bottom_anchor_hugs_the_lower_edge() {
        let container = bottom_anchored(8, AREA);
        assert_eq!(container, Rect { x: 0, y: 16, width: 80, height: 8 });
    }

    #[test]
    fn inset_shrinks_past_the_border() {
        let interior = inset(Rect { x: 20, y: 7, width: 40, height: 10 });
        assert_eq!(interior, Rect { x: 21, y: 8, width: 38, height: 8 });
    }
}
