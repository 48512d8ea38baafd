use tiny_skia::Rect;

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn to_rect(&self) -> Option<Rect> {
        Rect::from_xywh(self.x, self.y, self.w, self.h)
    }

    /// Left part of the box covering `fraction` of its width.
    pub fn filled(&self, fraction: f32) -> Bounds {
        Bounds {
            w: self.w * fraction.clamp(0.0, 1.0),
            ..*self
        }
    }
}

/// Where each element of the task screen goes for a given canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub center: (f32, f32),
    pub progress_bar: Bounds,
    pub progress_label: (f32, f32),
    pub percent_label: (f32, f32),
    pub prompt: (f32, f32),
    pub stimulus: (f32, f32),
    pub word_button: Bounds,
    pub nonword_button: Bounds,
}

const MARGIN: f32 = 48.0;
const BUTTON_GAP: f32 = 32.0;
const BUTTON_HEIGHT: f32 = 96.0;
const MAX_BUTTON_WIDTH: f32 = 360.0;

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let center = (w * 0.5, h * 0.5);

        let bar_w = (w - 2.0 * MARGIN).max(1.0);
        let progress_bar = Bounds {
            x: MARGIN,
            y: MARGIN + 36.0,
            w: bar_w,
            h: 8.0,
        };

        let button_w = ((w - 2.0 * MARGIN - BUTTON_GAP) * 0.5).clamp(1.0, MAX_BUTTON_WIDTH);
        let button_y = (center.1 + 120.0).min(h - MARGIN - BUTTON_HEIGHT);
        let word_button = Bounds {
            x: center.0 - BUTTON_GAP * 0.5 - button_w,
            y: button_y,
            w: button_w,
            h: BUTTON_HEIGHT,
        };
        let nonword_button = Bounds {
            x: center.0 + BUTTON_GAP * 0.5,
            ..word_button
        };

        Self {
            width,
            height,
            center,
            progress_bar,
            progress_label: (MARGIN + 80.0, MARGIN + 12.0),
            percent_label: (w - MARGIN - 30.0, MARGIN + 12.0),
            prompt: (center.0, center.1 - 140.0),
            stimulus: (center.0, center.1 - 20.0),
            word_button,
            nonword_button,
        }
    }

    /// The answer whose button covers the point, if any.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<bool> {
        if self.word_button.contains(x, y) {
            Some(true)
        } else if self.nonword_button.contains(x, y) {
            Some(false)
        } else {
            None
        }
    }

    /// Vertical position of the `line`th row of a centered text block.
    pub fn line(&self, line: usize, spacing: f32, top: f32) -> (f32, f32) {
        (self.center.0, top + spacing * line as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_sit_side_by_side_below_center() {
        let l = Layout::new(1280, 720);
        assert!(l.word_button.x + l.word_button.w < l.nonword_button.x);
        assert_eq!(l.word_button.y, l.nonword_button.y);
        assert!(l.word_button.y > l.stimulus.1);
        assert!(l.word_button.y + l.word_button.h <= 720.0);
        assert_eq!(l.word_button.w, MAX_BUTTON_WIDTH);
    }

    #[test]
    fn hit_test_maps_buttons_to_answers() {
        let l = Layout::new(1280, 720);
        let (wx, wy) = l.word_button.center();
        let (nx, ny) = l.nonword_button.center();
        assert_eq!(l.hit_test(wx, wy), Some(true));
        assert_eq!(l.hit_test(nx, ny), Some(false));
        assert_eq!(l.hit_test(l.center.0, l.center.1), None);
        assert_eq!(l.hit_test(0.0, 0.0), None);
    }

    #[test]
    fn gap_between_buttons_is_dead_space() {
        let l = Layout::new(1280, 720);
        let y = l.word_button.center().1;
        assert_eq!(l.hit_test(l.center.0, y), None);
    }

    #[test]
    fn narrow_canvas_shrinks_buttons() {
        let l = Layout::new(400, 300);
        assert!(l.word_button.w < MAX_BUTTON_WIDTH);
        assert!(l.word_button.x >= 0.0);
        assert!(l.nonword_button.x + l.nonword_button.w <= 400.0);
    }

    #[test]
    fn filled_fraction_is_clamped() {
        let b = Bounds {
            x: 10.0,
            y: 0.0,
            w: 200.0,
            h: 8.0,
        };
        assert_eq!(b.filled(0.25).w, 50.0);
        assert_eq!(b.filled(2.0).w, 200.0);
        assert_eq!(b.filled(-1.0).w, 0.0);
    }
}
