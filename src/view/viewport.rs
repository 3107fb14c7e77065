//! Scroll position over the rendered document

/// Horizontal and vertical scroll offsets, clamped against the rendered
/// line count and the number of rows available for content.
///
/// Vertically the offset stays within `0..=line_count - height + 1`, so at
/// the bottom one blank row follows the last line. Horizontally there is
/// only a floor; rendered tables and code blocks may be arbitrarily wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    x_offset: usize,
    y_offset: usize,
    width: usize,
    height: usize,
    line_count: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn x_offset(&self) -> usize {
        self.x_offset
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[allow(dead_code)]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Largest valid vertical offset
    pub fn max_y_offset(&self) -> usize {
        (self.line_count + 1).saturating_sub(self.height)
    }

    #[allow(dead_code)]
    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    #[allow(dead_code)]
    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
        self.clamp();
    }

    /// Move by `dy` lines and `dx` columns; negative values move up / left
    pub fn scroll_by(&mut self, dy: isize, dx: isize) {
        self.y_offset = offset_by(self.y_offset, dy);
        self.x_offset = offset_by(self.x_offset, dx);
        self.clamp();
    }

    /// Half a screen up, so some context stays visible across the jump
    pub fn page_up(&mut self) {
        self.scroll_by(-self.half_page(), 0);
    }

    /// Half a screen down
    pub fn page_down(&mut self) {
        self.scroll_by(self.half_page(), 0);
    }

    pub fn go_to_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Scroll so `line` sits in the middle of the screen, as far as the
    /// clamp allows.
    pub fn center_on(&mut self, line: usize) {
        self.y_offset = line.saturating_sub(self.height / 2).min(self.max_y_offset());
    }

    fn half_page(&self) -> isize {
        isize::try_from(self.height / 2).unwrap_or(isize::MAX)
    }

    fn clamp(&mut self) {
        self.y_offset = self.y_offset.min(self.max_y_offset());
    }
}

fn offset_by(offset: usize, delta: isize) -> usize {
    if delta < 0 {
        offset.saturating_sub(delta.unsigned_abs())
    } else {
        offset.saturating_add(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(lines: usize, height: usize) -> Viewport {
        let mut viewport = Viewport::new(80, height);
        viewport.set_line_count(lines);
        viewport
    }

    #[test]
    fn test_bottom_clamp_holds_under_overshoot() {
        for (lines, height) in [(100, 20), (5, 20), (0, 10), (20, 20), (21, 20), (3, 0)] {
            let mut vp = viewport(lines, height);
            vp.go_to_bottom();
            vp.scroll_by(1000, 0);
            assert_eq!(vp.y_offset(), (lines + 1).saturating_sub(height));
            assert!(vp.at_bottom());
        }
    }

    #[test]
    fn test_scroll_up_stops_at_top() {
        let mut vp = viewport(100, 20);
        vp.scroll_by(3, 0);
        vp.scroll_by(-10, 0);
        assert_eq!(vp.y_offset(), 0);
        assert!(vp.at_top());
    }

    #[test]
    fn test_page_moves_half_screen() {
        let mut vp = viewport(100, 21);
        vp.page_down();
        assert_eq!(vp.y_offset(), 10);
        vp.page_down();
        assert_eq!(vp.y_offset(), 20);
        vp.page_up();
        assert_eq!(vp.y_offset(), 10);
        vp.page_up();
        vp.page_up();
        assert_eq!(vp.y_offset(), 0);
    }

    #[test]
    fn test_horizontal_has_floor_only() {
        let mut vp = viewport(10, 5);
        vp.scroll_by(0, -4);
        assert_eq!(vp.x_offset(), 0);
        vp.scroll_by(0, 500);
        assert_eq!(vp.x_offset(), 500);
    }

    #[test]
    fn test_center_on() {
        let mut vp = viewport(100, 20);
        vp.center_on(3);
        assert_eq!(vp.y_offset(), 0);
        vp.center_on(50);
        assert_eq!(vp.y_offset(), 40);
        vp.center_on(99);
        assert_eq!(vp.y_offset(), 81);

        let mut short = viewport(4, 20);
        short.center_on(3);
        assert_eq!(short.y_offset(), 0);
    }

    #[test]
    fn test_shrinking_content_reclamps() {
        let mut vp = viewport(100, 20);
        vp.go_to_bottom();
        vp.set_line_count(30);
        assert_eq!(vp.y_offset(), 11);
        vp.set_size(80, 40);
        assert_eq!(vp.y_offset(), 0);
    }
}
