#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle for layout bounds, clipping, and hit testing.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by `margin` cells on every side.
    #[must_use]
    pub fn inner(&self, margin: u16) -> Rect {
        let double = margin.saturating_mul(2);
        if self.width <= double || self.height <= double {
            return Rect::new(self.x.saturating_add(margin), self.y.saturating_add(margin), 0, 0);
        }
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - double,
            self.height - double,
        )
    }

    /// Split off the top `rows` rows, returning `(top, rest)`.
    #[must_use]
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, rows),
            Rect::new(self.x, self.y + rows, self.width, self.height - rows),
        )
    }

    /// Split off the bottom `rows` rows, returning `(rest, bottom)`.
    #[must_use]
    pub fn split_bottom(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        let rest = self.height - rows;
        (
            Rect::new(self.x, self.y, self.width, rest),
            Rect::new(self.x, self.y + rest, self.width, rows),
        )
    }

    /// Divide horizontally into `count` columns separated by `gap` cells.
    ///
    /// Leftover width goes to the leftmost columns, one cell each.
    pub fn columns(&self, count: usize, gap: u16) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let gaps = gap as usize * (count - 1);
        let usable = (self.width as usize).saturating_sub(gaps);
        let base = usable / count;
        let extra = usable % count;
        let mut x = self.x as usize;
        let mut out = Vec::with_capacity(count);
        for idx in 0..count {
            let w = base + usize::from(idx < extra);
            out.push(Rect::new(x as u16, self.y, w as u16, self.height));
            x += w + gap as usize;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(5, 5));
    }

    #[test]
    fn intersection_disjoint_is_empty() {
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(5, 5, 2, 2);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection(&Rect::new(1, 1, 5, 5)), Rect::new(1, 1, 2, 2));
    }

    #[test]
    fn inner_collapses_when_too_small() {
        assert!(Rect::new(0, 0, 2, 10).inner(1).is_empty());
        assert_eq!(Rect::new(0, 0, 10, 6).inner(1), Rect::new(1, 1, 8, 4));
    }

    #[test]
    fn split_top_and_bottom() {
        let r = Rect::new(0, 0, 10, 10);
        let (top, rest) = r.split_top(3);
        assert_eq!(top, Rect::new(0, 0, 10, 3));
        assert_eq!(rest, Rect::new(0, 3, 10, 7));
        let (rest, bottom) = r.split_bottom(20);
        assert!(rest.is_empty());
        assert_eq!(bottom, r);
    }

    #[test]
    fn columns_cover_width_with_gaps() {
        let cols = Rect::new(0, 0, 32, 5).columns(3, 1);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], Rect::new(0, 0, 10, 5));
        assert_eq!(cols[1].x, 11);
        assert_eq!(cols[2].right(), 32);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn columns_are_ordered_and_inside(
                x in 0u16..1000,
                width in 0u16..400,
                count in 1usize..12,
                gap in 0u16..3,
            ) {
                let area = Rect::new(x, 0, width, 4);
                let cols = area.columns(count, gap);
                prop_assert_eq!(cols.len(), count);
                let gaps = gap as usize * (count - 1);
                prop_assume!(width as usize >= gaps);
                let used: usize = cols.iter().map(|c| c.width as usize).sum();
                prop_assert_eq!(used + gaps, width as usize);
                for pair in cols.windows(2) {
                    prop_assert_eq!(pair[0].right() + gap, pair[1].x);
                }
                prop_assert!(cols.iter().all(|c| c.right() <= area.right()));
            }
        }
    }
}
