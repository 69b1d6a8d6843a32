//! Axis-aligned rectangles with anchor-based positioning.
//!
//! A [`Region`] is a plain `{x, y, width, height}` record. Its anchor points (corners, center,
//! edges) are derived from those four fields, and moving an anchor only ever changes `x`/`y`.

use crate::error::Error;

/// An axis-aligned rectangle.
///
/// `width` and `height` are expected to be non-negative, but nothing enforces it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `(x, y, width, height)`.
    pub fn to_tuple(&self) -> (i64, i64, i64, i64) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn top_left(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    pub fn set_top_left(&mut self, (x, y): (i64, i64)) {
        self.x = x;
        self.y = y;
    }

    pub fn top_right(&self) -> (i64, i64) {
        (self.x + self.width, self.y)
    }

    pub fn set_top_right(&mut self, (x, y): (i64, i64)) {
        self.x = x - self.width;
        self.y = y;
    }

    pub fn bottom_left(&self) -> (i64, i64) {
        (self.x, self.y + self.height)
    }

    pub fn set_bottom_left(&mut self, (x, y): (i64, i64)) {
        self.x = x;
        self.y = y - self.height;
    }

    pub fn bottom_right(&self) -> (i64, i64) {
        (self.x + self.width, self.y + self.height)
    }

    pub fn set_bottom_right(&mut self, (x, y): (i64, i64)) {
        self.x = x - self.width;
        self.y = y - self.height;
    }

    /// The center, rounded towards the top-left for odd sizes.
    pub fn center(&self) -> (i64, i64) {
        (
            self.x + self.width.div_euclid(2),
            self.y + self.height.div_euclid(2),
        )
    }

    pub fn set_center(&mut self, (x, y): (i64, i64)) {
        self.x = x - self.width.div_euclid(2);
        self.y = y - self.height.div_euclid(2);
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Moves the region so that `anchor` lands on its position.
    pub fn apply_anchor(&mut self, anchor: Anchor) {
        match anchor {
            Anchor::Center(p) => self.set_center(p),
            Anchor::TopLeft(p) => self.set_top_left(p),
            Anchor::TopRight(p) => self.set_top_right(p),
            Anchor::BottomLeft(p) => self.set_bottom_left(p),
            Anchor::BottomRight(p) => self.set_bottom_right(p),
            Anchor::Left(x) => self.x = x,
            Anchor::Right(x) => self.x = x - self.width,
            Anchor::Top(y) => self.y = y,
            Anchor::Bottom(y) => self.y = y - self.height,
        }
    }

    /// Returns whether the two regions overlap. Touching edges do not count.
    pub fn collide_region(&self, other: &Region) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Returns whether `(x, y)` lies inside the region (half-open on the right and bottom).
    pub fn collide_point(&self, (x, y): (i64, i64)) -> bool {
        self.x <= x && x < self.x + self.width && self.y <= y && y < self.y + self.height
    }

    /// Returns whether any of the points lies inside the region.
    pub fn collide_points(&self, points: impl IntoIterator<Item = (i64, i64)>) -> bool {
        points.into_iter().any(|p| self.collide_point(p))
    }
}

/// A positioning constraint for a [`Region`] of known size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Center((i64, i64)),
    TopLeft((i64, i64)),
    TopRight((i64, i64)),
    BottomLeft((i64, i64)),
    BottomRight((i64, i64)),
    Left(i64),
    Right(i64),
    Top(i64),
    Bottom(i64),
}

impl Anchor {
    /// Builds an anchor from its key name, as used by string-keyed callers.
    ///
    /// Point anchors use both coordinates of `value`; `left`/`right` use `value.0` and
    /// `top`/`bottom` use `value.1`. Any other key is a programming error and is reported as
    /// [`Error::InvalidAnchor`].
    pub fn from_key(key: &str, value: (i64, i64)) -> Result<Self, Error> {
        Ok(match key {
            "center" => Anchor::Center(value),
            "topleft" => Anchor::TopLeft(value),
            "topright" => Anchor::TopRight(value),
            "bottomleft" => Anchor::BottomLeft(value),
            "bottomright" => Anchor::BottomRight(value),
            "left" => Anchor::Left(value.0),
            "right" => Anchor::Right(value.0),
            "top" => Anchor::Top(value.1),
            "bottom" => Anchor::Bottom(value.1),
            _ => return Err(Error::InvalidAnchor(key.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_setters_preserve_size() {
        let mut r = Region::new(0, 0, 10, 4);
        r.set_bottom_right((20, 20));
        assert_eq!(r.to_tuple(), (10, 16, 10, 4));
        r.set_center((5, 5));
        assert_eq!(r.to_tuple(), (0, 3, 10, 4));
        assert_eq!(r.center(), (5, 5));
        r.set_bottom_left((1, 9));
        assert_eq!(r.bottom_left(), (1, 9));
        r.set_top_right((11, 0));
        assert_eq!(r.top_right(), (11, 0));
        assert_eq!((r.width, r.height), (10, 4));
    }

    #[test]
    fn test_collisions() {
        let a = Region::new(0, 0, 4, 4);
        assert!(a.collide_region(&Region::new(3, 3, 2, 2)));
        assert!(!a.collide_region(&Region::new(4, 0, 2, 2)));
        assert!(a.collide_point((0, 0)));
        assert!(!a.collide_point((4, 3)));
        assert!(a.collide_points([(9, 9), (3, 3)]));
    }

    #[test]
    fn test_invalid_anchor_key_fails_loudly() {
        assert!(matches!(
            Anchor::from_key("middle", (0, 0)),
            Err(Error::InvalidAnchor(key)) if key == "middle"
        ));
        assert_eq!(Anchor::from_key("top", (3, 7)).unwrap(), Anchor::Top(7));
    }
}
