use alloc::string::String;

use embedded_graphics::prelude::{Point, Size};

/// Touch target mapping a screen rectangle to a logical key.
///
/// Edges are inclusive. Regions may overlap; [`hit_test`] picks the first
/// one in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub key: String,
}

impl Region {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32, key: impl Into<String>) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            key: key.into(),
        }
    }

    pub fn from_size(top_left: Point, size: Size, key: impl Into<String>) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            top_left.x + size.width as i32 - 1,
            top_left.y + size.height as i32 - 1,
            key,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

pub fn hit_test(regions: &[Region], x: i32, y: i32) -> Option<&Region> {
    regions.iter().find(|region| region.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn edges_are_inclusive() {
        let region = Region::new(10, 10, 20, 20, "a");
        assert!(region.contains(10, 10));
        assert!(region.contains(20, 20));
        assert!(!region.contains(21, 15));
        assert!(!region.contains(15, 9));
    }

    #[test]
    fn first_overlapping_region_wins() {
        let regions = vec![
            Region::new(0, 0, 50, 50, "first"),
            Region::new(25, 25, 75, 75, "second"),
        ];
        assert_eq!(hit_test(&regions, 30, 30).map(|r| r.key.as_str()), Some("first"));
        assert_eq!(hit_test(&regions, 60, 60).map(|r| r.key.as_str()), Some("second"));
        assert!(hit_test(&regions, 90, 90).is_none());
    }

    #[test]
    fn from_size_spans_size_pixels() {
        let region = Region::from_size(Point::new(4, 6), Size::new(10, 2), "k");
        assert_eq!((region.right, region.bottom), (13, 7));
        assert_eq!(region.center(), Point::new(8, 6));
    }
}
