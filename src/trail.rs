use crate::geometry::Point;

/// The last `N` positions of an entity, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail<const N: usize> {
    points: [Point; N],
}

impl<const N: usize> Trail<N> {
    pub fn filled(at: Point) -> Self {
        const { assert!(N > 0, "a trail needs at least one point") };
        Self { points: [at; N] }
    }

    /// Drops the oldest point and records `at` as the newest.
    pub fn push_newest(&mut self, at: Point) {
        self.points.rotate_right(1);
        self.points[0] = at;
    }

    pub fn newest(&self) -> Point {
        self.points[0]
    }

    pub fn oldest(&self) -> Point {
        self.points[N - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
