use super::types::Point;

/// Square tile grid, fixed for the lifetime of a session. Pure queries only.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    pub tile_count: i32,
}

impl Grid {
    pub fn new(tile_count: i32) -> Self {
        Self { tile_count }
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.x < self.tile_count && pos.y >= 0 && pos.y < self.tile_count
    }

    pub fn tile_total(&self) -> usize {
        (self.tile_count * self.tile_count) as usize
    }

    pub fn manhattan(a: Point, b: Point) -> u32 {
        ((a.x - b.x).abs() + (a.y - b.y).abs()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(16);
        assert!(grid.in_bounds(Point::new(0, 0)));
        assert!(grid.in_bounds(Point::new(15, 15)));
        assert!(!grid.in_bounds(Point::new(16, 0)));
        assert!(!grid.in_bounds(Point::new(0, 16)));
        assert!(!grid.in_bounds(Point::new(-1, 5)));
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Grid::manhattan(Point::new(0, 0), Point::new(3, 4)), 7);
        assert_eq!(Grid::manhattan(Point::new(5, 5), Point::new(5, 5)), 0);
        assert_eq!(Grid::manhattan(Point::new(2, 7), Point::new(7, 2)), 10);
    }
}
