/// A 2D grid indexed by (week, day).
///
/// `width` is the number of weeks, `height` the number of days per week.
/// Nothing wraps: a calendar has hard edges on every side.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.in_bounds(x, y), "({}, {}) outside {}x{}", x, y, self.width, self.height);
        y * self.width + x
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Bounds-checked lookup with signed coordinates.
    pub fn try_get(&self, x: i32, y: i32) -> Option<&T> {
        if x < 0 || y < 0 || !self.in_bounds(x as usize, y as usize) {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get 4-connected neighbors (left, right, up, down) that lie inside the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);

        if x > 0 {
            result.push((x - 1, y));
        }
        if x + 1 < self.width {
            result.push((x + 1, y));
        }
        if y > 0 {
            result.push((x, y - 1));
        }
        if y + 1 < self.height {
            result.push((x, y + 1));
        }

        result
    }

    /// Get 8-connected neighbors that lie inside the grid, in [`DIR_OFFSETS`] order.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        DIR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                self.try_get(nx, ny).map(|_| (nx as usize, ny as usize))
            })
            .collect()
    }

    /// Iterate over all cells with their coordinates, row (day) major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

/// Direction offsets for 8-neighbor analysis (dx, dy)
/// Order: N, NE, E, SE, S, SW, W, NW
pub const DIR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

impl Tilemap<u8> {
    /// Neighbourhood richness: mean intensity of the in-grid 8-neighbours,
    /// normalised to [0, 1].
    ///
    /// Edge and corner cells average over the neighbours they actually have,
    /// so a uniformly busy calendar is uniformly rich. A grid with a single
    /// cell has no neighbours and scores 0.
    pub fn richness(&self, x: usize, y: usize) -> f64 {
        let mut sum = 0u32;
        let mut count = 0u32;

        for (nx, ny) in self.neighbors_8(x, y) {
            sum += *self.get(nx, ny) as u32;
            count += 1;
        }

        if count == 0 {
            return 0.0;
        }
        (sum as f64 / count as f64 / 99.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_do_not_wrap() {
        let map: Tilemap<u8> = Tilemap::new(52, 7);
        assert_eq!(map.neighbors(0, 0), vec![(1, 0), (0, 1)]);
        assert_eq!(map.neighbors_8(0, 0).len(), 3);
        assert_eq!(map.neighbors_8(51, 6).len(), 3);
        assert_eq!(map.neighbors_8(10, 3).len(), 8);
        assert_eq!(map.neighbors_8(10, 0).len(), 5);
    }

    #[test]
    fn test_try_get_rejects_out_of_range() {
        let map = Tilemap::new_with(3, 2, 7u8);
        assert_eq!(map.try_get(-1, 0), None);
        assert_eq!(map.try_get(3, 0), None);
        assert_eq!(map.try_get(2, 1), Some(&7));
    }

    #[test]
    fn test_richness_uniform_grid_is_full_everywhere() {
        let map = Tilemap::new_with(52, 7, 99u8);
        for (x, y, _) in map.iter() {
            assert!((map.richness(x, y) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_richness_ignores_center_cell() {
        let mut map = Tilemap::new_with(3, 3, 0u8);
        map.set(1, 1, 99);
        assert_eq!(map.richness(1, 1), 0.0);
        // Corner (0,0) has 3 neighbours, one of which is 99.
        assert!((map.richness(0, 0) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_cell_has_no_richness() {
        let map = Tilemap::new_with(1, 1, 99u8);
        assert_eq!(map.richness(0, 0), 0.0);
    }
}
