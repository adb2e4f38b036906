/// A 2D grid of cells on a bounded plane (no wrapping on either axis).
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
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Whether signed coordinates fall inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bounds-checked read with signed coordinates.
    pub fn try_get(&self, x: i32, y: i32) -> Option<&T> {
        if self.contains(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Bounds-checked write with signed coordinates. Returns false if the
    /// cell lies outside the grid.
    pub fn try_set(&mut self, x: i32, y: i32, value: T) -> bool {
        if self.contains(x, y) {
            self.set(x as usize, y as usize, value);
            true
        } else {
            false
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Get 4-connected neighbors (left, right, down, up) that lie on the grid.
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

    /// Iterate over all cells with their coordinates.
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

    /// Raw row-major cell storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy out a `width` x `height` window starting at (`x0`, `y0`).
    /// Cells outside this map are filled with `T::default()`.
    pub fn window(&self, x0: i32, y0: i32, width: usize, height: usize) -> Tilemap<T>
    where
        T: Default,
    {
        let mut out = Tilemap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if let Some(v) = self.try_get(x0 + x as i32, y0 + y as i32) {
                    out.set(x, y, v.clone());
                }
            }
        }
        out
    }
}

impl Tilemap<f32> {
    /// Smallest and largest value in the map.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for &h in &self.data {
            if h < min_h {
                min_h = h;
            }
            if h > max_h {
                max_h = h;
            }
        }
        (min_h, max_h)
    }

    /// Number of cells strictly above `threshold`.
    pub fn count_above(&self, threshold: f32) -> usize {
        self.data.iter().filter(|&&h| h > threshold).count()
    }

    /// Write every non-zero cell of `patch` into this map with its origin at
    /// (`x0`, `y0`). Zero cells of the patch leave the map untouched.
    pub fn blit_nonzero(&mut self, patch: &Tilemap<f32>, x0: i32, y0: i32) {
        for (x, y, &v) in patch.iter() {
            if v != 0.0 {
                self.try_set(x0 + x as i32, y0 + y as i32, v);
            }
        }
    }
}
