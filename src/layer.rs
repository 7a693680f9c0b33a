//! Growable grid of canonical tile IDs for one map level.

/// Dense `width` x `height` grid of canonical tile IDs.
///
/// Writing outside the current bounds grows the grid to include the
/// coordinate. Growth never shrinks the grid or moves existing cells, and
/// new cells hold ID 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    width: usize,
    height: usize,
    rows: Vec<Vec<usize>>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer pre-sized to `width` x `height`, every cell ID 0.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self { width, height, rows: vec![vec![0; width]; height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Store `tile_id` at `(x, y)`, growing the grid if needed.
    pub fn set(&mut self, x: usize, y: usize, tile_id: usize) {
        self.grow_to(x + 1, y + 1);
        self.rows[y][x] = tile_id;
    }

    /// Tile ID at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Grow to at least `width` x `height`.
    pub fn grow_to(&mut self, width: usize, height: usize) {
        if width > self.width {
            self.width = width;
            for row in &mut self.rows {
                row.resize(width, 0);
            }
        }
        if height > self.height {
            self.rows.resize_with(height, || vec![0; self.width]);
            self.height = height;
        }
    }
}
