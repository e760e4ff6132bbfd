//! Uniform collision grid - broad phase
//!
//! One cell per world unit. Cells are stored as a structure of arrays:
//! a flat slot buffer of `cells * capacity` body indices and a count per
//! cell, addressed by the linear index `x * height + y`. Clearing only resets
//! the counts, the slot buffer is reused across sub-steps.
//!
//! Inserts outside the grid or into a full cell are dropped and counted.

/// Fixed-capacity uniform grid of body indices
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    capacity: u32,
    /// `width * height * capacity` body slots
    slots: Vec<u32>,
    /// Used slots per cell
    counts: Vec<u32>,
    /// Inserts dropped since the last `clear`
    dropped: u32,
}

impl CollisionGrid {
    pub fn new(width: u32, height: u32, capacity: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            capacity,
            slots: vec![0; cells * capacity as usize],
            counts: vec![0; cells],
            dropped: 0,
        }
    }

    // === Dimensions ===
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    // === Index conversion ===
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let h = self.height as usize;
        ((index / h) as u32, (index % h) as u32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.dropped = 0;
    }

    /// Append `body` to cell `(x, y)`. Returns false if the insert was dropped.
    pub fn insert(&mut self, x: i32, y: i32, body: u32) -> bool {
        if !self.in_bounds(x, y) {
            self.dropped += 1;
            return false;
        }
        let cell = self.index(x as u32, y as u32);
        let count = self.counts[cell];
        if count >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.slots[cell * self.capacity as usize + count as usize] = body;
        self.counts[cell] = count + 1;
        true
    }

    /// Body indices stored in a cell, in insertion order
    #[inline]
    pub fn cell(&self, index: usize) -> &[u32] {
        let start = index * self.capacity as usize;
        &self.slots[start..start + self.counts[index] as usize]
    }

    pub fn cell_at(&self, x: u32, y: u32) -> &[u32] {
        self.cell(self.index(x, y))
    }

    /// Inserts dropped since the last `clear`
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Linear indices of the 3x3 block around `index`, clipped to the grid
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = self.coords(index);
        let (x, y) = (x as i32, y as i32);
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter_map(move |dy| {
                let (nx, ny) = (x + dx, y + dy);
                self.in_bounds(nx, ny).then(|| self.index(nx as u32, ny as u32))
            })
        })
    }
}
