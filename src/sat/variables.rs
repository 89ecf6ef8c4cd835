//! Variable encoding for the Sudoku SAT theory

/// The proposition "cell (row, col) holds digit"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellDigit {
    pub row: usize,
    pub col: usize,
    pub digit: usize,
}

/// Bijection between (row, col, digit) triples and SAT variable ids
///
/// `id(r, c, d) = N²·r + N·c + d` with zero-based `r`, `c` and `d` in `1..=N`,
/// so the ids cover exactly `1..=N³` and decoding is pure arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableEncoder {
    size: usize,
}

impl VariableEncoder {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Variable id for the given cell and digit
    #[inline]
    pub fn encode(&self, row: usize, col: usize, digit: usize) -> i32 {
        debug_assert!(row < self.size && col < self.size);
        debug_assert!((1..=self.size).contains(&digit));
        (self.size * self.size * row + self.size * col + digit) as i32
    }

    /// Inverse of [`encode`](Self::encode); `None` for ids outside `1..=N³`
    pub fn decode(&self, id: i32) -> Option<CellDigit> {
        if id < 1 || id as usize > self.variable_count() {
            return None;
        }
        let offset = id as usize - 1;
        Some(CellDigit {
            row: offset / (self.size * self.size),
            col: (offset / self.size) % self.size,
            digit: offset % self.size + 1,
        })
    }

    /// Number of variables in the theory, the highest id in use
    pub fn variable_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// The N variables of one cell, digits ascending
    pub fn cell_variables(&self, row: usize, col: usize) -> impl Iterator<Item = i32> + '_ {
        (1..=self.size).map(move |digit| self.encode(row, col, digit))
    }
}
