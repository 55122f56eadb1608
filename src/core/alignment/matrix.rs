//! Flat row-major 2-D buffers for the alignment kernels.
//!
//! The distance matrix and the path-length matrix share this layout:
//! one `Vec` of `rows * cols` cells, `(i, j)` at `i * cols + j`.

/// Element type of distance, cumulative-cost and path-length matrices.
///
/// Raw distances are in `[0, SYMBOL_BITS]`; the DTW relaxation accumulates
/// them in place, so the width must hold the largest path cost. See
/// [`crate::core::alignment::dtw::max_safe_penalty`].
pub type Cost = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Pairwise distances; overwritten with cumulative costs by the aligner.
pub type DistanceMatrix = Matrix<Cost>;

/// Number of alignment moves taken to reach each cell.
pub type PathLengthMatrix = Matrix<Cost>;

impl<T: Copy + Default> Matrix<T> {
    /// Zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Build from row-major data. Returns `None` if the length disagrees.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    /// Build from nested rows, all of which must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Change shape, keeping the allocation when it is large enough.
    /// All cells are reset to `T::default()`.
    pub fn reshape(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(rows * cols, T::default());
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Matrix<T> {
    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Allocated capacity in cells (for reuse checks).
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
}
