//! Row-major 2D raster container
//!
//! Every landscape layer and every derived output (behavior results, spread
//! vectors, arrival times) is stored as a `FieldData<T>`: a flat `Vec<T>` in
//! row-major order (`y * width + x`), with `x` the column and `y` the row
//! counted from the top (north) edge.

use rayon::prelude::*;

/// 2D field stored as a flat row-major vector
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> FieldData<T> {
    /// Create a field with every cell set to `value`
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> FieldData<T> {
    /// Wrap an existing row-major vector. Returns `None` if the length does
    /// not match `width * height`.
    #[must_use]
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            data,
            width,
            height,
        })
    }

    /// Build a field by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Flat index of (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// (x, y) of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> &T {
        assert!(self.contains(x, y), "Coordinates out of bounds");
        &self.data[y * self.width + x]
    }

    /// Get value at grid position, `None` when out of bounds
    pub fn get_checked(&self, x: usize, y: usize) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        assert!(self.contains(x, y), "Coordinates out of bounds");
        self.data[y * self.width + x] = value;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Map every cell into a new field of the same shape
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> FieldData<U> {
        FieldData {
            data: self.data.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Sync> FieldData<T> {
    /// Map rows in parallel, stopping on error. Output order matches input
    /// order, so the result is identical to a sequential map.
    ///
    /// # Errors
    /// The error of a failing row; with several, which one is unspecified
    pub fn try_par_map_rows<U: Send, E: Send>(
        &self,
        f: impl Fn(usize, &[T]) -> Result<Vec<U>, E> + Sync,
    ) -> Result<FieldData<U>, E> {
        if self.width == 0 {
            return Ok(FieldData {
                data: Vec::new(),
                width: 0,
                height: self.height,
            });
        }
        let rows = self
            .data
            .par_chunks(self.width)
            .enumerate()
            .map(|(y, row)| f(y, row))
            .collect::<Result<Vec<Vec<U>>, E>>()?;
        Ok(FieldData {
            data: rows.into_iter().flatten().collect(),
            width: self.width,
            height: self.height,
        })
    }
}

impl<'a, T> IntoIterator for &'a FieldData<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
