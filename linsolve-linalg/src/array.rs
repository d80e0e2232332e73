//! N-dimensional array over a flat row-major buffer.

use crate::error::LinalgError;

/// A zero-initialised array of arbitrary rank.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NdArray {
    /// Zero-filled array with the given extents.
    pub fn new(shape: &[usize]) -> Self {
        let size = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; size],
        }
    }

    /// Extent of each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when some axis has extent zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`; fails on a rank mismatch or an index past its extent.
    pub fn get(&self, index: &[usize]) -> Result<f64, LinalgError> {
        let offset = self.flat_index(index)?;
        Ok(self.data[offset])
    }

    /// Write `value` at `index`; nothing is written on error.
    pub fn set(&mut self, index: &[usize], value: f64) -> Result<(), LinalgError> {
        let offset = self.flat_index(index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Row-major offset: `((i0 * d1 + i1) * d2 + i2) ...`.
    pub fn flat_index(&self, index: &[usize]) -> Result<usize, LinalgError> {
        LinalgError::check_dim(self.shape.len(), index.len())?;
        let mut offset = 0;
        for (&i, &extent) in index.iter().zip(&self.shape) {
            LinalgError::check_index(i, extent)?;
            offset = offset * extent + i;
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut array = NdArray::new(&[3, 3, 3]);
        assert_eq!(array.len(), 27);
        assert_eq!(array.rank(), 3);

        array.set(&[1, 1, 1], 5.0).unwrap();
        assert_eq!(array.get(&[1, 1, 1]).unwrap(), 5.0);
        assert_eq!(array.get(&[0, 0, 0]).unwrap(), 0.0);

        assert_eq!(
            array.set(&[3, 3, 3], 10.0),
            Err(LinalgError::IndexOutOfBounds {
                index: 3,
                extent: 3
            })
        );
    }

    #[test]
    fn test_flat_index() {
        let array = NdArray::new(&[2, 3]);
        assert_eq!(array.flat_index(&[1, 2]).unwrap(), 5);
        assert_eq!(array.flat_index(&[0, 0]).unwrap(), 0);
        assert!(array.flat_index(&[2, 3]).is_err());
        assert!(array.flat_index(&[1, 3]).is_err());
    }

    #[test]
    fn test_rank_mismatch() {
        let array = NdArray::new(&[2, 3]);
        assert_eq!(
            array.get(&[1]),
            Err(LinalgError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
        assert!(array.get(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_scalar_array() {
        let mut array = NdArray::new(&[]);
        assert_eq!(array.len(), 1);
        array.set(&[], 2.5).unwrap();
        assert_eq!(array.get(&[]).unwrap(), 2.5);
    }
}
