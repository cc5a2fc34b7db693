//! Dense agent-relative observation tensor.

/// Three-dimensional `[rows][cols][channels]` observation.
///
/// Values are stored row-major with the channel index varying fastest, which
/// matches the nested array layout sent to clients and policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    rows: usize,
    cols: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Observation {
    /// Create an all-zero observation of the given shape.
    pub fn zeros(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
            data: vec![0; rows * cols * channels],
        }
    }

    /// Shape as `[rows, cols, channels]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.rows, self.cols, self.channels]
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, channel: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols && channel < self.channels,
            "observation index ({row}, {col}, {channel}) out of bounds for shape {:?}",
            self.shape()
        );
        (row * self.cols + col) * self.channels + channel
    }

    /// Read one value.
    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.data[self.offset(row, col, channel)]
    }

    /// Write one value.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let idx = self.offset(row, col, channel);
        self.data[idx] = value;
    }

    /// Set every cell of one channel to `value`.
    pub fn fill_channel(&mut self, channel: usize, value: u8) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.set(row, col, channel, value);
            }
        }
    }

    /// Flat view of the underlying values.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Nested `[rows][cols][channels]` copy, the shape sent over the wire.
    pub fn to_nested(&self) -> Vec<Vec<Vec<u8>>> {
        self.data
            .chunks(self.cols * self.channels)
            .map(|row| row.chunks(self.channels).map(|cell| cell.to_vec()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let obs = Observation::zeros(6, 7, 2);
        assert_eq!(obs.shape(), [6, 7, 2]);
        assert_eq!(obs.as_slice().len(), 84);
        assert!(obs.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_set_and_get_are_channel_fastest() {
        let mut obs = Observation::zeros(2, 3, 2);
        obs.set(1, 2, 1, 1);
        assert_eq!(obs.get(1, 2, 1), 1);
        assert_eq!(obs.as_slice()[(1 * 3 + 2) * 2 + 1], 1);
    }

    #[test]
    fn test_nested_layout() {
        let mut obs = Observation::zeros(2, 2, 2);
        obs.set(0, 1, 0, 1);
        obs.set(1, 0, 1, 1);
        let nested = obs.to_nested();
        assert_eq!(nested, vec![vec![vec![0, 0], vec![1, 0]], vec![vec![0, 1], vec![0, 0]]]);
    }

    #[test]
    fn test_fill_channel() {
        let mut obs = Observation::zeros(8, 8, 3);
        obs.fill_channel(2, 1);
        assert_eq!(obs.as_slice().iter().filter(|&&v| v == 1).count(), 64);
        assert_eq!(obs.get(7, 7, 2), 1);
        assert_eq!(obs.get(7, 7, 1), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let obs = Observation::zeros(3, 3, 2);
        obs.get(3, 0, 0);
    }
}
