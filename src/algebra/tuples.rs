/// Odometer over the Cartesian product of `k` axes.
///
/// Yields every tuple `(a_1, ..., a_k)` with `a_i` drawn from axis `i`, the
/// last coordinate varying fastest. The current tuple is lent out rather than
/// allocated, since the oracle walks millions of them.
///
/// An empty axis makes the product empty; zero axes give one empty tuple.
pub struct Tuples<'a, T> {
    axes: Vec<&'a [T]>,
    indices: Vec<usize>,
    current: Vec<T>,
    started: bool,
    exhausted: bool,
}

impl<'a, T: Copy> Tuples<'a, T> {
    pub fn new(axes: Vec<&'a [T]>) -> Self {
        let exhausted = axes.iter().any(|axis| axis.is_empty());
        let current = if exhausted {
            Vec::new()
        } else {
            axes.iter().map(|axis| axis[0]).collect()
        };
        Self {
            indices: vec![0; axes.len()],
            axes,
            current,
            started: false,
            exhausted,
        }
    }

    /// Every axis equal to `axis`: the power `axis^k`.
    pub fn power(axis: &'a [T], k: usize) -> Self {
        Self::new(vec![axis; k])
    }

    pub fn next_tuple(&mut self) -> Option<&[T]> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.current);
        }

        // Advance the odometer from the last coordinate.
        for pos in (0..self.axes.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.axes[pos].len() {
                self.current[pos] = self.axes[pos][self.indices[pos]];
                return Some(&self.current);
            }
            self.indices[pos] = 0;
            self.current[pos] = self.axes[pos][0];
        }

        self.exhausted = true;
        None
    }
}
