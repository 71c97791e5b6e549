//! Sparse n-dimensional funge-space.
//!
//! Cells are stored in a hash map keyed by [`Vector`]; blank cells are never
//! stored. Each axis keeps an occupancy histogram (coordinate -> live cell
//! count) so that the bounding box is available in O(1) and only needs a
//! rescan when the cell defining an extreme is removed.

use hashbrown::HashMap;

use crate::error::{SpaceError, SpaceResult};
use crate::{Value, Vector, BLANK};

/// Occupancy bookkeeping for one axis.
#[derive(Debug, Clone, Default)]
struct Axis {
    counts: HashMap<Value, usize>,
    /// `None` when no cell is live.
    extent: Option<(Value, Value)>,
}

impl Axis {
    fn add(&mut self, c: Value) {
        *self.counts.entry(c).or_insert(0) += 1;
        self.extent = Some(match self.extent {
            Some((lo, hi)) => (lo.min(c), hi.max(c)),
            None => (c, c),
        });
    }

    fn remove(&mut self, c: Value) {
        let Some(count) = self.counts.get_mut(&c) else {
            return;
        };
        *count -= 1;
        if *count > 0 {
            return;
        }
        self.counts.remove(&c);
        if let Some((lo, hi)) = self.extent {
            if c == lo || c == hi {
                self.rescan();
            }
        }
    }

    fn rescan(&mut self) {
        let mut keys = self.counts.keys().copied();
        self.extent = keys.next().map(|first| {
            keys.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)))
        });
    }
}

/// Sparse funge-space of a fixed dimensionality.
#[derive(Debug, Clone)]
pub struct Space {
    dimensions: usize,
    cells: HashMap<Vector, Value>,
    axes: Vec<Axis>,
}

impl Space {
    /// Creates an empty space. A dimensionality of zero is raised to one.
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            cells: HashMap::new(),
            axes: vec![Axis::default(); dimensions],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of non-blank cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check(&self, v: &Vector) -> SpaceResult<()> {
        if v.exceeds(self.dimensions) {
            return Err(SpaceError::Dimension {
                vector: v.clone(),
                dimensions: self.dimensions,
            });
        }
        Ok(())
    }

    /// Reads a cell; absent cells are blank.
    pub fn get(&self, v: &Vector) -> SpaceResult<Value> {
        self.check(v)?;
        Ok(self.cells.get(v).copied().unwrap_or(BLANK))
    }

    /// Writes a cell. Writing a blank removes the record.
    pub fn set(&mut self, v: &Vector, value: Value) -> SpaceResult<()> {
        self.check(v)?;
        if value == BLANK {
            if self.cells.remove(v).is_some() {
                for (i, axis) in self.axes.iter_mut().enumerate() {
                    axis.remove(v.get(i));
                }
            }
            return Ok(());
        }
        if self.cells.insert(v.clone(), value).is_none() {
            for (i, axis) in self.axes.iter_mut().enumerate() {
                axis.add(v.get(i));
            }
        }
        Ok(())
    }

    /// Lowest live coordinate on `axis`, `None` for an empty space.
    pub fn min(&self, axis: usize) -> Option<Value> {
        self.axes.get(axis).and_then(|a| a.extent).map(|(lo, _)| lo)
    }

    /// Highest live coordinate on `axis`, `None` for an empty space.
    pub fn max(&self, axis: usize) -> Option<Value> {
        self.axes.get(axis).and_then(|a| a.extent).map(|(_, hi)| hi)
    }

    /// Least and greatest corners of the occupied bounding box.
    pub fn bounds(&self) -> Option<(Vector, Vector)> {
        let mut lo = Vec::with_capacity(self.dimensions);
        let mut hi = Vec::with_capacity(self.dimensions);
        for axis in &self.axes {
            let (l, h) = axis.extent?;
            lo.push(l);
            hi.push(h);
        }
        Some((Vector::new(lo), Vector::new(hi)))
    }

    /// True if any coordinate of `v` lies outside the occupied bounds.
    pub fn out_of_bounds(&self, v: &Vector) -> bool {
        if v.exceeds(self.dimensions) {
            return true;
        }
        self.axes.iter().enumerate().any(|(i, axis)| match axis.extent {
            Some((lo, hi)) => {
                let c = v.get(i);
                c < lo || c > hi
            }
            None => true,
        })
    }

    /// Moves `position` back along `delta` to the last point before it would
    /// have left the bounding box, which is where a pointer re-enters on the
    /// opposite side.
    pub fn wrap(&self, position: &Vector, delta: &Vector) -> Vector {
        let mut steps: Option<Value> = None;
        for (i, axis) in self.axes.iter().enumerate() {
            let d = delta.get(i);
            if d == 0 {
                continue;
            }
            let Some((lo, hi)) = axis.extent else {
                return position.clone();
            };
            let bound = if d > 0 { lo } else { hi };
            let n = position.get(i).wrapping_sub(bound) / d;
            steps = Some(steps.map_or(n, |s| s.min(n)));
        }
        match steps {
            Some(n) => position - &(delta * n),
            None => position.clone(),
        }
    }

    /// Where `n` single steps along `delta` from `position` land, wrapping
    /// at the edges of the bounding box the way [`Space::wrap`] does.
    /// Negative `n` steps backwards.
    ///
    /// Only defined for a position inside the bounds and a nonzero delta;
    /// otherwise `position` is returned unchanged.
    pub fn travel(&self, position: &Vector, delta: &Vector, n: Value) -> Vector {
        if delta.is_zero() || self.out_of_bounds(position) {
            return position.clone();
        }
        // the cells of the line inside the box are position + k*delta for
        // k in lo..=hi, and lo <= 0 <= hi
        let mut range: Option<(i128, i128)> = None;
        for (i, axis) in self.axes.iter().enumerate() {
            let d = delta.get(i) as i128;
            if d == 0 {
                continue;
            }
            let Some((min, max)) = axis.extent else {
                return position.clone();
            };
            let p = position.get(i) as i128;
            let (below, above) = (min as i128 - p, max as i128 - p);
            let (lo, hi) = if d > 0 {
                (ceil_div(below, d), floor_div(above, d))
            } else {
                (ceil_div(above, d), floor_div(below, d))
            };
            range = Some(range.map_or((lo, hi), |(l, h)| (l.max(lo), h.min(hi))));
        }
        let Some((lo, hi)) = range else {
            return position.clone();
        };
        let lap = hi - lo + 1;
        let k = lo + (n as i128 - lo).rem_euclid(lap);
        position + &(delta * k as Value)
    }

    /// Iterates over every non-blank cell.
    pub fn iter(&self) -> impl Iterator<Item = (&Vector, Value)> {
        self.cells.iter().map(|(k, v)| (k, *v))
    }
}

fn floor_div(x: i128, d: i128) -> i128 {
    let q = x / d;
    if x % d != 0 && (x < 0) != (d < 0) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(x: i128, d: i128) -> i128 {
    -floor_div(-x, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_pads_and_rejects() {
        let mut space = Space::new(2);
        space.set(&Vector::from([5, 0]), 'X' as Value).unwrap();
        assert_eq!(space.get(&Vector::from([5, 0, 0, 0])).unwrap(), 'X' as Value);
        assert_eq!(space.get(&Vector::from([0, 5])).unwrap(), BLANK);
        assert!(matches!(
            space.get(&Vector::from([0, 0, 1])),
            Err(SpaceError::Dimension { dimensions: 2, .. })
        ));
        assert!(space.set(&Vector::from([1, 1, 1]), 7).is_err());
    }

    #[test]
    fn test_blank_deletes_and_shrinks_bounds() {
        let mut space = Space::new(2);
        space.set(&Vector::from([1, 1]), 'a' as Value).unwrap();
        space.set(&Vector::from([4, -2]), 'b' as Value).unwrap();
        space.set(&Vector::from([2, 3]), 'c' as Value).unwrap();
        assert_eq!(space.bounds(), Some((Vector::from([1, -2]), Vector::from([4, 3]))));

        space.set(&Vector::from([4, -2]), BLANK).unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.bounds(), Some((Vector::from([1, 1]), Vector::from([2, 3]))));

        space.set(&Vector::from([1, 1]), BLANK).unwrap();
        space.set(&Vector::from([2, 3]), BLANK).unwrap();
        assert!(space.is_empty());
        assert_eq!(space.bounds(), None);
        assert_eq!(space.min(0), None);
    }

    #[test]
    fn test_overwrite_keeps_histogram() {
        let mut space = Space::new(1);
        space.set(&Vector::from([3]), 1).unwrap();
        space.set(&Vector::from([3]), 2).unwrap();
        space.set(&Vector::from([3]), BLANK).unwrap();
        assert_eq!(space.bounds(), None);
        // deleting an absent cell is a no-op
        space.set(&Vector::from([9]), BLANK).unwrap();
        assert!(space.is_empty());
    }

    #[test]
    fn test_shared_coordinate_survives_partial_removal() {
        let mut space = Space::new(2);
        space.set(&Vector::from([0, 7]), 1).unwrap();
        space.set(&Vector::from([5, 7]), 1).unwrap();
        space.set(&Vector::from([0, 7]), BLANK).unwrap();
        assert_eq!(space.min(1), Some(7));
        assert_eq!(space.min(0), Some(5));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut space = Space::new(2);
        assert!(space.out_of_bounds(&Vector::zero()));
        space.set(&Vector::from([0, 0]), 1).unwrap();
        space.set(&Vector::from([3, 2]), 1).unwrap();
        assert!(!space.out_of_bounds(&Vector::from([2, 1])));
        assert!(space.out_of_bounds(&Vector::from([4, 1])));
        assert!(space.out_of_bounds(&Vector::from([0, -1])));
    }

    #[test]
    fn test_wrap_one_dimension() {
        let mut space = Space::new(1);
        for x in 2..=5 {
            space.set(&Vector::from([x]), 'z' as Value).unwrap();
        }
        assert_eq!(space.wrap(&Vector::from([6]), &Vector::from([1])), Vector::from([2]));
        assert_eq!(space.wrap(&Vector::from([1]), &Vector::from([-1])), Vector::from([5]));
    }

    #[test]
    fn test_wrap_diagonal_and_wide_delta() {
        let mut space = Space::new(2);
        space.set(&Vector::from([0, 0]), 1).unwrap();
        space.set(&Vector::from([9, 9]), 1).unwrap();
        // diagonal leaving through the x edge first
        let p = space.wrap(&Vector::from([10, 4]), &Vector::from([1, 1]));
        assert_eq!(p, Vector::from([6, 0]));
        // step of three lands on a reachable cell, not the exact edge
        let p = space.wrap(&Vector::from([11, 0]), &Vector::from([3, 0]));
        assert_eq!(p, Vector::from([2, 0]));
    }

    #[test]
    fn test_wrap_degenerate() {
        let space = Space::new(2);
        let p = Vector::from([4, 4]);
        assert_eq!(space.wrap(&p, &Vector::from([1, 0])), p);
        let mut space = Space::new(2);
        space.set(&Vector::zero(), 1).unwrap();
        assert_eq!(space.wrap(&p, &Vector::zero()), p);
    }

    #[test]
    fn test_travel_wraps_whole_laps() {
        let mut space = Space::new(1);
        for x in 2..=5 {
            space.set(&Vector::from([x]), 'x' as Value).unwrap();
        }
        let at = Vector::from([3]);
        let east = Vector::from([1]);
        assert_eq!(space.travel(&at, &east, 2), Vector::from([5]));
        assert_eq!(space.travel(&at, &east, 3), Vector::from([2]));
        assert_eq!(space.travel(&at, &east, -1), Vector::from([2]));
        assert_eq!(space.travel(&at, &east, 1 << 40), at);
        assert_eq!(space.travel(&at, &east, Value::MIN), at);
        assert_eq!(space.travel(&at, &Vector::zero(), 7), at);
        assert_eq!(space.travel(&Vector::from([9]), &east, 1), Vector::from([9]));
    }

    #[test]
    fn test_travel_matches_single_steps() {
        let mut space = Space::new(2);
        space.set(&Vector::from([0, 0]), 1).unwrap();
        space.set(&Vector::from([6, 4]), 1).unwrap();
        let delta = Vector::from([2, -1]);
        let mut walk = Vector::from([1, 3]);
        for n in 1..20 {
            let next = &walk + &delta;
            walk = if space.out_of_bounds(&next) {
                space.wrap(&next, &delta)
            } else {
                next
            };
            assert_eq!(space.travel(&Vector::from([1, 3]), &delta, n), walk, "n = {n}");
        }
    }
}
