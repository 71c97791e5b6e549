//! Operand stacks and the stack-of-stacks.

use std::collections::VecDeque;

use crate::error::StackError;
use crate::{Value, Vector};

/// Most zeros a single stack-of-stacks operation will pad with.
pub const MAX_FILL: usize = 1 << 24;

/// Access policy for a single push or pop.
///
/// `invert` makes pushes go to the bottom, `queue` makes pops come from the
/// bottom. The two are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackMode {
    pub invert: bool,
    pub queue: bool,
}

impl StackMode {
    pub const NORMAL: StackMode = StackMode {
        invert: false,
        queue: false,
    };
}

/// LIFO integer stack. Popping an empty stack yields 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    /// Back is the top.
    cells: VecDeque<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn push(&mut self, value: Value, mode: StackMode) {
        if mode.invert {
            self.cells.push_front(value);
        } else {
            self.cells.push_back(value);
        }
    }

    pub fn pop(&mut self, mode: StackMode) -> Value {
        let v = if mode.queue {
            self.cells.pop_front()
        } else {
            self.cells.pop_back()
        };
        v.unwrap_or(0)
    }

    /// The `n`th value from the top (0 is the top), 0 past the bottom.
    pub fn pick(&self, n: usize) -> Value {
        self.cells
            .len()
            .checked_sub(n + 1)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(0)
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Value> + '_ {
        self.cells.iter().copied()
    }

    /// Pops `dim` components; index 0 is the last one popped.
    pub fn pop_vector(&mut self, dim: usize, mode: StackMode) -> Vector {
        let mut components = vec![0; dim];
        for slot in components.iter_mut().rev() {
            *slot = self.pop(mode);
        }
        Vector::new(components)
    }

    /// Pushes the first `dim` components, index 0 first.
    pub fn push_vector(&mut self, v: &Vector, dim: usize, mode: StackMode) {
        for c in v.components(dim) {
            self.push(c, mode);
        }
    }

    /// Pushes a 0-terminated string so that popping yields it in order.
    pub fn push_string(&mut self, s: &str, mode: StackMode) {
        self.push(0, mode);
        for c in s.chars().rev() {
            self.push(c as Value, mode);
        }
    }

    /// Removes up to `count` values off the top, keeping their order.
    fn take_top(&mut self, count: u64) -> VecDeque<Value> {
        let keep = (self.cells.len() as u64).saturating_sub(count) as usize;
        self.cells.split_off(keep)
    }

    fn push_zeros(&mut self, count: usize) {
        self.cells.extend(std::iter::repeat(0).take(count));
    }

    /// Pops characters up to and including the terminating 0.
    ///
    /// Values that are not valid scalar values become U+FFFD.
    pub fn pop_string(&mut self, mode: StackMode) -> String {
        let mut s = String::new();
        loop {
            let v = self.pop(mode);
            if v == 0 {
                return s;
            }
            let c = u32::try_from(v).ok().and_then(char::from_u32);
            s.push(c.unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
}

impl FromIterator<Value> for Stack {
    /// Collects values bottom to top.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Non-empty stack of [`Stack`]s. The top is the TOSS, the one below it the
/// SOSS.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackOfStacks {
    /// Last is the TOSS.
    stacks: Vec<Stack>,
}

impl Default for StackOfStacks {
    fn default() -> Self {
        Self::new()
    }
}

impl StackOfStacks {
    pub fn new() -> Self {
        Self {
            stacks: vec![Stack::new()],
        }
    }

    /// Number of stacks (always at least one).
    #[inline]
    pub fn depth(&self) -> usize {
        self.stacks.len()
    }

    pub fn toss(&self) -> &Stack {
        &self.stacks[self.stacks.len() - 1]
    }

    pub fn toss_mut(&mut self) -> &mut Stack {
        let top = self.stacks.len() - 1;
        &mut self.stacks[top]
    }

    pub fn soss_mut(&mut self) -> Option<&mut Stack> {
        let n = self.stacks.len();
        if n < 2 {
            return None;
        }
        self.stacks.get_mut(n - 2)
    }

    /// Size of every stack, TOSS first.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.stacks.iter().rev().map(Stack::len)
    }

    /// Pushes a new TOSS holding the top `n` values of the old one, with
    /// zeros underneath when the old one runs dry.
    ///
    /// A negative `n` instead pushes `|n|` zeros onto the old TOSS and
    /// starts the new one empty.
    pub fn new_stack(&mut self, n: Value) -> Result<(), StackError> {
        let count = n.unsigned_abs();
        let toss = self.toss_mut();
        let fresh = if n >= 0 {
            let zeros = padding(n, count, toss.len())?;
            let moved = toss.take_top(count);
            let mut fresh = Stack::new();
            fresh.push_zeros(zeros);
            fresh.cells.extend(moved);
            fresh
        } else {
            toss.push_zeros(padding(n, count, 0)?);
            Stack::new()
        };
        self.stacks.push(fresh);
        Ok(())
    }

    /// Pops the TOSS, moving its top `n` values onto the new TOSS, or
    /// discarding `|n|` values from the new TOSS when `n` is negative.
    pub fn remove_stack(&mut self, n: Value) -> Result<(), StackError> {
        if self.stacks.len() < 2 {
            return Err(StackError::NoSecondStack);
        }
        let count = n.unsigned_abs();
        let zeros = if n >= 0 {
            padding(n, count, self.toss().len())?
        } else {
            0
        };
        let mut old = self.stacks.pop().ok_or(StackError::NoSecondStack)?;
        let toss = self.toss_mut();
        if n >= 0 {
            toss.push_zeros(zeros);
            toss.cells.extend(old.take_top(count));
        } else {
            toss.take_top(count);
        }
        Ok(())
    }

    /// Moves `n` values between SOSS and TOSS one at a time: from SOSS to
    /// TOSS when positive, from TOSS to SOSS when negative. Zeros are moved
    /// once the source is empty.
    pub fn transfer_under(&mut self, n: Value) -> Result<(), StackError> {
        let top = self.stacks.len() - 1;
        if top == 0 {
            return Err(StackError::NoSecondStack);
        }
        let (lower, upper) = self.stacks.split_at_mut(top);
        let (soss, toss) = (&mut lower[top - 1], &mut upper[0]);
        let (from, to) = if n >= 0 { (soss, toss) } else { (toss, soss) };
        let count = n.unsigned_abs();
        let zeros = padding(n, count, from.len())?;
        let moved = from.take_top(count);
        to.cells.extend(moved.into_iter().rev());
        to.push_zeros(zeros);
        Ok(())
    }
}

/// Zeros needed to take `count` values from a stack holding `available`.
fn padding(n: Value, count: u64, available: usize) -> Result<usize, StackError> {
    let zeros = count.saturating_sub(available as u64);
    if zeros > MAX_FILL as u64 {
        return Err(StackError::TooLarge(n));
    }
    Ok(zeros as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stack(values: &[Value]) -> Stack {
        values.iter().copied().collect()
    }

    #[test]
    fn test_empty_pop_is_zero() {
        let mut s = Stack::new();
        assert_eq!(s.pop(StackMode::NORMAL), 0);
        assert_eq!(s.pick(3), 0);
    }

    #[test]
    fn test_modes_are_independent() {
        let invert = StackMode { invert: true, queue: false };
        let queue = StackMode { invert: false, queue: true };
        let both = StackMode { invert: true, queue: true };

        let mut s = stack(&[1, 2]);
        s.push(9, invert);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![9, 1, 2]);
        assert_eq!(s.pop(queue), 9);
        assert_eq!(s.pop(StackMode::NORMAL), 2);

        let mut s = stack(&[1, 2]);
        s.push(7, both);
        assert_eq!(s.pop(both), 7);
    }

    #[test]
    fn test_vector_order() {
        let mut s = stack(&[3, 4]);
        assert_eq!(s.pop_vector(2, StackMode::NORMAL), Vector::from([3, 4]));
        s.push_vector(&Vector::from([5]), 3, StackMode::NORMAL);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![5, 0, 0]);
    }

    #[test]
    fn test_string_round_trip_stops_at_zero() {
        let mut s = stack(&[42]);
        s.push_string("hi", StackMode::NORMAL);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![42, 0, 'i' as Value, 'h' as Value]);
        assert_eq!(s.pop_string(StackMode::NORMAL), "hi");
        assert_eq!(s.pop(StackMode::NORMAL), 42);
    }

    #[test]
    fn test_new_stack_transfers_in_order() {
        let mut sos = StackOfStacks::new();
        for v in [1, 2, 3] {
            sos.toss_mut().push(v, StackMode::NORMAL);
        }
        sos.new_stack(2).unwrap();
        assert_eq!(sos.depth(), 2);
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(sos.sizes().collect::<Vec<_>>(), vec![2, 1]);

        sos.new_stack(-2).unwrap();
        assert_eq!(sos.toss().len(), 0);
        assert_eq!(sos.sizes().collect::<Vec<_>>(), vec![0, 4, 1]);
    }

    #[test]
    fn test_new_stack_pads_with_zeros() {
        let mut sos = StackOfStacks::new();
        sos.toss_mut().push(5, StackMode::NORMAL);
        sos.new_stack(3).unwrap();
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![0, 0, 5]);
    }

    #[test]
    fn test_remove_stack() {
        let mut sos = StackOfStacks::new();
        assert_eq!(sos.remove_stack(0), Err(StackError::NoSecondStack));

        sos.toss_mut().push(1, StackMode::NORMAL);
        sos.new_stack(0).unwrap();
        sos.toss_mut().push(8, StackMode::NORMAL);
        sos.toss_mut().push(9, StackMode::NORMAL);
        sos.remove_stack(2).unwrap();
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![1, 8, 9]);

        sos.new_stack(0).unwrap();
        sos.remove_stack(-2).unwrap();
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_transfer_under() {
        let mut sos = StackOfStacks::new();
        assert_eq!(sos.transfer_under(1), Err(StackError::NoSecondStack));
        for v in [1, 2, 3] {
            sos.toss_mut().push(v, StackMode::NORMAL);
        }
        sos.new_stack(0).unwrap();
        sos.transfer_under(2).unwrap();
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![3, 2]);
        sos.transfer_under(-1).unwrap();
        assert_eq!(sos.soss_mut().unwrap().iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_huge_counts_are_refused() {
        let mut sos = StackOfStacks::new();
        sos.toss_mut().push(4, StackMode::NORMAL);
        assert_eq!(sos.new_stack(Value::MAX), Err(StackError::TooLarge(Value::MAX)));
        assert_eq!(sos.new_stack(Value::MIN), Err(StackError::TooLarge(Value::MIN)));
        assert_eq!(sos.depth(), 1);
        assert_eq!(sos.toss().iter().collect::<Vec<_>>(), vec![4]);

        sos.new_stack(1).unwrap();
        assert_eq!(sos.transfer_under(Value::MAX), Err(StackError::TooLarge(Value::MAX)));
        assert_eq!(sos.remove_stack(Value::MAX), Err(StackError::TooLarge(Value::MAX)));
        assert_eq!(sos.depth(), 2);

        // discarding never pads, so any negative count is fine
        sos.remove_stack(Value::MIN).unwrap();
        assert_eq!(sos.depth(), 1);
        assert!(sos.toss().is_empty());
    }

    #[test]
    fn test_padding_up_to_the_limit() {
        let mut sos = StackOfStacks::new();
        sos.new_stack(MAX_FILL as Value).unwrap();
        assert_eq!(sos.toss().len(), MAX_FILL);
        sos.remove_stack(-(MAX_FILL as Value)).unwrap();
        assert_eq!(sos.toss().len(), 0);
    }
}
