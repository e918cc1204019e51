//! Gap list: an array list with a movable insertion point.
//!
//! Elements before the insertion point live at the front of the backing
//! store and elements after it live at the back, leaving one contiguous
//! unused gap in between. Inserting at the insertion point is amortized
//! O(1); moving the insertion point costs O(distance moved).

use alloc::vec::Vec;
use core::fmt;
use core::iter;

use thiserror::Error;

/// A container could not grow to the requested number of elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("could not grow container to {requested} elements")]
pub struct AllocError {
    /// Capacity that was asked for.
    pub requested: usize,
}

/// Ordered sequence with a movable insertion point.
///
/// Logical index `i` lives at physical slot `i` when `i` is before the
/// insertion point, else at `i + (capacity - len)`.
pub struct GapList<T> {
    /// Backing store; `None` slots form the gap.
    slots: Vec<Option<T>>,
    len: usize,
    /// Insertion point (logical index elements are inserted before).
    ip: usize,
    /// Capacity ceiling. Requests above it fail like a failed allocation.
    limit: usize,
}

impl<T> GapList<T> {
    /// Create an empty list without allocating.
    pub const fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Create an empty list whose capacity may never exceed `limit`.
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            ip: 0,
            limit,
        }
    }

    /// Create an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut list = Self::new();
        list.ensure_capacity(capacity)?;
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the backing store can hold without growing.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Capacity ceiling of this list.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current insertion point.
    pub fn tell(&self) -> usize {
        self.ip
    }

    fn gap(&self) -> usize {
        self.slots.len() - self.len
    }

    fn physical(&self, index: usize) -> usize {
        if index < self.ip {
            index
        } else {
            index + self.gap()
        }
    }

    /// Get the element at logical `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots.get(self.physical(index))?.as_ref()
    }

    /// Get a mutable reference to the element at logical `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let p = self.physical(index);
        self.slots.get_mut(p)?.as_mut()
    }

    /// Overwrite a single element. Returns false if `index` is out of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        if index >= self.len {
            return false;
        }
        let p = self.physical(index);
        self.slots[p] = Some(value);
        true
    }

    /// Grow or shrink the backing store to hold at least `capacity`
    /// elements. Never shrinks below `len`. On failure the list is left
    /// untouched.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<(), AllocError> {
        let capacity = capacity.max(self.len);
        if capacity > self.limit {
            return Err(AllocError { requested: capacity });
        }
        if capacity == self.slots.len() {
            return Ok(());
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| AllocError { requested: capacity })?;

        let gap = self.gap();
        let mut old = core::mem::take(&mut self.slots).into_iter();
        slots.extend(old.by_ref().take(self.ip));
        slots.extend(iter::repeat_with(|| None).take(capacity - self.len));
        slots.extend(old.skip(gap));
        self.slots = slots;
        Ok(())
    }

    /// Shrink the backing store to exactly `len` elements.
    pub fn trim_to_size(&mut self) -> Result<(), AllocError> {
        self.ensure_capacity(self.len)
    }

    /// Make room for `n` more elements: first with headroom for amortized
    /// growth, then shrink-wrapped if that fails.
    fn grow_for(&mut self, n: usize) -> Result<(), AllocError> {
        let needed = self
            .len
            .checked_add(n)
            .ok_or(AllocError { requested: usize::MAX })?;
        if needed <= self.capacity() {
            return Ok(());
        }
        let roomy = needed.saturating_add(self.len / 2);
        self.ensure_capacity(roomy)
            .or_else(|_| self.ensure_capacity(needed))
    }

    /// Insert one element at the insertion point and move the insertion
    /// point past it.
    pub fn add(&mut self, value: T) -> Result<&mut T, AllocError> {
        self.grow_for(1)?;
        let at = self.ip;
        self.ip += 1;
        self.len += 1;
        Ok(self.slots[at].insert(value))
    }

    /// Append one element at the end, wherever the insertion point was.
    pub fn push(&mut self, value: T) -> Result<&mut T, AllocError> {
        self.seek(self.len);
        self.add(value)
    }

    /// Move the insertion point to `pos` (clamped to `len`), shifting only
    /// the elements between the old and new positions across the gap.
    pub fn seek(&mut self, pos: usize) {
        let pos = pos.min(self.len);
        let gap = self.gap();
        if gap == 0 {
            self.ip = pos;
            return;
        }
        if pos < self.ip {
            for k in (pos..self.ip).rev() {
                let v = self.slots[k].take();
                self.slots[k + gap] = v;
            }
        } else {
            for k in self.ip..pos {
                let v = self.slots[k + gap].take();
                self.slots[k] = v;
            }
        }
        self.ip = pos;
    }

    /// Remove `n` elements before the insertion point. Returns false and
    /// removes nothing if there are fewer than `n`.
    pub fn remove_before(&mut self, n: usize) -> bool {
        if self.ip < n {
            return false;
        }
        for slot in &mut self.slots[self.ip - n..self.ip] {
            *slot = None;
        }
        self.ip -= n;
        self.len -= n;
        true
    }

    /// Remove `n` elements after the insertion point. Returns false and
    /// removes nothing if there are fewer than `n`.
    pub fn remove_after(&mut self, n: usize) -> bool {
        if self.len < self.ip + n {
            return false;
        }
        let start = self.ip + self.gap();
        for slot in &mut self.slots[start..start + n] {
            *slot = None;
        }
        self.len -= n;
        true
    }

    /// Remove the half-open range `from..to`.
    pub fn remove_range(&mut self, from: usize, to: usize) -> bool {
        if to <= from || to > self.len {
            return false;
        }
        if from > self.ip {
            self.seek(from);
        } else if to < self.ip {
            self.seek(to);
        }
        let after = to - self.ip;
        let before = self.ip - from;
        self.remove_after(after) && self.remove_before(before)
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        self.seek(index + 1);
        let value = self.slots[index].take();
        self.ip -= 1;
        self.len -= 1;
        value
    }

    /// Remove all elements, keeping the backing store.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
        self.ip = 0;
    }

    /// Iterate in logical order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let tail = self.ip + self.gap();
        self.slots[..self.ip]
            .iter()
            .chain(self.slots[tail..].iter())
            .filter_map(Option::as_ref)
    }

    /// Iterate mutably in logical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        let gap = self.gap();
        let (head, rest) = self.slots.split_at_mut(self.ip);
        head.iter_mut()
            .chain(rest[gap..].iter_mut())
            .filter_map(Option::as_mut)
    }
}

impl<T: Clone> GapList<T> {
    /// Insert a copy of `src` at the insertion point. Returns the logical
    /// index of the first inserted element.
    pub fn add_all(&mut self, src: &[T]) -> Result<usize, AllocError> {
        self.grow_for(src.len())?;
        let first = self.ip;
        for (slot, value) in self.slots[first..first + src.len()].iter_mut().zip(src) {
            *slot = Some(value.clone());
        }
        self.ip += src.len();
        self.len += src.len();
        Ok(first)
    }

    /// Overwrite the half-open range `from..to` with `src`. Returns false
    /// and writes nothing if the range is out of bounds or `src` has the
    /// wrong length. An empty in-bounds range is a no-op.
    pub fn set_range(&mut self, from: usize, to: usize, src: &[T]) -> bool {
        if to < from || to > self.len || src.len() != to - from {
            return false;
        }
        for (index, value) in (from..to).zip(src) {
            let p = self.physical(index);
            self.slots[p] = Some(value.clone());
        }
        true
    }

    /// Append copies of `value` until the list holds `len` elements.
    pub fn fill_to(&mut self, len: usize, value: &T) -> Result<(), AllocError> {
        if len <= self.len {
            return Ok(());
        }
        self.seek(self.len);
        self.grow_for(len - self.len)?;
        while self.len < len {
            self.add(value.clone())?;
        }
        Ok(())
    }

    /// Copy the elements out in logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for GapList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GapList<T> {
    /// Deep copy, trimmed to size, with the insertion point at the end.
    fn clone(&self) -> Self {
        Self {
            slots: self.iter().cloned().map(Some).collect(),
            len: self.len,
            ip: self.len,
            limit: self.limit,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GapList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GapList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for GapList<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    fn list_of(values: &[u32]) -> GapList<u32> {
        let mut list = GapList::new();
        list.add_all(values).unwrap();
        list
    }

    /// Edit applied to both the list and a `Vec` model. Positions are
    /// reduced modulo the current length when the op runs.
    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Seek(usize),
        RemoveRange(usize, usize),
        RemoveBefore(usize),
        RemoveAfter(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => Just(Op::Add),
            1 => any::<usize>().prop_map(Op::Seek),
            1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::RemoveRange(a, b)),
            1 => (0usize..3).prop_map(Op::RemoveBefore),
            1 => (0usize..3).prop_map(Op::RemoveAfter),
        ]
    }

    #[test]
    fn add_and_get_in_order() {
        let list = list_of(&[1, 2, 3]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some(&1));
        assert_eq!(list.get(2), Some(&3));
        assert_eq!(list.get(3), None);
    }

    #[test]
    fn insert_in_middle_after_seek() {
        let mut list = list_of(&[1, 2, 5]);
        list.seek(2);
        list.add_all(&[3, 4]).unwrap();
        assert_eq!(list.tell(), 4);
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seek_clamps_to_len() {
        let mut list = list_of(&[1, 2]);
        list.seek(10);
        assert_eq!(list.tell(), 2);
    }

    #[test]
    fn get_is_independent_of_cursor() {
        let mut list = GapList::with_capacity(16).unwrap();
        list.add_all(&[10, 20, 30, 40]).unwrap();
        for pos in [0, 3, 1, 4, 2] {
            list.seek(pos);
            assert_eq!(list.to_vec(), vec![10, 20, 30, 40]);
            assert_eq!(list.get(1), Some(&20));
            assert_eq!(list.get(3), Some(&40));
        }
    }

    #[test]
    fn set_range_spans_the_gap() {
        let mut list = GapList::with_capacity(10).unwrap();
        list.add_all(&[0, 0, 0, 0, 0]).unwrap();
        list.seek(2);
        assert!(list.set_range(1, 4, &[7, 8, 9]));
        assert_eq!(list.to_vec(), vec![0, 7, 8, 9, 0]);
    }

    #[test]
    fn set_range_rejects_bad_bounds() {
        let mut list = list_of(&[1, 2, 3]);
        assert!(!list.set_range(2, 4, &[0, 0]));
        assert!(!list.set_range(2, 1, &[]));
        assert!(!list.set_range(4, 4, &[]));
        assert!(!list.set_range(0, 2, &[9]));
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn set_range_accepts_empty_range() {
        let mut list = list_of(&[1, 2, 3]);
        assert!(list.set_range(2, 2, &[]));
        assert!(list.set_range(3, 3, &[]));
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn remove_before_and_after_cursor() {
        let mut list = list_of(&[1, 2, 3, 4, 5]);
        list.seek(3);
        assert!(list.remove_before(2));
        assert_eq!(list.to_vec(), vec![1, 4, 5]);
        assert!(list.remove_after(1));
        assert_eq!(list.to_vec(), vec![1, 5]);
        assert!(!list.remove_after(2));
        assert!(!list.remove_before(2));
        assert_eq!(list.to_vec(), vec![1, 5]);
    }

    #[test]
    fn remove_range_on_either_side_of_cursor() {
        let mut list = list_of(&[0, 1, 2, 3, 4, 5, 6, 7]);
        list.seek(1);
        assert!(list.remove_range(4, 6));
        assert_eq!(list.to_vec(), vec![0, 1, 2, 3, 6, 7]);
        list.seek(6);
        assert!(list.remove_range(0, 2));
        assert_eq!(list.to_vec(), vec![2, 3, 6, 7]);
        assert!(!list.remove_range(3, 9));
    }

    #[test]
    fn remove_single_element() {
        let mut list = list_of(&[1, 2, 3]);
        list.seek(0);
        assert_eq!(list.remove(1), Some(2));
        assert_eq!(list.remove(5), None);
        assert_eq!(list.to_vec(), vec![1, 3]);
    }

    proptest! {
        #[test]
        fn index_invariant_matches_vec_model(ops in prop::collection::vec(op(), 0..400)) {
            let mut list = GapList::new();
            let mut model: Vec<u32> = Vec::new();
            let mut next = 0u32;

            for op in ops {
                match op {
                    Op::Add => {
                        let pos = list.tell();
                        list.add(next).unwrap();
                        model.insert(pos, next);
                        next += 1;
                    }
                    Op::Seek(pos) => list.seek(pos % (model.len() + 1)),
                    Op::RemoveRange(a, b) if !model.is_empty() => {
                        let from = a % model.len();
                        let to = from + 1 + b % (model.len() - from);
                        prop_assert!(list.remove_range(from, to));
                        model.drain(from..to);
                    }
                    Op::RemoveRange(..) => prop_assert!(!list.remove_range(0, 1)),
                    Op::RemoveBefore(n) => {
                        let ip = list.tell();
                        let ok = list.remove_before(n);
                        prop_assert_eq!(ok, n <= ip);
                        if ok {
                            model.drain(ip - n..ip);
                        }
                    }
                    Op::RemoveAfter(n) => {
                        let ip = list.tell();
                        let ok = list.remove_after(n);
                        prop_assert_eq!(ok, ip + n <= model.len());
                        if ok {
                            model.drain(ip..ip + n);
                        }
                    }
                }
                prop_assert_eq!(list.len(), model.len());
                prop_assert!(list.tell() <= list.len());
                for (i, value) in model.iter().enumerate() {
                    prop_assert_eq!(list.get(i), Some(value));
                }
            }
        }
    }

    #[test]
    fn appends_copy_linear_amount() {
        let mut list = GapList::new();
        let mut copies = 0usize;
        let n = 10_000;
        for i in 0..n {
            let before = list.capacity();
            list.add(i).unwrap();
            if list.capacity() != before {
                copies += list.len() - 1;
            }
        }
        assert!(copies <= 3 * n, "copied {} elements for {} appends", copies, n);
    }

    #[test]
    fn growth_failure_leaves_list_untouched() {
        let mut list = GapList::with_limit(4);
        list.add_all(&[1, 2, 3]).unwrap();
        list.seek(1);
        assert_eq!(
            list.add_all(&[8, 9]),
            Err(AllocError { requested: 5 })
        );
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.tell(), 1);
    }

    #[test]
    fn amortized_attempt_falls_back_to_exact_size() {
        let mut list = GapList::with_limit(5);
        list.add_all(&[1, 2, 3, 4]).unwrap();
        list.add(5).unwrap();
        assert_eq!(list.capacity(), 5);
    }

    #[test]
    fn ensure_capacity_never_shrinks_below_len() {
        let mut list = list_of(&[1, 2, 3]);
        list.ensure_capacity(64).unwrap();
        list.seek(1);
        list.ensure_capacity(0).unwrap();
        assert_eq!(list.capacity(), 3);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn trim_to_size_drops_the_gap() {
        let mut list = GapList::with_capacity(32).unwrap();
        list.add_all(&[1, 2, 3, 4]).unwrap();
        list.seek(1);
        list.trim_to_size().unwrap();
        assert_eq!(list.capacity(), 4);
        assert_eq!(list.tell(), 1);
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4]);

        // next insert has to grow again
        list.add(9).unwrap();
        assert_eq!(list.to_vec(), vec![1, 9, 2, 3, 4]);
    }

    #[test]
    fn clone_is_deep() {
        let mut list = list_of(&[1, 2, 3]);
        list.seek(1);
        let copy = list.clone();
        list.set(0, 9);
        assert_eq!(copy.to_vec(), vec![1, 2, 3]);
        assert_eq!(copy, list_of(&[1, 2, 3]));
    }

    #[test]
    fn fill_to_appends_defaults() {
        let mut list = list_of(&[1]);
        list.seek(0);
        list.fill_to(4, &0).unwrap();
        assert_eq!(list.to_vec(), vec![1, 0, 0, 0]);
        list.fill_to(2, &7).unwrap();
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn iter_mut_visits_both_sides() {
        let mut list = list_of(&[1, 2, 3, 4]);
        list.seek(2);
        for v in list.iter_mut() {
            *v *= 10;
        }
        assert_eq!(list.to_vec(), vec![10, 20, 30, 40]);
    }
}
