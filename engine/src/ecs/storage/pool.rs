use crate::ecs::component::Component;

/// Entity-indexed storage for every value of one component kind.
///
/// Slot `i` holds the component of the entity whose id is `i`. The pool's length tracks the
/// highest entity id it has been resized to cover, not the number of entities that actually own
/// the kind. Slots of entities lacking the kind stay empty but still take up space.
///
/// Whether an entity currently owns the kind is recorded in its signature, not here. A slot can
/// keep a stale value after the kind was removed from the entity; the next `set` overwrites it.
///
/// # Performance Characteristics
///
/// | Operation  | Time           |
/// |------------|----------------|
/// | `resize()` | O(n) growth    |
/// | `set()`    | O(1)           |
/// | `get()`    | O(1)           |
#[derive(Debug)]
pub struct Pool<C: Component> {
    /// One optional value per entity id.
    slots: Vec<Option<C>>,
}

impl<C: Component> Pool<C> {
    /// Create an empty pool.
    #[inline]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Grow the pool to at least `len` slots. New slots are empty. Never shrinks.
    ///
    /// Growing may move existing values, so references into the pool must be re-fetched.
    #[inline]
    pub fn resize(&mut self, len: usize) {
        if len > self.slots.len() {
            self.slots.resize_with(len, || None);
        }
    }

    /// Store `value` at `index`, dropping whatever the slot held.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the current length. Call [`resize`](Self::resize) first.
    #[inline]
    pub fn set(&mut self, index: usize, value: C) {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(value),
            None => panic!("pool slot {index} is out of range (pool length {len})"),
        }
    }

    /// Get the value at `index`, or `None` if the slot was never set or is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.slots.get(index)?.as_ref()
    }

    /// Get the value at `index` mutably, or `None` if the slot was never set or is out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Move the value out of the slot at `index`, leaving it empty.
    #[inline]
    pub fn take(&mut self, index: usize) -> Option<C> {
        self.slots.get_mut(index)?.take()
    }

    /// Drop every slot.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<C: Component> Default for Pool<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ember_macros::Component;

    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Health(u32);

    #[derive(Component)]
    struct Tracked(#[allow(dead_code)] Rc<()>);

    #[test]
    fn resize_grows_with_empty_slots() {
        // Given
        let mut pool = Pool::<Health>::new();

        // When
        pool.resize(4);

        // Then
        assert_eq!(pool.slots.len(), 4);
        assert!((0..4).all(|i| pool.get(i).is_none()));
    }

    #[test]
    fn resize_never_shrinks() {
        // Given
        let mut pool = Pool::<Health>::new();
        pool.resize(8);

        // When
        pool.resize(2);

        // Then
        assert_eq!(pool.slots.len(), 8);
    }

    #[test]
    fn set_and_get() {
        // Given
        let mut pool = Pool::new();
        pool.resize(3);

        // When
        pool.set(0, Health(10));
        pool.set(2, Health(30));

        // Then
        assert_eq!(pool.get(0), Some(&Health(10)));
        assert_eq!(pool.get(1), None);
        assert_eq!(pool.get(2), Some(&Health(30)));
        assert_eq!(pool.get(3), None);
    }

    #[test]
    fn set_overwrites_and_drops_previous_value() {
        // Given
        let marker = Rc::new(());
        let mut pool = Pool::new();
        pool.resize(1);
        pool.set(0, Tracked(Rc::clone(&marker)));
        assert_eq!(Rc::strong_count(&marker), 2);

        // When
        pool.set(0, Tracked(Rc::new(())));

        // Then
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn get_mut_writes_through() {
        // Given
        let mut pool = Pool::new();
        pool.resize(1);
        pool.set(0, Health(5));

        // When
        if let Some(health) = pool.get_mut(0) {
            health.0 += 1;
        }

        // Then
        assert_eq!(pool.get(0), Some(&Health(6)));
    }

    #[test]
    fn take_empties_slot() {
        // Given
        let mut pool = Pool::new();
        pool.resize(2);
        pool.set(1, Health(7));

        // When
        let taken = pool.take(1);

        // Then
        assert_eq!(taken, Some(Health(7)));
        assert_eq!(pool.get(1), None);
        assert_eq!(pool.take(1), None);
        assert_eq!(pool.take(9), None);
        assert_eq!(pool.slots.len(), 2);
    }

    #[test]
    fn clear_drops_all_slots() {
        // Given
        let marker = Rc::new(());
        let mut pool = Pool::new();
        pool.resize(2);
        pool.set(1, Tracked(Rc::clone(&marker)));

        // When
        pool.clear();

        // Then
        assert!(pool.slots.is_empty());
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    #[should_panic(expected = "pool slot 3 is out of range (pool length 2)")]
    fn set_out_of_range_panics() {
        let mut pool = Pool::new();
        pool.resize(2);
        pool.set(3, Health(1));
    }
}
