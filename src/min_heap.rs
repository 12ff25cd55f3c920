/// Slots reserved each time the backing array is full.
pub const HEAP_GROWTH: usize = 100;

/// Anything that can be ordered by a weight in a [`MinHeap`].
pub trait Weighted {
    fn weight(&self) -> u64;
}

/// Array-backed binary min-heap keyed by [`Weighted::weight`].
///
/// Ties are broken the same way every time so a given insertion sequence
/// always produces the same extraction sequence: sift-up stops on equal
/// weights, and sift-down prefers the right child when it is no heavier than
/// the left one.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum HeapErr {
    /// Growing the array by this many slots failed.
    Exhausted(usize),
    HeapUnderflow,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: Vec::new() }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Weighted> MinHeap<T> {
    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size())
            .all(|i| self.elements[Self::parent(i)].weight() <= self.elements[i].weight())
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i].weight() >= self.elements[p].weight() {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            if l >= n {
                return;
            }

            let child = if r < n && self.elements[r].weight() <= self.elements[l].weight() {
                r
            } else {
                l
            };

            if self.elements[child].weight() >= self.elements[i].weight() {
                return;
            }
            self.elements.swap(i, child);
            i = child;
        }
    }

    pub fn insert(&mut self, value: T) -> Result<(), HeapErr> {
        if self.elements.len() == self.elements.capacity() {
            self.elements
                .try_reserve_exact(HEAP_GROWTH)
                .map_err(|_| HeapErr::Exhausted(HEAP_GROWTH))?;
        }
        self.elements.push(value);
        self.sift_up(self.heap_size() - 1);
        Ok(())
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let result = self.elements.swap_remove(0);
        self.sift_down(0);
        Ok(result)
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
