/*!
# Sorting and Searching

The classic comparison sorts, each generic over a comparator (`*_by`) with a `*_by_key`
convenience. All of them sort in place and ascending with respect to the comparator; pass a
reversed comparator (`|a, b| b.cmp(a)`) for descending order.

| sort             | stable | time                 |
|------------------|--------|----------------------|
| selection sort   | no     | `O(n^2)`             |
| merge sort       | yes    | `O(n log n)`         |
| quick sort       | no     | `O(n log n)` average |
| heap sort        | no     | `O(n log n)`         |
*/

use std::cmp::Ordering;

/// Selection sort: repeatedly swaps the smallest remaining element to the front
pub fn selection_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 0..arr.len() {
        let mut min = i;
        for j in (i + 1)..arr.len() {
            if compare(&arr[j], &arr[min]) == Ordering::Less {
                min = j;
            }
        }
        arr.swap(i, min);
    }
}

pub fn selection_sort_by_key<T, K: Ord, F: FnMut(&T) -> K>(arr: &mut [T], mut key: F) {
    selection_sort_by(arr, |a, b| key(a).cmp(&key(b)));
}

/// Top-down merge sort; equal elements keep their relative order.
///
/// # Examples
/// ```
/// use casework::sorting::merge_sort_by_key;
///
/// let mut zones = vec![("north", 3), ("east", 1), ("south", 3), ("west", 2)];
/// merge_sort_by_key(&mut zones, |z| z.1);
/// assert_eq!(zones, vec![("east", 1), ("west", 2), ("north", 3), ("south", 3)]);
/// ```
pub fn merge_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    fn rec<T: Clone, F: FnMut(&T, &T) -> Ordering>(arr: &mut [T], compare: &mut F) {
        let len = arr.len();
        if len <= 1 {
            return;
        }

        let mid = len / 2;
        rec(&mut arr[..mid], compare);
        rec(&mut arr[mid..], compare);

        let (left, right) = (arr[..mid].to_vec(), arr[mid..].to_vec());
        let (mut i, mut j) = (0, 0);
        for slot in arr.iter_mut() {
            // take from the left run unless the right element is strictly smaller
            let take_left = j >= right.len()
                || (i < left.len() && compare(&right[j], &left[i]) != Ordering::Less);
            if take_left {
                *slot = left[i].clone();
                i += 1;
            } else {
                *slot = right[j].clone();
                j += 1;
            }
        }
    }

    rec(arr, &mut compare);
}

pub fn merge_sort_by_key<T: Clone, K: Ord, F: FnMut(&T) -> K>(arr: &mut [T], mut key: F) {
    merge_sort_by(arr, |a, b| key(a).cmp(&key(b)));
}

/// Quick sort with the Lomuto partition scheme (last element as pivot)
pub fn quick_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn partition<T, F: FnMut(&T, &T) -> Ordering>(arr: &mut [T], compare: &mut F) -> usize {
        let pivot = arr.len() - 1;
        let mut i = 0;
        for j in 0..pivot {
            if compare(&arr[j], &arr[pivot]) != Ordering::Greater {
                arr.swap(i, j);
                i += 1;
            }
        }
        arr.swap(i, pivot);
        i
    }

    fn rec<T, F: FnMut(&T, &T) -> Ordering>(arr: &mut [T], compare: &mut F) {
        if arr.len() <= 1 {
            return;
        }
        let pivot = partition(arr, compare);
        let (left, right) = arr.split_at_mut(pivot);
        rec(left, compare);
        rec(&mut right[1..], compare);
    }

    rec(arr, &mut compare);
}

pub fn quick_sort_by_key<T, K: Ord, F: FnMut(&T) -> K>(arr: &mut [T], mut key: F) {
    quick_sort_by(arr, |a, b| key(a).cmp(&key(b)));
}

/// Heap sort: builds a max-heap in place and repeatedly moves its root to the back
pub fn heap_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn heapify<T, F: FnMut(&T, &T) -> Ordering>(arr: &mut [T], n: usize, mut i: usize, compare: &mut F) {
        loop {
            let mut largest = i;
            for c in [2 * i + 1, 2 * i + 2] {
                if c < n && compare(&arr[c], &arr[largest]) == Ordering::Greater {
                    largest = c;
                }
            }
            if largest == i {
                return;
            }
            arr.swap(i, largest);
            i = largest;
        }
    }

    let len = arr.len();
    for i in (0..len / 2).rev() {
        heapify(arr, len, i, &mut compare);
    }
    for end in (1..len).rev() {
        arr.swap(0, end);
        heapify(arr, end, 0, &mut compare);
    }
}

pub fn heap_sort_by_key<T, K: Ord, F: FnMut(&T) -> K>(arr: &mut [T], mut key: F) {
    heap_sort_by(arr, |a, b| key(a).cmp(&key(b)));
}

/// Selects one of the sorting algorithms at runtime
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Selection,
    Merge,
    Quick,
    Heap,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Selection,
        SortAlgorithm::Merge,
        SortAlgorithm::Quick,
        SortAlgorithm::Heap,
    ];

    /// Sorts `arr` with the selected algorithm
    pub fn sort_by<T, F>(self, arr: &mut [T], compare: F)
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        match self {
            SortAlgorithm::Selection => selection_sort_by(arr, compare),
            SortAlgorithm::Merge => merge_sort_by(arr, compare),
            SortAlgorithm::Quick => quick_sort_by(arr, compare),
            SortAlgorithm::Heap => heap_sort_by(arr, compare),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Selection => "selection sort",
            SortAlgorithm::Merge => "merge sort",
            SortAlgorithm::Quick => "quick sort",
            SortAlgorithm::Heap => "heap sort",
        }
    }
}

/// Binary search on a slice sorted by `key`.
/// Returns the index of *some* element whose key equals `target`, `None` if there is none.
///
/// # Examples
/// ```
/// use casework::sorting::binary_search_by_key;
///
/// let plates = ["AB-101", "CD-220", "KL-007"];
/// assert_eq!(binary_search_by_key(&plates, &"CD-220", |p| *p), Some(1));
/// assert_eq!(binary_search_by_key(&plates, &"ZZ-999", |p| *p), None);
/// ```
pub fn binary_search_by_key<T, K: Ord, F: FnMut(&T) -> K>(arr: &[T], target: &K, mut key: F) -> Option<usize> {
    let (mut l, mut r) = (0, arr.len());
    while l < r {
        let m = l + (r - l) / 2;
        match key(&arr[m]).cmp(target) {
            Ordering::Equal => return Some(m),
            Ordering::Less => l = m + 1,
            Ordering::Greater => r = m,
        }
    }
    None
}
