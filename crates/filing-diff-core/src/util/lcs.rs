//! Shortest-edit-script correlation between two sequences.
//!
//! Items are compared by [`Hashable::hash`]. The script comes from Myers'
//! linear-space O(ND) divide and conquer: common prefixes and suffixes are
//! peeled off, a middle snake splits what is left, and both halves are solved
//! the same way.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

/// How a run of items relates between the two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStatus {
    /// Present in both sequences.
    Equal,
    /// Present only in the first (old) sequence.
    Deleted,
    /// Present only in the second (new) sequence.
    Inserted,
}

impl fmt::Display for CorrelationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationStatus::Equal => write!(f, "Equal"),
            CorrelationStatus::Deleted => write!(f, "Deleted"),
            CorrelationStatus::Inserted => write!(f, "Inserted"),
        }
    }
}

/// Items are compared by their hash string.
pub trait Hashable {
    fn hash(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct CorrelatedSequence<T: Hashable + Clone> {
    pub status: CorrelationStatus,
    /// Items from the first (old) sequence, `None` if inserted
    pub items1: Option<Vec<T>>,
    /// Items from the second (new) sequence, `None` if deleted
    pub items2: Option<Vec<T>>,
}

impl<T: Hashable + Clone> CorrelatedSequence<T> {
    pub fn equal(items1: Vec<T>, items2: Vec<T>) -> Self {
        Self {
            status: CorrelationStatus::Equal,
            items1: Some(items1),
            items2: Some(items2),
        }
    }

    pub fn deleted(items1: Vec<T>) -> Self {
        Self {
            status: CorrelationStatus::Deleted,
            items1: Some(items1),
            items2: None,
        }
    }

    pub fn inserted(items2: Vec<T>) -> Self {
        Self {
            status: CorrelationStatus::Inserted,
            items1: None,
            items2: Some(items2),
        }
    }
}

/// Correlates two sequences into ordered Equal / Deleted / Inserted runs.
///
/// The result is a shortest edit script, found in O((n + m) * d) time for `d`
/// differing items and linear memory. Sub-problems live on an explicit stack.
pub fn compute_correlation<T: Hashable + Clone>(
    items1: &[T],
    items2: &[T],
) -> Vec<CorrelatedSequence<T>> {
    let (old, new) = intern(items1, items2);
    let mut result = Vec::new();
    let mut tasks = vec![Task::Split(0..old.len(), 0..new.len())];

    while let Some(task) = tasks.pop() {
        match task {
            Task::Split(range1, range2) => split(&old, &new, range1, range2, &mut tasks),
            Task::Emit(CorrelationStatus::Equal, range1, range2) => result.push(CorrelatedSequence::equal(
                items1[range1].to_vec(),
                items2[range2].to_vec(),
            )),
            Task::Emit(CorrelationStatus::Deleted, range1, _) => {
                result.push(CorrelatedSequence::deleted(items1[range1].to_vec()))
            }
            Task::Emit(CorrelationStatus::Inserted, _, range2) => {
                result.push(CorrelatedSequence::inserted(items2[range2].to_vec()))
            }
        }
    }

    result
}

/// Pending work, popped in output order.
enum Task {
    Split(Range<usize>, Range<usize>),
    Emit(CorrelationStatus, Range<usize>, Range<usize>),
}

/// Maps every distinct hash to a small integer so the search compares ids.
fn intern<'a, T: Hashable>(items1: &'a [T], items2: &'a [T]) -> (Vec<u32>, Vec<u32>) {
    let mut ids: HashMap<&'a str, u32> = HashMap::new();
    let mut encode = |items: &'a [T]| -> Vec<u32> {
        items
            .iter()
            .map(|item| {
                let next = ids.len() as u32;
                *ids.entry(item.hash()).or_insert(next)
            })
            .collect()
    };
    let old = encode(items1);
    let new = encode(items2);
    (old, new)
}

fn split(old: &[u32], new: &[u32], mut range1: Range<usize>, mut range2: Range<usize>, tasks: &mut Vec<Task>) {
    let prefix = old[range1.clone()]
        .iter()
        .zip(&new[range2.clone()])
        .take_while(|(a, b)| a == b)
        .count();
    let prefix_ranges = (range1.start..range1.start + prefix, range2.start..range2.start + prefix);
    range1.start += prefix;
    range2.start += prefix;

    let suffix = old[range1.clone()]
        .iter()
        .rev()
        .zip(new[range2.clone()].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    if suffix > 0 {
        tasks.push(Task::Emit(
            CorrelationStatus::Equal,
            range1.end - suffix..range1.end,
            range2.end - suffix..range2.end,
        ));
    }
    range1.end -= suffix;
    range2.end -= suffix;

    match (range1.is_empty(), range2.is_empty()) {
        (true, true) => {}
        (true, false) => tasks.push(Task::Emit(CorrelationStatus::Inserted, range1, range2)),
        (false, true) => tasks.push(Task::Emit(CorrelationStatus::Deleted, range1, range2)),
        (false, false) => match middle_snake(&old[range1.clone()], &new[range2.clone()]) {
            // Both halves must be strictly smaller than the whole.
            Some((x, y))
                if x <= range1.len()
                    && y <= range2.len()
                    && (x, y) != (0, 0)
                    && (x, y) != (range1.len(), range2.len()) =>
            {
                let (x, y) = (range1.start + x, range2.start + y);
                tasks.push(Task::Split(x..range1.end, y..range2.end));
                tasks.push(Task::Split(range1.start..x, range2.start..y));
            }
            _ => {
                tasks.push(Task::Emit(CorrelationStatus::Inserted, range1.clone(), range2.clone()));
                tasks.push(Task::Emit(CorrelationStatus::Deleted, range1, range2));
            }
        },
    }

    if prefix > 0 {
        tasks.push(Task::Emit(CorrelationStatus::Equal, prefix_ranges.0, prefix_ranges.1));
    }
}

/// Finds a split point on an optimal edit path through `a` x `b`.
///
/// Myers' bidirectional search: forward and reverse furthest-reaching paths
/// are extended one edit at a time until they overlap on some diagonal.
fn middle_snake(a: &[u32], b: &[u32]) -> Option<(usize, usize)> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let delta = n - m;
    let odd = delta & 1 == 1;
    let d_max = (n + m + 1) / 2 + 1;
    let width = (2 * d_max + 1) as usize;
    let index = |k: isize| (k + d_max) as usize;
    let point = |x: isize, y: isize| Some((usize::try_from(x).ok()?, usize::try_from(y).ok()?));

    let mut forward = vec![0isize; width];
    let mut backward = vec![0isize; width];

    for d in 0..d_max {
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && forward[index(k - 1)] < forward[index(k + 1)]) {
                forward[index(k + 1)]
            } else {
                forward[index(k - 1)] + 1
            };
            let mut y = x - k;
            let start = (x, y);
            while x < n && y >= 0 && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            forward[index(k)] = x;
            if odd && (k - delta).abs() < d && x + backward[index(delta - k)] >= n {
                return point(start.0, start.1);
            }
            k += 2;
        }

        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && backward[index(k - 1)] < backward[index(k + 1)]) {
                backward[index(k + 1)]
            } else {
                backward[index(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y >= 0 && y < m && a[(n - x - 1) as usize] == b[(m - y - 1) as usize] {
                x += 1;
                y += 1;
            }
            backward[index(k)] = x;
            if !odd && (k - delta).abs() <= d && x + forward[index(delta - k)] >= n {
                return point(n - x, m - y);
            }
            k += 2;
        }
    }

    None
}

/// Merges adjacent sequences that share a status.
pub fn flatten_correlation<T: Hashable + Clone>(
    sequences: Vec<CorrelatedSequence<T>>,
) -> Vec<CorrelatedSequence<T>> {
    let mut result: Vec<CorrelatedSequence<T>> = Vec::with_capacity(sequences.len());

    for next in sequences {
        match result.last_mut() {
            Some(current) if current.status == next.status => {
                if let (Some(items1), Some(next_items1)) = (&mut current.items1, next.items1) {
                    items1.extend(next_items1);
                }
                if let (Some(items2), Some(next_items2)) = (&mut current.items2, next.items2) {
                    items2.extend(next_items2);
                }
            }
            _ => result.push(next),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct TestItem {
        hash: String,
    }

    impl Hashable for TestItem {
        fn hash(&self) -> &str {
            &self.hash
        }
    }

    fn items(hashes: &[&str]) -> Vec<TestItem> {
        hashes
            .iter()
            .map(|h| TestItem { hash: h.to_string() })
            .collect()
    }

    fn statuses(result: &[CorrelatedSequence<TestItem>]) -> Vec<CorrelationStatus> {
        result.iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_compute_correlation_identical() {
        let result = compute_correlation(&items(&["a", "b", "c"]), &items(&["a", "b", "c"]));
        assert_eq!(statuses(&result), vec![CorrelationStatus::Equal]);
    }

    #[test]
    fn test_compute_correlation_insertion() {
        let result = flatten_correlation(compute_correlation(&items(&["a", "c"]), &items(&["a", "b", "c"])));
        assert_eq!(
            statuses(&result),
            vec![CorrelationStatus::Equal, CorrelationStatus::Inserted, CorrelationStatus::Equal]
        );
    }

    #[test]
    fn test_compute_correlation_replacement_in_middle() {
        let result = flatten_correlation(compute_correlation(
            &items(&["p", "q", "old", "r", "s", "t"]),
            &items(&["p", "q", "new", "r", "s", "t"]),
        ));
        assert_eq!(
            statuses(&result),
            vec![
                CorrelationStatus::Equal,
                CorrelationStatus::Deleted,
                CorrelationStatus::Inserted,
                CorrelationStatus::Equal
            ]
        );
        assert_eq!(result[1].items1.as_ref().unwrap()[0].hash, "old");
        assert_eq!(result[2].items2.as_ref().unwrap()[0].hash, "new");
    }

    #[test]
    fn test_compute_correlation_empty_sides() {
        let inserted = compute_correlation(&items(&[]), &items(&["a", "b"]));
        assert_eq!(statuses(&inserted), vec![CorrelationStatus::Inserted]);

        let deleted = compute_correlation(&items(&["a", "b"]), &items(&[]));
        assert_eq!(statuses(&deleted), vec![CorrelationStatus::Deleted]);

        assert!(compute_correlation(&items(&[]), &items(&[])).is_empty());
    }

    fn edit_count(result: &[CorrelatedSequence<TestItem>]) -> usize {
        result
            .iter()
            .map(|s| match s.status {
                CorrelationStatus::Equal => 0,
                CorrelationStatus::Deleted => s.items1.as_ref().map_or(0, Vec::len),
                CorrelationStatus::Inserted => s.items2.as_ref().map_or(0, Vec::len),
            })
            .sum()
    }

    fn side(result: &[CorrelatedSequence<TestItem>], skip: CorrelationStatus) -> Vec<String> {
        result
            .iter()
            .filter(|s| s.status != skip)
            .flat_map(|s| match s.status {
                CorrelationStatus::Inserted => s.items2.clone().unwrap_or_default(),
                _ => s.items1.clone().or_else(|| s.items2.clone()).unwrap_or_default(),
            })
            .map(|item| item.hash)
            .collect()
    }

    #[test]
    fn test_compute_correlation_is_shortest() {
        // Classic example with an edit distance of 5.
        let old = items(&["a", "b", "c", "a", "b", "b", "a"]);
        let new = items(&["c", "b", "a", "b", "a", "c"]);
        let result = compute_correlation(&old, &new);

        assert_eq!(edit_count(&result), 5);
        assert_eq!(side(&result, CorrelationStatus::Inserted), vec!["a", "b", "c", "a", "b", "b", "a"]);
        assert_eq!(side(&result, CorrelationStatus::Deleted), vec!["c", "b", "a", "b", "a", "c"]);
    }

    #[test]
    fn test_compute_correlation_disjoint() {
        let result = flatten_correlation(compute_correlation(&items(&["a", "b"]), &items(&["x", "y", "z"])));
        assert_eq!(statuses(&result), vec![CorrelationStatus::Deleted, CorrelationStatus::Inserted]);
    }

    #[test]
    fn test_compute_correlation_scattered_edits() {
        let old: Vec<String> = (0..3000).map(|i| format!("w{}", i)).collect();
        let new: Vec<String> = (0..3000)
            .map(|i| if i % 7 == 3 { format!("x{}", i) } else { format!("w{}", i) })
            .collect();
        let old = items(&old.iter().map(String::as_str).collect::<Vec<_>>());
        let new = items(&new.iter().map(String::as_str).collect::<Vec<_>>());

        let result = compute_correlation(&old, &new);
        assert_eq!(edit_count(&result), 2 * (0..3000).filter(|i| i % 7 == 3).count());
    }

    #[test]
    fn test_flatten_merges_adjacent_same_status() {
        let sequences = vec![
            CorrelatedSequence::deleted(items(&["a"])),
            CorrelatedSequence::deleted(items(&["b"])),
            CorrelatedSequence::equal(items(&["c"]), items(&["c"])),
        ];

        let result = flatten_correlation(sequences);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].status, CorrelationStatus::Deleted);
        assert_eq!(result[0].items1.as_ref().unwrap().len(), 2);
        assert_eq!(result[1].status, CorrelationStatus::Equal);
    }
}
