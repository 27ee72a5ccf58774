// Basic unified line diff, used when no graphical viewer is installed
// Myers O(ND) shortest edit script over the lines left after trimming common prefix and suffix

use std::fmt::Write;

/// One step of an edit script, indices into the left and right inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Equal { left: usize, right: usize },
    Delete { left: usize },
    Insert { right: usize },
}

/// Shortest edit script turning `left` into `right`
pub fn edit_script<S: AsRef<str>>(left: &[S], right: &[S]) -> Vec<Edit> {
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();

    let mut edits: Vec<Edit> = (0..prefix)
        .map(|i| Edit::Equal { left: i, right: i })
        .collect();

    let left_mid = &left[prefix..left.len() - suffix];
    let right_mid = &right[prefix..right.len() - suffix];
    edits.extend(myers(left_mid, right_mid).into_iter().map(|edit| match edit {
        Edit::Equal { left, right } => Edit::Equal {
            left: left + prefix,
            right: right + prefix,
        },
        Edit::Delete { left } => Edit::Delete { left: left + prefix },
        Edit::Insert { right } => Edit::Insert { right: right + prefix },
    }));

    let left_tail = left.len() - suffix;
    let right_tail = right.len() - suffix;
    edits.extend((0..suffix).map(|i| Edit::Equal {
        left: left_tail + i,
        right: right_tail + i,
    }));
    edits
}

fn myers<S: AsRef<str>>(a: &[S], b: &[S]) -> Vec<Edit> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max as usize;
    let mut v = vec![0isize; 2 * offset + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    // Forward pass, recording the furthest-reaching x per diagonal before each round
    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let idx = (k + max) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize].as_ref() == b[y as usize].as_ref() {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    // Backtrack from the end through the recorded rounds
    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let idx = (k + max) as usize;
        let prev_k = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + max) as usize];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            edits.push(Edit::Equal {
                left: x as usize,
                right: y as usize,
            });
        }
        if d > 0 {
            if x == prev_x {
                edits.push(Edit::Insert {
                    right: (y - 1) as usize,
                });
            } else {
                edits.push(Edit::Delete {
                    left: (x - 1) as usize,
                });
            }
        }
        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

/// Render a unified diff with `context` lines around each change; empty when inputs are equal
pub fn unified_diff<S: AsRef<str>>(
    left_label: &str,
    right_label: &str,
    left: &[S],
    right: &[S],
    context: usize,
) -> String {
    let edits = edit_script(left, right);
    let changes: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, edit)| !matches!(edit, Edit::Equal { .. }))
        .map(|(i, _)| i)
        .collect();
    if changes.is_empty() {
        return String::new();
    }

    // Lines of each side consumed before edit i
    let mut left_pos = Vec::with_capacity(edits.len() + 1);
    let mut right_pos = Vec::with_capacity(edits.len() + 1);
    let (mut l, mut r) = (0usize, 0usize);
    for edit in &edits {
        left_pos.push(l);
        right_pos.push(r);
        match edit {
            Edit::Equal { .. } => {
                l += 1;
                r += 1;
            }
            Edit::Delete { .. } => l += 1,
            Edit::Insert { .. } => r += 1,
        }
    }
    left_pos.push(l);
    right_pos.push(r);

    let mut out = String::new();
    let _ = writeln!(out, "--- {left_label}");
    let _ = writeln!(out, "+++ {right_label}");

    let mut group_start = 0;
    while group_start < changes.len() {
        // Merge changes whose context windows touch
        let mut group_end = group_start;
        while group_end + 1 < changes.len()
            && changes[group_end + 1] - changes[group_end] <= 2 * context + 1
        {
            group_end += 1;
        }

        let first = changes[group_start].saturating_sub(context);
        let last = (changes[group_end] + context + 1).min(edits.len());

        let left_count = left_pos[last] - left_pos[first];
        let right_count = right_pos[last] - right_pos[first];
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            hunk_range(left_pos[first], left_count),
            hunk_range(right_pos[first], right_count)
        );

        for edit in &edits[first..last] {
            let _ = match *edit {
                Edit::Equal { left: i, .. } => writeln!(out, " {}", left[i].as_ref()),
                Edit::Delete { left: i } => writeln!(out, "-{}", left[i].as_ref()),
                Edit::Insert { right: i } => writeln!(out, "+{}", right[i].as_ref()),
            };
        }

        group_start = group_end + 1;
    }

    out
}

/// `start,count` with 1-based start; an empty range names the line before it
fn hunk_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(left: &[&str], right: &[&str], edits: &[Edit]) -> Vec<String> {
        edits
            .iter()
            .filter_map(|edit| match *edit {
                Edit::Equal { left: i, .. } => Some(left[i].to_string()),
                Edit::Insert { right: i } => Some(right[i].to_string()),
                Edit::Delete { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_equal_inputs_produce_no_diff() {
        let lines = ["a", "b", "c"];
        assert_eq!(unified_diff("l", "r", &lines, &lines, 3), "");
        let empty: [&str; 0] = [];
        assert_eq!(unified_diff("l", "r", &empty, &empty, 3), "");
    }

    #[test]
    fn test_edit_script_reconstructs_right() {
        let cases: [(&[&str], &[&str]); 5] = [
            (&["a", "b", "c", "a", "b", "b", "a"], &["c", "b", "a", "b", "a", "c"]),
            (&[], &["x", "y"]),
            (&["x", "y"], &[]),
            (&["same", "old", "same"], &["same", "new", "same"]),
            (&["a"], &["b"]),
        ];
        for (left, right) in cases {
            let edits = edit_script(left, right);
            assert_eq!(apply(left, right, &edits), right.to_vec(), "{left:?} -> {right:?}");
            let deletes = edits.iter().filter(|e| matches!(e, Edit::Delete { .. })).count();
            assert_eq!(edits.len() - deletes, right.len());
        }
    }

    #[test]
    fn test_minimal_script_length() {
        // Classic example: D = 5
        let left = ["a", "b", "c", "a", "b", "b", "a"];
        let right = ["c", "b", "a", "b", "a", "c"];
        let changes = edit_script(&left, &right)
            .iter()
            .filter(|e| !matches!(e, Edit::Equal { .. }))
            .count();
        assert_eq!(changes, 5);
    }

    #[test]
    fn test_single_change_hunk() {
        let left = ["one", "two", "three", "four", "five", "six", "seven", "eight"];
        let right = ["one", "two", "three", "four", "5", "six", "seven", "eight"];
        let diff = unified_diff("left.txt", "right.txt", &left, &right, 3);
        assert_eq!(
            diff,
            "--- left.txt\n+++ right.txt\n@@ -2,7 +2,7 @@\n two\n three\n four\n-five\n+5\n six\n seven\n eight\n"
        );
    }

    #[test]
    fn test_separate_hunks() {
        let left: Vec<String> = (1..=20).map(|i| i.to_string()).collect();
        let mut right = left.clone();
        right[1] = "two".to_string();
        right[17] = "eighteen".to_string();
        let diff = unified_diff("l", "r", &left, &right, 1);
        assert_eq!(
            diff,
            "--- l\n+++ r\n@@ -1,3 +1,3 @@\n 1\n-2\n+two\n 3\n@@ -17,3 +17,3 @@\n 17\n-18\n+eighteen\n 19\n"
        );
    }

    #[test]
    fn test_pure_insertion_header() {
        let left = ["a", "b"];
        let right = ["a", "b", "c"];
        let diff = unified_diff("l", "r", &left, &right, 0);
        assert_eq!(diff, "--- l\n+++ r\n@@ -2,0 +3 @@\n+c\n");
    }
}
