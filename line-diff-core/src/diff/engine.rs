use crate::diff::result::DiffRow;

/// Align two line sequences with a longest-common-subsequence walk.
///
/// Rows come out in the original order of both sides. Between two matched
/// lines, deletions and insertions are paired positionally into
/// [`DiffRow::Changed`] rows; whichever side is longer contributes the
/// trailing [`DiffRow::Removed`] / [`DiffRow::Added`] leftovers.
pub fn diff_lines(left: &[String], right: &[String]) -> Vec<DiffRow> {
    let lengths = lcs_lengths(left, right);
    let width = right.len() + 1;

    let mut rows = Vec::with_capacity(left.len().max(right.len()));
    let mut pending_left: Vec<String> = Vec::new();
    let mut pending_right: Vec<String> = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < left.len() && j < right.len() {
        if left[i] == right[j] {
            flush_pending(&mut rows, &mut pending_left, &mut pending_right);
            rows.push(DiffRow::Unchanged {
                line: left[i].clone(),
            });
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
            pending_left.push(left[i].clone());
            i += 1;
        } else {
            pending_right.push(right[j].clone());
            j += 1;
        }
    }
    pending_left.extend(left[i..].iter().cloned());
    pending_right.extend(right[j..].iter().cloned());
    flush_pending(&mut rows, &mut pending_left, &mut pending_right);

    rows
}

/// LCS length table, indexed `[i * (right.len() + 1) + j]`, where the cell
/// holds the LCS length of `left[i..]` against `right[j..]`.
fn lcs_lengths(left: &[String], right: &[String]) -> Vec<u32> {
    let width = right.len() + 1;
    let mut lengths = vec![0u32; (left.len() + 1) * width];

    for i in (0..left.len()).rev() {
        for j in (0..right.len()).rev() {
            lengths[i * width + j] = if left[i] == right[j] {
                lengths[(i + 1) * width + j + 1] + 1
            } else {
                lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
            };
        }
    }

    lengths
}

/// Drain queued one-sided lines into rows, pairing by position.
fn flush_pending(rows: &mut Vec<DiffRow>, lefts: &mut Vec<String>, rights: &mut Vec<String>) {
    let paired = lefts.len().min(rights.len());
    let left_rest = lefts.split_off(paired);
    let right_rest = rights.split_off(paired);

    for (left, right) in lefts.drain(..).zip(rights.drain(..)) {
        rows.push(DiffRow::Changed { left, right });
    }
    for right in right_rest {
        rows.push(DiffRow::Added { right });
    }
    for left in left_rest {
        rows.push(DiffRow::Removed { left });
    }
}
