//! Pure reorder algorithms.
//!
//! Every function here takes the shape of a list (its length, or a per-index
//! selection mask) and returns the new order as a permutation of the original
//! indices: `order[k]` is the original index of the item that ends up at
//! position `k`. `None` means the operation is a no-op, so callers can apply a
//! result wholesale or not at all.

use super::Direction;

/// Move the item at `from` to position `to`, shifting everything in between.
pub fn move_element(len: usize, from: usize, to: usize) -> Option<Vec<usize>> {
    if from >= len || to >= len || from == to {
        return None;
    }

    let mut order: Vec<usize> = (0..len).collect();
    let item = order.remove(from);
    order.insert(to, item);
    Some(order)
}

/// Exchange the items at positions `a` and `b`.
pub fn swap(len: usize, a: usize, b: usize) -> Option<Vec<usize>> {
    if a >= len || b >= len || a == b {
        return None;
    }

    let mut order: Vec<usize> = (0..len).collect();
    order.swap(a, b);
    Some(order)
}

/// Swap the item at `index` with its neighbor in `direction`.
///
/// No-op when the item is already first (moving up) or last (moving down).
pub fn step(len: usize, index: usize, direction: Direction) -> Option<Vec<usize>> {
    let neighbor = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    swap(len, index, neighbor)
}

/// Split indices into the selected and unselected sub-sequences, each in
/// original order.
fn partition(selected: &[bool]) -> (Vec<usize>, Vec<usize>) {
    (0..selected.len()).partition(|&i| selected[i])
}

fn splice(unselected: &[usize], group: &[usize], at: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(unselected.len() + group.len());
    order.extend_from_slice(&unselected[..at]);
    order.extend_from_slice(group);
    order.extend_from_slice(&unselected[at..]);
    order
}

fn changed(order: Vec<usize>) -> Option<Vec<usize>> {
    let identity = order.iter().enumerate().all(|(k, &i)| k == i);
    (!identity).then_some(order)
}

/// Move the selected items one step as a contiguous block.
///
/// Moving up splices the whole group immediately before the unselected item
/// that precedes the topmost selected item (the anchor). Moving down splices
/// it immediately after the unselected item that follows the bottommost one.
/// Gaps between selected items close up in the process. No-op when the group
/// already touches the boundary it is moving towards.
pub fn move_group(selected: &[bool], direction: Direction) -> Option<Vec<usize>> {
    let (group, unselected) = partition(selected);
    let (&first, &last) = (group.first()?, group.last()?);

    let at = match direction {
        Direction::Up => {
            let anchor = first.checked_sub(1)?;
            unselected.iter().position(|&i| i == anchor)?
        }
        Direction::Down => {
            let anchor = last + 1;
            if anchor >= selected.len() {
                return None;
            }
            unselected.iter().position(|&i| i == anchor)? + 1
        }
    };

    changed(splice(&unselected, &group, at))
}

/// Drop a dragged selection group onto the item at `over`.
///
/// `active` is the index of the item the drag started from. When `over` is
/// unselected, the group lands after it if the drag went downwards
/// (`active < over`) and before it otherwise. When `over` is itself selected,
/// `active` and `over` simply swap places.
pub fn drop_group(selected: &[bool], active: usize, over: usize) -> Option<Vec<usize>> {
    let len = selected.len();
    if active >= len || over >= len || active == over {
        return None;
    }

    if selected[over] {
        return swap(len, active, over);
    }

    let (group, unselected) = partition(selected);
    let target = unselected.iter().position(|&i| i == over)?;
    let at = if active < over { target + 1 } else { target };

    changed(splice(&unselected, &group, at))
}
