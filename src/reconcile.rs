use crate::User;

use std::collections::HashSet;

/// Merge the remote collection with the stored snapshot into one working list
///
/// Two passes: every remote user first, in their original order, then every
/// stored user whose id the remote side didn't already contribute. When both
/// sides carry the same id the remote record wins, even if the stored one is
/// fresher. That staleness is accepted, not a bug.
pub fn reconcile(remote: Vec<User>, stored: Vec<User>) -> Vec<User> {
    let mut seen = HashSet::new();
    remote
        .into_iter()
        .chain(stored)
        .filter(|user| seen.insert(user.id))
        .collect()
}

/// Reassign every id to its 1-based position in the current list order
///
/// Removing from the middle of the list leaves a hole; the ids are kept dense
/// instead of stable. Anything holding an old id across a delete holds a lie.
pub fn renumber(users: &mut [User]) {
    for (index, user) in users.iter_mut().enumerate() {
        user.id = index as u64 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::sample;

    fn ids(users: &[User]) -> Vec<u64> {
        users.iter().map(|user| user.id).collect()
    }

    #[test]
    fn disjoint_ids_concatenate() {
        let remote = vec![sample(1, "a"), sample(2, "b")];
        let stored = vec![sample(5, "e"), sample(9, "f")];
        let merged = reconcile(remote, stored);
        assert_eq!(ids(&merged), [1, 2, 5, 9]);
    }

    #[test]
    fn nothing_from_nothing() {
        assert!(reconcile(vec![], vec![]).is_empty());
    }

    #[test]
    fn remote_wins_duplicate_ids() {
        let remote = vec![sample(1, "fresh")];
        let stored = vec![sample(1, "stale")];
        let merged = reconcile(remote, stored);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "fresh");
    }

    #[test]
    fn two_pass_order_is_preserved() {
        let remote = vec![sample(3, "c"), sample(1, "a")];
        let stored = vec![sample(1, "stale"), sample(2, "b")];
        let merged = reconcile(remote, stored);
        assert_eq!(ids(&merged), [3, 1, 2]);
        assert_eq!(merged[1].name, "a");
    }

    #[test]
    fn renumber_is_positional() {
        let mut users = vec![sample(1, "a"), sample(3, "c"), sample(7, "g")];
        renumber(&mut users);
        assert_eq!(ids(&users), [1, 2, 3]);
        let names = users.iter().map(|user| user.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["a", "c", "g"]);
    }

    #[test]
    fn remove_then_renumber_closes_the_hole() {
        let mut users = vec![sample(1, "a"), sample(2, "b"), sample(3, "c")];
        users.retain(|user| user.id != 2);
        renumber(&mut users);
        assert_eq!(ids(&users), [1, 2]);
        assert_eq!(users[1].name, "c");
    }
}
