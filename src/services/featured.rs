/// How many posts may carry the featured flag at once. The landing
/// page has exactly this many highlighted slots.
pub const FEATURED_LIMIT: usize = 2;

/// Decides whether a post's featured flag may be set to `requested`.
///
/// The only guarded transition is not-featured to featured: it is
/// denied once `current_count` has reached the cap. Un-featuring and
/// no-op writes are always allowed, so a record already in the
/// featured set can be re-saved even while the set is full.
///
/// Pure decision function; the caller supplies the current count of
/// featured posts and performs (or rejects) the actual write.
pub fn can_set_featured(current_count: usize, requested: bool, current: bool) -> bool {
    if !requested || current {
        return true;
    }
    current_count < FEATURED_LIMIT
}
