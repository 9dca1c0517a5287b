//! Glob matching for invalidation patterns
//!
//! Patterns use `*` as the only wildcard; it matches any run of
//! characters, including none. This is the subset of Redis `KEYS`
//! syntax that invalidation relies on, so the in-memory backend and
//! Redis agree on which keys a pattern covers.

/// Checks whether `key` is covered by `pattern`
///
/// ```
/// use cache_system::pattern_matches;
///
/// assert!(pattern_matches("tickets:*", "tickets:{\"city\":\"Rome\"}"));
/// assert!(!pattern_matches("tickets:*", "tours:{}"));
/// assert!(pattern_matches("ticket:42", "ticket:42"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').collect();
    let last = segments.len() - 1;
    let mut remaining = key;

    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            match remaining.strip_prefix(segment) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if i == last {
            return remaining.ends_with(segment);
        } else if !segment.is_empty() {
            match remaining.find(segment) {
                Some(pos) => remaining = &remaining[pos + segment.len()..],
                None => return false,
            }
        }
    }

    true
}

/// Escape Redis glob metacharacters other than `*`
///
/// Canonical filter JSON can contain `[` or `?`, which Redis would read
/// as character classes or single-char wildcards.
pub(crate) fn escape_for_redis(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if matches!(ch, '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
