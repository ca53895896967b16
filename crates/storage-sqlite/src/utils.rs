//! Helpers for building SQLite `IN (...)` queries.

/// Parameters bound per `IN (...)` query, well under SQLITE_MAX_VARIABLE_NUMBER.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` so each chunk fits in one `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// `?, ?, ?` for `count` parameters.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
