//! Abstractions for pagination.

/// Page window described by a limit and an offset.
///
/// A [`Window`] is always clamped: its limit is positive and its offset is
/// non-negative.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// Maximum number of items in the page.
    limit: i64,

    /// Number of items to skip before the page starts.
    offset: i64,
}

impl Window {
    /// Limit used when a non-positive one is requested.
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Creates a new [`Window`] out of raw `limit` and `offset` values.
    ///
    /// Non-positive `limit` is replaced with [`Window::DEFAULT_LIMIT`], and
    /// negative `offset` is replaced with `0`.
    #[must_use]
    pub const fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: if limit > 0 { limit } else { Self::DEFAULT_LIMIT },
            offset: if offset > 0 { offset } else { 0 },
        }
    }

    /// Returns the limit of this [`Window`].
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Returns the offset of this [`Window`].
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod spec {
    use super::Window;

    #[test]
    fn keeps_valid_values() {
        let w = Window::new(25, 5);
        assert_eq!(w.limit(), 25);
        assert_eq!(w.offset(), 5);
    }

    #[test]
    fn clamps_non_positive_limit() {
        assert_eq!(Window::new(0, 0).limit(), 10);
        assert_eq!(Window::new(-1, 0).limit(), 10);
        assert_eq!(Window::new(i64::MIN, 3), Window::new(10, 3));
    }

    #[test]
    fn clamps_negative_offset() {
        assert_eq!(Window::new(0, -5), Window::new(10, 0));
        assert_eq!(Window::new(7, -1).offset(), 0);
    }
}
