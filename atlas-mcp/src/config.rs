//! Process-wide response and paging limits

/// Maximum characters in a tool response's text
pub const DEFAULT_CHARACTER_LIMIT: usize = 25_000;
/// `find` limit when the caller supplies none
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Upper bound for `find` limits
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Read-only numeric configuration, loaded once at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Responses longer than this are truncated
    pub character_limit: usize,
    /// Default `find` limit
    pub default_page_size: u64,
    /// Maximum `find` limit
    pub max_page_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            character_limit: DEFAULT_CHARACTER_LIMIT,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Limits {
    /// Load from `CHARACTER_LIMIT`, `DEFAULT_PAGE_SIZE` and `MAX_PAGE_SIZE`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    ///
    /// Missing, non-numeric or zero values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn positive<T: std::str::FromStr + PartialOrd + Default>(value: Option<String>) -> Option<T> {
            value
                .and_then(|v| v.trim().parse::<T>().ok())
                .filter(|v| *v > T::default())
        }

        let character_limit =
            positive(lookup("CHARACTER_LIMIT")).unwrap_or(DEFAULT_CHARACTER_LIMIT);
        let max_page_size = positive(lookup("MAX_PAGE_SIZE")).unwrap_or(MAX_PAGE_SIZE);
        let default_page_size = positive(lookup("DEFAULT_PAGE_SIZE"))
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_page_size);

        Self {
            character_limit,
            default_page_size,
            max_page_size,
        }
    }

    /// Effective `find` limit: the default when absent, else clamped to `[1, max]`
    pub fn page_limit(&self, requested: Option<i64>) -> u64 {
        match requested {
            None => self.default_page_size,
            Some(n) if n < 1 => 1,
            Some(n) => (n as u64).min(self.max_page_size),
        }
    }
}
