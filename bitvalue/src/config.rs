//! Rendering and search defaults.

/// Default number of hex digits shown before a rendered value is truncated.
pub const DEFAULT_MAX_CHARS: usize = 250;

/// Knobs shared by rendering and searching.
///
/// ```
/// use bitvalue::Config;
///
/// let config = Config::default().with_max_chars(8).with_byte_aligned(true);
/// assert_eq!(config.max_chars, 8);
/// assert!(config.byte_aligned);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Hex digits rendered before `Display` truncates with `...`
    pub max_chars: usize,
    /// Whether searches only report matches starting on a byte boundary
    pub byte_aligned: bool,
}

impl Config {
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    #[must_use]
    pub fn with_byte_aligned(mut self, byte_aligned: bool) -> Self {
        self.byte_aligned = byte_aligned;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            byte_aligned: false,
        }
    }
}
