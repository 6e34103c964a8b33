/// Default number of backtrace levels kept by `dump_backtrace`.
pub const DEFAULT_BACKTRACE_DEPTH: usize = 90;

/// Default width of the interactive separator line.
pub const DEFAULT_SEPARATOR_WIDTH: usize = 80;

/// Tunables for a [`Dumper`](crate::Dumper).
///
/// # Examples
///
/// ```
/// use debug_gate::DumpConfig;
///
/// let config = DumpConfig::default()
///     .with_backtrace_depth(10)
///     .with_separator_width(40);
///
/// assert_eq!(config.backtrace_depth, 10);
/// assert_eq!(config.max_render_depth, 32);
/// assert!(config.allow_interactive_bypass);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpConfig {
    /// Highest backtrace level kept (levels `0..=backtrace_depth`)
    pub backtrace_depth: usize,
    /// Nesting depth at which rendering stops descending
    pub max_render_depth: usize,
    /// Number of `=` characters in the interactive separator
    pub separator_width: usize,
    /// Whether interactive execution skips the address check
    pub allow_interactive_bypass: bool,
}

impl DumpConfig {
    /// Sets the highest backtrace level kept.
    pub fn with_backtrace_depth(mut self, depth: usize) -> Self {
        self.backtrace_depth = depth;
        self
    }

    /// Sets the rendering depth bound.
    pub fn with_max_render_depth(mut self, depth: usize) -> Self {
        self.max_render_depth = depth;
        self
    }

    /// Sets the separator width.
    pub fn with_separator_width(mut self, width: usize) -> Self {
        self.separator_width = width;
        self
    }

    /// Enables or disables the interactive bypass.
    pub fn with_interactive_bypass(mut self, allow: bool) -> Self {
        self.allow_interactive_bypass = allow;
        self
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            backtrace_depth: DEFAULT_BACKTRACE_DEPTH,
            max_render_depth: crate::render::DEFAULT_MAX_DEPTH,
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            allow_interactive_bypass: true,
        }
    }
}
