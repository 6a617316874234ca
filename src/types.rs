// ==================================================================================
//  Configuration
// ==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// When set, the first malformed line, invalid key or unclosed single
    /// quote aborts the parse. Off by default: bad lines are skipped.
    pub strict: bool,
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }
}
