/// Every error scour can produce. Non-fatal match conditions (no match, end
/// of input, short reads) are reported in-band through accessor values, so
/// this enum only covers construction-time failures.
#[derive(Debug)]
pub enum ScourError {
    /// A pattern expression failed to compile into an engine.
    Pattern { pattern: String, reason: String },
}

impl std::fmt::Display for ScourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern { pattern, reason } => {
                write!(f, "invalid pattern \"{pattern}\": {reason}")
            }
        }
    }
}

impl std::error::Error for ScourError {}
