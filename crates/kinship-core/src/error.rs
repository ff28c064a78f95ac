use std::fmt;

/// Errors surfaced by graph queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The label was never added to the graph.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
        }
    }
}

/// Stable `E####` identifiers printed alongside every CLI failure.
///
/// `E1xxx` covers bad input (config or edge list), `E2xxx` covers queries
/// that cannot be answered against the loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidConfig,
    InputParseError,
    UnknownNode,
    StaleAnalysis,
}

impl ErrorCode {
    pub const ALL: [Self; 5] = [
        Self::ConfigParseError,
        Self::InvalidConfig,
        Self::InputParseError,
        Self::UnknownNode,
        Self::StaleAnalysis,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidConfig => "E1002",
            Self::InputParseError => "E1003",
            Self::UnknownNode => "E2001",
            Self::StaleAnalysis => "E2002",
        }
    }

    /// One-line title, e.g. for a log field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "config is not valid TOML",
            Self::InvalidConfig => "analysis parameter out of range",
            Self::InputParseError => "malformed edge list",
            Self::UnknownNode => "node not in graph",
            Self::StaleAnalysis => "analysis computed for another graph",
        }
    }

    /// What the user can do about it, when there is something to do.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the config TOML and retry."),
            Self::InvalidConfig => {
                Some("Damping must lie in [0, 1) and tolerance must be positive.")
            }
            Self::InputParseError => {
                Some("Use one node (`alice`) or one edge (`alice bob`) per line.")
            }
            Self::UnknownNode => None,
            Self::StaleAnalysis => Some("Recompute the analysis after the graph changes."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
