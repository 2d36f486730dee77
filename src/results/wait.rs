//! Wait policies for result queries

/// How long the dispatcher should hold a result query open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wait {
    /// Answer immediately with whatever the dispatcher currently has
    #[default]
    Short,
    /// Hold the connection until the dispatch reaches a terminal state
    Long,
}

impl Wait {
    /// Whether the server is asked to block until completion
    pub fn is_blocking(self) -> bool {
        matches!(self, Wait::Long)
    }

    /// Value of the `wait` query parameter
    pub fn as_query(self) -> &'static str {
        bool_query(self.is_blocking())
    }
}

impl From<bool> for Wait {
    fn from(wait: bool) -> Self {
        if wait {
            Wait::Long
        } else {
            Wait::Short
        }
    }
}

/// Renders a boolean the way the dispatcher expects it in a query string
pub(crate) fn bool_query(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
