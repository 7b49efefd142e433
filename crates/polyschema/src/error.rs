//! Error types shared by every domain.

/// Text could not be structurally recognized as the domain's notation.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{domain}: {message}")]
    Syntax {
        domain: &'static str,
        message: String,
    },

    #[error("{domain}: unbalanced delimiters near `{fragment}`")]
    Unbalanced {
        domain: &'static str,
        fragment: String,
    },

    #[error("{domain}: invalid JSON: {source}")]
    Json {
        domain: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "linkml")]
    #[error("{domain}: invalid YAML: {source}")]
    Yaml {
        domain: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ParseError {
    pub(crate) fn syntax(domain: &'static str, message: impl Into<String>) -> Self {
        Self::Syntax {
            domain,
            message: message.into(),
        }
    }

    /// Build an `Unbalanced` error quoting at most 40 characters of the offending text.
    pub(crate) fn unbalanced(domain: &'static str, text: &str) -> Self {
        let fragment: String = text.trim_start().chars().take(40).collect();
        Self::Unbalanced {
            domain,
            fragment: fragment.replace('\n', " "),
        }
    }

    /// Domain whose parser rejected the input.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Syntax { domain, .. }
            | Self::Unbalanced { domain, .. }
            | Self::Json { domain, .. } => domain,
            #[cfg(feature = "linkml")]
            Self::Yaml { domain, .. } => domain,
        }
    }
}

/// A domain model could not be serialized.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "linkml")]
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure anywhere in a text → text conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
