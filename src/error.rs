use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can stop a run. None of these are recovered from locally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("{resource} not found in namespace {namespace}")]
    NotFound { resource: String, namespace: String },

    #[error("failed to access {resource}: {source}")]
    Access {
        resource: String,
        #[source]
        source: BoxError,
    },

    #[error("unable to resolve environment variable value for {0}")]
    Unresolvable(String),
}

impl Error {
    pub fn access(resource: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Access {
            resource: resource.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
