use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No {0} environment variable")]
    MissingEnv(&'static str),

    #[error("Invalid {name} environment variable: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {path} returned {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("invalid json from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{scope} annotation {name} not found")]
    AnnotationNotFound { scope: &'static str, name: String },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MetadataError::MissingEnv(_) | MetadataError::InvalidEnv { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
