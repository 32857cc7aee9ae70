use thiserror::Error;

/// The pipeline step that was running when a run aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Authenticate,
    FetchProfile,
    Archive,
    WriteArtifact,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Authenticate => write!(f, "authenticate"),
            PipelineStage::FetchProfile => write!(f, "fetch profile"),
            PipelineStage::Archive => write!(f, "archive"),
            PipelineStage::WriteArtifact => write!(f, "write artifact"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TiqError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<TiqError>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl TiqError {
    /// Tag an error with the stage it escaped from. Already-tagged errors keep
    /// their original stage.
    pub fn at(self, stage: PipelineStage) -> Self {
        match self {
            TiqError::Stage { .. } => self,
            other => TiqError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was tagged with, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            TiqError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type TiqResult<T> = Result<T, TiqError>;
