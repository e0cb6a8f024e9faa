use thiserror::Error;
use threadline_sync::SyncError;
use threadline_types::PostId;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("comment section for post {0} is not mounted")]
    NotMounted(PostId),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl SectionError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Sync(SyncError::Unauthenticated))
    }
}

pub type SectionResult<T> = Result<T, SectionError>;
