//! Comment section for Threadline.
//!
//! The composition root a UI embeds under a content item. A
//! [`CommentSection`] polls one post through a [`SyncController`], turns the
//! synchronized flat list into a reply forest, and exposes everything a
//! renderer needs as a [`SectionView`]: the thread (or its loading / error
//! state), the compose form or a sign-in notice, and the last post error.

pub mod error;
pub mod section;
pub mod view;

pub use error::{SectionError, SectionResult};
pub use section::CommentSection;
pub use view::{Composer, SectionView, ThreadBody, SIGN_IN_NOTICE};

// Re-export the types a front end needs alongside the section.
pub use threadline_store::{CommentStore, InMemoryCommentStore, RestCommentStore, RestStoreConfig};
pub use threadline_sync::{
    IdentityProvider, SessionIdentity, StaticIdentity, SyncConfig, SyncController,
};
pub use threadline_tree::{walk, CommentNode};
pub use threadline_types::{Comment, CommentDraft, CommentId, Identity, PostId};
