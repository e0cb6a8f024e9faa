use std::sync::RwLock;

use threadline_types::Identity;

/// Source of the signed-in principal, read synchronously at post time.
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> Option<Identity>;
}

/// A fixed identity, or a fixed absence of one.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity(Option<Identity>);

impl StaticIdentity {
    pub fn signed_in(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<Identity> {
        self.0.clone()
    }
}

/// An identity that can change at runtime (sign-in / sign-out).
#[derive(Debug, Default)]
pub struct SessionIdentity {
    current: RwLock<Option<Identity>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: Identity) {
        *self.current.write().expect("lock poisoned") = Some(identity);
    }

    pub fn sign_out(&self) {
        *self.current.write().expect("lock poisoned") = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current(&self) -> Option<Identity> {
        self.current.read().expect("lock poisoned").clone()
    }
}
