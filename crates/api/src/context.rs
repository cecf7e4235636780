use std::sync::Arc;

use banksy_accounts::User;
use banksy_core::UserId;

/// Authenticated user for a request.
///
/// Inserted by the auth middleware after token verification and
/// upsert-on-first-seen; present on every route behind the middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(Arc<User>);

impl CurrentUser {
    pub fn new(user: User) -> Self {
        Self(Arc::new(user))
    }

    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}
