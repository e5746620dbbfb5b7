use crate::models::User;

/// Who is using the app right now.
///
/// Holds at most one resolved [`User`]. Signing in replaces the previous
/// identity; nothing here talks to an identity provider.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, user: User) -> &User {
        tracing::info!(user_id = %user.id, provider = %user.provider, "Signed in");
        self.current.insert(user)
    }

    /// Continue without authenticating.
    pub fn guest(&mut self) -> &User {
        self.sign_in(User::guest())
    }

    /// End the session, returning who was signed in.
    pub fn sign_out(&mut self) -> Option<User> {
        let previous = self.current.take();
        if let Some(user) = &previous {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        previous
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current.as_ref().map(|user| user.id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }
}
