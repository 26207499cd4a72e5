use atelier_core::SubjectId;

use crate::role::Role;

/// Optional contact attributes carried on a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAttributes {
    pub phone: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub experience: Option<String>,
}

/// Authenticated request context: validated identity plus resolved profile.
///
/// Built by the [`Authenticator`](crate::Authenticator) once per request,
/// after both the identity provider and the profile store have answered.
/// Immutable afterwards, owned by the request that produced it, and passed to
/// handlers explicitly. Downstream code must not consult any other source for
/// authorization-relevant data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    subject_id: SubjectId,
    email: String,
    display_name: String,
    role: Role,
    attributes: ProfileAttributes,
}

impl AuthContext {
    /// Assemble a context from fully resolved parts.
    ///
    /// Every field is required; there is no way to build a context from
    /// partial data.
    pub fn new(
        subject_id: SubjectId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        attributes: ProfileAttributes,
    ) -> Self {
        Self {
            subject_id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            attributes,
        }
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn attributes(&self) -> &ProfileAttributes {
        &self.attributes
    }
}
