/// Privilege carried by an authenticated user.
///
/// Admins manage events, categories and reservation statuses;
/// participants may only book and cancel their own reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Participant,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
