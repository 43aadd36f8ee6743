//! Identity Entity
//!
//! A user account: profile, role, credential and the optional reset ticket.

use chrono::{DateTime, Utc};

use crate::domain::entity::reset_ticket::ResetTicket;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, identity_id::IdentityId, role::Role,
    user_password::UserPassword,
};

/// Photo assigned to accounts that never set one
pub const DEFAULT_PHOTO: &str = "https://i.pravatar.cc/300";

#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub name: DisplayName,
    /// Unique across identities
    pub email: Email,
    pub photo: String,
    pub role: Role,
    pub password: UserPassword,
    /// Last password change. `None` until the first change after signup.
    pub password_changed_at: Option<DateTime<Utc>>,
    pub reset_ticket: Option<ResetTicket>,
    /// `false` once the owner deleted the account
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Row version this snapshot was read at. Bumped by every successful save,
    /// and a save from an older snapshot is refused.
    pub version: i64,
}

impl Identity {
    /// New `user`-role identity
    pub fn new(name: DisplayName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            id: IdentityId::new(),
            name,
            email,
            photo: DEFAULT_PHOTO.to_string(),
            role: Role::User,
            password,
            password_changed_at: None,
            reset_ticket: None,
            active: true,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Replace the credential. Any pending reset ticket is voided.
    pub fn change_password(&mut self, password: UserPassword, now: DateTime<Utc>) {
        self.password = password;
        self.password_changed_at = Some(now);
        self.reset_ticket = None;
        self.updated_at = now;
    }

    /// Swap in a rehashed credential without touching `password_changed_at`
    pub fn upgrade_password_hash(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    /// True if the password changed after a token issued at `issued_at`
    /// (unix seconds). Comparison is in whole seconds, so a token minted in
    /// the same second as the change stays valid.
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| changed.timestamp() > issued_at)
    }

    /// Attach a ticket, replacing any previous one
    pub fn set_reset_ticket(&mut self, ticket: ResetTicket) {
        self.reset_ticket = Some(ticket);
        self.updated_at = Utc::now();
    }

    pub fn clear_reset_ticket(&mut self) {
        self.reset_ticket = None;
        self.updated_at = Utc::now();
    }

    pub fn update_profile(
        &mut self,
        name: Option<DisplayName>,
        email: Option<Email>,
        photo: Option<String>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(photo) = photo {
            self.photo = photo;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;
    use chrono::Duration;
    use platform::password::HashCost;

    fn identity() -> Identity {
        let raw = RawPassword::new("first-pass-9!".to_string()).unwrap();
        Identity::new(
            DisplayName::new("Jonas").unwrap(),
            Email::new("jonas@example.com").unwrap(),
            UserPassword::from_raw(&raw, &HashCost::minimal()).unwrap(),
        )
    }

    #[test]
    fn test_new_identity_defaults() {
        let identity = identity();
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.photo, DEFAULT_PHOTO);
        assert!(identity.active);
        assert!(identity.password_changed_at.is_none());
        assert!(identity.reset_ticket.is_none());
        assert_eq!(identity.version, 0);
    }

    #[test]
    fn test_changed_password_after_whole_seconds() {
        let mut identity = identity();
        assert!(!identity.changed_password_after(0));

        let changed = Utc::now();
        let raw = RawPassword::new("second-pass-9!".to_string()).unwrap();
        let password = UserPassword::from_raw(&raw, &HashCost::minimal()).unwrap();
        identity.change_password(password, changed);

        let secs = changed.timestamp();
        assert!(identity.changed_password_after(secs - 1));
        assert!(!identity.changed_password_after(secs));
        assert!(!identity.changed_password_after(secs + 1));
    }

    #[test]
    fn test_change_password_voids_reset_ticket() {
        let mut identity = identity();
        let (_, ticket) = ResetTicket::generate(Utc::now(), Duration::minutes(10));
        identity.set_reset_ticket(ticket);
        assert!(identity.reset_ticket.is_some());

        let raw = RawPassword::new("second-pass-9!".to_string()).unwrap();
        let password = UserPassword::from_raw(&raw, &HashCost::minimal()).unwrap();
        identity.change_password(password, Utc::now());
        assert!(identity.reset_ticket.is_none());
    }

    #[test]
    fn test_update_profile_is_partial() {
        let mut identity = identity();
        identity.update_profile(None, None, Some("https://img.example/me.png".into()));
        assert_eq!(identity.name.as_str(), "Jonas");
        assert_eq!(identity.photo, "https://img.example/me.png");
    }
}
