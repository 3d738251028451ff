//! Session persistence on top of the key/value table.
//!
//! A session is stored as two independent keys, `token` and `user`. If either
//! is missing the actor is logged out.

use georesolve_shared::constants::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
use georesolve_shared::{Session, User};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when either key is absent or when the stored user no
    /// longer parses (for instance a role this client does not know).
    pub fn load_session(&self) -> Result<Option<Session>> {
        let Some(token) = self.get_value(SESSION_TOKEN_KEY)? else {
            return Ok(None);
        };
        let Some(user_json) = self.get_value(SESSION_USER_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Ok(Some(Session { token, user })),
            Err(e) => {
                tracing::warn!(error = %e, "stored user is unreadable, treating as logged out");
                Ok(None)
            }
        }
    }

    /// Persist both keys atomically.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let user_json = serde_json::to_string(&session.user)?;

        let tx = self.conn().unchecked_transaction()?;
        self.set_value(SESSION_TOKEN_KEY, &session.token)?;
        self.set_value(SESSION_USER_KEY, &user_json)?;
        tx.commit()?;

        tracing::debug!(user_id = %session.user.id, role = %session.user.role, "session saved");
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;
        self.remove_value(SESSION_TOKEN_KEY)?;
        self.remove_value(SESSION_USER_KEY)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use georesolve_shared::{Role, UserId};

    use super::*;

    fn session(role: Role) -> Session {
        Session {
            token: "tok-123".into(),
            user: User {
                id: UserId(uuid::Uuid::new_v4()),
                name: "Ravi".into(),
                email: "ravi@example.org".into(),
                phone: "555".into(),
                role,
            },
        }
    }

    #[test]
    fn test_save_load_clear() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_session().unwrap().is_none());

        let s = session(Role::Admin);
        db.save_session(&s).unwrap();
        assert_eq!(db.load_session().unwrap(), Some(s));

        db.clear_session().unwrap();
        assert!(db.load_session().unwrap().is_none());
    }

    #[test]
    fn test_missing_user_means_logged_out() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(SESSION_TOKEN_KEY, "tok").unwrap();
        assert!(db.load_session().unwrap().is_none());
    }

    #[test]
    fn test_missing_token_means_logged_out() {
        let db = Database::open_in_memory().unwrap();
        db.save_session(&session(Role::Citizen)).unwrap();
        db.remove_value(SESSION_TOKEN_KEY).unwrap();
        assert!(db.load_session().unwrap().is_none());
    }

    #[test]
    fn test_unknown_role_means_logged_out() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(SESSION_TOKEN_KEY, "tok").unwrap();
        db.set_value(
            SESSION_USER_KEY,
            r#"{"id":"0b7c1e0e-7d55-4c1e-8f0e-1d9d3c8a2b10","name":"A","email":"a@x","role":"mayor"}"#,
        )
        .unwrap();
        assert!(db.load_session().unwrap().is_none());
    }
}
