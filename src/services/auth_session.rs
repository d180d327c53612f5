use crate::models::{AuthUser, Role, User};
use super::fixture_store::FixtureStore;

/// The login state of one visitor.
///
/// Starts logged out. A successful [`login`](Self::login) installs an
/// [`AuthUser`] projection; [`logout`](Self::logout) drops it. The value is
/// rebuilt on every request from what the cookie session holds and handed to
/// the handler explicitly.
#[derive(Debug, Clone)]
pub struct AuthSession<'a> {
    store: &'a FixtureStore,
    user: Option<AuthUser>,
}

impl<'a> AuthSession<'a> {
    pub fn new(store: &'a FixtureStore) -> Self {
        Self::resume(store, None)
    }

    /// Rebuilds a session from a previously persisted identity.
    pub fn resume(store: &'a FixtureStore, user: Option<AuthUser>) -> Self {
        Self { store, user }
    }

    /// Installs a session on an exact username/password match. A rejected
    /// attempt leaves whatever session was already installed in place.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        match self.store.check_credentials(username, password) {
            Some(user) => {
                self.user = Some(AuthUser::from(user));
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &'a FixtureStore {
        self.store
    }

    pub fn into_user(self) -> Option<AuthUser> {
        self.user
    }

    /// Full record for any user id. There is no ownership check.
    pub fn get_user_data(&self, id: &str) -> Option<&'a User> {
        self.store.user(id)
    }

    pub fn get_all_managers(&self) -> Vec<&'a User> {
        self.store.users_with_role(Role::Manager)
    }

    pub fn get_all_members(&self) -> Vec<&'a User> {
        self.store.users_with_role(Role::Member)
    }

    pub fn get_managers_for_admin(&self) -> Vec<&'a User> {
        self.store.users_with_role(Role::Manager)
    }

    /// Returns every member regardless of `manager_id`. The intended team
    /// scoping has not been agreed yet, so the argument is unused for now.
    pub fn get_members_under_manager(&self, _manager_id: &str) -> Vec<&'a User> {
        self.store.users_with_role(Role::Member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FixtureStore {
        FixtureStore::seed(4).unwrap()
    }

    #[test]
    fn starts_logged_out() {
        let store = store();
        let session = AuthSession::new(&store);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn admin_login_installs_admin_projection() {
        let store = store();
        let mut session = AuthSession::new(&store);
        assert!(session.login("admin", "admin123"));
        let user = session.user().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "alex.morgan@example.com");
    }

    #[test]
    fn rejected_login_keeps_prior_session() {
        let store = store();
        let mut session = AuthSession::new(&store);
        assert!(!session.login("admin", "wrong"));
        assert!(!session.is_authenticated());

        assert!(session.login("sarah", "sarah123"));
        assert!(!session.login("admin", "wrong"));
        assert_eq!(session.user().unwrap().name, "Sarah Chen");
    }

    #[test]
    fn login_while_logged_in_replaces_session() {
        let store = store();
        let mut session = AuthSession::new(&store);
        assert!(session.login("emily", "emily123"));
        assert!(session.login("admin", "admin123"));
        assert_eq!(session.user().unwrap().role, Role::Admin);
    }

    #[test]
    fn logout_leaves_store_lookups_working() {
        let store = store();
        let mut session = AuthSession::new(&store);
        session.login("emily", "emily123");
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.get_user_data("u4").unwrap().name, "Emily Davis");
        assert_eq!(session.get_user_data("u2").unwrap().role, Role::Manager);
    }

    #[test]
    fn resume_restores_persisted_identity() {
        let store = store();
        let identity = AuthUser::from(store.user("u3").unwrap());
        let session = AuthSession::resume(&store, Some(identity.clone()));
        assert!(session.is_authenticated());
        assert_eq!(session.into_user(), Some(identity));
    }

    #[test]
    fn role_helpers_return_role_wide_slices() {
        let store = store();
        let session = AuthSession::new(&store);
        assert!(session.get_all_managers().iter().all(|u| u.role == Role::Manager));
        assert_eq!(session.get_all_managers(), session.get_managers_for_admin());
        assert_eq!(session.get_all_members().len(), 4);
    }

    #[test]
    fn members_under_manager_ignores_manager() {
        let store = store();
        let session = AuthSession::new(&store);
        // u2 and u3 lead disjoint teams, yet both calls return every member.
        let sarah = session.get_members_under_manager("u2");
        let michael = session.get_members_under_manager("u3");
        assert_eq!(sarah, michael);
        assert_eq!(sarah, session.get_all_members());
    }
}
