use std::collections::HashSet;
use std::path::Path;
use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use crate::errors::{FixtureError, FixtureResult};
use crate::models::{Credential, Department, Project, Role, Task, User};

const SEED: &str = include_str!("../../fixtures/seed.json");

/// Login table entry as it appears in a fixture file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlainCredential {
    pub username: String,
    pub password: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FixtureData {
    pub departments: Vec<Department>,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub credentials: Vec<PlainCredential>,
}

impl FixtureData {
    pub fn seed() -> FixtureResult<Self> {
        Ok(serde_json::from_str(SEED)?)
    }
}

/// Read-only dataset standing in for a backend. Built once at startup and
/// shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug)]
pub struct FixtureStore {
    departments: Vec<Department>,
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    credentials: Vec<Credential>,
}

impl FixtureStore {
    /// Builds the store from the bundled seed dataset.
    pub fn seed(bcrypt_cost: u32) -> FixtureResult<Self> {
        Self::from_data(FixtureData::seed()?, bcrypt_cost)
    }

    /// Builds the store from a JSON file with the same layout as the seed.
    pub fn load(path: impl AsRef<Path>, bcrypt_cost: u32) -> FixtureResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let data: FixtureData = serde_json::from_str(&raw)?;
        Self::from_data(data, bcrypt_cost)
    }

    pub fn from_data(data: FixtureData, bcrypt_cost: u32) -> FixtureResult<Self> {
        ensure_unique("department", data.departments.iter().map(|d| d.id.as_str()))?;
        ensure_unique("user", data.users.iter().map(|u| u.id.as_str()))?;
        ensure_unique("project", data.projects.iter().map(|p| p.id.as_str()))?;
        ensure_unique("task", data.tasks.iter().map(|t| t.id.as_str()))?;

        let mut credentials = Vec::with_capacity(data.credentials.len());
        for plain in data.credentials {
            if !data.users.iter().any(|u| u.id == plain.user_id) {
                return Err(FixtureError::DanglingCredential(plain.username));
            }
            credentials.push(Credential {
                password_hash: hash(plain.password.as_bytes(), bcrypt_cost)?,
                username: plain.username,
                user_id: plain.user_id,
            });
        }

        tracing::info!(
            users = data.users.len(),
            projects = data.projects.len(),
            tasks = data.tasks.len(),
            "Fixture store ready"
        );

        Ok(Self {
            departments: data.departments,
            users: data.users,
            projects: data.projects,
            tasks: data.tasks,
            credentials,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn users_with_role(&self, role: Role) -> Vec<&User> {
        self.users.iter().filter(|u| u.role == role).collect()
    }

    /// Usernames on the login table with the role each one signs in as.
    pub fn login_names(&self) -> Vec<(&str, Role)> {
        self.credentials
            .iter()
            .filter_map(|c| self.user(&c.user_id).map(|u| (c.username.as_str(), u.role)))
            .collect()
    }

    /// Resolves the user behind an exact username/password pair. A username
    /// may appear more than once; the first entry whose password matches wins.
    pub fn check_credentials(&self, username: &str, password: &str) -> Option<&User> {
        let credential = self
            .credentials
            .iter()
            .filter(|c| c.username == username)
            .find(|c| match verify(password, &c.password_hash) {
                Ok(matched) => matched,
                Err(e) => {
                    tracing::error!("Stored hash for {} is unusable: {}", username, e);
                    false
                }
            })?;
        self.user(&credential.user_id)
    }
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> FixtureResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FixtureError::DuplicateId { kind, id: id.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_loads_every_collection() {
        let store = FixtureStore::seed(4).unwrap();
        assert_eq!(store.users().len(), 7);
        assert_eq!(store.projects().len(), 4);
        assert_eq!(store.tasks().len(), 9);
        assert_eq!(store.departments().len(), 4);
        assert_eq!(store.users_with_role(Role::Manager).len(), 2);
    }

    #[test]
    fn credentials_are_checked_against_hashes() {
        let store = FixtureStore::seed(4).unwrap();
        assert_eq!(store.check_credentials("admin", "admin123").map(|u| u.id.as_str()), Some("u1"));
        assert!(store.check_credentials("admin", "wrong").is_none());
        assert!(store.check_credentials("nobody", "admin123").is_none());
        assert!(store.credentials.iter().all(|c| !c.password_hash.contains("123")));
    }

    #[test]
    fn repeated_username_matches_on_the_full_pair() {
        let mut data = FixtureData::seed().unwrap();
        data.credentials.push(PlainCredential {
            username: "admin".into(),
            password: "other456".into(),
            user_id: "u2".into(),
        });
        let store = FixtureStore::from_data(data, 4).unwrap();
        assert_eq!(store.check_credentials("admin", "admin123").map(|u| u.id.as_str()), Some("u1"));
        assert_eq!(store.check_credentials("admin", "other456").map(|u| u.id.as_str()), Some("u2"));
        assert!(store.check_credentials("admin", "sarah123").is_none());
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        let store = FixtureStore::seed(4).unwrap();
        assert!(store.user("u404").is_none());
        assert!(store.project("p404").is_none());
        assert!(store.task("t404").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut data = FixtureData::seed().unwrap();
        let copy = data.tasks[0].clone();
        data.tasks.push(copy);
        match FixtureStore::from_data(data, 4) {
            Err(FixtureError::DuplicateId { kind, id }) => {
                assert_eq!(kind, "task");
                assert_eq!(id, "t1");
            }
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn credential_for_missing_user_is_rejected() {
        let mut data = FixtureData::seed().unwrap();
        data.credentials.push(PlainCredential {
            username: "ghost".into(),
            password: "ghost123".into(),
            user_id: "u404".into(),
        });
        assert!(matches!(
            FixtureStore::from_data(data, 4),
            Err(FixtureError::DanglingCredential(name)) if name == "ghost"
        ));
    }

    #[test]
    fn loads_dataset_from_file() {
        let mut data = FixtureData::seed().unwrap();
        data.tasks.truncate(2);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&data).unwrap().as_bytes()).unwrap();

        let store = FixtureStore::load(file.path(), 4).unwrap();
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(FixtureStore::load(file.path(), 4), Err(FixtureError::Json(_))));
    }
}
