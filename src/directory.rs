use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

/// The authenticated identity: a directory record minus its password.
/// This is exactly the shape persisted under the `currentUser` storage key,
/// so serde derives double as the storage codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub progress: i64,
}

impl Identity {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Tolerant decode for rehydration: anything that does not parse as an
    /// Identity counts as "no stored identity".
    pub fn from_json(value: serde_json::Value) -> Option<Identity> {
        serde_json::from_value(value).ok()
    }
}

/// A credential-table row. Password stays inside the directory; it is never
/// serialized onto the wire or into storage.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub subjects: Vec<String>,
    pub progress: i64,
}

impl UserRecord {
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            subjects: self.subjects.clone(),
            progress: self.progress,
        }
    }
}

/// Lookup-by-email seam for the session store. The concrete directory is
/// injected at startup so a real backing store can replace the demo table
/// without touching session control flow.
pub trait UserDirectory {
    /// Case-sensitive exact match on email.
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;

    /// Mirrors an identity's mutable fields back into the table so a fresh
    /// login within this process sees them. The mirror is in-memory only;
    /// it does not survive a restart, the durable `currentUser` copy does.
    fn mirror(&mut self, identity: &Identity);
}

/// Fixed demo credential table. Mock data, not a security boundary.
pub struct MockDirectory {
    users: HashMap<String, UserRecord>,
}

impl MockDirectory {
    pub fn seeded() -> Self {
        let mut users = HashMap::new();
        for (id, name, email, role, progress) in [
            ("1", "Admin", "ibmaster@gmail.com", Role::Admin, 100),
            ("2", "Talal", "talal@gmail.com", Role::Student, 0),
            ("3", "Abrah", "abrah@gmail.com", Role::Student, 0),
            ("4", "Ali", "ali@gmail.com", Role::Student, 0),
        ] {
            users.insert(
                email.to_string(),
                UserRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    password: "IloveIB!".to_string(),
                    role,
                    subjects: Vec::new(),
                    progress,
                },
            );
        }
        MockDirectory { users }
    }
}

impl UserDirectory for MockDirectory {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.get(email).cloned()
    }

    fn mirror(&mut self, identity: &Identity) {
        if let Some(record) = self.users.get_mut(&identity.email) {
            record.subjects = identity.subjects.clone();
            record.progress = identity.progress;
        }
    }
}
