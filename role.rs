//! role - Which dashboard the visitor sees, remembered between sessions

use core::fmt;

use tracing::{info, warn};

/// Key the role is stored under.
pub const ROLE_KEY: &str = "userRole";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Patient,
    Professional,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Professional => "professional",
        }
    }

    /// Stored values other than the two role names are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(Role::Patient),
            "professional" => Some(Role::Professional),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Role::Patient => Role::Professional,
            Role::Professional => Role::Patient,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            Role::Patient => Theme::Patient,
            Role::Professional => Theme::Professional,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role formatted as a `userRole=<role>` entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry(pub Role);

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", ROLE_KEY, self.0)
    }
}

/// Role from a stored `key=value` line. Other keys and unknown values are
/// ignored.
pub fn parse_entry(line: &str) -> Option<Role> {
    let (key, value) = line.split_once('=')?;
    if key.trim() != ROLE_KEY {
        return None;
    }
    Role::parse(value.trim())
}

/// Visual theme applied to the whole page for a role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Patient,
    Professional,
}

/// Key-value storage backing the role preference.
pub trait RoleStore {
    type Error: fmt::Debug;

    fn load(&self) -> Option<Role>;
    fn save(&mut self, role: Role) -> Result<(), Self::Error>;
}

/// Application-wide role state, read once at startup and written back on
/// every change.
pub struct RoleContext<S: RoleStore> {
    store: S,
    role: Role,
}

impl<S: RoleStore> RoleContext<S> {
    pub fn load(store: S) -> Self {
        let role = store.load().unwrap_or_default();
        info!(%role, "role loaded");
        Self { store, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn theme(&self) -> Theme {
        self.role.theme()
    }

    /// Switch role and persist it. A failing store keeps the in-memory role.
    pub fn set_role(&mut self, role: Role) {
        if role == self.role {
            return;
        }
        self.role = role;
        if let Err(err) = self.store.save(role) {
            warn!(error = ?err, %role, "could not persist role");
        }
        info!(%role, "role changed");
    }

    pub fn toggle(&mut self) -> Role {
        self.set_role(self.role.toggled());
        self.role
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct MemoryStore {
        value: Option<&'static str>,
        writes: Vec<Role>,
        fail: bool,
    }

    impl RoleStore for MemoryStore {
        type Error = &'static str;

        fn load(&self) -> Option<Role> {
            self.value.and_then(Role::parse)
        }

        fn save(&mut self, role: Role) -> Result<(), Self::Error> {
            if self.fail {
                return Err("storage full");
            }
            self.writes.push(role);
            Ok(())
        }
    }

    #[test]
    fn defaults_to_patient() {
        let ctx = RoleContext::load(MemoryStore::default());
        assert_eq!(ctx.role(), Role::Patient);
        assert_eq!(ctx.theme(), Theme::Patient);
    }

    #[test]
    fn restores_stored_role() {
        let ctx = RoleContext::load(MemoryStore {
            value: Some("professional"),
            ..MemoryStore::default()
        });
        assert_eq!(ctx.role(), Role::Professional);
        assert_eq!(ctx.theme(), Theme::Professional);
        assert!(ctx.store().writes.is_empty());
    }

    #[test]
    fn ignores_unknown_stored_value() {
        let ctx = RoleContext::load(MemoryStore {
            value: Some("admin"),
            ..MemoryStore::default()
        });
        assert_eq!(ctx.role(), Role::Patient);
    }

    #[test]
    fn saves_only_on_change() {
        let mut ctx = RoleContext::load(MemoryStore::default());
        ctx.set_role(Role::Patient);
        assert!(ctx.store().writes.is_empty());

        ctx.set_role(Role::Professional);
        assert_eq!(ctx.toggle(), Role::Patient);
        assert_eq!(ctx.store().writes, [Role::Professional, Role::Patient]);
    }

    #[test]
    fn failed_save_keeps_new_role() {
        let mut ctx = RoleContext::load(MemoryStore {
            fail: true,
            ..MemoryStore::default()
        });
        ctx.set_role(Role::Professional);
        assert_eq!(ctx.role(), Role::Professional);
    }

    #[test]
    fn names_round_trip() {
        for role in [Role::Patient, Role::Professional] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn entries_use_the_role_key() {
        let mut line: heapless::String<32> = heapless::String::new();
        core::fmt::Write::write_fmt(&mut line, format_args!("{}", Entry(Role::Professional))).unwrap();
        assert_eq!(line.as_str(), "userRole=professional");
        assert_eq!(parse_entry(&line), Some(Role::Professional));

        assert_eq!(parse_entry(" userRole = patient "), Some(Role::Patient));
        assert_eq!(parse_entry("theme=patient"), None);
        assert_eq!(parse_entry("userRole=admin"), None);
        assert_eq!(parse_entry("professional"), None);
    }
}
