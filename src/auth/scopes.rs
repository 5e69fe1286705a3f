use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authorization level attached to every user account
///
/// Stored as text in the users table and carried in JWT claims, so the
/// serialized form is the SCREAMING_SNAKE_CASE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
    Unverified,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Unverified];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Unverified => "UNVERIFIED",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            "UNVERIFIED" => Ok(Role::Unverified),
            other => Err(ScopeError::UnknownRole(other.to_string())),
        }
    }
}

/// Errors from scope registry construction and authority queries
///
/// `UnknownRole` is a configuration error, not a request-time condition:
/// callers must surface it as a server fault rather than treating it as a
/// denied authorization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("role {0} is not present in the scope registry")]
    UnknownRole(String),

    #[error("role {0} is reachable from itself through its subscopes")]
    CyclicScope(String),

    #[error("role {0} has more than one scope entry")]
    DuplicateScope(String),
}

/// A role together with the set of roles directly subordinate to it
#[derive(Debug, Clone)]
pub struct Scope<R = Role> {
    pub name: R,
    pub subscopes: HashSet<R>,
}

impl<R: Copy + Eq + Hash> Scope<R> {
    pub fn new(name: R, subscopes: impl IntoIterator<Item = R>) -> Self {
        Self {
            name,
            subscopes: subscopes.into_iter().collect(),
        }
    }
}

/// Immutable mapping from each role to its direct subscopes
///
/// Built once, read everywhere: construction validates that the table is
/// total (every subscope has its own entry) and acyclic, so every authority
/// query over a constructed registry terminates. The registry is generic
/// over the role key so tests can build hierarchies deeper than the fixed
/// production table.
#[derive(Debug)]
pub struct ScopeRegistry<R = Role> {
    scopes: HashMap<R, HashSet<R>>,
}

impl<R: Copy + Eq + Hash + fmt::Debug> ScopeRegistry<R> {
    pub fn new(table: impl IntoIterator<Item = Scope<R>>) -> Result<Self, ScopeError> {
        let mut scopes = HashMap::new();
        for scope in table {
            if scopes.insert(scope.name, scope.subscopes).is_some() {
                return Err(ScopeError::DuplicateScope(format!("{:?}", scope.name)));
            }
        }

        let registry = Self { scopes };
        registry.check_total()?;
        registry.check_acyclic()?;
        Ok(registry)
    }

    /// Whether `candidate_parent`'s authority includes `candidate_child`
    ///
    /// Authority is reflexive and transitive over the subscope relation:
    /// a role always covers itself, and covers every role reachable through
    /// its subscopes. Both roles must be registered.
    pub fn has_authority_over(
        &self,
        candidate_parent: R,
        candidate_child: R,
    ) -> Result<bool, ScopeError> {
        if !self.scopes.contains_key(&candidate_child) {
            return Err(ScopeError::UnknownRole(format!("{candidate_child:?}")));
        }
        self.search(candidate_parent, candidate_child)
    }

    /// Depth-first search down the subscope graph, short-circuiting on the
    /// first successful path.
    fn search(&self, parent: R, child: R) -> Result<bool, ScopeError> {
        let subscopes = self
            .scopes
            .get(&parent)
            .ok_or_else(|| ScopeError::UnknownRole(format!("{parent:?}")))?;

        if parent == child {
            return Ok(true);
        }

        for &subscope in subscopes {
            if self.search(subscope, child)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn check_total(&self) -> Result<(), ScopeError> {
        for subscopes in self.scopes.values() {
            for subscope in subscopes {
                if !self.scopes.contains_key(subscope) {
                    return Err(ScopeError::UnknownRole(format!("{subscope:?}")));
                }
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), ScopeError> {
        for &start in self.scopes.keys() {
            let mut seen = HashSet::new();
            let mut stack: Vec<R> = self.scopes[&start].iter().copied().collect();

            while let Some(role) = stack.pop() {
                if role == start {
                    return Err(ScopeError::CyclicScope(format!("{start:?}")));
                }
                if seen.insert(role) {
                    if let Some(subscopes) = self.scopes.get(&role) {
                        stack.extend(subscopes.iter().copied());
                    }
                }
            }
        }
        Ok(())
    }
}

// The production hierarchy: admins act for every user, verified or not.
static BUILTIN: Lazy<ScopeRegistry> = Lazy::new(|| {
    ScopeRegistry::new([
        Scope::new(Role::Admin, [Role::User, Role::Unverified]),
        Scope::new(Role::User, []),
        Scope::new(Role::Unverified, []),
    ])
    .expect("built-in scope table is total and acyclic")
});

impl ScopeRegistry {
    /// Process-wide registry built from the static role table
    pub fn builtin() -> &'static ScopeRegistry {
        &BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_covers_itself() {
        let registry = ScopeRegistry::builtin();
        for role in Role::ALL {
            assert!(registry.has_authority_over(role, role).unwrap());
        }
    }

    #[test]
    fn admin_covers_direct_subscopes() {
        let registry = ScopeRegistry::builtin();
        assert!(registry.has_authority_over(Role::Admin, Role::User).unwrap());
        assert!(registry
            .has_authority_over(Role::Admin, Role::Unverified)
            .unwrap());
    }

    #[test]
    fn leaf_roles_have_no_authority_over_admin() {
        let registry = ScopeRegistry::builtin();
        assert!(!registry.has_authority_over(Role::User, Role::Admin).unwrap());
        assert!(!registry
            .has_authority_over(Role::Unverified, Role::Admin)
            .unwrap());
    }

    #[test]
    fn sibling_leaves_do_not_cover_each_other() {
        let registry = ScopeRegistry::builtin();
        assert!(!registry
            .has_authority_over(Role::User, Role::Unverified)
            .unwrap());
        assert!(!registry
            .has_authority_over(Role::Unverified, Role::User)
            .unwrap());
    }

    #[test]
    fn authority_is_transitive_through_deep_chains() {
        let registry = ScopeRegistry::new([
            Scope::new("a", ["b"]),
            Scope::new("b", ["c"]),
            Scope::new("c", ["d"]),
            Scope::new("d", ["e"]),
            Scope::new("e", []),
        ])
        .unwrap();

        assert!(registry.has_authority_over("a", "e").unwrap());
        assert!(!registry.has_authority_over("e", "a").unwrap());
    }

    #[test]
    fn branching_hierarchies_search_every_path() {
        let registry = ScopeRegistry::new([
            Scope::new("root", ["left", "right"]),
            Scope::new("left", []),
            Scope::new("right", ["leaf"]),
            Scope::new("leaf", []),
        ])
        .unwrap();

        assert!(registry.has_authority_over("root", "leaf").unwrap());
        assert!(!registry.has_authority_over("left", "leaf").unwrap());
    }

    #[test]
    fn unregistered_roles_are_an_error_not_a_denial() {
        let registry = ScopeRegistry::new([Scope::new("a", [])]).unwrap();

        assert_eq!(
            registry.has_authority_over("a", "ghost"),
            Err(ScopeError::UnknownRole("\"ghost\"".to_string()))
        );
        assert_eq!(
            registry.has_authority_over("ghost", "a"),
            Err(ScopeError::UnknownRole("\"ghost\"".to_string()))
        );
    }

    #[test]
    fn tables_referencing_missing_roles_are_rejected() {
        let result = ScopeRegistry::new([Scope::new("a", ["missing"])]);
        assert!(matches!(result, Err(ScopeError::UnknownRole(_))));
    }

    #[test]
    fn cyclic_tables_are_rejected() {
        let result = ScopeRegistry::new([
            Scope::new("a", ["b"]),
            Scope::new("b", ["c"]),
            Scope::new("c", ["a"]),
        ]);
        assert!(matches!(result, Err(ScopeError::CyclicScope(_))));
    }

    #[test]
    fn self_loops_are_rejected() {
        let result = ScopeRegistry::new([Scope::new("a", ["a"])]);
        assert!(matches!(result, Err(ScopeError::CyclicScope(_))));
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let result = ScopeRegistry::new([Scope::new("a", []), Scope::new("a", [])]);
        assert!(matches!(result, Err(ScopeError::DuplicateScope(_))));
    }

    #[test]
    fn role_round_trips_through_its_text_form() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!(matches!(
            "SUPERUSER".parse::<Role>(),
            Err(ScopeError::UnknownRole(_))
        ));
    }
}
