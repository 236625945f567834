// ============================================================================
// AUTH STATE - Identity delivered by the external auth provider
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Student, SyncIdentity};

/// Which dashboard the signed-in user gets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Guard,
    Student,
}

impl Role {
    pub fn from_value(value: &str) -> Self {
        match value {
            "guard" => Role::Guard,
            _ => Role::Student,
        }
    }
}

/// Identity state. The crate never authenticates anyone itself; the provider
/// pushes the signed-in identity through `set_identity` and this holds it.
#[derive(Clone)]
pub struct AuthState {
    pub identity: Rc<RefCell<Option<SyncIdentity>>>,
    pub role: Rc<RefCell<Role>>,
    /// Backend student record for the signed-in identity, filled by sync
    pub student: Rc<RefCell<Option<Student>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            identity: Rc::new(RefCell::new(None)),
            role: Rc::new(RefCell::new(Role::Student)),
            student: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_identity(&self, identity: Option<SyncIdentity>) {
        *self.identity.borrow_mut() = identity;
    }

    pub fn get_identity(&self) -> Option<SyncIdentity> {
        self.identity.borrow().clone()
    }

    pub fn clerk_id(&self) -> Option<String> {
        self.identity.borrow().as_ref().map(|i| i.clerk_id.clone())
    }

    pub fn set_role(&self, role: Role) {
        *self.role.borrow_mut() = role;
    }

    pub fn get_role(&self) -> Role {
        *self.role.borrow()
    }

    pub fn set_student(&self, student: Option<Student>) {
        *self.student.borrow_mut() = student;
    }

    pub fn get_student(&self) -> Option<Student> {
        self.student.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.borrow().is_some()
    }

    /// Sign-out: drop everything
    pub fn clear(&self) {
        self.set_identity(None);
        self.set_student(None);
        *self.role.borrow_mut() = Role::Student;
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_defaults_to_student() {
        assert_eq!(Role::from_value("guard"), Role::Guard);
        assert_eq!(Role::from_value("student"), Role::Student);
        assert_eq!(Role::from_value(""), Role::Student);
        assert_eq!(Role::from_value("admin"), Role::Student);
    }
}
