//! Scoped Escape-key listener.
//!
//! A listener is installed when a draft opens and must be gone once the
//! draft closes by any path. Tying its lifetime to an [`EscapeRegistration`]
//! value makes that automatic: the player drops the registration when it
//! leaves `Selecting`, and dropping removes the listener.

/// Installs an Escape listener on the host's global key events.
pub trait EscapeHook {
    /// Start listening. The listener stays active until the returned
    /// registration is dropped.
    fn install(&self) -> EscapeRegistration;
}

/// Handle to an installed listener.
pub struct EscapeRegistration {
    release: Option<Box<dyn FnOnce()>>,
}

impl EscapeRegistration {
    /// `release` runs exactly once, when the registration is dropped.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A registration with nothing to release.
    pub fn inert() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for EscapeRegistration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            log::trace!("[PLAYER] Escape listener released");
            release();
        }
    }
}

impl std::fmt::Debug for EscapeRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscapeRegistration")
            .field("active", &self.is_active())
            .finish()
    }
}

/// For hosts without a keyboard; Escape is never reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEscapeHook;

impl EscapeHook for NoEscapeHook {
    fn install(&self) -> EscapeRegistration {
        EscapeRegistration::inert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_release_runs_once_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let registration = EscapeRegistration::new(move || counter.set(counter.get() + 1));
        assert!(registration.is_active());
        assert_eq!(released.get(), 0);

        drop(registration);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_inert_registration() {
        let registration = NoEscapeHook.install();
        assert!(!registration.is_active());
    }
}
