//! Animation Lifecycle
//!
//! The global animation subsystem is initialized on the first render of a
//! mount and torn down when the application unmounts. Re-renders within the
//! same mount never re-initialize it.

/// Process-wide animation wiring (scroll reveal, transitions, ...)
pub trait AnimationHook {
    /// Install the animation wiring
    fn init(&mut self);

    /// Remove everything `init` installed
    fn teardown(&mut self);
}

/// Hook that does nothing, for hosts without animations
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnimations;

impl AnimationHook for NoopAnimations {
    fn init(&mut self) {}

    fn teardown(&mut self) {}
}

/// Once-per-mount guard around an [`AnimationHook`]
pub struct AnimationLifecycle {
    hook: Box<dyn AnimationHook>,
    active: bool,
    mounts: u32,
}

impl AnimationLifecycle {
    pub fn new(hook: Box<dyn AnimationHook>) -> Self {
        Self {
            hook,
            active: false,
            mounts: 0,
        }
    }

    /// Called on every render; initializes only the first time per mount.
    ///
    /// Returns true when this call ran `init`.
    pub fn on_render(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.hook.init();
        self.active = true;
        self.mounts += 1;
        tracing::debug!(mount = self.mounts, "animations initialized");
        true
    }

    /// Tear down; the next render re-initializes. Returns true if anything
    /// was torn down.
    pub fn unmount(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.hook.teardown();
        self.active = false;
        tracing::debug!(mount = self.mounts, "animations torn down");
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of mounts that initialized the hook
    pub fn mounts(&self) -> u32 {
        self.mounts
    }
}

impl std::fmt::Debug for AnimationLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLifecycle")
            .field("active", &self.active)
            .field("mounts", &self.mounts)
            .finish()
    }
}

impl Drop for AnimationLifecycle {
    fn drop(&mut self) {
        self.unmount();
    }
}
