//! Ambient controller context for one traversal.

use log::debug;
use std::ops::{Deref, DerefMut};

/// Stack of controller names entered while descending into `controllers` blocks.
///
/// Each level holds the controller declared by its block, or `None` when the block named
/// none. One stack belongs to one traversal and is never shared.
#[derive(Debug, Default)]
pub struct ContextStack {
    controllers: Vec<Option<String>>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller in effect at the current nesting level.
    pub fn current(&self) -> Option<&str> {
        self.controllers.last().and_then(|c| c.as_deref())
    }

    pub fn depth(&self) -> usize {
        self.controllers.len()
    }

    /// Pushes `controller` and returns a guard that pops it again when dropped.
    ///
    /// The guard dereferences to the stack, so nested traversal continues through it and
    /// the previous controller is restored on every exit path, `?` and unwinding included.
    pub fn enter(&mut self, controller: Option<String>) -> ControllerScope<'_> {
        debug!("Entering controller {:?}", controller);
        self.controllers.push(controller);
        ControllerScope { stack: self }
    }

    fn leave(&mut self) {
        let left = self.controllers.pop();
        debug!("Leaving controller {:?}", left.flatten());
    }
}

/// Guard returned by [`ContextStack::enter`].
pub struct ControllerScope<'a> {
    stack: &'a mut ContextStack,
}

impl Deref for ControllerScope<'_> {
    type Target = ContextStack;

    fn deref(&self) -> &ContextStack {
        self.stack
    }
}

impl DerefMut for ControllerScope<'_> {
    fn deref_mut(&mut self) -> &mut ContextStack {
        self.stack
    }
}

impl Drop for ControllerScope<'_> {
    fn drop(&mut self) {
        self.stack.leave();
    }
}
