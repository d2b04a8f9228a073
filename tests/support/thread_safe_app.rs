//! A headless brood app that rspec fixtures can carry between examples.
//!
//! rspec clones its fixture into every `before_each` and `then` closure and
//! asks for `Send + Sync`. Bevy's `App` is neither, so the fixtures hold a
//! [`SharedApp`] and lock it around each frame or query.

use bevy::prelude::App;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The `BroodPlugin` app under test.
#[derive(Debug)]
pub struct ThreadSafeApp(App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: the suites are driven by `run_serial`, so only one example touches
// the app at a time, and it is only reachable through the mutex below.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

/// Cloneable handle; clones refer to the same app.
#[derive(Debug, Clone)]
pub struct SharedApp(Arc<Mutex<ThreadSafeApp>>);

impl SharedApp {
    /// Takes ownership of an app built by `test_utils::headless_app`.
    pub fn new(app: App) -> Self {
        Self(Arc::new(Mutex::new(ThreadSafeApp(app))))
    }

    /// Exclusive access for one frame or query.
    ///
    /// A failed assertion in an earlier example poisons the mutex; the next
    /// example rebuilds its fixture anyway, so the poison is ignored.
    pub fn lock(&self) -> MutexGuard<'_, ThreadSafeApp> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
