//! The activate/trap/handle loop.

use crate::manager::TaskManager;
use hal::ContextSwitch;

/// Hard cap on dispatch steps per [`Dispatcher::run`] call.
///
/// A livelocked script (two tasks yielding to each other forever) would
/// otherwise hang the test process.
const MAX_STEPS: usize = 10_000;

/// Drives a [`TaskManager`] with whatever context switcher it is given.
///
/// Real ports hand it the assembly trampoline; tests hand it a
/// [`crate::trampoline::ScriptedTrampoline`]. The loop itself is four
/// lines either way: pick a task, run it to its next trap, apply the trap,
/// repeat until nobody is ready.
#[derive(Debug)]
pub struct Dispatcher<S: ContextSwitch> {
    manager: TaskManager,
    switcher: S,
}

impl<S: ContextSwitch> Dispatcher<S> {
    pub fn new(manager: TaskManager, switcher: S) -> Self {
        Self { manager, switcher }
    }

    pub fn manager(&self) -> &TaskManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut TaskManager {
        &mut self.manager
    }

    pub fn switcher_mut(&mut self) -> &mut S {
        &mut self.switcher
    }

    pub fn into_manager(self) -> TaskManager {
        self.manager
    }

    /// Runs one task to its next trap and applies it.
    ///
    /// Returns `false` when no task is ready (idle).
    pub fn step(&mut self) -> bool {
        let Some(tid) = self.manager.next_ready() else {
            return false;
        };
        let Some(context) = self.manager.context_mut(tid) else {
            return false;
        };
        let cause = self.switcher.activate(tid, context);
        self.manager.handle(tid, cause);
        true
    }

    /// Steps until idle. Returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while steps < MAX_STEPS && self.step() {
            steps += 1;
        }
        steps
    }
}
