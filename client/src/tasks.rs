use std::{collections::VecDeque, mem};

use log::debug;
use parking_lot::Mutex;

use crate::structures::StructureGenerator;

/// Work that must read generator internals and so may only run on the simulation thread.
pub type SimulationTask = Box<dyn FnOnce(&dyn StructureGenerator) + Send>;

/// Queue of deferred simulation-thread work. Any thread may schedule; only the simulation
/// thread drains, once per tick.
#[derive(Default)]
pub struct SimulationTasks {
    queue: Mutex<VecDeque<SimulationTask>>,
}

impl SimulationTasks {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn schedule(&self, task: SimulationTask) {
        self.queue.lock().push_back(task);
    }

    /// Run every task queued so far against `generator`. Must be called from the thread that
    /// owns the generator. Tasks scheduled while draining run on the next call.
    pub fn run_pending(&self, generator: &dyn StructureGenerator) -> usize {
        let tasks = mem::take(&mut *self.queue.lock());
        let count = tasks.len();
        for task in tasks {
            task(generator);
        }
        if count > 0 {
            debug!("Ran {} deferred simulation task(s)", count);
        }
        count
    }

    /// Drop queued work, e.g. when the world it was scheduled for goes away.
    pub fn discard_pending(&self) -> usize {
        let mut queue = self.queue.lock();
        let count = queue.len();
        queue.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
