use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Process-wide set of client ids currently being synced. The only
/// shared mutable state in the engine; check-then-insert is atomic
/// under the mutex.
#[derive(Default)]
pub struct ActiveRunRegistry {
    running: Mutex<HashSet<Uuid>>,
}

impl ActiveRunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically register `client_id` unless a run is already active.
    /// The returned guard removes the id on drop, on every exit path.
    pub fn try_acquire(self: &Arc<Self>, client_id: Uuid) -> Option<RunGuard> {
        let mut running = self.running.lock().expect("registry lock poisoned");
        if !running.insert(client_id) {
            return None;
        }
        Some(RunGuard {
            registry: Arc::clone(self),
            client_id,
        })
    }

    pub fn is_active(&self, client_id: Uuid) -> bool {
        self.running
            .lock()
            .expect("registry lock poisoned")
            .contains(&client_id)
    }

    fn release(&self, client_id: Uuid) {
        let mut running = self.running.lock().expect("registry lock poisoned");
        running.remove(&client_id);
    }
}

pub struct RunGuard {
    registry: Arc<ActiveRunRegistry>,
    client_id: Uuid,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.registry.release(self.client_id);
    }
}
