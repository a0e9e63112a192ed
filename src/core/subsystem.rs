//=========================================================================
// Subsystem Guards
//=========================================================================
//
// Process-wide, reference-counted initialization of platform subsystems.
//
// Architecture:
//   SubsystemGuard::acquire(Video) ──► REGISTRY (one Mutex)
//        │                               ├─ count 0 → 1 : initialize
//        │                               └─ count n → n+1
//        └─ Drop ──────────────────────► count 1 → 0 : release
//
// Holding a guard keeps the subsystem alive. Nested acquisition is fine:
// the subsystem is initialized once and released exactly once, when the
// last guard goes away.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

//=== Subsystem ===========================================================

/// Platform subsystems that need one-time initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Video,
    Events,
}

impl Subsystem {
    const COUNT: usize = 2;

    fn index(self) -> usize {
        match self {
            Self::Video => 0,
            Self::Events => 1,
        }
    }

    /// Number of live guards for this subsystem.
    pub fn active_count(self) -> usize {
        registry()[self.index()]
    }

    /// Returns `true` while at least one guard is alive.
    pub fn is_active(self) -> bool {
        self.active_count() > 0
    }
}

//=== Registry ============================================================

static REGISTRY: Mutex<[usize; Subsystem::COUNT]> = Mutex::new([0; Subsystem::COUNT]);

// A panic while holding the lock cannot leave the counters half-written,
// so a poisoned registry is still consistent.
fn registry() -> MutexGuard<'static, [usize; Subsystem::COUNT]> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//=== SubsystemGuard ======================================================

/// RAII token keeping a [`Subsystem`] initialized.
#[derive(Debug)]
#[must_use = "the subsystem is released as soon as the guard is dropped"]
pub struct SubsystemGuard {
    subsystem: Subsystem,
}

impl SubsystemGuard {
    /// Acquires the subsystem, initializing it if this is the first guard.
    pub fn acquire(subsystem: Subsystem) -> Self {
        let mut counts = registry();
        let count = &mut counts[subsystem.index()];

        if *count == 0 {
            info!("{:?} subsystem initialized", subsystem);
        }
        *count += 1;
        debug!("{:?} subsystem acquired ({} guards)", subsystem, *count);

        Self { subsystem }
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }
}

impl Clone for SubsystemGuard {
    fn clone(&self) -> Self {
        Self::acquire(self.subsystem)
    }
}

impl Drop for SubsystemGuard {
    fn drop(&mut self) {
        let mut counts = registry();
        let count = &mut counts[self.subsystem.index()];

        *count = count.saturating_sub(1);
        debug!("{:?} subsystem released ({} guards)", self.subsystem, *count);

        if *count == 0 {
            info!("{:?} subsystem shut down", self.subsystem);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
