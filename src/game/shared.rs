use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use rand::rngs::StdRng;

use super::{
    action::{Direction, Intent},
    simulation::{SnakeSimulation, TickOutcome},
    state::Snapshot,
};

/// Cloneable handle that serializes every call into one simulation
///
/// The tick scheduler and the input path may live on different threads; each
/// operation takes the same lock so they never interleave.
pub struct SharedSimulation<R = StdRng> {
    inner: Arc<Mutex<SnakeSimulation<R>>>,
}

impl<R> Clone for SharedSimulation<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedSimulation<R> {
    pub fn new(simulation: SnakeSimulation<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    // Every operation leaves the state consistent, so a panic elsewhere
    // while holding the lock does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, SnakeSimulation<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn tick(&self) -> TickOutcome {
        self.lock().tick()
    }

    pub fn set_direction(&self, direction: Direction) -> bool {
        self.lock().set_direction(direction)
    }

    pub fn toggle_pause(&self) {
        self.lock().toggle_pause();
    }

    pub fn apply(&self, intent: Intent) {
        self.lock().apply(intent);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, RoundState};
    use rand::SeedableRng;

    fn shared() -> SharedSimulation {
        SharedSimulation::new(SnakeSimulation::with_rng(
            GameConfig::default(),
            StdRng::seed_from_u64(1),
        ))
    }

    #[test]
    fn test_clones_share_state() {
        let a = shared();
        let b = a.clone();

        a.tick();
        b.toggle_pause();

        let snapshot = a.snapshot();
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.state, RoundState::Paused);
        assert_eq!(b.snapshot(), snapshot);
    }

    #[test]
    fn test_operations_forward() {
        let sim = shared();
        assert!(sim.set_direction(Direction::Down));
        assert!(!sim.set_direction(Direction::Left));
        sim.apply(Intent::TogglePause);
        assert_eq!(sim.tick(), TickOutcome::Skipped);
        sim.reset();
        assert_eq!(sim.snapshot().state, RoundState::Active);
        assert_eq!(sim.snapshot().direction, Direction::Right);
    }

    #[test]
    fn test_recovers_from_poisoned_lock() {
        let sim = shared();
        let poisoner = sim.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(sim.tick(), TickOutcome::Moved { .. }));
        assert_eq!(sim.snapshot().ticks, 1);
    }
}
