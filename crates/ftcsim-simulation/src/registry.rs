use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::error::SimulationError;
use crate::simulation::Simulation;

/// Every simulation the application has created.
///
/// Owned by the application and passed to whatever needs aggregate control.
/// Entries are never removed; simulations are expected to live as long as the
/// process.
#[derive(Default)]
pub struct SimulationRegistry {
    simulations: RwLock<Vec<Arc<dyn Simulation>>>,
}

impl SimulationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `simulation` and hand it back for typed use.
    pub fn register<S: Simulation + 'static>(&self, simulation: Arc<S>) -> Arc<S> {
        info!(robot = simulation.name(), "Simulation registered.");
        self.simulations
            .write()
            .push(Arc::clone(&simulation) as Arc<dyn Simulation>);
        simulation
    }

    /// Number of registered simulations.
    pub fn len(&self) -> usize {
        self.simulations.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.simulations.read().is_empty()
    }

    /// The simulation registered `index`-th.
    pub fn get(&self, index: usize) -> Option<Arc<dyn Simulation>> {
        self.simulations.read().get(index).cloned()
    }

    /// Current entries, in registration order.
    pub fn simulations(&self) -> Vec<Arc<dyn Simulation>> {
        self.simulations.read().clone()
    }

    /// Start every simulation. All are attempted; the first failure is returned.
    pub fn start_all(&self) -> Result<(), SimulationError> {
        let mut first_error = None;
        for simulation in self.simulations() {
            if let Err(e) = simulation.start() {
                error!(robot = simulation.name(), error = %e, "Failed to start simulation.");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stop every simulation, waiting for each to halt.
    pub fn stop_all(&self) {
        for simulation in self.simulations() {
            simulation.stop();
        }
    }

    /// Reset every simulation to its start pose.
    pub fn reset_all(&self) {
        for simulation in self.simulations() {
            simulation.reset();
        }
    }
}

impl std::fmt::Debug for SimulationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .simulations
            .read()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        f.debug_struct("SimulationRegistry")
            .field("simulations", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WheelCommands;
    use ftcsim_kinematics::Pose;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        running: AtomicBool,
        resets: AtomicUsize,
        commands: WheelCommands,
    }

    impl Simulation for Counting {
        fn name(&self) -> &str {
            "counting"
        }
        fn start(&self) -> Result<(), SimulationError> {
            self.running.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn stop(&self) {
            self.running.store(false, Ordering::SeqCst);
        }
        fn reset(&self) {
            self.stop();
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }
        fn pose(&self) -> Pose {
            Pose::default()
        }
        fn commands(&self) -> &WheelCommands {
            &self.commands
        }
    }

    #[test]
    fn test_aggregate_lifecycle() {
        let registry = SimulationRegistry::new();
        assert!(registry.is_empty());
        let a = registry.register(Arc::new(Counting::default()));
        let b = registry.register(Arc::new(Counting::default()));
        assert_eq!(registry.len(), 2);

        registry.start_all().unwrap();
        assert!(a.is_running() && b.is_running());

        registry.stop_all();
        assert!(!a.is_running() && !b.is_running());

        registry.start_all().unwrap();
        registry.reset_all();
        assert!(!a.is_running() && !b.is_running());
        assert_eq!(a.resets.load(Ordering::SeqCst), 1);
        assert_eq!(b.resets.load(Ordering::SeqCst), 1);
        // Never pruned.
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().name(), "counting");
        assert!(registry.get(2).is_none());
    }
}
