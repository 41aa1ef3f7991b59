//! Per-tick system schedule ordered by priority
//!
//! Systems with a higher priority run first within a tick. Systems sharing
//! a priority run in registration order.

/// Priority bands for the built-in per-tick systems
pub mod priority {
    /// Base priority for user-facing utility systems
    pub const REGULAR: i32 = 100_000;
    pub const TIMER: i32 = REGULAR + 256;
    pub const TWEEN: i32 = REGULAR + 192;
    pub const PERPETUAL_MOTION: i32 = REGULAR + 192;
    pub const PATH: i32 = REGULAR + 192;
    /// Triggers read settled poses, so they run after every transform animator
    pub const TRIGGER: i32 = REGULAR + 128;
    pub const ACTION: i32 = REGULAR + 64;
}

/// A boxed per-tick system over a context `C`
pub type SystemFn<C> = Box<dyn FnMut(&mut C, f32)>;

struct ScheduledSystem<C> {
    name: String,
    priority: i32,
    run: SystemFn<C>,
}

/// Ordered list of per-tick systems
pub struct Schedule<C> {
    systems: Vec<ScheduledSystem<C>>,
    tick: u64,
}

impl<C> Schedule<C> {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            tick: 0,
        }
    }

    /// Register a system at the given priority
    pub fn add_system<F>(&mut self, name: impl Into<String>, priority: i32, system: F)
    where
        F: FnMut(&mut C, f32) + 'static,
    {
        let slot = self
            .systems
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(self.systems.len());

        self.systems.insert(
            slot,
            ScheduledSystem {
                name: name.into(),
                priority,
                run: Box::new(system),
            },
        );
    }

    /// Remove every system registered under `name`; returns how many were removed
    pub fn remove_system(&mut self, name: &str) -> usize {
        let before = self.systems.len();
        self.systems.retain(|s| s.name != name);
        before - self.systems.len()
    }

    /// Run one tick
    pub fn run(&mut self, context: &mut C, delta_time: f32) {
        self.tick += 1;
        for system in &mut self.systems {
            log::trace!("tick {}: running system '{}'", self.tick, system.name);
            (system.run)(context, delta_time);
        }
    }

    /// System names in execution order
    pub fn system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(|s| s.name.as_str())
    }

    /// Number of completed ticks
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }
}

impl<C> Default for Schedule<C> {
    fn default() -> Self {
        Self::new()
    }
}
