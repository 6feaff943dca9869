//=========================================================================
// World Lifecycle Controller
//=========================================================================
//
// Owns the started worlds and the current index.
//
// Every navigation is exit(old) → index = new → enter(new), performed
// between frames so no world executes half-switched. The controller is
// the only writer of the index and the only reader that clears the
// transition slot.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{World, WorldError, WorldTransition};
use crate::core::globals::SharedContext;

//=== Navigation ==========================================================

/// Outcome of a successful navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Target was already current; no lifecycle call was made.
    Unchanged,

    /// `from` was exited and `to` entered.
    Moved { from: usize, to: usize },
}

//=== WorldController =====================================================

/// Running set of worlds with exactly one current world.
pub struct WorldController {
    worlds: Vec<Box<dyn World>>,
    current: usize,
}

impl WorldController {
    //--- Construction -----------------------------------------------------

    pub(super) fn start(
        mut worlds: Vec<Box<dyn World>>,
        ctx: &mut SharedContext,
    ) -> Result<Self, WorldError> {
        if worlds.is_empty() {
            error!(target: "world", "Cannot start without registered worlds");
            return Err(WorldError::EmptyRegistry);
        }

        info!(target: "world", "Setting up {} worlds", worlds.len());
        for world in worlds.iter_mut() {
            debug!(target: "world", "Setup `{}`", world.name());
            world.setup(ctx);
        }

        worlds[0].enter(ctx);
        info!(target: "world", "Entered initial world `{}`", worlds[0].name());

        Ok(Self { worlds, current: 0 })
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &str {
        self.worlds[self.current].name()
    }

    /// Number of worlds; never zero.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.worlds.iter().map(|w| w.name())
    }

    //--- Navigation -------------------------------------------------------

    /// Makes world `target` current.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfRange`] if `target` is not a registered index.
    /// The current world is left untouched.
    pub fn goto_world(
        &mut self,
        target: usize,
        ctx: &mut SharedContext,
    ) -> Result<Navigation, WorldError> {
        let len = self.worlds.len();
        if target >= len {
            warn!(target: "world", "Rejected navigation to index {} ({} worlds)", target, len);
            return Err(WorldError::OutOfRange { index: target, len });
        }

        if target == self.current {
            debug!(target: "world", "World `{}` is already current", self.current_name());
            return Ok(Navigation::Unchanged);
        }

        let from = self.current;

        self.worlds[from].exit(ctx);
        self.check_detached(from, ctx);

        self.current = target;
        self.worlds[target].enter(ctx);

        info!(
            target: "world",
            "World transition: `{}` → `{}`",
            self.worlds[from].name(),
            self.worlds[target].name()
        );

        Ok(Navigation::Moved { from, to: target })
    }

    /// Applies a relative or absolute navigation request.
    ///
    /// `Next` and `Previous` wrap around the registry.
    pub fn navigate(
        &mut self,
        transition: WorldTransition,
        ctx: &mut SharedContext,
    ) -> Result<Navigation, WorldError> {
        let len = self.worlds.len();
        let target = match transition {
            WorldTransition::Next => (self.current + 1) % len,
            WorldTransition::Previous => (self.current + len - 1) % len,
            WorldTransition::Goto(index) => index,
        };
        self.goto_world(target, ctx)
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs one frame of world logic.
    ///
    /// 1. Take the pending transition (clearing the slot) and apply it.
    /// 2. Execute the current world.
    ///
    /// A request written during step 2 waits for the next tick.
    pub fn tick(&mut self, ctx: &mut SharedContext, delta: f32, elapsed: f32) {
        if let Some(transition) = ctx.take_transition() {
            if let Err(e) = self.navigate(transition, ctx) {
                warn!(target: "world", "Dropped transition {:?}: {}", transition, e);
            }
        }

        let world = &mut self.worlds[self.current];
        if let Err(e) = world.execute(ctx, delta, elapsed) {
            error!(target: "world", "World `{}` failed to execute: {:#}", world.name(), e);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn check_detached(&self, index: usize, ctx: &SharedContext) {
        let name = self.worlds[index].name();
        if ctx.scene().has_owner(name) {
            warn!(
                target: "world",
                "World `{}` left content attached after exit",
                name
            );
        }
    }
}

impl std::fmt::Debug for WorldController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldController")
            .field("worlds", &self.names().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::testing::{call_log, context, CallLog, RecordingWorld};
    use crate::core::world::WorldRegistry;

    fn started(names: &[&str], log: &CallLog, ctx: &mut SharedContext) -> WorldController {
        let mut registry = WorldRegistry::new();
        for name in names {
            registry.register(RecordingWorld::new(name, log));
        }
        let controller = registry.start(ctx).unwrap();
        log.borrow_mut().clear();
        controller
    }

    fn entries(log: &CallLog) -> Vec<String> {
        log.borrow().clone()
    }

    //=====================================================================
    // Start
    //=====================================================================

    #[test]
    fn start_sets_up_all_in_order_before_any_enter() {
        let log = call_log();
        let mut registry = WorldRegistry::new();
        for name in ["a", "b", "c", "d"] {
            registry.register(RecordingWorld::new(name, &log));
        }

        let mut ctx = context();
        let controller = registry.start(&mut ctx).unwrap();

        assert_eq!(
            entries(&log),
            vec!["setup:a", "setup:b", "setup:c", "setup:d", "enter:a"]
        );
        assert_eq!(controller.current(), 0);
        assert_eq!(ctx.scene().owners(), vec!["a"]);
    }

    #[test]
    fn single_world_registry_starts() {
        let log = call_log();
        let mut ctx = context();
        let controller = started(&["solo"], &log, &mut ctx);

        assert_eq!(controller.len(), 1);
        assert_eq!(controller.current_name(), "solo");
    }

    //=====================================================================
    // Navigation
    //=====================================================================

    #[test]
    fn next_cycles_with_strict_exit_enter_alternation() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B", "C"], &log, &mut ctx);

        let nav = controller.navigate(WorldTransition::Next, &mut ctx).unwrap();
        assert_eq!(nav, Navigation::Moved { from: 0, to: 1 });
        assert_eq!(entries(&log), vec!["exit:A", "enter:B"]);
        assert_eq!(controller.current(), 1);

        controller.navigate(WorldTransition::Next, &mut ctx).unwrap();
        assert_eq!(controller.current(), 2);
        controller.navigate(WorldTransition::Next, &mut ctx).unwrap();
        assert_eq!(controller.current(), 0);

        assert_eq!(
            entries(&log),
            vec!["exit:A", "enter:B", "exit:B", "enter:C", "exit:C", "enter:A"]
        );
        for pair in entries(&log).windows(2) {
            assert_ne!(
                pair[0].split(':').next(),
                pair[1].split(':').next(),
                "Lifecycle calls must alternate"
            );
        }
    }

    #[test]
    fn next_n_times_returns_to_start() {
        for n in 1..=6 {
            let log = call_log();
            let mut ctx = context();
            let names: Vec<String> = (0..n).map(|i| format!("w{}", i)).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut controller = started(&names, &log, &mut ctx);

            controller.goto_world(n / 2, &mut ctx).unwrap();
            let start = controller.current();
            for _ in 0..n {
                controller.navigate(WorldTransition::Next, &mut ctx).unwrap();
            }
            assert_eq!(controller.current(), start, "registry of size {}", n);
        }
    }

    #[test]
    fn previous_wraps_to_last() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B", "C"], &log, &mut ctx);

        controller.navigate(WorldTransition::Previous, &mut ctx).unwrap();
        assert_eq!(controller.current(), 2);
        assert_eq!(entries(&log), vec!["exit:A", "enter:C"]);
    }

    #[test]
    fn goto_current_index_is_guarded() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B"], &log, &mut ctx);

        let nav = controller.goto_world(0, &mut ctx).unwrap();
        assert_eq!(nav, Navigation::Unchanged);
        assert!(entries(&log).is_empty(), "No exit/enter for same index");
        assert_eq!(ctx.scene().len(), 1, "No duplicate attachment");
    }

    #[test]
    fn goto_out_of_range_is_rejected() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B"], &log, &mut ctx);

        let err = controller.goto_world(5, &mut ctx).unwrap_err();
        assert_eq!(err, WorldError::OutOfRange { index: 5, len: 2 });
        assert_eq!(controller.current(), 0);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn only_current_world_is_ever_attached() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B", "C", "D"], &log, &mut ctx);

        let requests = [
            WorldTransition::Next,
            WorldTransition::Goto(3),
            WorldTransition::Previous,
            WorldTransition::Goto(2),
            WorldTransition::Goto(0),
            WorldTransition::Previous,
            WorldTransition::Next,
            WorldTransition::Goto(9),
        ];

        for request in requests {
            let _ = controller.navigate(request, &mut ctx);
            assert_eq!(ctx.scene().owners(), vec![controller.current_name()]);
            assert_eq!(ctx.scene().len(), 1);
        }
    }

    //=====================================================================
    // Tick
    //=====================================================================

    #[test]
    fn tick_executes_only_current_world() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B"], &log, &mut ctx);

        controller.tick(&mut ctx, 0.016, 0.016);
        controller.tick(&mut ctx, 0.016, 0.032);

        assert_eq!(entries(&log), vec!["execute:A", "execute:A"]);
    }

    #[test]
    fn transition_requested_in_execute_applies_next_tick() {
        let log = call_log();
        let mut ctx = context();
        let mut registry = WorldRegistry::new();
        registry.register(RecordingWorld::new("A", &log).requesting(WorldTransition::Next));
        registry.register(RecordingWorld::new("B", &log));
        let mut controller = registry.start(&mut ctx).unwrap();
        log.borrow_mut().clear();

        controller.tick(&mut ctx, 0.016, 0.016);
        assert_eq!(controller.current(), 0, "Request waits a frame");
        assert_eq!(ctx.pending_transition(), Some(WorldTransition::Next));

        controller.tick(&mut ctx, 0.016, 0.032);
        assert_eq!(controller.current(), 1);
        assert!(ctx.pending_transition().is_none());

        assert_eq!(
            entries(&log),
            vec!["execute:A", "exit:A", "enter:B", "execute:B"]
        );
    }

    #[test]
    fn external_request_applies_before_execute() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B", "C"], &log, &mut ctx);

        ctx.request_transition(WorldTransition::Goto(2));
        controller.tick(&mut ctx, 0.016, 0.016);

        assert_eq!(entries(&log), vec!["exit:A", "enter:C", "execute:C"]);
    }

    #[test]
    fn invalid_request_is_dropped_and_slot_cleared() {
        let log = call_log();
        let mut ctx = context();
        let mut controller = started(&["A", "B"], &log, &mut ctx);

        ctx.request_transition(WorldTransition::Goto(42));
        controller.tick(&mut ctx, 0.016, 0.016);

        assert_eq!(controller.current(), 0);
        assert!(ctx.pending_transition().is_none());
        assert_eq!(entries(&log), vec!["execute:A"]);
    }

    #[test]
    fn execute_error_keeps_world_current() {
        let log = call_log();
        let mut ctx = context();
        let mut registry = WorldRegistry::new();
        registry.register(RecordingWorld::new("A", &log).failing());
        registry.register(RecordingWorld::new("B", &log));
        let mut controller = registry.start(&mut ctx).unwrap();

        controller.tick(&mut ctx, 0.016, 0.016);
        controller.tick(&mut ctx, 0.016, 0.032);

        assert_eq!(controller.current(), 0);
    }

    #[test]
    fn leaked_content_is_still_detected_by_scene() {
        let log = call_log();
        let mut ctx = context();
        let mut registry = WorldRegistry::new();
        registry.register(RecordingWorld::new("A", &log).leaky());
        registry.register(RecordingWorld::new("B", &log));
        let mut controller = registry.start(&mut ctx).unwrap();

        controller.navigate(WorldTransition::Next, &mut ctx).unwrap();

        // Navigation proceeds; the leak is reported, not repaired.
        assert_eq!(controller.current(), 1);
        assert_eq!(ctx.scene().owners(), vec!["A", "B"]);
    }
}
