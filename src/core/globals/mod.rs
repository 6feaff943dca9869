//=========================================================================
// Global Runtime State
//=========================================================================
//
// Separates the driver (logic) from the context (shared data).
//
// Architecture:
//   Runtime:       WorldController + FrameClock + InputRouter (owned by host)
//   SharedContext: assets + scene primitives + transition slot (passed to worlds)
//
//=========================================================================

//=== Module Declarations =================================================

mod runtime;
mod shared_context;

//=== Public API ==========================================================

pub use runtime::Runtime;
pub use shared_context::SharedContext;
