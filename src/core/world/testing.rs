//=========================================================================
// World Test Doubles
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;

use super::{World, WorldTransition};
use crate::core::assets::AssetRegistry;
use crate::core::globals::SharedContext;
use crate::core::scene::{NodeId, SceneNode, ShaderTable};

/// Shared, ordered record of lifecycle calls across worlds.
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn context() -> SharedContext {
    SharedContext::new(AssetRegistry::default(), ShaderTable::default())
}

/// World that records every lifecycle call as `"<op>:<name>"` and
/// attaches one node while current.
pub(crate) struct RecordingWorld {
    name: String,
    log: CallLog,
    content: Option<SceneNode>,
    attached: Option<NodeId>,
    request: Option<WorldTransition>,
    fail: bool,
    leak_on_exit: bool,
}

impl RecordingWorld {
    pub(crate) fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Rc::clone(log),
            content: None,
            attached: None,
            request: None,
            fail: false,
            leak_on_exit: false,
        }
    }

    /// Requests `transition` from every `execute`.
    pub(crate) fn requesting(mut self, transition: WorldTransition) -> Self {
        self.request = Some(transition);
        self
    }

    /// Makes every `execute` fail.
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Forgets to detach on `exit`.
    pub(crate) fn leaky(mut self) -> Self {
        self.leak_on_exit = true;
        self
    }

    fn record(&self, op: &str) {
        self.log.borrow_mut().push(format!("{}:{}", op, self.name));
    }
}

impl World for RecordingWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, ctx: &mut SharedContext) {
        self.record("setup");
        self.content = Some(ctx.scene_mut().create_node(&self.name, "content"));
    }

    fn enter(&mut self, ctx: &mut SharedContext) {
        self.record("enter");
        if let Some(node) = self.content.take() {
            self.attached = Some(ctx.scene_mut().attach(node));
        }
    }

    fn exit(&mut self, ctx: &mut SharedContext) {
        self.record("exit");
        if self.leak_on_exit {
            return;
        }
        if let Some(id) = self.attached.take() {
            self.content = ctx.scene_mut().detach(id);
        }
    }

    fn execute(&mut self, ctx: &mut SharedContext, _delta: f32, _elapsed: f32) -> anyhow::Result<()> {
        self.record("execute");
        if let Some(transition) = self.request {
            ctx.request_transition(transition);
        }
        if self.fail {
            bail!("{} blew up", self.name);
        }
        Ok(())
    }
}
