//! Pluggable script engines.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use scriptbox_lang::{compile, Capabilities, Limits};
use serde_json::Value;

use crate::error::ScriptError;

/// Future of one run: the returned value, `None` when nothing was returned.
pub type RunFuture = LocalBoxFuture<'static, Result<Option<Value>, ScriptError>>;

/// Compiles and runs script text against a capability context.
pub trait ScriptEngine {
    /// Compiles `code` without running it.
    fn check(&self, code: &str) -> Result<(), ScriptError>;

    /// Starts a run. Compile errors surface through the returned future.
    fn run(&self, code: &str, context: Rc<dyn Capabilities>) -> RunFuture;
}

/// Engine backed by the embedded QuickJS runtime.
#[derive(Debug, Clone, Default)]
pub struct LangEngine {
    limits: Limits,
}

impl LangEngine {
    /// Creates an engine applying `limits` to every run.
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }
}

impl ScriptEngine for LangEngine {
    fn check(&self, code: &str) -> Result<(), ScriptError> {
        compile(code).map(|_| ()).map_err(ScriptError::from)
    }

    fn run(&self, code: &str, context: Rc<dyn Capabilities>) -> RunFuture {
        match compile(code) {
            Ok(script) => {
                let run = script.run(context, self.limits);
                async move { run.await.map_err(ScriptError::from) }.boxed_local()
            }
            Err(e) => futures::future::ready(Err(ScriptError::from(e))).boxed_local(),
        }
    }
}
