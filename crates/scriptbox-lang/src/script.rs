//! Compiled scripts and run limits.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use rquickjs::{
    async_with, AsyncContext, AsyncRuntime, CatchResultExt, Context, Ctx, Promise, Runtime, Value,
};
use serde_json::Value as Json;
use tracing::trace;

use crate::error::LangError;
use crate::host::{self, Capabilities};

/// Default native stack budget of one run, in bytes.
pub const DEFAULT_MAX_STACK_SIZE: usize = 1024 * 1024; // 1 MiB

/// Default heap budget of one run, in bytes.
pub const DEFAULT_MAX_HEAP_SIZE: usize = 64 * 1024 * 1024; // 64 MiB

/// Resource limits applied to one run.
///
/// Exceeding either limit raises a catchable error inside the script; an
/// uncaught one fails the run. `max_heap_size = 0` leaves the heap unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_stack_size: usize,
    pub max_heap_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_heap_size: DEFAULT_MAX_HEAP_SIZE,
        }
    }
}

/// Script source that compiled once, ready to run any number of times.
#[derive(Debug, Clone)]
pub struct Script {
    source: Rc<str>,
}

/// Wraps `source` as the body of an async function expression. The body
/// starts on the first line so reported line numbers match the source.
fn wrap(source: &str) -> String {
    format!("(async function () {{{source}\n}})")
}

/// Compiles `source` as the body of an async function, without running it.
pub fn compile(source: &str) -> Result<Script, LangError> {
    let runtime = Runtime::new().map_err(LangError::engine)?;
    runtime.set_max_stack_size(DEFAULT_MAX_STACK_SIZE);
    let context = Context::full(&runtime).map_err(LangError::engine)?;
    context.with(|ctx| {
        ctx.eval::<Value, _>(wrap(source))
            .catch(&ctx)
            .map(drop)
            .map_err(LangError::compile)
    })?;
    Ok(Script {
        source: source.into(),
    })
}

impl Script {
    /// Runs the script against `host` on a fresh engine runtime.
    ///
    /// The returned future completes when the script body settles: `Ok(None)`
    /// when it produced no JSON-representable value. Work still pending at
    /// that point (unawaited tool calls, their continuations) is dropped
    /// together with the runtime.
    pub fn run(
        &self,
        host: Rc<dyn Capabilities>,
        limits: Limits,
    ) -> LocalBoxFuture<'static, Result<Option<Json>, LangError>> {
        let source = format!("{}()", wrap(&self.source));
        async move {
            let runtime = AsyncRuntime::new().map_err(LangError::engine)?;
            runtime.set_max_stack_size(limits.max_stack_size).await;
            if limits.max_heap_size > 0 {
                runtime.set_memory_limit(limits.max_heap_size).await;
            }
            let context = AsyncContext::full(&runtime)
                .await
                .map_err(LangError::engine)?;
            trace!(stack = limits.max_stack_size, heap = limits.max_heap_size, "engine ready");

            async_with!(context => |ctx| {
                evaluate(ctx, source, host).await
            })
            .await
        }
        .boxed_local()
    }
}

async fn evaluate<'js>(
    ctx: Ctx<'js>,
    source: String,
    host: Rc<dyn Capabilities>,
) -> Result<Option<Json>, LangError> {
    let encode = host::install(&ctx, host)
        .catch(&ctx)
        .map_err(LangError::uncaught)?;
    let body: Promise<'js> = ctx.eval(source).catch(&ctx).map_err(LangError::compile)?;
    let value = body
        .into_future::<Value<'js>>()
        .await
        .catch(&ctx)
        .map_err(LangError::uncaught)?;
    let text: Option<String> = encode
        .call((value,))
        .catch(&ctx)
        .map_err(LangError::uncaught)?;
    text.map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| LangError::Uncaught {
            name: "TypeError".into(),
            message: format!("result cannot be returned: {e}"),
        })
}
