//! The host capability surface: the `mcp` and `console` objects.
//!
//! Values cross the engine boundary as JSON text. The JavaScript half of the
//! surface lives in `prelude.js`; the functions here are the only native
//! code a script can reach.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use rquickjs::{Ctx, Exception, Function, Object, Value};
use scriptbox_types::LogEntry;
use serde_json::Value as Json;
use tracing::{debug, trace};

const PRELUDE: &str = include_str!("prelude.js");

/// What a running script may ask of its host.
///
/// Implementations live outside the engine; the worker provides one that
/// forwards requests over the protocol.
pub trait Capabilities {
    /// Issues a tool call.
    ///
    /// The request is sent before this returns; the future settles with the
    /// host's answer (`Err` carries the host's error message).
    fn call_tool(&self, name: &str, params: Json) -> LocalBoxFuture<'static, Result<Json, String>>;

    /// Records a log entry.
    fn log(&self, entry: LogEntry);
}

/// Installs `mcp` and `console` as globals of `ctx`.
///
/// Returns the encoder used to turn script values into JSON text: errors
/// become `{name, message}`, values without a JSON form become `undefined`.
pub(crate) fn install<'js>(
    ctx: &Ctx<'js>,
    host: Rc<dyn Capabilities>,
) -> rquickjs::Result<Function<'js>> {
    let native = Object::new(ctx.clone())?;

    let tools = host.clone();
    native.set(
        "callTool",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>,
                  name: String,
                  params: String,
                  resolve: Function<'js>,
                  reject: Function<'js>| {
                call_tool(&ctx, tools.as_ref(), name, &params, resolve, reject)
            },
        )?,
    )?;
    native.set(
        "log",
        Function::new(
            ctx.clone(),
            move |level: String, message: String, fields: Option<String>| {
                let fields = fields.and_then(|text| serde_json::from_str::<Json>(&text).ok());
                host.log(LogEntry::with_fields(level, message, fields.as_ref()));
            },
        )?,
    )?;

    let factory: Function<'js> = ctx.eval(PRELUDE)?;
    let surface: Object<'js> = factory.call((native,))?;
    let globals = ctx.globals();
    globals.set("mcp", surface.get::<_, Object<'js>>("mcp")?)?;
    globals.set("console", surface.get::<_, Object<'js>>("console")?)?;
    surface.get("encode")
}

/// Forwards one tool call; the answer settles the script's promise through
/// `resolve` (JSON text) or `reject` (error message).
fn call_tool<'js>(
    ctx: &Ctx<'js>,
    host: &dyn Capabilities,
    name: String,
    params: &str,
    resolve: Function<'js>,
    reject: Function<'js>,
) -> rquickjs::Result<()> {
    let params: Json =
        serde_json::from_str(params).map_err(|e| Exception::throw_type(ctx, &e.to_string()))?;
    trace!(tool = %name, "script requested tool call");
    let answer = host.call_tool(&name, params);

    ctx.spawn(async move {
        let settled: rquickjs::Result<Value<'js>> = match answer.await {
            Ok(result) => resolve.call((result.to_string(),)),
            Err(message) => reject.call((message,)),
        };
        if let Err(e) = settled {
            debug!(tool = %name, error = %e, "settling tool call failed");
        }
    });
    Ok(())
}
