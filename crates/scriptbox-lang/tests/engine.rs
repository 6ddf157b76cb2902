//! End-to-end engine tests against an in-memory host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use scriptbox_lang::{compile, Capabilities, LangError, Limits};
use scriptbox_types::LogEntry;
use serde_json::{json, Value as Json};

/// Answers tools from a fixed table after yielding a few times.
#[derive(Default)]
struct TestHost {
    tools: HashMap<String, (Result<Json, String>, usize)>,
    calls: RefCell<Vec<(String, Json)>>,
    logs: RefCell<Vec<String>>,
}

impl TestHost {
    fn with_tool(mut self, name: &str, answer: Result<Json, String>) -> Self {
        self.tools.insert(name.to_string(), (answer, 1));
        self
    }

    fn with_slow_tool(mut self, name: &str, answer: Json, yields: usize) -> Self {
        self.tools.insert(name.to_string(), (Ok(answer), yields));
        self
    }
}

impl Capabilities for TestHost {
    fn call_tool(&self, name: &str, params: Json) -> LocalBoxFuture<'static, Result<Json, String>> {
        self.calls.borrow_mut().push((name.to_string(), params));
        let (answer, yields) = self
            .tools
            .get(name)
            .cloned()
            .unwrap_or_else(|| (Err(format!("unknown tool {name}")), 1));
        async move {
            for _ in 0..yields {
                tokio::task::yield_now().await;
            }
            answer
        }
        .boxed_local()
    }

    fn log(&self, entry: LogEntry) {
        self.logs.borrow_mut().push(entry.to_string());
    }
}

async fn run_with(
    source: &str,
    host: TestHost,
    limits: Limits,
) -> (Result<Option<Json>, LangError>, Rc<TestHost>) {
    let host = Rc::new(host);
    let script = compile(source).expect("script should compile");
    let outcome = script.run(host.clone(), limits).await;
    (outcome, host)
}

async fn run(source: &str) -> Result<Option<Json>, LangError> {
    run_with(source, TestHost::default(), Limits::default()).await.0
}

async fn value(source: &str) -> Json {
    run(source)
        .await
        .expect("script should succeed")
        .expect("script should return a value")
}

fn uncaught(result: Result<Option<Json>, LangError>) -> (String, String) {
    match result {
        Err(LangError::Uncaught { name, message }) => (name, message),
        other => panic!("expected an uncaught error, got {other:?}"),
    }
}

#[tokio::test]
async fn returns_json_values() {
    assert_eq!(value("return 1 + 2 * 3").await, json!(7));
    assert_eq!(value("return 0.1 + 0.2").await, json!(0.30000000000000004));
    assert_eq!(
        value(r#"return { list: [1, "x", true, null], nested: { ok: 1 } }"#).await,
        json!({"list": [1, "x", true, null], "nested": {"ok": 1}})
    );
}

#[tokio::test]
async fn missing_return_yields_nothing() {
    assert_eq!(run("const x = 1;").await, Ok(None));
    assert_eq!(run("return undefined").await, Ok(None));
    assert_eq!(run("return () => 1").await, Ok(None));
    assert_eq!(run("return null").await, Ok(Some(Json::Null)));
}

#[tokio::test]
async fn full_language_is_available() {
    let source = r#"
        class Counter {
            #n = 0;
            bump() { return ++this.#n; }
        }
        const c = new Counter();
        c.bump();

        let word;
        switch (c.bump()) {
            case 1: word = "one"; break;
            case 2: word = "two"; break;
            default: word = "many";
        }

        let hits = 0;
        outer: for (let i = 0; i < 3; i++) {
            for (;;) { hits++; continue outer; }
        }

        const seen = new Map([["a", 1]]);
        seen.set("b", 2);
        const gen = function* () { yield 1; yield 2; };

        return [
            word,
            hits,
            /a+b/.test("caab"),
            [...seen.keys()],
            new Set([1, 1, 2]).size,
            typeof Date.now(),
            [...gen()],
            `t${1 + 1}`,
        ];
    "#;
    assert_eq!(
        value(source).await,
        json!(["two", 3, true, ["a", "b"], 2, "number", [1, 2], "t2"])
    );
}

#[tokio::test]
async fn only_mcp_and_console_are_added() {
    let source = r#"
        return [typeof mcp, typeof console, typeof host, typeof require, typeof process,
                Object.keys(mcp).sort()];
    "#;
    assert_eq!(
        value(source).await,
        json!(["object", "object", "undefined", "undefined", "undefined",
               ["all", "allSettled", "callTool", "log"]])
    );
}

#[tokio::test]
async fn runs_do_not_share_globals() {
    assert_eq!(run("globalThis.leak = 1;").await, Ok(None));
    assert_eq!(value("return typeof leak").await, json!("undefined"));
}

#[tokio::test]
async fn tool_calls_reach_the_host() {
    let host = TestHost::default().with_tool("add", Ok(json!({"sum": 3})));
    let (result, host) = run_with(
        r#"const r = await mcp.callTool("add", { a: 1, b: 2 }); return r.sum;"#,
        host,
        Limits::default(),
    )
    .await;
    assert_eq!(result, Ok(Some(json!(3))));
    assert_eq!(
        host.calls.borrow().as_slice(),
        &[("add".to_string(), json!({"a": 1, "b": 2}))]
    );
}

#[tokio::test]
async fn missing_params_are_sent_as_null() {
    let host = TestHost::default().with_tool("noop", Ok(Json::Null));
    let (result, host) = run_with("return await mcp.callTool('noop')", host, Limits::default()).await;
    assert_eq!(result, Ok(Some(Json::Null)));
    assert_eq!(host.calls.borrow()[0].1, Json::Null);
}

#[tokio::test]
async fn tool_errors_reject_with_an_error() {
    let source = r#"
        try {
            await mcp.callTool("missing", {});
            return "unreachable";
        } catch (e) {
            return [e instanceof Error, e.message];
        }
    "#;
    assert_eq!(value(source).await, json!([true, "unknown tool missing"]));
}

#[tokio::test]
async fn unencodable_params_reject_the_call() {
    let (result, host) = run_with(
        "const a = {}; a.self = a; await mcp.callTool('t', a);",
        TestHost::default(),
        Limits::default(),
    )
    .await;
    let (name, _) = uncaught(result);
    assert_eq!(name, "TypeError");
    assert!(host.calls.borrow().is_empty());
}

#[tokio::test]
async fn combinators_wait_for_every_call() {
    let host = TestHost::default()
        .with_tool("one", Ok(json!(1)))
        .with_tool("two", Ok(json!(2)))
        .with_tool("bad", Err("nope".into()));
    let source = r#"
        const [a, b] = await mcp.all([mcp.callTool("one"), mcp.callTool("two")]);
        const settled = await mcp.allSettled([mcp.callTool("one"), mcp.callTool("bad")]);
        let failed;
        try { await mcp.all([mcp.callTool("two"), mcp.callTool("bad")]); }
        catch (e) { failed = e.message; }
        return [a + b, settled.map(s => s.status), settled[1].reason.message, failed];
    "#;
    let (result, _) = run_with(source, host, Limits::default()).await;
    assert_eq!(
        result,
        Ok(Some(json!([3, ["fulfilled", "rejected"], "nope", "nope"])))
    );
}

#[tokio::test]
async fn errors_keep_name_and_message_in_results() {
    let host = TestHost::default()
        .with_tool("a", Ok(json!("ok")))
        .with_tool("bad", Err("denied".into()));
    let source = r#"
        const settled = await mcp.allSettled([mcp.callTool("a"), mcp.callTool("bad")]);
        return { settled, thrown: new TypeError("wrong") };
    "#;
    let (result, _) = run_with(source, host, Limits::default()).await;
    assert_eq!(
        result,
        Ok(Some(json!({
            "settled": [
                {"status": "fulfilled", "value": "ok"},
                {"status": "rejected", "reason": {"name": "Error", "message": "denied"}}
            ],
            "thrown": {"name": "TypeError", "message": "wrong"}
        })))
    );
}

#[tokio::test]
async fn errors_keep_name_and_message_in_params() {
    let host = TestHost::default().with_tool("report", Ok(Json::Null));
    let (result, host) = run_with(
        "await mcp.callTool('report', { cause: new RangeError('far') });",
        host,
        Limits::default(),
    )
    .await;
    assert_eq!(result, Ok(None));
    assert_eq!(
        host.calls.borrow()[0].1,
        json!({"cause": {"name": "RangeError", "message": "far"}})
    );
}

#[tokio::test]
async fn unawaited_async_calls_keep_running() {
    let host = TestHost::default()
        .with_tool("one", Ok(json!("one")))
        .with_tool("two", Ok(json!("two")))
        .with_slow_tool("slow", json!(null), 20);
    let source = r#"
        const seen = [];
        async function work(name) {
            const r = await mcp.callTool(name, {});
            seen.push(r);
        }
        work("one");
        work("two");
        await mcp.callTool("slow", {});
        return seen.sort();
    "#;
    let (result, host) = run_with(source, host, Limits::default()).await;
    assert_eq!(result, Ok(Some(json!(["one", "two"]))));
    let names: Vec<String> = host.calls.borrow().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, ["one", "two", "slow"]);
}

#[tokio::test]
async fn pending_calls_are_dropped_when_the_body_settles() {
    let host = TestHost::default().with_slow_tool("slow", json!(1), 50);
    let (result, host) = run_with(
        "mcp.callTool('slow').then(() => console.log('late')); return 'done';",
        host,
        Limits::default(),
    )
    .await;
    assert_eq!(result, Ok(Some(json!("done"))));
    assert_eq!(host.calls.borrow().len(), 1);
    assert!(host.logs.borrow().is_empty());
}

#[tokio::test]
async fn async_functions_start_eagerly() {
    let (result, host) = run_with(
        r#"
        async function f() { console.log("inside"); await null; console.log("resumed"); }
        const p = f();
        console.log("after call");
        await p;
        "#,
        TestHost::default(),
        Limits::default(),
    )
    .await;
    assert_eq!(result, Ok(None));
    assert_eq!(
        host.logs.borrow().as_slice(),
        ["[log] inside", "[log] after call", "[log] resumed"]
    );
}

#[tokio::test]
async fn console_and_mcp_log_format_arguments() {
    let (result, host) = run_with(
        r#"
        console.log("a", 1, { x: 1 }, [1, 2], null, undefined, true);
        console.warn(new Error("boom"));
        const loop = {}; loop.loop = loop;
        console.error(loop);
        mcp.log("info", "hello", { n: 1 });
        mcp.log("debug", "plain");
        mcp.log(undefined, { id: 7 }, null);
        "#,
        TestHost::default(),
        Limits::default(),
    )
    .await;
    assert_eq!(result, Ok(None));
    assert_eq!(
        host.logs.borrow().as_slice(),
        [
            r#"[log] a 1 {"x":1} [1,2] null undefined true"#,
            "[warn] boom",
            "[error] [object Object]",
            r#"[info] hello {"n":1}"#,
            "[debug] plain",
            r#"[log] {"id":7}"#,
        ]
    );
}

#[tokio::test]
async fn uncaught_errors_carry_name_and_message() {
    let (name, message) = uncaught(run(r#"throw new TypeError("bad input")"#).await);
    assert_eq!((name.as_str(), message.as_str()), ("TypeError", "bad input"));

    let (name, message) = uncaught(run("return nope").await);
    assert_eq!(name, "ReferenceError");
    assert!(message.contains("nope"), "{message}");

    let (_, message) = uncaught(run(r#"throw "plain string""#).await);
    assert_eq!(message, "plain string");

    let (_, message) = uncaught(run(r#"throw """#).await);
    assert_eq!(message, "Uncaught exception");

    let (_, message) = uncaught(run("throw new Error()").await);
    assert_eq!(message, "Uncaught exception");
}

#[tokio::test]
async fn circular_results_are_type_errors() {
    let (name, _) = uncaught(run("const a = {}; a.self = a; return a;").await);
    assert_eq!(name, "TypeError");
}

#[tokio::test]
async fn runaway_recursion_is_a_catchable_error() {
    let source = r#"
        function f(n) { return f(n + 1) + 1; }
        try { f(0); } catch (e) { return e instanceof Error; }
    "#;
    assert_eq!(value(source).await, json!(true));

    let (result, _) = run_with(
        "function f(n) { return f(n + 1) + 1; } return f(0);",
        TestHost::default(),
        Limits {
            max_stack_size: 256 * 1024,
            ..Limits::default()
        },
    )
    .await;
    assert!(matches!(result, Err(ref e) if e.is_exhaustion()), "{result:?}");
}

#[tokio::test]
async fn heap_budget_is_enforced() {
    let (result, _) = run_with(
        "const hog = []; for (;;) hog.push(new Array(100000).fill(1));",
        TestHost::default(),
        Limits {
            max_heap_size: 8 * 1024 * 1024,
            ..Limits::default()
        },
    )
    .await;
    assert!(
        matches!(result, Err(ref e) if e.is_exhaustion() || matches!(e, LangError::Engine(_))),
        "{result:?}"
    );
}

#[test]
fn syntax_errors_report_line() {
    let err = compile("const x = 1;\n\nconst y = ;").expect_err("should not compile");
    assert!(err.is_syntax());
    match err {
        LangError::Syntax { line, .. } => assert_eq!(line, Some(3)),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn deeply_nested_source_is_rejected_not_overflowed() {
    let source = format!("return {}1{};", "(".repeat(100_000), ")".repeat(100_000));
    assert!(compile(&source).is_err());

    let chain = format!("return 1{};", " + 1".repeat(5_000));
    assert!(compile(&chain).is_ok());
}
