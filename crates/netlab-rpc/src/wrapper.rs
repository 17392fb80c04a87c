//! Response wrapping for the front-end.
//!
//! The front-end expects `{success: bool, ...data}` objects, while the core
//! returns raw values. List results get a named field; objects are merged.

use serde_json::{json, Value};

/// Wrap a raw method result into the front-end's response shape.
pub fn wrap_response(method: &str, result: Value) -> Value {
    match method {
        "get_network_logs" => wrap_list("logs", result),
        "list_posts" => wrap_list("posts", result),
        "create_post" => json!({"success": true, "post": result}),
        "get_retry_state" => json!({"success": true, "retry": result}),

        // TimedFetch carries its own success flag.
        "fetch_with_timeout" => result,

        _ => merge_success(result),
    }
}

fn wrap_list(field: &str, result: Value) -> Value {
    let items = if result.is_null() { json!([]) } else { result };
    let mut wrapped = json!({"success": true});
    wrapped[field] = items;
    wrapped
}

fn merge_success(result: Value) -> Value {
    match result {
        Value::Object(mut map) => {
            map.entry("success").or_insert(Value::Bool(true));
            Value::Object(map)
        }
        Value::Bool(ok) => json!({"success": ok}),
        Value::Null => json!({"success": true}),
        other => json!({"success": true, "result": other}),
    }
}
