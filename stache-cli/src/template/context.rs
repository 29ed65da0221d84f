//! Name resolution and value semantics

use serde_json::{Number, Value};

/// Section values entered so far, innermost last
pub(super) struct Context<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> Context<'a> {
    pub(super) fn new(root: &'a Value) -> Self {
        Self { stack: vec![root] }
    }

    pub(super) fn push(&mut self, value: &'a Value) {
        self.stack.push(value);
    }

    pub(super) fn pop(&mut self) {
        self.stack.pop();
    }

    /// Resolve `name` against the innermost scope that has it
    ///
    /// `.` is the innermost value itself. Dotted names descend into objects
    /// and, with numeric segments, arrays.
    pub(super) fn lookup(&self, name: &str) -> Option<&'a Value> {
        if name == "." {
            return self.stack.last().copied();
        }

        self.stack
            .iter()
            .rev()
            .copied()
            .find_map(|scope| resolve(scope, name))
    }
}

fn resolve<'a>(scope: &'a Value, name: &str) -> Option<&'a Value> {
    name.split('.').try_fold(scope, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Whether a section over `value` renders
///
/// `null`, `false`, `0`, `""` and `[]` are falsy.
pub(super) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Text of `value` as interpolated into a template
pub(super) fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Integral floats print without a fraction: 2.0 renders as "2"
fn display_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
