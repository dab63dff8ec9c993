//! Data-driven style expression evaluation.
//!
//! Implements the subset of the expression language that scene layers use:
//! - `get`, `has`: feature property access
//! - `literal`, `coalesce`, `match`, `case`
//! - Comparison and logic: `==`, `!=`, `!`, `all`, `any`
//! - String and type: `concat`, `to-string`, `to-number`
//! - `zoom`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expression evaluation context containing feature properties and zoom level.
#[derive(Debug, Clone)]
pub struct EvalContext<'a> {
    pub properties: &'a Map<String, Value>,
    pub zoom: f64,
}

impl<'a> EvalContext<'a> {
    pub fn new(properties: &'a Map<String, Value>, zoom: f64) -> Self {
        Self { properties, zoom }
    }
}

/// An expression in array form, e.g. `["get", "model-id-key"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(pub Vec<Value>);

impl Expression {
    /// `["get", key]`
    pub fn get(key: &str) -> Self {
        Expression(vec![Value::from("get"), Value::from(key)])
    }

    /// `["literal", value]`
    pub fn literal(value: Value) -> Self {
        Expression(vec![Value::from("literal"), value])
    }

    pub fn operator(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    pub fn evaluate(&self, ctx: &EvalContext) -> Option<Value> {
        evaluate_array_expression(&self.0, ctx)
    }

    pub fn evaluate_string(&self, ctx: &EvalContext) -> Option<String> {
        match self.evaluate(ctx)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Evaluate any JSON value as an expression. Non-array values are literals.
pub fn evaluate_expression(expr: &Value, ctx: &EvalContext) -> Option<Value> {
    match expr {
        Value::Array(arr) => evaluate_array_expression(arr, ctx),
        other => Some(other.clone()),
    }
}

fn evaluate_array_expression(arr: &[Value], ctx: &EvalContext) -> Option<Value> {
    let op = arr.first()?.as_str()?;

    match op {
        "get" => {
            let key = arr.get(1)?.as_str()?;
            ctx.properties.get(key).cloned()
        }
        "has" => {
            let key = arr.get(1)?.as_str()?;
            Some(Value::Bool(ctx.properties.contains_key(key)))
        }
        "literal" => arr.get(1).cloned(),
        "coalesce" => arr[1..]
            .iter()
            .filter_map(|e| evaluate_expression(e, ctx))
            .find(|v| !v.is_null()),
        "match" => eval_match(arr, ctx),
        "case" => eval_case(arr, ctx),
        "==" | "!=" => {
            if arr.len() != 3 {
                return None;
            }
            let a = evaluate_expression(&arr[1], ctx).unwrap_or(Value::Null);
            let b = evaluate_expression(&arr[2], ctx).unwrap_or(Value::Null);
            let eq = values_equal(&a, &b);
            Some(Value::Bool(if op == "==" { eq } else { !eq }))
        }
        "!" => {
            let v = evaluate_expression(arr.get(1)?, ctx)?;
            Some(Value::Bool(!v.as_bool()?))
        }
        "all" => Some(Value::Bool(arr[1..].iter().all(|e| {
            evaluate_expression(e, ctx)
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        }))),
        "any" => Some(Value::Bool(arr[1..].iter().any(|e| {
            evaluate_expression(e, ctx)
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        }))),
        "concat" => {
            let mut out = String::new();
            for e in &arr[1..] {
                out.push_str(&value_to_string(&evaluate_expression(e, ctx)?));
            }
            Some(Value::String(out))
        }
        "to-string" => {
            let v = evaluate_expression(arr.get(1)?, ctx)?;
            Some(Value::String(value_to_string(&v)))
        }
        "to-number" => arr[1..]
            .iter()
            .filter_map(|e| evaluate_expression(e, ctx))
            .find_map(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
                _ => None,
            })
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "zoom" => serde_json::Number::from_f64(ctx.zoom).map(Value::Number),
        _ => None,
    }
}

// ["match", input, label1, out1, label2, out2, ..., fallback]
fn eval_match(arr: &[Value], ctx: &EvalContext) -> Option<Value> {
    if arr.len() < 3 {
        return None;
    }
    let input = evaluate_expression(&arr[1], ctx).unwrap_or(Value::Null);
    let body = &arr[2..];
    // label/output pairs plus a required fallback
    if body.len() % 2 == 0 {
        return None;
    }
    let (pairs, fallback) = body.split_at(body.len() - 1);
    for pair in pairs.chunks(2) {
        if pair.len() < 2 {
            break;
        }
        let hit = match &pair[0] {
            Value::Array(labels) => labels.iter().any(|l| values_equal(l, &input)),
            label => values_equal(label, &input),
        };
        if hit {
            return evaluate_expression(&pair[1], ctx);
        }
    }
    evaluate_expression(&fallback[0], ctx)
}

// ["case", cond1, out1, cond2, out2, ..., fallback]
fn eval_case(arr: &[Value], ctx: &EvalContext) -> Option<Value> {
    if arr.len() < 2 {
        return None;
    }
    let body = &arr[1..];
    if body.len() % 2 == 0 {
        return None;
    }
    let (pairs, fallback) = body.split_at(body.len() - 1);
    for pair in pairs.chunks(2) {
        if pair.len() < 2 {
            break;
        }
        let cond = evaluate_expression(&pair[0], ctx)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if cond {
            return evaluate_expression(&pair[1], ctx);
        }
    }
    evaluate_expression(&fallback[0], ctx)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            // integral floats print without a fraction: 7.0 -> "7"
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
