//! Serialization of the typed model into protocol JSON.
//!
//! Keys are inserted in protocol order; the workspace builds `serde_json`
//! with `preserve_order` so the emitted objects keep that order.

use crate::types::*;
use serde_json::{json, Map, Value};

/// Serialize a whole document.
pub fn to_interchange(doc: &Document) -> Value {
    let mut m = Map::new();
    m.insert("version".to_owned(), json!(doc.version));
    m.insert("kind".to_owned(), json!(doc.kind.as_str()));
    if doc.kind.expects_phrases() {
        let phrases: Vec<Value> = doc.phrases.iter().map(serialize_phrase).collect();
        m.insert("phrases".to_owned(), Value::Array(phrases));
    }
    m.insert("updates".to_owned(), json!(doc.updates));
    Value::Object(m)
}

pub fn serialize_phrase(phrase: &Phrase) -> Value {
    let mut m = Map::new();
    m.insert("kind".to_owned(), json!(phrase.kind()));
    if phrase.stateless {
        m.insert("stateless".to_owned(), json!(true));
    }
    if phrase.updates {
        m.insert("updates".to_owned(), json!(true));
    }

    match &phrase.body {
        PhraseBody::AtomicFact(f) => {
            m.insert("name".to_owned(), json!(f.name));
            m.insert("type".to_owned(), json!(f.element_type.as_str()));
            if !f.range.is_empty() {
                let range: Vec<Value> = f.range.iter().map(serialize_literal).collect();
                m.insert("range".to_owned(), Value::Array(range));
            }
            insert_clauses(&mut m, &f.clauses);
        }
        PhraseBody::CompositeFact(f) => {
            m.insert("name".to_owned(), json!(f.name));
            m.insert("identified-by".to_owned(), json!(f.identified_by));
            insert_clauses(&mut m, &f.clauses);
        }
        PhraseBody::Query(q) => {
            m.insert("expression".to_owned(), serialize_expr(&q.expression));
        }
        PhraseBody::Statement(s) => {
            m.insert("operand".to_owned(), serialize_expr(&s.operand));
        }
        PhraseBody::Placeholder(p) => {
            m.insert("name".to_owned(), json!([p.name]));
            m.insert("for".to_owned(), json!(p.for_fact));
        }
        PhraseBody::Predicate(p) => {
            if p.is_invariant {
                m.insert("is-invariant".to_owned(), json!(true));
            }
            m.insert("name".to_owned(), json!(p.name));
            m.insert("expression".to_owned(), serialize_expr(&p.expression));
        }
        PhraseBody::Event(e) => {
            m.insert("name".to_owned(), json!(e.name));
            insert_related(&mut m, &e.related_to);
            insert_clauses(&mut m, &e.clauses);
        }
        PhraseBody::Act(a) => {
            m.insert("name".to_owned(), json!(a.name));
            m.insert("actor".to_owned(), json!(a.actor));
            if let Some(r) = &a.recipient {
                m.insert("recipient".to_owned(), json!(r));
            }
            insert_related(&mut m, &a.related_to);
            insert_clauses(&mut m, &a.clauses);
        }
        PhraseBody::Duty(d) => {
            m.insert("name".to_owned(), json!(d.name));
            m.insert("holder".to_owned(), json!(d.holder));
            m.insert("claimant".to_owned(), json!(d.claimant));
            insert_related(&mut m, &d.related_to);
            insert_clauses(&mut m, &d.clauses);
            m.insert("violated-when".to_owned(), serialize_expr(&d.violated_when));
        }
        PhraseBody::Extend(e) => {
            m.insert("parent-kind".to_owned(), json!(e.parent_kind.as_str()));
            m.insert("name".to_owned(), json!(e.name));
        }
    }
    Value::Object(m)
}

fn insert_related(m: &mut Map<String, Value>, related_to: &[String]) {
    if !related_to.is_empty() {
        m.insert("related-to".to_owned(), json!(related_to));
    }
}

fn insert_clauses(m: &mut Map<String, Value>, clauses: &Clauses) {
    for (field, exprs) in clauses.fields() {
        if !exprs.is_empty() {
            let arr: Vec<Value> = exprs.iter().map(serialize_expr).collect();
            m.insert(field.to_owned(), Value::Array(arr));
        }
    }
}

fn serialize_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Str(s) => json!(s),
        Literal::Int(n) => json!(n),
    }
}

fn serialize_primitive(p: &Primitive) -> Value {
    match p {
        Primitive::Str(s) => json!(s),
        Primitive::Int(n) => json!(n),
        Primitive::Bool(b) => json!(b),
    }
}

pub fn serialize_expr(expr: &Expression) -> Value {
    match expr {
        Expression::Primitive(p) => serialize_primitive(p),
        Expression::Reference(name) => json!([name]),
        Expression::Application {
            identifier,
            operands,
        } => {
            let mut m = Map::new();
            m.insert("identifier".to_owned(), json!(identifier));
            let ops: Vec<Value> = operands.iter().map(serialize_expr).collect();
            m.insert("operands".to_owned(), Value::Array(ops));
            Value::Object(m)
        }
        Expression::Operator {
            operator,
            left,
            right,
        } => {
            let mut ops = vec![serialize_expr(left)];
            if let Some(r) = right {
                ops.push(serialize_expr(r));
            }
            let mut m = Map::new();
            m.insert("operator".to_owned(), json!(operator.name()));
            m.insert("operands".to_owned(), Value::Array(ops));
            Value::Object(m)
        }
        Expression::Iterator {
            iterator,
            bind,
            body,
        } => {
            let mut m = Map::new();
            m.insert("iterator".to_owned(), json!(iterator.as_str()));
            m.insert("binds".to_owned(), json!([bind]));
            m.insert("expression".to_owned(), serialize_expr(body));
            Value::Object(m)
        }
    }
}
