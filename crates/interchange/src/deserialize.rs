//! Deserialization from protocol JSON into the typed model.
//!
//! The main entry point is [`from_interchange`], which takes a
//! `&serde_json::Value` and produces a [`Document`]. Phrases dispatch on
//! their `kind` string; expressions carry no discriminator and are decoded
//! by trying each known shape in a fixed order (see [`parse_expression`]).

use crate::types::*;
use serde_json::Value;

/// Errors during protocol JSON deserialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterchangeError {
    /// The document `kind` is not one of `phrases`, `handshake`, `ping`.
    #[error("unknown kind: {0}")]
    UnknownDocumentKind(String),
    /// A phrase `kind` names no known phrase variant.
    #[error("unknown phrase kind: {0}")]
    UnknownPhraseKind(String),
    #[error("missing field: {field}")]
    MissingField { field: String },
    /// A field that the declared kind forbids is present.
    #[error("unexpected field: {field}")]
    UnexpectedField { field: String },
    /// A field is present but its value has the wrong shape.
    #[error("{kind}: invalid '{field}': {message}")]
    InvalidField {
        kind: String,
        field: String,
        message: String,
    },
    #[error("unknown expression type")]
    UnknownExpression,
    /// A JSON scalar that has no primitive counterpart (e.g. a fraction).
    #[error("unsupported primitive: {0}")]
    UnsupportedPrimitive(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}

/// Deserialize a protocol document.
///
/// The document kind and the presence of `phrases` are checked together:
/// `phrases` documents must carry the field, the other kinds must not.
pub fn from_interchange(doc: &Value) -> Result<Document, InterchangeError> {
    let kind_name = doc
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("kind"))?;
    let kind = DocumentKind::from_name(kind_name)
        .ok_or_else(|| InterchangeError::UnknownDocumentKind(kind_name.to_owned()))?;

    let version = doc
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("version"))?
        .to_owned();

    let updates = optional_bool(doc, "document", "updates")?;

    let phrases = match (kind.expects_phrases(), doc.get("phrases")) {
        (true, None) => return Err(missing("phrases")),
        (false, Some(_)) => {
            return Err(InterchangeError::UnexpectedField {
                field: "phrases".to_owned(),
            })
        }
        (false, None) => Vec::new(),
        (true, Some(arr)) => arr
            .as_array()
            .ok_or_else(|| invalid("document", "phrases", "expected an array"))?
            .iter()
            .map(parse_phrase)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(Document {
        version,
        kind,
        phrases,
        updates,
    })
}

/// Deserialize one phrase object, dispatching on its `kind` field.
pub fn parse_phrase(obj: &Value) -> Result<Phrase, InterchangeError> {
    let kind = obj
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("kind"))?;

    let body = match kind {
        "afact" => PhraseBody::AtomicFact(parse_atomic_fact(obj)?),
        "cfact" => PhraseBody::CompositeFact(parse_composite_fact(obj)?),
        "bquery" => PhraseBody::Query(parse_query(obj, QueryMarker::Bquery)?),
        "iquery" => PhraseBody::Query(parse_query(obj, QueryMarker::Iquery)?),
        "create" => PhraseBody::Statement(parse_statement(obj, StatementMarker::Create)?),
        "terminate" => PhraseBody::Statement(parse_statement(obj, StatementMarker::Terminate)?),
        "obfuscate" => PhraseBody::Statement(parse_statement(obj, StatementMarker::Obfuscate)?),
        "trigger" => PhraseBody::Statement(parse_statement(obj, StatementMarker::Trigger)?),
        "placeholder" => PhraseBody::Placeholder(parse_placeholder(obj)?),
        "predicate" => PhraseBody::Predicate(parse_predicate(obj)?),
        "event" => PhraseBody::Event(parse_event(obj)?),
        "act" => PhraseBody::Act(parse_act(obj)?),
        "duty" => PhraseBody::Duty(parse_duty(obj)?),
        "extend" => PhraseBody::Extend(parse_extend(obj)?),
        other => return Err(InterchangeError::UnknownPhraseKind(other.to_owned())),
    };

    Ok(Phrase {
        stateless: optional_bool(obj, kind, "stateless")?,
        updates: optional_bool(obj, kind, "updates")?,
        body,
    })
}

// ── Field helpers ───────────────────────────────────────────────────

fn missing(field: &str) -> InterchangeError {
    InterchangeError::MissingField {
        field: field.to_owned(),
    }
}

fn invalid(kind: &str, field: &str, message: impl Into<String>) -> InterchangeError {
    InterchangeError::InvalidField {
        kind: kind.to_owned(),
        field: field.to_owned(),
        message: message.into(),
    }
}

fn required_str(obj: &Value, kind: &str, field: &str) -> Result<String, InterchangeError> {
    match obj.get(field) {
        None => Err(missing(field)),
        Some(v) => v
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| invalid(kind, field, "expected a string")),
    }
}

fn optional_str(obj: &Value, kind: &str, field: &str) -> Result<Option<String>, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| invalid(kind, field, "expected a string")),
    }
}

fn optional_bool(obj: &Value, kind: &str, field: &str) -> Result<bool, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| invalid(kind, field, "expected a boolean")),
    }
}

fn string_list(obj: &Value, kind: &str, field: &str) -> Result<Vec<String>, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(arr)) => arr
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| invalid(kind, field, "expected an array of strings"))
            })
            .collect(),
        Some(_) => Err(invalid(kind, field, "expected an array of strings")),
    }
}

fn required_expr(obj: &Value, field: &str) -> Result<Expression, InterchangeError> {
    obj.get(field)
        .ok_or_else(|| missing(field))
        .and_then(parse_expression)
}

fn expr_list(obj: &Value, kind: &str, field: &str) -> Result<Vec<Expression>, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(arr)) => arr.iter().map(parse_expression).collect(),
        Some(_) => Err(invalid(kind, field, "expected an array of expressions")),
    }
}

fn parse_clauses(obj: &Value, kind: &str) -> Result<Clauses, InterchangeError> {
    let mut clauses = Clauses::default();
    for (field, list) in clauses.fields_mut() {
        *list = expr_list(obj, kind, field)?;
    }
    Ok(clauses)
}

/// Facts only carry the first three clause lists; anything else on a fact
/// object is rejected rather than silently dropped.
fn parse_fact_clauses(obj: &Value, kind: &str) -> Result<Clauses, InterchangeError> {
    for field in ["syncs-with", "creates", "terminates", "obfuscates"] {
        if obj.get(field).is_some() {
            return Err(InterchangeError::UnexpectedField {
                field: field.to_owned(),
            });
        }
    }
    parse_clauses(obj, kind)
}

// ── Phrase decoders ─────────────────────────────────────────────────

fn parse_atomic_fact(obj: &Value) -> Result<AtomicFact, InterchangeError> {
    let name = required_str(obj, "afact", "name")?;

    let element_type = match optional_str(obj, "afact", "type")? {
        None => ElementType::String,
        Some(t) => ElementType::from_name(&t)
            .ok_or_else(|| invalid("afact", "type", format!("unknown type '{}'", t)))?,
    };

    let range = match obj.get("range") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(arr)) => arr
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(Literal::Str(s.clone())),
                Value::Number(_) => match parse_primitive(v)? {
                    Some(Primitive::Int(n)) => Ok(Literal::Int(n)),
                    _ => Err(invalid("afact", "range", "expected strings or integers")),
                },
                _ => Err(invalid("afact", "range", "expected strings or integers")),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("afact", "range", "expected an array")),
    };

    Ok(AtomicFact {
        name,
        element_type,
        range,
        clauses: parse_fact_clauses(obj, "afact")?,
    })
}

fn parse_composite_fact(obj: &Value) -> Result<CompositeFact, InterchangeError> {
    let name = required_str(obj, "cfact", "name")?;
    if obj.get("identified-by").is_none() {
        return Err(missing("identified-by"));
    }
    let identified_by = string_list(obj, "cfact", "identified-by")?;
    if identified_by.is_empty() {
        return Err(invalid("cfact", "identified-by", "must name at least one fact"));
    }
    Ok(CompositeFact {
        name,
        identified_by,
        clauses: parse_fact_clauses(obj, "cfact")?,
    })
}

fn parse_query(obj: &Value, marker: QueryMarker) -> Result<Query, InterchangeError> {
    Ok(Query {
        marker,
        expression: required_expr(obj, "expression")?,
    })
}

fn parse_statement(obj: &Value, marker: StatementMarker) -> Result<Statement, InterchangeError> {
    Ok(Statement {
        marker,
        operand: required_expr(obj, "operand")?,
    })
}

fn parse_placeholder(obj: &Value) -> Result<Placeholder, InterchangeError> {
    let names = match obj.get("name") {
        None => return Err(missing("name")),
        Some(_) => string_list(obj, "placeholder", "name")?,
    };
    let name = match names.as_slice() {
        [single] => single.clone(),
        _ => {
            return Err(invalid(
                "placeholder",
                "name",
                "expected exactly one name",
            ))
        }
    };
    Ok(Placeholder {
        name,
        for_fact: required_str(obj, "placeholder", "for")?,
    })
}

fn parse_predicate(obj: &Value) -> Result<Predicate, InterchangeError> {
    Ok(Predicate {
        name: required_str(obj, "predicate", "name")?,
        is_invariant: optional_bool(obj, "predicate", "is-invariant")?,
        expression: required_expr(obj, "expression")?,
    })
}

fn parse_event(obj: &Value) -> Result<Event, InterchangeError> {
    Ok(Event {
        name: required_str(obj, "event", "name")?,
        related_to: string_list(obj, "event", "related-to")?,
        clauses: parse_clauses(obj, "event")?,
    })
}

fn parse_act(obj: &Value) -> Result<Act, InterchangeError> {
    Ok(Act {
        name: required_str(obj, "act", "name")?,
        actor: required_str(obj, "act", "actor")?,
        recipient: optional_str(obj, "act", "recipient")?,
        related_to: string_list(obj, "act", "related-to")?,
        clauses: parse_clauses(obj, "act")?,
    })
}

fn parse_duty(obj: &Value) -> Result<Duty, InterchangeError> {
    Ok(Duty {
        name: required_str(obj, "duty", "name")?,
        holder: required_str(obj, "duty", "holder")?,
        claimant: required_str(obj, "duty", "claimant")?,
        related_to: string_list(obj, "duty", "related-to")?,
        clauses: parse_clauses(obj, "duty")?,
        violated_when: required_expr(obj, "violated-when")?,
    })
}

fn parse_extend(obj: &Value) -> Result<Extend, InterchangeError> {
    let parent = required_str(obj, "extend", "parent-kind")?;
    let parent_kind = ParentKind::from_name(&parent).ok_or_else(|| {
        invalid(
            "extend",
            "parent-kind",
            format!("unknown parent kind '{}'", parent),
        )
    })?;
    Ok(Extend {
        parent_kind,
        name: required_str(obj, "extend", "name")?,
    })
}

// ── Expressions ─────────────────────────────────────────────────────

/// Deserialize an expression from its JSON shape.
///
/// Shapes are tried in order: scalar primitive, singleton string array
/// (reference), `identifier`+`operands` object (constructor application),
/// `operator`+`operands` object, `iterator`+`binds`+`expression` object.
/// When a shape matches but its contents are invalid, that error is
/// returned instead of trying the remaining shapes.
pub fn parse_expression(value: &Value) -> Result<Expression, InterchangeError> {
    if let Some(p) = parse_primitive(value)? {
        return Ok(Expression::Primitive(p));
    }
    if let Some(name) = parse_reference(value) {
        return Ok(Expression::Reference(name));
    }
    if let Some(app) = parse_application(value) {
        return app;
    }
    if let Some(op) = parse_operator(value) {
        return op;
    }
    if let Some(it) = parse_iterator(value) {
        return it;
    }
    Err(InterchangeError::UnknownExpression)
}

/// `Ok(None)` when the value is not a scalar at all.
fn parse_primitive(value: &Value) -> Result<Option<Primitive>, InterchangeError> {
    match value {
        Value::String(s) => Ok(Some(Primitive::Str(s.clone()))),
        Value::Bool(b) => Ok(Some(Primitive::Bool(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(Primitive::Int(i)));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(Some(Primitive::Int(f as i64)))
                }
                _ => Err(InterchangeError::UnsupportedPrimitive(n.to_string())),
            }
        }
        _ => Ok(None),
    }
}

fn parse_reference(value: &Value) -> Option<String> {
    match value.as_array()?.as_slice() {
        [Value::String(name)] => Some(name.clone()),
        _ => None,
    }
}

fn operands_of(obj: &Value) -> Option<Result<Vec<Expression>, InterchangeError>> {
    let arr = obj.get("operands")?;
    Some(match arr.as_array() {
        Some(items) => items.iter().map(parse_expression).collect(),
        None => Err(InterchangeError::UnknownExpression),
    })
}

fn parse_application(value: &Value) -> Option<Result<Expression, InterchangeError>> {
    let identifier = value.get("identifier")?.as_str()?.to_owned();
    let operands = operands_of(value)?;
    Some(operands.map(|operands| Expression::Application {
        identifier,
        operands,
    }))
}

fn parse_operator(value: &Value) -> Option<Result<Expression, InterchangeError>> {
    let name = value.get("operator")?.as_str()?;
    let operands = operands_of(value)?;
    Some(operands.and_then(|ops| {
        let operator = Operator::from_name(name)
            .ok_or_else(|| InterchangeError::UnknownOperator(name.to_owned()))?;
        let mut ops = ops.into_iter();
        match (ops.next(), ops.next(), ops.next()) {
            (Some(left), right, None) => Ok(Expression::Operator {
                operator,
                left: Box::new(left),
                right: right.map(Box::new),
            }),
            _ => Err(invalid(
                "expression",
                "operands",
                format!("operator {} takes one or two operands", name),
            )),
        }
    }))
}

fn parse_iterator(value: &Value) -> Option<Result<Expression, InterchangeError>> {
    let name = value.get("iterator")?.as_str()?;
    let binds = value.get("binds")?;
    let body = value.get("expression")?;
    Some(decode_iterator(name, binds, body))
}

fn decode_iterator(name: &str, binds: &Value, body: &Value) -> Result<Expression, InterchangeError> {
    let iterator = IteratorKind::from_name(name).ok_or_else(|| {
        invalid(
            "expression",
            "iterator",
            format!("unknown iterator '{}'", name),
        )
    })?;
    let bind = parse_reference(binds)
        .ok_or_else(|| invalid("expression", "binds", "expected exactly one bound name"))?;
    Ok(Expression::Iterator {
        iterator,
        bind,
        body: Box::new(parse_expression(body)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_document(phrases: Vec<Value>) -> Value {
        json!({
            "version": "0.1.0",
            "kind": "phrases",
            "phrases": phrases,
            "updates": true
        })
    }

    #[test]
    fn test_empty_document() {
        let doc = from_interchange(&make_document(vec![])).unwrap();
        assert_eq!(doc.version, "0.1.0");
        assert_eq!(doc.kind, DocumentKind::Phrases);
        assert!(doc.updates);
        assert!(doc.phrases.is_empty());
    }

    #[test]
    fn test_phrases_kind_requires_phrases() {
        let result = from_interchange(&json!({"version": "0.1.0", "kind": "phrases"}));
        match result.unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "phrases"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_handshake_forbids_phrases() {
        let result = from_interchange(&json!({
            "version": "0.1.0",
            "kind": "handshake",
            "phrases": [{"kind": "create", "operand": ["x"]}]
        }));
        match result.unwrap_err() {
            InterchangeError::UnexpectedField { field } => assert_eq!(field, "phrases"),
            other => panic!("expected UnexpectedField, got {:?}", other),
        }
    }

    #[test]
    fn test_ping_without_phrases() {
        let doc = from_interchange(&json!({"version": "0.1.0", "kind": "ping"})).unwrap();
        assert_eq!(doc.kind, DocumentKind::Ping);
        assert!(!doc.updates);
    }

    #[test]
    fn test_unknown_document_kind() {
        let result = from_interchange(&json!({"version": "0.1.0", "kind": "bundle"}));
        assert_eq!(
            result.unwrap_err(),
            InterchangeError::UnknownDocumentKind("bundle".to_owned())
        );
    }

    #[test]
    fn test_unknown_phrase_kind_names_it() {
        let err = parse_phrase(&json!({"kind": "bogus", "name": "x"})).unwrap_err();
        assert_eq!(err, InterchangeError::UnknownPhraseKind("bogus".to_owned()));
        assert!(err.to_string().contains("bogus"));

        let doc = make_document(vec![
            json!({"kind": "afact", "name": "a", "type": "String"}),
            json!({"kind": "bogus"}),
        ]);
        assert!(from_interchange(&doc).is_err());
    }

    #[test]
    fn test_parse_atomic_fact() {
        let phrase = parse_phrase(&json!({
            "kind": "afact",
            "name": "age",
            "type": "Int",
            "range": [1, 2, 3],
            "holds-when": [{"operator": "GT", "operands": [["age"], 0]}]
        }))
        .unwrap();
        match phrase.body {
            PhraseBody::AtomicFact(f) => {
                assert_eq!(f.name, "age");
                assert_eq!(f.element_type, ElementType::Int);
                assert_eq!(f.range, vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)]);
                assert_eq!(f.clauses.holds_when.len(), 1);
                assert!(f.clauses.derived_from.is_empty());
            }
            other => panic!("expected AtomicFact, got {:?}", other),
        }
    }

    #[test]
    fn test_atomic_fact_type_defaults_to_string() {
        let phrase = parse_phrase(&json!({"kind": "afact", "name": "person"})).unwrap();
        match phrase.body {
            PhraseBody::AtomicFact(f) => assert_eq!(f.element_type, ElementType::String),
            other => panic!("expected AtomicFact, got {:?}", other),
        }
    }

    #[test]
    fn test_atomic_fact_rejects_action_clauses() {
        let err = parse_phrase(&json!({
            "kind": "afact",
            "name": "a",
            "creates": [["b"]]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            InterchangeError::UnexpectedField {
                field: "creates".to_owned()
            }
        );
    }

    #[test]
    fn test_composite_fact_requires_identifiers() {
        let err = parse_phrase(&json!({"kind": "cfact", "name": "owns"})).unwrap_err();
        assert_eq!(
            err,
            InterchangeError::MissingField {
                field: "identified-by".to_owned()
            }
        );
        let ok = parse_phrase(&json!({
            "kind": "cfact",
            "name": "owns",
            "identified-by": ["person", "thing"]
        }))
        .unwrap();
        match ok.body {
            PhraseBody::CompositeFact(f) => assert_eq!(f.identified_by, vec!["person", "thing"]),
            other => panic!("expected CompositeFact, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_duty_requires_violated_when() {
        let err = parse_phrase(&json!({
            "kind": "duty",
            "name": "pay",
            "holder": "buyer",
            "claimant": "seller"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            InterchangeError::MissingField {
                field: "violated-when".to_owned()
            }
        );
    }

    #[test]
    fn test_parse_act_with_flags() {
        let phrase = parse_phrase(&json!({
            "kind": "act",
            "stateless": true,
            "name": "sell",
            "actor": "seller",
            "related-to": ["item"],
            "terminates": [["owns"]]
        }))
        .unwrap();
        assert!(phrase.stateless);
        assert!(!phrase.updates);
        match phrase.body {
            PhraseBody::Act(a) => {
                assert_eq!(a.actor, "seller");
                assert_eq!(a.recipient, None);
                assert_eq!(a.related_to, vec!["item"]);
                assert_eq!(a.clauses.terminates, vec![Expression::reference("owns")]);
            }
            other => panic!("expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_placeholder_name_array() {
        let phrase = parse_phrase(&json!({
            "kind": "placeholder",
            "name": ["buyer"],
            "for": "person"
        }))
        .unwrap();
        assert_eq!(
            phrase.body,
            PhraseBody::Placeholder(Placeholder {
                name: "buyer".to_owned(),
                for_fact: "person".to_owned()
            })
        );
        assert!(parse_phrase(&json!({
            "kind": "placeholder",
            "name": ["a", "b"],
            "for": "person"
        }))
        .is_err());
    }

    #[test]
    fn test_parse_extend() {
        let phrase =
            parse_phrase(&json!({"kind": "extend", "parent-kind": "Act", "name": "sell"})).unwrap();
        assert_eq!(
            phrase.body,
            PhraseBody::Extend(Extend {
                parent_kind: ParentKind::Act,
                name: "sell".to_owned()
            })
        );
    }

    #[test]
    fn test_trigger_statement() {
        let phrase = parse_phrase(&json!({"kind": "trigger", "operand": ["sell"]})).unwrap();
        assert_eq!(phrase.kind(), "trigger");
    }

    #[test]
    fn test_reference_shapes() {
        assert_eq!(
            parse_expression(&json!(["x"])).unwrap(),
            Expression::reference("x")
        );
        assert_eq!(
            parse_expression(&json!(["x", "y"])).unwrap_err(),
            InterchangeError::UnknownExpression
        );
        assert_eq!(
            parse_expression(&json!([])).unwrap_err(),
            InterchangeError::UnknownExpression
        );
    }

    #[test]
    fn test_primitive_numbers() {
        assert_eq!(parse_expression(&json!(7)).unwrap(), Expression::int(7));
        assert_eq!(parse_expression(&json!(3.0)).unwrap(), Expression::int(3));
        assert!(matches!(
            parse_expression(&json!(2.5)).unwrap_err(),
            InterchangeError::UnsupportedPrimitive(_)
        ));
        assert_eq!(
            parse_expression(&json!(true)).unwrap(),
            Expression::Primitive(Primitive::Bool(true))
        );
        assert_eq!(
            parse_expression(&json!("Alice")).unwrap(),
            Expression::string("Alice")
        );
        assert_eq!(
            parse_expression(&Value::Null).unwrap_err(),
            InterchangeError::UnknownExpression
        );
    }

    #[test]
    fn test_application_wins_over_operator_shape() {
        let e = parse_expression(&json!({
            "identifier": "owns",
            "operator": "ADD",
            "operands": [["a"], "B"]
        }))
        .unwrap();
        assert_eq!(
            e,
            Expression::Application {
                identifier: "owns".to_owned(),
                operands: vec![Expression::reference("a"), Expression::string("B")]
            }
        );
    }

    #[test]
    fn test_operator_arity() {
        assert!(parse_expression(&json!({"operator": "ADD", "operands": []})).is_err());
        assert!(parse_expression(&json!({"operator": "ADD", "operands": [1, 2, 3]})).is_err());
        assert_eq!(
            parse_expression(&json!({"operator": "PLUS", "operands": [1, 2]})).unwrap_err(),
            InterchangeError::UnknownOperator("PLUS".to_owned())
        );
        assert_eq!(
            parse_expression(&json!({"operator": "NOT", "operands": [["a"]]})).unwrap(),
            Expression::unary(Operator::Not, Expression::reference("a"))
        );
    }

    #[test]
    fn test_nested_error_propagates() {
        let err = parse_expression(&json!({
            "identifier": "owns",
            "operands": [0.5]
        }))
        .unwrap_err();
        assert!(matches!(err, InterchangeError::UnsupportedPrimitive(_)));
    }

    #[test]
    fn test_parse_iterator() {
        let e = parse_expression(&json!({
            "iterator": "FOREACH",
            "binds": ["p"],
            "expression": ["p"]
        }))
        .unwrap();
        assert_eq!(
            e,
            Expression::Iterator {
                iterator: IteratorKind::Foreach,
                bind: "p".to_owned(),
                body: Box::new(Expression::reference("p"))
            }
        );
    }

    #[test]
    fn test_unshaped_object_is_unknown() {
        assert_eq!(
            parse_expression(&json!({"value": 1})).unwrap_err(),
            InterchangeError::UnknownExpression
        );
    }
}
