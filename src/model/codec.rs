//! JSON encoding of statements keyed by `statementType`
//!
//! A document is the statement's own fields plus a `statementType` tag. The
//! tag is the only thing decoding dispatches on; a missing or unknown tag is a
//! validation error rather than a guess at the statement's shape.
//!
//! ```text
//! {"statementType": "delete", "table": {"name": "canvas"},
//!  "filters": [{"name": "color", "value": "red", "relation": "EqualTo", "logicalRelation": "And"}]}
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as Json};

use super::statement::{Statement, StatementType};
use crate::error::{FacadeError, FacadeResult};

pub const STATEMENT_TYPE_KEY: &str = "statementType";

/// Encode a statement into a JSON document
pub fn encode(statement: &Statement) -> FacadeResult<Json> {
    let body = match statement {
        Statement::Select(s) => to_object(s)?,
        Statement::Insert(s) => to_object(s)?,
        Statement::Update(s) => to_object(s)?,
        Statement::Delete(s) => to_object(s)?,
    };

    let mut document = Map::with_capacity(body.len() + 1);
    document.insert(
        STATEMENT_TYPE_KEY.to_string(),
        Json::String(statement.statement_type().as_str().to_string()),
    );
    document.extend(body);
    Ok(Json::Object(document))
}

/// Decode a JSON document produced by [`encode`]
pub fn decode(document: &Json) -> FacadeResult<Statement> {
    let object = document
        .as_object()
        .ok_or_else(|| FacadeError::validation("statement document must be a JSON object"))?;

    let tag = object
        .get(STATEMENT_TYPE_KEY)
        .and_then(Json::as_str)
        .ok_or_else(|| FacadeError::validation("statement document has no statementType"))?;

    let mut body = object.clone();
    body.remove(STATEMENT_TYPE_KEY);
    let body = Json::Object(body);

    let statement = match StatementType::parse(tag)? {
        StatementType::Select => Statement::Select(from_body(body, tag)?),
        StatementType::Insert => Statement::Insert(from_body(body, tag)?),
        StatementType::Update => Statement::Update(from_body(body, tag)?),
        StatementType::Delete => Statement::Delete(from_body(body, tag)?),
    };
    Ok(statement)
}

pub fn to_json(statement: &Statement) -> FacadeResult<String> {
    let document = encode(statement)?;
    serde_json::to_string(&document)
        .map_err(|e| FacadeError::validation(format!("cannot serialize statement: {}", e)))
}

pub fn from_json(json: &str) -> FacadeResult<Statement> {
    let document: Json = serde_json::from_str(json)
        .map_err(|e| FacadeError::validation(format!("malformed statement document: {}", e)))?;
    decode(&document)
}

/// Deep copy through the encoded form, sharing nothing with the original
pub fn deep_clone<T: Serialize + DeserializeOwned>(value: &T) -> FacadeResult<T> {
    let json = serde_json::to_value(value)
        .map_err(|e| FacadeError::validation(format!("cannot serialize statement: {}", e)))?;
    serde_json::from_value(json)
        .map_err(|e| FacadeError::validation(format!("cannot deserialize statement: {}", e)))
}

fn to_object<T: Serialize>(value: &T) -> FacadeResult<Map<String, Json>> {
    match serde_json::to_value(value) {
        Ok(Json::Object(map)) => Ok(map),
        Ok(_) => Err(FacadeError::validation(
            "statement did not serialize to a JSON object",
        )),
        Err(e) => Err(FacadeError::validation(format!(
            "cannot serialize statement: {}",
            e
        ))),
    }
}

fn from_body<T: DeserializeOwned>(body: Json, tag: &str) -> FacadeResult<T> {
    serde_json::from_value(body)
        .map_err(|e| FacadeError::validation(format!("invalid {} statement: {}", tag, e)))
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match to_json(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}
