//! Line-delimited JSON commands over stdio.
//!
//! Request: `{"id": .., "cmd": "set.add", "payload": {..}}`.
//! Response: `{"id": .., "status": "ok", "payload": {..}}` or
//! `{"id": .., "status": "error", "message": ".."}`.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::model::project::ProjectConfig;
use crate::model::resource::DEFAULT_SOURCE_LOCALE;
use crate::model::translation_set::TranslationSet;

mod command;
mod project;
mod set;

pub use command::Command;

type Reply = Result<Value, String>;

/// State kept across requests: the working translation set and the open
/// project, if any.
#[derive(Debug)]
pub struct Session {
    pub set: TranslationSet,
    pub project: Option<ProjectConfig>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            set: TranslationSet::new(Some(DEFAULT_SOURCE_LOCALE)),
            project: None,
        }
    }

    pub fn source_locale(&self) -> &str {
        self.set.source_locale()
    }
}

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload.get(field).and_then(|v| v.as_str()).unwrap_or("")
}

/// Deserializes `payload.<field>`, treating a missing field as `null`.
fn get_field<T: DeserializeOwned>(payload: &Value, field: &str) -> Result<T, String> {
    let v = payload.get(field).cloned().unwrap_or(Value::Null);
    serde_json::from_value(v).map_err(|e| format!("invalid payload.{field}: {e}"))
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

pub fn handle(session: &mut Session, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    let cmd = Command::from(cmd_str);
    debug!("[Protocol] {cmd_str}");

    let reply = match cmd {
        Command::Ping => Ok(json!({ "message": "loctrans-core alive" })),
        Command::Unknown => Err("unknown command".to_string()),
        c if c.is_set_command() => set::handle(session, c, payload),
        c => project::handle(session, c, payload),
    };

    match reply {
        Ok(payload) => ok(id, payload),
        Err(message) => err(id, message),
    }
}
