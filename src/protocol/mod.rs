use std::path::Path;

use base64::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{CoreError, Result};
use crate::model::project::ProjectInfo;
use crate::model::record::{ExportRecord, Purpose, StringRecord};
use crate::parsers;
use crate::services::rebuild::ExportPayload;
use crate::services::{download, encoding, markup, merge, qa, rebuild};

mod command;
use command::Command;

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

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, error: &CoreError) -> String {
    json!({
        "id": id,
        "status": "error",
        "code": error.code(),
        "message": error.to_string()
    })
    .to_string()
}

fn required_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::InvalidPayload(format!("payload.{key} is required")))
}

fn field<T: DeserializeOwned + Default>(payload: &Value, key: &str) -> Result<T> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| CoreError::InvalidPayload(format!("invalid payload.{key}: {e}"))),
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| CoreError::InvalidPayload(format!("failed to serialize response: {e}")))
}

fn records_field<T: DeserializeOwned>(payload: &Value, key: &str) -> Result<Vec<T>> {
    let arr = payload
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| CoreError::InvalidPayload(format!("payload.{key} must be an array")))?;

    let mut records: Vec<T> = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<T>(v) {
            Ok(r) => records.push(r),
            Err(e) => {
                return Err(CoreError::InvalidPayload(format!(
                    "invalid {key} entry at index {i}: {e}"
                )))
            }
        }
    }

    Ok(records)
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "code": "invalid_payload",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    tracing::debug!("Handling command {cmd_str:?}");

    match dispatch(Command::from(cmd_str), payload) {
        Ok(v) => ok(id, v),
        Err(e) => {
            tracing::warn!("Command {cmd_str:?} failed: {e}");
            err(id, &e)
        }
    }
}

fn dispatch(cmd: Command, payload: &Value) -> Result<Value> {
    match cmd {
        Command::Ping => Ok(json!({ "message": "wts-core alive" })),

        Command::Parse => {
            let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
            let records = parsers::wts::parse(text)?;
            Ok(json!({ "records": records }))
        }

        Command::Import => {
            let path = required_str(payload, "path")?;
            let (records, decoded) = encoding::import_file(Path::new(path))?;
            Ok(json!({
                "records": records,
                "encoding": decoded.encoding,
                "had_bom": decoded.had_bom,
                "had_errors": decoded.had_errors
            }))
        }

        Command::Render => {
            let content = payload.get("content").and_then(|v| v.as_str()).unwrap_or("");
            let interpret = payload.get("interpret").and_then(|v| v.as_bool()).unwrap_or(false);
            Ok(json!({ "markup": markup::render(content, interpret) }))
        }

        Command::Serialize => {
            let records: Vec<ExportRecord> = records_field(payload, "records")?;
            let purpose: Purpose = field(payload, "purpose")?;
            let project: ProjectInfo = field(payload, "project")?;

            let export = rebuild::export(&records, purpose, &project)?;
            to_payload(&export)
        }

        Command::Download => {
            let export = ExportPayload {
                file_name: required_str(payload, "file_name")?.to_string(),
                file_content: payload
                    .get("file_content")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            };
            let file = download::prepare(&export)?;

            match payload.get("dir").and_then(|v| v.as_str()) {
                Some(dir) if !dir.is_empty() => {
                    let path = download::save_to(Path::new(dir), &file)?;
                    Ok(json!({ "path": path.to_string_lossy() }))
                }
                _ => Ok(json!({
                    "file_name": file.file_name,
                    "content_type": download::CONTENT_TYPE,
                    "bytes_base64": BASE64_STANDARD.encode(&file.bytes)
                })),
            }
        }

        Command::DetectEncoding => {
            let path = required_str(payload, "path")?;
            let result = encoding::detect_from_file(Path::new(path))?;
            to_payload(&result)
        }

        Command::RunQa => {
            let records: Vec<ExportRecord> = records_field(payload, "records")?;
            Ok(json!({ "issues": qa::run(&records) }))
        }

        Command::Merge => {
            let stored: Vec<ExportRecord> = records_field(payload, "stored")?;
            let parsed: Vec<StringRecord> = records_field(payload, "parsed")?;
            Ok(json!({ "plan": merge::plan(&stored, &parsed) }))
        }

        Command::Unknown => Err(CoreError::InvalidPayload("unknown command".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(req: Value) -> Value {
        serde_json::from_str(&handle(&req.to_string())).unwrap()
    }

    #[test]
    fn test_ping() {
        let resp = call(json!({ "id": 1, "cmd": "ping" }));
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["status"], "ok");
    }

    #[test]
    fn test_invalid_json() {
        let resp: Value = serde_json::from_str(&handle("{nope")).unwrap();
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "invalid json");
    }

    #[test]
    fn test_unknown_command() {
        let resp = call(json!({ "id": "x", "cmd": "project.list" }));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "unknown command");
    }

    #[test]
    fn test_parse_command() {
        let resp = call(json!({
            "id": 2,
            "cmd": "wts.parse",
            "payload": { "text": "STRING 7\n// note\n{\nhello\n}" }
        }));
        assert_eq!(
            resp["payload"]["records"],
            json!([{ "number": 7, "comment": "note", "content": "hello" }])
        );
    }

    #[test]
    fn test_parse_command_format_error() {
        let resp = call(json!({ "id": 3, "cmd": "wts.parse", "payload": { "text": "hello" } }));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["code"], "format_error");
    }

    #[test]
    fn test_render_command() {
        let resp = call(json!({
            "cmd": "wts.render",
            "payload": { "content": "a|cFFFF0000RED|rb", "interpret": true }
        }));
        assert_eq!(
            resp["payload"]["markup"],
            "a<span style=\"color:#FF0000\">RED</span>b"
        );
    }

    #[test]
    fn test_serialize_then_download() {
        let resp = call(json!({
            "cmd": "wts.serialize",
            "payload": {
                "purpose": "debug",
                "project": { "title": "Map", "locale": "en", "version": "2" },
                "records": [
                    {
                        "stringNumber": 5,
                        "originalText": "Hallo",
                        "translatedText": "Hi",
                        "completed": true
                    }
                ]
            }
        }));
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["payload"]["file_name"], "Map [en][2].wts");

        let resp = call(json!({ "cmd": "wts.download", "payload": resp["payload"].clone() }));
        let bytes = BASE64_STANDARD
            .decode(resp["payload"]["bytes_base64"].as_str().unwrap())
            .unwrap();
        assert_eq!(bytes, "\u{feff}STRING 5\r\n{\r\n[5]_Hi\r\n}".as_bytes());
        assert_eq!(resp["payload"]["content_type"], "application/octet-stream");
    }

    #[test]
    fn test_to_payload_reports_failure() {
        use std::collections::HashMap;

        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);
        let err = to_payload(&bad).unwrap_err();
        assert_eq!(err.code(), "invalid_payload");

        assert_eq!(to_payload(&vec![1, 2]).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_serialize_no_content() {
        let resp = call(json!({
            "cmd": "wts.serialize",
            "payload": {
                "purpose": "upload",
                "records": [{ "string_number": 1, "original_text": "a", "completed": false }]
            }
        }));
        assert_eq!(resp["code"], "no_content");
        assert_eq!(resp["message"], "no translated data available");
    }

    #[test]
    fn test_serialize_requires_records() {
        let resp = call(json!({ "cmd": "wts.serialize", "payload": {} }));
        assert_eq!(resp["code"], "invalid_payload");
        assert_eq!(resp["message"], "payload.records must be an array");
    }

    #[test]
    fn test_run_qa_and_merge() {
        let resp = call(json!({
            "cmd": "run_qa",
            "payload": {
                "records": [{ "string_number": 1, "original_text": "a", "completed": true }]
            }
        }));
        assert_eq!(resp["payload"]["issues"][0]["code"], "COMPLETED_BUT_EMPTY");

        let resp = call(json!({
            "cmd": "wts.merge",
            "payload": {
                "stored": [{ "string_number": 1, "original_text": "a" }],
                "parsed": [{ "number": 2, "content": "b" }]
            }
        }));
        assert_eq!(resp["payload"]["plan"]["removed"], json!([1]));
        assert_eq!(resp["payload"]["plan"]["added"][0]["number"], 2);
    }
}
