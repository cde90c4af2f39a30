//! Wire codec for the StoryMaker protocol.
//!
//! Frames are single JSON objects `{type, data, context?}`. Command fields
//! are read from `data`; when `data` is absent they are read from the top
//! level of the frame, which is how the browser prototype sends them
//! (`{"type": "action", "id": "open"}`).
//!
//! A frame whose `type` is not a known command decodes to `Ok(None)` and
//! is ignored by the caller. Only structurally broken frames and known
//! commands with broken payloads are errors.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use storymaker_types::{
    ActionCommand, Command, CommandKind, Envelope, StartCommand, TopicName,
};

use crate::error::CodecError;

/// Parse a text frame into an envelope.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] if the frame is not a JSON object with
/// a string `type`.
pub fn decode_envelope(frame: &str) -> Result<Envelope, CodecError> {
    let value: Value =
        serde_json::from_str(frame).map_err(|e| CodecError::Malformed(e.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(CodecError::Malformed("frame is not a JSON object".to_owned()));
    };
    let kind = match fields.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => return Err(CodecError::Malformed("missing string `type`".to_owned())),
    };
    let context = fields.remove("context");
    let data = match fields.remove("data") {
        Some(data) if !data.is_null() => data,
        _ if fields.is_empty() => Value::Null,
        _ => Value::Object(fields),
    };
    Ok(Envelope {
        kind,
        data,
        context,
    })
}

/// Decode a client command frame.
///
/// Returns `Ok(None)` for types that are not commands.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for a broken frame, or
/// [`CodecError::InvalidPayload`] if a known command's fields do not fit.
pub fn decode_command(frame: &str) -> Result<Option<Command>, CodecError> {
    let envelope = decode_envelope(frame)?;
    let Some(kind) = CommandKind::parse(&envelope.kind) else {
        return Ok(None);
    };
    let command = match kind {
        CommandKind::Start => Command::Start(payload::<StartCommand>(kind, envelope.data)?),
        CommandKind::Ready => Command::Ready,
        CommandKind::Action => Command::Action(payload::<ActionCommand>(kind, envelope.data)?),
        CommandKind::Cancel => Command::Cancel,
    };
    Ok(Some(command))
}

fn payload<P: DeserializeOwned>(kind: CommandKind, data: Value) -> Result<P, CodecError> {
    serde_json::from_value(data).map_err(|source| CodecError::InvalidPayload { kind, source })
}

/// The topic an envelope is pushed on, if it names a known topic.
pub fn topic_of(envelope: &Envelope) -> Option<TopicName> {
    TopicName::parse(&envelope.kind)
}

/// Serialize an envelope to a text frame.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode(envelope: &Envelope) -> Result<String, CodecError> {
    Ok(serde_json::to_string(envelope)?)
}

/// Build the envelope a client sends for a command.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the payload fails to serialize.
pub fn command_envelope(command: &Command) -> Result<Envelope, CodecError> {
    let data = match command {
        Command::Start(start) => serde_json::to_value(start)?,
        Command::Action(action) => serde_json::to_value(action)?,
        Command::Ready | Command::Cancel => Value::Object(Map::new()),
    };
    Ok(Envelope::new(command.kind().as_str(), data))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use storymaker_types::InstanceId;

    use super::*;

    #[test]
    fn action_fields_may_sit_at_top_level() {
        let command = decode_command(r#"{"type":"action","id":"open"}"#).unwrap();
        assert_eq!(command, Some(Command::Action(ActionCommand::bare("open"))));
    }

    #[test]
    fn action_fields_in_data() {
        let frame = json!({
            "type": "action",
            "data": { "id": "give", "item": "battery_1", "target": "reader_front" }
        })
        .to_string();
        assert_eq!(
            decode_command(&frame).unwrap(),
            Some(Command::Action(ActionCommand {
                id: "give".into(),
                item: Some(InstanceId::from("battery_1")),
                target: Some(InstanceId::from("reader_front")),
            }))
        );
    }

    #[test]
    fn start_carries_name_and_seed() {
        let command = decode_command(r#"{"type":"start","data":{"name":"Ada","seed":42}}"#).unwrap();
        assert_eq!(
            command,
            Some(Command::Start(StartCommand {
                name: "Ada".to_owned(),
                seed: 42
            }))
        );
    }

    #[test]
    fn argumentless_commands_accept_null_data() {
        assert_eq!(decode_command(r#"{"type":"ready"}"#).unwrap(), Some(Command::Ready));
        assert_eq!(
            decode_command(r#"{"type":"cancel","data":null}"#).unwrap(),
            Some(Command::Cancel)
        );
    }

    #[test]
    fn unknown_types_are_ignored() {
        assert_eq!(decode_command(r#"{"type":"dance","data":{}}"#).unwrap(), None);
    }

    #[test]
    fn broken_frames_are_errors() {
        assert!(matches!(decode_command("not json"), Err(CodecError::Malformed(_))));
        assert!(matches!(decode_command("[1,2]"), Err(CodecError::Malformed(_))));
        assert!(matches!(decode_command(r#"{"data":{}}"#), Err(CodecError::Malformed(_))));
        assert!(matches!(
            decode_command(r#"{"type":"start","data":{"name":"Ada"}}"#),
            Err(CodecError::InvalidPayload {
                kind: CommandKind::Start,
                ..
            })
        ));
    }

    #[test]
    fn command_envelopes_decode_back_to_the_command() {
        let command = Command::Action(ActionCommand {
            id: "use".into(),
            item: Some(InstanceId::from("bandage_1")),
            target: None,
        });
        let frame = encode(&command_envelope(&command).unwrap()).unwrap();
        assert_eq!(decode_command(&frame).unwrap(), Some(command));
    }

    #[test]
    fn topic_context_survives_decoding() {
        let frame = r#"{"type":"actions","data":[],"context":{"verb":"use"}}"#;
        let envelope = decode_envelope(frame).unwrap();
        assert_eq!(topic_of(&envelope), Some(TopicName::Actions));
        assert_eq!(envelope.context, Some(json!({ "verb": "use" })));
        assert_eq!(envelope.data, json!([]));
    }
}
