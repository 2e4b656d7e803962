use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    model::{killmail::Killmail, names::ActorNames},
};

/// Message broadcast on the bus for every killmail.
///
/// On the wire this is one line of text, `"<topic> <json>"`, where the JSON body
/// is `{"killmail": ..., "names": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub killmail: Killmail,
    pub names: ActorNames,
}

impl BusMessage {
    pub fn encode(&self, topic: &str) -> Result<String, Error> {
        let body = serde_json::to_string(self)?;
        Ok(format!("{} {}", topic, body))
    }

    /// Parse a wire line, rejecting lines published on another topic
    pub fn decode(line: &str, topic: &str) -> Result<Self, Error> {
        let (line_topic, body) = line.split_once(' ').ok_or_else(|| {
            Error::MalformedPayload("bus message has no topic separator".to_string())
        })?;

        if line_topic != topic {
            return Err(Error::MalformedPayload(format!(
                "bus message topic {:?} does not match {:?}",
                line_topic, topic
            )));
        }

        serde_json::from_str(body).map_err(|e| Error::MalformedPayload(e.to_string()))
    }
}
