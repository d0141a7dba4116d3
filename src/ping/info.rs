//! Typed view over the modern status properties
//!
//! Extraction is lenient: a missing key or a value of the wrong type leaves
//! the field at its default.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub name: String,
    pub protocol: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayersInfo {
    pub max: i64,
    pub online: i64,
    pub sample: Vec<PlayerSample>,
}

/// Usual fields of a status response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub version: VersionInfo,
    pub players: PlayersInfo,
    /// Plain string, or the `text` of a chat component
    pub description: String,
    /// `data:image/png;base64,...`
    pub favicon: String,
}

fn string(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

// JSON numbers may come as floats
fn number(value: Option<&Value>) -> i64 {
    value.and_then(Value::as_f64).map(|n| n as i64).unwrap_or_default()
}

impl ServerInfo {
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let mut info = ServerInfo::default();

        if let Some(version) = properties.get("version").and_then(Value::as_object) {
            info.version.name = string(version.get("name"));
            info.version.protocol = number(version.get("protocol"));
        }

        if let Some(players) = properties.get("players").and_then(Value::as_object) {
            info.players.max = number(players.get("max"));
            info.players.online = number(players.get("online"));
            if let Some(sample) = players.get("sample").and_then(Value::as_array) {
                info.players.sample = sample
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|player| PlayerSample {
                        name: string(player.get("name")),
                        id: string(player.get("id")),
                    })
                    .collect();
            }
        }

        info.description = match properties.get("description") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Object(component)) => string(component.get("text")),
            _ => String::new(),
        };

        info.favicon = string(properties.get("favicon"));
        info
    }
}
