//! Structured control messages.
//!
//! A host posts a sparse JSON object. Parameter fields that are present are
//! applied, absent ones stay unchanged, unknown keys are ignored. An optional
//! `command` asks for the UI definitions or for teardown:
//!
//! ```json
//! { "command": "requestUiDefinitions" }
//! { "mix": 0.25, "roomSize": 0.9 }
//! { "command": "destruct" }
//! ```
//!
//! Handling happens on the control thread; it only touches the shared
//! atomics, never the audio-side engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{ParamUpdate, ReverbParams};
use crate::schema::ParamSpec;

/// Host request carried in a control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Reply with the parameter schema.
    RequestUiDefinitions,
    /// The host wants the instance torn down.
    Destruct,
    #[serde(other)]
    Unknown,
}

/// Sparse parameter update plus an optional command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMessage {
    #[serde(default)]
    pub command: Option<Command>,
    #[serde(default)]
    pub mix: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub damp: Option<f32>,
    #[serde(default)]
    pub room_size: Option<f32>,
    #[serde(default)]
    pub predelay_ms: Option<f32>,
    #[serde(default)]
    pub low_cut_hz: Option<f32>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl ControlMessage {
    pub fn command(command: Command) -> Self {
        Self { command: Some(command), ..Default::default() }
    }

    /// The parameter updates this message carries, in schema order.
    pub fn updates(&self) -> impl Iterator<Item = ParamUpdate> {
        [
            self.mix.map(ParamUpdate::Mix),
            self.width.map(ParamUpdate::Width),
            self.damp.map(ParamUpdate::Damp),
            self.room_size.map(ParamUpdate::RoomSize),
            self.predelay_ms.map(ParamUpdate::PredelayMs),
            self.low_cut_hz.map(ParamUpdate::LowCutHz),
            self.enabled.map(ParamUpdate::Enabled),
        ]
        .into_iter()
        .flatten()
    }
}

/// What the host gets back from [`ControlSurface::handle`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlReply {
    /// Present only when the message asked for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_definitions: Option<Vec<ParamSpec>>,
    /// The host should destroy the engine once audio processing has stopped.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub destroy_requested: bool,
    /// Number of parameter fields that were stored.
    pub applied: usize,
}

/// Control-thread handle over the shared parameter store.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    params: Arc<ReverbParams>,
}

impl ControlSurface {
    pub fn new(params: Arc<ReverbParams>) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    /// Apply the message's parameter fields, then act on its command.
    pub fn handle(&self, msg: &ControlMessage) -> ControlReply {
        let mut reply = ControlReply {
            applied: msg.updates().filter(|u| self.params.apply(*u)).count(),
            ..Default::default()
        };
        if reply.applied > 0 {
            log::debug!("control: {} parameter(s) updated", reply.applied);
        }

        match msg.command {
            Some(Command::RequestUiDefinitions) => {
                log::debug!("control: UI definitions requested");
                reply.ui_definitions = Some(self.params.describe());
            }
            Some(Command::Destruct) => {
                log::debug!("control: destruct requested");
                reply.destroy_requested = true;
            }
            Some(Command::Unknown) => log::debug!("control: unknown command ignored"),
            None => {}
        }
        reply
    }

    /// Parse and handle a JSON message. Malformed JSON is an error; nothing
    /// is applied in that case.
    pub fn handle_json(&self, json: &str) -> Result<ControlReply> {
        let msg: ControlMessage = serde_json::from_str(json)?;
        Ok(self.handle(&msg))
    }
}
