//! Tailspace Engine: real-time stereo reverb.
//!
//! Crate layout:
//! - [`engine`]  : `StereoKernel` trait and the block-processing `Engine<K>`
//! - [`reverb`]  : Freeverb-style kernel (combs + all-passes + width matrix)
//! - [`params`]  : lock-free parameter store and typed updates
//! - [`schema`]  : parameter names, ranges, defaults, UI definitions
//! - [`control`] : JSON control messages (`requestUiDefinitions`, `destruct`, sparse updates)
//! - [`events`]  : wait-free diagnostics ring drained into `log`
//! - [`config`]  : construction-time configuration
//! - [`error`]   : `EngineError` / `Result`
//!
//! The audio thread owns the engine and calls `process_block`; control threads
//! hold an `Arc<ReverbParams>` (or a `ControlSurface`) and the `EventLog`.
//!
//! ```
//! use tailspace_engine::ReverbEngine;
//!
//! let mut engine = ReverbEngine::create(48000.0, 96000.0).unwrap();
//! let params = engine.params();
//! params.set_room_size(0.9);
//!
//! let input = [0.0f32; 256];
//! let mut output = [0.0f32; 256];
//! engine.process_block(&input, &mut output, 128);
//! engine.destroy();
//! ```

pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod reverb;
pub mod schema;

pub use config::{EngineConfig, MAX_SAMPLE_RATE};
pub use control::{Command, ControlMessage, ControlReply, ControlSurface};
pub use engine::{Engine, ReverbEngine, StereoKernel};
pub use error::{EngineError, Result};
pub use events::{EventLog, RtEvent};
pub use params::{ParamSnapshot, ParamUpdate, ReverbParams};
pub use reverb::FreeverbKernel;
pub use schema::{describe, ParamId, ParamKind, ParamSpec};
