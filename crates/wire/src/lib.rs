// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-wire: the JSON-shaped request/response contract for the control plane.
//!
//! Actual HTTP/WebSocket transport framing is out of scope here — this
//! crate defines only the *shape* of the bodies that cross the
//! control-plane boundary, as plain serde types with no socket or framing
//! code. `hf-daemon::ControlPlane` exposes one async method per [`Request`]
//! variant; an HTTP layer grafted on later would deserialize a `Request`
//! from a body and serialize back a [`Response`].

mod error;
mod event_frame;
mod request;
mod response;
mod types;

pub use error::WireError;
pub use event_frame::EventFrame;
pub use request::{
    CompleteJobRequest, FailJobRequest, HeartbeatRequest, JobProgressRequest, RegisterAgentRequest, Request,
    SpeedUpdateRequest, StatusUpdateRequest,
};
pub use response::Response;
pub use types::{AgentDto, ArtifactDto, JobDto};
