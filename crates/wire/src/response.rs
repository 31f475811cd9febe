// SPDX-License-Identifier: MIT

use crate::error::WireError;
use crate::types::{AgentDto, JobDto};
use serde::{Deserialize, Serialize};

/// Response bodies, one variant per control-plane operation. `Created` vs
/// `Updated` preserves the 201-on-first-attach / 200-on-subsequent
/// distinction for agent registration without needing an actual HTTP status
/// code here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Created { agent: AgentDto },
    Updated { agent: AgentDto },
    Accepted,
    NextJob { job: Option<JobDto> },
    Job { job: JobDto },
    Error { error: WireError },
}
