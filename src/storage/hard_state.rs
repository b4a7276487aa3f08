use serde::Deserialize;
use serde::Serialize;

/// Vote cast by this node, tagged with the term it was cast in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotedFor {
    pub voted_for_id: u32,
    pub voted_for_term: u64,
}

/// Raft state that must survive a restart before the node answers any RPC
///
/// Saved as a single value so term and vote always commit together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardState {
    pub current_term: u64,
    #[serde(default)]
    pub voted_for: Option<VotedFor>,
}
