use serde::{Deserialize, Serialize};

/// Generation progress of a pathfinder volume, in strict pipeline order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GenerationState {
    #[default]
    NotInitialised,
    Initialised,
    GridGenerationDataReady,
    GridReady,
    ClustersReady,
    NodeDataReady,
    PathfinderVolumeReady,
}

/// What the state machine does with a requested state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Drop all generated data and return to `NotInitialised`.
    Reset,
    /// Run the phase that produces the requested state, then enter it.
    Advance,
    /// Out of sequence or already there; nothing happens.
    Ignore,
}

impl GenerationState {
    /// Every state after `NotInitialised`, in the order `generate` walks them.
    pub const PIPELINE: [GenerationState; 6] = [
        GenerationState::Initialised,
        GenerationState::GridGenerationDataReady,
        GenerationState::GridReady,
        GenerationState::ClustersReady,
        GenerationState::NodeDataReady,
        GenerationState::PathfinderVolumeReady,
    ];

    pub fn predecessor(self) -> Option<GenerationState> {
        match self {
            GenerationState::NotInitialised => None,
            GenerationState::Initialised => Some(GenerationState::NotInitialised),
            GenerationState::GridGenerationDataReady => Some(GenerationState::Initialised),
            GenerationState::GridReady => Some(GenerationState::GridGenerationDataReady),
            GenerationState::ClustersReady => Some(GenerationState::GridReady),
            GenerationState::NodeDataReady => Some(GenerationState::ClustersReady),
            GenerationState::PathfinderVolumeReady => Some(GenerationState::NodeDataReady),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == GenerationState::PathfinderVolumeReady
    }

    /// Name of the phase that completes when this state is entered.
    pub fn phase_name(self) -> &'static str {
        match self {
            GenerationState::NotInitialised => "Clear",
            GenerationState::Initialised => "Initialization",
            GenerationState::GridGenerationDataReady => "GenerateGridData",
            GenerationState::GridReady => "PopulateNavGrid",
            GenerationState::ClustersReady => "GenerateNavClusters",
            GenerationState::NodeDataReady => "GenerateNodeData",
            GenerationState::PathfinderVolumeReady => "GenerateNavVolume",
        }
    }
}

/// Guard for a state request. Resetting is always allowed; any other request
/// is honoured only from its exact predecessor.
pub fn plan_transition(current: GenerationState, desired: GenerationState) -> TransitionPlan {
    if desired == GenerationState::NotInitialised {
        return TransitionPlan::Reset;
    }
    if desired == current {
        return TransitionPlan::Ignore;
    }
    if desired.predecessor() == Some(current) {
        TransitionPlan::Advance
    } else {
        TransitionPlan::Ignore
    }
}
