use crate::{Error, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateState {
    Received,
    Encoded,
    Invoked,
    Completed,
    Failed,
}

// Pipeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateEvent {
    ImageEncoded,
    ModelResponded,
    ResultExtracted,
    ErrorOccurred,
}

pub struct EstimateStateMachine {
    request_id: Uuid,
    state: EstimateState,
}

impl EstimateStateMachine {
    pub fn new(request_id: Uuid) -> Self {
        debug!("Estimate {} received", request_id);
        Self {
            request_id,
            state: EstimateState::Received,
        }
    }

    pub fn current_state(&self) -> EstimateState {
        self.state
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn transition(&mut self, event: EstimateEvent) -> Result<EstimateState> {
        let new_state = match (self.state, event) {
            (EstimateState::Received, EstimateEvent::ImageEncoded) => EstimateState::Encoded,
            (EstimateState::Encoded, EstimateEvent::ModelResponded) => EstimateState::Invoked,
            (EstimateState::Invoked, EstimateEvent::ResultExtracted) => EstimateState::Completed,
            (
                EstimateState::Received | EstimateState::Encoded | EstimateState::Invoked,
                EstimateEvent::ErrorOccurred,
            ) => EstimateState::Failed,
            _ => {
                warn!(
                    "Invalid estimate transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        if new_state.is_terminal() {
            info!(
                "Estimate {} finished: {:?} -> {:?}",
                self.request_id, self.state, new_state
            );
        } else {
            debug!(
                "Estimate {} transition: {:?} -> {:?} (event: {:?})",
                self.request_id, self.state, new_state, event
            );
        }

        self.state = new_state;
        Ok(new_state)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

impl EstimateState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
