//! Per-state requests and results exchanged with the search engine

use super::WitnessError;
use crate::grid::{Image, PartialImage, MAX_COLOR};
use crate::semantics::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of one input/output example, assigned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}", self.0)
    }
}

/// Mapping from input state to a per-state value, iterated in state order
pub type StateMap<T> = BTreeMap<StateId, T>;

/// Input to one witness invocation
///
/// `outputs` holds the output constraint for every state; `resolved` holds,
/// per parameter position, the values the engine already fixed for each state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WitnessRequest {
    pub outputs: StateMap<PartialImage>,
    pub resolved: BTreeMap<usize, StateMap<Value>>,
}

impl WitnessRequest {
    pub fn new(outputs: StateMap<PartialImage>) -> Self {
        Self { outputs, resolved: BTreeMap::new() }
    }

    /// Request with a single state (`StateId(0)`)
    pub fn single(output: PartialImage) -> Self {
        Self::new(StateMap::from([(StateId(0), output)]))
    }

    /// Attach resolved values of parameter `param`
    pub fn with_resolved(mut self, param: usize, values: StateMap<Value>) -> Self {
        self.resolved.insert(param, values);
        self
    }

    /// Resolve parameter `param` to the same value in every output state
    pub fn with_resolved_all(self, param: usize, value: Value) -> Self {
        let values = self.outputs.keys().map(|&state| (state, value.clone())).collect();
        self.with_resolved(param, values)
    }

    /// Resolved value of `param` in `state`
    pub fn dependency(&self, param: usize, state: StateId) -> Result<&Value, WitnessError> {
        self.resolved
            .get(&param)
            .and_then(|values| values.get(&state))
            .ok_or(WitnessError::MissingDependency { param, state })
    }

    /// Resolved color of `param` in `state`; must be in 1..=9
    pub fn color(&self, param: usize, state: StateId) -> Result<u8, WitnessError> {
        let value = self.dependency(param, state)?;
        let color = value.as_color().ok_or_else(|| WitnessError::DependencyType {
            param,
            state,
            expected: crate::semantics::ValueKind::Color,
            found: value.kind(),
        })?;
        if !(1..=MAX_COLOR).contains(&color) {
            return Err(WitnessError::InvalidColor { param, state, color });
        }
        Ok(color)
    }

    /// Resolved concrete image of `param` in `state`
    pub fn image(&self, param: usize, state: StateId) -> Result<&Image, WitnessError> {
        let value = self.dependency(param, state)?;
        value.as_image().ok_or_else(|| WitnessError::DependencyType {
            param,
            state,
            expected: crate::semantics::ValueKind::Image,
            found: value.kind(),
        })
    }
}

/// Result of a successful witness invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    /// One constraint grid per state (grid-valued preimage)
    Partial(StateMap<PartialImage>),
    /// A non-empty admissible value set per state
    Disjunctive(StateMap<Vec<Value>>),
}

impl Spec {
    pub fn as_partial(&self) -> Option<&StateMap<PartialImage>> {
        match self {
            Spec::Partial(map) => Some(map),
            Spec::Disjunctive(_) => None,
        }
    }

    pub fn as_disjunctive(&self) -> Option<&StateMap<Vec<Value>>> {
        match self {
            Spec::Disjunctive(map) => Some(map),
            Spec::Partial(_) => None,
        }
    }

    /// Whether the result for `state` admits the concrete `value`
    pub fn admits(&self, state: StateId, value: &Value) -> bool {
        match (self, value) {
            (Spec::Partial(map), Value::Image(image)) => {
                map.get(&state).is_some_and(|constraint| constraint.accepts(image))
            }
            (Spec::Partial(_), _) => false,
            (Spec::Disjunctive(map), value) => {
                map.get(&state).is_some_and(|values| values.contains(value))
            }
        }
    }
}
