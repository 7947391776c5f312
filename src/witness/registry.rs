//! Explicit table of witness procedures per operation parameter
//!
//! Entries are validated once when the registry is built: parameter and
//! dependency positions must exist, no entry may depend on itself, and the
//! dependencies among an operation's witnesses must be acyclic. Entries are
//! stored in the order the engine has to invoke them.

use super::{color, filter, identity, orthogonal, recolor, Spec, WitnessError, WitnessRequest};
use crate::config::Settings;
use crate::semantics::Operation;
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Signature shared by every registered witness
pub type WitnessFn = fn(&WitnessRequest) -> Result<Spec, WitnessError>;

/// One witness: which parameter it infers and which parameters it needs resolved first
#[derive(Clone)]
pub struct WitnessEntry {
    pub operation: Operation,
    pub param: usize,
    pub depends_on: Vec<usize>,
    pub func: WitnessFn,
}

impl fmt::Debug for WitnessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WitnessEntry")
            .field("operation", &self.operation)
            .field("param", &self.param)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Errors found while validating registrations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{op} has {arity} parameter(s); cannot register a witness for parameter {param}")]
    ParamOutOfRange { op: Operation, param: usize, arity: usize },

    #[error("{op} witness for parameter {param} depends on missing parameter {dependency}")]
    DependencyOutOfRange { op: Operation, param: usize, dependency: usize },

    #[error("{op} witness for parameter {param} depends on itself")]
    SelfDependency { op: Operation, param: usize },

    #[error("{op} already has a witness for parameter {param}")]
    Duplicate { op: Operation, param: usize },

    #[error("{op} witnesses for parameters [{}] depend on each other", params.iter().join(", "))]
    Cycle { op: Operation, params: Vec<usize> },
}

/// Collects registrations before validation
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<WitnessEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` as the witness for `param` of `operation`
    pub fn register(mut self, operation: Operation, param: usize, depends_on: &[usize], func: WitnessFn) -> Self {
        self.entries.push(WitnessEntry {
            operation,
            param,
            depends_on: depends_on.to_vec(),
            func,
        });
        self
    }

    /// Validate every entry and order each operation's witnesses by dependency
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut grouped: BTreeMap<Operation, Vec<WitnessEntry>> = BTreeMap::new();

        for entry in self.entries {
            let op = entry.operation;
            let arity = op.arity();
            if entry.param >= arity {
                return Err(RegistryError::ParamOutOfRange { op, param: entry.param, arity });
            }
            if let Some(&dependency) = entry.depends_on.iter().find(|&&dep| dep >= arity) {
                return Err(RegistryError::DependencyOutOfRange { op, param: entry.param, dependency });
            }
            if entry.depends_on.contains(&entry.param) {
                return Err(RegistryError::SelfDependency { op, param: entry.param });
            }

            let group = grouped.entry(op).or_default();
            if group.iter().any(|existing| existing.param == entry.param) {
                return Err(RegistryError::Duplicate { op, param: entry.param });
            }
            group.push(entry);
        }

        let entries = grouped
            .into_iter()
            .map(|(op, group)| dependency_order(op, group).map(|ordered| (op, ordered)))
            .collect::<Result<_, _>>()?;

        Ok(Registry { entries })
    }
}

/// Topological order of one operation's witnesses, lowest parameter first among ready ones
///
/// Dependencies on parameters without a witness are resolved by the engine
/// and do not constrain the order.
fn dependency_order(op: Operation, mut pending: Vec<WitnessEntry>) -> Result<Vec<WitnessEntry>, RegistryError> {
    pending.sort_by_key(|entry| entry.param);
    let witnessed: Vec<usize> = pending.iter().map(|entry| entry.param).collect();
    let mut ordered: Vec<WitnessEntry> = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().position(|entry| {
            entry
                .depends_on
                .iter()
                .filter(|&&dep| witnessed.contains(&dep))
                .all(|&dep| ordered.iter().any(|done| done.param == dep))
        });

        match ready {
            Some(index) => ordered.push(pending.remove(index)),
            None => {
                return Err(RegistryError::Cycle {
                    op,
                    params: pending.iter().map(|entry| entry.param).collect(),
                });
            }
        }
    }

    Ok(ordered)
}

/// Validated witness table
#[derive(Debug, Clone)]
pub struct Registry {
    entries: BTreeMap<Operation, Vec<WitnessEntry>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Witnesses for Recolor, FilterColor, Orthogonal and Identity
    pub fn standard() -> Result<Self, RegistryError> {
        Self::standard_builder().build()
    }

    /// Standard witnesses restricted to the operations enabled in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistryError> {
        let enabled = &settings.witness.operations;
        let builder = Self::standard_builder();
        RegistryBuilder {
            entries: builder
                .entries
                .into_iter()
                .filter(|entry| enabled.contains(&entry.operation))
                .collect(),
        }
        .build()
    }

    fn standard_builder() -> RegistryBuilder {
        Self::builder()
            .register(Operation::Recolor, recolor::COLOR, &[], color::color_spec)
            .register(Operation::Recolor, recolor::IMAGE, &[recolor::COLOR], recolor::image_spec)
            .register(Operation::FilterColor, filter::COLOR, &[], color::color_spec)
            .register(Operation::FilterColor, filter::IMAGE, &[filter::COLOR], filter::image_spec)
            .register(Operation::Orthogonal, orthogonal::MODE, &[orthogonal::IMAGE], orthogonal::mode_spec)
            .register(Operation::Identity, identity::IMAGE, &[], identity::image_spec)
    }

    /// Witnesses of `op` in invocation order
    pub fn witnesses(&self, op: Operation) -> &[WitnessEntry] {
        self.entries.get(&op).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry(&self, op: Operation, param: usize) -> Option<&WitnessEntry> {
        self.witnesses(op).iter().find(|entry| entry.param == param)
    }

    /// Operations with at least one witness
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries.keys().copied()
    }

    /// Total number of registered witnesses
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke the witness for `param` of `op`
    ///
    /// Every declared dependency must be resolved for every output state.
    pub fn invoke(&self, op: Operation, param: usize, request: &WitnessRequest) -> Result<Spec, WitnessError> {
        let entry = self.entry(op, param).ok_or_else(|| WitnessError::Unsupported {
            op,
            detail: format!("parameter {} (no witness registered)", param),
        })?;

        for &dependency in &entry.depends_on {
            for &state in request.outputs.keys() {
                request.dependency(dependency, state)?;
            }
        }

        let result = (entry.func)(request);
        match &result {
            Ok(_) => debug!("{} witness for parameter {} accepted {} state(s)", op, param, request.outputs.len()),
            Err(err) if err.prunes() => debug!("{} witness for parameter {} pruned: {}", op, param, err),
            Err(err) => debug!("{} witness for parameter {} failed: {}", op, param, err),
        }
        result
    }
}
