use std::cell::Cell;

use super::plan::TransformationPlan;
use crate::openapi::ir::utils::{capitalize_first, lower_first, sanitize_ts_identifier};

/// Index of a method inside its [`MethodRegistry`](super::MethodRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub(crate) usize);

/// Lifecycle of a transformation method.
///
/// `Unvisited -> Building -> Built -> ComputingEmptiness -> Done`. A method
/// may fall back from `ComputingEmptiness` to `Built` when its verdict was
/// only provisional (see `MethodRegistry::is_method_empty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodState {
    Unvisited,
    Building,
    Built,
    /// `depth` is the position of this method on the emptiness stack.
    ComputingEmptiness {
        depth: usize,
    },
    Done {
        empty: bool,
    },
}

/// The transform generated for one named component type.
#[derive(Debug)]
pub struct TransformationMethod {
    type_name: String,
    function_name: String,
    parameter_name: String,
    state: Cell<MethodState>,
    plan: Option<TransformationPlan>,
}

impl TransformationMethod {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            function_name: function_name_for(type_name),
            parameter_name: sanitize_ts_identifier(&lower_first(type_name)),
            state: Cell::new(MethodState::Unvisited),
            plan: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// `transform<TypeName>Response`
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn state(&self) -> MethodState {
        self.state.get()
    }

    /// The plan, once the method has been built.
    pub fn plan(&self) -> Option<&TransformationPlan> {
        self.plan.as_ref()
    }

    pub(crate) fn set_state(&self, state: MethodState) {
        self.state.set(state);
    }

    pub(crate) fn begin_build(&mut self) {
        self.state.set(MethodState::Building);
    }

    pub(crate) fn finish_build(&mut self, plan: TransformationPlan) {
        self.plan = Some(plan);
        self.state.set(MethodState::Built);
    }
}

fn function_name_for(type_name: &str) -> String {
    // Capitalized first so the sanitizer never sees a reserved word.
    let ident = sanitize_ts_identifier(&capitalize_first(type_name));
    format!("transform{}Response", capitalize_first(&ident))
}
