//! Registry of per-type transformation methods.
//!
//! The registry is the arena for the (possibly cyclic) graph of named types:
//! a method is inserted before its schema is planned, so a type that refers
//! back to itself, directly or through other types, resolves to the method
//! that is already being built instead of re-entering the planner.
//!
//! Emptiness is decided lazily. While a method's verdict is being computed
//! its state records its depth on the evaluation stack; reaching it again
//! yields "empty" (a cycle on its own never needs a transformation). An
//! "empty" verdict that leaned on a method further down the stack is kept
//! as provisional until that method settles: it is committed when the
//! method turns out empty and dropped when it turns out non-empty. Every
//! method is therefore evaluated at most once per settled cycle head.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::method::{MethodId, MethodState, TransformationMethod};
use super::plan::{Planner, TransformationPlan};
use crate::openapi::error::TransformError;
use crate::openapi::spec::SchemaOrBool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Verdict {
    empty: bool,
    /// Shallowest in-progress method this verdict assumed to be empty.
    pending: Option<usize>,
}

impl Verdict {
    const EMPTY: Verdict = Verdict {
        empty: true,
        pending: None,
    };
    const NON_EMPTY: Verdict = Verdict {
        empty: false,
        pending: None,
    };
}

/// One generation run's methods, in first-reference order.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: IndexMap<String, TransformationMethod>,
    depth: Cell<usize>,
    /// Methods found empty while a cycle through them is still open, keyed
    /// to the depth of the shallowest open method they depend on.
    provisional: RefCell<HashMap<MethodId, usize>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn id_of(&self, type_name: &str) -> Option<MethodId> {
        self.methods.get_index_of(type_name).map(MethodId)
    }

    /// The method behind `id`. Ids are only handed out by this registry.
    pub fn method(&self, id: MethodId) -> &TransformationMethod {
        &self.methods[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MethodId, &TransformationMethod)> {
        self.methods
            .values()
            .enumerate()
            .map(|(index, method)| (MethodId(index), method))
    }

    /// Insert an unvisited method for `type_name` unless one exists.
    pub(crate) fn reserve(&mut self, type_name: &str) -> MethodId {
        if let Some(id) = self.id_of(type_name) {
            return id;
        }
        let (index, _) = self
            .methods
            .insert_full(type_name.to_string(), TransformationMethod::new(type_name));
        MethodId(index)
    }

    /// Return the method for `type_name`, planning `schema` the first time.
    pub fn get_or_create(
        &mut self,
        planner: &Planner<'_>,
        type_name: &str,
        schema: &SchemaOrBool,
    ) -> Result<MethodId, TransformError> {
        if let Some(id) = self.id_of(type_name) {
            return Ok(id);
        }

        let id = self.reserve(type_name);
        debug!(type_name, "Planning response transform.");
        self.methods[id.0].begin_build();
        let plan = planner.plan(self, schema)?;
        self.methods[id.0].finish_build(plan);
        Ok(id)
    }

    /// Whether the method for `id` would produce no statements.
    pub fn is_method_empty(&self, id: MethodId) -> Result<bool, TransformError> {
        Ok(self.method_verdict(id)?.empty)
    }

    /// Whether applying `plan` would produce no statements.
    pub fn is_plan_empty(&self, plan: &TransformationPlan) -> Result<bool, TransformError> {
        Ok(self.plan_verdict(plan)?.empty)
    }

    /// `Some(nullable)` when the method only names a date-time string,
    /// directly or through a chain of other named types.
    pub fn date_time_alias(&self, id: MethodId) -> Option<bool> {
        let mut nullable = false;
        let mut current = id;
        // A chain longer than the registry has looped back on itself.
        for _ in 0..self.methods.len() {
            match self.method(current).plan()? {
                TransformationPlan::DateTime { nullable: inner } => {
                    return Some(nullable || *inner);
                }
                TransformationPlan::Delegate {
                    method,
                    nullable: inner,
                } => {
                    nullable |= *inner;
                    current = *method;
                }
                _ => return None,
            }
        }
        None
    }

    fn method_verdict(&self, id: MethodId) -> Result<Verdict, TransformError> {
        let method = self.method(id);
        match method.state() {
            MethodState::Unvisited | MethodState::Building => Err(
                TransformError::PrematureEmptinessCheck(method.type_name().to_string()),
            ),
            MethodState::Done { empty } => Ok(Verdict {
                empty,
                pending: None,
            }),
            MethodState::ComputingEmptiness { depth } => Ok(Verdict {
                empty: true,
                pending: Some(depth),
            }),
            MethodState::Built => {
                let provisional = self.provisional.borrow().get(&id).copied();
                if let Some(pending) = provisional {
                    return Ok(Verdict {
                        empty: true,
                        pending: Some(pending),
                    });
                }

                let depth = self.depth.get();
                method.set_state(MethodState::ComputingEmptiness { depth });
                self.depth.set(depth + 1);
                let result = match method.plan() {
                    Some(plan) => self.plan_verdict(plan),
                    None => Ok(Verdict::EMPTY),
                };
                self.depth.set(depth);

                let verdict = match result {
                    Ok(verdict) => verdict,
                    Err(err) => {
                        method.set_state(MethodState::Built);
                        self.release_provisional(depth, false);
                        return Err(err);
                    }
                };

                if let Some(pending) = verdict.pending
                    && verdict.empty
                    && pending < depth
                {
                    trace!(
                        type_name = method.type_name(),
                        pending,
                        "Emptiness depends on an open cycle, keeping it provisional."
                    );
                    method.set_state(MethodState::Built);
                    let mut provisional = self.provisional.borrow_mut();
                    // Whatever leaned on this method now leans on `pending`.
                    for open in provisional.values_mut() {
                        if *open >= depth {
                            *open = pending;
                        }
                    }
                    provisional.insert(id, pending);
                    return Ok(verdict);
                }

                self.release_provisional(depth, verdict.empty);
                method.set_state(MethodState::Done {
                    empty: verdict.empty,
                });
                trace!(
                    type_name = method.type_name(),
                    empty = verdict.empty,
                    "Emptiness decided."
                );
                Ok(Verdict {
                    empty: verdict.empty,
                    pending: None,
                })
            }
        }
    }

    /// Settle the provisional verdicts that waited on the method at `depth`.
    ///
    /// They are committed as empty when that method is empty; otherwise they
    /// go back to `Built` and are recomputed on demand.
    fn release_provisional(&self, depth: usize, empty: bool) {
        self.provisional.borrow_mut().retain(|id, pending| {
            if *pending < depth {
                return true;
            }
            if empty {
                self.methods[id.0].set_state(MethodState::Done { empty: true });
            }
            false
        });
    }

    fn plan_verdict(&self, plan: &TransformationPlan) -> Result<Verdict, TransformError> {
        match plan {
            TransformationPlan::Primitive => Ok(Verdict::EMPTY),
            TransformationPlan::DateTime { .. } => Ok(Verdict::NON_EMPTY),
            TransformationPlan::Delegate { method, .. } => self.method_verdict(*method),
            TransformationPlan::Array { item, .. } => self.plan_verdict(item),
            TransformationPlan::PassThrough { inner, .. } => self.plan_verdict(inner),
            TransformationPlan::Object { properties, .. } => {
                let mut verdict = Verdict::EMPTY;
                for property in properties {
                    let property_verdict = self.plan_verdict(&property.plan)?;
                    if !property_verdict.empty {
                        return Ok(Verdict::NON_EMPTY);
                    }
                    verdict.pending = match (verdict.pending, property_verdict.pending) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    };
                }
                Ok(verdict)
            }
        }
    }
}
