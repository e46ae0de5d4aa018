//! Event dispatch: queue, binding pipeline execution, state-changed signal.
//!
//! [`Dispatcher`] keeps a FIFO queue of [`Event`]s. Each event is looked up in
//! the [`BindingRegistry`]; a bound event runs its pipeline (mutations and
//! handler, in the configured [`CompositionOrder`]) against the component
//! state, then notifies observers. Handlers never dispatch inline: events they
//! raise are queued and run after the current one, within the same
//! [`process`](Dispatcher::process) call.

use std::collections::VecDeque;

use super::handler::{HandlerContext, HandlerError, HandlerTable};
use super::message::{Event, EventContext};
use super::signal::{ObserverId, Observers, StateChanged};
use crate::binding::{BindingPipeline, BindingRegistry, Mutation, MutationOp};
use crate::state::{mutate, resolve, PathError, State};

// ---------------------------------------------------------------------------
// DispatchConfig
// ---------------------------------------------------------------------------

/// Whether declared mutations run before or after the handler body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionOrder {
    /// Mutations first; the handler observes the mutated state.
    #[default]
    MutationsFirst,
    /// Handler first; it observes the state as it was when the event arrived.
    HandlerFirst,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub composition: CompositionOrder,
    /// Restore the pre-dispatch state when an event fails.
    pub rollback_on_error: bool,
    /// Most events one [`Dispatcher::process`] run handles, follow-ups included.
    pub max_events_per_run: usize,
}

impl DispatchConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the composition order (builder).
    pub fn with_composition(mut self, composition: CompositionOrder) -> Self {
        self.composition = composition;
        self
    }

    /// Enable or disable rollback on failure (builder).
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback_on_error = rollback;
        self
    }

    /// Set the per-run event bound (builder).
    pub fn with_max_events_per_run(mut self, max: usize) -> Self {
        self.max_events_per_run = max;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            composition: CompositionOrder::MutationsFirst,
            rollback_on_error: true,
            max_events_per_run: 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Result of one event that went through cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing is bound to the event's (selector, kind). No state change.
    Unbound,
    /// The pipeline ran; observers saw this generation.
    Applied { generation: u64 },
}

/// Why an event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("handler `{member}` failed: {source}")]
    Handler {
        member: String,
        source: HandlerError,
    },
    #[error("no handler registered for `{member}`")]
    MissingHandler { member: String },
    #[error("more than {limit} events in one run; queue cleared")]
    QueueOverflow { limit: usize },
}

/// What happened to one processed event.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub event: Event,
    pub result: Result<Outcome, DispatchError>,
}

impl DispatchReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Whether the event ran a pipeline and changed the generation.
    pub fn is_applied(&self) -> bool {
        matches!(self.result, Ok(Outcome::Applied { .. }))
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Queue-based event dispatcher for one component instance.
#[derive(Debug, Default)]
pub struct Dispatcher {
    queue: VecDeque<Event>,
    config: DispatchConfig,
    observers: Observers,
    generation: u64,
}

impl Dispatcher {
    /// Create a dispatcher with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Enqueue an event for the next [`process`](Self::process) run.
    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of events applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a state-changed observer.
    pub fn subscribe(&mut self, observer: impl FnMut(&StateChanged) + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// Remove an observer. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Enqueue `event` and process the queue.
    pub fn dispatch(
        &mut self,
        registry: &BindingRegistry,
        handlers: &mut HandlerTable,
        state: &mut State,
        event: Event,
    ) -> Vec<DispatchReport> {
        self.push(event);
        self.process(registry, handlers, state)
    }

    /// Process queued events in FIFO order until the queue is empty.
    ///
    /// A failed event does not stop the run. Exceeding
    /// [`max_events_per_run`](DispatchConfig::max_events_per_run) reports
    /// `QueueOverflow` for the next event and clears the queue.
    pub fn process(
        &mut self,
        registry: &BindingRegistry,
        handlers: &mut HandlerTable,
        state: &mut State,
    ) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        let mut processed = 0;

        while let Some(event) = self.queue.pop_front() {
            if processed >= self.config.max_events_per_run {
                let limit = self.config.max_events_per_run;
                log::warn!(
                    "event run exceeded {limit} events; dropping {} queued",
                    self.queue.len() + 1
                );
                self.queue.clear();
                reports.push(DispatchReport {
                    event,
                    result: Err(DispatchError::QueueOverflow { limit }),
                });
                break;
            }
            processed += 1;
            let result = self.apply(registry, handlers, state, &event);
            reports.push(DispatchReport { event, result });
        }

        reports
    }

    fn apply(
        &mut self,
        registry: &BindingRegistry,
        handlers: &mut HandlerTable,
        state: &mut State,
        event: &Event,
    ) -> Result<Outcome, DispatchError> {
        let Some(pipeline) = registry.lookup(&event.selector, event.kind) else {
            log::trace!("{} on `{}`: unbound", event.kind, event.selector);
            return Ok(Outcome::Unbound);
        };

        let snapshot = self.config.rollback_on_error.then(|| state.clone());
        let mut follow_ups = Vec::new();

        let result = match self.config.composition {
            CompositionOrder::MutationsFirst => {
                apply_mutations(&pipeline.mutations, state, &event.context).and_then(|()| {
                    run_handler(pipeline, handlers, state, event, &mut follow_ups)
                })
            }
            CompositionOrder::HandlerFirst => {
                run_handler(pipeline, handlers, state, event, &mut follow_ups).and_then(|()| {
                    apply_mutations(&pipeline.mutations, state, &event.context)
                })
            }
        };

        if let Err(err) = result {
            if let Some(snapshot) = snapshot {
                state.restore(snapshot);
            }
            log::warn!(
                "{} on `{}` rejected ({}): {err}",
                event.kind,
                event.selector,
                pipeline.member
            );
            return Err(err);
        }

        self.queue.extend(follow_ups);
        self.generation += 1;
        log::debug!(
            "{} on `{}` -> `{}` (generation {})",
            event.kind,
            event.selector,
            pipeline.member,
            self.generation
        );
        self.observers.notify(&StateChanged {
            generation: self.generation,
            event: event.kind,
            selector: event.selector.clone(),
            member: pipeline.member.clone(),
        });
        Ok(Outcome::Applied {
            generation: self.generation,
        })
    }
}

/// Apply `mutations` in order. `Bind` writes the event payload.
fn apply_mutations(
    mutations: &[Mutation],
    state: &mut State,
    context: &EventContext,
) -> Result<(), DispatchError> {
    for mutation in mutations {
        let location = resolve(&mutation.path, state, context.iteration.as_ref())?;
        match mutation.op {
            MutationOp::Bind => {
                mutate::set(location, context.payload.clone());
            }
            MutationOp::Toggle => {
                mutate::toggle(location)?;
            }
            MutationOp::Remove => {
                mutate::remove(location)?;
            }
        }
    }
    Ok(())
}

fn run_handler(
    pipeline: &BindingPipeline,
    handlers: &mut HandlerTable,
    state: &mut State,
    event: &Event,
    follow_ups: &mut Vec<Event>,
) -> Result<(), DispatchError> {
    let Some(name) = pipeline.handler.as_deref() else {
        return Ok(());
    };
    let mut cx = HandlerContext::new(
        state,
        &event.selector,
        &event.context.payload,
        event.context.iteration.as_ref(),
        follow_ups,
    );
    match handlers.call(name, &mut cx) {
        Some(result) => result.map_err(|source| DispatchError::Handler {
            member: name.to_string(),
            source,
        }),
        None => Err(DispatchError::MissingHandler {
            member: name.to_string(),
        }),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
