//! Component: one live instance of a component definition.
//!
//! [`Component`] ties together the extracted spec, the cached markup tree, the
//! handler table, the owned state, and the dispatcher. It is the runtime entry
//! point: the host reports UI events through [`Component::dispatch`].

use serde_json::Value;

use crate::binding::EventKind;
use crate::event::{
    DispatchConfig, DispatchReport, Dispatcher, Event, EventContext, HandlerTable, ObserverId,
    StateChanged,
};
use crate::markup::{emit, MarkupTree};
use crate::metadata::{extract, ComponentDef, ComponentSpec, ConfigError};
use crate::state::State;
use crate::syntax::Selector;

/// A component instance.
///
/// Owns its state exclusively; nothing else can write to it.
#[derive(Debug)]
pub struct Component {
    spec: ComponentSpec,
    markup: MarkupTree,
    handlers: HandlerTable,
    state: State,
    dispatcher: Dispatcher,
}

impl Component {
    /// Build a component with the default dispatch settings.
    pub fn new(def: &ComponentDef, handlers: HandlerTable) -> Result<Self, ConfigError> {
        Self::with_config(def, handlers, DispatchConfig::default())
    }

    /// Build a component.
    ///
    /// Extracts the component spec, checks the handler table against the declared
    /// methods, emits the markup once, and seeds state from field types.
    pub fn with_config(
        def: &ComponentDef,
        handlers: HandlerTable,
        config: DispatchConfig,
    ) -> Result<Self, ConfigError> {
        let spec = extract(def)?;

        if let Some(name) = handlers
            .names()
            .into_iter()
            .find(|name| spec.member(name).map_or(true, |m| !m.is_method()))
        {
            return Err(ConfigError::UnknownHandler {
                name: name.to_string(),
            });
        }
        if let Some(member) = spec
            .members()
            .iter()
            .find(|m| m.is_method() && !m.triggers.is_empty() && !handlers.contains(&m.name))
        {
            return Err(ConfigError::MissingHandler {
                member: member.name.clone(),
            });
        }

        let markup = emit(&spec);
        let state = spec.default_state();
        log::debug!(
            "component `{}` ready: {} handlers, {} markup nodes",
            spec.name(),
            handlers.len(),
            markup.len()
        );

        Ok(Self {
            spec,
            markup,
            handlers,
            state,
            dispatcher: Dispatcher::with_config(config),
        })
    }

    /// Overlay initial data onto the default state (builder).
    ///
    /// Object entries replace the matching top-level fields; any other value
    /// replaces the whole tree.
    pub fn with_state(mut self, initial: Value) -> Self {
        match initial {
            Value::Object(entries) if self.state.root().is_object() => {
                if let Value::Object(root) = self.state.root_mut() {
                    root.extend(entries);
                }
            }
            other => self.state = State::new(other),
        }
        self
    }

    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    /// The markup emitted at construction.
    pub fn markup(&self) -> &MarkupTree {
        &self.markup
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &DispatchConfig {
        self.dispatcher.config()
    }

    /// Number of events applied so far.
    pub fn generation(&self) -> u64 {
        self.dispatcher.generation()
    }

    /// Register a state-changed observer.
    pub fn subscribe(&mut self, observer: impl FnMut(&StateChanged) + 'static) -> ObserverId {
        self.dispatcher.subscribe(observer)
    }

    /// Remove an observer. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Report a UI event. Returns one report per processed event, follow-ups included.
    pub fn dispatch(
        &mut self,
        kind: EventKind,
        selector: &Selector,
        context: EventContext,
    ) -> Vec<DispatchReport> {
        self.dispatch_event(Event::new(kind, selector.clone(), context))
    }

    pub fn dispatch_event(&mut self, event: Event) -> Vec<DispatchReport> {
        self.dispatcher.dispatch(
            self.spec.registry(),
            &mut self.handlers,
            &mut self.state,
            event,
        )
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::RawAnnotation;
    use crate::event::{CompositionOrder, HandlerContext};
    use crate::metadata::FieldType;
    use serde_json::json;

    fn def() -> ComponentDef {
        ComponentDef::new("Counter")
            .field("count", Some(FieldType::Number), [])
            .field(
                "label",
                Some(FieldType::Text),
                [RawAnnotation::data_bind("label").at("label-input")],
            )
            .method("increment", [RawAnnotation::button_tap("plus")])
    }

    fn handlers() -> HandlerTable {
        HandlerTable::new().with("increment", |cx: &mut HandlerContext<'_>| {
            let count = crate::syntax::PathExpression::key("count");
            let next = cx.get(&count)?.as_i64().unwrap_or(0) + 1;
            cx.set(&count, json!(next))?;
            Ok(())
        })
    }

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_seeds_default_state_and_markup() {
        let component = Component::new(&def(), handlers()).unwrap();
        assert_eq!(component.state().root(), &json!({"count": 0, "label": ""}));
        assert_eq!(component.markup().len(), 2);
        assert_eq!(component.spec().name(), "Counter");
        assert_eq!(component.generation(), 0);
        assert_eq!(component.config(), &DispatchConfig::default());
    }

    #[test]
    fn with_config_is_kept() {
        let config = DispatchConfig::new().with_composition(CompositionOrder::HandlerFirst);
        let component = Component::with_config(&def(), handlers(), config.clone()).unwrap();
        assert_eq!(component.config(), &config);
    }

    #[test]
    fn with_state_overlays_fields() {
        let component = Component::new(&def(), handlers())
            .unwrap()
            .with_state(json!({"count": 5}));
        assert_eq!(component.state().root(), &json!({"count": 5, "label": ""}));
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let table = handlers().with("decrement", |_: &mut HandlerContext<'_>| Ok(()));
        let err = Component::new(&def(), table).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownHandler {
                name: "decrement".into()
            }
        );
    }

    #[test]
    fn handler_named_after_field_is_rejected() {
        let table = handlers().with("count", |_: &mut HandlerContext<'_>| Ok(()));
        assert!(matches!(
            Component::new(&def(), table),
            Err(ConfigError::UnknownHandler { .. })
        ));
    }

    #[test]
    fn missing_handler_is_rejected() {
        let err = Component::new(&def(), HandlerTable::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingHandler {
                member: "increment".into()
            }
        );
    }

    #[test]
    fn config_errors_propagate() {
        let bad = def().method("again", [RawAnnotation::button_tap("plus")]);
        let table = handlers().with("again", |_: &mut HandlerContext<'_>| Ok(()));
        assert!(matches!(
            Component::new(&bad, table),
            Err(ConfigError::DuplicateSelector(_))
        ));
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    #[test]
    fn dispatch_runs_handler() {
        let mut component = Component::new(&def(), handlers()).unwrap();
        let reports = component.dispatch(EventKind::ButtonTap, &sel("plus"), EventContext::new());
        assert!(reports[0].is_applied());
        component.dispatch(EventKind::ButtonTap, &sel("plus"), EventContext::new());
        assert_eq!(component.state().root()["count"], json!(2));
        assert_eq!(component.generation(), 2);
    }

    #[test]
    fn dispatch_binds_input() {
        let mut component = Component::new(&def(), handlers()).unwrap();
        component.dispatch_event(Event::input(sel("label-input"), "hello"));
        assert_eq!(component.state().root()["label"], json!("hello"));
    }

    #[test]
    fn subscribe_and_unsubscribe() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut component = Component::new(&def(), handlers()).unwrap();
        let hits = Rc::new(Cell::new(0));
        let id = {
            let hits = Rc::clone(&hits);
            component.subscribe(move |_: &StateChanged| hits.set(hits.get() + 1))
        };
        component.dispatch_event(Event::tap(sel("plus")));
        assert!(component.unsubscribe(id));
        component.dispatch_event(Event::tap(sel("plus")));
        assert_eq!(hits.get(), 1);
    }
}
