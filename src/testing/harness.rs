//! Harness: programmatic interaction with a component instance.
//!
//! The `Harness` wraps a [`Component`] and provides methods to simulate taps,
//! text input and checkbox changes by selector string, inspect state by path
//! string, and render the component's markup for snapshot testing.

use serde_json::Value;

use crate::app::Component;
use crate::event::{DispatchReport, Event, HandlerTable};
use crate::metadata::{ComponentDef, ConfigError};
use crate::state::{lookup, IterationContext, PathError};
use crate::syntax::{ParseError, PathExpression, Selector};

use super::snapshot::render_to_string;

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

/// Why [`Harness::get`] could not read a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Path(#[from] PathError),
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A headless driver for testing components.
///
/// # Examples
///
/// ```
/// use bindview::binding::RawAnnotation;
/// use bindview::event::HandlerTable;
/// use bindview::metadata::{ComponentDef, FieldType};
/// use bindview::testing::Harness;
/// use serde_json::json;
///
/// let def = ComponentDef::new("Form").field(
///     "title",
///     Some(FieldType::Text),
///     [RawAnnotation::data_bind("title").at("title-input")],
/// );
/// let mut harness = Harness::build(&def, HandlerTable::new()).unwrap();
/// harness.input("title-input", "Buy milk").unwrap();
/// assert_eq!(harness.get("title").unwrap(), &json!("Buy milk"));
/// ```
#[derive(Debug)]
pub struct Harness {
    component: Component,
}

impl Harness {
    pub fn new(component: Component) -> Self {
        Self { component }
    }

    /// Build the component for `def` and wrap it.
    pub fn build(def: &ComponentDef, handlers: HandlerTable) -> Result<Self, ConfigError> {
        Component::new(def, handlers).map(Self::new)
    }

    // ── Event simulation ─────────────────────────────────────────────

    /// Tap the button at `selector`.
    pub fn tap(&mut self, selector: &str) -> Result<Vec<DispatchReport>, ParseError> {
        Ok(self.send(Event::tap(Selector::parse(selector)?)))
    }

    /// Tap the button at `selector` inside the repeated element `index`.
    pub fn tap_at(
        &mut self,
        selector: &str,
        index: usize,
    ) -> Result<Vec<DispatchReport>, ParseError> {
        let event = Event::tap(Selector::parse(selector)?).within(IterationContext::single(index));
        Ok(self.send(event))
    }

    /// Change the text input at `selector` to `value`.
    pub fn input(
        &mut self,
        selector: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<DispatchReport>, ParseError> {
        Ok(self.send(Event::input(Selector::parse(selector)?, value)))
    }

    /// Set the checkbox at `selector` to `checked`.
    pub fn check(
        &mut self,
        selector: &str,
        checked: bool,
    ) -> Result<Vec<DispatchReport>, ParseError> {
        Ok(self.send(Event::check(Selector::parse(selector)?, checked)))
    }

    /// Set the checkbox at `selector` inside the repeated element `index`.
    pub fn check_at(
        &mut self,
        selector: &str,
        index: usize,
        checked: bool,
    ) -> Result<Vec<DispatchReport>, ParseError> {
        let event = Event::check(Selector::parse(selector)?, checked)
            .within(IterationContext::single(index));
        Ok(self.send(event))
    }

    /// Dispatch a prepared event.
    pub fn send(&mut self, event: Event) -> Vec<DispatchReport> {
        self.component.dispatch_event(event)
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    /// The whole state tree.
    pub fn state(&self) -> &Value {
        self.component.state().root()
    }

    /// Read `path` from state.
    ///
    /// Placeholders never resolve here; use literal indices.
    pub fn get(&self, path: &str) -> Result<&Value, QueryError> {
        let path = PathExpression::parse(path)?;
        Ok(lookup(&path, self.state(), None)?)
    }

    /// Render the component's markup to text.
    pub fn render(&self) -> String {
        render_to_string(self.component.markup())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::RawAnnotation;
    use crate::event::{DispatchError, HandlerContext, Outcome};
    use crate::metadata::FieldType;
    use serde_json::json;

    fn def() -> ComponentDef {
        ComponentDef::new("Checklist")
            .field("items", None, [RawAnnotation::view_for("items")])
            .field(
                "draft",
                Some(FieldType::Text),
                [RawAnnotation::data_bind("draft").at("draft-input")],
            )
            .method(
                "onCheck",
                [
                    RawAnnotation::checkbox_change("items > check"),
                    RawAnnotation::toggle("items[index].done"),
                ],
            )
            .method("onClear", [RawAnnotation::button_tap("clear")])
    }

    fn handlers() -> HandlerTable {
        HandlerTable::new()
            .with("onCheck", |_: &mut HandlerContext<'_>| Ok(()))
            .with("onClear", |cx: &mut HandlerContext<'_>| {
                cx.set(&PathExpression::key("items"), json!([]))?;
                Ok(())
            })
    }

    fn harness() -> Harness {
        let component = Component::new(&def(), handlers())
            .unwrap()
            .with_state(json!({"items": [{"done": false}, {"done": false}]}));
        Harness::new(component)
    }

    // ── Simulation ───────────────────────────────────────────────────

    #[test]
    fn input_writes_bound_field() {
        let mut h = harness();
        let reports = h.input("draft-input", "milk").unwrap();
        assert!(reports[0].is_applied());
        assert_eq!(h.get("draft").unwrap(), &json!("milk"));
    }

    #[test]
    fn check_at_toggles_element() {
        let mut h = harness();
        h.check_at("items > check", 1, true).unwrap();
        assert_eq!(h.get("items[1].done").unwrap(), &json!(true));
        assert_eq!(h.get("items[0].done").unwrap(), &json!(false));
    }

    #[test]
    fn check_without_index_is_rejected() {
        let mut h = harness();
        let reports = h.check("items > check", true).unwrap();
        assert!(matches!(reports[0].result, Err(DispatchError::Path(_))));
        assert_eq!(h.state()["items"], json!([{"done": false}, {"done": false}]));
    }

    #[test]
    fn tap_runs_handler() {
        let mut h = harness();
        h.tap("clear").unwrap();
        assert_eq!(h.state()["items"], json!([]));
        assert_eq!(h.component().generation(), 1);
    }

    #[test]
    fn tap_at_unbound_is_no_op() {
        let mut h = harness();
        let reports = h.tap_at("items > check", 0).unwrap();
        assert_eq!(reports[0].result, Ok(Outcome::Unbound));
    }

    #[test]
    fn bad_selector_is_parse_error() {
        let mut h = harness();
        assert!(h.tap("clear >").is_err());
        assert!(matches!(h.get("items["), Err(QueryError::Parse(_))));
    }

    #[test]
    fn get_reports_path_errors() {
        let h = harness();
        assert!(matches!(
            h.get("items[9].done"),
            Err(QueryError::Path(PathError::IndexOutOfRange { index: 9, len: 2, .. }))
        ));
        assert!(matches!(
            h.get("items[0].missing"),
            Err(QueryError::Path(PathError::MissingField { .. }))
        ));
        assert!(matches!(
            h.get("draft.title"),
            Err(QueryError::Path(PathError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            h.get("items[index]"),
            Err(QueryError::Path(PathError::UnresolvedIndex { .. }))
        ));
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn render_matches_markup() {
        let h = harness();
        let text = h.render();
        assert!(text.starts_with("<view id=\"items\" for=\"{{items}}\""));
        assert!(text.contains("<checkbox id=\"check\" bind:change=\"onCheck\" />"));
        assert!(text.contains("<button id=\"clear\" bind:tap=\"onClear\" />"));
    }
}
