//! Markup emission: ComponentSpec -> MarkupTree.
//!
//! One node per selector scope, nested by selector prefix. Members are walked
//! in declaration order, so the output depends only on the
//! [`ComponentSpec`](crate::metadata::ComponentSpec).

use std::collections::HashSet;

use super::node::{Directive, MarkupNode, NodeId, NodeTag};
use super::tree::MarkupTree;
use crate::binding::{BindingAnnotation, EventKind};
use crate::metadata::ComponentSpec;
use crate::syntax::{PathExpression, Selector};

/// Emit the markup tree for `spec`.
pub fn emit(spec: &ComponentSpec) -> MarkupTree {
    let mut emitter = Emitter::default();

    for member in spec.members() {
        for annotation in &member.annotations {
            match annotation {
                BindingAnnotation::ViewFor { selector } => {
                    let collection = PathExpression::key(member.name.as_str());
                    emitter.push(selector, None, Directive::repeat(collection));
                }
                BindingAnnotation::DataBind { selector, path } => {
                    let directive = Directive::Bind { path: path.clone() };
                    emitter.push(selector, Some(NodeTag::Input), directive);
                }
                BindingAnnotation::InputChange { selector }
                | BindingAnnotation::ButtonTap { selector }
                | BindingAnnotation::CheckboxChange { selector } => {
                    if let Some(event) = annotation.event() {
                        emitter.on(selector, event, &member.name);
                    }
                }
                BindingAnnotation::Toggle { .. } | BindingAnnotation::Remove { .. } => {}
            }
        }
        for trigger in member.triggers.iter().filter(|t| t.implied) {
            emitter.on(&trigger.selector, trigger.event, &member.name);
        }
    }

    log::debug!("emitted `{}`: {} nodes", spec.name(), emitter.tree.len());
    emitter.tree
}

#[derive(Default)]
struct Emitter {
    tree: MarkupTree,
    /// Nodes whose tag came from a typed binding.
    typed: HashSet<NodeId>,
}

impl Emitter {
    /// The node for `selector`, creating missing scopes as `view`s.
    fn node(&mut self, selector: &Selector) -> NodeId {
        let mut parent = None;
        for scope in selector.scopes() {
            let id = match self.tree.find_child(parent, scope) {
                Some(id) => id,
                None => {
                    let data = MarkupNode::new(scope.as_str());
                    match parent {
                        Some(p) => self.tree.insert_child(p, data),
                        None => self.tree.insert_root(data),
                    }
                }
            };
            parent = Some(id);
        }
        // Selectors always have at least one scope.
        parent.unwrap_or_else(|| self.tree.insert_root(MarkupNode::new(selector.leaf())))
    }

    fn push(&mut self, selector: &Selector, tag: Option<NodeTag>, directive: Directive) {
        let id = self.node(selector);
        let first_typed = tag.is_some() && self.typed.insert(id);
        if let Some(node) = self.tree.get_mut(id) {
            if let (true, Some(tag)) = (first_typed, tag) {
                node.tag = tag;
            }
            if !node.directives.contains(&directive) {
                node.directives.push(directive);
            }
        }
    }

    fn on(&mut self, selector: &Selector, event: EventKind, handler: &str) {
        let directive = Directive::On {
            event,
            handler: handler.to_string(),
        };
        self.push(selector, Some(NodeTag::for_event(event)), directive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::RawAnnotation;
    use crate::metadata::{extract, ComponentDef, FieldType};

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn todo_spec() -> ComponentSpec {
        let def = ComponentDef::new("TodoPage")
            .field("todoList", None, [RawAnnotation::view_for("todo-list")])
            .field(
                "title",
                Some(FieldType::Text),
                [
                    RawAnnotation::data_bind("title"),
                    RawAnnotation::input_change("todo-input"),
                ],
            )
            .method("handleTapAddTodo", [RawAnnotation::button_tap("add-todo")])
            .method(
                "handleCheckTodo",
                [
                    RawAnnotation::checkbox_change("todo-list > check-todo"),
                    RawAnnotation::toggle("todoList[index].done"),
                ],
            );
        extract(&def).unwrap()
    }

    #[test]
    fn roots_in_first_appearance_order() {
        let tree = emit(&todo_spec());
        let names: Vec<&str> = tree
            .roots()
            .iter()
            .filter_map(|&id| tree.get(id))
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["todo-list", "todo-input", "add-todo"]);
    }

    #[test]
    fn repeat_directive_on_list() {
        let tree = emit(&todo_spec());
        let list = tree.get(tree.find(&sel("todo-list")).unwrap()).unwrap();
        assert_eq!(list.tag, NodeTag::View);
        assert_eq!(
            list.repeat(),
            Some(&Directive::repeat(PathExpression::key("todoList")))
        );
    }

    #[test]
    fn nested_checkbox_is_child_of_list() {
        let tree = emit(&todo_spec());
        let list = tree.find(&sel("todo-list")).unwrap();
        let check = tree.find(&sel("todo-list > check-todo")).unwrap();
        assert_eq!(tree.parent(check), Some(list));
        let node = tree.get(check).unwrap();
        assert_eq!(node.tag, NodeTag::Checkbox);
        assert_eq!(
            node.handler_for(EventKind::CheckboxChange),
            Some("handleCheckTodo")
        );
    }

    #[test]
    fn data_bind_shares_node_with_input_event() {
        let tree = emit(&todo_spec());
        let input = tree.get(tree.find(&sel("todo-input")).unwrap()).unwrap();
        assert_eq!(input.tag, NodeTag::Input);
        assert_eq!(
            input.directives,
            vec![
                Directive::Bind {
                    path: PathExpression::key("title")
                },
                Directive::On {
                    event: EventKind::InputChange,
                    handler: "title".into(),
                },
            ]
        );
    }

    #[test]
    fn button_wired_to_handler() {
        let tree = emit(&todo_spec());
        let add = tree.get(tree.find(&sel("add-todo")).unwrap()).unwrap();
        assert_eq!(add.tag, NodeTag::Button);
        assert_eq!(add.handler_for(EventKind::ButtonTap), Some("handleTapAddTodo"));
    }

    #[test]
    fn implied_trigger_emits_event_directive() {
        let def = ComponentDef::new("Page").field(
            "done",
            Some(FieldType::Flag),
            [RawAnnotation::toggle("done").at("done-box")],
        );
        let tree = emit(&extract(&def).unwrap());
        let node = tree.get(tree.find(&sel("done-box")).unwrap()).unwrap();
        assert_eq!(node.tag, NodeTag::Checkbox);
        assert_eq!(node.handler_for(EventKind::CheckboxChange), Some("done"));
    }

    #[test]
    fn first_typed_binding_decides_tag() {
        let def = ComponentDef::new("Page")
            .method("onTap", [RawAnnotation::button_tap("field")])
            .method("onChange", [RawAnnotation::input_change("field")]);
        let tree = emit(&extract(&def).unwrap());
        let node = tree.get(tree.find(&sel("field")).unwrap()).unwrap();
        assert_eq!(node.tag, NodeTag::Button);
        assert_eq!(node.directives.len(), 2);
    }

    #[test]
    fn empty_spec_emits_empty_tree() {
        let spec = extract(&ComponentDef::new("Empty")).unwrap();
        assert!(emit(&spec).is_empty());
    }

    #[test]
    fn emission_is_deterministic() {
        let spec = todo_spec();
        assert_eq!(emit(&spec), emit(&spec));
    }
}
