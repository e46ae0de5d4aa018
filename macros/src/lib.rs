//! Proc macros for bindview: `#[component]` annotation extraction.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `bindview`.

use proc_macro::TokenStream;

mod component_macro;

/// Declare a component on an inherent impl block.
///
/// Generates `component_def()` returning a `bindview::metadata::ComponentDef`
/// and `handler_table()` returning a `bindview::event::HandlerTable`.
///
/// # Members
///
/// - `const name: FieldType = ...;` is a field; the const value is its type
/// - `fn name(cx: &mut HandlerContext<'_>) -> HandlerResult` with at least
///   one binding attribute is a method, registered as its handler
///
/// # Attributes
///
/// - `view_for`, `input_change`, `button_tap`, `checkbox_change` take a selector
/// - `data_bind`, `toggle`, `remove` take a path and an optional
///   `selector = "..."`; without one they inherit the member's first event selector
///
/// # Example
///
/// ```ignore
/// struct TodoPage;
///
/// #[component]
/// impl TodoPage {
///     #[view_for("todo-list")]
///     const todoList: FieldType = FieldType::Collection;
///
///     #[checkbox_change("todo-list > check-todo")]
///     #[toggle("todoList[index].done")]
///     fn handleCheckTodo(_cx: &mut HandlerContext<'_>) -> HandlerResult {
///         Ok(())
///     }
/// }
///
/// let component = Component::new(&TodoPage::component_def(), TodoPage::handler_table())?;
/// ```
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    component_macro::component_impl(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
