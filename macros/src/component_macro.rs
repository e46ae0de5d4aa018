//! `#[component]`: collect binding attributes from an impl block and generate
//! the `ComponentDef` and `HandlerTable` constructors.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Error, Ident, ImplItem, ItemImpl, LitStr, Result, Token, Type};

// ---------------------------------------------------------------------------
// Binding attributes
// ---------------------------------------------------------------------------

/// Attribute names recognized on members. Each is also the name of the
/// `RawAnnotation` constructor it maps to.
const EVENT_ATTRS: &[&str] = &["view_for", "input_change", "button_tap", "checkbox_change"];
const MUTATION_ATTRS: &[&str] = &["data_bind", "toggle", "remove"];

fn is_binding_attr(attr: &Attribute) -> bool {
    EVENT_ATTRS
        .iter()
        .chain(MUTATION_ATTRS)
        .any(|name| attr.path().is_ident(name))
}

/// A parsed binding attribute: `#[toggle("a[index].done", selector = "x")]`.
#[derive(Clone)]
pub(crate) struct Binding {
    pub kind: Ident,
    pub value: LitStr,
    pub selector: Option<LitStr>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind.to_string())
            .field("value", &self.value.value())
            .field("selector", &self.selector.as_ref().map(LitStr::value))
            .finish()
    }
}

/// Attribute arguments: a string literal, then optionally `selector = "..."`.
struct BindingArgs {
    value: LitStr,
    selector: Option<LitStr>,
}

impl Parse for BindingArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let value: LitStr = input.parse()?;
        let mut selector = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                let key: Ident = input.parse()?;
                if key != "selector" {
                    return Err(Error::new(
                        key.span(),
                        format!("unknown argument `{key}`, expected `selector`"),
                    ));
                }
                input.parse::<Token![=]>()?;
                selector = Some(input.parse()?);
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                }
            }
        }
        Ok(BindingArgs { value, selector })
    }
}

/// Split `attrs` into parsed bindings and the attributes to keep.
fn take_bindings(attrs: &mut Vec<Attribute>) -> Result<Vec<Binding>> {
    let mut bindings = Vec::new();
    let mut kept = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        if !is_binding_attr(&attr) {
            kept.push(attr);
            continue;
        }
        let kind = attr
            .path()
            .get_ident()
            .cloned()
            .ok_or_else(|| Error::new_spanned(&attr, "expected a binding attribute"))?;
        let args: BindingArgs = attr.parse_args()?;
        if args.selector.is_some() && EVENT_ATTRS.iter().any(|name| kind == name) {
            return Err(Error::new_spanned(
                &attr,
                format!("`{kind}` takes its selector as the first argument"),
            ));
        }
        bindings.push(Binding {
            kind,
            value: args.value,
            selector: args.selector,
        });
    }
    *attrs = kept;
    Ok(bindings)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) enum MemberKind {
    Field,
    Method,
}

#[derive(Debug)]
pub(crate) struct Member {
    pub kind: MemberKind,
    pub name: Ident,
    pub bindings: Vec<Binding>,
}

/// Whether `ty` names `FieldType` (bare or by path).
fn is_field_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "FieldType"),
        _ => false,
    }
}

/// Collect members from the impl, stripping binding attributes in place.
///
/// `FieldType` consts become fields. Fns with at least one binding become
/// methods and must take a single `&mut HandlerContext` argument. Other items
/// pass through untouched.
pub(crate) fn collect_members(item: &mut ItemImpl) -> Result<Vec<Member>> {
    let mut members = Vec::new();
    for impl_item in &mut item.items {
        match impl_item {
            ImplItem::Const(konst) => {
                let bindings = take_bindings(&mut konst.attrs)?;
                if !is_field_type(&konst.ty) {
                    if let Some(binding) = bindings.first() {
                        return Err(Error::new(
                            binding.kind.span(),
                            "binding fields must have type `FieldType`",
                        ));
                    }
                    continue;
                }
                konst
                    .attrs
                    .push(syn::parse_quote!(#[allow(non_upper_case_globals)]));
                members.push(Member {
                    kind: MemberKind::Field,
                    name: konst.ident.clone(),
                    bindings,
                });
            }
            ImplItem::Fn(method) => {
                let bindings = take_bindings(&mut method.attrs)?;
                if bindings.is_empty() {
                    continue;
                }
                let sig = &method.sig;
                if sig.receiver().is_some() || sig.inputs.len() != 1 {
                    return Err(Error::new_spanned(
                        sig,
                        "handlers take exactly one argument: `cx: &mut HandlerContext<'_>`",
                    ));
                }
                method.attrs.push(syn::parse_quote!(#[allow(non_snake_case)]));
                members.push(Member {
                    kind: MemberKind::Method,
                    name: sig.ident.clone(),
                    bindings,
                });
            }
            ImplItem::Type(ty) => reject_bindings(&ty.attrs)?,
            ImplItem::Macro(mac) => reject_bindings(&mac.attrs)?,
            _ => {}
        }
    }
    Ok(members)
}

fn reject_bindings(attrs: &[Attribute]) -> Result<()> {
    match attrs.iter().find(|attr| is_binding_attr(attr)) {
        Some(attr) => Err(Error::new_spanned(
            attr,
            "binding attributes apply to `FieldType` consts and handler fns",
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// `RawAnnotation::<kind>("value")`, plus `.at("selector")` when given.
fn generate_annotation(binding: &Binding) -> TokenStream {
    let kind = &binding.kind;
    let value = &binding.value;
    let at = binding.selector.as_ref().map(|selector| quote! { .at(#selector) });
    quote! { ::bindview::binding::RawAnnotation::#kind(#value) #at }
}

fn generate_member(member: &Member) -> TokenStream {
    let name = &member.name;
    let name_str = LitStr::new(&name.to_string(), name.span());
    let annotations = member.bindings.iter().map(generate_annotation);
    match member.kind {
        MemberKind::Field => quote! {
            .field(#name_str, ::core::option::Option::Some(Self::#name), [#(#annotations),*])
        },
        MemberKind::Method => quote! {
            .method(#name_str, [#(#annotations),*])
        },
    }
}

fn component_name(self_ty: &Type) -> Result<String> {
    match self_ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| Error::new_spanned(self_ty, "expected a type name")),
        _ => Err(Error::new_spanned(self_ty, "#[component] expects `impl TypeName`")),
    }
}

/// Entry point: rewrite the impl block with the generated constructors.
pub(crate) fn component_impl(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    if !attr.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "#[component] takes no arguments",
        ));
    }
    let mut item: ItemImpl = syn::parse2(item)?;
    if let Some((_, trait_path, _)) = &item.trait_ {
        return Err(Error::new_spanned(
            trait_path,
            "#[component] applies to inherent impl blocks",
        ));
    }

    let name = component_name(&item.self_ty)?;
    let members = collect_members(&mut item)?;
    let member_calls = members.iter().map(generate_member);
    let handlers = members
        .iter()
        .filter(|member| matches!(member.kind, MemberKind::Method))
        .map(|member| {
            let ident = &member.name;
            let name_str = LitStr::new(&ident.to_string(), ident.span());
            quote! { .with(#name_str, Self::#ident) }
        });

    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let self_ty = &item.self_ty;
    Ok(quote! {
        #item

        impl #impl_generics #self_ty #ty_generics #where_clause {
            /// The component definition declared by this impl block.
            pub fn component_def() -> ::bindview::metadata::ComponentDef {
                ::bindview::metadata::ComponentDef::new(#name) #(#member_calls)*
            }

            /// The handlers declared by this impl block, keyed by method name.
            pub fn handler_table() -> ::bindview::event::HandlerTable {
                ::bindview::event::HandlerTable::new() #(#handlers)*
            }
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn members(tokens: TokenStream) -> Result<Vec<Member>> {
        let mut item: ItemImpl = syn::parse2(tokens)?;
        collect_members(&mut item)
    }

    fn gen(tokens: TokenStream) -> Result<String> {
        component_impl(TokenStream::new(), tokens).map(|code| code.to_string())
    }

    // -----------------------------------------------------------------------
    // Collection tests
    // -----------------------------------------------------------------------

    #[test]
    fn collect_field_with_binding() {
        let members = members(quote! {
            impl TodoPage {
                #[view_for("todo-list")]
                const todoList: FieldType = FieldType::Collection;
            }
        })
        .unwrap();
        assert_eq!(members.len(), 1);
        assert!(matches!(members[0].kind, MemberKind::Field));
        assert_eq!(members[0].name.to_string(), "todoList");
        assert_eq!(members[0].bindings[0].kind.to_string(), "view_for");
        assert_eq!(members[0].bindings[0].value.value(), "todo-list");
    }

    #[test]
    fn collect_unannotated_field() {
        let members = members(quote! {
            impl Counter {
                const count: bindview::metadata::FieldType = FieldType::Number;
            }
        })
        .unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].bindings.is_empty());
    }

    #[test]
    fn collect_method_bindings_in_order() {
        let members = members(quote! {
            impl TodoPage {
                #[checkbox_change("todo-list > check-todo")]
                #[toggle("todoList[index].done")]
                fn handleCheckTodo(cx: &mut HandlerContext<'_>) -> HandlerResult { Ok(()) }
            }
        })
        .unwrap();
        assert!(matches!(members[0].kind, MemberKind::Method));
        let kinds: Vec<String> = members[0]
            .bindings
            .iter()
            .map(|b| b.kind.to_string())
            .collect();
        assert_eq!(kinds, ["checkbox_change", "toggle"]);
    }

    #[test]
    fn collect_mutation_selector_argument() {
        let members = members(quote! {
            impl Form {
                #[data_bind("title", selector = "title-input")]
                const title: FieldType = FieldType::Text;
            }
        })
        .unwrap();
        let binding = &members[0].bindings[0];
        assert_eq!(binding.value.value(), "title");
        assert_eq!(binding.selector.as_ref().map(LitStr::value).as_deref(), Some("title-input"));
    }

    #[test]
    fn collect_skips_plain_items() {
        let members = members(quote! {
            impl TodoPage {
                const LIMIT: usize = 10;
                fn helper(&self) -> usize { 1 }
            }
        })
        .unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn collect_strips_binding_attributes() {
        let mut item: ItemImpl = syn::parse2(quote! {
            impl TodoPage {
                #[doc = "list"]
                #[view_for("todo-list")]
                const todoList: FieldType = FieldType::Collection;
            }
        })
        .unwrap();
        collect_members(&mut item).unwrap();
        let code = quote!(#item).to_string();
        assert!(!code.contains("view_for"));
        assert!(code.contains("doc"));
        assert!(code.contains("non_upper_case_globals"));
    }

    #[test]
    fn error_binding_on_non_field_type_const() {
        let err = members(quote! {
            impl TodoPage {
                #[view_for("todo-list")]
                const todoList: usize = 0;
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("must have type `FieldType`"));
    }

    #[test]
    fn error_handler_with_receiver() {
        let err = members(quote! {
            impl TodoPage {
                #[button_tap("add-todo")]
                fn add(&self, cx: &mut HandlerContext<'_>) -> HandlerResult { Ok(()) }
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("exactly one argument"));
    }

    #[test]
    fn error_selector_argument_on_event() {
        let err = members(quote! {
            impl TodoPage {
                #[button_tap("add-todo", selector = "other")]
                fn add(cx: &mut HandlerContext<'_>) -> HandlerResult { Ok(()) }
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("first argument"));
    }

    #[test]
    fn error_unknown_argument() {
        let err = members(quote! {
            impl TodoPage {
                #[toggle("done", target = "x")]
                fn flip(cx: &mut HandlerContext<'_>) -> HandlerResult { Ok(()) }
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown argument `target`"));
    }

    // -----------------------------------------------------------------------
    // Code generation tests
    // -----------------------------------------------------------------------

    #[test]
    fn codegen_component_def() {
        let code = gen(quote! {
            impl TodoPage {
                #[view_for("todo-list")]
                const todoList: FieldType = FieldType::Collection;
            }
        })
        .unwrap();
        assert!(code.contains("ComponentDef :: new (\"TodoPage\")"), "got: {code}");
        assert!(code.contains(". field (\"todoList\""), "got: {code}");
        assert!(code.contains("Some (Self :: todoList)"), "got: {code}");
        assert!(code.contains("RawAnnotation :: view_for (\"todo-list\")"), "got: {code}");
    }

    #[test]
    fn codegen_handler_table() {
        let code = gen(quote! {
            impl TodoPage {
                #[button_tap("add-todo")]
                fn handleTapAddTodo(cx: &mut HandlerContext<'_>) -> HandlerResult { Ok(()) }
            }
        })
        .unwrap();
        assert!(code.contains(". method (\"handleTapAddTodo\""), "got: {code}");
        assert!(
            code.contains(". with (\"handleTapAddTodo\" , Self :: handleTapAddTodo)"),
            "got: {code}"
        );
        assert!(code.contains("non_snake_case"), "got: {code}");
    }

    #[test]
    fn codegen_selector_becomes_at() {
        let code = gen(quote! {
            impl Form {
                #[data_bind("title", selector = "title-input")]
                const title: FieldType = FieldType::Text;
            }
        })
        .unwrap();
        assert!(
            code.contains("RawAnnotation :: data_bind (\"title\") . at (\"title-input\")"),
            "got: {code}"
        );
    }

    #[test]
    fn codegen_rejects_trait_impl() {
        let err = gen(quote! {
            impl Default for TodoPage {
                fn default() -> Self { TodoPage }
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("inherent impl"));
    }

    #[test]
    fn codegen_rejects_arguments() {
        let err = component_impl(quote!(strict), quote! { impl TodoPage {} }).unwrap_err();
        assert!(err.to_string().contains("takes no arguments"));
    }
}
