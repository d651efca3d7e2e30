use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned as _;
use syn::{
    Attribute, Data, DeriveInput, Error, FnArg, GenericArgument, Ident, ImplItem, ItemImpl, Meta,
    Pat, PathArguments, ReturnType, Token, Type, TypeParamBound, TypeTraitObject,
};

const COMPONENT_ATTR: &str = "component";
const INJECT_ATTR: &str = "inject";
const FACTORY_ATTR: &str = "factory";

/// Role and contracts declared by `#[component(...)]` or `#[injectable(...)]`.
///
/// Accepted forms: `service(dyn A, ...)`, `repository(dyn A, ...)` and
/// `contracts(dyn A, ...)` for untagged types.
#[derive(Default)]
struct ComponentArgs {
    role: Option<Ident>,
    contracts: Vec<Type>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Self::default());
        }
        let kind: Ident = input.parse()?;
        match kind.to_string().as_str() {
            "service" | "repository" | "contracts" => {}
            _ => {
                return Err(Error::new(
                    kind.span(),
                    "Expected `service`, `repository` or `contracts`",
                ));
            }
        }
        let mut contracts = Vec::new();
        if input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            contracts.extend(Punctuated::<Type, Token![,]>::parse_terminated(&content)?);
        }
        for contract in &contracts {
            check_contract(contract)?;
        }
        if !input.is_empty() {
            return Err(input.error("Unexpected tokens after component role"));
        }
        Ok(Self {
            role: Some(kind),
            contracts,
        })
    }
}

impl ComponentArgs {
    fn role(&self) -> TokenStream2 {
        match self.role.as_ref().map(|v| v.to_string()).as_deref() {
            Some("service") => quote! { ::weave::Role::Service },
            Some("repository") => quote! { ::weave::Role::Repository },
            _ => quote! { ::weave::Role::None },
        }
    }

    fn contract_stmts(&self) -> Vec<TokenStream2> {
        self.contracts
            .iter()
            .map(|contract| {
                quote! {
                    .contract::<#contract>(
                        |it: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#contract> { it }
                    )
                }
            })
            .collect()
    }
}

/// How a contract-typed field or factory argument is declared.
enum Injection {
    Marked(Type),
    Unmarked(Type),
}

impl Injection {
    fn describe(&self, name: &str) -> TokenStream2 {
        match self {
            Injection::Marked(ty) => quote! { .inject::<#ty>(#name) },
            Injection::Unmarked(ty) => quote! { .unmarked::<#ty>(#name) },
        }
    }

    fn take(&self, name: &str) -> TokenStream2 {
        let ty = match self {
            Injection::Marked(ty) | Injection::Unmarked(ty) => ty,
        };
        quote! { deps.take::<#ty>(#name)? }
    }
}

fn extract_arc_type(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Arc"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner.clone());
    }
    None
}

fn trait_object(ty: &Type) -> Option<&TypeTraitObject> {
    match ty {
        Type::TraitObject(object) => Some(object),
        Type::Paren(paren) => trait_object(&paren.elem),
        Type::Group(group) => trait_object(&group.elem),
        _ => None,
    }
}

fn is_trait_object(ty: &Type) -> bool {
    trait_object(ty).is_some()
}

/// Rejects contract trait objects naming more than one trait.
///
/// `dyn A + Send` and `dyn A` have distinct type ids, so a contract spelled
/// with extra bounds never matches the one its implementation registered.
fn check_contract(ty: &Type) -> syn::Result<()> {
    let Some(object) = trait_object(ty) else {
        return Ok(());
    };
    let traits = object
        .bounds
        .iter()
        .filter(|bound| matches!(bound, TypeParamBound::Trait(_)))
        .count();
    if traits > 1 {
        return Err(Error::new_spanned(
            ty,
            "Contract trait objects cannot carry extra bounds, \
             declare Send + Sync as supertraits of the trait instead",
        ));
    }
    Ok(())
}

fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Classifies a field or argument of type `ty` carrying `attrs`.
///
/// Returns `Ok(None)` for plain values, which are not injected.
fn classify(ty: &Type, attrs: &[Attribute]) -> syn::Result<Option<Injection>> {
    let marker = attrs.iter().find(|attr| attr.path().is_ident(INJECT_ATTR));
    if let Some(marker) = marker {
        if !matches!(marker.meta, Meta::Path(_)) {
            return Err(Error::new(
                marker.span(),
                format!("#[{INJECT_ATTR}] takes no arguments"),
            ));
        }
        return match extract_arc_type(ty) {
            Some(inner) => {
                check_contract(&inner)?;
                Ok(Some(Injection::Marked(inner)))
            }
            None => Err(Error::new(
                ty.span(),
                format!("#[{INJECT_ATTR}] fields must be of type Arc<T>"),
            )),
        };
    }
    match extract_arc_type(ty).filter(is_trait_object) {
        Some(inner) => {
            check_contract(&inner)?;
            Ok(Some(Injection::Unmarked(inner)))
        }
        None => Ok(None),
    }
}

fn registration(name: &TokenStream2) -> TokenStream2 {
    quote! {
        ::weave::inventory::submit! {
            ::weave::Registration::new(
                ::core::module_path!(),
                <#name as ::weave::Component>::describe,
            )
        }
    }
}

/// Derive macro for the Component trait.
///
/// The struct is registered for discovery under the module it is declared in.
#[proc_macro_derive(Component, attributes(component, inject))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    handle_derive_component(input).unwrap_or_else(|err| err.to_compile_error().into())
}

/// Attribute macro for impl blocks with a factory method.
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = syn::parse_macro_input!(attr as ComponentArgs);
    if let Ok(item_impl) = syn::parse::<ItemImpl>(item) {
        return handle_injectable_impl(args, item_impl)
            .unwrap_or_else(|err| err.to_compile_error().into());
    }
    TokenStream::from(
        Error::new(
            proc_macro2::Span::call_site(),
            "#[injectable] can only be applied to impl blocks",
        )
        .to_compile_error(),
    )
}

fn handle_derive_component(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Generic components are not supported",
        ));
    }
    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        _ => return Err(Error::new(name.span(), "Only structs are supported")),
    };

    let mut args = None;
    for attr in &input.attrs {
        if attr.path().is_ident(COMPONENT_ATTR) {
            if args.is_some() {
                return Err(Error::new(
                    attr.span(),
                    format!("Only one #[{COMPONENT_ATTR}] attribute allowed"),
                ));
            }
            args = Some(attr.parse_args::<ComponentArgs>()?);
        }
    }
    let args = args.unwrap_or_default();

    let mut field_stmts = Vec::new();
    let mut field_inits = Vec::new();

    match fields {
        syn::Fields::Named(fields) => {
            for field in &fields.named {
                let Some(field_ident) = field.ident.as_ref() else {
                    continue;
                };
                let field_name = field_ident.to_string();
                match classify(&field.ty, &field.attrs)? {
                    Some(injection) => {
                        field_stmts.push(injection.describe(&field_name));
                        let take = injection.take(&field_name);
                        field_inits.push(quote! { #field_ident: #take });
                    }
                    None => {
                        field_inits
                            .push(quote! { #field_ident: ::core::default::Default::default() });
                    }
                }
            }
        }
        syn::Fields::Unnamed(_) => {
            return Err(Error::new(name.span(), "Tuple structs are not supported"));
        }
        syn::Fields::Unit => {}
    }

    let role = args.role();
    let contract_stmts = args.contract_stmts();
    let deps_ident = deps_ident(!field_stmts.is_empty());
    let registration = registration(&quote! { #name });

    Ok(quote! {
        impl ::weave::Component for #name {
            fn describe() -> ::weave::DiscoveredType {
                ::weave::DiscoveredType::builder::<Self>()
                    .role(#role)
                    #(#contract_stmts)*
                    #(#field_stmts)*
                    .constructor(|#deps_ident: &mut ::weave::Dependencies| {
                        Ok(Self {
                            #(#field_inits,)*
                        })
                    })
                    .build()
            }
        }

        #registration
    }
    .into())
}

fn handle_injectable_impl(args: ComponentArgs, input: ItemImpl) -> syn::Result<TokenStream> {
    if input.trait_.is_some() {
        return Err(Error::new(input.span(), "Trait impls are not supported"));
    }
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Generic components are not supported",
        ));
    }

    let self_ty = &input.self_ty;
    let mut factory = None;

    for item in &input.items {
        if let ImplItem::Fn(method) = item {
            for attr in &method.attrs {
                if attr.path().is_ident(FACTORY_ATTR) {
                    if factory.is_some() {
                        return Err(Error::new(attr.span(), "Only one factory method allowed"));
                    }
                    factory = Some(method);
                }
            }
        }
    }

    let method = match factory {
        Some(m) => m,
        None => return Err(Error::new(input.span(), "No factory method found")),
    };
    if method.sig.asyncness.is_some() {
        return Err(Error::new(
            method.sig.span(),
            "Factory methods must be synchronous",
        ));
    }

    let method_name = &method.sig.ident;
    let is_result = match &method.sig.output {
        ReturnType::Default => {
            return Err(Error::new(
                method.sig.span(),
                "Factory method must have a return type",
            ));
        }
        ReturnType::Type(_, ty) => is_result_type(ty),
    };

    let mut field_stmts = Vec::new();
    let mut arg_inits = Vec::new();
    let mut arg_names = Vec::new();
    let mut cleaned_inputs = Vec::new();

    for fn_arg in &method.sig.inputs {
        let pat_type = match fn_arg {
            FnArg::Receiver(_) => {
                return Err(Error::new(
                    fn_arg.span(),
                    "Factory method cannot have self parameter",
                ));
            }
            FnArg::Typed(pat_type) => pat_type,
        };

        // Create cleaned parameter without inject attributes
        let mut cleaned_pat_type = pat_type.clone();
        cleaned_pat_type
            .attrs
            .retain(|attr| !attr.path().is_ident(INJECT_ATTR));
        cleaned_inputs.push(FnArg::Typed(cleaned_pat_type));

        let arg_name = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => &pat_ident.ident,
            _ => {
                return Err(Error::new(
                    pat_type.pat.span(),
                    "Only simple bindings supported",
                ));
            }
        };
        let injection = match classify(&pat_type.ty, &pat_type.attrs)? {
            Some(v) => v,
            None => {
                return Err(Error::new(
                    pat_type.ty.span(),
                    format!("Arguments must be of type Arc<T> marked with #[{INJECT_ATTR}]"),
                ));
            }
        };
        let field_name = arg_name.to_string();
        let field_name = field_name.trim_start_matches("r#");
        field_stmts.push(injection.describe(field_name));
        let take = injection.take(field_name);
        arg_inits.push(quote! { let #arg_name = #take; });
        arg_names.push(quote! { #arg_name });
    }

    // Create cleaned input with inject and factory attributes removed
    let mut cleaned_input = input.clone();
    for item in &mut cleaned_input.items {
        if let ImplItem::Fn(method) = item
            && has_attr(&method.attrs, FACTORY_ATTR)
        {
            method.sig.inputs = cleaned_inputs.into_iter().collect();
            method
                .attrs
                .retain(|attr| !attr.path().is_ident(FACTORY_ATTR));
            break;
        }
    }

    let method_call = quote! { <#self_ty>::#method_name(#(#arg_names),*) };
    let build_body = if is_result {
        quote! {
            #(#arg_inits)*
            #method_call.map_err(::core::convert::Into::into)
        }
    } else {
        quote! {
            #(#arg_inits)*
            Ok(#method_call)
        }
    };

    let role = args.role();
    let contract_stmts = args.contract_stmts();
    let deps_ident = deps_ident(!field_stmts.is_empty());
    let registration = registration(&quote! { #self_ty });

    Ok(quote! {
        #cleaned_input

        impl ::weave::Component for #self_ty {
            fn describe() -> ::weave::DiscoveredType {
                ::weave::DiscoveredType::builder::<Self>()
                    .role(#role)
                    #(#contract_stmts)*
                    #(#field_stmts)*
                    .constructor(|#deps_ident: &mut ::weave::Dependencies| {
                        #build_body
                    })
                    .build()
            }
        }

        #registration
    }
    .into())
}

fn deps_ident(used: bool) -> Ident {
    if used {
        format_ident!("deps")
    } else {
        format_ident!("_deps")
    }
}

fn is_result_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
    {
        return true;
    }
    false
}
