//! 组件注册宏实现

use crate::utils::{
    arc_inner_type, generate_unique_ident, has_attribute, is_result_type, is_self_type,
    parse_named, take_attributes, to_snake_case,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parenthesized, parse::Parse, parse::ParseStream, punctuated::Punctuated, spanned::Spanned,
    FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, ReturnType, Result, Token, Type, Visibility,
};

/// 组件配置参数
#[derive(Clone)]
pub struct ComponentArgs {
    /// 生命周期类型
    pub lifetime: ComponentLifetime,
    /// 实现的接口类型
    pub provides: Vec<Type>,
}

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentLifetime {
    Singleton,
    Prototype,
}

impl Default for ComponentArgs {
    fn default() -> Self {
        Self {
            lifetime: ComponentLifetime::Prototype,
            provides: Vec::new(),
        }
    }
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ComponentArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            if ident == "singleton" {
                args.lifetime = ComponentLifetime::Singleton;
            } else if ident == "prototype" {
                args.lifetime = ComponentLifetime::Prototype;
            } else if ident == "provides" {
                let content;
                parenthesized!(content in input);
                let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                args.provides.extend(types);
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    "未知的组件参数，可用参数: singleton, prototype, provides(..)",
                ));
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// 注入参数
struct InjectParam {
    /// 依赖类型（`Arc<T>` 中的 `T`）
    ty: Type,
    /// 限定符
    qualifier: Option<syn::LitStr>,
}

/// 选定的构造方式
enum ConstructorPlan {
    Inject {
        method: Ident,
        params: Vec<InjectParam>,
        fallible: bool,
    },
    Default {
        method: Ident,
    },
    Missing,
}

/// 实现 #[component] 宏
pub fn component_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = if args.is_empty() {
        ComponentArgs::default()
    } else {
        match syn::parse::<ComponentArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let item_impl = match syn::parse::<ItemImpl>(input) {
        Ok(item) => item,
        Err(e) => {
            return syn::Error::new(e.span(), "#[component] 只能用于结构体的固有 impl 块")
                .to_compile_error()
                .into()
        }
    };

    match expand(component_args, item_impl) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(args: ComponentArgs, mut item_impl: ItemImpl) -> Result<TokenStream2> {
    let self_ident = component_ident(&item_impl)?;
    let plan = plan_constructor(&mut item_impl, &self_ident)?;

    let lifetime = match args.lifetime {
        ComponentLifetime::Singleton => quote! { ::di_abstractions::Lifetime::Singleton },
        ComponentLifetime::Prototype => quote! { ::di_abstractions::Lifetime::Prototype },
    };
    let constructor = generate_constructor(&self_ident, &plan);
    let interfaces = args.provides.iter().map(|interface| {
        quote! {
            .with_interface::<#interface>(|instance| {
                instance
                    .downcast::<#self_ident>()
                    .map(|component| {
                        ::di_abstractions::Instance::new(
                            component as ::std::sync::Arc<#interface>,
                        )
                    })
            })
        }
    });
    let registration_fn_name =
        generate_unique_ident("register_component", &to_snake_case(&self_ident.to_string()));

    Ok(quote! {
        #item_impl

        impl ::di_abstractions::Injectable for #self_ident {
            fn descriptor() -> ::di_abstractions::ComponentDescriptor {
                #constructor

                ::di_abstractions::ComponentDescriptor::new::<#self_ident>(#lifetime, __constructor)
                    .with_module_path(::std::module_path!())
                    #(#interfaces)*
            }
        }

        // 使用 ctor 在程序启动时自动注册组件
        #[::ctor::ctor]
        fn #registration_fn_name() {
            ::di_abstractions::submit_component(
                <#self_ident as ::di_abstractions::Injectable>::descriptor(),
            );
        }
    })
}

/// 组件类型必须是不带泛型的具名类型
fn component_ident(item_impl: &ItemImpl) -> Result<Ident> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[component] 只能用于固有 impl 块，不能用于 trait 实现",
        ));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(syn::Error::new(
            item_impl.generics.span(),
            "#[component] 不支持泛型组件",
        ));
    }
    match item_impl.self_ty.as_ref() {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .get_ident()
            .cloned()
            .ok_or_else(|| syn::Error::new(type_path.span(), "组件类型必须是当前模块中的类型名")),
        other => Err(syn::Error::new(other.span(), "组件类型必须是具名结构体")),
    }
}

/// 选定构造方式：`#[inject]` 方法优先，其次公开的无参 `new()`
fn plan_constructor(item_impl: &mut ItemImpl, self_ident: &Ident) -> Result<ConstructorPlan> {
    let mut inject_plan = None;

    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        if !has_attribute(&method.attrs, "inject") {
            continue;
        }
        let marker = take_attributes(&mut method.attrs, "inject");
        if inject_plan.is_some() {
            return Err(syn::Error::new(
                marker[0].span(),
                "一个组件只能有一个 #[inject] 构造函数",
            ));
        }
        inject_plan = Some(plan_inject(method, self_ident)?);
    }

    if let Some(plan) = inject_plan {
        return Ok(plan);
    }

    let default = item_impl.items.iter().find_map(|item| match item {
        ImplItem::Fn(method)
            if method.sig.ident == "new"
                && method.sig.inputs.is_empty()
                && matches!(method.vis, Visibility::Public(_)) =>
        {
            Some(method.sig.ident.clone())
        }
        _ => None,
    });

    Ok(match default {
        Some(method) => ConstructorPlan::Default { method },
        None => ConstructorPlan::Missing,
    })
}

fn plan_inject(method: &mut ImplItemFn, self_ident: &Ident) -> Result<ConstructorPlan> {
    let fallible = match &method.sig.output {
        ReturnType::Type(_, ty) if is_self_type(ty, self_ident) => false,
        ReturnType::Type(_, ty) if is_result_type(ty) => true,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "#[inject] 构造函数必须返回 Self 或 Result<Self, E>",
            ))
        }
    };

    let mut params = Vec::new();
    for input in &mut method.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            return Err(syn::Error::new(
                input.span(),
                "#[inject] 构造函数不能有 self 参数",
            ));
        };

        let named = take_attributes(&mut pat_type.attrs, "named");
        let qualifier = match named.as_slice() {
            [] => None,
            [attr] => Some(parse_named(attr)?),
            [_, extra, ..] => {
                return Err(syn::Error::new(extra.span(), "每个参数只能有一个 #[named]"))
            }
        };

        let ty = arc_inner_type(&pat_type.ty)
            .cloned()
            .ok_or_else(|| syn::Error::new(pat_type.ty.span(), "#[inject] 参数必须是 Arc<T>"))?;
        params.push(InjectParam { ty, qualifier });
    }

    Ok(ConstructorPlan::Inject {
        method: method.sig.ident.clone(),
        params,
        fallible,
    })
}

fn generate_constructor(self_ident: &Ident, plan: &ConstructorPlan) -> TokenStream2 {
    match plan {
        ConstructorPlan::Inject {
            method,
            params,
            fallible,
        } => {
            let resolved = params.iter().map(|param| {
                let ty = &param.ty;
                match &param.qualifier {
                    Some(qualifier) => quote! { resolver.get_named::<#ty>(#qualifier)? },
                    None => quote! { resolver.get::<#ty>()? },
                }
            });
            let construct = if *fallible {
                quote! {
                    #self_ident::#method(#(#resolved),*)
                        .map_err(::di_abstractions::constructor_failed)?
                }
            } else {
                quote! { #self_ident::#method(#(#resolved),*) }
            };

            quote! {
                fn __inject(
                    resolver: &mut dyn ::di_abstractions::DependencyResolver,
                ) -> ::std::result::Result<
                    ::di_abstractions::Instance,
                    ::di_abstractions::DependencyError,
                > {
                    let component: #self_ident = #construct;
                    ::std::result::Result::Ok(::di_abstractions::Instance::from_value(component))
                }
                let __constructor = ::di_abstractions::Constructor::Inject(__inject);
            }
        }
        ConstructorPlan::Default { method } => quote! {
            fn __default() -> ::di_abstractions::Instance {
                ::di_abstractions::Instance::from_value(#self_ident::#method())
            }
            let __constructor = ::di_abstractions::Constructor::Default(__default);
        },
        ConstructorPlan::Missing => quote! {
            let __constructor = ::di_abstractions::Constructor::Missing;
        },
    }
}
