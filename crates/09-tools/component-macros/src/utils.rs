//! 宏工具函数

use proc_macro2::Span;
use syn::{Attribute, GenericArgument, Ident, LitStr, PathArguments, Result, Type};

/// 从 `Arc<T>` 中提取 `T`
pub fn arc_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result"),
        _ => false,
    }
}

/// 检查类型是否为 `Self` 或指定的类型名
pub fn is_self_type(ty: &Type, self_ident: &Ident) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .get_ident()
            .is_some_and(|ident| ident == "Self" || ident == self_ident),
        _ => false,
    }
}

/// 属性列表中是否有指定名称的属性
pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 移除指定名称的属性，返回被移除的属性
pub fn take_attributes(attrs: &mut Vec<Attribute>, name: &str) -> Vec<Attribute> {
    let (taken, kept) = attrs
        .drain(..)
        .partition(|attr: &Attribute| attr.path().is_ident(name));
    *attrs = kept;
    taken
}

/// 解析 `#[named("qualifier")]`
pub fn parse_named(attr: &Attribute) -> Result<LitStr> {
    let qualifier: LitStr = attr.parse_args()?;
    if qualifier.value().is_empty() {
        return Err(syn::Error::new(qualifier.span(), "限定符不能为空"));
    }
    Ok(qualifier)
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 检查前一个字符是否为小写，或者下一个字符是否为小写
            let prev_is_lower = chars.get(i - 1).is_some_and(|c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.push(ch.to_lowercase().next().unwrap_or(ch));
    }

    result
}

/// 生成唯一的标识符
pub fn generate_unique_ident(base_name: &str, suffix: &str) -> Ident {
    let unique_name = format!("__{}_{}", base_name, suffix);
    Ident::new(&unique_name, Span::call_site())
}
