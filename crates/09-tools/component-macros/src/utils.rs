//! 宏工具函数

use proc_macro2::Span;
use syn::{Data, Field, Fields, Ident, Index, Member};

/// 字段是否带有指定名称的属性
pub fn has_attribute(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 查找站点字段：优先 `#[site]` 标记的字段，其次名为 `site` 的字段
pub fn find_site_member(data: &Data, span: Span) -> syn::Result<Member> {
    let fields = match data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new(
                span,
                "#[derive(Component)] 只支持结构体",
            ))
        }
    };

    let marked: Vec<(usize, &Field)> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| has_attribute(field, "site"))
        .collect();

    match marked.as_slice() {
        [(index, field)] => return Ok(member_of(*index, field)),
        [] => {}
        [_, (_, second), ..] => {
            return Err(syn::Error::new_spanned(
                second,
                "只能有一个字段标记为 #[site]",
            ))
        }
    }

    if let Fields::Named(named) = fields {
        if let Some(ident) = named
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .find(|ident| *ident == "site")
        {
            return Ok(Member::Named(ident.clone()));
        }
    }

    Err(syn::Error::new(
        span,
        "缺少站点字段：请用 #[site] 标记一个 SiteSlot 字段，或命名为 `site`",
    ))
}

fn member_of(index: usize, field: &Field) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}

/// 把字符串字面量转换为方法标识符
pub fn method_ident(name: &str, span: Span) -> syn::Result<Ident> {
    syn::parse_str::<Ident>(name)
        .map(|mut ident| {
            ident.set_span(span);
            ident
        })
        .map_err(|_| syn::Error::new(span, format!("无效的方法名: {}", name)))
}
