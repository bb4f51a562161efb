//! 组件派生宏实现

use crate::utils::{find_site_member, method_ident};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{punctuated::Punctuated, DeriveInput, Ident, LitStr, Token, Type};

/// 组件继承级别
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inheritance {
    NotInherited,
    Inherited,
    InheritedReadOnly,
}

impl Inheritance {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "not_inherited" => Ok(Self::NotInherited),
            "inherited" => Ok(Self::Inherited),
            "inherited_read_only" => Ok(Self::InheritedReadOnly),
            other => Err(syn::Error::new(
                lit.span(),
                format!(
                    "未知的继承级别 `{}`，可选值: not_inherited, inherited, inherited_read_only",
                    other
                ),
            )),
        }
    }

    fn variant(self) -> TokenStream {
        match self {
            Self::NotInherited => quote! { NotInherited },
            Self::Inherited => quote! { Inherited },
            Self::InheritedReadOnly => quote! { InheritedReadOnly },
        }
    }
}

/// `#[component(...)]` 参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 提供的接口能力
    pub provides: Vec<Type>,
    /// 继承级别，未指定时使用 trait 默认值
    pub inheritance: Option<Inheritance>,
    /// 释放方法
    pub release: Option<Ident>,
}

impl ComponentArgs {
    /// 从结构体属性解析参数
    pub fn from_attributes(input: &DeriveInput) -> syn::Result<Self> {
        let mut args = Self::default();

        for attr in &input.attrs {
            if !attr.path().is_ident("component") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("provides") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.provides.extend(types);
                    Ok(())
                } else if meta.path.is_ident("inheritance") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.inheritance = Some(Inheritance::parse(&lit)?);
                    Ok(())
                } else if meta.path.is_ident("release") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.release = Some(method_ident(&lit.value(), lit.span())?);
                    Ok(())
                } else {
                    Err(meta.error("未知的 component 参数，可选: provides, inheritance, release"))
                }
            })?;
        }

        Ok(args)
    }
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let args = ComponentArgs::from_attributes(input)?;
    let site_member = find_site_member(&input.data, input.ident.span())?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let provides = args.provides.iter().map(|ty| {
        quote! { .provide::<#ty>(|this| this) }
    });

    let inheritance_fn = args.inheritance.map(|level| {
        let variant = level.variant();
        quote! {
            fn inheritance_level(&self) -> ::infrastructure_common::InheritanceLevel {
                ::infrastructure_common::InheritanceLevel::#variant
            }
        }
    });

    let release_fn = args.release.as_ref().map(|method| {
        quote! {
            fn release(&self) {
                self.#method();
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::di_abstractions::Component for #struct_name #ty_generics #where_clause {
            fn capabilities(&self) -> ::infrastructure_common::Capabilities {
                ::infrastructure_common::Capabilities::builder::<Self>()
                    #(#provides)*
                    .build()
            }

            fn site_slot(&self) -> &::di_abstractions::SiteSlot {
                &self.#site_member
            }

            #inheritance_fn

            #release_fn
        }
    };

    Ok(expanded)
}
