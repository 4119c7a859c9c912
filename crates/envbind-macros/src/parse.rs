//! Parsing utilities for the `EnvConfig` derive.
//!
//! This module turns a `DeriveInput` into a [`ConfigStruct`]: the struct's
//! name plus, for every field that takes part in the schema, its name
//! segment, type and default literal.

use syn::{
    ext::IdentExt, punctuated::Punctuated, spanned::Spanned, Attribute, Data, DeriveInput, Expr,
    ExprLit, Fields, Ident, Lit, Meta, Token, Type,
};

/// Options collected from `#[env(...)]` on one field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Default literal (`d = "..."` or `default = "..."`).
    pub default: Option<String>,
    /// Replacement name segment.
    pub rename: Option<String>,
    /// Exclude the field from the schema.
    pub skip: bool,
}

impl FieldAttrs {
    /// Parses every `#[env(...)]` attribute on a field.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("env")) {
            let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in metas {
                parsed.apply(meta)?;
            }
        }

        if parsed.skip && (parsed.default.is_some() || parsed.rename.is_some()) {
            return Err(syn::Error::new(
                attrs[0].span(),
                "`skip` cannot be combined with other env options",
            ));
        }

        Ok(parsed)
    }

    fn apply(&mut self, meta: Meta) -> syn::Result<()> {
        match meta {
            Meta::Path(path) if path.is_ident("skip") => {
                self.skip = true;
                Ok(())
            }
            Meta::NameValue(nv) => {
                let ident = nv
                    .path
                    .get_ident()
                    .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                    .to_string();

                let value = match &nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => s.value(),
                    _ => {
                        return Err(syn::Error::new(
                            nv.value.span(),
                            "expected string literal",
                        ))
                    }
                };

                let slot = match ident.as_str() {
                    "d" | "default" => &mut self.default,
                    "rename" => {
                        if value.is_empty() {
                            return Err(syn::Error::new(nv.value.span(), "rename cannot be empty"));
                        }
                        &mut self.rename
                    }
                    _ => {
                        return Err(syn::Error::new(
                            nv.path.span(),
                            format!("unknown env option: {ident}"),
                        ))
                    }
                };

                if slot.is_some() {
                    return Err(syn::Error::new(
                        nv.path.span(),
                        format!("duplicate env option: {ident}"),
                    ));
                }
                *slot = Some(value);
                Ok(())
            }
            other => Err(syn::Error::new(
                other.span(),
                "expected `skip` or `name = \"value\"`",
            )),
        }
    }
}

/// A field that takes part in the schema.
#[derive(Debug)]
pub struct ConfigField {
    /// The Rust field identifier.
    pub ident: Ident,
    /// The field type.
    pub ty: Type,
    /// Name segment used to derive keys.
    pub name: String,
    /// Default literal.
    pub default: Option<String>,
}

/// A parsed configuration struct.
#[derive(Debug)]
pub struct ConfigStruct {
    /// The struct name.
    pub ident: Ident,
    /// Schema fields in declaration order; skipped fields are absent.
    pub fields: Vec<ConfigField>,
}

impl ConfigStruct {
    /// Parses a `DeriveInput` into a `ConfigStruct`.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "EnvConfig cannot be derived for generic structs",
            ));
        }

        let data = match input.data {
            Data::Struct(data) => data,
            Data::Enum(e) => {
                return Err(syn::Error::new(
                    e.enum_token.span,
                    "EnvConfig can only be derived for structs",
                ))
            }
            Data::Union(u) => {
                return Err(syn::Error::new(
                    u.union_token.span,
                    "EnvConfig can only be derived for structs",
                ))
            }
        };

        let named = match data.fields {
            Fields::Named(named) => named.named.into_iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "EnvConfig requires named fields",
                ))
            }
        };

        let mut fields = Vec::new();
        for field in named {
            let attrs = FieldAttrs::from_attrs(&field.attrs)?;
            if attrs.skip {
                continue;
            }

            let ident = field
                .ident
                .ok_or_else(|| syn::Error::new(field.ty.span(), "expected a named field"))?;
            let name = attrs.rename.unwrap_or_else(|| ident.unraw().to_string());

            fields.push(ConfigField {
                ident,
                ty: field.ty,
                name,
                default: attrs.default,
            });
        }

        Ok(Self {
            ident: input.ident,
            fields,
        })
    }
}
