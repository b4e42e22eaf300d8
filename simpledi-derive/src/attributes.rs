use syn::spanned::Spanned;
use syn::{Attribute, Error, Expr, ExprLit, ExprPath, Lit, LitStr, Meta, Result};

pub const CONFIGURATION: &str = "configuration";
pub const COMPONENT_SCAN: &str = "component_scan";
pub const BEAN: &str = "bean";
pub const NAMED: &str = "named";
pub const INJECT: &str = "inject";

/// Value of a marker which can be given explicitly or derived from the annotated item.
pub enum ValueDefinition {
    /// `#[marker("value")]` or `#[marker = "value"]`
    Explicit(LitStr),
    /// `#[marker]`
    Implicit,
}

impl TryFrom<&Attribute> for ValueDefinition {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self> {
        match &value.meta {
            Meta::Path(_) => Ok(Self::Implicit),
            Meta::List(_) => value.parse_args().map(Self::Explicit),
            Meta::NameValue(name_value) => {
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(string),
                    ..
                }) = &name_value.value
                {
                    Ok(Self::Explicit(string.clone()))
                } else {
                    Err(Error::new(
                        name_value.value.span(),
                        "Marker value must be a string literal!",
                    ))
                }
            }
        }
    }
}

pub struct BeanAttributes {
    pub constructor: Option<ExprPath>,
}

impl TryFrom<&Attribute> for BeanAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self> {
        let mut constructor = None;
        if let Meta::List(_) = &value.meta {
            value.parse_nested_meta(|meta| {
                if meta.path.is_ident("constructor") {
                    let expr: LitStr = meta.value()?.parse()?;
                    constructor = Some(expr.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("Unsupported bean attribute!"))
                }
            })?;
        }

        Ok(Self { constructor })
    }
}

#[derive(Default)]
pub struct TypeAttributes {
    pub configuration: bool,
    pub component_scan: Option<ValueDefinition>,
    pub bean: Option<BeanAttributes>,
    pub named: Option<ValueDefinition>,
}

impl TryFrom<&[Attribute]> for TypeAttributes {
    type Error = Error;

    fn try_from(value: &[Attribute]) -> Result<Self> {
        let mut attributes = Self::default();
        for attr in value {
            let path = attr.path();
            if path.is_ident(CONFIGURATION) {
                attr.meta.require_path_only()?;
                attributes.configuration = true;
            } else if path.is_ident(COMPONENT_SCAN) {
                attributes.component_scan = Some(ValueDefinition::try_from(attr)?);
            } else if path.is_ident(BEAN) {
                attributes.bean = Some(BeanAttributes::try_from(attr)?);
            } else if path.is_ident(NAMED) {
                attributes.named = Some(ValueDefinition::try_from(attr)?);
            } else if path.is_ident(INJECT) {
                return Err(Error::new(
                    attr.span(),
                    "#[inject] can only be used on fields!",
                ));
            }
        }

        Ok(attributes)
    }
}

#[derive(Default)]
pub struct FieldAttributes {
    pub inject: bool,
    pub named: Option<LitStr>,
}

impl TryFrom<&[Attribute]> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &[Attribute]) -> Result<Self> {
        let mut attributes = Self::default();
        for attr in value {
            let path = attr.path();
            if path.is_ident(INJECT) {
                attr.meta.require_path_only()?;
                attributes.inject = true;
            } else if path.is_ident(NAMED) {
                match ValueDefinition::try_from(attr)? {
                    ValueDefinition::Explicit(name) => attributes.named = Some(name),
                    ValueDefinition::Implicit => {
                        return Err(Error::new(
                            attr.span(),
                            "Field qualifiers require a value, e.g. #[named(\"name\")]!",
                        ))
                    }
                }
            } else if path.is_ident(CONFIGURATION)
                || path.is_ident(COMPONENT_SCAN)
                || path.is_ident(BEAN)
            {
                return Err(Error::new(
                    attr.span(),
                    "Type markers cannot be used on fields!",
                ));
            }
        }

        Ok(attributes)
    }
}
