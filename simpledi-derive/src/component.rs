use crate::attributes::{BeanAttributes, FieldAttributes, TypeAttributes, ValueDefinition};
use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::ops::Deref;
use syn::spanned::Spanned;
use syn::{Data, DataStruct, DeriveInput, Error, Field, Index, Item, LitStr, Member, Result, Type};

fn optional_str(value: Option<&LitStr>) -> TokenStream {
    match value {
        Some(value) => quote!(::std::option::Option::Some(#value)),
        None => quote!(::std::option::Option::None),
    }
}

fn generate_component_scan(component_scan: Option<&ValueDefinition>) -> TokenStream {
    match component_scan {
        Some(ValueDefinition::Explicit(namespace)) => {
            quote!(::std::option::Option::Some(#namespace))
        }
        Some(ValueDefinition::Implicit) => {
            quote!(::std::option::Option::Some(::std::module_path!()))
        }
        None => quote!(::std::option::Option::None),
    }
}

fn generate_type_name(named: Option<&ValueDefinition>, ident: &Ident) -> Option<LitStr> {
    named.map(|named| match named {
        ValueDefinition::Explicit(name) => name.clone(),
        ValueDefinition::Implicit => {
            LitStr::new(&ident.to_string().to_case(Case::Camel), ident.span())
        }
    })
}

fn generate_constructor(
    bean: Option<&BeanAttributes>,
    ident: &Ident,
) -> (TokenStream, TokenStream) {
    match bean {
        Some(BeanAttributes {
            constructor: Some(path),
        }) => (
            quote! {
                fn construct() -> ::std::result::Result<
                    simpledi::instance::ComponentInstanceAnyPtr,
                    simpledi::instance::ErrorPtr,
                > {
                    simpledi::component::into_instance::<#ident>(#path())
                }
            },
            quote! {
                ::std::option::Option::Some(construct as simpledi::component::ConstructorFunction)
            },
        ),
        Some(_) => (
            quote!(),
            quote! {
                ::std::option::Option::Some(
                    simpledi::component::construct_default::<#ident>
                        as simpledi::component::ConstructorFunction
                )
            },
        ),
        None => (quote!(), quote!(::std::option::Option::None)),
    }
}

fn generate_injection_point(
    index: usize,
    field: &Field,
    ident: &Ident,
) -> Result<Option<(TokenStream, TokenStream)>> {
    let attributes = FieldAttributes::try_from(field.attrs.as_slice())?;
    if !attributes.inject {
        return if attributes.named.is_some() {
            Err(Error::new(
                field.span(),
                "Qualified fields must be marked with #[inject]!",
            ))
        } else {
            Ok(None)
        };
    }

    let (member, field_name) = match &field.ident {
        Some(field_ident) => (Member::Named(field_ident.clone()), field_ident.to_string()),
        None => (Member::Unnamed(Index::from(index)), index.to_string()),
    };

    let function = format_ident!("inject_{}", index);
    let ty = &field.ty;
    let named = optional_str(attributes.named.as_ref());

    Ok(Some((
        quote! {
            fn #function(
                instance: &dyn ::std::any::Any,
                value: simpledi::injection::InjectedValue,
            ) -> ::std::result::Result<(), simpledi::error::InjectionError> {
                let component = instance.downcast_ref::<#ident>().ok_or(
                    simpledi::error::InjectionError::IncompatibleInstance(
                        ::std::any::type_name::<#ident>(),
                    ),
                )?;
                simpledi::injection::InjectionSlot::accept(&component.#member, value)
            }
        },
        quote! {
            simpledi::component::InjectionPoint {
                field: #field_name,
                declared_type: <#ty as simpledi::injection::InjectionSlot>::target_type(),
                declared_type_name: <#ty as simpledi::injection::InjectionSlot>::target_type_name(),
                named: #named,
                inject: #function as simpledi::component::InjectFunction,
            }
        },
    )))
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        if !input.generics.params.is_empty() {
            return Err(Error::new(
                input.generics.span(),
                "Generic components are not supported!",
            ));
        }

        let ident = &input.ident;
        let ident_name = ident.to_string();
        let attributes = TypeAttributes::try_from(input.attrs.as_slice())?;

        let configuration = attributes.configuration;
        let component_scan = generate_component_scan(attributes.component_scan.as_ref());
        let is_bean = attributes.bean.is_some();
        let named = generate_type_name(attributes.named.as_ref(), ident);
        let named = optional_str(named.as_ref());
        let (constructor_fn, constructor) = generate_constructor(attributes.bean.as_ref(), ident);

        let (inject_fns, injection_points): (Vec<_>, Vec<_>) = fields
            .iter()
            .enumerate()
            .map(|(index, field)| generate_injection_point(index, field, ident))
            .filter_map_ok(|point| point)
            .try_collect::<_, Vec<_>, _>()?
            .into_iter()
            .unzip();

        Ok(quote! {
            #[automatically_derived]
            impl simpledi::component::Component for #ident {
                fn descriptor() -> simpledi::component::TypeDescriptor {
                    #constructor_fn
                    #(#inject_fns)*

                    simpledi::component::TypeDescriptor {
                        name: ::std::concat!(::std::module_path!(), "::", #ident_name),
                        type_id: ::std::any::TypeId::of::<#ident>(),
                        markers: simpledi::component::TypeMarkers {
                            configuration: #configuration,
                            component_scan: #component_scan,
                            bean: #is_bean,
                            named: #named,
                        },
                        constructor: #constructor,
                        cast: simpledi::component::cast_self::<#ident>
                            as simpledi::instance::CastFunction,
                        injection_points: ::std::vec![#(#injection_points),*],
                    }
                }
            }

            const _: () = {
                fn register() -> simpledi::component::TypeDescriptor {
                    <#ident as simpledi::component::Component>::descriptor()
                }

                simpledi::catalog::internal::submit! {
                    simpledi::catalog::internal::TypeRegisterer {
                        register
                    }
                };
            };
        })
    } else {
        Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ))
    }
}

fn alias_type(trait_type: &syn::Path) -> TokenStream {
    #[cfg(feature = "threadsafe")]
    return quote!(dyn #trait_type + ::std::marker::Send + ::std::marker::Sync);

    #[cfg(not(feature = "threadsafe"))]
    return quote!(dyn #trait_type);
}

pub fn register_component_alias(item: &Item) -> Result<TokenStream> {
    if let Item::Impl(item_impl) = item {
        if !item_impl.generics.params.is_empty() {
            return Err(Error::new(
                item_impl.generics.span(),
                "Generic trait implementations cannot be registered as aliases!",
            ));
        }

        let trait_type = item_impl
            .trait_
            .as_ref()
            .map(|(_, path, ..)| path)
            .ok_or_else(|| Error::new(item.span(), "Missing trait identifier!"))?;

        let target_type = if let Type::Path(path) = item_impl.self_ty.deref() {
            &path.path
        } else {
            return Err(Error::new(
                item.span(),
                "Registering aliases is only available for Components!",
            ));
        };

        let alias = alias_type(trait_type);

        Ok(quote! {
            const _: () = {
                fn cast(
                    source: simpledi::instance::ComponentInstanceAnyPtr,
                ) -> ::std::result::Result<
                    ::std::boxed::Box<dyn ::std::any::Any>,
                    simpledi::instance::ComponentInstanceAnyPtr,
                > {
                    source.downcast::<#target_type>().map(|p| {
                        let p: simpledi::instance::ComponentInstancePtr<#alias> = p;
                        ::std::boxed::Box::new(p) as ::std::boxed::Box<dyn ::std::any::Any>
                    })
                }

                fn register() -> simpledi::component::AliasDescriptor {
                    use ::std::any::{type_name, TypeId};
                    simpledi::component::AliasDescriptor {
                        alias_type: TypeId::of::<#alias>(),
                        alias_name: type_name::<#alias>(),
                        target_type: TypeId::of::<#target_type>(),
                        target_name: type_name::<#target_type>(),
                        cast: cast as simpledi::instance::CastFunction,
                    }
                }

                simpledi::catalog::internal::submit! {
                    simpledi::catalog::internal::AliasRegisterer {
                        register
                    }
                };
            };
        })
    } else {
        Err(Error::new(
            item.span(),
            "Registering aliases is possible only on trait implementations!",
        ))
    }
}
