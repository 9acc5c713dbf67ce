//! Type descriptors: the schema's types as plain data.
//!
//! Descriptors are what the extension hooks see and transform. They are
//! converted into `async_graphql::dynamic` types only when the executable
//! schema is finished.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{
    Field, FieldFuture, InputObject, InputValue, Interface, InterfaceField, Object,
    ResolverContext, Type, TypeRef,
};
use indexmap::IndexMap;
use press_store::EntityKind;

/// A field resolver.
pub type Resolver = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// What kind of GraphQL type a descriptor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    InputObject,
}

/// Maps an entity to this type: entities of `kind` whose tag equals `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classifier {
    pub kind: EntityKind,
    pub tag: String,
}

/// An argument on a field.
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
}

impl ArgumentDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_input_value(&self) -> InputValue {
        let input = InputValue::new(self.name.as_str(), self.ty.clone());
        match &self.description {
            Some(description) => input.description(description.as_str()),
            None => input,
        }
    }
}

/// A field on an object, interface, or input object.
///
/// Only object fields use the resolver; an object field without one
/// resolves to `null`.
#[derive(Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
    pub arguments: Vec<ArgumentDefinition>,
    resolver: Option<Resolver>,
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
            arguments: Vec::new(),
            resolver: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets the resolver.
    #[must_use]
    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    fn to_field(&self) -> Field {
        let resolver = self.resolver.clone();
        let mut field = Field::new(self.name.as_str(), self.ty.clone(), move |ctx| {
            match &resolver {
                Some(resolve) => resolve(ctx),
                None => FieldFuture::new(async { Ok(None::<Value>) }),
            }
        });
        for argument in &self.arguments {
            field = field.argument(argument.to_input_value());
        }
        match &self.description {
            Some(description) => field.description(description.as_str()),
            None => field,
        }
    }

    fn to_interface_field(&self) -> InterfaceField {
        let mut field = InterfaceField::new(self.name.as_str(), self.ty.clone());
        for argument in &self.arguments {
            field = field.argument(argument.to_input_value());
        }
        match &self.description {
            Some(description) => field.description(description.as_str()),
            None => field,
        }
    }

    fn to_input_value(&self) -> InputValue {
        let input = InputValue::new(self.name.as_str(), self.ty.clone());
        match &self.description {
            Some(description) => input.description(description.as_str()),
            None => input,
        }
    }
}

/// A named GraphQL type definition.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    description: Option<String>,
    implements: Vec<String>,
    fields: IndexMap<String, FieldDefinition>,
    classifier: Option<Classifier>,
}

impl TypeDescriptor {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            implements: Vec::new(),
            fields: IndexMap::new(),
            classifier: None,
        }
    }

    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    #[must_use]
    pub fn input_object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::InputObject)
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares an implemented interface. Objects only.
    #[must_use]
    pub fn implement(mut self, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        if !self.implements.contains(&interface) {
            self.implements.push(interface);
        }
        self
    }

    /// Adds a field, replacing any field of the same name in place.
    #[must_use]
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn fields(self, fields: impl IntoIterator<Item = FieldDefinition>) -> Self {
        fields.into_iter().fold(self, Self::field)
    }

    /// Removes a field, keeping the order of the rest.
    #[must_use]
    pub fn without_field(mut self, name: &str) -> Self {
        self.fields.shift_remove(name);
        self
    }

    /// Makes entities of `kind` tagged `tag` resolve to this type.
    #[must_use]
    pub fn classify(mut self, kind: EntityKind, tag: impl Into<String>) -> Self {
        self.classifier = Some(Classifier {
            kind,
            tag: tag.into(),
        });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[must_use]
    pub fn implements(&self) -> &[String] {
        &self.implements
    }

    #[must_use]
    pub fn classifier(&self) -> Option<&Classifier> {
        self.classifier.as_ref()
    }

    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Converts the descriptor into an `async_graphql` dynamic type.
    #[must_use]
    pub fn to_dynamic(&self) -> Type {
        match self.kind {
            TypeKind::Object => {
                let mut object = Object::new(self.name.as_str());
                if let Some(description) = &self.description {
                    object = object.description(description.as_str());
                }
                for interface in &self.implements {
                    object = object.implement(interface.as_str());
                }
                for field in self.fields.values() {
                    object = object.field(field.to_field());
                }
                object.into()
            }
            TypeKind::Interface => {
                let mut interface = Interface::new(self.name.as_str());
                if let Some(description) = &self.description {
                    interface = interface.description(description.as_str());
                }
                for field in self.fields.values() {
                    interface = interface.field(field.to_interface_field());
                }
                interface.into()
            }
            TypeKind::InputObject => {
                let mut input = InputObject::new(self.name.as_str());
                if let Some(description) = &self.description {
                    input = input.description(description.as_str());
                }
                for field in self.fields.values() {
                    input = input.field(field.to_input_value());
                }
                input.into()
            }
        }
    }
}
