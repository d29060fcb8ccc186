//! Builds resources of the right kind from property bags.
//!
//! A factory maps `(datatype, resType)` pairs to constructors. Without an
//! override the built-in constructor for the `resType` is used. A process-wide
//! factory backs [`new_resource`] and [`assign_resource_class`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::props::ResourceProps;
use crate::model::resource::{ResType, Resource};

/// Constructor producing a resource from a property bag.
pub type Constructor = fn(ResourceProps) -> Resource;

/// What to register for a `(datatype, resType)` pair.
#[derive(Debug, Clone)]
pub enum ResourceClass {
    /// One of the built-in class names, see [`resolve_class_name`].
    Named(String),
    Constructor(Constructor),
}

/// Resolves a built-in resource class name to its constructor.
pub fn resolve_class_name(name: &str) -> Option<Constructor> {
    match name {
        "ResourceString" => Some(Resource::string_from_props),
        "ResourceArray" => Some(Resource::array_from_props),
        "ResourcePlural" => Some(Resource::plural_from_props),
        "ContextResourceString" => Some(context_string_from_props),
        _ => None,
    }
}

fn builtin(res_type: ResType) -> Constructor {
    match res_type {
        ResType::String => Resource::string_from_props,
        ResType::Array => Resource::array_from_props,
        ResType::Plural => Resource::plural_from_props,
    }
}

/// String resource that takes its context from an Android resource directory
/// qualifier (`res/values-land/strings.xml` -> `land`) when none is given.
pub fn context_string_from_props(mut props: ResourceProps) -> Resource {
    if props.context.as_deref().map_or(true, str::is_empty) {
        props.context = android_qualifier(&props.path_name);
    }
    Resource::string_from_props(props)
}

fn android_qualifier(path_name: &str) -> Option<String> {
    Path::new(path_name)
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .and_then(|dir| dir.strip_prefix("values-"))
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFactory {
    overrides: HashMap<(String, ResType), Constructor>,
}

impl ResourceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the class used for `(datatype, res_type)`.
    ///
    /// Fails when a name does not resolve to a known resource class, or when
    /// the constructor builds a resource of a different type.
    pub fn assign_resource_class(
        &mut self,
        datatype: &str,
        res_type: ResType,
        class: ResourceClass,
    ) -> Result<()> {
        let ctor = match class {
            ResourceClass::Named(name) => resolve_class_name(&name)
                .ok_or_else(|| Error::ResourceClass(format!("unknown class '{name}'")))?,
            ResourceClass::Constructor(ctor) => ctor,
        };

        let sample = ctor(ResourceProps {
            res_type: Some(res_type.as_str().to_string()),
            datatype: Some(datatype.to_string()),
            ..Default::default()
        });
        if sample.res_type() != res_type {
            return Err(Error::ResourceClass(format!(
                "class for ({datatype}, {res_type}) builds {} resources",
                sample.res_type()
            )));
        }

        debug!("[Factory] registered class for ({datatype}, {res_type})");
        self.overrides.insert((datatype.to_string(), res_type), ctor);
        Ok(())
    }

    /// Builds a resource; a missing bag yields an empty string resource.
    ///
    /// An unknown `resType` falls back to a string resource.
    pub fn create(&self, props: Option<ResourceProps>) -> Resource {
        let props = props.unwrap_or_default();
        let res_type: ResType = props.res_type_name().parse().unwrap_or_default();

        let ctor = props
            .datatype
            .as_ref()
            .and_then(|dt| self.overrides.get(&(dt.clone(), res_type)))
            .copied()
            .unwrap_or_else(|| builtin(res_type));

        ctor(props)
    }
}

static REGISTRY: Lazy<RwLock<ResourceFactory>> = Lazy::new(|| RwLock::new(ResourceFactory::new()));

/// Builds a resource through the process-wide factory.
pub fn new_resource(props: Option<ResourceProps>) -> Resource {
    let factory = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    factory.create(props)
}

/// Registers a class override in the process-wide factory.
pub fn assign_resource_class(datatype: &str, res_type: ResType, class: ResourceClass) -> Result<()> {
    let mut factory = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    factory.assign_resource_class(datatype, res_type, class)
}
