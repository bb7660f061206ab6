//! Admin UI icon registry
//!
//! Modules declare `icons = { "icon-name" = "ComponentName" }`. Declarations
//! are merged in module order, later declarations replacing earlier ones.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::import_composer::{component_name, ImportFileOutput};
use crate::error::{AssetError, AssetResult};

/// Package providing the stock icon components
pub const ICON_PACKAGE: &str = "@apostrophecms/vue-material-design-icons";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconRegistry {
    icons: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `(module, icons)` declarations in order.
    ///
    /// Each `icons` value must be a mapping of icon name to component name.
    pub fn from_declarations<'a, I>(declarations: I) -> AssetResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut registry = Self::new();
        for (module, icons) in declarations {
            let map = icons.as_object().ok_or_else(|| AssetError::InvalidIcons {
                module: module.to_string(),
                found: json_kind(icons).to_string(),
            })?;
            for (name, component) in map {
                let component = component.as_str().ok_or_else(|| AssetError::InvalidIcons {
                    module: module.to_string(),
                    found: format!("{} for icon '{}'", json_kind(component), name),
                })?;
                registry.insert(name, component);
            }
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: &str, component: &str) {
        match self.index.get(name) {
            Some(&at) => self.icons[at].1 = component.to_string(),
            None => {
                self.index.insert(name.to_string(), self.icons.len());
                self.icons.push((name.to_string(), component.to_string()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Import each component once and register every icon name.
    pub fn output(&self) -> ImportFileOutput {
        let mut output = ImportFileOutput::default();
        let mut imported = HashSet::new();
        for (name, component) in &self.icons {
            let binding = icon_binding(component);
            if imported.insert(component.as_str()) {
                output.import_code.push_str(&format!(
                    "import {} from \"{}\";\n",
                    binding,
                    icon_import_path(component)
                ));
            }
            output.register_code.push_str(&format!(
                "window.apos.iconComponents['{}'] = {};\n",
                name, binding
            ));
        }
        output
    }
}

fn icon_binding(component: &str) -> String {
    format!("{}Icon", component_name(component, None))
}

fn icon_import_path(component: &str) -> String {
    if component.contains('/') {
        component.to_string()
    } else {
        format!("{}/{}.vue", ICON_PACKAGE, component)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
