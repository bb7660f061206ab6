//! Script loading condition of an entrypoint

use serde::{Deserialize, Serialize};

/// How an entrypoint's JavaScript is loaded by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// `<script type="module">`
    #[default]
    Module,
    /// `<script nomodule>`
    Nomodule,
    /// No loading condition
    #[serde(rename = "none")]
    Unconditional,
}

impl Condition {
    /// Segment used in generated bundle file names.
    ///
    /// Unconditional entrypoints are bundled as `module`.
    pub fn bundle_label(self) -> &'static str {
        match self {
            Condition::Module | Condition::Unconditional => "module",
            Condition::Nomodule => "nomodule",
        }
    }

    /// Attribute emitted on the `<script>` tag, if any
    pub fn script_attribute(self) -> Option<&'static str> {
        match self {
            Condition::Module => Some("type=\"module\""),
            Condition::Nomodule => Some("nomodule"),
            Condition::Unconditional => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconditional_bundles_as_module() {
        assert_eq!(Condition::Unconditional.bundle_label(), "module");
        assert_eq!(Condition::Nomodule.bundle_label(), "nomodule");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let c: Condition = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(c, Condition::Unconditional);
        assert_eq!(serde_json::to_string(&Condition::Nomodule).unwrap(), "\"nomodule\"");
    }
}
