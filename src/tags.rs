//! Documentation tag kinds known to a catalog run.

use log::debug;

/// Tag carrying one option of a route or handler declaration.
pub const CONDITION_TAG: &str = "padrino.condition";

/// Definition of a tag kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    /// Heading shown above tags of this kind
    pub label: String,
    /// Tag kind name
    pub name: String,
    /// Whether tags of this kind carry a name in addition to their text
    pub with_name: bool,
}

/// Registry of tag kinds, populated once when a run starts.
#[derive(Debug, Clone, Default)]
pub struct TagLibrary {
    definitions: Vec<TagDefinition>,
    visible: Vec<String>,
}

impl TagLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a tag kind. Redefining a name replaces the previous definition.
    pub fn define_tag(&mut self, label: &str, name: &str, with_name: bool) {
        debug!("Defining tag kind {} ({})", name, label);
        let definition = TagDefinition {
            label: label.to_string(),
            name: name.to_string(),
            with_name,
        };
        match self.definitions.iter_mut().find(|d| d.name == name) {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }

    /// Marks a tag kind as shown in generated output.
    pub fn make_visible(&mut self, name: &str) {
        if !self.is_visible(name) {
            self.visible.push(name.to_string());
        }
    }

    pub fn definition(&self, name: &str) -> Option<&TagDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.iter().any(|v| v == name)
    }
}

/// Declares the condition tag and makes it visible.
pub fn register_padrino_tags(library: &mut TagLibrary) {
    library.define_tag("Conditions", CONDITION_TAG, true);
    library.make_visible(CONDITION_TAG);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_padrino_tags() {
        let mut library = TagLibrary::new();
        assert!(!library.is_defined(CONDITION_TAG));

        register_padrino_tags(&mut library);

        let definition = library.definition(CONDITION_TAG).unwrap();
        assert_eq!(definition.label, "Conditions");
        assert!(definition.with_name);
        assert!(library.is_visible(CONDITION_TAG));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut library = TagLibrary::new();
        register_padrino_tags(&mut library);
        register_padrino_tags(&mut library);

        assert_eq!(library.definitions.len(), 1);
        assert_eq!(library.visible.len(), 1);
    }

    #[test]
    fn test_defined_tags_are_hidden_until_made_visible() {
        let mut library = TagLibrary::new();
        library.define_tag("Internal", "padrino.internal", false);

        assert!(library.is_defined("padrino.internal"));
        assert!(!library.is_visible("padrino.internal"));
    }
}
