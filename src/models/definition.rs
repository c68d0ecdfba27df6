//! Content part and content type definitions.
//!
//! Definitions are altered through builders so that stores can offer
//! create-or-update semantics: a builder starts from the existing definition
//! (or an empty one named after the target) and the caller's alteration is
//! applied on top.

use serde::{Deserialize, Serialize};

/// A named, reusable schema fragment that can be attached to content types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPartDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attachable: bool,
}

impl ContentPartDefinition {
    /// An empty, non-attachable definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            attachable: false,
        }
    }
}

/// A reference from a content type to a part definition.
///
/// `name` is the name of the part on the type, `part_name` the referenced
/// part definition. They are equal unless the part is attached more than once
/// under different names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypePartDefinition {
    pub name: String,
    pub part_name: String,
}

/// A named content type composed of part references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub parts: Vec<ContentTypePartDefinition>,
}

impl ContentTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            parts: Vec::new(),
        }
    }

    /// Returns true if any part on this type references `part_name`.
    pub fn references_part(&self, part_name: &str) -> bool {
        self.parts.iter().any(|p| p.part_name == part_name)
    }
}

/// Applies alterations to a [`ContentPartDefinition`].
#[derive(Debug, Clone)]
pub struct ContentPartDefinitionBuilder {
    definition: ContentPartDefinition,
}

impl ContentPartDefinitionBuilder {
    pub fn new(definition: ContentPartDefinition) -> Self {
        Self { definition }
    }

    /// Marks the part as attachable to any content type.
    pub fn attachable(&mut self) -> &mut Self {
        self.definition.attachable = true;
        self
    }

    pub fn not_attachable(&mut self) -> &mut Self {
        self.definition.attachable = false;
        self
    }

    pub fn with_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.definition.description = description.into();
        self
    }

    pub fn build(self) -> ContentPartDefinition {
        self.definition
    }
}

/// Applies alterations to a [`ContentTypeDefinition`].
#[derive(Debug, Clone)]
pub struct ContentTypeDefinitionBuilder {
    definition: ContentTypeDefinition,
}

impl ContentTypeDefinitionBuilder {
    pub fn new(definition: ContentTypeDefinition) -> Self {
        Self { definition }
    }

    pub fn display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.definition.display_name = display_name.into();
        self
    }

    /// Attaches `part_name` under its own name. Existing parts are left as-is.
    pub fn with_part(&mut self, part_name: &str) -> &mut Self {
        self.with_named_part(part_name, part_name)
    }

    /// Attaches `part_name` under `name`, keeping the position of an existing
    /// part with the same name.
    pub fn with_named_part(&mut self, name: &str, part_name: &str) -> &mut Self {
        match self.definition.parts.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.part_name = part_name.to_string(),
            None => self.definition.parts.push(ContentTypePartDefinition {
                name: name.to_string(),
                part_name: part_name.to_string(),
            }),
        }
        self
    }

    /// Removes the part attached under `name`, if any.
    pub fn remove_part(&mut self, name: &str) -> &mut Self {
        self.definition.parts.retain(|p| p.name != name);
        self
    }

    pub fn build(self) -> ContentTypeDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_builder_keeps_name() {
        let mut builder = ContentPartDefinitionBuilder::new(ContentPartDefinition::new("HtmlBodyPart"));
        builder.attachable().with_description("Html body");
        let part = builder.build();

        assert_eq!(part.name, "HtmlBodyPart");
        assert!(part.attachable);
        assert_eq!(part.description, "Html body");
    }

    #[test]
    fn test_type_builder_replaces_part() {
        let mut article = ContentTypeDefinition::new("Article");
        article.parts.push(ContentTypePartDefinition {
            name: "TitlePart".to_string(),
            part_name: "TitlePart".to_string(),
        });
        article.parts.push(ContentTypePartDefinition {
            name: "BodyPart".to_string(),
            part_name: "BodyPart".to_string(),
        });

        let mut builder = ContentTypeDefinitionBuilder::new(article);
        builder.remove_part("BodyPart").with_part("HtmlBodyPart");
        let article = builder.build();

        let names: Vec<_> = article.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["TitlePart", "HtmlBodyPart"]);
        assert!(!article.references_part("BodyPart"));
        assert!(article.references_part("HtmlBodyPart"));
    }

    #[test]
    fn test_with_part_does_not_duplicate() {
        let mut builder = ContentTypeDefinitionBuilder::new(ContentTypeDefinition::new("Page"));
        builder.with_part("HtmlBodyPart").with_part("HtmlBodyPart");
        assert_eq!(builder.build().parts.len(), 1);
    }
}
