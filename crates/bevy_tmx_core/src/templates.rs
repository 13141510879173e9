//! Component-template lookup by type name.

use bevy::{log::warn, platform::collections::HashMap};

/// The host's prefab database: type name → component template.
pub trait ComponentTemplates {
    type Template: Clone;

    fn lookup(&self, type_name: &str) -> Option<Self::Template>;
}

/// No templates at all; every typed object becomes a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl ComponentTemplates for NoTemplates {
    type Template = ();

    fn lookup(&self, _type_name: &str) -> Option<()> {
        None
    }
}

impl<T: Clone> ComponentTemplates for HashMap<String, T> {
    type Template = T;

    fn lookup(&self, type_name: &str) -> Option<T> {
        self.get(type_name).cloned()
    }
}

/// Non-fatal problems found while converting a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// A declared type name has no template; a placeholder was emitted instead.
    MissingTemplate { type_name: String },
}

/// Template lookups for a single conversion, hits and misses both remembered.
///
/// Each missing name is reported once, however many objects use it.
pub struct TemplateCache<'a, T: ComponentTemplates> {
    templates: &'a T,
    entries: HashMap<String, Option<T::Template>>,
    warnings: Vec<ConversionWarning>,
}

impl<'a, T: ComponentTemplates> TemplateCache<'a, T> {
    pub fn new(templates: &'a T) -> Self {
        Self {
            templates,
            entries: HashMap::default(),
            warnings: Vec::new(),
        }
    }

    pub fn lookup(&mut self, type_name: &str) -> Option<T::Template> {
        if let Some(entry) = self.entries.get(type_name) {
            return entry.clone();
        }

        let entry = self.templates.lookup(type_name);
        if entry.is_none() {
            warn!("No component template for type '{type_name}', using a placeholder");
            self.warnings.push(ConversionWarning::MissingTemplate {
                type_name: type_name.to_string(),
            });
        }
        self.entries.insert(type_name.to_string(), entry.clone());
        entry
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }
}
