//! Snippet generators that turn a request into code for another tool.

use std::collections::BTreeMap;

use anyhow::anyhow;

use crate::domain::request::Request;

pub mod curl;
pub mod php;

pub trait CodeGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, request: &Request) -> String;
}

pub struct Registry {
    generators: BTreeMap<&'static str, Box<dyn CodeGenerator>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            generators: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register(curl::CurlGenerator);
        registry.register(php::PhpGenerator);
        registry
    }

    /// Replaces any generator already registered under the same name.
    pub fn register(&mut self, generator: impl CodeGenerator + 'static) {
        self.generators.insert(generator.name(), Box::new(generator));
    }

    /// Sorted by name.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.generators.keys().copied().collect()
    }

    pub fn generate(&self, language: &str, request: &Request) -> anyhow::Result<String> {
        let generator = self
            .generators
            .get(language)
            .ok_or_else(|| anyhow!("unsupported language: {}", language))?;
        Ok(generator.generate(request))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_defaults()
    }
}

/// Single-quotes for a POSIX shell.
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
