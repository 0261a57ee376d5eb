//! Import-alias rewriting.
//!
//! Rewrites `from '../../../src/…'` style imports into the alias form
//! `from '@/…'`. The opening quote is preserved so single- and double-quoted
//! imports both keep a matching closing quote.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::transform::{TextTransform, TransformKind, TransformOutcome};

/// A relative-prefix to alias substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRule {
    /// Relative path prefix to replace, e.g. `../../../src/`.
    #[serde(default = "default_relative_prefix")]
    pub relative_prefix: String,
    /// Alias that replaces it, e.g. `@/`.
    #[serde(default = "default_alias")]
    pub alias: String,
}

fn default_relative_prefix() -> String {
    "../../../src/".into()
}
fn default_alias() -> String {
    "@/".into()
}

impl Default for ImportRule {
    fn default() -> Self {
        Self {
            relative_prefix: default_relative_prefix(),
            alias: default_alias(),
        }
    }
}

impl ImportRule {
    /// Check the rule can be applied safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relative_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "imports.relative_prefix".into(),
                detail: "relative prefix must not be empty".into(),
            });
        }
        if self.alias.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "imports.alias".into(),
                detail: "alias must not be empty".into(),
            });
        }
        if self.alias == self.relative_prefix {
            return Err(ConfigError::InvalidValue {
                field: "imports.alias".into(),
                detail: "alias must differ from the relative prefix".into(),
            });
        }
        Ok(())
    }
}

/// Rewritten document plus the number of imports touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRewrite {
    pub text: String,
    pub replacements: usize,
}

/// Applies one [`ImportRule`] to whole documents.
#[derive(Debug, Clone)]
pub struct ImportRewriter {
    rule: ImportRule,
    pattern: Regex,
    replacement: String,
}

impl ImportRewriter {
    pub fn new(rule: ImportRule) -> Result<Self, ConfigError> {
        rule.validate()?;

        let source = format!(
            r#"from (?P<quote>['"]){}"#,
            regex_lite::escape(&rule.relative_prefix)
        );
        let pattern = Regex::new(&source).map_err(|e| ConfigError::InvalidValue {
            field: "imports.relative_prefix".into(),
            detail: e.to_string(),
        })?;
        // `$` is the only character the replacement syntax treats specially.
        let replacement = format!("from ${{quote}}{}", rule.alias.replace('$', "$$"));

        Ok(Self {
            rule,
            pattern,
            replacement,
        })
    }

    pub fn rule(&self) -> &ImportRule {
        &self.rule
    }

    /// Rewrite every matching import in `document`.
    pub fn rewrite(&self, document: &str) -> ImportRewrite {
        let replacements = self.pattern.find_iter(document).count();
        if replacements == 0 {
            return ImportRewrite {
                text: document.to_string(),
                replacements: 0,
            };
        }

        let text = self
            .pattern
            .replace_all(document, self.replacement.as_str())
            .into_owned();
        debug!(replacements, "rewrote relative imports");

        ImportRewrite { text, replacements }
    }
}

impl TextTransform for ImportRewriter {
    fn kind(&self) -> TransformKind {
        TransformKind::Imports
    }

    fn apply(&self, input: &str) -> TransformOutcome {
        let rewrite = self.rewrite(input);
        TransformOutcome {
            text: rewrite.text,
            changes: rewrite.replacements,
            remaining: 0,
        }
    }
}
