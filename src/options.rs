//! Options recognized by the `jsx-underscore` pass.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{CompilerError, ERR_OPTIONS};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Resolve capitalized and member-path tags against the lexical scope.
    #[serde(default)]
    pub capture_scope: bool,
    /// Tags that always stay intrinsic. Only read when `capture_scope` is on.
    #[serde(default)]
    pub builtins: Option<Vec<String>>,
    /// Abort the unit when a capturable tag is neither bound nor a builtin.
    #[serde(default = "default_true")]
    pub throw_on_missing: bool,
    /// Tag `{obj.prop}` containers with a `<%= obj.prop %>` placeholder so the
    /// member access is evaluated by the compiled template.
    #[serde(default = "default_true")]
    pub member_placeholders: bool,
    #[serde(default)]
    pub typescript: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            capture_scope: false,
            builtins: None,
            throw_on_missing: true,
            member_placeholders: true,
            typescript: false,
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(json).map_err(|e| {
            CompilerError::new(
                ERR_OPTIONS,
                &format!("Invalid compile options: {}", e),
                "<options>",
                e.line() as u32,
                e.column() as u32,
            )
        })
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            capture_scope: self.capture_scope,
            builtins: if self.capture_scope {
                self.builtins.clone()
            } else {
                None
            },
            throw_on_missing: self.throw_on_missing,
        }
    }
}

/// The immutable slice of [`CompileOptions`] the tag resolver branches on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub capture_scope: bool,
    pub builtins: Option<Vec<String>>,
    pub throw_on_missing: bool,
}

impl ResolverConfig {
    pub fn has_builtins(&self) -> bool {
        self.builtins.is_some()
    }

    pub fn is_builtin(&self, tag: &str) -> bool {
        self.builtins
            .as_ref()
            .is_some_and(|list| list.iter().any(|b| b == tag))
    }
}
