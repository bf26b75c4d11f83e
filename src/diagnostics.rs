#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_span::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SYNTAX: &str = "JSX-ERR-SYNTAX-001";
pub const ERR_UNRESOLVED_TAG: &str = "JSX-ERR-SCOPE-001";
pub const ERR_TEMPLATE_SOURCE: &str = "JSX-ERR-TEMPLATE-001";
pub const ERR_OPTIONS: &str = "JSX-ERR-OPTIONS-001";

fn error_type(code: &str) -> &'static str {
    match code {
        ERR_SYNTAX => "SYNTAX_ERROR",
        ERR_UNRESOLVED_TAG => "UNRESOLVED_TAG",
        ERR_TEMPLATE_SOURCE => "GENERATED_SOURCE_ERROR",
        ERR_OPTIONS => "INVALID_OPTIONS",
        _ => "COMPILER_ERROR",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A fatal error for one compilation unit. Nothing is retried: the unit either
/// compiles completely or yields exactly one of these.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message} ({file}:{line}:{column})")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: error_type(code).to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
            context,
            hints,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE LOCATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Binds errors to a position in the unit being compiled.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocator<'s> {
    file: &'s str,
    source: &'s str,
}

impl<'s> SourceLocator<'s> {
    pub fn new(file: &'s str, source: &'s str) -> Self {
        Self { file, source }
    }

    pub fn file(&self) -> &'s str {
        self.file
    }

    /// 1-based line and column of a byte offset. Columns count characters.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = (offset as usize).min(self.source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (idx, ch) in self.source.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = idx + 1;
            }
        }
        let column = self
            .source
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line, column as u32 + 1)
    }

    pub fn error(&self, code: &str, message: &str, span: Span) -> CompilerError {
        let (line, column) = self.line_col(span.start);
        CompilerError::new(code, message, self.file, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_counts_from_one() {
        let locator = SourceLocator::new("a.jsx", "let a;\nlet b = <div/>;");
        assert_eq!(locator.line_col(0), (1, 1));
        assert_eq!(locator.line_col(15), (2, 9));
    }

    #[test]
    fn test_error_display_carries_code_and_location() {
        let locator = SourceLocator::new("view.jsx", "\n  <Foo/>");
        let err = locator.error(ERR_UNRESOLVED_TAG, "boom", Span::new(3, 9));
        assert_eq!(err.error_type, "UNRESOLVED_TAG");
        assert_eq!(err.to_string(), "[JSX-ERR-SCOPE-001] boom (view.jsx:2:3)");
    }
}
