//! Template compilation for outermost elements.
//!
//! A finished markup fragment is turned into micro-template source in the
//! `_.template` style (`<%= expr %>` interpolations, one named data variable),
//! then re-parsed as plain JavaScript to recover a function node.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::Expression;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};
use regex::Regex;

use crate::diagnostics::{CompilerError, SourceLocator, ERR_TEMPLATE_SOURCE};

/// Name of the single parameter the compiled template reads its data from.
pub const TEMPLATE_VARIABLE: &str = "data";

/// Name given to the generated function before it is re-parsed.
const SYNTHETIC_NAME: &str = "tmpl";

lazy_static! {
    static ref INTERPOLATE_RE: Regex = Regex::new(r"(?s)<%=(.+?)%>").unwrap();
    static ref LINE_BREAK_RE: Regex = Regex::new(r"\r\n|\n|\r").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// MICRO-TEMPLATE SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

pub struct MicroTemplate;

impl MicroTemplate {
    /// Function source rendering `text`, with every `<%= expr %>` evaluated
    /// against `variable`.
    pub fn compile(text: &str, variable: &str) -> String {
        let mut body = String::from("__p+='");
        let mut index = 0;
        for caps in INTERPOLATE_RE.captures_iter(text) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            body.push_str(&escape_text(&text[index..whole.start()]));
            body.push_str("'+\n((__t=(");
            body.push_str(expr.as_str());
            body.push_str("))==null?'':__t)+\n'");
            index = whole.end();
        }
        body.push_str(&escape_text(&text[index..]));
        body.push_str("';\n");

        format!(
            "function({variable}){{\nvar __t,__p='';\n{body}return __p;\n}}",
            variable = variable,
            body = body
        )
    }
}

/// Escape literal template text for a single-quoted JavaScript string.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADAPTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Turns a markup fragment into an anonymous function expression allocated in
/// the unit's arena.
pub struct TemplateAdapter<'a> {
    allocator: &'a Allocator,
}

impl<'a> TemplateAdapter<'a> {
    pub fn new(allocator: &'a Allocator) -> Self {
        Self { allocator }
    }

    /// Generated source for a fragment, single-line and named for re-parsing.
    pub fn generate_source(&self, fragment: &str) -> String {
        let source = MicroTemplate::compile(fragment, TEMPLATE_VARIABLE);
        let source = LINE_BREAK_RE.replace_all(&source, "");
        source.replacen("function", &format!("function {}", SYNTHETIC_NAME), 1)
    }

    pub fn compile(
        &self,
        fragment: &str,
        locator: &SourceLocator<'_>,
        span: Span,
    ) -> Result<Expression<'a>, CompilerError> {
        let generated = self.generate_source(fragment);
        let source_text: &'a str = self.allocator.alloc_str(&generated);

        let parsed = Parser::new(self.allocator, source_text, SourceType::default())
            .parse_expression()
            .map_err(|errors| {
                locator
                    .error(
                        ERR_TEMPLATE_SOURCE,
                        &format!(
                            "Generated template source could not be parsed: {:?}",
                            errors
                        ),
                        span,
                    )
                    .with_context(generated.clone())
                    .with_hint("Check `<%= %>` interpolations in attribute values and text.")
            })?;

        match parsed {
            Expression::FunctionExpression(mut func) => {
                func.id = None;
                Ok(Expression::FunctionExpression(func))
            }
            _ => Err(locator
                .error(
                    ERR_TEMPLATE_SOURCE,
                    "Generated template source is not a function expression.",
                    span,
                )
                .with_context(generated)),
        }
    }
}
