//! Element serialization and the outermost-boundary algorithm.
//!
//! Every element is flattened into markup text on exit. Only the element that
//! starts earliest among the currently open ones (the outermost of its
//! cluster) is compiled into a template function; all others return their
//! text as a string literal that the enclosing element inlines.

use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::{Span, SPAN};
use tracing::{debug, trace};

use crate::attributes::format_number;
use crate::diagnostics::{CompilerError, SourceLocator};
use crate::resolver::ElementDescriptor;
use crate::template::TemplateAdapter;

// ═══════════════════════════════════════════════════════════════════════════════
// BOUNDARY TRACKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Smallest start offset among the elements currently open in one unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTracker {
    low: Option<u32>,
}

impl BoundaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn low(&self) -> Option<u32> {
        self.low
    }

    pub fn enter(&mut self, start: u32) {
        match self.low {
            Some(low) if low <= start => {}
            _ => self.low = Some(start),
        }
    }

    /// True when an element starting at `start` sits inside the current
    /// boundary and must not be compiled on its own.
    pub fn is_interior(&self, start: u32) -> bool {
        self.low.is_some_and(|low| start > low)
    }

    pub fn reset(&mut self) {
        self.low = None;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHILD CONTRIBUTIONS
// ═══════════════════════════════════════════════════════════════════════════════

pub enum ChildContribution<'a> {
    /// Inline markup text.
    Text(String),
    /// A literal that renders nothing (`null`, `false`, `0`, `""`).
    Inert,
    /// A sub-expression with no literal text. A placeholder, when present, is
    /// inlined in its place.
    Dynamic {
        expression: Expression<'a>,
        placeholder: Option<String>,
    },
}

impl<'a> ChildContribution<'a> {
    /// Classify an already lowered child expression.
    pub fn from_expression(expression: Expression<'a>, placeholder: Option<String>) -> Self {
        if placeholder.is_some() {
            return ChildContribution::Dynamic {
                expression,
                placeholder,
            };
        }
        match &expression {
            Expression::StringLiteral(s) if s.value.as_str().is_empty() => ChildContribution::Inert,
            Expression::StringLiteral(s) => ChildContribution::Text(s.value.to_string()),
            Expression::NumericLiteral(n) if n.value == 0.0 || n.value.is_nan() => {
                ChildContribution::Inert
            }
            Expression::NumericLiteral(n) => ChildContribution::Text(format_number(n.value)),
            Expression::BooleanLiteral(b) if b.value => ChildContribution::Text("true".to_string()),
            Expression::BooleanLiteral(_) | Expression::NullLiteral(_) => ChildContribution::Inert,
            _ => ChildContribution::Dynamic {
                expression,
                placeholder: None,
            },
        }
    }
}

/// Whitespace cleanup for raw JSX text: lines are trimmed where they meet a
/// line break, blank lines are dropped and the rest joined by single spaces.
pub fn clean_jsx_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'));

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let is_first = i == 0;
        let is_last = i == lines.len() - 1;
        let is_last_non_empty = Some(i) == last_non_empty;

        let mut trimmed = line.replace('\t', " ");
        if !is_first {
            trimmed = trimmed.trim_start_matches(' ').to_string();
        }
        if !is_last {
            trimmed = trimmed.trim_end_matches(' ').to_string();
        }
        if !trimmed.is_empty() {
            if !is_last_non_empty {
                trimmed.push(' ');
            }
            out.push_str(&trimmed);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Text contributions concatenated, dynamic expressions split off.
pub fn split_children<'a>(children: Vec<ChildContribution<'a>>) -> (String, Vec<Expression<'a>>) {
    let mut text = String::new();
    let mut retained = Vec::new();
    for child in children {
        match child {
            ChildContribution::Text(t) => text.push_str(&t),
            ChildContribution::Inert => {}
            ChildContribution::Dynamic {
                expression,
                placeholder,
            } => {
                if let Some(p) = placeholder {
                    text.push_str(&p);
                }
                retained.push(expression);
            }
        }
    }
    (text, retained)
}

/// `<tag propstring>children</tag>`.
pub fn compose_fragment(tag: &str, propstring: &str, children_text: &str) -> String {
    let mut out = String::with_capacity(tag.len() * 2 + propstring.len() + children_text.len() + 6);
    out.push('<');
    out.push_str(tag);
    if !propstring.is_empty() {
        out.push(' ');
        out.push_str(propstring);
    }
    out.push('>');
    out.push_str(children_text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ElementSerializer<'a> {
    ast: AstBuilder<'a>,
    tracker: BoundaryTracker,
    adapter: TemplateAdapter<'a>,
    compiled: usize,
}

impl<'a> ElementSerializer<'a> {
    pub fn new(ast: AstBuilder<'a>) -> Self {
        Self {
            ast,
            tracker: BoundaryTracker::new(),
            adapter: TemplateAdapter::new(ast.allocator),
            compiled: 0,
        }
    }

    pub fn tracker(&self) -> &BoundaryTracker {
        &self.tracker
    }

    /// Number of outermost elements compiled into functions so far.
    pub fn compiled(&self) -> usize {
        self.compiled
    }

    pub fn enter(&mut self, start: u32) {
        self.tracker.enter(start);
    }

    /// Close an element. Dynamic children without a placeholder render no
    /// markup; the replacement is the element's text or its compiled template.
    pub fn exit_element(
        &mut self,
        descriptor: &ElementDescriptor<'a>,
        children: Vec<ChildContribution<'a>>,
        span: Span,
        locator: &SourceLocator<'_>,
    ) -> Result<Expression<'a>, CompilerError> {
        let (children_text, _) = split_children(children);
        let fragment = compose_fragment(descriptor.tag.text(), &descriptor.propstring, &children_text);
        self.finish(fragment, span, locator)
    }

    /// Fragments (`<>...</>`) render their children only.
    pub fn exit_fragment(
        &mut self,
        children: Vec<ChildContribution<'a>>,
        span: Span,
        locator: &SourceLocator<'_>,
    ) -> Result<Expression<'a>, CompilerError> {
        let (children_text, _) = split_children(children);
        self.finish(children_text, span, locator)
    }

    fn finish(
        &mut self,
        fragment: String,
        span: Span,
        locator: &SourceLocator<'_>,
    ) -> Result<Expression<'a>, CompilerError> {
        if self.tracker.is_interior(span.start) {
            trace!(start = span.start, fragment = %fragment, "interior element");
            let atom = self.ast.allocator.alloc_str(&fragment);
            return Ok(self.ast.expression_string_literal(SPAN, atom, None));
        }

        self.tracker.reset();
        let replacement = self.adapter.compile(&fragment, locator, span)?;
        self.compiled += 1;
        debug!(
            file = locator.file(),
            start = span.start,
            fragment = %fragment,
            "compiled outermost element"
        );
        Ok(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;

    #[test]
    fn test_tracker_keeps_lowest_start() {
        let mut tracker = BoundaryTracker::new();
        assert!(!tracker.is_interior(0));
        tracker.enter(10);
        tracker.enter(14);
        tracker.enter(12);
        assert_eq!(tracker.low(), Some(10));
        assert!(tracker.is_interior(14));
        assert!(!tracker.is_interior(10));
        tracker.reset();
        assert_eq!(tracker.low(), None);
    }

    #[test]
    fn test_clean_jsx_text() {
        assert_eq!(clean_jsx_text("Hello").as_deref(), Some("Hello"));
        assert_eq!(clean_jsx_text("  a  b  ").as_deref(), Some("  a  b  "));
        assert_eq!(clean_jsx_text("\n    Hello\n    world\n").as_deref(), Some("Hello world"));
        assert_eq!(clean_jsx_text("\n   \n\t\n"), None);
    }

    #[test]
    fn test_split_children_inlines_placeholders() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let children = vec![
            ChildContribution::Text("a".to_string()),
            ChildContribution::from_expression(ast.expression_null_literal(SPAN), None),
            ChildContribution::from_expression(
                ast.expression_identifier(SPAN, "user"),
                Some("<%= user.name %>".to_string()),
            ),
            ChildContribution::from_expression(ast.expression_identifier(SPAN, "items"), None),
        ];
        let (text, retained) = split_children(children);
        assert_eq!(text, "a<%= user.name %>");
        assert_eq!(retained.len(), 2);
    }

    #[test]
    fn test_compose_fragment() {
        assert_eq!(compose_fragment("p", "", "x"), "<p>x</p>");
        assert_eq!(compose_fragment("a", "href='/'", ""), "<a href='/'></a>");
    }

    #[test]
    fn test_interior_element_returns_text() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let locator = SourceLocator::new("s.jsx", "<a><b></b></a>");
        let mut serializer = ElementSerializer::new(ast);

        serializer.enter(0);
        serializer.enter(3);
        let inner = serializer
            .exit_fragment(vec![ChildContribution::Text("b".to_string())], Span::new(3, 10), &locator)
            .unwrap();
        let Expression::StringLiteral(text) = &inner else {
            panic!("interior element should become a string literal");
        };
        assert_eq!(text.value.as_str(), "b");
        assert_eq!(serializer.compiled(), 0);

        let outer = serializer
            .exit_fragment(
                vec![ChildContribution::from_expression(inner, None)],
                Span::new(0, 14),
                &locator,
            )
            .unwrap();
        assert!(matches!(outer, Expression::FunctionExpression(_)));
        assert_eq!(serializer.compiled(), 1);
        assert_eq!(serializer.tracker().low(), None);
    }
}
