//! Markup attributes turned into object properties.

use std::borrow::Cow;

use lazy_static::lazy_static;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::{Span, SPAN};
use oxc_syntax::identifier::is_identifier_name;
use regex::Regex;

lazy_static! {
    /// A line break followed by the indentation of a hand-wrapped attribute.
    static ref WRAPPED_LINE_RE: Regex = Regex::new(r"\n\s+").unwrap();
}

/// Collapse every newline-plus-indentation run to a single space.
pub fn collapse_wrapped_lines(value: &str) -> Cow<'_, str> {
    WRAPPED_LINE_RE.replace_all(value, " ")
}

/// One attribute after normalization, ready to become an `init` property.
pub struct BuiltAttribute<'a> {
    pub name: String,
    pub value: Expression<'a>,
    pub placeholder: Option<String>,
    pub span: Span,
}

impl<'a> BuiltAttribute<'a> {
    /// Text used for this attribute in a propstring. Non-literal values have
    /// no faithful rendering and come out as `undefined`, unless a template
    /// placeholder was attached.
    pub fn literal_text(&self) -> String {
        if let Some(placeholder) = &self.placeholder {
            return placeholder.clone();
        }
        match &self.value {
            Expression::StringLiteral(s) => s.value.to_string(),
            Expression::BooleanLiteral(b) => b.value.to_string(),
            Expression::NullLiteral(_) => "null".to_string(),
            Expression::NumericLiteral(n) => format_number(n.value),
            _ => "undefined".to_string(),
        }
    }

    pub fn into_property(self, ast: AstBuilder<'a>) -> ObjectPropertyKind<'a> {
        let name = ast.allocator.alloc_str(&self.name);
        let key = if is_identifier_name(name) {
            PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, name)))
        } else {
            PropertyKey::StringLiteral(ast.alloc(ast.string_literal(SPAN, name, None)))
        };
        ast.object_property_kind_object_property(
            self.span,
            PropertyKind::Init,
            key,
            self.value,
            false,
            false,
            false,
        )
    }
}

/// A prop list entry: a named attribute or a `{...spread}`.
pub enum PropItem<'a> {
    Attribute(BuiltAttribute<'a>),
    Spread(Expression<'a>),
}

impl<'a> PropItem<'a> {
    pub fn into_property(self, ast: AstBuilder<'a>) -> ObjectPropertyKind<'a> {
        match self {
            PropItem::Attribute(attr) => attr.into_property(ast),
            PropItem::Spread(expr) => ast.object_property_kind_spread_property(SPAN, expr),
        }
    }
}

#[derive(Clone, Copy)]
pub struct AttributeBuilder<'a> {
    ast: AstBuilder<'a>,
}

impl<'a> AttributeBuilder<'a> {
    pub fn new(ast: AstBuilder<'a>) -> Self {
        Self { ast }
    }

    pub fn name_text(name: &JSXAttributeName<'a>) -> String {
        match name {
            JSXAttributeName::Identifier(id) => id.name.to_string(),
            JSXAttributeName::NamespacedName(ns) => {
                format!("{}:{}", ns.namespace.name, ns.name.name)
            }
        }
    }

    /// A string attribute value, with wrapped lines collapsed.
    pub fn text_value(&self, raw: &str) -> Expression<'a> {
        let text = collapse_wrapped_lines(raw);
        let atom = self.ast.allocator.alloc_str(&text);
        self.ast.expression_string_literal(SPAN, atom, None)
    }

    /// A valueless attribute is boolean `true`.
    pub fn build(
        &self,
        name: String,
        value: Option<Expression<'a>>,
        placeholder: Option<String>,
        span: Span,
    ) -> BuiltAttribute<'a> {
        let value = value.unwrap_or_else(|| self.ast.expression_boolean_literal(SPAN, true));
        BuiltAttribute {
            name,
            value,
            placeholder,
            span,
        }
    }
}

/// Integral values below 1e21 print without exponent or fraction, as
/// JavaScript's `String(n)` does.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
