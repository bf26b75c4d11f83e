//! Tag resolution: decides whether an element's tag is an intrinsic string or
//! a value bound in the surrounding scope.

use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::{Span, SPAN};
use oxc_syntax::identifier::is_identifier_name;
use tracing::trace;

use crate::attributes::PropItem;
use crate::diagnostics::{CompilerError, SourceLocator, ERR_UNRESOLVED_TAG};
use crate::normalize::{member_path, NodeNormalizer};
use crate::options::ResolverConfig;
use crate::scope::ScopeQuery;

// ═══════════════════════════════════════════════════════════════════════════════
// DESCRIPTOR TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Runtime identity of a tag.
pub enum ResolvedTag<'a> {
    /// Rendered as the literal tag name.
    Intrinsic(String),
    /// `[name, reference]`: the name plus an expression for the bound value.
    Bound {
        name: String,
        reference: Expression<'a>,
    },
}

impl<'a> ResolvedTag<'a> {
    pub fn text(&self) -> &str {
        match self {
            ResolvedTag::Intrinsic(name) => name,
            ResolvedTag::Bound { name, .. } => name,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, ResolvedTag::Bound { .. })
    }

    pub fn into_expression(self, ast: AstBuilder<'a>) -> Expression<'a> {
        match self {
            ResolvedTag::Intrinsic(name) => string(ast, &name),
            ResolvedTag::Bound { name, reference } => {
                let mut elements = ast.vec();
                elements.push(ArrayExpressionElement::from(string(ast, &name)));
                elements.push(ArrayExpressionElement::from(reference));
                ast.expression_array(SPAN, elements)
            }
        }
    }
}

/// What the resolver produces for one opening element. The serializer reads
/// `tag` and `propstring`; `children` is only filled when a host emits the
/// descriptor itself through [`ElementDescriptor::into_expression`].
pub struct ElementDescriptor<'a> {
    pub tag: ResolvedTag<'a>,
    pub props: Vec<PropItem<'a>>,
    /// `name='value'` text of the literal attributes, in source order.
    pub propstring: String,
    pub children: Option<Vec<Expression<'a>>>,
}

impl<'a> ElementDescriptor<'a> {
    /// The `{tag, props, propstring, children}` object literal.
    pub fn into_expression(self, ast: AstBuilder<'a>) -> Expression<'a> {
        let props = if self.props.is_empty() {
            ast.expression_null_literal(SPAN)
        } else {
            let mut properties = ast.vec();
            for item in self.props {
                properties.push(item.into_property(ast));
            }
            ast.expression_object(SPAN, properties)
        };
        let children = match self.children {
            Some(children) if !children.is_empty() => {
                let mut elements = ast.vec();
                for child in children {
                    elements.push(ArrayExpressionElement::from(child));
                }
                ast.expression_array(SPAN, elements)
            }
            _ => ast.expression_null_literal(SPAN),
        };
        let propstring = string(ast, &self.propstring);
        let tag = self.tag.into_expression(ast);

        let mut properties = ast.vec();
        for (key, value) in [
            ("tag", tag),
            ("props", props),
            ("propstring", propstring),
            ("children", children),
        ] {
            properties.push(ast.object_property_kind_object_property(
                SPAN,
                PropertyKind::Init,
                PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, key))),
                value,
                false,
                false,
                false,
            ));
        }
        ast.expression_object(SPAN, properties)
    }
}

fn string<'a>(ast: AstBuilder<'a>, value: &str) -> Expression<'a> {
    let atom = ast.allocator.alloc_str(value);
    ast.expression_string_literal(SPAN, atom, None)
}

/// Attribute text for the rendered markup. Spreads have no textual form.
pub fn build_propstring(props: &[PropItem<'_>]) -> String {
    props
        .iter()
        .filter_map(|item| match item {
            PropItem::Attribute(attr) => Some(format!(
                "{}='{}'",
                attr.name,
                attr.literal_text().replace('\'', "&#39;")
            )),
            PropItem::Spread(_) => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Intrinsic,
    Bound,
    Missing,
}

/// Precedence: intrinsic when no builtins are configured and the name is
/// unbound, or when the name is a builtin; bound when it is in scope or
/// missing tags are tolerated; otherwise missing.
pub fn decide(config: &ResolverConfig, tag: &str, in_scope: bool) -> Resolution {
    if (!config.has_builtins() && !in_scope) || config.is_builtin(tag) {
        Resolution::Intrinsic
    } else if !config.throw_on_missing || in_scope {
        Resolution::Bound
    } else {
        Resolution::Missing
    }
}

pub struct TagResolver<'a> {
    ast: AstBuilder<'a>,
    normalizer: NodeNormalizer<'a>,
    config: ResolverConfig,
}

impl<'a> TagResolver<'a> {
    pub fn new(ast: AstBuilder<'a>, normalizer: NodeNormalizer<'a>, config: ResolverConfig) -> Self {
        Self {
            ast,
            normalizer,
            config,
        }
    }

    pub fn resolve(
        &self,
        name: &JSXElementName<'a>,
        props: Vec<PropItem<'a>>,
        scope: &dyn ScopeQuery,
        locator: &SourceLocator<'_>,
        span: Span,
    ) -> Result<ElementDescriptor<'a>, CompilerError> {
        let propstring = build_propstring(&props);
        let tag = self.resolve_tag(name, scope, locator, span)?;
        Ok(ElementDescriptor {
            tag,
            props,
            propstring,
            children: None,
        })
    }

    fn resolve_tag(
        &self,
        name: &JSXElementName<'a>,
        scope: &dyn ScopeQuery,
        locator: &SourceLocator<'_>,
        span: Span,
    ) -> Result<ResolvedTag<'a>, CompilerError> {
        let tag_text = NodeNormalizer::element_name_text(name);
        if !self.config.capture_scope {
            return Ok(ResolvedTag::Intrinsic(tag_text));
        }

        let (in_scope, reference) = match name {
            JSXElementName::MemberExpression(member) => {
                let path = member_path(member);
                let in_scope = scope.has_binding(&path[0]);
                (in_scope, self.normalizer.member_expression(member))
            }
            JSXElementName::IdentifierReference(_) => {
                let in_scope = scope.has_binding(&tag_text);
                (in_scope, self.ast.expression_identifier(SPAN, self.ast.allocator.alloc_str(&tag_text)))
            }
            JSXElementName::Identifier(id)
                if id.name.as_str() != "this" && is_identifier_name(id.name.as_str()) =>
            {
                let in_scope = scope.has_binding(&tag_text);
                (in_scope, self.ast.expression_identifier(SPAN, self.ast.allocator.alloc_str(&tag_text)))
            }
            // Namespaced, hyphenated and `this` tags are never looked up.
            _ => return Ok(ResolvedTag::Intrinsic(tag_text)),
        };

        let resolution = decide(&self.config, &tag_text, in_scope);
        trace!(tag = %tag_text, in_scope, ?resolution, "resolved tag");
        match resolution {
            Resolution::Intrinsic => Ok(ResolvedTag::Intrinsic(tag_text)),
            Resolution::Bound => Ok(ResolvedTag::Bound {
                name: tag_text,
                reference,
            }),
            Resolution::Missing => Err(locator
                .error(
                    ERR_UNRESOLVED_TAG,
                    &format!(
                        "Tag <{}> is not a built-in and is missed from the scope.",
                        tag_text
                    ),
                    span,
                )
                .with_hint(format!(
                    "Import or declare `{}`, or list it in `builtins`.",
                    tag_text
                ))),
        }
    }
}
