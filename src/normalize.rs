//! Markup leaf nodes rewritten into plain expression nodes.

use oxc_allocator::CloneIn;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::SPAN;
use oxc_syntax::identifier::is_identifier_name;

/// The unwrapped content of a `{...}` container.
pub struct ContainerValue<'a> {
    pub expression: Expression<'a>,
    /// `<%= obj.prop %>` text attached to static member accesses when the
    /// placeholder policy is on.
    pub placeholder: Option<String>,
}

#[derive(Clone, Copy)]
pub struct NodeNormalizer<'a> {
    ast: AstBuilder<'a>,
    member_placeholders: bool,
}

impl<'a> NodeNormalizer<'a> {
    pub fn new(ast: AstBuilder<'a>, member_placeholders: bool) -> Self {
        Self {
            ast,
            member_placeholders,
        }
    }

    pub fn string(&self, value: &str) -> Expression<'a> {
        let atom = self.ast.allocator.alloc_str(value);
        self.ast.expression_string_literal(SPAN, atom, None)
    }

    /// `this`, a plain identifier, or a string literal for names such as
    /// `data-id` that are not valid identifiers.
    pub fn identifier(&self, name: &str) -> Expression<'a> {
        if name == "this" {
            self.ast.expression_this(SPAN)
        } else if is_identifier_name(name) {
            let atom = self.ast.allocator.alloc_str(name);
            self.ast.expression_identifier(SPAN, atom)
        } else {
            self.string(name)
        }
    }

    pub fn namespaced_name(&self, name: &JSXNamespacedName<'a>) -> Expression<'a> {
        self.string(&format!("{}:{}", name.namespace.name, name.name.name))
    }

    pub fn member_expression(&self, member: &JSXMemberExpression<'a>) -> Expression<'a> {
        let object = match &member.object {
            JSXMemberExpressionObject::IdentifierReference(id) => self.identifier(id.name.as_str()),
            JSXMemberExpressionObject::MemberExpression(inner) => self.member_expression(inner),
            JSXMemberExpressionObject::ThisExpression(_) => self.ast.expression_this(SPAN),
        };
        let property = member.property.name.as_str();
        if is_identifier_name(property) {
            Expression::from(self.ast.member_expression_static(
                member.span,
                object,
                self.ast.identifier_name(SPAN, member.property.name.clone()),
                false,
            ))
        } else {
            // Literal property parts are computed accesses.
            Expression::from(self.ast.member_expression_computed(
                member.span,
                object,
                self.string(property),
                false,
            ))
        }
    }

    pub fn empty_expression(&self) -> Expression<'a> {
        self.ast.expression_null_literal(SPAN)
    }

    pub fn expression_container(&self, container: &JSXExpressionContainer<'a>) -> ContainerValue<'a> {
        match container.expression.as_expression() {
            Some(expr) => {
                let placeholder = if self.member_placeholders {
                    static_member_path(expr).map(|path| format!("<%= {} %>", path))
                } else {
                    None
                };
                ContainerValue {
                    expression: expr.clone_in(self.ast.allocator),
                    placeholder,
                }
            }
            None => ContainerValue {
                expression: self.empty_expression(),
                placeholder: None,
            },
        }
    }

    /// The name of a tag or attribute written as plain text.
    pub fn element_name_text(name: &JSXElementName<'a>) -> String {
        match name {
            JSXElementName::Identifier(id) => id.name.to_string(),
            JSXElementName::IdentifierReference(id) => id.name.to_string(),
            JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
            JSXElementName::MemberExpression(me) => member_path(me).join("."),
            JSXElementName::ThisExpression(_) => "this".to_string(),
        }
    }
}

/// Segments of `a.b.c`, leftmost first.
pub fn member_path(member: &JSXMemberExpression<'_>) -> Vec<String> {
    let mut path = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => vec![id.name.to_string()],
        JSXMemberExpressionObject::MemberExpression(inner) => member_path(inner),
        JSXMemberExpressionObject::ThisExpression(_) => vec!["this".to_string()],
    };
    path.push(member.property.name.to_string());
    path
}

/// Dotted text of a non-computed member chain rooted at an identifier or `this`.
pub fn static_member_path(expr: &Expression<'_>) -> Option<String> {
    match expr {
        Expression::StaticMemberExpression(member) => {
            let object = match &member.object {
                Expression::Identifier(id) => id.name.to_string(),
                Expression::ThisExpression(_) => "this".to_string(),
                inner @ Expression::StaticMemberExpression(_) => static_member_path(inner)?,
                _ => return None,
            };
            Some(format!("{}.{}", object, member.property.name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn with_element<F>(code: &str, check: F)
    where
        F: for<'a> FnOnce(&NodeNormalizer<'a>, &JSXElement<'a>),
    {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_jsx(true);
        let expr = Parser::new(&allocator, code, source_type)
            .parse_expression()
            .expect("fixture should parse");
        let normalizer = NodeNormalizer::new(AstBuilder::new(&allocator), true);
        match &expr {
            Expression::JSXElement(el) => check(&normalizer, el),
            _ => panic!("expected a JSX element in {}", code),
        }
    }

    #[test]
    fn test_identifier_kinds() {
        let allocator = Allocator::default();
        let normalizer = NodeNormalizer::new(AstBuilder::new(&allocator), true);
        assert!(matches!(normalizer.identifier("this"), Expression::ThisExpression(_)));
        assert!(matches!(normalizer.identifier("Foo"), Expression::Identifier(_)));
        match normalizer.identifier("data-id") {
            Expression::StringLiteral(s) => assert_eq!(s.value.as_str(), "data-id"),
            _ => panic!("hyphenated names should become string literals"),
        }
    }

    #[test]
    fn test_member_tag_becomes_member_access() {
        with_element("<ui.forms.Input />", |normalizer, el| {
            let JSXElementName::MemberExpression(me) = &el.opening_element.name else {
                panic!("expected member tag");
            };
            assert_eq!(member_path(me), vec!["ui", "forms", "Input"]);
            let expr = normalizer.member_expression(me);
            assert_eq!(static_member_path(&expr).as_deref(), Some("ui.forms.Input"));
        });
    }

    #[test]
    fn test_namespaced_tag_text() {
        with_element("<svg:rect />", |normalizer, el| {
            let JSXElementName::NamespacedName(ns) = &el.opening_element.name else {
                panic!("expected namespaced tag");
            };
            match normalizer.namespaced_name(ns) {
                Expression::StringLiteral(s) => assert_eq!(s.value.as_str(), "svg:rect"),
                _ => panic!("namespaced names should become string literals"),
            }
        });
    }

    #[test]
    fn test_container_placeholder_and_empty() {
        with_element("<p>{user.name}{/* note */}{count}</p>", |normalizer, el| {
            let containers: Vec<_> = el
                .children
                .iter()
                .filter_map(|child| match child {
                    JSXChild::ExpressionContainer(c) => Some(normalizer.expression_container(c)),
                    _ => None,
                })
                .collect();
            assert_eq!(containers.len(), 3);
            assert_eq!(containers[0].placeholder.as_deref(), Some("<%= user.name %>"));
            assert!(matches!(containers[1].expression, Expression::NullLiteral(_)));
            assert!(containers[2].placeholder.is_none());
        });
    }
}
