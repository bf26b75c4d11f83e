//! The `jsx-underscore` pass: lowers every markup cluster in a program into a
//! compiled template function.

use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::{
    walk_arrow_function_expression, walk_block_statement, walk_catch_clause, walk_class,
    walk_expression, walk_for_in_statement, walk_for_of_statement, walk_for_statement,
    walk_function, walk_program,
};
use oxc_ast_visit::VisitMut;
use oxc_syntax::scope::ScopeFlags;
use std::collections::HashSet;
use tracing::warn;

use crate::attributes::{AttributeBuilder, PropItem};
use crate::diagnostics::{CompilerError, SourceLocator};
use crate::normalize::{ContainerValue, NodeNormalizer};
use crate::options::CompileOptions;
use crate::resolver::TagResolver;
use crate::scope::{
    arrow_bindings, class_bindings, collect_pattern, declaration_bindings, function_bindings,
    scope_bindings, ScopeStack,
};
use crate::serializer::{clean_jsx_text, ChildContribution, ElementSerializer};

pub struct JsxTemplatePass<'a, 's> {
    ast: AstBuilder<'a>,
    normalizer: NodeNormalizer<'a>,
    attributes: AttributeBuilder<'a>,
    resolver: TagResolver<'a>,
    serializer: ElementSerializer<'a>,
    scopes: ScopeStack,
    locator: SourceLocator<'s>,
    error: Option<CompilerError>,
}

impl<'a, 's> JsxTemplatePass<'a, 's> {
    pub const NAME: &'static str = "jsx-underscore";

    pub fn new(allocator: &'a Allocator, options: &CompileOptions, locator: SourceLocator<'s>) -> Self {
        let ast = AstBuilder::new(allocator);
        let normalizer = NodeNormalizer::new(ast, options.member_placeholders);
        Self {
            ast,
            normalizer,
            attributes: AttributeBuilder::new(ast),
            resolver: TagResolver::new(ast, normalizer, options.resolver_config()),
            serializer: ElementSerializer::new(ast),
            scopes: ScopeStack::new(),
            locator,
            error: None,
        }
    }

    /// Seed an outer scope, for hosts compiling a fragment of a larger unit.
    pub fn with_bindings(mut self, bindings: HashSet<String>) -> Self {
        self.scopes.push(bindings);
        self
    }

    /// Number of outermost elements compiled, or the error that aborted the unit.
    pub fn finish(self) -> Result<usize, CompilerError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.serializer.compiled()),
        }
    }

    fn visit_nested(&mut self, expr: &mut Expression<'a>) -> Result<(), CompilerError> {
        self.visit_expression(expr);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lower_container(
        &mut self,
        container: &JSXExpressionContainer<'a>,
    ) -> Result<ContainerValue<'a>, CompilerError> {
        let mut value = self.normalizer.expression_container(container);
        self.visit_nested(&mut value.expression)?;
        Ok(value)
    }

    fn lower_element(&mut self, element: &JSXElement<'a>) -> Result<Expression<'a>, CompilerError> {
        self.serializer.enter(element.span.start);

        let opening = &element.opening_element;
        let props = self.build_props(&opening.attributes)?;
        let descriptor =
            self.resolver
                .resolve(&opening.name, props, &self.scopes, &self.locator, opening.span)?;

        let children = self.lower_children(&element.children)?;
        self.serializer
            .exit_element(&descriptor, children, element.span, &self.locator)
    }

    fn lower_fragment(&mut self, fragment: &JSXFragment<'a>) -> Result<Expression<'a>, CompilerError> {
        self.serializer.enter(fragment.span.start);
        let children = self.lower_children(&fragment.children)?;
        self.serializer
            .exit_fragment(children, fragment.span, &self.locator)
    }

    fn build_props(
        &mut self,
        attributes: &[JSXAttributeItem<'a>],
    ) -> Result<Vec<PropItem<'a>>, CompilerError> {
        let mut props = Vec::with_capacity(attributes.len());
        for item in attributes {
            match item {
                JSXAttributeItem::Attribute(attr) => {
                    let name = AttributeBuilder::name_text(&attr.name);
                    let (value, placeholder) = match &attr.value {
                        None => (None, None),
                        Some(JSXAttributeValue::StringLiteral(s)) => {
                            (Some(self.attributes.text_value(s.value.as_str())), None)
                        }
                        Some(JSXAttributeValue::ExpressionContainer(container)) => {
                            let value = self.lower_container(container)?;
                            (Some(value.expression), value.placeholder)
                        }
                        Some(JSXAttributeValue::Element(el)) => (Some(self.lower_element(el)?), None),
                        Some(JSXAttributeValue::Fragment(frag)) => {
                            (Some(self.lower_fragment(frag)?), None)
                        }
                    };
                    props.push(PropItem::Attribute(
                        self.attributes.build(name, value, placeholder, attr.span),
                    ));
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    let mut argument = spread.argument.clone_in(self.ast.allocator);
                    self.visit_nested(&mut argument)?;
                    props.push(PropItem::Spread(argument));
                }
            }
        }
        Ok(props)
    }

    fn lower_children(
        &mut self,
        children: &[JSXChild<'a>],
    ) -> Result<Vec<ChildContribution<'a>>, CompilerError> {
        let mut contributions = Vec::with_capacity(children.len());
        for child in children {
            let contribution = match child {
                JSXChild::Text(text) => match clean_jsx_text(text.value.as_str()) {
                    Some(cleaned) => ChildContribution::Text(cleaned),
                    None => continue,
                },
                JSXChild::Element(el) => {
                    ChildContribution::from_expression(self.lower_element(el)?, None)
                }
                JSXChild::Fragment(frag) => {
                    ChildContribution::from_expression(self.lower_fragment(frag)?, None)
                }
                JSXChild::ExpressionContainer(container) => {
                    let value = self.lower_container(container)?;
                    ChildContribution::from_expression(value.expression, value.placeholder)
                }
                JSXChild::Spread(spread) => {
                    let mut expression = spread.expression.clone_in(self.ast.allocator);
                    self.visit_nested(&mut expression)?;
                    ChildContribution::Dynamic {
                        expression,
                        placeholder: None,
                    }
                }
            };
            contributions.push(contribution);
        }
        Ok(contributions)
    }
}

impl<'a> VisitMut<'a> for JsxTemplatePass<'a, '_> {
    fn visit_program(&mut self, program: &mut Program<'a>) {
        self.scopes.push(scope_bindings(&program.body));
        walk_program(self, program);
        self.scopes.pop();
    }

    fn visit_function(&mut self, func: &mut Function<'a>, flags: ScopeFlags) {
        self.scopes.push(function_bindings(func));
        walk_function(self, func, flags);
        self.scopes.pop();
    }

    fn visit_class(&mut self, class: &mut Class<'a>) {
        self.scopes.push(class_bindings(class));
        walk_class(self, class);
        self.scopes.pop();
    }

    fn visit_arrow_function_expression(&mut self, arrow: &mut ArrowFunctionExpression<'a>) {
        self.scopes.push(arrow_bindings(arrow));
        walk_arrow_function_expression(self, arrow);
        self.scopes.pop();
    }

    fn visit_block_statement(&mut self, block: &mut BlockStatement<'a>) {
        self.scopes.push(scope_bindings(&block.body));
        walk_block_statement(self, block);
        self.scopes.pop();
    }

    fn visit_for_statement(&mut self, stmt: &mut ForStatement<'a>) {
        let bindings = match &stmt.init {
            Some(ForStatementInit::VariableDeclaration(decl)) => declaration_bindings(decl),
            _ => HashSet::new(),
        };
        self.scopes.push(bindings);
        walk_for_statement(self, stmt);
        self.scopes.pop();
    }

    fn visit_for_in_statement(&mut self, stmt: &mut ForInStatement<'a>) {
        let bindings = match &stmt.left {
            ForStatementLeft::VariableDeclaration(decl) => declaration_bindings(decl),
            _ => HashSet::new(),
        };
        self.scopes.push(bindings);
        walk_for_in_statement(self, stmt);
        self.scopes.pop();
    }

    fn visit_for_of_statement(&mut self, stmt: &mut ForOfStatement<'a>) {
        let bindings = match &stmt.left {
            ForStatementLeft::VariableDeclaration(decl) => declaration_bindings(decl),
            _ => HashSet::new(),
        };
        self.scopes.push(bindings);
        walk_for_of_statement(self, stmt);
        self.scopes.pop();
    }

    fn visit_catch_clause(&mut self, clause: &mut CatchClause<'a>) {
        let mut bindings = HashSet::new();
        if let Some(param) = &clause.param {
            collect_pattern(&param.pattern, &mut bindings);
        }
        self.scopes.push(bindings);
        walk_catch_clause(self, clause);
        self.scopes.pop();
    }

    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        if self.error.is_some() {
            return;
        }
        let lowered = match expr {
            Expression::JSXElement(element) => Some(self.lower_element(element)),
            Expression::JSXFragment(fragment) => Some(self.lower_fragment(fragment)),
            _ => None,
        };
        match lowered {
            Some(Ok(replacement)) => *expr = replacement,
            Some(Err(err)) => {
                warn!(code = %err.code, file = %err.file, line = err.line, "aborting unit");
                self.error = Some(err);
            }
            None => walk_expression(self, expr),
        }
    }
}
