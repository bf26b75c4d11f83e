use oxc_ast::ast::*;
use std::collections::HashSet;

/// Lexical binding lookup, as seen from the node currently being lowered.
pub trait ScopeQuery {
    fn has_binding(&self, name: &str) -> bool;
}

impl ScopeQuery for HashSet<String> {
    fn has_binding(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Stack of lexical scopes maintained while the pass walks a program.
///
/// Each scope is seeded with everything visible from anywhere inside it:
/// parameters, hoisted `var`s, and top-level `function`/`class`/`let`/`const`
/// and import bindings.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<HashSet<String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bindings: HashSet<String>) {
        self.scopes.push(bindings);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

}

impl ScopeQuery for ScopeStack {
    fn has_binding(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|s| s.contains(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECLARATION COLLECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Bindings declared by a statement list that owns its own scope.
pub fn scope_bindings(statements: &[Statement<'_>]) -> HashSet<String> {
    let mut names = HashSet::new();
    for stmt in statements {
        collect_statement(stmt, &mut names, true);
    }
    names
}

/// Bindings of a function scope: parameters plus its body's declarations.
pub fn function_bindings(func: &Function<'_>) -> HashSet<String> {
    let mut names = match &func.body {
        Some(body) => scope_bindings(&body.statements),
        None => HashSet::new(),
    };
    // A named function expression can refer to itself.
    if let Some(id) = &func.id {
        names.insert(id.name.to_string());
    }
    collect_params(&func.params, &mut names);
    names
}

/// A named class expression can refer to itself from its body.
pub fn class_bindings(class: &Class<'_>) -> HashSet<String> {
    class.id.iter().map(|id| id.name.to_string()).collect()
}

pub fn arrow_bindings(arrow: &ArrowFunctionExpression<'_>) -> HashSet<String> {
    let mut names = scope_bindings(&arrow.body.statements);
    collect_params(&arrow.params, &mut names);
    names
}

pub fn declaration_bindings(decl: &VariableDeclaration<'_>) -> HashSet<String> {
    let mut names = HashSet::new();
    for declarator in &decl.declarations {
        collect_pattern(&declarator.id, &mut names);
    }
    names
}

fn collect_params(params: &FormalParameters<'_>, names: &mut HashSet<String>) {
    for param in &params.items {
        collect_pattern(&param.pattern, names);
    }
}

pub fn collect_pattern(pattern: &BindingPattern<'_>, names: &mut HashSet<String>) {
    match pattern {
        BindingPattern::BindingIdentifier(id) => {
            names.insert(id.name.to_string());
        }
        BindingPattern::ObjectPattern(obj) => {
            for prop in &obj.properties {
                collect_pattern(&prop.value, names);
            }
            if let Some(rest) = &obj.rest {
                collect_pattern(&rest.argument, names);
            }
        }
        BindingPattern::ArrayPattern(arr) => {
            for elem in arr.elements.iter().flatten() {
                collect_pattern(elem, names);
            }
            if let Some(rest) = &arr.rest {
                collect_pattern(&rest.argument, names);
            }
        }
        BindingPattern::AssignmentPattern(assign) => {
            collect_pattern(&assign.left, names);
        }
    }
}

/// `top` is true for statements directly in the scope's statement list;
/// nested statements only contribute `var`s.
fn collect_statement(stmt: &Statement<'_>, names: &mut HashSet<String>, top: bool) {
    match stmt {
        Statement::VariableDeclaration(decl) => collect_variables(decl, names, top),
        Statement::FunctionDeclaration(func) if top => {
            if let Some(id) = &func.id {
                names.insert(id.name.to_string());
            }
        }
        Statement::ClassDeclaration(class) if top => {
            if let Some(id) = &class.id {
                names.insert(id.name.to_string());
            }
        }
        Statement::ImportDeclaration(import) if top => {
            if let Some(specifiers) = &import.specifiers {
                for specifier in specifiers {
                    let local = match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                    };
                    names.insert(local.name.to_string());
                }
            }
        }
        Statement::ExportNamedDeclaration(export) if top => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => collect_variables(decl, names, top),
            Some(Declaration::FunctionDeclaration(func)) => {
                if let Some(id) = &func.id {
                    names.insert(id.name.to_string());
                }
            }
            Some(Declaration::ClassDeclaration(class)) => {
                if let Some(id) = &class.id {
                    names.insert(id.name.to_string());
                }
            }
            _ => {}
        },
        Statement::ExportDefaultDeclaration(export) if top => match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    names.insert(id.name.to_string());
                }
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    names.insert(id.name.to_string());
                }
            }
            _ => {}
        },
        Statement::BlockStatement(block) => {
            for s in &block.body {
                collect_statement(s, names, false);
            }
        }
        Statement::IfStatement(if_stmt) => {
            collect_statement(&if_stmt.consequent, names, false);
            if let Some(alternate) = &if_stmt.alternate {
                collect_statement(alternate, names, false);
            }
        }
        Statement::ForStatement(for_stmt) => {
            if let Some(ForStatementInit::VariableDeclaration(decl)) = &for_stmt.init {
                collect_variables(decl, names, false);
            }
            collect_statement(&for_stmt.body, names, false);
        }
        Statement::ForInStatement(for_in) => {
            if let ForStatementLeft::VariableDeclaration(decl) = &for_in.left {
                collect_variables(decl, names, false);
            }
            collect_statement(&for_in.body, names, false);
        }
        Statement::ForOfStatement(for_of) => {
            if let ForStatementLeft::VariableDeclaration(decl) = &for_of.left {
                collect_variables(decl, names, false);
            }
            collect_statement(&for_of.body, names, false);
        }
        Statement::WhileStatement(while_stmt) => collect_statement(&while_stmt.body, names, false),
        Statement::DoWhileStatement(do_while) => collect_statement(&do_while.body, names, false),
        Statement::LabeledStatement(labeled) => collect_statement(&labeled.body, names, false),
        Statement::TryStatement(try_stmt) => {
            for s in &try_stmt.block.body {
                collect_statement(s, names, false);
            }
            if let Some(handler) = &try_stmt.handler {
                for s in &handler.body.body {
                    collect_statement(s, names, false);
                }
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                for s in &finalizer.body {
                    collect_statement(s, names, false);
                }
            }
        }
        Statement::SwitchStatement(switch) => {
            for case in &switch.cases {
                for s in &case.consequent {
                    collect_statement(s, names, false);
                }
            }
        }
        _ => {}
    }
}

fn collect_variables(decl: &VariableDeclaration<'_>, names: &mut HashSet<String>, top: bool) {
    if top || decl.kind == VariableDeclarationKind::Var {
        for declarator in &decl.declarations {
            collect_pattern(&declarator.id, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn program_bindings(code: &str) -> HashSet<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(true).with_jsx(true);
        let ret = Parser::new(&allocator, code, source_type).parse();
        assert!(ret.errors.is_empty(), "fixture should parse: {:?}", ret.errors);
        scope_bindings(&ret.program.body)
    }

    #[test]
    fn test_top_level_declarations() {
        let names = program_bindings(
            "import Button, { Icon as Glyph } from './ui';\n\
             import * as forms from './forms';\n\
             const { a, b: [c, ...d] } = x;\n\
             function Card() {}\n\
             class Panel {}\n\
             export const Exported = 1;",
        );
        for expected in ["Button", "Glyph", "forms", "a", "c", "d", "Card", "Panel", "Exported"] {
            assert!(names.contains(expected), "missing binding {}", expected);
        }
        assert!(!names.contains("Icon"));
        assert!(!names.contains("x"));
    }

    #[test]
    fn test_var_hoists_but_let_stays_in_block() {
        let names = program_bindings("if (ok) { var Hoisted = 1; let Scoped = 2; }");
        assert!(names.contains("Hoisted"));
        assert!(!names.contains("Scoped"));
    }

    #[test]
    fn test_stack_lookup_walks_outwards() {
        let mut stack = ScopeStack::new();
        stack.push(["Outer".to_string()].into_iter().collect());
        stack.push(["Inner".to_string()].into_iter().collect());
        assert!(stack.has_binding("Outer"));
        assert!(stack.has_binding("Inner"));
        stack.pop();
        assert!(!stack.has_binding("Inner"));
        assert!(stack.has_binding("Outer"));
    }
}
