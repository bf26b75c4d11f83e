//! Micro-template source generation and re-parsing.

#[cfg(test)]
mod tests {
    use crate::diagnostics::{SourceLocator, ERR_TEMPLATE_SOURCE};
    use crate::template::{escape_text, MicroTemplate, TemplateAdapter, TEMPLATE_VARIABLE};
    use oxc_allocator::Allocator;
    use oxc_ast::ast::*;
    use oxc_span::Span;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("it's"), "it\\'s");
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("line\nbreak\r"), "line\\nbreak\\r");
        assert_eq!(escape_text("\u{2028}"), "\\u2028");
        assert_eq!(escape_text("<p class='x'>"), "<p class=\\'x\\'>");
    }

    #[test]
    fn test_plain_text_source() {
        let source = MicroTemplate::compile("<b>hi</b>", "data");
        assert_eq!(
            source,
            "function(data){\nvar __t,__p='';\n__p+='<b>hi</b>';\nreturn __p;\n}"
        );
    }

    #[test]
    fn test_interpolation_source() {
        let source = MicroTemplate::compile("<p><%= user.name %></p>", "data");
        assert!(
            source.contains("__p+='<p>'+\n((__t=( user.name ))==null?'':__t)+\n'</p>';"),
            "source: {}",
            source
        );
    }

    #[test]
    fn test_generated_source_is_single_line_and_named() {
        let allocator = Allocator::default();
        let adapter = TemplateAdapter::new(&allocator);
        let source = adapter.generate_source("<p>a\nb</p>");
        assert!(!source.contains('\n'), "source: {}", source);
        assert!(source.starts_with("function tmpl("), "source: {}", source);
        assert!(source.contains(TEMPLATE_VARIABLE));
        // The escaped break in the text survives as an escape sequence.
        assert!(source.contains("a\\nb"), "source: {}", source);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let allocator = Allocator::default();
        let adapter = TemplateAdapter::new(&allocator);
        let fragment = "<ul class='list'><li><%= item.label %></li></ul>";
        assert_eq!(adapter.generate_source(fragment), adapter.generate_source(fragment));
    }

    #[test]
    fn test_compile_yields_anonymous_function() {
        let allocator = Allocator::default();
        let adapter = TemplateAdapter::new(&allocator);
        let locator = SourceLocator::new("t.jsx", "<b>hi</b>");
        let expr = adapter
            .compile("<b>hi</b>", &locator, Span::new(0, 9))
            .expect("template should compile");
        let Expression::FunctionExpression(func) = &expr else {
            panic!("expected a function expression");
        };
        assert!(func.id.is_none());
        assert_eq!(func.params.items.len(), 1);
        assert!(matches!(
            &func.params.items[0].pattern,
            BindingPattern::BindingIdentifier(id) if id.name.as_str() == "data"
        ));
    }

    #[test]
    fn test_malformed_interpolation_is_reported() {
        let allocator = Allocator::default();
        let adapter = TemplateAdapter::new(&allocator);
        let source = "let a;\nconst v = <p/>;";
        let locator = SourceLocator::new("t.jsx", source);
        let err = adapter
            .compile("<p><%= ) %></p>", &locator, Span::new(17, 21))
            .err()
            .expect("unbalanced interpolation should not parse");
        assert_eq!(err.code, ERR_TEMPLATE_SOURCE);
        assert_eq!((err.line, err.column), (2, 11));
        let context = err.context.expect("generated source is attached");
        assert!(context.contains("function tmpl"), "context: {}", context);
    }
}
