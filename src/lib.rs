//! # JSX Template Compiler
//!
//! A `jsx-underscore` style lowering pass. Every cluster of nested JSX
//! elements is flattened into markup text and the outermost element of each
//! cluster is replaced by a compiled template function taking one `data`
//! argument.
//!
//! ## Pipeline
//!
//! 1. **Normalize**: JSX names and expression containers become plain
//!    expressions; static member reads get a `<%= a.b %>` placeholder.
//! 2. **Attributes**: each attribute becomes a `name: value` prop.
//! 3. **Resolve**: the tag is intrinsic (`"div"`) or bound (`["Foo", Foo]`),
//!    depending on `captureScope`, `builtins` and the lexical scope.
//! 4. **Serialize**: children are flattened into `<tag props>text</tag>`.
//!    Only the element with the lowest start offset among the open ones is
//!    compiled; interior elements become string literals.
//! 5. **Template**: the outermost fragment is turned into micro-template
//!    source and re-parsed into an anonymous function expression.
//!
//! The first unresolved tag or unparseable generated source aborts the unit.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod attributes;
pub mod compile;
pub mod diagnostics;
pub mod normalize;
pub mod options;
pub mod resolver;
pub mod scope;
pub mod serializer;
pub mod template;
pub mod transform;

#[cfg(test)]
mod template_tests;

pub use compile::{compile_jsx, compile_units, transform_program, CompileOutput, SourceUnit};
pub use diagnostics::*;
pub use options::{CompileOptions, ResolverConfig};
pub use transform::JsxTemplatePass;

#[cfg(feature = "napi")]
#[napi]
pub fn compile_jsx_native(
    source: String,
    file_path: String,
    options_json: Option<String>,
) -> napi::Result<CompileOutput> {
    let options = match options_json {
        Some(json) => CompileOptions::from_json(&json),
        None => Ok(CompileOptions::default()),
    };
    options
        .and_then(|options| compile_jsx(&source, &file_path, &options))
        .map_err(|err| {
            let reason = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            napi::Error::from_reason(reason)
        })
}
