//! Unit-level entry points: parse, run the pass, print.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::diagnostics::{CompilerError, SourceLocator, ERR_SYNTAX};
use crate::options::CompileOptions;
use crate::transform::JsxTemplatePass;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub code: String,
    /// Outermost elements compiled into template functions.
    pub boundaries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    pub file_path: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(file_path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            source: source.into(),
        }
    }
}

pub fn source_type(options: &CompileOptions) -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_jsx(true)
        .with_typescript(options.typescript)
}

/// Run the pass over an already parsed program. Returns the number of
/// template boundaries compiled.
pub fn transform_program<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    file_path: &str,
    options: &CompileOptions,
) -> Result<usize, CompilerError> {
    let source: &'a str = program.source_text;
    let locator = SourceLocator::new(file_path, source);
    let mut pass = JsxTemplatePass::new(allocator, options, locator);
    pass.visit_program(program);
    pass.finish()
}

pub fn compile_jsx(
    source: &str,
    file_path: &str,
    options: &CompileOptions,
) -> Result<CompileOutput, CompilerError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type(options)).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let detail = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(file = file_path, "parse failed: {}", detail);
        return Err(CompilerError::new(
            ERR_SYNTAX,
            &format!("Failed to parse {}: {}", file_path, detail),
            file_path,
            1,
            1,
        ));
    }

    let mut program = ret.program;
    let boundaries = transform_program(&allocator, &mut program, file_path, options)?;
    let code = Codegen::new().build(&program).code;

    debug!(file = file_path, boundaries, pass = JsxTemplatePass::NAME, "compiled unit");
    Ok(CompileOutput {
        code,
        boundaries: boundaries as u32,
    })
}

/// Compile independent units in parallel. Each unit owns its allocator and
/// boundary state, so results never depend on scheduling.
pub fn compile_units(
    units: &[SourceUnit],
    options: &CompileOptions,
) -> Vec<Result<CompileOutput, CompilerError>> {
    units
        .par_iter()
        .map(|unit| compile_jsx(&unit.source, &unit.file_path, options))
        .collect()
}
