//! Main compiler
//!
//! Runs the phases in strict sequence: semantic analysis, constant
//! folding, code generation. Analyzer errors abort the run with no
//! partial AST.

use funktion_core::ast::Node;
use funktion_core::cst::ParseNode;
use log::debug;

use crate::codegen::Generator;
use crate::error::Result;
use crate::optimizer::ConstantFolder;
use crate::semantic;

/// Compiler options
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Enable constant folding optimization
    pub enable_constant_folding: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            enable_constant_folding: true,
        }
    }
}

/// The Funktion compiler
pub struct Compiler {
    options: CompilerOptions,
    constant_folder: ConstantFolder,
}

impl Compiler {
    /// Create a new compiler instance with default options
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a new compiler instance with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self {
            options,
            constant_folder: ConstantFolder::new(),
        }
    }

    /// Run semantic analysis on a parse tree, producing the typed AST
    pub fn analyze(&self, tree: &ParseNode) -> Result<Node> {
        semantic::analyze(tree)
    }

    /// Run constant folding over a typed AST
    pub fn optimize(&self, ast: &Node) -> Node {
        self.constant_folder.fold(ast)
    }

    /// Emit the JavaScript program for a typed AST
    pub fn generate(&self, ast: &Node) -> String {
        Generator::new().generate(ast)
    }

    /// Compile a parse tree into a JavaScript program
    pub fn compile(&self, tree: &ParseNode) -> Result<String> {
        debug!("semantic analysis");
        let mut ast = self.analyze(tree)?;

        if self.options.enable_constant_folding {
            debug!("constant folding");
            ast = self.optimize(&ast);
        }

        debug!("code generation");
        Ok(self.generate(&ast))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
