//! The ZodiacFX program orchestrator.
//!
//! [`Program`] validates the top-level `ZodiacfxSwitch` instance, builds the three phase translators in order, and
//! assembles their fragments into the two generated files:
//!
//! ```text
//! try_build: package name (warn) → arity (fail) → parser → pipeline → deparser
//! emit_c:    banner → #include header → includes → preamble → signature {
//!              headers = init; locals; goto start;
//!              parser text; accept: { pipeline text } deparser text;
//!              gmac_write(...);
//!            } license
//! emit_h:    banner → guard → includes → prototype → types → table types → #endif
//! ```
//!
//! ## Notes
//!
//! - The build is fail-fast: a phase that fails stops the build before the next phase is constructed, and a failed
//!   build keeps no phase at all. Both emitters refuse to run on such a program.
//! - Emission order is load-bearing. Later fragments use names declared by earlier ones (`offset`, the metadata
//!   instances, the `start`/`accept` labels).

use std::rc::Rc;

use zfx_core::conventions::{
    ACCEPT_LABEL, BYTES_MACRO, DEVICE_WRITE, ENTRY_ROUTINE, HEADER_GUARD, MASK_MACRO, OFFSET_VAR, PACKET_LENGTH_VAR,
    PACKET_START_VAR, PACKET_VAR, PORT_VAR, START_LABEL,
};
use zfx_core::model::{self, input_metadata, output_metadata};
use zfx_core::{BlockKind, Role};

use crate::ir::{Block, ControlBlock, PackageInstance, ParserBlock, TopLevel, TypeMap};
use crate::version::ZFXC_VERSION;

use super::code_builder::CodeBuilder;
use super::diagnostics::Diagnostics;
use super::errors::{Artifact, BuildError, BuildWarning, EmitError};
use super::options::CompileOptions;
use super::phases::{ControlPhase, DeparserPhase, Headers, ParserPhase, PhaseFactory};
use super::target::Target;
use super::types::{CTypeFactory, TypeFactory};

/// A constructor argument resolved for a role.
#[derive(Debug, Clone, Copy)]
pub enum RoleBlock<'a> {
    Parser(&'a ParserBlock),
    Control(&'a ControlBlock),
    /// Bound, but to a block of the wrong kind for any role
    Invalid(&'a Block),
}

impl<'a> RoleBlock<'a> {
    /// Kind of the resolved block, `None` for blocks no role accepts.
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            RoleBlock::Parser(_) => Some(BlockKind::Parser),
            RoleBlock::Control(_) => Some(BlockKind::Control),
            RoleBlock::Invalid(_) => None,
        }
    }
}

/// Look up the argument bound to `role` by its parameter name.
///
/// ## Panics
///
/// If the package declares no argument for the role. The front-end guarantees every switch parameter is bound.
pub fn resolve_role(package: &PackageInstance, role: Role) -> RoleBlock<'_> {
    match package.parameter_value(role.param_name()) {
        Some(Block::Parser(p)) => RoleBlock::Parser(p),
        Some(Block::Control(c)) => RoleBlock::Control(c),
        Some(other) => RoleBlock::Invalid(other),
        None => panic!(
            "INVARIANT: no {} block found (parameter `{}` of {} is unbound)",
            role,
            role.param_name(),
            package.type_name
        ),
    }
}

fn wrong_kind(role: Role, resolved: RoleBlock<'_>) -> ! {
    let found = match resolved {
        RoleBlock::Parser(p) => format!("parser block `{}`", p.name),
        RoleBlock::Control(c) => format!("control block `{}`", c.name),
        RoleBlock::Invalid(b) => b.describe(),
    };
    debug_assert_ne!(resolved.kind(), Some(role.expected_kind()));
    panic!(
        "INVARIANT: no {} block found (expected a {:?} block for `{}`, got {})",
        role,
        role.expected_kind(),
        role.param_name(),
        found
    )
}

/// Resolve the parser role; anything but a parser block is a compiler bug.
fn expect_parser(package: &PackageInstance) -> &ParserBlock {
    match resolve_role(package, Role::Parser) {
        RoleBlock::Parser(p) => p,
        other => wrong_kind(Role::Parser, other),
    }
}

/// Resolve a control-shaped role (pipeline or deparser).
fn expect_control(package: &PackageInstance, role: Role) -> &ControlBlock {
    match resolve_role(package, role) {
        RoleBlock::Control(c) => c,
        other => wrong_kind(role, other),
    }
}

/// The translators of a successfully built program.
struct Phases<'a> {
    parser: Box<dyn ParserPhase + 'a>,
    headers: Rc<Headers>,
    control: Box<dyn ControlPhase + 'a>,
    deparser: Box<dyn DeparserPhase + 'a>,
}

/// Text of both generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub implementation: String,
    pub header: String,
}

/// ZodiacFX back-end orchestrator for one compilation run.
pub struct Program<'a, F: PhaseFactory<'a>> {
    toplevel: &'a TopLevel,
    types: &'a TypeMap,
    options: CompileOptions,
    factory: F,
    type_factory: Box<dyn TypeFactory + 'a>,
    diagnostics: Diagnostics,
    phases: Option<Phases<'a>>,
}

impl<'a, F: PhaseFactory<'a>> Program<'a, F> {
    pub fn new(toplevel: &'a TopLevel, types: &'a TypeMap, options: CompileOptions, factory: F) -> Self {
        Self {
            toplevel,
            types,
            options,
            factory,
            type_factory: Box::new(CTypeFactory::new(types)),
            diagnostics: Diagnostics::new(),
            phases: None,
        }
    }

    /// Replace the default C type translation used by [`emit_h`](Self::emit_h).
    pub fn with_type_factory(mut self, type_factory: Box<dyn TypeFactory + 'a>) -> Self {
        self.type_factory = type_factory;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Whether the last build succeeded.
    pub fn is_built(&self) -> bool {
        self.phases.is_some()
    }

    /// The header-parser translator, once built.
    pub fn parser(&self) -> Option<&(dyn ParserPhase + 'a)> {
        self.phases.as_ref().map(|p| p.parser.as_ref())
    }

    /// The pipeline translator, once built.
    pub fn control(&self) -> Option<&(dyn ControlPhase + 'a)> {
        self.phases.as_ref().map(|p| p.control.as_ref())
    }

    /// The deparser translator, once built.
    pub fn deparser(&self) -> Option<&(dyn DeparserPhase + 'a)> {
        self.phases.as_ref().map(|p| p.deparser.as_ref())
    }

    /// The shared header layout, once built.
    pub fn headers(&self) -> Option<&Rc<Headers>> {
        self.phases.as_ref().map(|p| &p.headers)
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Validate the top-level package and build parser, pipeline and deparser.
    ///
    /// Errors are recorded in [`diagnostics`](Self::diagnostics); the return value says whether to continue.
    pub fn build(&mut self) -> bool {
        match self.try_build() {
            Ok(()) => true,
            Err(e) => {
                self.diagnostics.error(&e);
                false
            }
        }
    }

    /// Validate the top-level package and build parser, pipeline and deparser (fallible).
    ///
    /// Warnings go to [`diagnostics`](Self::diagnostics); the returned error is left to the caller.
    ///
    /// ## Errors
    ///
    /// - `BuildError::PackageArity` if the package does not take exactly three arguments; no phase is constructed.
    /// - `BuildError::Phase` for the first phase whose build fails; later phases are never constructed.
    ///
    /// ## Panics
    ///
    /// If a role's argument is missing or is not the kind of block the architecture requires.
    #[tracing::instrument(skip_all, fields(package = %self.toplevel.main().type_name, zfxc = ZFXC_VERSION))]
    pub fn try_build(&mut self) -> Result<(), BuildError> {
        self.phases = None;
        let toplevel = self.toplevel;
        let types = self.types;
        let package = toplevel.main();

        if package.type_name != model::PACKAGE_NAME {
            self.diagnostics.warning(&BuildWarning::UnexpectedPackage {
                found: package.type_name.clone(),
                expected: model::PACKAGE_NAME,
            });
        }

        if package.constructor_arity() != model::PACKAGE_ARITY {
            return Err(BuildError::PackageArity {
                package: package.type_name.clone(),
                expected: model::PACKAGE_ARITY,
                found: package.constructor_arity(),
            });
        }

        let parser_block = expect_parser(package);
        tracing::debug!(role = %Role::Parser, block = %parser_block.name, "building phase");
        let mut parser = self.factory.parser(parser_block, types);
        let headers = parser.build().map_err(|e| BuildError::phase(Role::Parser, e))?;

        let control_block = expect_control(package, Role::Pipeline);
        tracing::debug!(role = %Role::Pipeline, block = %control_block.name, "building phase");
        let mut control = self.factory.control(control_block, types, Rc::clone(&headers));
        control.build().map_err(|e| BuildError::phase(Role::Pipeline, e))?;

        let deparser_block = expect_control(package, Role::Deparser);
        tracing::debug!(role = %Role::Deparser, block = %deparser_block.name, "building phase");
        let mut deparser = self.factory.deparser(deparser_block, types, Rc::clone(&headers));
        deparser.build().map_err(|e| BuildError::phase(Role::Deparser, e))?;

        self.phases = Some(Phases {
            parser,
            headers,
            control,
            deparser,
        });
        Ok(())
    }

    fn built(&self, artifact: Artifact) -> Result<&Phases<'a>, EmitError> {
        self.phases.as_ref().ok_or(EmitError::NotBuilt(artifact))
    }

    // =========================================================================
    // Implementation artifact
    // =========================================================================

    /// Emit the implementation file: the `packet_in` routine.
    ///
    /// ## Errors
    ///
    /// Returns `EmitError::NotBuilt` unless the last build succeeded; nothing is written in that case.
    #[tracing::instrument(skip_all, fields(header = header_file))]
    pub fn emit_c(&self, builder: &mut CodeBuilder<'_>, header_file: &str) -> Result<(), EmitError> {
        let phases = self.built(Artifact::Implementation)?;
        let target = builder.target();

        self.emit_generated_comment(builder);
        builder.append_format(format_args!("#include \"{}\"", header_file));
        builder.newline();
        target.emit_includes(builder);
        emit_preamble(builder);

        builder.newline();
        builder.emit_indent();
        target.emit_code_section(builder, ENTRY_ROUTINE);
        builder.emit_indent();
        target.emit_main(builder, ENTRY_ROUTINE, PACKET_VAR, PACKET_LENGTH_VAR);
        builder.append(" ");
        builder.block_start();

        emit_header_instance(builder, &phases.headers);
        emit_local_variables(builder, phases.control.as_ref());
        builder.newline();
        builder.emit_indent();
        builder.append_format(format_args!("goto {};", START_LABEL));
        builder.newline();

        builder.newline();
        builder.append_line("// Start of Parser");
        phases.parser.emit(builder);

        builder.newline();
        builder.append_line("// Start of Pipeline");
        emit_pipeline(builder, phases.control.as_ref());

        builder.newline();
        builder.append_line("// Start of Deparser");
        phases.deparser.emit(builder);

        builder.emit_indent();
        builder.append_format(format_args!(
            "{}({}, {}, {}.{});",
            DEVICE_WRITE,
            PACKET_VAR,
            PACKET_LENGTH_VAR,
            phases.control.output_metadata(),
            output_metadata::OUTPUT_PORT
        ));
        builder.newline();
        builder.block_end(true);
        target.emit_license(builder, self.options.license.as_deref());
        Ok(())
    }

    // =========================================================================
    // Header artifact
    // =========================================================================

    /// Emit the header file: prototype, derived types and table types.
    ///
    /// Emitting twice yields the same text apart from the banner timestamp.
    ///
    /// ## Errors
    ///
    /// Returns `EmitError::NotBuilt` unless the last build succeeded.
    #[tracing::instrument(skip_all)]
    pub fn emit_h(&self, builder: &mut CodeBuilder<'_>) -> Result<(), EmitError> {
        let phases = self.built(Artifact::Header)?;
        let target = builder.target();

        self.emit_generated_comment(builder);
        builder.append_line(&format!("#ifndef {}", HEADER_GUARD));
        builder.append_line(&format!("#define {}", HEADER_GUARD));
        target.emit_includes(builder);
        builder.newline();
        builder.emit_indent();
        target.emit_main(builder, ENTRY_ROUTINE, PACKET_VAR, PACKET_LENGTH_VAR);
        builder.end_of_statement(true);
        builder.newline();
        self.emit_types(builder);
        phases.control.emit_table_types(builder);
        builder.append_line("#endif");
        Ok(())
    }

    /// Emit both files into fresh builders configured from the compile options.
    pub fn generate(&self, target: &dyn Target, header_file: &str) -> Result<GeneratedArtifacts, EmitError> {
        let mut c = CodeBuilder::new(target).with_indent_width(self.options.indent_width);
        self.emit_c(&mut c, header_file)?;
        let mut h = CodeBuilder::new(target).with_indent_width(self.options.indent_width);
        self.emit_h(&mut h)?;
        Ok(GeneratedArtifacts {
            implementation: c.finish(),
            header: h.finish(),
        })
    }

    fn emit_generated_comment(&self, builder: &mut CodeBuilder<'_>) {
        builder.append_format(format_args!(
            "/* Automatically generated by {} from {} on {} */",
            self.options.exe_name,
            self.options.source_file,
            self.options.banner_timestamp()
        ));
        builder.newline();
    }

    fn emit_types(&self, builder: &mut CodeBuilder<'_>) {
        for decl in self.toplevel.type_decls().filter(|d| d.kind.is_emittable()) {
            match self.type_factory.create(decl) {
                Some(ty) => {
                    ty.emit(builder);
                    builder.newline();
                }
                None => tracing::trace!(ty = %decl.name, "type has no C declaration; skipped"),
            }
        }
    }
}

fn emit_preamble(builder: &mut CodeBuilder<'_>) {
    builder.emit_indent();
    builder.newline();
    builder.append_line(MASK_MACRO);
    builder.append_line(BYTES_MACRO);
}

fn emit_header_instance(builder: &mut CodeBuilder<'_>, headers: &Headers) {
    builder.emit_indent();
    headers.layout().declare(builder, headers.instance_name(), false);
    builder.append(" = ");
    headers.layout().emit_initializer(builder);
    builder.end_of_statement(true);
}

fn emit_local_variables(builder: &mut CodeBuilder<'_>, control: &dyn ControlPhase) {
    builder.append_line(&format!("uint16_t {} = 0;", OFFSET_VAR));
    builder.append_line(&format!("uint8_t *{} = {};", PACKET_START_VAR, PACKET_VAR));
    builder.append_line(&format!(
        "struct {} {};",
        output_metadata::STRUCT_NAME,
        control.output_metadata()
    ));
    builder.append_line(&format!(
        "struct {} {};",
        input_metadata::STRUCT_NAME,
        control.input_metadata()
    ));
    builder.append_line(&format!(
        "{}.{} = {};",
        control.input_metadata(),
        input_metadata::INPUT_PORT,
        PORT_VAR
    ));
}

fn emit_pipeline(builder: &mut CodeBuilder<'_>, control: &dyn ControlPhase) {
    builder.emit_indent();
    builder.append(ACCEPT_LABEL);
    builder.append(":");
    builder.newline();
    builder.emit_indent();
    builder.block_start();
    control.emit(builder);
    builder.block_end(true);
}
