//! ZodiacFX switch architecture model.
//!
//! The top-level package is `ZodiacfxSwitch(prs, swtch, deprs)`. Arguments are bound to roles by parameter name,
//! never by position.

/// Name the main package is expected to have.
pub const PACKAGE_NAME: &str = "ZodiacfxSwitch";

/// Number of constructor parameters of the switch package.
pub const PACKAGE_ARITY: usize = 3;

/// Constructor parameter bound to the header parser.
pub const PARSER_PARAM: &str = "prs";

/// Constructor parameter bound to the match-action pipeline.
pub const PIPELINE_PARAM: &str = "swtch";

/// Constructor parameter bound to the deparser.
pub const DEPARSER_PARAM: &str = "deprs";

/// Input metadata struct (filled from the routine's port argument).
pub mod input_metadata {
    pub const STRUCT_NAME: &str = "zodiacfx_input_metadata";
    pub const INPUT_PORT: &str = "input_port";
}

/// Output metadata struct (read by the device-write call).
pub mod output_metadata {
    pub const STRUCT_NAME: &str = "zodiacfx_output_metadata";
    pub const OUTPUT_PORT: &str = "output_port";
}

/// Kind of block a constructor argument must evaluate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Parser,
    Control,
}

/// Role a constructor argument plays in the switch package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Parser,
    Pipeline,
    Deparser,
}

impl Role {
    /// Roles in build order.
    pub const ALL: [Role; 3] = [Role::Parser, Role::Pipeline, Role::Deparser];

    /// Constructor parameter name bound to this role.
    pub const fn param_name(self) -> &'static str {
        match self {
            Role::Parser => PARSER_PARAM,
            Role::Pipeline => PIPELINE_PARAM,
            Role::Deparser => DEPARSER_PARAM,
        }
    }

    /// Block kind the front-end guarantees for this role.
    pub const fn expected_kind(self) -> BlockKind {
        match self {
            Role::Parser => BlockKind::Parser,
            Role::Pipeline | Role::Deparser => BlockKind::Control,
        }
    }

    /// Human-readable role name (diagnostics and logs).
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Parser => "parser",
            Role::Pipeline => "pipeline",
            Role::Deparser => "deparser",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
