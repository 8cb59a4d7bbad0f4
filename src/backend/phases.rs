//! Phase translator contracts
//!
//! The orchestrator drives three translators it does not implement: the header parser, the match-action pipeline and
//! the deparser. Each one builds from its own block and later writes its fragment into the shared [`CodeBuilder`].
//! The parser's build produces the [`Headers`] layout; pipeline and deparser receive the same `Rc` handle, so all
//! three agree on one header instance.
//!
//! Translators are only ever created through a [`PhaseFactory`].

use std::rc::Rc;

use crate::ir::{ControlBlock, ParserBlock, TypeMap};

use super::code_builder::CodeBuilder;
use super::errors::PhaseError;

/// Layout of all header instances used by the program.
pub trait HeaderLayout {
    /// Emit the declaration of an instance of this layout (`struct headers hdr` or `struct headers *hdr`).
    fn declare(&self, builder: &mut CodeBuilder<'_>, instance_name: &str, as_pointer: bool);

    /// Emit the initializer expression for a fresh instance (all headers invalid).
    fn emit_initializer(&self, builder: &mut CodeBuilder<'_>);
}

/// The header instance shared by every phase
pub struct Headers {
    instance_name: String,
    layout: Box<dyn HeaderLayout>,
}

impl Headers {
    pub fn new(instance_name: impl Into<String>, layout: Box<dyn HeaderLayout>) -> Self {
        Self {
            instance_name: instance_name.into(),
            layout,
        }
    }

    /// Name of the header variable in the generated routine
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn layout(&self) -> &dyn HeaderLayout {
        self.layout.as_ref()
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Headers").field("instance_name", &self.instance_name).finish_non_exhaustive()
    }
}

/// Header-parser translator: a state machine over packet headers.
pub trait ParserPhase {
    /// Translate the parser block; on success returns the header layout every later phase shares.
    fn build(&mut self) -> Result<Rc<Headers>, PhaseError>;

    /// Emit the state machine. The text defines the `start` label and ends by reaching `accept`.
    fn emit(&self, builder: &mut CodeBuilder<'_>);
}

/// Match-action pipeline translator.
pub trait ControlPhase {
    fn build(&mut self) -> Result<(), PhaseError>;

    /// Emit the dispatch body executed after `accept:`.
    fn emit(&self, builder: &mut CodeBuilder<'_>);

    /// Emit the key/value types of every table (header artifact).
    fn emit_table_types(&self, builder: &mut CodeBuilder<'_>);

    /// Name of the input metadata instance the pipeline reads
    fn input_metadata(&self) -> &str;

    /// Name of the output metadata instance the pipeline writes
    fn output_metadata(&self) -> &str;
}

/// Deparser translator: writes valid headers back onto the packet buffer.
pub trait DeparserPhase {
    fn build(&mut self) -> Result<(), PhaseError>;

    fn emit(&self, builder: &mut CodeBuilder<'_>);
}

/// Constructs the phase translators for one compilation run.
pub trait PhaseFactory<'a> {
    fn parser(&mut self, block: &'a ParserBlock, types: &'a TypeMap) -> Box<dyn ParserPhase + 'a>;

    fn control(
        &mut self,
        block: &'a ControlBlock,
        types: &'a TypeMap,
        headers: Rc<Headers>,
    ) -> Box<dyn ControlPhase + 'a>;

    fn deparser(
        &mut self,
        block: &'a ControlBlock,
        types: &'a TypeMap,
        headers: Rc<Headers>,
    ) -> Box<dyn DeparserPhase + 'a>;
}
