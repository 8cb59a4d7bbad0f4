//! Shared fixtures: a ZodiacFX program and probe phase translators.
//!
//! The probe factory records every phase it constructs and builds, so tests can check sequencing and short-circuiting
//! without real translators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use zfx_core::Role;
use zfxc::backend::{
    CodeBuilder, CompileOptions, ControlPhase, DeparserPhase, HeaderLayout, Headers, ParserPhase, PhaseError,
    PhaseFactory,
};
use zfxc::ir::{
    Block, ControlBlock, Declaration, Field, FieldType, PackageInstance, Parameter, ParserBlock, TopLevel, TypeDecl,
    TypeKind,
};

// ============================================================================
// Program fixtures
// ============================================================================

pub fn parser_block(name: &str) -> Block {
    Block::Parser(ParserBlock {
        name: name.to_string(),
        type_name: name.to_string(),
        parameters: vec![Parameter::new("packet", "packet_in"), Parameter::new("hdr", "headers")],
    })
}

pub fn control_block(name: &str) -> Block {
    Block::Control(ControlBlock {
        name: name.to_string(),
        type_name: name.to_string(),
        parameters: vec![Parameter::new("hdr", "headers")],
    })
}

/// `ZodiacfxSwitch(MyParser(), MySwitch(), MyDeparser())` under the given package type name.
pub fn switch_package(type_name: &str) -> PackageInstance {
    PackageInstance::new(type_name)
        .with_argument(Parameter::new("prs", "Parser"), parser_block("MyParser"))
        .with_argument(Parameter::new("swtch", "Switch"), control_block("MySwitch"))
        .with_argument(Parameter::new("deprs", "Deparser"), control_block("MyDeparser"))
}

/// A package with only the parser and pipeline arguments.
pub fn two_argument_package() -> PackageInstance {
    PackageInstance::new("ZodiacfxSwitch")
        .with_argument(Parameter::new("prs", "Parser"), parser_block("MyParser"))
        .with_argument(Parameter::new("swtch", "Switch"), control_block("MySwitch"))
}

/// The switch package plus one extra constructor parameter.
pub fn four_argument_package() -> PackageInstance {
    switch_package("ZodiacfxSwitch").with_argument(Parameter::new("extra", "Counter"), control_block("Extra"))
}

fn ty(name: &str, kind: TypeKind) -> Declaration {
    Declaration::Type(TypeDecl::new(name, kind))
}

fn named(name: &str) -> FieldType {
    FieldType::Named(name.to_string())
}

/// Declarations of a small L2/L3 switch, in source order.
pub fn switch_declarations() -> Vec<Declaration> {
    vec![
        ty("macAddr_t", TypeKind::Typedef { target: FieldType::Bits(48) }),
        ty(
            "ethernet_t",
            TypeKind::Header {
                fields: vec![
                    Field::new("dstAddr", named("macAddr_t")),
                    Field::new("srcAddr", named("macAddr_t")),
                    Field::bits("etherType", 16),
                ],
            },
        ),
        ty(
            "ipv4_t",
            TypeKind::Header {
                fields: vec![
                    Field::bits("version", 4),
                    Field::bits("ihl", 4),
                    Field::bits("ttl", 8),
                    Field::bits("srcAddr", 32),
                    Field::bits("dstAddr", 32),
                ],
            },
        ),
        ty(
            "headers",
            TypeKind::Struct {
                fields: vec![Field::new("ethernet", named("ethernet_t")), Field::new("ipv4", named("ipv4_t"))],
            },
        ),
        ty(
            "PortAction",
            TypeKind::Enum {
                members: vec!["Forward".to_string(), "Drop".to_string()],
            },
        ),
        ty(
            "error",
            TypeKind::Error {
                members: vec!["NoError".to_string(), "PacketTooShort".to_string()],
            },
        ),
        ty("counter", TypeKind::Extern),
        ty(
            "broken_t",
            TypeKind::Struct {
                fields: vec![Field::new("c", named("counter"))],
            },
        ),
        ty("Parser", TypeKind::Parser),
        ty("Switch", TypeKind::Control),
        ty("Deparser", TypeKind::Control),
        ty("ZodiacfxSwitch", TypeKind::Package),
        Declaration::Constant {
            name: "CPU_PORT".to_string(),
        },
        Declaration::Instance {
            name: "main".to_string(),
            type_name: "ZodiacfxSwitch".to_string(),
        },
    ]
}

pub fn switch_program() -> TopLevel {
    TopLevel::new(switch_package("ZodiacfxSwitch"), switch_declarations())
}

pub fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 3, 7)
        .and_then(|d| d.and_hms_opt(9, 5, 2))
        .expect("valid timestamp")
}

pub fn fixed_options() -> CompileOptions {
    CompileOptions::new("switch.p4").with_timestamp(fixed_timestamp())
}

// ============================================================================
// Probe phases
// ============================================================================

/// What the probe factory observed.
#[derive(Debug, Default)]
pub struct ProbeLog {
    /// Roles in construction order
    pub constructed: Vec<Role>,
    /// Roles whose build ran, in order
    pub built: Vec<Role>,
    /// Block names handed to each constructed phase
    pub blocks: Vec<String>,
    /// Address of the pipeline object handed to the orchestrator
    pub control_addr: Option<*const ()>,
    /// Address of the header layout each phase received
    pub header_addrs: Vec<*const Headers>,
}

pub type SharedLog = Rc<RefCell<ProbeLog>>;

struct FakeLayout;

impl HeaderLayout for FakeLayout {
    fn declare(&self, builder: &mut CodeBuilder<'_>, instance_name: &str, as_pointer: bool) {
        let star = if as_pointer { "*" } else { "" };
        builder.append_format(format_args!("struct headers {}{}", star, instance_name));
    }

    fn emit_initializer(&self, builder: &mut CodeBuilder<'_>) {
        builder.append("{ 0 }");
    }
}

fn outcome(log: &SharedLog, role: Role, fail: Option<Role>) -> Result<(), PhaseError> {
    log.borrow_mut().built.push(role);
    if fail == Some(role) {
        Err(PhaseError::new(format!("{} rejected by probe", role)))
    } else {
        Ok(())
    }
}

struct FakeParser {
    log: SharedLog,
    fail: Option<Role>,
}

impl ParserPhase for FakeParser {
    fn build(&mut self) -> Result<Rc<Headers>, PhaseError> {
        outcome(&self.log, Role::Parser, self.fail)?;
        let headers = Rc::new(Headers::new("hdr", Box::new(FakeLayout)));
        self.log.borrow_mut().header_addrs.push(Rc::as_ptr(&headers));
        Ok(headers)
    }

    fn emit(&self, builder: &mut CodeBuilder<'_>) {
        builder.append_line("start:");
        builder.emit_indent();
        builder.block_start();
        builder.append_line("hdr.ethernet.valid = 1;");
        builder.append_line("goto accept;");
        builder.block_end(true);
    }
}

struct FakeControl {
    log: SharedLog,
    fail: Option<Role>,
}

impl ControlPhase for FakeControl {
    fn build(&mut self) -> Result<(), PhaseError> {
        outcome(&self.log, Role::Pipeline, self.fail)
    }

    fn emit(&self, builder: &mut CodeBuilder<'_>) {
        builder.append_line("out_meta.output_port = in_meta.input_port;");
    }

    fn emit_table_types(&self, builder: &mut CodeBuilder<'_>) {
        builder.append_line("struct dmac_key { uint64_t dstAddr; };");
        builder.append_line("struct dmac_value { uint8_t action; };");
        builder.newline();
    }

    fn input_metadata(&self) -> &str {
        "in_meta"
    }

    fn output_metadata(&self) -> &str {
        "out_meta"
    }
}

struct FakeDeparser {
    log: SharedLog,
    fail: Option<Role>,
}

impl DeparserPhase for FakeDeparser {
    fn build(&mut self) -> Result<(), PhaseError> {
        outcome(&self.log, Role::Deparser, self.fail)
    }

    fn emit(&self, builder: &mut CodeBuilder<'_>) {
        builder.append_line("zodiacfx_ul_size = offset;");
    }
}

/// Phase factory that records constructions and can fail one role's build.
pub struct ProbeFactory {
    log: SharedLog,
    fail: Option<Role>,
}

impl ProbeFactory {
    pub fn succeeding() -> (Self, SharedLog) {
        Self::failing_at(None)
    }

    pub fn failing_at(fail: Option<Role>) -> (Self, SharedLog) {
        let log = SharedLog::default();
        (
            Self {
                log: Rc::clone(&log),
                fail,
            },
            log,
        )
    }
}

impl<'a> PhaseFactory<'a> for ProbeFactory {
    fn parser(&mut self, block: &'a ParserBlock, _types: &'a zfxc::TypeMap) -> Box<dyn ParserPhase + 'a> {
        let mut log = self.log.borrow_mut();
        log.constructed.push(Role::Parser);
        log.blocks.push(block.name.clone());
        Box::new(FakeParser {
            log: Rc::clone(&self.log),
            fail: self.fail,
        })
    }

    fn control(
        &mut self,
        block: &'a ControlBlock,
        _types: &'a zfxc::TypeMap,
        headers: Rc<Headers>,
    ) -> Box<dyn ControlPhase + 'a> {
        let phase = Box::new(FakeControl {
            log: Rc::clone(&self.log),
            fail: self.fail,
        });
        let mut log = self.log.borrow_mut();
        log.constructed.push(Role::Pipeline);
        log.blocks.push(block.name.clone());
        log.header_addrs.push(Rc::as_ptr(&headers));
        log.control_addr = Some(&*phase as *const FakeControl as *const ());
        phase
    }

    fn deparser(
        &mut self,
        block: &'a ControlBlock,
        _types: &'a zfxc::TypeMap,
        headers: Rc<Headers>,
    ) -> Box<dyn DeparserPhase + 'a> {
        let mut log = self.log.borrow_mut();
        log.constructed.push(Role::Deparser);
        log.blocks.push(block.name.clone());
        log.header_addrs.push(Rc::as_ptr(&headers));
        Box::new(FakeDeparser {
            log: Rc::clone(&self.log),
            fail: self.fail,
        })
    }
}
