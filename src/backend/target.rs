//! Target hooks
//!
//! The orchestrator decides *when* includes, the routine signature and the license footer appear; the target decides
//! *what* they look like for a given firmware.

use zfx_core::conventions;

use super::code_builder::CodeBuilder;

/// Firmware-specific emission hooks.
pub trait Target {
    /// Target name (logs and debug output)
    fn name(&self) -> &str;

    /// Emit the `#include` lines every artifact starts with.
    fn emit_includes(&self, builder: &mut CodeBuilder<'_>);

    /// Emit a placement attribute for the entry routine. Most targets need none.
    fn emit_code_section(&self, _builder: &mut CodeBuilder<'_>, _section: &str) {}

    /// Emit the entry routine signature, without body or terminator.
    fn emit_main(&self, builder: &mut CodeBuilder<'_>, function_name: &str, packet_var: &str, length_var: &str);

    /// Emit the footer carrying the program license, if any.
    fn emit_license(&self, builder: &mut CodeBuilder<'_>, license: Option<&str>);
}

/// ZodiacFX firmware (Atmel SAM4E, C99).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodiacfxTarget;

const INCLUDES: &[&str] = &[
    "#include <stdbool.h>",
    "#include <stdint.h>",
    "#include <string.h>",
    "#include \"zodiacfx_model.h\"",
];

impl Target for ZodiacfxTarget {
    fn name(&self) -> &str {
        "zodiacfx"
    }

    fn emit_includes(&self, builder: &mut CodeBuilder<'_>) {
        for include in INCLUDES {
            builder.append_line(include);
        }
    }

    fn emit_main(&self, builder: &mut CodeBuilder<'_>, function_name: &str, packet_var: &str, length_var: &str) {
        builder.append_format(format_args!(
            "void {}(uint8_t *{}, uint16_t {}, uint8_t {})",
            function_name,
            packet_var,
            length_var,
            conventions::PORT_VAR
        ));
    }

    fn emit_license(&self, builder: &mut CodeBuilder<'_>, license: Option<&str>) {
        if let Some(license) = license {
            builder.append_line(&format!("/* License: {} */", license));
        }
    }
}
