//! C code builder - an append-only text buffer with indentation tracking
//!
//! Every phase writes into the same [`CodeBuilder`]; the builder only appends, so the final text is exactly the
//! order in which the orchestrator handed the builder around. Target-specific fragments (includes, the routine
//! signature, the license footer) are reached through [`CodeBuilder::target`].

use std::fmt::{self, Write};

use super::target::Target;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// A buffer for building C source code with proper indentation
pub struct CodeBuilder<'t> {
    buffer: String,
    indent_level: usize,
    indent_width: usize,
    target: &'t dyn Target,
}

impl<'t> CodeBuilder<'t> {
    pub fn new(target: &'t dyn Target) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_width: DEFAULT_INDENT_WIDTH,
            target,
        }
    }

    /// Set the number of spaces per indentation level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Target whose hooks emit includes, signatures and footers
    pub fn target(&self) -> &'t dyn Target {
        self.target
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Current indentation level
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Append raw text
    pub fn append(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Append formatted text
    pub fn append_format(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.buffer.write_fmt(args);
    }

    /// Write a line with current indentation
    pub fn append_line(&mut self, s: &str) {
        self.emit_indent();
        self.buffer.push_str(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn emit_indent(&mut self) {
        let width = self.indent_level * self.indent_width;
        self.spaces(width);
    }

    pub fn spaces(&mut self, count: usize) {
        for _ in 0..count {
            self.buffer.push(' ');
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Open a brace block: `{`, newline, one level deeper.
    pub fn block_start(&mut self) {
        self.buffer.push('{');
        self.newline();
        self.increase_indent();
    }

    /// Close a brace block at the enclosing indentation.
    pub fn block_end(&mut self, newline: bool) {
        self.decrease_indent();
        self.emit_indent();
        self.buffer.push('}');
        if newline {
            self.newline();
        }
    }

    /// Terminate a statement with `;`
    pub fn end_of_statement(&mut self, newline: bool) {
        self.buffer.push(';');
        if newline {
            self.newline();
        }
    }
}

impl fmt::Debug for CodeBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeBuilder")
            .field("target", &self.target.name())
            .field("indent_level", &self.indent_level)
            .field("len", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::target::ZodiacfxTarget;

    static TARGET: ZodiacfxTarget = ZodiacfxTarget;

    fn builder() -> CodeBuilder<'static> {
        CodeBuilder::new(&TARGET)
    }

    // ========================================
    // Append tests
    // ========================================

    #[test]
    fn test_new_builder_empty_output() {
        assert_eq!(builder().finish(), "");
    }

    #[test]
    fn test_append_does_not_indent() {
        let mut b = builder();
        b.increase_indent();
        b.append("x");
        assert_eq!(b.finish(), "x");
    }

    #[test]
    fn test_append_format() {
        let mut b = builder();
        b.append_format(format_args!("goto {};", "start"));
        assert_eq!(b.finish(), "goto start;");
    }

    #[test]
    fn test_append_line_indents() {
        let mut b = builder();
        b.increase_indent();
        b.append_line("int x;");
        assert_eq!(b.finish(), "    int x;\n");
    }

    // ========================================
    // Indentation tests
    // ========================================

    #[test]
    fn test_decrease_indent_saturates() {
        let mut b = builder();
        b.decrease_indent();
        assert_eq!(b.indent_level(), 0);
    }

    #[test]
    fn test_custom_indent_width() {
        let mut b = builder().with_indent_width(2);
        b.increase_indent();
        b.increase_indent();
        b.emit_indent();
        assert_eq!(b.finish(), "    ");
    }

    // ========================================
    // Block tests
    // ========================================

    #[test]
    fn test_block_roundtrip() {
        let mut b = builder();
        b.append("void f() ");
        b.block_start();
        b.append_line("return;");
        b.block_end(true);
        assert_eq!(b.finish(), "void f() {\n    return;\n}\n");
    }

    #[test]
    fn test_nested_blocks() {
        let mut b = builder();
        b.block_start();
        b.emit_indent();
        b.block_start();
        b.append_line("x = 1;");
        b.block_end(true);
        b.block_end(false);
        assert_eq!(b.finish(), "{\n    {\n        x = 1;\n    }\n}");
    }

    #[test]
    fn test_struct_terminator() {
        let mut b = builder();
        b.append("struct s ");
        b.block_start();
        b.block_end(false);
        b.end_of_statement(true);
        assert_eq!(b.finish(), "struct s {\n};\n");
    }
}
