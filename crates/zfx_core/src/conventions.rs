//! Shared code-generation conventions (well-known identifiers in the emitted C).

/// Entry routine generated for every program.
pub const ENTRY_ROUTINE: &str = "packet_in";

/// Raw packet buffer parameter of the entry routine.
pub const PACKET_VAR: &str = "p_uc_data";

/// Packet length parameter; the deparser keeps it current, the device-write call reads it.
pub const PACKET_LENGTH_VAR: &str = "zodiacfx_ul_size";

/// Ingress port parameter.
pub const PORT_VAR: &str = "port";

/// Byte cursor into the packet.
pub const OFFSET_VAR: &str = "offset";

/// Pointer aliasing the start of the packet buffer.
pub const PACKET_START_VAR: &str = "packetStart";

/// Parser entry state label.
pub const START_LABEL: &str = "start";

/// Parser accept state label; the pipeline starts here.
pub const ACCEPT_LABEL: &str = "accept";

/// Parser reject state label.
pub const REJECT_LABEL: &str = "reject";

/// Firmware routine that transmits the finished packet.
pub const DEVICE_WRITE: &str = "gmac_write";

/// Include guard of the generated header.
pub const HEADER_GUARD: &str = "_P4_GEN_HEADER_";

/// Field added to every generated header struct to track validity.
pub const HEADER_VALID_FIELD: &str = "valid";

/// Bit mask helper emitted in the preamble.
pub const MASK_MACRO: &str = "#define ZODIACFX_MASK(t, w) ((((t)(1)) << (w)) - (t)1)";

/// Bit-width to byte-count helper emitted in the preamble.
pub const BYTES_MACRO: &str = "#define BYTES(w) ((w) / 8)";

/// Default tool name written into generated banners.
pub const TOOL_NAME: &str = "zfxc";
