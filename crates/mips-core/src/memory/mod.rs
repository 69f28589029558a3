//! Memory model primitives: segment map, bounds policy, and the address space.

/// Byte and word bounds-checking helpers.
pub mod access;
/// Segment tags, base constants, and address normalization.
pub mod map;
/// Fixed-length segment storage.
pub mod segment;
/// Register file plus segments for one emulated run.
pub mod space;

pub use access::{validate_byte_access, validate_word_access, WORD_ACCESS_BYTES};
pub use map::{parse_hex_u32, Address, AddressParseError, SegmentKind, DATA_BASE, TEXT_BASE};
pub use segment::Segment;
pub use space::AddressSpace;
