//! Low-level byte I/O over in-memory buffers
//!
//! This module provides the byte order strategies plus the bounds-checked
//! cursor and patchable writer used by the Exif codec.

pub mod byte_order;
pub mod cursor;
pub mod writer;

pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use cursor::ByteCursor;
pub use writer::{ByteWriter, PatchSlot};
