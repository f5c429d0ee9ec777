//! Multipart buffer module
//!
//! Typed buffer parts and demultiplexing of one acquisition unit into its
//! depth and intensity channels.

mod demux;
pub mod types;

pub use demux::demux_parts;
pub use types::{BufferPart, BufferPartKind, MultipartBuffer, PixelFormat};
