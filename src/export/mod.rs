//! Mesh export formats.
//!
//! Only STL is supported: binary for output, binary or ASCII for input.

pub mod stl;

pub use stl::{
    detect_format, export_stl_binary, read_stl, read_stl_file, write_stl_ascii, write_stl_binary,
    write_stl_binary_file, ParseMode, StlFormat,
};
