//! termseq-parser — VT control sequence parser.
//!
//! This crate implements the state machine at the heart of a VT-style
//! terminal: a code-point-oriented automaton that turns an input stream
//! into discrete, fully-decoded control sequences and graphic characters.
//!
//! The parser:
//! - classifies every code point (C0/C1/graphic/escape phases)
//! - accumulates numeric parameters with sub-parameter (`:`) recognition
//!   and overflow clamping
//! - collects intermediates into a bitmask and resolves commands from them
//! - decodes ISO-2022 charset designations (GnDm, GnDMm, CnD, DOCS)
//! - accepts both the 7-bit (`ESC [`) and 8-bit (`0x9B`) encodings of the
//!   same logical sequences
//!
//! It deliberately does **not** interpret sequences: no cursor, no colors,
//! no screen. Interpretation belongs to the consumer of [`Sequence`].
//! UTF-8 decoding likewise happens upstream; `feed` takes code points.
//!
//! ```
//! use termseq_parser::{Parser, SeqType, Command};
//!
//! let mut parser = Parser::new();
//! let mut last = None;
//! for c in "\x1b[1;31m".chars() {
//!     let (status, seq) = parser.feed(c as u32);
//!     if status == SeqType::Csi {
//!         last = Some((seq.command(), seq.arg(0).value(), seq.arg(1).value()));
//!     }
//! }
//! assert_eq!(last, Some((Command::Sgr, 1, 31)));
//! ```

mod arg;
pub mod charset;
mod command;
mod parser;
mod sequence;

pub use arg::{SeqArg, ARG_MAX};
pub use charset::Charset;
pub use command::Command;
pub use parser::Parser;
pub use sequence::{intermediate_bit, SeqType, Sequence, MAX_ARGS};
