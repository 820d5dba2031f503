//! The sequence object surfaced by the parser.
//!
//! A `Sequence` describes one completed control action: its classification,
//! the resolved command, the final code point, collected intermediates,
//! numeric arguments, and (for designation sequences) the identified
//! character set. The parser owns a single reusable `Sequence`; `feed`
//! hands out a borrow that stays valid until the next `feed` or `reset`.

use crate::arg::SeqArg;
use crate::charset::Charset;
use crate::command::Command;

/// Number of argument slots. Further arguments collapse into the last
/// slot while `n_args` keeps counting.
pub const MAX_ARGS: usize = 16;

/// Cap on OSC/DCS payload accumulation, in bytes. Input past the cap is
/// dropped.
pub(crate) const MAX_STRING: usize = 65536;

/// Bit position of an intermediate (or parameter-prefix) code point in the
/// intermediates mask.
#[inline]
pub const fn intermediate_bit(c: u32) -> u32 {
    1 << (c - 0x20)
}

/// Classification of a completed (or in-progress) sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqType {
    /// Still accumulating; the sequence object is not meaningful.
    None,
    /// Input consumed with no effect (aborted or malformed sequence).
    Ignore,
    /// A printable code point.
    Graphic,
    /// A C0 or C1 control function.
    Control,
    /// An ESC sequence (including charset designations).
    Escape,
    /// A control sequence (CSI final received).
    Csi,
    /// A device control string (terminated by ST).
    Dcs,
    /// An operating system command (terminated by ST or BEL).
    Osc,
    /// Start-of-string data, consumed without a payload.
    Sos,
    /// Privacy message, consumed without a payload.
    Pm,
    /// Application program command, consumed without a payload.
    Apc,
}

/// One decoded control sequence.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub(crate) seq_type: SeqType,
    pub(crate) command: Command,
    pub(crate) terminator: u32,
    pub(crate) intermediates: u32,
    pub(crate) charset: Charset,
    pub(crate) args: [SeqArg; MAX_ARGS],
    pub(crate) n_args: usize,
    pub(crate) n_final_args: usize,
    pub(crate) data: String,
}

impl Sequence {
    pub(crate) fn new() -> Self {
        Sequence {
            seq_type: SeqType::None,
            command: Command::None,
            terminator: 0,
            intermediates: 0,
            charset: Charset::None,
            args: [SeqArg::DEFAULT; MAX_ARGS],
            n_args: 0,
            n_final_args: 0,
            data: String::new(),
        }
    }

    /// Reset everything accumulated for the next sequence.
    pub(crate) fn clear(&mut self) {
        self.seq_type = SeqType::None;
        self.command = Command::None;
        self.terminator = 0;
        self.intermediates = 0;
        self.charset = Charset::None;
        self.args = [SeqArg::DEFAULT; MAX_ARGS];
        self.n_args = 0;
        self.n_final_args = 0;
        self.data.clear();
    }

    pub fn seq_type(&self) -> SeqType {
        self.seq_type
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// The code point that closed the sequence. For GRAPHIC this is the
    /// graphic code point itself.
    pub fn terminator(&self) -> u32 {
        self.terminator
    }

    /// Bitmask over `0x20..=0x2F` intermediates; the CSI parameter-prefix
    /// byte (`0x3C..=0x3F`) sets its `c - 0x20` bit in the same mask.
    pub fn intermediates(&self) -> u32 {
        self.intermediates
    }

    /// True iff intermediate `c` was collected.
    pub fn has_intermediate(&self, c: u32) -> bool {
        self.intermediates & intermediate_bit(c) != 0
    }

    /// The designated character set, for GnDm/GnDMm/CnD/DOCS commands.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Argument at `index`, default when out of range.
    pub fn arg(&self, index: usize) -> SeqArg {
        if index < self.n_args.min(MAX_ARGS) {
            self.args[index]
        } else {
            SeqArg::DEFAULT
        }
    }

    /// The populated argument slots.
    pub fn args(&self) -> &[SeqArg] {
        &self.args[..self.n_args.min(MAX_ARGS)]
    }

    /// Logical argument count; may exceed [`MAX_ARGS`] when the input
    /// carried more separators than there are slots.
    pub fn n_args(&self) -> usize {
        self.n_args
    }

    /// Number of top-level (non-subparameter) arguments.
    pub fn n_final_args(&self) -> usize {
        self.n_final_args
    }

    /// The OSC or DCS payload accumulated for this sequence.
    pub fn string(&self) -> &str {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermediate_bit_positions() {
        assert_eq!(intermediate_bit(0x20), 1);
        assert_eq!(intermediate_bit(0x2f), 1 << 0x0f);
        assert_eq!(intermediate_bit(0x3f), 1 << 0x1f);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut seq = Sequence::new();
        seq.seq_type = SeqType::Csi;
        seq.command = Command::Sgr;
        seq.terminator = 0x6d;
        seq.intermediates = intermediate_bit(0x24);
        seq.args[0].push(b'3' as u32);
        seq.n_args = 1;
        seq.n_final_args = 1;
        seq.data.push('x');

        seq.clear();
        assert_eq!(seq.seq_type(), SeqType::None);
        assert_eq!(seq.command(), Command::None);
        assert_eq!(seq.terminator(), 0);
        assert_eq!(seq.intermediates(), 0);
        assert_eq!(seq.n_args(), 0);
        assert_eq!(seq.n_final_args(), 0);
        assert!(seq.arg(0).is_default());
        assert!(seq.string().is_empty());
    }

    #[test]
    fn test_arg_out_of_range_is_default() {
        let seq = Sequence::new();
        assert!(seq.arg(0).is_default());
        assert!(seq.arg(MAX_ARGS + 3).is_default());
    }
}
