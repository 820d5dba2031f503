//! VT control-sequence parser.
//!
//! A code-point-oriented state machine following the VT500-series parser
//! model. Each call to [`Parser::feed`] advances the automaton by one code
//! point and reports either [`SeqType::None`] (still accumulating) or the
//! classification of a completed sequence, with the sequence object
//! populated.
//!
//! The parser classifies and structures sequences; it never interprets
//! them. It is deterministic, total over its input alphabet, and allocates
//! nothing on the hot path beyond its one reusable sequence buffer.
//!
//! References:
//! - ECMA-48 / ISO 6429, ECMA-35 / ISO 2022
//! - "A parser for DEC's ANSI-compatible video terminals" by Paul Williams,
//!   https://vt100.net/emu/dec_ansi_parser

use crate::charset;
use crate::command::{self, Command};
use crate::sequence::{intermediate_bit, Sequence, SeqType, MAX_ARGS, MAX_STRING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    OscString,
    /// SOS, PM and APC all consume until ST.
    StIgnore,
}

/// The control-sequence parser.
pub struct Parser {
    state: State,
    seq: Sequence,
    /// CSI/DCS parameter-prefix byte (`<`, `=`, `>`, `?`), 0 when unset.
    param_prefix: u32,
    /// Which of SOS/PM/APC the current StIgnore phase will emit.
    st_kind: SeqType,
    /// String phase suspended by ESC, waiting for `\` to terminate it.
    suspended: Option<State>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A fresh parser in the ground state.
    pub fn new() -> Self {
        Parser {
            state: State::Ground,
            seq: Sequence::new(),
            param_prefix: 0,
            st_kind: SeqType::Sos,
            suspended: None,
        }
    }

    /// Abandon any in-progress sequence and return to ground. Idempotent;
    /// a reset parser behaves exactly like a fresh one.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.seq.clear();
        self.param_prefix = 0;
        self.st_kind = SeqType::Sos;
        self.suspended = None;
    }

    /// Advance the automaton by one code point.
    ///
    /// When the returned status is [`SeqType::None`] the sequence borrow is
    /// not meaningful; for any other status the sequence is fully populated
    /// and stays valid until the next `feed` or `reset`.
    pub fn feed(&mut self, raw: u32) -> (SeqType, &Sequence) {
        // A string phase suspended by ESC either completes on `\` or the
        // held payload is dropped and the escape proceeds normally.
        if let Some(phase) = self.suspended.take() {
            if raw == 0x5c {
                self.state = State::Ground;
                let status = match phase {
                    State::OscString => self.osc_dispatch(raw),
                    State::DcsPassthrough => self.dcs_dispatch(raw),
                    State::StIgnore => self.st_dispatch(raw),
                    _ => self.ignore(raw),
                };
                return (status, &self.seq);
            }
            self.clear();
        }

        let status = match raw {
            // CAN aborts whatever is in progress.
            0x18 => {
                self.state = State::Ground;
                self.ignore(raw)
            }
            // SUB aborts too, but announces itself.
            0x1a => {
                self.state = State::Ground;
                self.execute(raw)
            }
            // ESC opens an escape, cancelling any unfinished sequence. A
            // string phase is suspended rather than cleared so that the
            // `ESC \` form of ST can still complete it.
            0x1b => {
                if self.in_string_phase() {
                    self.suspended = Some(self.state);
                } else {
                    self.clear();
                }
                self.state = State::Escape;
                self.ignore(raw)
            }
            // C1 controls act from any state.
            0x80..=0x8f | 0x91..=0x97 | 0x99 | 0x9a => {
                self.state = State::Ground;
                self.execute(raw)
            }
            0x90 => {
                self.clear();
                self.state = State::DcsEntry;
                self.ignore(raw)
            }
            0x98 | 0x9e | 0x9f => {
                self.clear();
                self.st_kind = match raw {
                    0x98 => SeqType::Sos,
                    0x9e => SeqType::Pm,
                    _ => SeqType::Apc,
                };
                self.state = State::StIgnore;
                self.ignore(raw)
            }
            0x9b => {
                self.clear();
                self.state = State::CsiEntry;
                self.ignore(raw)
            }
            0x9c => {
                let prev = self.state;
                self.state = State::Ground;
                match prev {
                    State::OscString => self.osc_dispatch(raw),
                    State::DcsPassthrough => self.dcs_dispatch(raw),
                    State::StIgnore => self.st_dispatch(raw),
                    _ => self.ignore(raw),
                }
            }
            0x9d => {
                self.clear();
                self.state = State::OscString;
                self.ignore(raw)
            }
            _ => self.advance(raw),
        };
        (status, &self.seq)
    }

    fn advance(&mut self, raw: u32) -> SeqType {
        match self.state {
            State::Ground => self.ground(raw),
            State::Escape => self.escape(raw),
            State::EscapeIntermediate => self.escape_intermediate(raw),
            State::CsiEntry => self.csi_entry(raw),
            State::CsiParam => self.csi_param(raw),
            State::CsiIntermediate => self.csi_intermediate(raw),
            State::CsiIgnore => self.csi_ignore(raw),
            State::DcsEntry => self.dcs_entry(raw),
            State::DcsParam => self.dcs_param(raw),
            State::DcsIntermediate => self.dcs_intermediate(raw),
            State::DcsPassthrough => self.dcs_passthrough(raw),
            State::DcsIgnore => self.dcs_ignore(raw),
            State::OscString => self.osc_string(raw),
            State::StIgnore => self.st_ignore(raw),
        }
    }

    fn in_string_phase(&self) -> bool {
        matches!(
            self.state,
            State::OscString | State::DcsPassthrough | State::StIgnore
        )
    }

    // ------------------------------------------------------------------
    // Per-state transitions
    // ------------------------------------------------------------------

    fn ground(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => self.execute(raw),
            // DEL is emitted as a graphic here; downstream decides.
            _ => self.print(raw),
        }
    }

    fn escape(&mut self, raw: u32) -> SeqType {
        match raw {
            // A C0 control ends the escape; ESC followed by a C0 final
            // never produces an ESCAPE sequence.
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => {
                self.state = State::Ground;
                self.execute(raw)
            }
            0x20..=0x2f => {
                self.collect(raw);
                self.state = State::EscapeIntermediate;
                SeqType::None
            }
            0x50 => {
                // DCS
                self.clear();
                self.state = State::DcsEntry;
                SeqType::None
            }
            0x58 | 0x5e | 0x5f => {
                // SOS / PM / APC
                self.clear();
                self.st_kind = match raw {
                    0x58 => SeqType::Sos,
                    0x5e => SeqType::Pm,
                    _ => SeqType::Apc,
                };
                self.state = State::StIgnore;
                SeqType::None
            }
            0x5b => {
                // CSI
                self.clear();
                self.state = State::CsiEntry;
                SeqType::None
            }
            0x5d => {
                // OSC
                self.clear();
                self.state = State::OscString;
                SeqType::None
            }
            0x30..=0x7e => {
                self.state = State::Ground;
                self.esc_dispatch(raw)
            }
            0x7f => SeqType::None,
            _ => {
                self.state = State::Ground;
                self.ignore(raw)
            }
        }
    }

    fn escape_intermediate(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => {
                self.state = State::Ground;
                self.execute(raw)
            }
            0x20..=0x2f => {
                self.collect(raw);
                SeqType::None
            }
            0x30..=0x7e => {
                self.state = State::Ground;
                self.esc_dispatch(raw)
            }
            0x7f => SeqType::None,
            _ => {
                self.state = State::Ground;
                self.ignore(raw)
            }
        }
    }

    fn csi_entry(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => self.execute(raw),
            0x20..=0x2f => {
                self.collect(raw);
                self.state = State::CsiIntermediate;
                SeqType::None
            }
            0x30..=0x39 => {
                self.param_digit(raw);
                self.state = State::CsiParam;
                SeqType::None
            }
            0x3a => {
                self.finish_arg(true);
                self.state = State::CsiParam;
                SeqType::None
            }
            0x3b => {
                self.finish_arg(false);
                self.state = State::CsiParam;
                SeqType::None
            }
            0x3c..=0x3f => {
                self.param_prefix = raw;
                self.collect(raw);
                self.state = State::CsiParam;
                SeqType::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(raw)
            }
            0x7f => SeqType::None,
            _ => {
                self.state = State::CsiIgnore;
                SeqType::None
            }
        }
    }

    fn csi_param(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => self.execute(raw),
            0x20..=0x2f => {
                self.collect(raw);
                self.state = State::CsiIntermediate;
                SeqType::None
            }
            0x30..=0x39 => {
                self.param_digit(raw);
                SeqType::None
            }
            0x3a => {
                self.finish_arg(true);
                SeqType::None
            }
            0x3b => {
                self.finish_arg(false);
                SeqType::None
            }
            // A second parameter prefix is malformed.
            0x3c..=0x3f => {
                self.state = State::CsiIgnore;
                SeqType::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(raw)
            }
            0x7f => SeqType::None,
            _ => {
                self.state = State::CsiIgnore;
                SeqType::None
            }
        }
    }

    fn csi_intermediate(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => self.execute(raw),
            0x20..=0x2f => {
                self.collect(raw);
                SeqType::None
            }
            // Parameters may not follow intermediates.
            0x30..=0x3f => {
                self.state = State::CsiIgnore;
                SeqType::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(raw)
            }
            0x7f => SeqType::None,
            _ => {
                self.state = State::CsiIgnore;
                SeqType::None
            }
        }
    }

    fn csi_ignore(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => self.execute(raw),
            0x40..=0x7e => {
                self.state = State::Ground;
                self.ignore(raw)
            }
            _ => SeqType::None,
        }
    }

    fn dcs_entry(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => SeqType::None,
            0x20..=0x2f => {
                self.collect(raw);
                self.state = State::DcsIntermediate;
                SeqType::None
            }
            0x30..=0x39 => {
                self.param_digit(raw);
                self.state = State::DcsParam;
                SeqType::None
            }
            0x3a => {
                self.finish_arg(true);
                self.state = State::DcsParam;
                SeqType::None
            }
            0x3b => {
                self.finish_arg(false);
                self.state = State::DcsParam;
                SeqType::None
            }
            0x3c..=0x3f => {
                self.param_prefix = raw;
                self.collect(raw);
                self.state = State::DcsParam;
                SeqType::None
            }
            0x40..=0x7e => self.dcs_hook(raw),
            0x7f => SeqType::None,
            _ => {
                self.state = State::DcsIgnore;
                SeqType::None
            }
        }
    }

    fn dcs_param(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => SeqType::None,
            0x20..=0x2f => {
                self.collect(raw);
                self.state = State::DcsIntermediate;
                SeqType::None
            }
            0x30..=0x39 => {
                self.param_digit(raw);
                SeqType::None
            }
            0x3a => {
                self.finish_arg(true);
                SeqType::None
            }
            0x3b => {
                self.finish_arg(false);
                SeqType::None
            }
            0x3c..=0x3f => {
                self.state = State::DcsIgnore;
                SeqType::None
            }
            0x40..=0x7e => self.dcs_hook(raw),
            0x7f => SeqType::None,
            _ => {
                self.state = State::DcsIgnore;
                SeqType::None
            }
        }
    }

    fn dcs_intermediate(&mut self, raw: u32) -> SeqType {
        match raw {
            0x00..=0x17 | 0x19 | 0x1c..=0x1f => SeqType::None,
            0x20..=0x2f => {
                self.collect(raw);
                SeqType::None
            }
            0x30..=0x3f => {
                self.state = State::DcsIgnore;
                SeqType::None
            }
            0x40..=0x7e => self.dcs_hook(raw),
            0x7f => SeqType::None,
            _ => {
                self.state = State::DcsIgnore;
                SeqType::None
            }
        }
    }

    fn dcs_passthrough(&mut self, raw: u32) -> SeqType {
        match raw {
            0x7f => SeqType::None,
            _ => {
                self.push_string(raw);
                SeqType::None
            }
        }
    }

    fn dcs_ignore(&mut self, _raw: u32) -> SeqType {
        SeqType::None
    }

    fn osc_string(&mut self, raw: u32) -> SeqType {
        match raw {
            0x07 => {
                // BEL terminates like ST, xterm style.
                self.state = State::Ground;
                self.osc_dispatch(raw)
            }
            0x00..=0x06 | 0x08..=0x17 | 0x19 | 0x1c..=0x1f | 0x7f => SeqType::None,
            _ => {
                self.push_string(raw);
                SeqType::None
            }
        }
    }

    fn st_ignore(&mut self, _raw: u32) -> SeqType {
        SeqType::None
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn clear(&mut self) {
        self.seq.clear();
        self.param_prefix = 0;
    }

    fn collect(&mut self, raw: u32) {
        self.seq.intermediates |= intermediate_bit(raw);
    }

    fn param_digit(&mut self, raw: u32) {
        let index = self.seq.n_args.min(MAX_ARGS - 1);
        self.seq.args[index].push(raw);
    }

    fn finish_arg(&mut self, nonfinal: bool) {
        let index = self.seq.n_args.min(MAX_ARGS - 1);
        self.seq.args[index].finish(nonfinal);
        self.seq.n_args += 1;
        if !nonfinal {
            self.seq.n_final_args += 1;
        }
    }

    /// Close the argument in progress at a final byte. A sequence with no
    /// separators and no digits has no arguments at all.
    fn finish_trailing_arg(&mut self) {
        let index = self.seq.n_args.min(MAX_ARGS - 1);
        if self.seq.n_args > 0 || self.seq.args[index].is_started() {
            self.finish_arg(false);
        }
    }

    fn push_string(&mut self, raw: u32) {
        if self.seq.data.len() < MAX_STRING {
            self.seq
                .data
                .push(char::from_u32(raw).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }

    fn ignore(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = SeqType::Ignore;
        self.seq.command = Command::None;
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn print(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = SeqType::Graphic;
        self.seq.command = Command::Graphic;
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn execute(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = SeqType::Control;
        self.seq.command = if raw < 0x20 {
            command::C0_COMMANDS[raw as usize]
        } else {
            command::from_c1(raw)
        };
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn esc_dispatch(&mut self, raw: u32) -> SeqType {
        let (cmd, cs) = charset::resolve(self.seq.intermediates, raw);
        self.seq.seq_type = SeqType::Escape;
        self.seq.command = cmd;
        self.seq.charset = cs;
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn csi_dispatch(&mut self, raw: u32) -> SeqType {
        self.finish_trailing_arg();
        self.seq.seq_type = SeqType::Csi;
        self.seq.command =
            command::lookup_csi(self.seq.intermediates & 0xffff, self.param_prefix, raw);
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    /// DCS final byte: resolve the command, then fall into passthrough
    /// until ST.
    fn dcs_hook(&mut self, raw: u32) -> SeqType {
        self.finish_trailing_arg();
        self.seq.command =
            command::lookup_dcs(self.seq.intermediates & 0xffff, self.param_prefix, raw);
        self.seq.terminator = raw;
        self.seq.data.clear();
        self.state = State::DcsPassthrough;
        SeqType::None
    }

    fn dcs_dispatch(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = SeqType::Dcs;
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn osc_dispatch(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = SeqType::Osc;
        self.seq.command = Command::Osc;
        self.seq.terminator = raw;
        self.seq.seq_type
    }

    fn st_dispatch(&mut self, raw: u32) -> SeqType {
        self.seq.seq_type = self.st_kind;
        self.seq.command = Command::None;
        self.seq.terminator = raw;
        self.seq.seq_type
    }
}
