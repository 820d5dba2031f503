//! Control function identifiers and their lookup tables.
//!
//! Commands are resolved from the classification the state machine already
//! made: C0/C1 controls index fixed tables, ESC finals resolve through the
//! designation logic in [`crate::charset`] with the plain escape table as
//! fallback, and CSI/DCS finals key on (intermediates, parameter prefix,
//! final byte). Unknown combinations resolve to [`Command::None`] without
//! changing the sequence type.

use crate::sequence::intermediate_bit;

const INT_SPACE: u32 = intermediate_bit(0x20);
const INT_BANG: u32 = intermediate_bit(0x21);
const INT_DQUOTE: u32 = intermediate_bit(0x22);
const INT_HASH: u32 = intermediate_bit(0x23);
const INT_DOLLAR: u32 = intermediate_bit(0x24);
const INT_PLUS: u32 = intermediate_bit(0x2b);

/// Symbolic identifier of a control function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No known control function matched.
    None,
    /// A printable code point.
    Graphic,

    // C0 controls
    Nul,
    Enq,
    Bel,
    Bs,
    Ht,
    Lf,
    Vt,
    Ff,
    Cr,
    So,
    Si,
    Dc1,
    Dc3,
    Sub,

    // C1 controls and their ESC Fe aliases
    Ind,
    Nel,
    Hts,
    Ri,
    Ss2,
    Ss3,
    Spa,
    Epa,
    Decid,
    St,
    Osc,

    // Plain ESC sequences
    Decbi,
    Decsc,
    Decrc,
    Decfi,
    Deckpam,
    Deckpnm,
    Ris,
    Ls2,
    Ls3,
    Ls1r,
    Ls2r,
    Ls3r,
    DecdhlTop,
    DecdhlBottom,
    Decswl,
    Decdwl,
    Decaln,
    S7c1t,
    S8c1t,

    // Designation commands (charset carried in `Sequence::charset`)
    GnDm,
    GnDMm,
    CnD,
    Docs,

    // CSI, ECMA-48 core and xterm
    Ich,
    Cuu,
    Cud,
    Cuf,
    Cub,
    Cnl,
    Cpl,
    Cha,
    Cup,
    Cht,
    Ed,
    El,
    Il,
    Dl,
    Dch,
    Su,
    Sd,
    Ech,
    Cbt,
    Hpa,
    Hpr,
    Rep,
    Da1,
    Da2,
    Da3,
    Vpa,
    Vpr,
    Hvp,
    Tbc,
    Sm,
    Rm,
    Sgr,
    Dsr,
    Mc,
    Hpb,
    Vpb,
    Decstbm,
    XtermWm,

    // CSI, DEC private (parameter prefix `?`) and intermediate-selected
    Decset,
    Decrst,
    Decdsr,
    Decsed,
    Decsel,
    Decmc,
    Decscusr,
    Decstr,
    Decscl,
    Decsca,
    Decrqm,
    DecrqmDec,
    Sl,
    Sr,

    // DCS
    Decsixel,
    Decrqss,
    Decdld,
    Decudk,
    XtGetTcap,
}

/// C0 control functions, indexed by code point. Unassigned slots are
/// `None`; CAN and ESC never reach this table.
pub(crate) static C0_COMMANDS: [Command; 32] = [
    Command::Nul,  // 0x00
    Command::None, // 0x01 SOH
    Command::None, // 0x02 STX
    Command::None, // 0x03 ETX
    Command::None, // 0x04 EOT
    Command::Enq,  // 0x05
    Command::None, // 0x06 ACK
    Command::Bel,  // 0x07
    Command::Bs,   // 0x08
    Command::Ht,   // 0x09
    Command::Lf,   // 0x0a
    Command::Vt,   // 0x0b
    Command::Ff,   // 0x0c
    Command::Cr,   // 0x0d
    Command::So,   // 0x0e
    Command::Si,   // 0x0f
    Command::None, // 0x10 DLE
    Command::Dc1,  // 0x11
    Command::None, // 0x12 DC2
    Command::Dc3,  // 0x13
    Command::None, // 0x14 DC4
    Command::None, // 0x15 NAK
    Command::None, // 0x16 SYN
    Command::None, // 0x17 ETB
    Command::None, // 0x18 CAN
    Command::None, // 0x19 EM
    Command::Sub,  // 0x1a
    Command::None, // 0x1b ESC
    Command::None, // 0x1c FS
    Command::None, // 0x1d GS
    Command::None, // 0x1e RS
    Command::None, // 0x1f US
];

/// C1 control functions. The string and CSI openers are handled by the
/// state machine before this table is consulted.
pub(crate) fn from_c1(raw: u32) -> Command {
    match raw {
        0x84 => Command::Ind,
        0x85 => Command::Nel,
        0x88 => Command::Hts,
        0x8d => Command::Ri,
        0x8e => Command::Ss2,
        0x8f => Command::Ss3,
        0x96 => Command::Spa,
        0x97 => Command::Epa,
        0x9a => Command::Decid,
        _ => Command::None,
    }
}

/// ESC sequences that are not charset designations.
pub(crate) fn lookup_esc(intermediates: u32, final_ch: u32) -> Command {
    if intermediates == 0 {
        return match final_ch {
            0x36 => Command::Decbi,   // 6
            0x37 => Command::Decsc,   // 7
            0x38 => Command::Decrc,   // 8
            0x39 => Command::Decfi,   // 9
            0x3d => Command::Deckpam, // =
            0x3e => Command::Deckpnm, // >
            0x44 => Command::Ind,     // D
            0x45 => Command::Nel,     // E
            0x48 => Command::Hts,     // H
            0x4d => Command::Ri,      // M
            0x4e => Command::Ss2,     // N
            0x4f => Command::Ss3,     // O
            0x56 => Command::Spa,     // V
            0x57 => Command::Epa,     // W
            0x5a => Command::Decid,   // Z
            0x5c => Command::St,      // \
            0x63 => Command::Ris,     // c
            0x6e => Command::Ls2,     // n
            0x6f => Command::Ls3,     // o
            0x7c => Command::Ls3r,    // |
            0x7d => Command::Ls2r,    // }
            0x7e => Command::Ls1r,    // ~
            _ => Command::None,
        };
    }
    match (intermediates, final_ch) {
        (INT_HASH, 0x33) => Command::DecdhlTop,
        (INT_HASH, 0x34) => Command::DecdhlBottom,
        (INT_HASH, 0x35) => Command::Decswl,
        (INT_HASH, 0x36) => Command::Decdwl,
        (INT_HASH, 0x38) => Command::Decaln,
        (INT_SPACE, 0x46) => Command::S7c1t,
        (INT_SPACE, 0x47) => Command::S8c1t,
        _ => Command::None,
    }
}

/// Control sequences: (intermediates, parameter prefix, final byte).
pub(crate) fn lookup_csi(intermediates: u32, prefix: u32, final_ch: u32) -> Command {
    if intermediates == 0 && prefix == 0 {
        return match final_ch {
            0x40 => Command::Ich, // @
            0x41 => Command::Cuu, // A
            0x42 => Command::Cud, // B
            0x43 => Command::Cuf, // C
            0x44 => Command::Cub, // D
            0x45 => Command::Cnl, // E
            0x46 => Command::Cpl, // F
            0x47 => Command::Cha, // G
            0x48 => Command::Cup, // H
            0x49 => Command::Cht, // I
            0x4a => Command::Ed,  // J
            0x4b => Command::El,  // K
            0x4c => Command::Il,  // L
            0x4d => Command::Dl,  // M
            0x50 => Command::Dch, // P
            0x53 => Command::Su,  // S
            0x54 => Command::Sd,  // T
            0x58 => Command::Ech, // X
            0x5a => Command::Cbt, // Z
            0x60 => Command::Hpa, // `
            0x61 => Command::Hpr, // a
            0x62 => Command::Rep, // b
            0x63 => Command::Da1, // c
            0x64 => Command::Vpa, // d
            0x65 => Command::Vpr, // e
            0x66 => Command::Hvp, // f
            0x67 => Command::Tbc, // g
            0x68 => Command::Sm,  // h
            0x69 => Command::Mc,  // i
            0x6a => Command::Hpb, // j
            0x6b => Command::Vpb, // k
            0x6c => Command::Rm,  // l
            0x6d => Command::Sgr, // m
            0x6e => Command::Dsr, // n
            0x72 => Command::Decstbm, // r
            0x74 => Command::XtermWm, // t
            _ => Command::None,
        };
    }
    if intermediates == 0 {
        return match (prefix, final_ch) {
            (0x3f, 0x68) => Command::Decset, // ? h
            (0x3f, 0x6c) => Command::Decrst, // ? l
            (0x3f, 0x6e) => Command::Decdsr, // ? n
            (0x3f, 0x4a) => Command::Decsed, // ? J
            (0x3f, 0x4b) => Command::Decsel, // ? K
            (0x3f, 0x69) => Command::Decmc,  // ? i
            (0x3e, 0x63) => Command::Da2,    // > c
            (0x3d, 0x63) => Command::Da3,    // = c
            _ => Command::None,
        };
    }
    match (intermediates, prefix, final_ch) {
        (INT_SPACE, 0, 0x40) => Command::Sl,       // SP @
        (INT_SPACE, 0, 0x41) => Command::Sr,       // SP A
        (INT_SPACE, 0, 0x71) => Command::Decscusr, // SP q
        (INT_BANG, 0, 0x70) => Command::Decstr,    // ! p
        (INT_DQUOTE, 0, 0x70) => Command::Decscl,  // " p
        (INT_DQUOTE, 0, 0x71) => Command::Decsca,  // " q
        (INT_DOLLAR, 0, 0x70) => Command::Decrqm,  // $ p
        (INT_DOLLAR, 0x3f, 0x70) => Command::DecrqmDec, // ? $ p
        _ => Command::None,
    }
}

/// Device control strings, resolved at the final byte before the data
/// phase starts.
pub(crate) fn lookup_dcs(intermediates: u32, prefix: u32, final_ch: u32) -> Command {
    match (intermediates, prefix, final_ch) {
        (0, 0, 0x71) => Command::Decsixel,          // q
        (INT_DOLLAR, 0, 0x71) => Command::Decrqss,  // $ q
        (INT_PLUS, 0, 0x71) => Command::XtGetTcap,  // + q
        (0, 0, 0x7b) => Command::Decdld,            // {
        (0, 0, 0x7c) => Command::Decudk,            // |
        _ => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c0_table() {
        assert_eq!(C0_COMMANDS[0x00], Command::Nul);
        assert_eq!(C0_COMMANDS[0x07], Command::Bel);
        assert_eq!(C0_COMMANDS[0x0a], Command::Lf);
        assert_eq!(C0_COMMANDS[0x0d], Command::Cr);
        assert_eq!(C0_COMMANDS[0x1a], Command::Sub);
        assert_eq!(C0_COMMANDS[0x01], Command::None);
    }

    #[test]
    fn test_c1_commands() {
        assert_eq!(from_c1(0x84), Command::Ind);
        assert_eq!(from_c1(0x85), Command::Nel);
        assert_eq!(from_c1(0x8d), Command::Ri);
        assert_eq!(from_c1(0x9a), Command::Decid);
        assert_eq!(from_c1(0x80), Command::None);
    }

    #[test]
    fn test_esc_c1_aliases_match_c1_table() {
        // ESC D/E/H/M/N/O/V/W/Z are the 7-bit forms of the C1 controls.
        for (f, c1) in [
            (0x44u32, 0x84u32),
            (0x45, 0x85),
            (0x48, 0x88),
            (0x4d, 0x8d),
            (0x4e, 0x8e),
            (0x4f, 0x8f),
            (0x56, 0x96),
            (0x57, 0x97),
            (0x5a, 0x9a),
        ] {
            assert_eq!(lookup_esc(0, f), from_c1(c1));
        }
    }

    #[test]
    fn test_csi_lookup() {
        assert_eq!(lookup_csi(0, 0, 0x6d), Command::Sgr);
        assert_eq!(lookup_csi(0, 0, 0x48), Command::Cup);
        assert_eq!(lookup_csi(0, 0x3f, 0x68), Command::Decset);
        assert_eq!(lookup_csi(0, 0x3e, 0x63), Command::Da2);
        assert_eq!(lookup_csi(INT_SPACE, 0, 0x71), Command::Decscusr);
        assert_eq!(lookup_csi(INT_BANG, 0, 0x70), Command::Decstr);
        assert_eq!(lookup_csi(INT_DOLLAR, 0x3f, 0x70), Command::DecrqmDec);
        assert_eq!(lookup_csi(INT_HASH, 0, 0x6d), Command::None);
    }

    #[test]
    fn test_dcs_lookup() {
        assert_eq!(lookup_dcs(0, 0, 0x71), Command::Decsixel);
        assert_eq!(lookup_dcs(INT_DOLLAR, 0, 0x71), Command::Decrqss);
        assert_eq!(lookup_dcs(0, 0, 0x7c), Command::Decudk);
        assert_eq!(lookup_dcs(0, 0, 0x41), Command::None);
    }
}
