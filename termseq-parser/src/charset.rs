//! ISO-2022 character-set designation.
//!
//! ESC sequences whose intermediates name a designation target resolve to
//! one of the GnDm/GnDMm/CnD/DOCS commands plus a charset identifier looked
//! up in a static table indexed by the final byte. The tables cover the
//! DEC SCS assignments and the ISO registry entries terminals actually
//! meet; everything else resolves to [`Charset::None`], or
//! [`Charset::Drcs`] for the soft-font designators (SP before the final).

use crate::command::{self, Command};
use crate::sequence::intermediate_bit;

/// An identified character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// No (or no known) charset designated.
    None,
    /// A dynamically redefinable (soft font) set.
    Drcs,

    // DEC and national replacement 94-character sets
    DecSpecialGraphic,
    DecAlternateCharacter,
    DecAlternateGraphic,
    DecSupplemental,
    DecSupplementalGraphic,
    DecTechnical,
    DecHebrew,
    DecGreek,
    DecTurkish,
    DecCyrillic,
    Ascii,
    IsoIr2,
    BritishNrcs,
    CubanNrcs,
    DutchNrcs,
    FinnishNrcs,
    FrenchNrcs,
    FrenchCanadianNrcs,
    GermanNrcs,
    GreekNrcs,
    HebrewNrcs,
    ItalianNrcs,
    JisKatakana,
    JisRoman,
    NorwegianDanishNrcs,
    PortugueseNrcs,
    RussianNrcs,
    SerboCroatianNrcs,
    SpanishNrcs,
    SwedishNrcs,
    SwissNrcs,
    TurkishNrcs,

    // 96-character sets (ISO 8859 right halves)
    Latin1,
    Latin2,
    Latin3,
    Latin4,
    Latin5,
    LatinCyrillic,
    Greek,
    Arabic,
    Hebrew,

    // Multibyte 94^n sets
    Jis0208_1978,
    Jis0208,
    Jis0212,
    Gb2312,
    Ksc5601,
    IsoIr165,
    Cns11643_1,
    Cns11643_2,
    Cns11643_3,
    Cns11643_4,
    Cns11643_5,
    Cns11643_6,
    Cns11643_7,

    // Registered C0 control sets
    IsoIr1,
    IsoIr7,
    IsoIr26,
    IsoIr36,
    IsoIr48,
    IsoIr74,
    IsoIr104,
    IsoIr106,

    // Registered C1 control sets
    IsoIr40,
    IsoIr56,
    IsoIr67,
    IsoIr77,
    IsoIr124,
    IsoIr133,

    // Other coding systems
    Iso2022,
    Utf1,
    Utf8,
    Ucs2,
    Ucs4,
}

use Charset::*;

/// Single-byte 94-sets: `ESC ( F` .. `ESC + F`, finals 0x30..=0x7E.
pub static GRAPHIC_94: [Charset; 79] = [
    DecSpecialGraphic,     // 0
    DecAlternateCharacter, // 1
    DecAlternateGraphic,   // 2
    None,                  // 3
    DutchNrcs,             // 4
    FinnishNrcs,           // 5
    NorwegianDanishNrcs,   // 6
    SwedishNrcs,           // 7
    None,                  // 8
    FrenchCanadianNrcs,    // 9
    None,                  // :
    None,                  // ;
    DecSupplemental,       // <
    SwissNrcs,             // =
    DecTechnical,          // >
    None,                  // ?
    IsoIr2,                // @
    BritishNrcs,           // A
    Ascii,                 // B
    FinnishNrcs,           // C
    None,                  // D
    NorwegianDanishNrcs,   // E
    None,                  // F
    SwedishNrcs,           // G
    SwedishNrcs,           // H
    JisKatakana,           // I
    JisRoman,              // J
    GermanNrcs,            // K
    PortugueseNrcs,        // L
    None,                  // M
    None,                  // N
    None,                  // O
    None,                  // P
    FrenchCanadianNrcs,    // Q
    FrenchNrcs,            // R
    None,                  // S
    None,                  // T
    None,                  // U
    None,                  // V
    None,                  // W
    None,                  // X
    ItalianNrcs,           // Y
    SpanishNrcs,           // Z
    None,                  // [
    None,                  // back slash
    None,                  // ]
    None,                  // ^
    None,                  // _
    NorwegianDanishNrcs,   // `
    None,                  // a
    None,                  // b
    None,                  // c
    None,                  // d
    None,                  // e
    FrenchNrcs,            // f
    None,                  // g
    None,                  // h
    None,                  // i
    None,                  // j
    None,                  // k
    None,                  // l
    None,                  // m
    None,                  // n
    None,                  // o
    None,                  // p
    None,                  // q
    None,                  // r
    None,                  // s
    None,                  // t
    None,                  // u
    None,                  // v
    None,                  // w
    None,                  // x
    None,                  // y
    None,                  // z
    None,                  // {
    None,                  // |
    None,                  // }
    None,                  // ~
];

/// 94-sets with second intermediate `2/1`, finals from 0x40.
pub static GRAPHIC_94_WITH_2_1: [Charset; 1] = [
    CubanNrcs, // @
];

/// 94-sets with second intermediate `2/2`, finals from 0x30.
pub static GRAPHIC_94_WITH_2_2: [Charset; 16] = [
    None,      // 0
    None,      // 1
    None,      // 2
    None,      // 3
    DecHebrew, // 4
    None,      // 5
    None,      // 6
    None,      // 7
    None,      // 8
    None,      // 9
    None,      // :
    None,      // ;
    None,      // <
    None,      // =
    GreekNrcs, // >
    DecGreek,  // ?
];

/// 94-sets with second intermediate `2/5`, finals from 0x30.
pub static GRAPHIC_94_WITH_2_5: [Charset; 15] = [
    DecTurkish,             // 0
    None,                   // 1
    TurkishNrcs,            // 2
    SerboCroatianNrcs,      // 3
    None,                   // 4
    DecSupplementalGraphic, // 5
    PortugueseNrcs,         // 6
    None,                   // 7
    None,                   // 8
    None,                   // 9
    None,                   // :
    None,                   // ;
    None,                   // <
    HebrewNrcs,             // =
    GreekNrcs,              // >
];

/// 94-sets with second intermediate `2/6`, finals from 0x30.
pub static GRAPHIC_94_WITH_2_6: [Charset; 6] = [
    None,        // 0
    None,        // 1
    None,        // 2
    None,        // 3
    DecCyrillic, // 4
    RussianNrcs, // 5
];

/// Single-byte 96-sets: `ESC - F` .. `ESC / F`, finals from 0x30.
pub static GRAPHIC_96: [Charset; 30] = [
    None,          // 0
    None,          // 1
    None,          // 2
    None,          // 3
    None,          // 4
    None,          // 5
    None,          // 6
    None,          // 7
    None,          // 8
    None,          // 9
    None,          // :
    None,          // ;
    None,          // <
    None,          // =
    None,          // >
    None,          // ?
    None,          // @
    Latin1,        // A
    Latin2,        // B
    Latin3,        // C
    Latin4,        // D
    None,          // E
    Greek,         // F
    Arabic,        // G
    Hebrew,        // H
    None,          // I
    None,          // J
    None,          // K
    LatinCyrillic, // L
    Latin5,        // M
];

/// Multibyte 94^n sets: `ESC $ ( F` etc., finals from 0x30. The bare
/// `ESC $ F` exception for finals `@`, `A`, `B` indexes this table too.
pub static GRAPHIC_94_N: [Charset; 30] = [
    None,         // 0
    None,         // 1
    None,         // 2
    None,         // 3
    None,         // 4
    None,         // 5
    None,         // 6
    None,         // 7
    None,         // 8
    None,         // 9
    None,         // :
    None,         // ;
    None,         // <
    None,         // =
    None,         // >
    None,         // ?
    Jis0208_1978, // @
    Gb2312,       // A
    Jis0208,      // B
    Ksc5601,      // C
    Jis0212,      // D
    IsoIr165,     // E
    None,         // F
    Cns11643_1,   // G
    Cns11643_2,   // H
    Cns11643_3,   // I
    Cns11643_4,   // J
    Cns11643_5,   // K
    Cns11643_6,   // L
    Cns11643_7,   // M
];

/// C0 control sets: `ESC ! F`, finals from 0x40.
pub static CONTROL_C0: [Charset; 8] = [
    IsoIr1,   // @
    IsoIr7,   // A
    IsoIr48,  // B
    IsoIr26,  // C
    IsoIr36,  // D
    IsoIr106, // E
    IsoIr74,  // F
    IsoIr104, // G
];

/// C1 control sets: `ESC " F`, finals from 0x40.
pub static CONTROL_C1: [Charset; 6] = [
    IsoIr40,  // @
    IsoIr56,  // A
    IsoIr67,  // B
    IsoIr77,  // C
    IsoIr124, // D
    IsoIr133, // E
];

/// Other coding systems with standard return: `ESC % F`, finals from 0x40.
pub static OCS_WITH_RETURN: [Charset; 8] = [
    Iso2022, // @
    None,    // A
    Utf1,    // B
    None,    // C
    None,    // D
    None,    // E
    None,    // F
    Utf8,    // G
];

/// Other coding systems without standard return: `ESC % / F`, finals
/// from 0x40.
pub static OCS_WITHOUT_RETURN: [Charset; 8] = [
    Ucs2, // @
    Ucs4, // A
    None, // B
    None, // C
    None, // D
    None, // E
    None, // F
    Utf8, // G
];

fn from_table(table: &[Charset], base: u32, final_ch: u32) -> Charset {
    let index = final_ch.wrapping_sub(base) as usize;
    table.get(index).copied().unwrap_or(Charset::None)
}

const G94_DESIGNATORS: u32 = intermediate_bit(0x28)
    | intermediate_bit(0x29)
    | intermediate_bit(0x2a)
    | intermediate_bit(0x2b);
const G96_DESIGNATORS: u32 =
    intermediate_bit(0x2d) | intermediate_bit(0x2e) | intermediate_bit(0x2f);

/// Resolve an ESC sequence from its intermediates mask and final byte.
///
/// Designation patterns are matched on the mask content; anything that is
/// not a designation falls back to the plain escape table. DOCS takes
/// precedence over the 96-set reading of `%` and `/`, and the multibyte
/// `$` patterns take precedence over the single-byte ones.
pub(crate) fn resolve(intermediates: u32, final_ch: u32) -> (Command, Charset) {
    let drcs = intermediates & intermediate_bit(0x20) != 0;
    let m = intermediates & !intermediate_bit(0x20);

    if m == intermediate_bit(0x25) {
        return (Command::Docs, from_table(&OCS_WITH_RETURN, 0x40, final_ch));
    }
    if m == intermediate_bit(0x25) | intermediate_bit(0x2f) {
        return (
            Command::Docs,
            from_table(&OCS_WITHOUT_RETURN, 0x40, final_ch),
        );
    }
    if m == intermediate_bit(0x21) {
        return (Command::CnD, from_table(&CONTROL_C0, 0x40, final_ch));
    }
    if m == intermediate_bit(0x22) {
        return (Command::CnD, from_table(&CONTROL_C1, 0x40, final_ch));
    }

    if m & intermediate_bit(0x24) != 0 {
        let rest = m & !intermediate_bit(0x24);
        let g94 = rest & G94_DESIGNATORS;
        let g96 = rest & G96_DESIGNATORS;
        let charset = if rest == 0 || (rest == g94 && g94.is_power_of_two()) {
            // Bare `ESC $ F` designates through the 94^n table as well.
            if drcs {
                Charset::Drcs
            } else {
                from_table(&GRAPHIC_94_N, 0x30, final_ch)
            }
        } else if rest == g96 && g96.is_power_of_two() {
            if drcs {
                Charset::Drcs
            } else {
                Charset::None
            }
        } else {
            Charset::None
        };
        return (Command::GnDMm, charset);
    }

    let g94 = m & G94_DESIGNATORS;
    if g94 != 0 && g94.is_power_of_two() {
        let rest = m & !g94;
        let charset = if rest == 0 {
            if drcs {
                Charset::Drcs
            } else {
                from_table(&GRAPHIC_94, 0x30, final_ch)
            }
        } else if rest == intermediate_bit(0x21) {
            from_table(&GRAPHIC_94_WITH_2_1, 0x40, final_ch)
        } else if rest == intermediate_bit(0x22) {
            from_table(&GRAPHIC_94_WITH_2_2, 0x30, final_ch)
        } else if rest == intermediate_bit(0x25) {
            from_table(&GRAPHIC_94_WITH_2_5, 0x30, final_ch)
        } else if rest == intermediate_bit(0x26) {
            from_table(&GRAPHIC_94_WITH_2_6, 0x30, final_ch)
        } else {
            Charset::None
        };
        return (Command::GnDm, charset);
    }

    let g96 = m & G96_DESIGNATORS;
    if g96 != 0 && g96.is_power_of_two() {
        let rest = m & !g96;
        let charset = if rest == 0 {
            if drcs {
                Charset::Drcs
            } else {
                from_table(&GRAPHIC_96, 0x30, final_ch)
            }
        } else {
            Charset::None
        };
        return (Command::GnDm, charset);
    }

    (command::lookup_esc(intermediates, final_ch), Charset::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(c: u32) -> u32 {
        intermediate_bit(c)
    }

    #[test]
    fn test_ascii_designation() {
        // ESC ( B
        let (cmd, cs) = resolve(bit(0x28), 0x42);
        assert_eq!(cmd, Command::GnDm);
        assert_eq!(cs, Charset::Ascii);
    }

    #[test]
    fn test_dec_special_graphic() {
        // ESC ) 0
        let (cmd, cs) = resolve(bit(0x29), 0x30);
        assert_eq!(cmd, Command::GnDm);
        assert_eq!(cs, Charset::DecSpecialGraphic);
    }

    #[test]
    fn test_drcs_designation() {
        // ESC ( SP F
        let (cmd, cs) = resolve(bit(0x28) | bit(0x20), 0x46);
        assert_eq!(cmd, Command::GnDm);
        assert_eq!(cs, Charset::Drcs);
        // ESC $ ( SP F
        let (cmd, cs) = resolve(bit(0x24) | bit(0x28) | bit(0x20), 0x46);
        assert_eq!(cmd, Command::GnDMm);
        assert_eq!(cs, Charset::Drcs);
    }

    #[test]
    fn test_96_set() {
        // ESC - A
        let (cmd, cs) = resolve(bit(0x2d), 0x41);
        assert_eq!(cmd, Command::GnDm);
        assert_eq!(cs, Charset::Latin1);
    }

    #[test]
    fn test_multibyte_exception() {
        // Bare ESC $ @ / A / B designate through the 94^n table.
        assert_eq!(resolve(bit(0x24), 0x40), (Command::GnDMm, Charset::Jis0208_1978));
        assert_eq!(resolve(bit(0x24), 0x41), (Command::GnDMm, Charset::Gb2312));
        assert_eq!(resolve(bit(0x24), 0x42), (Command::GnDMm, Charset::Jis0208));
    }

    #[test]
    fn test_multibyte_96() {
        // ESC $ - F has no registered sets.
        assert_eq!(resolve(bit(0x24) | bit(0x2d), 0x41), (Command::GnDMm, Charset::None));
        assert_eq!(
            resolve(bit(0x24) | bit(0x2d) | bit(0x20), 0x41),
            (Command::GnDMm, Charset::Drcs)
        );
    }

    #[test]
    fn test_control_sets() {
        assert_eq!(resolve(bit(0x21), 0x40), (Command::CnD, Charset::IsoIr1));
        assert_eq!(resolve(bit(0x22), 0x40), (Command::CnD, Charset::IsoIr40));
        // Out-of-table finals resolve to the default.
        assert_eq!(resolve(bit(0x21), 0x7e), (Command::CnD, Charset::None));
        assert_eq!(resolve(bit(0x21), 0x30), (Command::CnD, Charset::None));
    }

    #[test]
    fn test_other_coding_systems() {
        assert_eq!(resolve(bit(0x25), 0x47), (Command::Docs, Charset::Utf8));
        assert_eq!(resolve(bit(0x25), 0x40), (Command::Docs, Charset::Iso2022));
        assert_eq!(
            resolve(bit(0x25) | bit(0x2f), 0x47),
            (Command::Docs, Charset::Utf8)
        );
        assert_eq!(
            resolve(bit(0x25) | bit(0x2f), 0x40),
            (Command::Docs, Charset::Ucs2)
        );
    }

    #[test]
    fn test_docs_beats_96_reading() {
        // ESC % / F is DOCS, never a 96-set with a stray `%`.
        let (cmd, _) = resolve(bit(0x25) | bit(0x2f), 0x41);
        assert_eq!(cmd, Command::Docs);
    }

    #[test]
    fn test_unknown_second_intermediate() {
        // ESC ( # F and ESC ( ' F designate nothing known.
        assert_eq!(resolve(bit(0x28) | bit(0x23), 0x42), (Command::GnDm, Charset::None));
        assert_eq!(resolve(bit(0x28) | bit(0x27), 0x42), (Command::GnDm, Charset::None));
    }

    #[test]
    fn test_non_designation_falls_through() {
        assert_eq!(resolve(0, 0x63), (Command::Ris, Charset::None));
        assert_eq!(resolve(bit(0x23), 0x38), (Command::Decaln, Charset::None));
        assert_eq!(resolve(bit(0x20), 0x46), (Command::S7c1t, Charset::None));
    }
}
