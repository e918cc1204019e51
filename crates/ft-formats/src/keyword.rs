//! Directive keywords of the text export.

use core::fmt;

/// The leading token of a directive line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Title,
    Author,
    Copyright,
    Comment,
    Machine,
    Framerate,
    Expansion,
    Vibrato,
    Split,
    N163Channels,
    Macro,
    MacroN163,
    Inst2A03,
    InstN163,
    N163Wave,
    Track,
    Columns,
    Order,
    Pattern,
    Row,
}

impl Keyword {
    pub const ALL: [Keyword; 20] = [
        Keyword::Title,
        Keyword::Author,
        Keyword::Copyright,
        Keyword::Comment,
        Keyword::Machine,
        Keyword::Framerate,
        Keyword::Expansion,
        Keyword::Vibrato,
        Keyword::Split,
        Keyword::N163Channels,
        Keyword::Macro,
        Keyword::MacroN163,
        Keyword::Inst2A03,
        Keyword::InstN163,
        Keyword::N163Wave,
        Keyword::Track,
        Keyword::Columns,
        Keyword::Order,
        Keyword::Pattern,
        Keyword::Row,
    ];

    /// The token as it appears in the file.
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Title => "TITLE",
            Keyword::Author => "AUTHOR",
            Keyword::Copyright => "COPYRIGHT",
            Keyword::Comment => "COMMENT",
            Keyword::Machine => "MACHINE",
            Keyword::Framerate => "FRAMERATE",
            Keyword::Expansion => "EXPANSION",
            Keyword::Vibrato => "VIBRATO",
            Keyword::Split => "SPLIT",
            Keyword::N163Channels => "N163CHANNELS",
            Keyword::Macro => "MACRO",
            Keyword::MacroN163 => "MACRON163",
            Keyword::Inst2A03 => "INST2A03",
            Keyword::InstN163 => "INSTN163",
            Keyword::N163Wave => "N163WAVE",
            Keyword::Track => "TRACK",
            Keyword::Columns => "COLUMNS",
            Keyword::Order => "ORDER",
            Keyword::Pattern => "PATTERN",
            Keyword::Row => "ROW",
        }
    }

    /// Exact, case-sensitive match of a token to a keyword.
    pub fn lookup(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.name() == token)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
