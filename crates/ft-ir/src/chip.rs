//! Sound chips, expansion audio and channel layout.

use arrayvec::ArrayVec;
use bitflags::bitflags;
use core::iter;

/// Channels on the base 2A03 APU (2 pulse, triangle, noise, DPCM).
pub const APU_CHANNELS: usize = 5;
/// Index of the noise channel on the 2A03.
pub const APU_NOISE_INDEX: u8 = 3;
/// Every chip enabled at once: 5 + 3 + 6 + 1 + 2 + 8 + 3.
pub const MAX_CHANNELS: usize = 28;
/// Fewest channels a module can have (2A03 only).
pub const MIN_CHANNELS: usize = APU_CHANNELS;

/// A sound chip: the 2A03 itself or one of the expansion chips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Chip {
    #[default]
    Apu,
    Vrc6,
    Vrc7,
    Fds,
    Mmc5,
    N163,
    S5b,
}

impl Chip {
    /// Expansion chips in expansion-mask bit order.
    pub const EXPANSIONS: [Chip; 6] = [
        Chip::Vrc6,
        Chip::Vrc7,
        Chip::Fds,
        Chip::Mmc5,
        Chip::N163,
        Chip::S5b,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Chip::Apu => "2A03",
            Chip::Vrc6 => "VRC6",
            Chip::Vrc7 => "VRC7",
            Chip::Fds => "FDS",
            Chip::Mmc5 => "MMC5",
            Chip::N163 => "N163",
            Chip::S5b => "5B",
        }
    }

    /// Number of channels this chip contributes to patterns and order rows.
    ///
    /// N163 always codes all 8 channels even when fewer are active.
    pub const fn channels(self) -> usize {
        match self {
            Chip::Apu => APU_CHANNELS,
            Chip::Vrc6 => 3,
            Chip::Vrc7 => 6,
            Chip::Fds => 1,
            Chip::Mmc5 => 2,
            Chip::N163 => 8,
            Chip::S5b => 3,
        }
    }

    /// The expansion-mask bit for this chip, `None` for the 2A03.
    pub const fn expansion(self) -> Option<Expansions> {
        match self {
            Chip::Apu => None,
            Chip::Vrc6 => Some(Expansions::VRC6),
            Chip::Vrc7 => Some(Expansions::VRC7),
            Chip::Fds => Some(Expansions::FDS),
            Chip::Mmc5 => Some(Expansions::MMC5),
            Chip::N163 => Some(Expansions::N163),
            Chip::S5b => Some(Expansions::S5B),
        }
    }
}

bitflags! {
    /// Enabled expansion sound sources (`EXPANSION` bitmask).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Expansions: u8 {
        const VRC6 = 1 << 0;
        const VRC7 = 1 << 1;
        const FDS = 1 << 2;
        const MMC5 = 1 << 3;
        const N163 = 1 << 4;
        const S5B = 1 << 5;
    }
}

impl Expansions {
    /// Enabled expansion chips in bit order.
    pub fn chips(self) -> impl Iterator<Item = Chip> {
        Chip::EXPANSIONS
            .into_iter()
            .filter(move |chip| chip.expansion().is_some_and(|bit| self.contains(bit)))
    }
}

/// One coded channel: which chip it belongs to and its index on that chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelKind {
    pub chip: Chip,
    pub index: u8,
}

impl ChannelKind {
    /// The 2A03 noise channel takes a noise period instead of a note.
    pub fn is_noise(self) -> bool {
        self.chip == Chip::Apu && self.index == APU_NOISE_INDEX
    }
}

/// Channels in the order they are coded in `ORDER` and `ROW` lines.
pub type ChannelLayout = ArrayVec<ChannelKind, MAX_CHANNELS>;

/// Build the channel layout for a set of enabled expansions.
pub fn channel_layout(expansions: Expansions) -> ChannelLayout {
    let mut layout = ChannelLayout::new();
    for chip in iter::once(Chip::Apu).chain(expansions.chips()) {
        for index in 0..chip.channels() {
            layout.push(ChannelKind { chip, index: index as u8 });
        }
    }
    layout
}
