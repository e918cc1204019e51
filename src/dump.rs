//! Human-readable listing of a parsed module.

use std::io::{self, Write};

use ft_formats::Diagnostic;
use ft_ir::{Dimension, Expansions, Machine, Module, PatternRow, Song};

const HEXDUMP_WIDTH: usize = 16;

/// Write bytes as space-separated hex, 16 per line.
pub fn hexdump<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    for line in bytes.chunks(HEXDUMP_WIDTH) {
        for b in line {
            write!(out, "{:02x} ", b)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write one cell as raw `note instrument volume` bytes plus effects.
pub fn write_cell<W: Write>(out: &mut W, cell: &PatternRow) -> io::Result<()> {
    let volume = cell.volume.unwrap_or(ft_ir::VOLUME_NONE);
    write!(
        out,
        " : {:02x}{:02x}{:02x}",
        cell.pitch.to_raw(),
        cell.instrument.to_raw(),
        volume
    )?;
    for effect in &cell.effects {
        match effect {
            Some(fx) => write!(out, " {}{:02x}", fx.letter as char, fx.value)?,
            None => out.write_all(b" ...")?,
        }
    }
    Ok(())
}

fn write_expansions<W: Write>(out: &mut W, expansions: Expansions) -> io::Result<()> {
    if expansions.is_empty() {
        writeln!(out, "2A03-only module")?;
    }
    for chip in expansions.chips() {
        writeln!(out, "Uses {}", chip.name())?;
    }
    Ok(())
}

fn env_id(id: Option<u8>) -> String {
    id.map_or_else(|| String::from("-"), |id| id.to_string())
}

fn write_song<W: Write>(out: &mut W, number: usize, song: &Song) -> io::Result<()> {
    writeln!(
        out,
        "song {}: {:?}, {} rows per pattern, speed {}, tempo {}, {} order rows",
        number,
        song.title,
        song.rows_per_pattern,
        song.speed,
        song.tempo,
        song.order.len()
    )?;
    for (r, row) in song.order.iter().enumerate() {
        write!(out, "order row ${:02X}: ", r)?;
        hexdump(out, row)?;
    }
    for (t, track) in song.tracks.iter().enumerate() {
        writeln!(
            out,
            "song {} track {} has {} patterns",
            number,
            t + 1,
            track.patterns.len()
        )?;
        for (p, pattern) in track.patterns.iter().enumerate() {
            for (r, cell) in pattern.rows().enumerate() {
                write!(out, "{:02X}:{:02X}", p, r)?;
                write_cell(out, cell)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Write everything the module holds.
pub fn dump_module<W: Write>(out: &mut W, module: &Module) -> io::Result<()> {
    for (label, text) in [
        ("Title", &module.title),
        ("Author", &module.author),
        ("Copyright", &module.copyright),
    ] {
        if !text.is_empty() {
            writeln!(out, "{label}: {text}")?;
        }
    }
    for line in module.comment.lines() {
        writeln!(out, "Comment: {line}")?;
    }

    match module.machine {
        Machine::Ntsc => writeln!(out, "For 2A03 (NTSC NES)")?,
        Machine::Pal => writeln!(out, "For 2A07 (PAL NES)")?,
    }
    if module.tick_rate == 0 {
        writeln!(out, "Update rate is default for machine")?;
    } else {
        writeln!(out, "Update rate is {} Hz", module.tick_rate)?;
    }
    write_expansions(out, module.expansions)?;
    if module.expansions.contains(Expansions::N163) {
        writeln!(
            out,
            "First {} of 8 N163 channels are used",
            module.n163_channels
        )?;
    }

    for env in module.envelopes.iter() {
        writeln!(
            out,
            "chip {} {} macro {} with {} steps",
            env.chip.name(),
            env.dimension.name(),
            env.id,
            env.steps.len()
        )?;
        let bytes: Vec<u8> = env.steps.iter().map(|&s| s as u8).collect();
        hexdump(out, &bytes)?;
    }

    for (i, inst) in module.instruments.iter().enumerate() {
        let refs = &inst.envelopes;
        writeln!(
            out,
            "{} instrument {} {:?} with volume env {}, arpeggio env {}, pitch env {}, hi-pitch env {}, timbre env {}",
            inst.chip.name(),
            i,
            inst.name,
            env_id(refs.get(Dimension::Volume)),
            env_id(refs.get(Dimension::Arpeggio)),
            env_id(refs.get(Dimension::Pitch)),
            env_id(refs.get(Dimension::HiPitch)),
            env_id(refs.get(Dimension::Timbre)),
        )?;
        if let Some(table) = &inst.wave_table {
            writeln!(
                out,
                "{} waves of length {} at address {}",
                table.waves.len(),
                table.wave_len,
                table.load_addr
            )?;
            for wave in table.waves.iter() {
                hexdump(out, wave)?;
            }
        }
    }

    for (i, song) in module.songs.iter().enumerate() {
        write_song(out, i + 1, song)?;
    }
    Ok(())
}

/// Write one line per diagnostic, prefixed with the input name.
pub fn dump_diagnostics<W: Write>(
    out: &mut W,
    source: &str,
    diagnostics: &[Diagnostic],
) -> io::Result<()> {
    for diag in diagnostics {
        writeln!(out, "{source}:{diag}")?;
    }
    Ok(())
}
