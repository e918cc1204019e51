//! Integration tests for the text parser against fixture exports.

use ft_formats::{parse_module, read_module, DiagnosticKind, Keyword, ParseOptions, Parsed};
use ft_ir::{
    ArpMode, Chip, Dimension, Effect, Expansions, InstrumentRef, Machine, PatternRow, Pitch, Song,
};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/txt")
}

fn load_fixture(name: &str) -> Parsed {
    let path = fixtures_dir().join(name);
    let file =
        File::open(&path).unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e));
    read_module(BufReader::new(file), ParseOptions::default().with_source_name(name))
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

fn song(parsed: &Parsed, index: usize) -> &Song {
    parsed
        .module
        .songs
        .get(index)
        .unwrap_or_else(|| panic!("no song {}", index))
}

fn count_notes(song: &Song) -> usize {
    song.tracks
        .iter()
        .flat_map(|track| track.patterns.iter())
        .flat_map(|pattern| pattern.rows())
        .filter(|row| matches!(row.pitch, Pitch::Note(_)))
        .count()
}

fn assert_song_invariants(song: &Song) {
    for (r, row) in song.order.iter().enumerate() {
        assert_eq!(row.len(), song.track_count(), "order row {} width", r);
    }
    for (t, track) in song.tracks.iter().enumerate() {
        for (p, pattern) in track.patterns.iter().enumerate() {
            assert_eq!(
                pattern.len(),
                song.rows_per_pattern as usize,
                "track {} pattern {} rows",
                t,
                p
            );
        }
    }
}

// --- n163_demo.txt ---

#[test]
fn n163_demo_parses_clean() {
    let parsed = load_fixture("n163_demo.txt");
    assert!(parsed.is_clean(), "{:?}", parsed.diagnostics);
}

#[test]
fn n163_demo_module_settings() {
    let module = load_fixture("n163_demo.txt").module;
    assert_eq!(module.title, "Wave Demo");
    assert_eq!(module.author, "famitxt");
    assert_eq!(module.copyright, "2024");
    assert_eq!(module.comment, "Two songs, one N163 bass\nand a 2A03 lead");
    assert_eq!(module.machine, Machine::Ntsc);
    assert_eq!(module.tick_rate_hz(), 60);
    assert_eq!(module.expansions, Expansions::N163);
    assert_eq!(module.n163_channels, 2);
    assert_eq!(module.channel_count(), 13);
}

#[test]
fn n163_demo_envelopes() {
    let module = load_fixture("n163_demo.txt").module;
    assert_eq!(module.envelopes.len(), 5);

    let arp = module.envelope(Chip::Apu, Dimension::Arpeggio, 0).unwrap();
    assert_eq!(arp.steps, [0, 12, 7]);
    assert_eq!(arp.loop_point, Some(0));
    assert_eq!(arp.arp_mode, ArpMode::Absolute);

    let n163_vol = module.envelope(Chip::N163, Dimension::Volume, 0).unwrap();
    assert_eq!(n163_vol.steps, [15, 14, 13, 12]);
    assert_eq!(n163_vol.loop_point, Some(2));
    assert_eq!(n163_vol.release_point, None);
}

#[test]
fn n163_demo_instruments() {
    let module = load_fixture("n163_demo.txt").module;
    assert_eq!(module.instruments.len(), 2);

    let lead = module.instrument(0).unwrap();
    assert_eq!(lead.chip, Chip::Apu);
    assert_eq!(lead.name, "Lead");
    assert_eq!(
        module
            .instrument_envelope(0, Dimension::Volume)
            .unwrap()
            .steps
            .len(),
        8
    );

    let bass = module.instrument(1).unwrap();
    assert_eq!(bass.chip, Chip::N163);
    assert_eq!(bass.name, "Bass");
    let table = bass.wave_table.as_ref().unwrap();
    assert_eq!(table.wave_len, 16);
    assert_eq!(table.waves.len(), 2);
    assert_eq!(&table.waves.get(1).unwrap()[..8], &[15; 8]);
    assert_eq!(
        module
            .instrument_envelope(1, Dimension::Timbre)
            .unwrap()
            .steps,
        [0, 1]
    );
}

#[test]
fn n163_demo_songs() {
    let parsed = load_fixture("n163_demo.txt");
    assert_eq!(parsed.module.songs.len(), 2);

    let intro = song(&parsed, 0);
    assert_eq!(intro.title, "Intro");
    assert_eq!((intro.rows_per_pattern, intro.speed, intro.tempo), (16, 6, 150));
    assert_eq!(intro.order.len(), 2);
    assert_eq!(intro.order.get(1).unwrap()[0], 1);
    assert_eq!(intro.order.get(1).unwrap()[5], 1);
    assert_song_invariants(intro);

    let outro = song(&parsed, 1);
    assert_eq!(outro.title, "Loop");
    assert_eq!(outro.rows_per_pattern, 32);
    assert_song_invariants(outro);
    assert_eq!(
        outro.row(0, 0, 31).unwrap().effects[0],
        Some(Effect::new(b'F', 0x03))
    );
}

#[test]
fn n163_demo_pattern_cells() {
    let parsed = load_fixture("n163_demo.txt");
    let intro = song(&parsed, 0);

    let lead = intro.row(0, 0, 0).unwrap();
    assert_eq!(lead.pitch, Pitch::Note(48));
    assert_eq!(lead.instrument, InstrumentRef::Index(0));
    assert_eq!(lead.volume, Some(15));

    assert_eq!(intro.row(3, 0, 0).unwrap().pitch, Pitch::Note(8));
    assert_eq!(intro.row(5, 0, 0).unwrap().instrument, InstrumentRef::Index(1));
    assert_eq!(intro.row(0, 0, 4).unwrap().effects[0], Some(Effect::new(b'4', 0xA3)));
    assert_eq!(intro.row(2, 0, 4).unwrap().pitch, Pitch::Cut);
    assert_eq!(intro.row(5, 0, 4).unwrap().pitch, Pitch::Release);
    assert_eq!(intro.row(0, 0, 15).unwrap().effects[0], Some(Effect::new(b'B', 0)));
    assert_eq!(intro.row(0, 0, 1), Some(&PatternRow::BLANK));

    let legato = intro.row(5, 1, 0).unwrap();
    assert_eq!(legato.instrument, InstrumentRef::Legato);
    let two_fx = intro.row(0, 1, 0).unwrap();
    assert_eq!(two_fx.effect_count(), 2);

    assert_eq!(count_notes(intro), 8);
}

#[test]
fn n163_demo_reader_and_str_agree() {
    let text = fs::read_to_string(fixtures_dir().join("n163_demo.txt")).unwrap();
    let from_str = parse_module(&text, ParseOptions::default()).unwrap();
    let from_reader = load_fixture("n163_demo.txt");
    assert_eq!(from_str.module, from_reader.module);
}

// --- bad_lines.txt ---

#[test]
fn bad_lines_are_reported_in_order() {
    let parsed = load_fixture("bad_lines.txt");
    let lines: Vec<usize> = parsed.diagnostics.iter().map(|d| d.line).collect();
    let kinds: Vec<DiagnosticKind> = parsed.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(lines, [5, 7, 8, 10, 11, 13, 16, 17, 18]);
    assert_eq!(
        kinds,
        [
            DiagnosticKind::UnknownKeyword,
            DiagnosticKind::HeaderArity,
            DiagnosticKind::Separator,
            DiagnosticKind::Range,
            DiagnosticKind::StatePrecondition,
            DiagnosticKind::Range,
            DiagnosticKind::PitchGrammar,
            DiagnosticKind::Range,
            DiagnosticKind::Token,
        ]
    );
    assert_eq!(parsed.diagnostics[0].keyword, None);
    assert_eq!(parsed.diagnostics[4].keyword, Some(Keyword::Row));
}

#[test]
fn bad_lines_leave_good_lines_applied() {
    let parsed = load_fixture("bad_lines.txt");
    let module = &parsed.module;
    assert_eq!(module.machine, Machine::Pal);
    assert_eq!(module.envelopes.len(), 1);
    assert_eq!(module.instruments.len(), 1);

    let only = song(&parsed, 0);
    assert_eq!(only.order.len(), 1);
    assert_song_invariants(only);
    assert_eq!(only.row(0, 0, 0), Some(&PatternRow::BLANK));
    assert_eq!(only.row(0, 0, 1), Some(&PatternRow::BLANK));
    assert_eq!(only.row(0, 0, 2).unwrap().pitch, Pitch::Note(48));
    assert_eq!(only.row(2, 0, 2).unwrap().pitch, Pitch::Note(52));
    assert_eq!(count_notes(only), 2);
}

#[test]
fn container_limit_aborts_fixture() {
    let text = fs::read_to_string(fixtures_dir().join("n163_demo.txt")).unwrap();
    let options = ParseOptions::default().with_container_limit(8);
    let err = parse_module(&text, options).unwrap_err();
    // first TRACK needs 13 tracks
    assert!(err.to_string().contains("out of memory"));
}
