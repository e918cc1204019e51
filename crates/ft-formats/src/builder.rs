//! Line-by-line module builder.
//!
//! [`ModuleBuilder`] holds the current song and pattern selection and turns
//! each directive into a change to the [`Module`]. A malformed line becomes
//! a [`Diagnostic`] and leaves the module as it was; running out of memory
//! aborts the whole parse.

use std::io::BufRead;
use std::ops::RangeInclusive;

use arrayvec::ArrayVec;
use ft_ir::{
    ArpMode, Chip, Dimension, EnvelopeRefs, Envelope, Expansions, Instrument, Machine, Module,
    OrderRow, Song, Wave, WaveTable, MAX_CHANNELS, MAX_INSTRUMENTS, MAX_N163_CHANNELS, MAX_PATTERNS,
    MAX_ROWS, MAX_TICK_RATE, MAX_WAVES, MAX_WAVE_SAMPLES, MIN_CHANNELS, MIN_WAVE_SAMPLES,
};
use tracing::{debug, error, warn};

use crate::error::{Diagnostic, DiagnosticKind, FormatError, LineError, Rejection};
use crate::grammar::{split_line, unquote, KeywordLookup, Line};
use crate::keyword::Keyword;
use crate::macros::{after_colon, parse_macro};
use crate::pitch::PitchKind;
use crate::row::decode_row;
use crate::scan::{scan_int, scan_ints, Radix};

/// Settings for one parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Name of the input, attached to log events
    pub source_name: String,
    /// Element ceiling for every container in the module
    pub container_limit: usize,
    /// Maps leading tokens to keywords
    pub lookup: KeywordLookup,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: String::from("<input>"),
            container_limit: usize::MAX,
            lookup: Keyword::lookup,
        }
    }
}

impl ParseOptions {
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_container_limit(mut self, limit: usize) -> Self {
        self.container_limit = limit;
        self
    }

    pub fn with_lookup(mut self, lookup: KeywordLookup) -> Self {
        self.lookup = lookup;
        self
    }
}

/// What happened to one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The module was updated
    Applied,
    /// Recognized keyword with nothing to store
    Ignored,
    /// Blank line or comment
    Skipped,
    /// Malformed line; the module is unchanged
    Rejected(Diagnostic),
}

/// A finished parse.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub module: Module,
    /// Every rejected line, in input order
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Returns true if no line was rejected.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Builds a [`Module`] from text export lines fed one at a time.
pub struct ModuleBuilder {
    module: Module,
    options: ParseOptions,
    line: usize,
    /// Index of the song created by the last `TRACK`
    song: Option<usize>,
    /// Pattern selected by the last `PATTERN` in the current song
    pattern: Option<u8>,
    diagnostics: Vec<Diagnostic>,
}

impl ModuleBuilder {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            module: Module::with_limit(options.container_limit),
            options,
            line: 0,
            song: None,
            pattern: None,
            diagnostics: Vec::new(),
        }
    }

    /// The module built so far.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Number of lines fed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Process one line of input.
    ///
    /// An `Err` means the parse cannot continue and the builder should be
    /// dropped.
    pub fn feed_line(&mut self, text: &str) -> Result<Outcome, FormatError> {
        self.line += 1;
        match split_line(text, self.options.lookup) {
            Line::Skip => Ok(Outcome::Skipped),
            Line::Unknown { token } => {
                let rejection = Rejection::new(
                    DiagnosticKind::UnknownKeyword,
                    format!("unknown keyword {token:?}"),
                );
                Ok(self.reject(None, rejection))
            }
            Line::Directive { keyword, rest } => match self.dispatch(keyword, rest) {
                Ok(outcome) => Ok(outcome),
                Err(LineError::Rejected(rejection)) => Ok(self.reject(Some(keyword), rejection)),
                Err(LineError::Fatal(source)) => {
                    error!(
                        source = %self.options.source_name,
                        line = self.line,
                        keyword = keyword.name(),
                        requested = source.requested,
                        "allocation failed"
                    );
                    Err(FormatError::Alloc {
                        line: self.line,
                        source,
                    })
                }
            },
        }
    }

    /// Finish the parse and hand over the module.
    pub fn finish(self) -> Parsed {
        Parsed {
            module: self.module,
            diagnostics: self.diagnostics,
        }
    }

    fn reject(&mut self, keyword: Option<Keyword>, rejection: Rejection) -> Outcome {
        let diagnostic = Diagnostic {
            line: self.line,
            keyword,
            kind: rejection.kind,
            message: rejection.message,
        };
        warn!(
            source = %self.options.source_name,
            line = diagnostic.line,
            keyword = diagnostic.keyword.map(Keyword::name),
            code = diagnostic.code(),
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic.clone());
        Outcome::Rejected(diagnostic)
    }

    fn dispatch(&mut self, keyword: Keyword, rest: &str) -> Result<Outcome, LineError> {
        match keyword {
            Keyword::Vibrato | Keyword::Split | Keyword::Columns => return Ok(Outcome::Ignored),
            Keyword::Title => self.module.title = unquote(rest),
            Keyword::Author => self.module.author = unquote(rest),
            Keyword::Copyright => self.module.copyright = unquote(rest),
            Keyword::Comment => {
                if !self.module.comment.is_empty() {
                    self.module.comment.push('\n');
                }
                self.module.comment.push_str(&unquote(rest));
            }
            Keyword::Machine => {
                let ([raw], _) = scan_exact::<1>(rest, Radix::Auto)?;
                self.module.machine =
                    Machine::from_raw(raw).ok_or_else(|| Rejection::range("machine", raw, &(0..=1)))?;
            }
            Keyword::Framerate => {
                let ([rate], _) = scan_exact::<1>(rest, Radix::Auto)?;
                self.module.tick_rate = in_range("frame rate", rate, 0..=i64::from(MAX_TICK_RATE))?;
            }
            Keyword::Expansion => {
                let ([mask], _) = scan_exact::<1>(rest, Radix::Auto)?;
                let bits: u8 = in_range("expansion mask", mask, 0..=i64::from(Expansions::all().bits()))?;
                self.module.expansions = Expansions::from_bits_truncate(bits);
            }
            Keyword::N163Channels => {
                let ([count], _) = scan_exact::<1>(rest, Radix::Auto)?;
                self.module.n163_channels =
                    in_range("N163 channel count", count, 1..=i64::from(MAX_N163_CHANNELS))?;
            }
            Keyword::Macro => self.define_macro(Chip::Apu, rest)?,
            Keyword::MacroN163 => self.define_macro(Chip::N163, rest)?,
            Keyword::Inst2A03 => self.define_2a03_instrument(rest)?,
            Keyword::InstN163 => self.define_n163_instrument(rest)?,
            Keyword::N163Wave => self.define_n163_wave(rest)?,
            Keyword::Track => self.begin_song(rest)?,
            Keyword::Order => self.append_order(rest)?,
            Keyword::Pattern => self.select_pattern(rest)?,
            Keyword::Row => self.write_row(rest)?,
        }
        Ok(Outcome::Applied)
    }

    fn define_macro(&mut self, chip: Chip, rest: &str) -> Result<(), LineError> {
        let body = parse_macro(rest)?;
        let header = body.header;
        let mut envelope = Envelope::new(chip, header.dimension, in_range("macro id", header.id, 0..=255)?);
        envelope.loop_point = optional_id("loop point", header.loop_point)?;
        envelope.release_point = optional_id("release point", header.release_point)?;
        envelope.arp_mode = ArpMode::from_raw(header.arp_mode)
            .ok_or_else(|| Rejection::range("arpeggio mode", header.arp_mode, &(0..=3)))?;
        envelope.steps = body
            .steps
            .iter()
            .map(|&step| in_range("step", step, -128..=127))
            .collect::<Result<_, _>>()?;
        self.module.set_envelope(envelope)?;
        Ok(())
    }

    fn define_2a03_instrument(&mut self, rest: &str) -> Result<(), LineError> {
        let ([id, vol, arp, pitch, hi_pitch, timbre], name) = scan_exact::<6>(rest, Radix::Decimal)?;
        let index = instrument_index(id)?;
        let envelopes = envelope_refs([vol, arp, pitch, hi_pitch, timbre])?;

        *self.module.instrument_mut(index)? = Instrument {
            chip: Chip::Apu,
            name: unquote(name),
            envelopes,
            wave_table: None,
            declared: true,
        };
        Ok(())
    }

    fn define_n163_instrument(&mut self, rest: &str) -> Result<(), LineError> {
        let ([id, vol, arp, pitch, hi_pitch, timbre, wave_len, load_addr, wave_count], name) =
            scan_exact::<9>(rest, Radix::Decimal)?;
        let index = instrument_index(id)?;
        let envelopes = envelope_refs([vol, arp, pitch, hi_pitch, timbre])?;
        let wave_len: u8 = in_range(
            "wave length",
            wave_len,
            (MIN_WAVE_SAMPLES as i64)..=(MAX_WAVE_SAMPLES as i64),
        )?;
        let load_addr: u8 = in_range("wave address", load_addr, 0..=255)?;
        let wave_count: usize = in_range("wave count", wave_count, 0..=MAX_WAVES as i64)?;

        let limit = self.module.container_limit();
        let inst = self.module.instrument_mut(index)?;
        let mut table = match inst.wave_table.take() {
            Some(table) if inst.chip == Chip::N163 && table.wave_len == wave_len => table,
            _ => WaveTable::new(wave_len, load_addr, limit),
        };
        table.load_addr = load_addr;
        table.grow_to(wave_count)?;
        *inst = Instrument {
            chip: Chip::N163,
            name: unquote(name),
            envelopes,
            wave_table: Some(table),
            declared: true,
        };
        Ok(())
    }

    fn define_n163_wave(&mut self, rest: &str) -> Result<(), LineError> {
        let ([id, wave], tail) = scan_exact::<2>(rest, Radix::Decimal)?;
        let index = instrument_index(id)?;
        let wave: usize = in_range("wave", wave, 0..=MAX_WAVES as i64 - 1)?;
        let body = after_colon(tail).ok_or_else(|| {
            Rejection::new(DiagnosticKind::Separator, "expected colon after wave header")
        })?;

        let mut raw = [0i64; MAX_WAVE_SAMPLES];
        let (count, tail) = scan_ints(body, &mut raw, Radix::Decimal);
        if count < MIN_WAVE_SAMPLES || scan_int(tail, Radix::Decimal).is_some() {
            return Err(Rejection::new(
                DiagnosticKind::Range,
                format!("wave needs {MIN_WAVE_SAMPLES}-{MAX_WAVE_SAMPLES} samples"),
            )
            .into());
        }
        let samples = raw[..count]
            .iter()
            .map(|&sample| in_range("sample", sample, 0..=15))
            .collect::<Result<Wave, _>>()?;

        match self.module.instrument(index) {
            Some(inst) if inst.chip == Chip::N163 => {
                if let Some(table) = &inst.wave_table {
                    if usize::from(table.wave_len) != count {
                        return Err(Rejection::new(
                            DiagnosticKind::Range,
                            format!(
                                "{count} samples but instrument {index:02X} has waves of {}",
                                table.wave_len
                            ),
                        )
                        .into());
                    }
                }
            }
            Some(inst) if inst.declared => {
                return Err(Rejection::state(format!(
                    "instrument {index:02X} is not an N163 instrument"
                ))
                .into());
            }
            _ => {}
        }

        let limit = self.module.container_limit();
        let inst = self.module.instrument_mut(index)?;
        inst.chip = Chip::N163;
        let table = inst
            .wave_table
            .get_or_insert_with(|| WaveTable::new(count as u8, 0, limit));
        *table.wave_mut(wave)? = samples;
        Ok(())
    }

    fn begin_song(&mut self, rest: &str) -> Result<(), LineError> {
        let ([rows, speed, tempo], title) = scan_exact::<3>(rest, Radix::Decimal)?;
        let rows: u16 = in_range("rows per pattern", rows, 1..=MAX_ROWS as i64)?;
        let speed: u8 = in_range("speed", speed, 1..=255)?;
        let tempo: u8 = in_range("tempo", tempo, 1..=255)?;

        let tracks = self.module.channel_count();
        let limit = self.module.container_limit();
        let song = Song::new(&unquote(title), tracks, rows, speed, tempo, limit)?;
        self.module.add_song(song)?;
        let index = self.module.songs.len() - 1;
        debug!(line = self.line, song = index, tracks, rows, "begin song");
        self.song = Some(index);
        self.pattern = None;
        Ok(())
    }

    fn append_order(&mut self, rest: &str) -> Result<(), LineError> {
        let index = self
            .song
            .ok_or_else(|| Rejection::state("ORDER before any TRACK"))?;
        let (row_id, tail) = scan_int(rest, Radix::Hex).ok_or_else(|| {
            Rejection::new(DiagnosticKind::HeaderArity, "missing order row id")
        })?;
        let _: u8 = in_range("order row", row_id, 0..=255)?;
        let body = after_colon(tail).ok_or_else(|| {
            Rejection::new(DiagnosticKind::Separator, "expected colon after order row id")
        })?;

        let mut ids = [0i64; MAX_CHANNELS + 1];
        let (count, tail) = scan_ints(body, &mut ids, Radix::Hex);
        if !tail.trim().is_empty() && count <= MAX_CHANNELS {
            return Err(Rejection::new(
                DiagnosticKind::Token,
                format!("unexpected {:?} in order row", tail.trim()),
            )
            .into());
        }

        let song = self
            .module
            .songs
            .get_mut(index)
            .ok_or_else(|| Rejection::state("current song is gone"))?;
        let tracks = song.track_count();
        if count != tracks || !(MIN_CHANNELS..=MAX_CHANNELS).contains(&count) {
            return Err(Rejection::new(
                DiagnosticKind::Range,
                format!("{count} columns (expected {tracks})"),
            )
            .into());
        }
        let row = ids[..count]
            .iter()
            .map(|&id| in_range("pattern", id, 0..=MAX_PATTERNS as i64 - 1))
            .collect::<Result<OrderRow, _>>()?;
        song.push_order(row)?;
        Ok(())
    }

    fn select_pattern(&mut self, rest: &str) -> Result<(), LineError> {
        if self.song.is_none() {
            return Err(Rejection::state("PATTERN before any TRACK").into());
        }
        let (id, _) = scan_int(rest, Radix::Hex)
            .ok_or_else(|| Rejection::new(DiagnosticKind::HeaderArity, "missing pattern id"))?;
        let id: u8 = in_range("pattern", id, 0..=MAX_PATTERNS as i64 - 1)?;
        debug!(line = self.line, pattern = id, "select pattern");
        self.pattern = Some(id);
        Ok(())
    }

    fn write_row(&mut self, rest: &str) -> Result<(), LineError> {
        let index = self
            .song
            .ok_or_else(|| Rejection::state("ROW before any TRACK"))?;
        let pattern = self
            .pattern
            .ok_or_else(|| Rejection::state("ROW before any PATTERN"))?;
        let (row_id, tail) = scan_int(rest, Radix::Hex)
            .ok_or_else(|| Rejection::new(DiagnosticKind::HeaderArity, "missing row id"))?;
        let body = after_colon(tail).ok_or_else(|| {
            Rejection::new(DiagnosticKind::Separator, "expected colon after row id")
        })?;

        let layout = self.module.channel_layout();
        let song = self
            .module
            .songs
            .get_mut(index)
            .ok_or_else(|| Rejection::state("current song is gone"))?;
        let row: usize = in_range("row", row_id, 0..=i64::from(song.rows_per_pattern) - 1)?;

        let kinds: ArrayVec<PitchKind, MAX_CHANNELS> = (0..song.track_count().min(MAX_CHANNELS))
            .map(|track| layout.get(track).map_or(PitchKind::Tone, |&c| PitchKind::for_channel(c)))
            .collect();
        let columns = decode_row(body, &kinds)?;

        for (track, cell) in columns.into_iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            if let Some(target) = song.pattern_mut(track, pattern)? {
                target.set_row(row, cell);
            }
        }
        Ok(())
    }
}

/// Read exactly `N` integers, rejecting the line if fewer are present.
fn scan_exact<const N: usize>(text: &str, radix: Radix) -> Result<([i64; N], &str), Rejection> {
    let mut values = [0i64; N];
    let (count, rest) = scan_ints(text, &mut values, radix);
    if count < N {
        return Err(Rejection::new(
            DiagnosticKind::HeaderArity,
            format!("not enough values (expected {N}, found {count})"),
        ));
    }
    Ok((values, rest))
}

/// Check `value` against `range` and narrow it.
fn in_range<T: TryFrom<i64>>(what: &str, value: i64, range: RangeInclusive<i64>) -> Result<T, Rejection> {
    if !range.contains(&value) {
        return Err(Rejection::range(what, value, &range));
    }
    T::try_from(value).map_err(|_| Rejection::range(what, value, &range))
}

/// `-1` for none, otherwise 0-255.
fn optional_id(what: &str, value: i64) -> Result<Option<u8>, Rejection> {
    if value == -1 {
        return Ok(None);
    }
    in_range(what, value, -1..=255).map(Some)
}

fn instrument_index(id: i64) -> Result<usize, Rejection> {
    in_range("instrument", id, 0..=MAX_INSTRUMENTS as i64 - 1)
}

fn envelope_refs(ids: [i64; Dimension::COUNT]) -> Result<EnvelopeRefs, Rejection> {
    let mut refs = EnvelopeRefs::default();
    for (dimension, id) in Dimension::ALL.into_iter().zip(ids) {
        refs.set(dimension, optional_id(dimension.name(), id)?);
    }
    Ok(refs)
}

/// Parse a whole text export held in memory.
pub fn parse_module(text: &str, options: ParseOptions) -> Result<Parsed, FormatError> {
    let mut builder = ModuleBuilder::new(options);
    for line in text.lines() {
        builder.feed_line(line)?;
    }
    Ok(builder.finish())
}

/// Parse a text export from a reader, one line at a time. Invalid UTF-8
/// is replaced rather than rejected.
pub fn read_module<R: BufRead>(mut reader: R, options: ParseOptions) -> Result<Parsed, FormatError> {
    let mut builder = ModuleBuilder::new(options);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| FormatError::Io {
                line: builder.line() + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        builder.feed_line(&String::from_utf8_lossy(&buf))?;
    }
    Ok(builder.finish())
}
