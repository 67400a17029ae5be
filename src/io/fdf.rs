// src/io/fdf.rs
// SIESTA .fdf (Flexible Data Format) reader and writer
//
// Format Overview:
// ================
//   SystemLabel        water
//   LatticeConstant    5.43 Ang
//   MD.TypeOfRun       Verlet
//   %block LatticeVectors
//     1.0 0.0 0.0
//     0.0 1.0 0.0
//     0.0 0.0 1.0
//   %endblock LatticeVectors
//
// Keys are case-insensitive (stored lower-cased). Any line starting with '%'
// toggles block mode, so the same marker opens and closes a block. An open
// block with no closing marker before end of file is dropped. Lines starting
// with '#' are ordinary entries unless the scanner is told to skip comments.

use super::registry::{FileContent, FileReader, Registry};
use crate::error::{Error, Result};
use crate::model::{FdfValue, ParameterMap};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::mem;
use std::path::Path;

const BLOCK_MARKER: char = '%';
const COMMENT_MARKER: char = '#';

// ============================================================================
// SCANNER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    OutsideBlock,
    InsideBlock,
}

/// One uncoerced entry as it appears in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    Scalar { key: String, value: String },
    Block { name: String, body: String },
}

/// Iterator over the raw entries of an fdf stream.
pub struct FdfScanner<R: BufRead> {
    lines: io::Lines<R>,
    state: ScanState,
    block_name: String,
    block_content: String,
    block_start: usize,
    line_no: usize,
    skip_comments: bool,
}

impl<R: BufRead> FdfScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            state: ScanState::OutsideBlock,
            block_name: String::new(),
            block_content: String::new(),
            block_start: 0,
            line_no: 0,
            skip_comments: false,
        }
    }

    /// Drop '#' lines outside blocks instead of emitting them as entries.
    pub fn skip_comments(mut self, skip: bool) -> Self {
        self.skip_comments = skip;
        self
    }
}

impl<R: BufRead> Iterator for FdfScanner<R> {
    type Item = Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e.into())),
                None => {
                    if self.state == ScanState::InsideBlock {
                        log::warn!(
                            "fdf block '{}' opened at line {} is never closed; discarding it",
                            self.block_name,
                            self.block_start
                        );
                        self.state = ScanState::OutsideBlock;
                        self.block_content.clear();
                    }
                    return None;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with(BLOCK_MARKER) {
                match self.state {
                    ScanState::OutsideBlock => {
                        self.block_name = trimmed
                            .split_whitespace()
                            .skip(1)
                            .collect::<Vec<_>>()
                            .join(" ")
                            .to_lowercase();
                        self.block_start = self.line_no;
                        self.state = ScanState::InsideBlock;
                    }
                    ScanState::InsideBlock => {
                        self.state = ScanState::OutsideBlock;
                        return Some(Ok(RawEntry::Block {
                            name: mem::take(&mut self.block_name),
                            body: mem::take(&mut self.block_content),
                        }));
                    }
                }
                continue;
            }

            match self.state {
                ScanState::OutsideBlock => {
                    if self.skip_comments && trimmed.starts_with(COMMENT_MARKER) {
                        continue;
                    }
                    let mut tokens = trimmed.split_whitespace();
                    if let Some(key) = tokens.next() {
                        return Some(Ok(RawEntry::Scalar {
                            key: key.to_lowercase(),
                            value: tokens.collect::<Vec<_>>().join(" "),
                        }));
                    }
                }
                ScanState::InsideBlock => {
                    self.block_content.push_str(&line);
                    self.block_content.push('\n');
                }
            }
        }
    }
}

// ============================================================================
// COERCION
// ============================================================================

/// Applies the fixed coercion chain: integer, float, float with unit,
/// boolean, string. The first that succeeds wins.
pub fn coerce(raw: &str) -> FdfValue {
    if let Ok(v) = raw.parse::<i64>() {
        return FdfValue::Int(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return FdfValue::Float(v);
    }

    let mut parts = raw.split_whitespace();
    if let Some(first) = parts.next() {
        if let Ok(v) = first.parse::<f64>() {
            return FdfValue::Quantity(v, parts.collect::<Vec<_>>().join(" "));
        }
    }

    match parse_bool(raw) {
        Some(b) => FdfValue::Bool(b),
        None => FdfValue::Str(raw.to_string()),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "t" | ".true." => Some(true),
        "f" | ".false." => Some(false),
        _ => None,
    }
}

/// Coerces every token of every line; blank lines are dropped.
pub fn coerce_block(body: &str) -> FdfValue {
    let rows = body
        .lines()
        .map(|line| line.split_whitespace().map(coerce).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();
    FdfValue::Block(rows)
}

// ============================================================================
// PARSER / WRITER
// ============================================================================

pub fn parse<R: BufRead>(reader: R) -> Result<ParameterMap> {
    collect_entries(FdfScanner::new(reader))
}

/// Like [`parse`], but '#' lines outside blocks are comments.
pub fn parse_skipping_comments<R: BufRead>(reader: R) -> Result<ParameterMap> {
    collect_entries(FdfScanner::new(reader).skip_comments(true))
}

fn collect_entries<R: BufRead>(scanner: FdfScanner<R>) -> Result<ParameterMap> {
    let mut content = ParameterMap::new();
    for entry in scanner {
        match entry? {
            RawEntry::Scalar { key, value } => content.insert(key, coerce(&value)),
            RawEntry::Block { name, body } => content.insert(name, coerce_block(&body)),
        }
    }
    Ok(content)
}

pub fn parse_str(text: &str) -> Result<ParameterMap> {
    parse(text.as_bytes())
}

pub fn write<W: Write>(mut out: W, parameters: &ParameterMap) -> Result<()> {
    for (key, value) in parameters.iter() {
        match value {
            FdfValue::Block(_) => {
                writeln!(out, "%block {}", key)?;
                let body = value.to_string();
                if !body.is_empty() {
                    writeln!(out, "{}", body)?;
                }
                writeln!(out, "%endblock {}", key)?;
            }
            FdfValue::Str(s) if s.is_empty() => writeln!(out, "{}", key)?,
            _ => writeln!(out, "{} {}", key, value)?,
        }
    }
    out.flush()?;
    Ok(())
}

pub struct FdfReader;

impl FileReader for FdfReader {
    fn read(&self, path: &Path) -> Result<FileContent> {
        let file = File::open(path)?;
        let parameters = parse(io::BufReader::new(file))?;
        log::info!("read {} fdf entries from {}", parameters.len(), path.display());
        Ok(FileContent::Parameters(parameters))
    }

    fn write(&self, path: &Path, content: &FileContent) -> Result<()> {
        match content {
            FileContent::Parameters(parameters) => {
                let file = File::create(path)?;
                write(BufWriter::new(file), parameters)
            }
            other => Err(Error::validation(format!(
                "cannot write {} as an fdf file",
                other.kind()
            ))),
        }
    }

    fn key(&self) -> &'static str {
        "siesta_fdf"
    }
}

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register("siesta", "fdf", || Box::new(FdfReader))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SystemLabel        water
NumberOfAtoms      3
LatticeConstant    5.43 Ang
MD.TypeOfRun       Verlet
MD.LengthTimeStep  0.5 fs
WriteCoorXmol      .true.

%block LatticeVectors
  1.0 0.0 0.0

  0.0 1.0 0.0
  0.0 0.0 1.0
%endblock LatticeVectors
%block ChemicalSpeciesLabel
 1 8 O
 2 1 H
%endblock ChemicalSpeciesLabel
";

    #[test]
    fn test_coercion_order() {
        assert_eq!(coerce("42"), FdfValue::Int(42));
        assert_eq!(coerce("-7"), FdfValue::Int(-7));
        assert_eq!(coerce("0.5"), FdfValue::Float(0.5));
        assert_eq!(coerce("1e-3"), FdfValue::Float(1e-3));
        assert_eq!(coerce("5.43 Ang"), FdfValue::Quantity(5.43, "Ang".into()));
        assert_eq!(coerce("200 Ry"), FdfValue::Quantity(200.0, "Ry".into()));
        assert_eq!(coerce("1.0 eV / Ang"), FdfValue::Quantity(1.0, "eV / Ang".into()));
        assert_eq!(coerce("Verlet"), FdfValue::Str("Verlet".into()));
        assert_eq!(coerce(""), FdfValue::Str(String::new()));
    }

    #[test]
    fn test_boolean_tokens_case_insensitive() {
        for token in ["t", "T", ".true.", ".TRUE.", ".True."] {
            assert_eq!(coerce(token), FdfValue::Bool(true), "{token}");
            assert_eq!(coerce(token).as_bool(), Some(true));
        }
        for token in ["f", "F", ".false.", ".FALSE."] {
            assert_eq!(coerce(token), FdfValue::Bool(false), "{token}");
        }
        for token in ["true", "yes", "no", "false"] {
            assert_eq!(coerce(token), FdfValue::Str(token.into()), "{token}");
        }
    }

    #[test]
    fn test_parse_scalars_and_blocks() {
        let p = parse_str(SAMPLE).unwrap();

        assert_eq!(p.get("systemlabel"), Some(&FdfValue::Str("water".into())));
        assert_eq!(p.get("numberofatoms"), Some(&FdfValue::Int(3)));
        assert_eq!(p.get("latticeconstant"), Some(&FdfValue::Quantity(5.43, "Ang".into())));
        assert_eq!(p.get("md.typeofrun"), Some(&FdfValue::Str("Verlet".into())));
        assert_eq!(p.get("writecoorxmol"), Some(&FdfValue::Bool(true)));

        let vectors = p.get_block("latticevectors").unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(
            vectors[1],
            vec![FdfValue::Float(0.0), FdfValue::Float(1.0), FdfValue::Float(0.0)]
        );

        let species = p.get_block("chemicalspecieslabel").unwrap();
        assert_eq!(
            species[0],
            vec![FdfValue::Int(1), FdfValue::Int(8), FdfValue::Str("O".into())]
        );
    }

    #[test]
    fn test_keys_keep_file_order() {
        let p = parse_str(SAMPLE).unwrap();
        let keys: Vec<&str> = p.keys().collect();
        assert_eq!(keys[0], "systemlabel");
        assert_eq!(keys[keys.len() - 1], "chemicalspecieslabel");
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let p = parse_str("MeshCutoff 100 Ry\nmeshcutoff 250 Ry\n").unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("MeshCutoff"), Some(&FdfValue::Quantity(250.0, "Ry".into())));
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let p = parse_str("SystemLabel si\n%block AtomicCoordinatesAndAtomicSpecies\n0.0 0.0 0.0 1\n")
            .unwrap();
        assert_eq!(p.len(), 1);
        assert!(!p.contains_key("atomiccoordinatesandatomicspecies"));
    }

    #[test]
    fn test_empty_block() {
        let p = parse_str("%block Empty\n\n%endblock Empty\n").unwrap();
        assert_eq!(p.get("empty"), Some(&FdfValue::Block(vec![])));
    }

    #[test]
    fn test_hash_lines_are_entries_by_default() {
        let p = parse_str("#Key value\nSystemLabel si\n").unwrap();
        assert_eq!(p.get("#key"), Some(&FdfValue::Str("value".into())));
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["#key", "systemlabel"]);
    }

    #[test]
    fn test_comment_lines_skipped_when_asked() {
        let text = "# a comment\n  # indented\nSystemLabel si\n%block B\n# kept\n%endblock B\n";
        let p = parse_skipping_comments(text.as_bytes()).unwrap();
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["systemlabel", "b"]);
        assert_eq!(p.get_block("b").unwrap()[0][0], FdfValue::Str("#".into()));
    }

    #[test]
    fn test_scanner_yields_raw_entries() {
        let entries: Vec<RawEntry> = FdfScanner::new("A  1   2\n%block B c\nx y\n%endblock B c\n".as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            entries,
            vec![
                RawEntry::Scalar {
                    key: "a".into(),
                    value: "1 2".into()
                },
                RawEntry::Block {
                    name: "b c".into(),
                    body: "x y\n".into()
                },
            ]
        );
    }

    #[test]
    fn test_written_file_reads_back_equal() {
        let original = parse_str(SAMPLE).unwrap();
        let mut buf = Vec::new();
        write(&mut buf, &original).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("%block latticevectors"));
        assert_eq!(parse_str(&text).unwrap(), original);
    }

    #[test]
    fn test_reader_through_file() {
        let path = std::env::temp_dir().join(format!("ccmp_fdf_{}.fdf", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let content = FdfReader.read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        match content {
            FileContent::Parameters(p) => assert_eq!(p.get_i64("numberofatoms"), Some(3)),
            other => panic!("unexpected content {}", other.kind()),
        }
    }
}
