// src/io/xyz.rs
// Multi-frame XYZ. SIESTA's .ANI animation file is plain XYZ with one frame
// per MD/relaxation step, so both extensions share this parser.

use super::registry::{FileContent, FileReader, Registry};
use crate::error::{Error, Result};
use crate::model::{Atom, Structure};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

pub fn parse_frames<R: BufRead>(reader: R, format: &'static str) -> Result<Vec<Structure>> {
    let mut frames = Vec::new();
    let mut lines = reader.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let line = line?;
        // Tolerate blank separators between frames
        if line.trim().is_empty() {
            continue;
        }

        // 1. Number of Atoms
        let n_atoms: usize = line
            .trim()
            .parse()
            .map_err(|_| Error::parse(format, idx + 1, format!("invalid atom count '{}'", line.trim())))?;

        // 2. Comment Line (Try to find "Lattice=...")
        let (_, comment) = lines
            .next()
            .ok_or_else(|| Error::parse(format, idx + 2, "missing comment line"))?;
        let lattice = parse_lattice(&comment?);

        // 3. Atoms
        let mut atoms = Vec::with_capacity(n_atoms);
        for _ in 0..n_atoms {
            let (atom_idx, atom_line) = lines
                .next()
                .ok_or_else(|| Error::parse(format, idx + 3 + atoms.len(), "unexpected end of frame"))?;
            atoms.push(parse_atom(&atom_line?, format, atom_idx + 1)?);
        }

        let structure = Structure::new(atoms);
        frames.push(match lattice {
            Some(cell) => structure.with_lattice(cell),
            None => structure,
        });
    }

    if frames.is_empty() {
        return Err(Error::parse(format, 0, "file contains no frames"));
    }
    Ok(frames)
}

fn parse_atom(line: &str, format: &'static str, line_no: usize) -> Result<Atom> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(Error::parse(format, line_no, "expected 'element x y z'"));
    }

    let mut position = [0.0; 3];
    for (k, raw) in parts[1..4].iter().enumerate() {
        position[k] = raw
            .parse()
            .map_err(|_| Error::parse(format, line_no, format!("invalid coordinate '{}'", raw)))?;
    }

    Ok(Atom::new(parts[0], position))
}

// Extended XYZ: Lattice="ax ay az bx by bz cx cy cz"
fn parse_lattice(comment: &str) -> Option<[[f64; 3]; 3]> {
    let start = comment.find("Lattice=\"")?;
    let remainder = &comment[start + 9..];
    let end = remainder.find('"')?;
    let parts: Vec<f64> = remainder[..end]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();

    if parts.len() == 9 {
        Some([
            [parts[0], parts[1], parts[2]],
            [parts[3], parts[4], parts[5]],
            [parts[6], parts[7], parts[8]],
        ])
    } else {
        None
    }
}

pub fn write_frames<W: Write>(mut out: W, frames: &[Structure]) -> Result<()> {
    for (i, frame) in frames.iter().enumerate() {
        writeln!(out, "{}", frame.atoms.len())?;
        match frame.lattice {
            Some(l) => writeln!(
                out,
                "Lattice=\"{} {} {} {} {} {} {} {} {}\"",
                l[0][0], l[0][1], l[0][2], l[1][0], l[1][1], l[1][2], l[2][0], l[2][1], l[2][2]
            )?,
            None => writeln!(out, "Frame {}", i + 1)?,
        }
        for atom in &frame.atoms {
            let p = atom.position;
            writeln!(out, "{:<3} {:14.8} {:14.8} {:14.8}", atom.element, p[0], p[1], p[2])?;
        }
    }
    out.flush()?;
    Ok(())
}

fn read_path(path: &Path, format: &'static str) -> Result<FileContent> {
    let file = File::open(path)?;
    let frames = parse_frames(io::BufReader::new(file), format)?;
    log::info!("read {} {} frames from {}", frames.len(), format, path.display());
    Ok(FileContent::Snapshots(frames))
}

fn write_path(path: &Path, content: &FileContent) -> Result<()> {
    match content {
        FileContent::Snapshots(frames) => {
            let file = File::create(path)?;
            write_frames(BufWriter::new(file), frames)
        }
        other => Err(Error::validation(format!(
            "cannot write {} as an XYZ file",
            other.kind()
        ))),
    }
}

/// SIESTA .ANI animation file
pub struct AniReader;

impl FileReader for AniReader {
    fn read(&self, path: &Path) -> Result<FileContent> {
        read_path(path, "ANI")
    }

    fn key(&self) -> &'static str {
        "siesta_ANI"
    }
}

pub struct XyzReader;

impl FileReader for XyzReader {
    fn read(&self, path: &Path) -> Result<FileContent> {
        read_path(path, "XYZ")
    }

    fn write(&self, path: &Path, content: &FileContent) -> Result<()> {
        write_path(path, content)
    }

    fn key(&self) -> &'static str {
        "xyz_xyz"
    }
}

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register("siesta", "ANI", || Box::new(AniReader))?;
    registry.register("xyz", "xyz", || Box::new(XyzReader))
}
