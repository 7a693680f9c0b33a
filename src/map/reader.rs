//! Line-oriented map reader.

use std::io::BufRead;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::{MapDocument, MapError};
use crate::builder::build_atom;
use crate::layer::Layer;
use crate::models::Tile;
use crate::registry::{Interned, Registry};
use crate::resolver::TypeResolver;
use crate::splitter::split;

const BLOCK_END: &str = "\"}";

/// `(x,y,z) = {"`
fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(-?\d+)\s*\)\s*=\s*\{"$"#).expect("valid regex")
    })
}

enum State {
    Definitions,
    Between,
    Level { z: i32, start: usize, y: usize, layer: Layer },
}

pub(super) fn read<R: BufRead>(input: R, resolver: &dyn TypeResolver) -> Result<MapDocument, MapError> {
    let mut doc = MapDocument::new();
    let mut state = State::Definitions;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => MapError::Encoding { line: line_no, source: e },
            _ => MapError::Io(e),
        })?;
        let text = line.trim_end();

        if let State::Definitions = state {
            if text.starts_with('"') && text != BLOCK_END {
                read_definition(&mut doc, text, line_no, resolver)?;
                continue;
            }
            info!(
                tiles = doc.registry.tiles().len(),
                duplicates = doc.registry.duplicates(),
                "Tile definitions loaded"
            );
            state = State::Between;
        }

        state = match state {
            State::Level { z, start, y, mut layer } => {
                let row = text.trim_start();
                if row == BLOCK_END {
                    finish_level(&mut doc, z, layer);
                    State::Between
                } else {
                    read_row(&doc, &mut layer, row, y, line_no)?;
                    State::Level { z, start, y: y + 1, layer }
                }
            }
            _ => {
                let text = text.trim_start();
                if text.is_empty() {
                    State::Between
                } else if text == BLOCK_END {
                    return Err(MapError::StrayBlockEnd { line: line_no });
                } else if text.starts_with('(') {
                    let z = parse_header(text, line_no)?;
                    State::Level { z, start: line_no, y: 0, layer: Layer::new() }
                } else {
                    return Err(MapError::UnexpectedLine { line: line_no, text: text.to_string() });
                }
            }
        };
    }

    if let State::Level { z, start, .. } = state {
        return Err(MapError::UnterminatedLevel { level: z, line: start });
    }
    Ok(doc)
}

/// `"<id>" = (<atom>,<atom>,...)`
fn read_definition(
    doc: &mut MapDocument,
    text: &str,
    line: usize,
    resolver: &dyn TypeResolver,
) -> Result<(), MapError> {
    let malformed = || MapError::MalformedDefinition { line, text: text.to_string() };

    let rest = &text[1..];
    let close = rest.find('"').ok_or_else(malformed)?;
    let legacy_id = &rest[..close];
    if legacy_id.is_empty() {
        return Err(malformed());
    }
    let body = rest[close + 1..]
        .trim_start()
        .strip_prefix('=')
        .map(str::trim)
        .and_then(|s| s.strip_prefix('('))
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let chunks = split(body, ',').map_err(|source| MapError::Split { line, source })?;
    let atoms = chunks
        .into_iter()
        .map(|chunk| build_atom(chunk, resolver))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| MapError::Atom { line, source })?;

    if doc.registry.contains(legacy_id) {
        warn!(line, id = legacy_id, "Tile ID defined twice; the later definition wins");
    }

    match doc.registry.intern(Tile::new(legacy_id, atoms)) {
        Interned::New(id) => debug!(line, legacy_id, id, "Registered tile"),
        Interned::Duplicate(id) => debug!(line, legacy_id, id, "Duplicate tile, installing redirect"),
    }
    Ok(())
}

fn parse_header(text: &str, line: usize) -> Result<i32, MapError> {
    let malformed = || MapError::MalformedHeader { line, text: text.to_string() };
    let caps = header_regex().captures(text).ok_or_else(malformed)?;
    caps[3].parse().map_err(|_| malformed())
}

fn read_row(doc: &MapDocument, layer: &mut Layer, row: &str, y: usize, line: usize) -> Result<(), MapError> {
    let width = doc.registry.legacy_width();
    if width == 0 {
        return Err(MapError::NoTiles { line });
    }

    let chars: Vec<char> = row.chars().collect();
    if chars.is_empty() || chars.len() % width != 0 {
        return Err(MapError::RaggedRow { line, length: chars.len(), width });
    }

    for (x, chunk) in chars.chunks(width).enumerate() {
        let legacy_id: String = chunk.iter().collect();
        let id = doc
            .registry
            .lookup(&legacy_id)
            .ok_or(MapError::UnknownLegacyId { line, id: legacy_id })?;
        layer.set(x, y, id);
    }
    Ok(())
}

fn finish_level(doc: &mut MapDocument, z: i32, layer: Layer) {
    info!(level = z, width = layer.width(), height = layer.height(), "Added map level");
    if doc.levels.insert(z, layer).is_some() {
        warn!(level = z, "Level defined twice; the later block wins");
    }
}
