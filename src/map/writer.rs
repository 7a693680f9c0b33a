//! Map writer.

use std::io::Write;

use super::{MapDocument, MapError, WriteOptions};

pub(super) fn write<W: Write>(doc: &MapDocument, out: &mut W, options: WriteOptions) -> Result<(), MapError> {
    let registry = &doc.registry;
    let width = registry.id_width();

    let ids: Vec<String> = registry
        .iter()
        .map(|tile| if options.use_legacy_ids { tile.legacy_id.clone() } else { tile.encoded_id(width) })
        .collect();

    for (tile, id) in registry.iter().zip(&ids) {
        writeln!(out, "{}", tile.serialize(id))?;
    }

    for (z, layer) in doc.levels() {
        write!(out, "\n(1,1,{}) = {{\"\n", z)?;
        for (y, row) in layer.rows().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                let code = ids.get(id).ok_or(MapError::DanglingTile { level: z, x, y, id })?;
                out.write_all(code.as_bytes())?;
            }
            out.write_all(b"\n")?;
        }
        out.write_all(b"\"}\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::layer::Layer;
    use crate::map::{MapDocument, MapError, WriteOptions};
    use crate::models::{Atom, Tile, Value};
    use crate::resolver::BareResolver;

    const LEGACY: WriteOptions = WriteOptions { use_legacy_ids: true };

    #[test]
    fn test_write_canonical_ids() {
        let text = "\"xy\" = (/turf/floor)\n\"zz\" = (/turf/wall)\n\n(1,1,1) = {\"\nxyzz\nzzxy\n\"}\n";
        let doc = MapDocument::read_str(text, &BareResolver).unwrap();
        let out = doc.write_string(WriteOptions::default()).unwrap();
        assert_eq!(out, "\"a\" = (/turf/floor)\n\"b\" = (/turf/wall)\n\n(1,1,1) = {\"\nab\nba\n\"}\n");
    }

    #[test]
    fn test_write_legacy_ids() {
        let text = "\"xy\" = (/turf/floor)\n\"zz\" = (/turf/wall)\n\n(1,1,1) = {\"\nxyzz\nzzxy\n\"}\n";
        let doc = MapDocument::read_str(text, &BareResolver).unwrap();
        assert_eq!(doc.write_string(LEGACY).unwrap(), text);
    }

    #[test]
    fn test_header_origin_is_normalized() {
        let text = "\"a\" = (/turf/floor)\n\n(4,7,2) = {\"\na\n\"}\n";
        let doc = MapDocument::read_str(text, &BareResolver).unwrap();
        assert!(doc.write_string(LEGACY).unwrap().contains("\n(1,1,2) = {\"\n"));
    }

    #[test]
    fn test_levels_written_ascending() {
        let mut doc = MapDocument::new();
        doc.intern(Tile::new("a", vec![Atom::new("/turf/floor")]));
        doc.insert_level(5, Layer::with_size(1, 1));
        doc.insert_level(-1, Layer::with_size(1, 1));
        doc.insert_level(2, Layer::with_size(1, 1));
        let out = doc.write_string(WriteOptions::default()).unwrap();
        let first = out.find("(1,1,-1)").unwrap();
        let second = out.find("(1,1,2)").unwrap();
        let third = out.find("(1,1,5)").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_canonical_ids_padded() {
        let mut doc = MapDocument::new();
        for i in 0..60 {
            let mut atom = Atom::new("/obj/marker");
            atom.set_explicit("n", Value::Raw(i.to_string()));
            doc.intern(Tile::new(format!("{:03}", i), vec![atom]));
        }
        doc.level_mut(1).set(0, 0, 59);
        let out = doc.write_string(WriteOptions::default()).unwrap();
        assert!(out.starts_with("\"aa\" = (/obj/marker{n = 0})\n"));
        assert!(out.ends_with("(1,1,1) = {\"\nbh\n\"}\n"));
    }

    #[test]
    fn test_empty_atoms_omitted() {
        let mut doc = MapDocument::new();
        doc.intern(Tile::new("a", vec![Atom::default(), Atom::new("/turf/floor")]));
        let out = doc.write_string(WriteOptions::default()).unwrap();
        assert_eq!(out, "\"a\" = (/turf/floor)\n");
    }

    #[test]
    fn test_dangling_cell() {
        let mut doc = MapDocument::new();
        doc.intern(Tile::new("a", vec![Atom::new("/turf/floor")]));
        doc.level_mut(1).set(1, 0, 4);
        let err = doc.write_string(WriteOptions::default()).unwrap_err();
        assert!(matches!(err, MapError::DanglingTile { level: 1, x: 1, y: 0, id: 4 }));
    }
}
