mod common;

use std::io::Cursor;
use std::sync::Arc;

use bsp_format::records::{Face, Plane, Vertex};
use bsp_format::{Bsp, BspOptions, BspReader, Error, GameLumpId, LumpKind, MapType, Result};
use common::{
    floats, floats_be, game_lump_directory, ints, shorts, static_prop_lump, CoD4Map,
    CountingReader, QuakeMap, SourceMap, TitanfallMap,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn quake_face(first_edge: i32, num_edges: u16) -> Vec<u8> {
    let mut face = Vec::new();
    face.extend_from_slice(&0u16.to_le_bytes());
    face.extend_from_slice(&0u16.to_le_bytes());
    face.extend_from_slice(&first_edge.to_le_bytes());
    face.extend_from_slice(&num_edges.to_le_bytes());
    face.extend_from_slice(&0u16.to_le_bytes());
    face.extend_from_slice(&[0xFF; 4]);
    face.extend_from_slice(&(-1i32).to_le_bytes());
    face
}

fn quake_bsp(map: QuakeMap) -> Result<Bsp<BspReader<Cursor<Vec<u8>>>>> {
    Ok(Bsp::new(BspReader::new(Cursor::new(map.build()))?))
}

#[test]
fn planes_decode_bit_exact() -> Result<()> {
    let tricky = [f32::MIN_POSITIVE / 2.0, -0.0, f32::from_bits(0x7FC0_0001), 1234.5678];
    let mut planes = floats(&tricky);
    planes.extend(ints(&[2]));

    let bsp = quake_bsp(QuakeMap::new().lump(1, planes))?;
    let decoded = bsp.planes()?.expect("quake has planes");

    assert_eq!(decoded.len(), 1);
    assert_eq!(
        decoded[0].normal.map(f32::to_bits),
        [tricky[0].to_bits(), tricky[1].to_bits(), tricky[2].to_bits()]
    );
    assert_eq!(decoded[0].distance.to_bits(), tricky[3].to_bits());
    assert_eq!(decoded[0].axis_type, 2);
    assert_eq!(decoded.map_type(), MapType::Quake);

    Ok(())
}

#[test]
fn lumps_are_decoded_once() -> Result<()> {
    let bsp = quake_bsp(QuakeMap::new().lump(1, floats(&[0.0, 0.0, 1.0, 64.0, 2.0])))?;

    let first = bsp.planes()?.expect("quake has planes");
    let second = bsp.planes()?.expect("quake has planes");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn concurrent_first_access_publishes_one_lump() -> Result<()> {
    let bsp = quake_bsp(QuakeMap::new().lump(1, floats(&[1.0, 0.0, 0.0, 8.0, 0.0])))?;

    let bsp = &bsp;
    let lumps = std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| scope.spawn(move || bsp.planes()))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("decoder thread panicked"))
            .collect::<Result<Vec<_>>>()
    })?;

    let first = lumps[0].as_ref().expect("quake has planes");
    for lump in &lumps {
        assert!(Arc::ptr_eq(first, lump.as_ref().expect("quake has planes")));
    }

    Ok(())
}

#[test]
fn absent_kind_does_not_touch_reader() -> Result<()> {
    let reader = CountingReader::new(QuakeMap::new().build())?;
    let bsp = Bsp::with_options(
        reader,
        BspOptions::builder().map_type(MapType::Quake).build(),
    );

    assert!(bsp.displacements()?.is_none());
    assert!(bsp.game_lump()?.is_none());
    assert!(bsp.static_props()?.is_none());
    assert_eq!(bsp.reader().touches(), 0);

    Ok(())
}

#[test]
fn cross_reference_copies_range() -> Result<()> {
    let surf_edges = ints(&[10, -11, 12, -13, 14, 15, 16, 17, 18, 19]);
    let mut faces = quake_face(2, 3);
    faces.extend(quake_face(8, 5));

    let bsp = quake_bsp(QuakeMap::new().lump(7, faces).lump(13, surf_edges))?;
    let faces = bsp.faces()?.expect("quake has faces");

    let edges = bsp.referenced::<u32, Face>(&faces[0], LumpKind::SurfEdges)?;
    assert_eq!(
        edges.map(|e| e.into_iter().map(|v| v as i32).collect::<Vec<_>>()),
        Some(vec![12, -13, 14])
    );

    assert!(matches!(
        bsp.referenced::<u32, Face>(&faces[1], LumpKind::SurfEdges),
        Err(Error::ReferenceOutOfRange {
            kind: LumpKind::SurfEdges,
            start: 8,
            count: 5,
            len: 10
        })
    ));

    Ok(())
}

#[test]
fn cross_reference_configuration_errors() -> Result<()> {
    let bsp = quake_bsp(QuakeMap::new().lump(7, quake_face(0, 1)))?;
    let faces = bsp.faces()?.expect("quake has faces");

    assert!(matches!(
        bsp.referenced::<Plane, Face>(&faces[0], LumpKind::Planes),
        Err(Error::Configuration {
            object: "Face",
            kind: LumpKind::Planes
        })
    ));
    assert!(matches!(
        bsp.lump::<Plane>(LumpKind::Vertices),
        Err(Error::Configuration {
            object: "Plane",
            kind: LumpKind::Vertices
        })
    ));

    // Quake has no index lump at all
    assert_eq!(bsp.referenced::<u32, Face>(&faces[0], LumpKind::Indices)?, None);

    Ok(())
}

#[traced_test]
#[test]
fn strict_records_reject_padding() -> Result<()> {
    let mut planes = floats(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    planes.extend_from_slice(&[0; 3]);
    let data = QuakeMap::new().lump(1, planes).build();

    let lenient = Bsp::new(BspReader::new(Cursor::new(data.clone()))?);
    assert_eq!(lenient.planes()?.map(|p| p.len()), Some(2));
    assert!(logs_contain("not a whole number of records"));

    let strict = Bsp::with_options(
        BspReader::new(Cursor::new(data))?,
        BspOptions::builder().strict_records(true).build(),
    );
    let err = strict.planes().expect_err("padding is rejected");
    assert!(matches!(
        err,
        Error::Lump {
            kind: LumpKind::Planes,
            ..
        }
    ));
    assert!(matches!(
        err.root(),
        Error::MalformedRecordLength {
            length: 43,
            record_size: 20,
            ..
        }
    ));

    Ok(())
}

#[test]
fn empty_lumps() -> Result<()> {
    let data = QuakeMap::new().build();

    let lenient = Bsp::new(BspReader::new(Cursor::new(data.clone()))?);
    assert_eq!(lenient.planes()?.map(|p| p.len()), Some(0));

    let strict = Bsp::with_options(
        BspReader::new(Cursor::new(data))?,
        BspOptions::builder().require_nonempty(true).build(),
    );
    assert!(matches!(
        strict.planes().map_err(|e| e.root().to_string()),
        Err(message) if message.contains("empty")
    ));

    Ok(())
}

#[test]
fn directory_bounds() -> Result<()> {
    let mut data = QuakeMap::new().build();
    // Point the vertex slot past the end of the file
    data[4 + 3 * 8 + 4..4 + 3 * 8 + 8].copy_from_slice(&4096i32.to_le_bytes());

    let bsp = Bsp::new(BspReader::new(Cursor::new(data))?);

    assert!(matches!(
        bsp.directory_entry(15),
        Err(Error::OutOfRange { index: 15, size: 15 })
    ));
    assert!(matches!(
        bsp.vertices().map_err(|e| matches!(e.root(), Error::OutOfBounds { length: 4096, .. })),
        Err(true)
    ));
    // One failing lump leaves the others usable
    assert_eq!(bsp.planes()?.map(|p| p.len()), Some(0));

    Ok(())
}

#[test]
fn entities_from_map() -> Result<()> {
    let text = b"{\n\"classname\" \"worldspawn\"\n}\n{\n\"classname\" \"light\"\n\"origin\" \"0 0 64\"\n}\n\0";
    let bsp = quake_bsp(QuakeMap::new().lump(0, text.to_vec()))?;

    let entities = bsp.entities()?.expect("quake has entities");

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[1].class_name(), Some("light"));
    assert_eq!(entities[1].origin(), Some([0.0, 0.0, 64.0]));

    Ok(())
}

#[test]
fn changing_map_type_drops_caches() -> Result<()> {
    let mut bsp = quake_bsp(QuakeMap::new().lump(1, floats(&[0.0, 1.0, 0.0, 16.0, 1.0])))?;

    let before = bsp.planes()?.expect("quake has planes");
    bsp.set_map_type(MapType::Quake);
    let after = bsp.planes()?.expect("quake has planes");

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);

    bsp.set_map_type(MapType::Quake3);
    assert_eq!(bsp.map_type()?, MapType::Quake3);
    assert!(bsp.edges()?.is_none());

    Ok(())
}

fn source_with_game_lump(payload_relative: bool) -> Vec<u8> {
    let planes = floats(&[0.0, 0.0, 1.0, 128.0, 2.0]);
    let props = static_prop_lump("models/props_c17/oildrum001.mdl", [16.0, 32.0, 0.0], &[3, 4]);

    let map = SourceMap::new(20).lump(1, 0, planes);
    let outer_offset = map.next_offset() as i32;
    let directory_size = 4 + 16;
    let sub_offset = match payload_relative {
        true => directory_size,
        false => outer_offset + directory_size,
    };

    let mut game_lump = game_lump_directory(&[(b"sprp", 10, sub_offset, props.len() as i32)]);
    game_lump.extend(props);

    map.lump(35, 0, game_lump).build()
}

#[test]
fn game_lump_offsets_relative_to_payload() -> Result<()> {
    let bsp = Bsp::with_options(
        BspReader::new(Cursor::new(source_with_game_lump(true)))?,
        BspOptions::builder().strict_game_lumps(true).build(),
    );

    assert_eq!(bsp.map_type()?, MapType::Source20);
    let game_lump = bsp.game_lump()?.expect("source has a game lump");
    assert!(game_lump.is_payload_relative());
    assert_eq!(
        game_lump.get(GameLumpId::STATIC_PROPS).map(|i| i.offset),
        Some(SourceMap::HEADER_SIZE as u64 + 20 + 20)
    );

    let props = bsp.static_props()?.expect("static props are listed");
    assert_eq!(props.version, 10);
    assert_eq!(props.props.len(), 1);
    assert_eq!(props.props[0].origin, [16.0, 32.0, 0.0]);
    assert_eq!(
        props.model_name(&props.props[0]),
        Some("models/props_c17/oildrum001.mdl")
    );
    assert_eq!(props.leaves_of(&props.props[0])?, vec![3, 4]);

    Ok(())
}

#[test]
fn game_lump_offsets_relative_to_file() -> Result<()> {
    let bsp = Bsp::with_options(
        BspReader::new(Cursor::new(source_with_game_lump(false)))?,
        BspOptions::builder().strict_game_lumps(true).build(),
    );

    let game_lump = bsp.game_lump()?.expect("source has a game lump");
    assert!(!game_lump.is_payload_relative());

    let props = bsp.static_props()?.expect("static props are listed");
    assert_eq!(props.props[0].origin, [16.0, 32.0, 0.0]);
    assert_eq!(bsp.game_lump_data(GameLumpId::DETAIL_PROPS)?, None);
    assert_eq!(bsp.planes()?.map(|p| p[0].distance), Some(128.0));

    Ok(())
}

#[test]
fn call_of_duty_4_sequential_directory() -> Result<()> {
    let planes = floats(&[0.0, 0.0, 1.0, 8.0, 1.0, 0.0, 0.0, -8.0]);
    let mut vertex = floats(&[1.0, 2.0, 3.0, 0.0, 0.0, 1.0]);
    vertex.extend_from_slice(&[255, 255, 255, 255]);
    vertex.extend(floats(&[0.5, 0.5, 0.25, 0.25, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
    let patch_vertices = floats(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    let indices = shorts(&[0, 1, 2]);

    let data = CoD4Map::new()
        .lump(0, vec![0; 72])
        .lump(4, planes)
        .lump(10, vertex)
        .lump(11, indices)
        .lump(25, patch_vertices)
        .build();
    let bsp = Bsp::new(BspReader::new(Cursor::new(data))?);

    assert_eq!(bsp.map_type()?, MapType::CoD4);

    let planes = bsp.planes()?.expect("call of duty 4 has planes");
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[1].distance, -8.0);

    let vertices = bsp.vertices()?.expect("call of duty 4 has vertices");
    assert_eq!(vertices.len(), 1);
    assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
    assert_eq!(vertices[0].texture_coords, [0.5, 0.5]);

    let patch_vertices = bsp.patch_vertices()?.expect("call of duty 4 has patch vertices");
    assert_eq!(
        patch_vertices
            .iter()
            .map(|v: &Vertex| v.position)
            .collect::<Vec<_>>(),
        vec![[4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]
    );
    assert_eq!(patch_vertices.info().version, 1);
    assert_eq!(bsp.directory_entry(25)?.version, 0);

    assert_eq!(bsp.indices()?.map(|i| i.to_vec()), Some(vec![0, 1, 2]));
    assert_eq!(bsp.count(LumpKind::Textures)?, Some(1));
    assert_eq!(bsp.count(LumpKind::Nodes)?, Some(0));
    assert_eq!(bsp.count(LumpKind::Edges)?, None);

    Ok(())
}

#[test]
fn sidecar_lump_file() -> Result<()> {
    let dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("sidecar_lump_file");
    std::fs::create_dir_all(&dir)?;

    let map_path = dir.join("sidecar.bsp");
    std::fs::write(
        &map_path,
        SourceMap::new(20).lump(1, 0, floats(&[0.0, 0.0, 1.0, 1.0, 2.0])).build(),
    )?;

    let planes = floats(&[1.0, 0.0, 0.0, 32.0, 0.0, 0.0, 1.0, 0.0, 64.0, 1.0]);
    let mut lump_file = ints(&[20, 1, 0, planes.len() as i32, 1]);
    lump_file.extend(&planes);
    std::fs::write(dir.join("sidecar_l_1.lmp"), lump_file)?;

    let bsp = Bsp::open(&map_path)?;
    let planes = bsp.planes()?.expect("source has planes");

    assert_eq!(planes.len(), 2);
    assert_eq!(planes[1].distance, 64.0);
    assert_eq!(
        planes.info().lump_file.as_deref(),
        Some(dir.join("sidecar_l_1.lmp").as_path())
    );

    Ok(())
}

#[test]
fn titanfall_sidecar_keeps_directory_slot() -> Result<()> {
    let dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("titanfall_sidecar");
    std::fs::create_dir_all(&dir)?;

    let map_path = dir.join("mp_sidecar.bsp");
    std::fs::write(
        &map_path,
        TitanfallMap::new().slot(1, 32, 3, *b"PLNE").build(),
    )?;

    let lump_path = dir.join("mp_sidecar.bsp.0001.bsp_lump");
    std::fs::write(
        &lump_path,
        floats(&[0.0, 0.0, 1.0, 16.0, 1.0, 0.0, 0.0, -32.0]),
    )?;

    let bsp = Bsp::open(&map_path)?;
    assert_eq!(bsp.map_type()?, MapType::Titanfall);

    let info = bsp.directory_entry(1)?;
    assert_eq!(info.version, 3);
    assert_eq!(info.ident, i32::from_le_bytes(*b"PLNE"));
    assert_eq!(info.offset, 0);
    assert_eq!(info.length, 32);
    assert_eq!(info.lump_file.as_deref(), Some(lump_path.as_path()));

    let planes = bsp.planes()?.expect("titanfall has planes");
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(planes[1].distance, -32.0);

    // Slots without a sidecar file stay in the map
    assert_eq!(bsp.directory_entry(3)?.lump_file, None);

    Ok(())
}

#[test]
fn big_endian_source_map() -> Result<()> {
    let mut planes = floats_be(&[0.0, 1.0, 0.0, 256.0]);
    planes.extend_from_slice(&1i32.to_be_bytes());

    let map = SourceMap::big_endian(20).lump(1, 0, planes);
    let props_offset = map.next_offset() + 4 + 2 * 16;

    let mut props = 1i32.to_be_bytes().to_vec();
    let mut name = b"models/console.mdl".to_vec();
    name.resize(128, 0);
    props.extend(name);
    props.extend_from_slice(&0i32.to_be_bytes());
    props.extend_from_slice(&0i32.to_be_bytes());
    let detail = [9u8, 8, 7, 6];

    let mut game_lump = 2i32.to_be_bytes().to_vec();
    for (id, version, offset, length) in [
        (b"sprp", 10u16, props_offset, props.len()),
        (b"dprp", 4u16, props_offset + props.len(), detail.len()),
    ] {
        game_lump.extend_from_slice(id);
        game_lump.extend_from_slice(&0u16.to_be_bytes());
        game_lump.extend_from_slice(&version.to_be_bytes());
        game_lump.extend_from_slice(&(offset as i32).to_be_bytes());
        game_lump.extend_from_slice(&(length as i32).to_be_bytes());
    }
    game_lump.extend(props);
    game_lump.extend_from_slice(&detail);

    let bsp = Bsp::with_options(
        BspReader::new(Cursor::new(map.lump(35, 0, game_lump).build()))?,
        BspOptions::builder().strict_game_lumps(true).build(),
    );

    assert_eq!(bsp.map_type()?, MapType::Source20);
    assert_eq!(bsp.endian(), binrw::Endian::Big);

    let planes = bsp.planes()?.expect("source has planes");
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0].normal, [0.0, 1.0, 0.0]);
    assert_eq!(planes[0].distance, 256.0);
    assert_eq!(planes[0].axis_type, 1);

    let game_lump = bsp.game_lump()?.expect("source has a game lump");
    assert!(!game_lump.is_payload_relative());
    assert_eq!(game_lump.get(GameLumpId::STATIC_PROPS).map(|i| i.version), Some(10));

    let props = bsp.static_props()?.expect("static props are listed");
    assert_eq!(props.names, vec!["models/console.mdl".to_string()]);
    assert!(props.props.is_empty());

    assert_eq!(
        bsp.game_lump_data(GameLumpId::DETAIL_PROPS)?,
        Some(detail.to_vec())
    );

    Ok(())
}
