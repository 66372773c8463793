use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

/// A Quake map with `count` planes, faces and surface edges
fn synthetic_map(count: usize) -> Vec<u8> {
    let mut lumps = vec![Vec::new(); 15];

    for i in 0..count {
        let plane = &mut lumps[1];
        for value in [0.0f32, 0.0, 1.0, i as f32] {
            plane.extend_from_slice(&value.to_le_bytes());
        }
        plane.extend_from_slice(&2i32.to_le_bytes());

        let face = &mut lumps[7];
        face.extend_from_slice(&(i as u16).to_le_bytes());
        face.extend_from_slice(&0u16.to_le_bytes());
        face.extend_from_slice(&(i as i32).to_le_bytes());
        face.extend_from_slice(&1u16.to_le_bytes());
        face.extend_from_slice(&0u16.to_le_bytes());
        face.extend_from_slice(&[0xFF; 4]);
        face.extend_from_slice(&(-1i32).to_le_bytes());

        lumps[13].extend_from_slice(&(i as i32).to_le_bytes());
    }

    let header_size = 4 + lumps.len() * 8;
    let mut out = 29i32.to_le_bytes().to_vec();
    let mut data = Vec::new();
    for lump in &lumps {
        out.extend_from_slice(&((header_size + data.len()) as i32).to_le_bytes());
        out.extend_from_slice(&(lump.len() as i32).to_le_bytes());
        data.extend_from_slice(lump);
    }
    out.extend(data);
    out
}

pub mod decode {
    use std::io::Cursor;

    use bsp_format::{Bsp, BspReader, LumpKind};
    use divan::Bencher;

    use super::synthetic_map;

    fn open(data: Vec<u8>) -> Bsp<BspReader<Cursor<Vec<u8>>>> {
        Bsp::new(BspReader::new(Cursor::new(data)).unwrap())
    }

    #[divan::bench(args = [100, 10_000])]
    fn planes(bencher: Bencher, count: usize) {
        bencher
            .with_inputs(|| open(synthetic_map(count)))
            .bench_values(|bsp| {
                divan::black_box(bsp.planes().unwrap());
            });
    }

    #[divan::bench(args = [100, 10_000])]
    fn cached_planes(bencher: Bencher, count: usize) {
        let bsp = open(synthetic_map(count));
        bsp.planes().unwrap();

        bencher.bench_local(|| {
            divan::black_box(bsp.planes().unwrap());
        });
    }

    #[divan::bench(args = [10_000])]
    fn face_edges(bencher: Bencher, count: usize) {
        let bsp = open(synthetic_map(count));
        let faces = bsp.faces().unwrap().unwrap();

        bencher.bench_local(|| {
            for face in faces.iter() {
                divan::black_box(
                    bsp.referenced::<u32, _>(face, LumpKind::SurfEdges)
                        .unwrap(),
                );
            }
        });
    }
}
