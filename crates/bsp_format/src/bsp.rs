//! The map container: lazy, cached access to every semantic lump of one map.

use std::{
    any::Any,
    fmt::{self, Debug},
    fs::File,
    io::BufReader,
    path::Path,
    sync::{Arc, OnceLock},
};

use binrw::Endian;
use bon::Builder;
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    format::MapType,
    game_lump::{GameLump, GameLumpId},
    lump::{Lump, LumpInfo, NumList},
    read::{BspReader, MapReader},
    records::{
        Brush, BrushSide, Cubemap, DecodeContext, Displacement, DisplacementVertex, Edge, Entity,
        Face, Leaf, LodTerrain, LumpObject, LumpReference, Model, Node, Patch, Plane,
        StaticModel, Texture, TextureData, TextureInfo, Vertex,
    },
    registry::{directory_size, index_for, LumpKind},
    static_props::StaticProps,
};

/// Options controlling how strictly a map is decoded
///
/// ```
/// use bsp_format::{BspOptions, MapType};
///
/// let options = BspOptions::builder()
///     .strict_records(true)
///     .map_type(MapType::Source20)
///     .build();
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct BspOptions {
    /// Reject lumps that are not a whole number of records instead of truncating them
    #[builder(default)]
    pub strict_records: bool,

    /// Reject present lumps whose byte range is empty
    #[builder(default)]
    pub require_nonempty: bool,

    /// Reject game sub-lumps that lie outside the game lump once their offsets are resolved
    #[builder(default)]
    pub strict_game_lumps: bool,

    /// Use this layout instead of identifying it from the file header
    pub map_type: Option<MapType>,
}

type CachedLump = Option<Arc<dyn Any + Send + Sync>>;

/// A map file and the lumps decoded from it so far
///
/// Nothing is read until it is asked for. Each directory slot is read at most once and each
/// semantic lump decoded at most once; repeated requests hand out the same [`Arc`]. Caches are
/// per slot, so decoding one lump never waits on another one. Two threads asking for the same
/// lump at the same moment may both decode it, but only one result is ever published.
///
/// ```no_run
/// use bsp_format::Bsp;
///
/// let bsp = Bsp::open("maps/q3dm17.bsp")?;
/// if let Some(faces) = bsp.faces()? {
///     for face in faces.iter() {
///         let vertices = bsp.referenced::<bsp_format::records::Vertex, _>(
///             face,
///             bsp_format::LumpKind::Vertices,
///         )?;
///         println!("{} vertices", vertices.map_or(0, |v| v.len()));
///     }
/// }
/// # Ok::<(), bsp_format::Error>(())
/// ```
pub struct Bsp<R> {
    reader: R,
    options: BspOptions,
    map_type: OnceLock<MapType>,
    directory: OnceLock<Box<[OnceLock<LumpInfo>]>>,
    lumps: [OnceLock<CachedLump>; LumpKind::COUNT],
    game_lump: OnceLock<Option<Arc<GameLump>>>,
    static_props: OnceLock<Option<Arc<StaticProps>>>,
}

impl<R: Debug> Debug for Bsp<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Bsp")
            .field("reader", &self.reader)
            .field("options", &self.options)
            .field("map_type", &self.map_type.get())
            .finish_non_exhaustive()
    }
}

impl Bsp<BspReader<BufReader<File>>> {
    /// Open a map file with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Bsp::new(BspReader::open(path)?))
    }
}

impl<R: MapReader> Bsp<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, BspOptions::default())
    }

    pub fn with_options(reader: R, options: BspOptions) -> Self {
        Self {
            reader,
            map_type: options.map_type.map(OnceLock::from).unwrap_or_default(),
            options,
            directory: OnceLock::new(),
            lumps: std::array::from_fn(|_| OnceLock::new()),
            game_lump: OnceLock::new(),
            static_props: OnceLock::new(),
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn options(&self) -> &BspOptions {
        &self.options
    }

    /// The layout used to decode this map
    ///
    /// An explicitly chosen layout wins; otherwise the reader identifies it from the header the
    /// first time it is needed.
    pub fn map_type(&self) -> Result<MapType> {
        if let Some(map_type) = self.map_type.get() {
            return Ok(*map_type);
        }

        let map_type = self.reader.map_type()?;
        Ok(*self.map_type.get_or_init(|| map_type))
    }

    /// Decode with a different layout from now on
    ///
    /// Every cached directory entry and lump was produced for the previous layout and is
    /// dropped.
    pub fn set_map_type(&mut self, map_type: MapType) {
        self.options.map_type = Some(map_type);
        self.map_type = OnceLock::from(map_type);
        self.directory = OnceLock::new();
        self.lumps = std::array::from_fn(|_| OnceLock::new());
        self.game_lump = OnceLock::new();
        self.static_props = OnceLock::new();
    }

    /// Byte order of multi-byte values in this map
    pub fn endian(&self) -> Endian {
        match self.reader.is_big_endian() {
            true => Endian::Big,
            false => Endian::Little,
        }
    }

    /// Number of slots in this map's lump directory
    pub fn directory_size(&self) -> Result<usize> {
        let map_type = self.map_type()?;
        directory_size(map_type)
            .ok_or_else(|| Error::InvalidInput(format!("{map_type} has no lump directory")))
    }

    /// The descriptor stored in directory slot `index`
    pub fn directory_entry(&self, index: usize) -> Result<&LumpInfo> {
        let map_type = self.map_type()?;
        let size = self.directory_size()?;

        let directory = self
            .directory
            .get_or_init(|| (0..size).map(|_| OnceLock::new()).collect());
        let slot = directory
            .get(index)
            .ok_or(Error::OutOfRange { index, size })?;

        if let Some(info) = slot.get() {
            return Ok(info);
        }

        let info = self.reader.lump_info(index, map_type)?;
        Ok(slot.get_or_init(|| info))
    }

    /// The raw bytes of directory slot `index`
    pub fn raw_lump(&self, index: usize) -> Result<Vec<u8>> {
        let info = self.directory_entry(index)?;
        self.reader.read_lump(info)
    }

    /// Whether this map's layout has a slot for `kind`
    pub fn has_lump(&self, kind: LumpKind) -> Result<bool> {
        Ok(index_for(kind, self.map_type()?).is_some())
    }

    /// The decoded lump of `kind`, or `None` when this map's layout has no such lump
    ///
    /// `T` must be the record type stored in `kind` lumps; asking for any other pairing fails
    /// with [`Error::Configuration`].
    pub fn lump<T: LumpObject>(&self, kind: LumpKind) -> Result<Option<Arc<Lump<T>>>> {
        if !T::KINDS.contains(&kind) {
            return Err(Error::Configuration {
                object: T::NAME,
                kind,
            });
        }

        let cell = &self.lumps[kind.slot()];
        let cached = match cell.get() {
            Some(cached) => cached.clone(),
            None => {
                let decoded = self.decode::<T>(kind).map_err(|err| err.in_lump(kind))?;
                cell.get_or_init(|| decoded).clone()
            }
        };

        match cached {
            None => Ok(None),
            Some(lump) => lump.downcast::<Lump<T>>().map(Some).map_err(|_| {
                Error::Configuration {
                    object: T::NAME,
                    kind,
                }
            }),
        }
    }

    #[instrument(skip(self), fields(object = T::NAME), err)]
    fn decode<T: LumpObject>(&self, kind: LumpKind) -> Result<CachedLump> {
        let map_type = self.map_type()?;
        let Some(index) = index_for(kind, map_type) else {
            debug!(%kind, %map_type, "lump is not present in this format");
            return Ok(None);
        };

        let mut info = self.directory_entry(index)?.clone();
        // Patch vertices are plain float triples whatever the map's vertex layout is
        if kind == LumpKind::PatchVerts {
            info = info.with_version(1);
        }

        let bytes = self.reader.read_lump(&info)?;
        if bytes.is_empty() && self.options.require_nonempty {
            return Err(Error::InvalidInput(format!("the {kind} lump is empty")));
        }

        let ctx = DecodeContext {
            kind,
            map_type,
            info: &info,
            endian: self.endian(),
            options: &self.options,
        };
        let Some(items) = T::decode_lump(&bytes, &ctx)? else {
            debug!(%kind, %map_type, "no {} layout for this format", T::NAME);
            return Ok(None);
        };

        Ok(Some(Arc::new(Lump::new(items, info, map_type))))
    }

    /// Copy `count` records of `kind` starting at `start`
    ///
    /// `None` when this map's layout has no `kind` lump.
    pub fn resolve<T: LumpObject + Clone>(
        &self,
        kind: LumpKind,
        start: usize,
        count: usize,
    ) -> Result<Option<Vec<T>>> {
        let Some(lump) = self.lump::<T>(kind)? else {
            return Ok(None);
        };

        start
            .checked_add(count)
            .and_then(|end| lump.get(start..end))
            .map(|range| Some(range.to_vec()))
            .ok_or(Error::ReferenceOutOfRange {
                kind,
                start,
                count,
                len: lump.len(),
            })
    }

    /// Copy the range of `kind` that `record` points at
    ///
    /// Fails with [`Error::Configuration`] when `O` carries no range into `kind`.
    pub fn referenced<T, O>(&self, record: &O, kind: LumpKind) -> Result<Option<Vec<T>>>
    where
        T: LumpObject + Clone,
        O: LumpReference,
    {
        let configuration = || Error::Configuration {
            object: O::NAME,
            kind,
        };

        if !O::REFERENCES.contains(&kind) {
            return Err(configuration());
        }
        let (start, count) = record.reference(kind).ok_or_else(configuration)?;

        self.resolve(kind, start, count)
    }

    /// The game lump directory, or `None` when this map's layout has none
    pub fn game_lump(&self) -> Result<Option<Arc<GameLump>>> {
        if let Some(cached) = self.game_lump.get() {
            return Ok(cached.clone());
        }

        let decoded = self
            .decode_game_lump()
            .map_err(|err| err.in_lump(LumpKind::GameLump))?;
        Ok(self.game_lump.get_or_init(|| decoded).clone())
    }

    #[instrument(skip(self), err)]
    fn decode_game_lump(&self) -> Result<Option<Arc<GameLump>>> {
        let map_type = self.map_type()?;
        let Some(index) = index_for(LumpKind::GameLump, map_type) else {
            debug!(%map_type, "game lump is not present in this format");
            return Ok(None);
        };

        let info = self.directory_entry(index)?;
        let bytes = self.reader.read_lump(info)?;
        if bytes.is_empty() && self.options.require_nonempty {
            return Err(Error::InvalidInput("the game lump is empty".to_string()));
        }

        GameLump::parse(
            &bytes,
            info,
            map_type,
            self.endian(),
            self.options.strict_game_lumps,
        )
        .map(|lump| Some(Arc::new(lump)))
    }

    /// The raw bytes of game sub-lump `id`, or `None` when it is not listed
    pub fn game_lump_data(&self, id: GameLumpId) -> Result<Option<Vec<u8>>> {
        let Some(game_lump) = self.game_lump()? else {
            return Ok(None);
        };
        let Some(info) = game_lump.get(id) else {
            return Ok(None);
        };

        self.reader
            .read_lump(info)
            .map(Some)
            .map_err(|err| err.in_lump(LumpKind::GameLump))
    }

    /// The static prop sub-lump, or `None` when the map has none
    pub fn static_props(&self) -> Result<Option<Arc<StaticProps>>> {
        if let Some(cached) = self.static_props.get() {
            return Ok(cached.clone());
        }

        let decoded = self
            .decode_static_props()
            .map_err(|err| err.in_lump(LumpKind::GameLump))?;
        Ok(self.static_props.get_or_init(|| decoded).clone())
    }

    fn decode_static_props(&self) -> Result<Option<Arc<StaticProps>>> {
        let Some(game_lump) = self.game_lump()? else {
            return Ok(None);
        };
        let Some(info) = game_lump.get(GameLumpId::STATIC_PROPS) else {
            return Ok(None);
        };

        let bytes = self.reader.read_lump(info)?;
        StaticProps::parse(
            &bytes,
            info.version,
            self.endian(),
            self.options.strict_records,
        )
        .map(|props| Some(Arc::new(props)))
    }

    /// Number of elements in the lump of `kind`, decoding it if needed
    pub fn count(&self, kind: LumpKind) -> Result<Option<usize>> {
        use LumpKind::*;

        fn len<R: MapReader, T: LumpObject>(
            bsp: &Bsp<R>,
            kind: LumpKind,
        ) -> Result<Option<usize>> {
            Ok(bsp.lump::<T>(kind)?.map(|lump| lump.len()))
        }

        match kind {
            Entities => len::<R, Entity>(self, kind),
            Planes => len::<R, Plane>(self, kind),
            Textures | Materials => len::<R, Texture>(self, kind),
            Vertices | PatchVerts => len::<R, Vertex>(self, kind),
            Nodes => len::<R, Node>(self, kind),
            TexInfo => len::<R, TextureInfo>(self, kind),
            Faces | OriginalFaces => len::<R, Face>(self, kind),
            Leaves => len::<R, Leaf>(self, kind),
            Edges => len::<R, Edge>(self, kind),
            Models => len::<R, Model>(self, kind),
            Brushes => len::<R, Brush>(self, kind),
            BrushSides => len::<R, BrushSide>(self, kind),
            TexDatas => len::<R, TextureData>(self, kind),
            DispInfos => len::<R, Displacement>(self, kind),
            DispVerts => len::<R, DisplacementVertex>(self, kind),
            Cubemaps => len::<R, Cubemap>(self, kind),
            StaticModels => len::<R, StaticModel>(self, kind),
            LodTerrains => len::<R, LodTerrain>(self, kind),
            Patches => len::<R, Patch>(self, kind),
            GameLump => Ok(self.game_lump()?.map(|lump| lump.len())),
            MarkSurfaces | SurfEdges | MarkBrushes | PatchIndices | LeafPatches | Indices
            | TexTable | DisplacementTriangles => len::<R, u32>(self, kind),
        }
    }

    pub fn entities(&self) -> Result<Option<Arc<Lump<Entity>>>> {
        self.lump(LumpKind::Entities)
    }

    pub fn planes(&self) -> Result<Option<Arc<Lump<Plane>>>> {
        self.lump(LumpKind::Planes)
    }

    pub fn textures(&self) -> Result<Option<Arc<Lump<Texture>>>> {
        self.lump(LumpKind::Textures)
    }

    /// Nightfire keeps material names apart from texture names
    pub fn materials(&self) -> Result<Option<Arc<Lump<Texture>>>> {
        self.lump(LumpKind::Materials)
    }

    pub fn vertices(&self) -> Result<Option<Arc<Lump<Vertex>>>> {
        self.lump(LumpKind::Vertices)
    }

    pub fn nodes(&self) -> Result<Option<Arc<Lump<Node>>>> {
        self.lump(LumpKind::Nodes)
    }

    pub fn texture_infos(&self) -> Result<Option<Arc<Lump<TextureInfo>>>> {
        self.lump(LumpKind::TexInfo)
    }

    pub fn faces(&self) -> Result<Option<Arc<Lump<Face>>>> {
        self.lump(LumpKind::Faces)
    }

    /// Source faces before they were split by the BSP tree
    pub fn original_faces(&self) -> Result<Option<Arc<Lump<Face>>>> {
        self.lump(LumpKind::OriginalFaces)
    }

    pub fn leaves(&self) -> Result<Option<Arc<Lump<Leaf>>>> {
        self.lump(LumpKind::Leaves)
    }

    pub fn edges(&self) -> Result<Option<Arc<Lump<Edge>>>> {
        self.lump(LumpKind::Edges)
    }

    pub fn models(&self) -> Result<Option<Arc<Lump<Model>>>> {
        self.lump(LumpKind::Models)
    }

    pub fn brushes(&self) -> Result<Option<Arc<Lump<Brush>>>> {
        self.lump(LumpKind::Brushes)
    }

    pub fn brush_sides(&self) -> Result<Option<Arc<Lump<BrushSide>>>> {
        self.lump(LumpKind::BrushSides)
    }

    pub fn texture_datas(&self) -> Result<Option<Arc<Lump<TextureData>>>> {
        self.lump(LumpKind::TexDatas)
    }

    pub fn displacements(&self) -> Result<Option<Arc<Lump<Displacement>>>> {
        self.lump(LumpKind::DispInfos)
    }

    pub fn displacement_vertices(&self) -> Result<Option<Arc<Lump<DisplacementVertex>>>> {
        self.lump(LumpKind::DispVerts)
    }

    pub fn cubemaps(&self) -> Result<Option<Arc<Lump<Cubemap>>>> {
        self.lump(LumpKind::Cubemaps)
    }

    pub fn static_models(&self) -> Result<Option<Arc<Lump<StaticModel>>>> {
        self.lump(LumpKind::StaticModels)
    }

    pub fn lod_terrains(&self) -> Result<Option<Arc<Lump<LodTerrain>>>> {
        self.lump(LumpKind::LodTerrains)
    }

    pub fn patches(&self) -> Result<Option<Arc<Lump<Patch>>>> {
        self.lump(LumpKind::Patches)
    }

    /// Call of Duty collision patch vertices, always decoded as float triples
    pub fn patch_vertices(&self) -> Result<Option<Arc<Lump<Vertex>>>> {
        self.lump(LumpKind::PatchVerts)
    }

    pub fn mark_surfaces(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::MarkSurfaces)
    }

    /// Signed edge indices stored unsigned; reinterpret as `i32` to recover edge direction
    pub fn surf_edges(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::SurfEdges)
    }

    pub fn mark_brushes(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::MarkBrushes)
    }

    pub fn patch_indices(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::PatchIndices)
    }

    pub fn leaf_patches(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::LeafPatches)
    }

    pub fn indices(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::Indices)
    }

    /// Byte offsets into the Source texture name blob
    pub fn texture_table(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::TexTable)
    }

    pub fn displacement_triangles(&self) -> Result<Option<Arc<NumList>>> {
        self.lump(LumpKind::DisplacementTriangles)
    }
}
