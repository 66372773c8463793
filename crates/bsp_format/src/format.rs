//! The closed set of on-disk map layouts this library understands.

use derive_more::Display;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Identifies one producer-specific BSP layout
///
/// The numeric identities are stable and match the values other tools use to name these
/// layouts. Several engines share a layout with another one; those are exposed as aliases
/// (see [`MapType::GOLDSRC`], [`MapType::MOHBT`] and [`MapType::RTCW`]) rather than as
/// separate variants.
#[derive(Debug, Display, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u32)]
pub enum MapType {
    #[default]
    Undefined = 0,
    Quake = 29,
    Nightfire = 42,
    Vindictus = 346131372,
    Stef2 = 556942937,
    Mohaa = 892416069,
    Stef2Demo = 1263223129,
    Fakk = 1263223152,
    TacticalInterventionEncrypted = 1268885814,
    CoD2 = 1347633741,
    /// SiN and Jedi Outcast write identical headers
    SiN = 1347633747,
    Raven = 1347633748,
    CoD4 = 1347633759,
    Source17 = 1347633767,
    Source18 = 1347633768,
    Source19 = 1347633769,
    Source20 = 1347633770,
    Source21 = 1347633771,
    Source22 = 1347633772,
    Source23 = 1347633773,
    L4D2 = 1347633774,
    Quake2 = 1347633775,
    Source27 = 1347633777,
    Daikatana = 1347633778,
    /// Soldier of Fortune uses the Quake 3 header
    SoF = 1347633782,
    Quake3 = 1347633783,
    CoD = 1347633796,
    Titanfall = 1347633807,
    DMoMaM = 1347895914,
}

impl MapType {
    /// GoldSrc uses the Quake structures
    pub const GOLDSRC: MapType = MapType::Quake;

    /// Medal of Honor: Breakthrough is close enough to Allied Assault
    pub const MOHBT: MapType = MapType::Mohaa;

    /// Return to Castle Wolfenstein uses the Quake 3 structures
    pub const RTCW: MapType = MapType::Quake3;

    /// Every layout, with [`MapType::Undefined`] last
    pub const ALL: [MapType; 29] = [
        MapType::Quake,
        MapType::Nightfire,
        MapType::Vindictus,
        MapType::Stef2,
        MapType::Mohaa,
        MapType::Stef2Demo,
        MapType::Fakk,
        MapType::TacticalInterventionEncrypted,
        MapType::CoD2,
        MapType::SiN,
        MapType::Raven,
        MapType::CoD4,
        MapType::Source17,
        MapType::Source18,
        MapType::Source19,
        MapType::Source20,
        MapType::Source21,
        MapType::Source22,
        MapType::Source23,
        MapType::L4D2,
        MapType::Quake2,
        MapType::Source27,
        MapType::Daikatana,
        MapType::SoF,
        MapType::Quake3,
        MapType::CoD,
        MapType::Titanfall,
        MapType::DMoMaM,
        MapType::Undefined,
    ];

    /// Resolve a numeric identity, folding aliases onto the layout they share
    pub fn from_id(id: u32) -> Option<MapType> {
        match id {
            30 => Some(Self::GOLDSRC),
            1095516506 => Some(Self::MOHBT),
            1347633784 => Some(Self::RTCW),
            _ => Self::ALL.into_iter().find(|m| m.id() == id),
        }
    }

    /// The numeric identity of this layout
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Valve's engine and the games built directly on it
    pub const fn is_source(self) -> bool {
        matches!(
            self,
            MapType::Source17
                | MapType::Source18
                | MapType::Source19
                | MapType::Source20
                | MapType::Source21
                | MapType::Source22
                | MapType::Source23
                | MapType::Source27
                | MapType::L4D2
                | MapType::Vindictus
                | MapType::DMoMaM
                | MapType::TacticalInterventionEncrypted
        )
    }

    /// Quake 2 and the engines licensed from it
    pub const fn is_quake2_like(self) -> bool {
        matches!(
            self,
            MapType::Quake2 | MapType::Daikatana | MapType::SoF | MapType::SiN
        )
    }

    /// Quake 3 and the Ritual/Raven/2015 derivatives sharing its shader based layout
    pub const fn is_quake3_like(self) -> bool {
        matches!(
            self,
            MapType::Quake3
                | MapType::Raven
                | MapType::Fakk
                | MapType::Stef2
                | MapType::Stef2Demo
                | MapType::Mohaa
        )
    }

    /// Ritual's Heavy Metal: FAKK2 lineage
    pub const fn is_fakk_like(self) -> bool {
        matches!(
            self,
            MapType::Fakk | MapType::Stef2 | MapType::Stef2Demo | MapType::Mohaa
        )
    }

    /// Any Call of Duty layout
    pub const fn is_cod(self) -> bool {
        matches!(self, MapType::CoD | MapType::CoD2 | MapType::CoD4)
    }
}
