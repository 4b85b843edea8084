//! Routing configuration (spec.md §6 `VirtualObstacleConfig`).
use derive_builder::Builder;

/// Tunables for the static and port-aware obstacle checkers.
///
/// Built with the same `#[builder(default)]` idiom used elsewhere in this
/// crate's data model: construct with [`VirtualObstacleConfigBuilder`] and
/// override only the fields that matter, or use [`VirtualObstacleConfig::default`]
/// to get the defaults from spec.md §6 directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct VirtualObstacleConfig {
    /// Corridor length `L` around reserved ports; also governs virtual zone
    /// size when [`Self::emit_virtual_side_zones`] is set.
    #[builder(default = "2")]
    pub approach_zone_size: i32,

    /// Width of the permitted approach corridor. Reserved for a future
    /// multi-cell corridor model (spec.md §9); not consulted by the
    /// corridor rule in this implementation.
    #[builder(default = "1")]
    pub corridor_width: i32,

    /// Extra clearance around node corners when emitting virtual side
    /// zones.
    #[builder(default = "2")]
    pub corner_radius: i32,

    /// Multiplier (as a percentage, to stay integer-only) applied to zone
    /// size for the endpoint nodes of the connection being routed. Spec.md
    /// §6 specifies this as a float (`0.75`); it is carried here as
    /// hundredths of a unit (`75`) since the rest of this crate is
    /// deliberately integer-only (spec.md Non-goals: no floating point).
    #[builder(default = "75")]
    pub source_target_scale_percent: i32,

    /// Include virtual zones around the source node of the connection
    /// being routed.
    #[builder(default = "true")]
    pub enable_for_source: bool,

    /// Include virtual zones around the target node of the connection
    /// being routed.
    #[builder(default = "true")]
    pub enable_for_target: bool,

    /// Selects between the two divergent virtual-zone generation strategies
    /// noted as an Open Question in spec.md §9: when `false` (the default),
    /// no four-side virtual zones are emitted and the static checker relies
    /// on 1-unit padding alone (the minimal, always-conforming form). When
    /// `true`, four-side zones with corner clearance are emitted around
    /// non-endpoint nodes.
    #[builder(default = "false")]
    pub emit_virtual_side_zones: bool,
}

impl Default for VirtualObstacleConfig {
    fn default() -> Self {
        Self {
            approach_zone_size: 2,
            corridor_width: 1,
            corner_radius: 2,
            source_target_scale_percent: 75,
            enable_for_source: true,
            enable_for_target: true,
            emit_virtual_side_zones: false,
        }
    }
}
