//! The rendering-engine capability interface.
//!
//! The viewer's heavy lifting (file parsing, geometry generation, WebGL/GPU
//! rendering, spatial queries) belongs to an external molecular-rendering
//! engine. This module defines the narrow surface the store actually needs
//! from it — [`RenderEngine`] — plus the owned data types the engine hands
//! back, so the session/store logic is testable without a real rendering
//! backend (see [`fake::FakeEngine`]).

pub mod fake;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a residue by the engine's molecule-type code.
///
/// Replaces the engine's raw integer codes with a closed enumeration.
/// [`MoleculeType::from_code`] is total: unmapped codes collapse to
/// [`MoleculeType::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeType {
    /// Unclassified / hetero residue.
    Unknown,
    /// Water molecule.
    Water,
    /// Monoatomic ion.
    Ion,
    /// Amino-acid residue.
    Protein,
    /// RNA nucleotide.
    Rna,
    /// DNA nucleotide.
    Dna,
    /// Saccharide residue.
    Saccharide,
}

impl MoleculeType {
    /// Map an engine molecule-type code to its variant.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Water,
            2 => Self::Ion,
            3 => Self::Protein,
            4 => Self::Rna,
            5 => Self::Dna,
            6 => Self::Saccharide,
            _ => Self::Unknown,
        }
    }

    /// Human-readable type label, or `None` for [`MoleculeType::Unknown`]
    /// (callers fall back to the entity's free-text description).
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Water => Some("water"),
            Self::Ion => Some("ion"),
            Self::Protein => Some("protein"),
            Self::Rna => Some("RNA"),
            Self::Dna => Some("DNA"),
            Self::Saccharide => Some("saccharide"),
            Self::Unknown => None,
        }
    }
}

/// One residue of a parsed structure, in engine iteration order.
///
/// A projection of the engine's residue proxy into owned data; the
/// engine's structure object can be replaced wholesale on the next load
/// without invalidating anything derived from this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidueSite {
    /// Chain name (e.g. `"A"`).
    pub chain_name: String,
    /// Engine chain index.
    pub chain_index: u32,
    /// Free-text description of the residue's entity.
    pub entity: String,
    /// Residue name (e.g. `"ALA"`, `"HOH"`).
    pub res_name: String,
    /// Residue sequence number.
    pub res_no: i32,
    /// Whether the residue is flagged as hetero.
    pub hetero: bool,
    /// Secondary-structure code (engine convention, e.g. `'h'`, `'e'`;
    /// `' '` for none).
    pub sec_struct: char,
    /// Molecule-type classification.
    pub mol_type: MoleculeType,
    /// Flat residue index within the structure.
    pub index: u32,
}

/// A parsed structure projected into owned data.
///
/// Returned by [`RenderEngine::load_file`] on successful parse. The
/// element table mirrors the engine's atom-type table and may contain
/// duplicates; consumers dedupe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureSnapshot {
    /// Residues in engine iteration order.
    pub residues: Vec<ResidueSite>,
    /// Element symbols from the structure's atom-type table.
    pub element_table: Vec<String>,
}

/// Parameters for one "add representation" engine command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentationParams {
    /// Visual style (e.g. `"licorice"`, `"cartoon"`, `"surface"`).
    pub style: String,
    /// Selection expression restricting the representation.
    pub selection: String,
    /// Color scheme, or `None` for the engine's default.
    pub color_scheme: Option<String>,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl RepresentationParams {
    /// Representation covering `selection` in `style`, default color and
    /// full opacity.
    #[must_use]
    pub fn new(style: &str, selection: &str) -> Self {
        Self {
            style: style.to_owned(),
            selection: selection.to_owned(),
            color_scheme: None,
            opacity: 1.0,
        }
    }

    /// Same representation with an explicit color scheme.
    #[must_use]
    pub fn with_color(mut self, scheme: &str) -> Self {
        self.color_scheme = Some(scheme.to_owned());
        self
    }
}

/// Parameters for the engine's asynchronous snapshot operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageParams {
    /// Supersampling factor.
    pub factor: u32,
    /// Whether to antialias the output.
    pub antialias: bool,
    /// Whether the background is transparent.
    pub transparent: bool,
    /// Whether to trim empty borders.
    pub trim: bool,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            factor: 2,
            antialias: true,
            transparent: false,
            trim: false,
        }
    }
}

/// What stage of the engine operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The file reference could not be fetched/loaded.
    LoadFailed,
    /// The file loaded but could not be parsed into a structure.
    ParseFailed,
    /// The snapshot (make-image) operation failed.
    Snapshot,
}

/// Failure reported by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Failure category.
    pub kind: EngineErrorKind,
    /// Engine-provided reason.
    pub message: String,
}

impl EngineError {
    /// A load failure with the given reason.
    #[must_use]
    pub fn load(message: &str) -> Self {
        Self {
            kind: EngineErrorKind::LoadFailed,
            message: message.to_owned(),
        }
    }

    /// A parse failure with the given reason.
    #[must_use]
    pub fn parse(message: &str) -> Self {
        Self {
            kind: EngineErrorKind::ParseFailed,
            message: message.to_owned(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EngineErrorKind::LoadFailed => {
                write!(f, "load failed: {}", self.message)
            }
            EngineErrorKind::ParseFailed => {
                write!(f, "parse failed: {}", self.message)
            }
            EngineErrorKind::Snapshot => {
                write!(f, "snapshot failed: {}", self.message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// The narrow capability interface of the external rendering engine.
///
/// Everything the store/session layer needs from the renderer, and nothing
/// more. File references are opaque URI-like strings handed through
/// unchanged; the engine owns parsing, the scene graph, and all drawing.
///
/// Hover is *not* part of this trait: the engine's hover signal is an
/// event source, delivered to [`Session::hover`](crate::session::Session::hover)
/// as [`PickEvent`](crate::events::PickEvent) values by the embedding UI.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    /// Remove all loaded components from the scene.
    fn clear_components(&mut self);

    /// Load and parse a structure from an opaque file reference,
    /// resolving with a projection of the parsed structure.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the file cannot be fetched or parsed.
    async fn load_file(
        &mut self,
        file: &str,
    ) -> Result<StructureSnapshot, EngineError>;

    /// Add a representation to the first loaded component.
    /// Fire-and-forget; no acknowledgment is modeled.
    fn add_representation(&mut self, params: &RepresentationParams);

    /// Show the highlight overlay on the atoms matched by `selector`.
    fn set_highlight(&mut self, selector: &str);

    /// Hide the highlight overlay.
    fn clear_highlight(&mut self);

    /// Color of a chain's first atom under the named color scheme,
    /// as `0xRRGGBB`. `None` if the scheme or chain is unknown.
    fn scheme_color(&self, scheme: &str, chain_name: &str) -> Option<u32>;

    /// Render the current scene to an encoded image.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the snapshot cannot be produced.
    async fn make_image(
        &mut self,
        params: &ImageParams,
    ) -> Result<Vec<u8>, EngineError>;

    /// Resize the engine's drawing surface.
    fn resize(&mut self, width: u32, height: u32);

    /// Set the near clipping distance scene parameter.
    fn set_clip_near(&mut self, value: f32);

    /// Enter or leave fullscreen presentation.
    fn request_fullscreen(&mut self, enabled: bool);

    /// Re-center the view on the loaded structure.
    fn center_view(&mut self);
}

#[cfg(test)]
mod tests {
    use super::MoleculeType;

    #[test]
    fn molecule_type_codes_are_total() {
        assert_eq!(MoleculeType::from_code(0), MoleculeType::Unknown);
        assert_eq!(MoleculeType::from_code(1), MoleculeType::Water);
        assert_eq!(MoleculeType::from_code(2), MoleculeType::Ion);
        assert_eq!(MoleculeType::from_code(3), MoleculeType::Protein);
        assert_eq!(MoleculeType::from_code(4), MoleculeType::Rna);
        assert_eq!(MoleculeType::from_code(5), MoleculeType::Dna);
        assert_eq!(MoleculeType::from_code(6), MoleculeType::Saccharide);
        // Out-of-range codes collapse to Unknown rather than panicking
        assert_eq!(MoleculeType::from_code(7), MoleculeType::Unknown);
        assert_eq!(MoleculeType::from_code(255), MoleculeType::Unknown);
    }

    #[test]
    fn labels_cover_every_known_type() {
        assert_eq!(MoleculeType::Protein.label(), Some("protein"));
        assert_eq!(MoleculeType::Dna.label(), Some("DNA"));
        assert_eq!(MoleculeType::Rna.label(), Some("RNA"));
        assert_eq!(MoleculeType::Water.label(), Some("water"));
        assert_eq!(MoleculeType::Ion.label(), Some("ion"));
        assert_eq!(MoleculeType::Saccharide.label(), Some("saccharide"));
        assert_eq!(MoleculeType::Unknown.label(), None);
    }
}
