//! The single source of truth for viewer state.
//!
//! [`ViewerState`] is mutated only through named transitions, each an
//! infallible pure update of `(state, input)`. No validation layer
//! exists: whatever a transition is handed is stored as-is, and it is the
//! UI's job to offer sensible inputs.

pub mod hover;
pub mod summary;

use serde::{Deserialize, Serialize};

use self::hover::{HoveredAtom, SequenceHover};
use self::summary::MoleculeSummary;

/// Progress of the asynchronous structure load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum LoadStatus {
    /// No load attempted yet.
    #[default]
    Idle,
    /// A load is in flight. While pending, `mol` still shows the last
    /// successfully loaded molecule (or nothing) and the engine's scene
    /// is already cleared.
    Pending {
        /// Token of the in-flight load.
        token: u64,
    },
    /// The last load committed its summary.
    Loaded,
    /// The last load failed; the molecule summary was cleared.
    Failed {
        /// Engine-provided reason.
        reason: String,
    },
}

/// Viewer state: current file, display settings, molecule summary, and
/// transient hover state. One instance per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    /// Opaque reference of the current file (URI-like).
    pub file: String,
    /// Display name of the current molecule.
    pub name: String,
    /// Active representation style.
    pub display: String,
    /// Active color scheme.
    pub color: String,
    /// Active selection expression.
    pub selection: String,
    /// Whether the viewer is in fullscreen presentation.
    pub fullscreen: bool,
    /// Near clipping distance.
    pub clip_near: f32,
    /// Derived summary of the loaded molecule.
    pub mol: MoleculeSummary,
    /// Last atom hovered in the 3D viewport.
    pub atom_hovered: HoveredAtom,
    /// Whether the hovered-atom readout is currently visible.
    pub atom_hover_visible: bool,
    /// Last hovered sequence-panel item, if any.
    pub sequence_hovered: Option<SequenceHover>,
    /// Progress of the structure load.
    pub load: LoadStatus,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            file: String::new(),
            name: String::new(),
            display: "licorice".to_owned(),
            color: "element".to_owned(),
            selection: "*".to_owned(),
            fullscreen: false,
            clip_near: 0.0,
            mol: MoleculeSummary::default(),
            atom_hovered: HoveredAtom::default(),
            atom_hover_visible: false,
            sequence_hovered: None,
            load: LoadStatus::default(),
        }
    }
}

// Named transitions. Each fully overwrites its field(s); none may fail.
impl ViewerState {
    /// Record the file reference and display name of a new load.
    pub fn record_file(&mut self, file: &str, name: &str) {
        self.file = file.to_owned();
        self.name = name.to_owned();
    }

    /// Set the active selection expression.
    pub fn set_selection(&mut self, selector: &str) {
        self.selection = selector.to_owned();
    }

    /// Set the active representation style.
    pub fn set_display(&mut self, style: &str) {
        self.display = style.to_owned();
    }

    /// Set the active color scheme.
    pub fn set_color(&mut self, scheme: &str) {
        self.color = scheme.to_owned();
    }

    /// Set the fullscreen flag.
    pub fn set_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = enabled;
    }

    /// Set the near clipping distance.
    pub fn set_clip_near(&mut self, value: f32) {
        self.clip_near = value;
    }

    /// Record an atom hover and show the readout.
    pub fn record_atom_hover(&mut self, hovered: HoveredAtom) {
        self.atom_hovered = hovered;
        self.atom_hover_visible = true;
    }

    /// Hide the hovered-atom readout. The last descriptor is kept.
    pub fn clear_atom_hover(&mut self) {
        self.atom_hover_visible = false;
    }

    /// Record (or clear) the hovered sequence-panel item.
    pub fn record_sequence_hover(&mut self, hover: Option<SequenceHover>) {
        self.sequence_hovered = hover;
    }

    /// Mark a load as in flight.
    pub fn record_load_pending(&mut self, token: u64) {
        self.load = LoadStatus::Pending { token };
    }

    /// Commit a freshly built molecule summary. The summary replaces the
    /// previous one wholesale.
    pub fn commit_summary(&mut self, summary: MoleculeSummary) {
        self.mol = summary;
        self.load = LoadStatus::Loaded;
    }

    /// Record a failed load and revert to "no molecule loaded".
    pub fn record_load_error(&mut self, reason: &str) {
        self.mol = MoleculeSummary::default();
        self.load = LoadStatus::Failed {
            reason: reason.to_owned(),
        };
    }
}
