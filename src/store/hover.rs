//! Hover descriptors and highlight-selector construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::MoleculeType;
use crate::events::AtomDesc;

/// The last atom hovered in the 3D viewport.
///
/// Overwritten on every atom/bond hover; hovering empty space only hides
/// it (the descriptor itself is kept).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoveredAtom {
    /// The atom's descriptor.
    pub atom: AtomDesc,
    /// Cursor position at hover time, in screen coordinates.
    pub position: Vec2,
}

/// The last hovered sequence-panel item: its descriptive text and the
/// highlight selector applied for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceHover {
    /// Human-readable description shown by the UI.
    pub text: String,
    /// Selector the highlight overlay was set to.
    pub selector: String,
}

impl SequenceHover {
    /// Hover info for a chain header row.
    #[must_use]
    pub fn for_chain(name: &str, entity: &str) -> Self {
        let text = if entity.is_empty() {
            format!("chain {name}")
        } else {
            format!("chain {name}: {entity}")
        };
        Self {
            text,
            selector: chain_selector(name),
        }
    }

    /// Hover info for a residue row. The type label comes from the
    /// molecule-type table, falling back to the entity description.
    #[must_use]
    pub fn for_residue(
        chain_name: &str,
        entity: &str,
        res_name: &str,
        res_no: i32,
        mol_type: MoleculeType,
    ) -> Self {
        let label = mol_type.label().unwrap_or(entity);
        let text = if label.is_empty() {
            format!("{res_name} {res_no} ({chain_name})")
        } else {
            format!("{res_name} {res_no} ({chain_name}), {label}")
        };
        Self {
            text,
            selector: residue_selector(res_no, chain_name),
        }
    }
}

/// Selector matching every residue of a chain.
#[must_use]
pub fn chain_selector(chain_name: &str) -> String {
    format!(":{chain_name}")
}

/// Selector matching one residue by number within a chain.
#[must_use]
pub fn residue_selector(res_no: i32, chain_name: &str) -> String {
    format!("{res_no}:{chain_name}")
}
