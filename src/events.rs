//! Platform-agnostic viewer events.
//!
//! Two independent event sources feed the store: the engine's 3D-viewport
//! hover signal ([`PickEvent`]) and the sequence panel's row hover
//! ([`SequenceItem`]). The embedding UI converts its raw callbacks into
//! these values and forwards them to
//! [`Session::hover`](crate::session::Session::hover) and
//! [`Session::hover_sequence`](crate::session::Session::hover_sequence).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::MoleculeType;

/// Descriptor of one atom as reported by the engine's proxies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomDesc {
    /// Element symbol (e.g. `"C"`, `"Fe"`).
    pub symbol: String,
    /// Atom name (e.g. `"CA"`).
    pub atom_name: String,
    /// Residue name (e.g. `"ALA"`).
    pub res_name: String,
    /// Residue sequence number.
    pub res_no: i32,
    /// Chain name.
    pub chain_name: String,
    /// Free-text description of the atom's entity.
    pub entity: String,
}

/// A bond under the cursor, reported by its two endpoint atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPick {
    /// First endpoint atom. Bond hover resolves to this one.
    pub atom1: AtomDesc,
    /// Second endpoint atom.
    pub atom2: AtomDesc,
}

/// One delivery of the engine's hover signal.
///
/// At most one of `atom`/`bond` is set; both `None` means the cursor is
/// over empty space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickEvent {
    /// Atom directly under the cursor, if any.
    pub atom: Option<AtomDesc>,
    /// Bond under the cursor, if any.
    pub bond: Option<BondPick>,
    /// Cursor position in screen coordinates.
    pub position: Vec2,
}

impl PickEvent {
    /// Hover over empty space at `position`.
    #[must_use]
    pub fn empty(position: Vec2) -> Self {
        Self {
            atom: None,
            bond: None,
            position,
        }
    }

    /// The atom this event resolves to: the picked atom, or a picked
    /// bond's first endpoint.
    #[must_use]
    pub fn resolved_atom(&self) -> Option<&AtomDesc> {
        self.atom
            .as_ref()
            .or_else(|| self.bond.as_ref().map(|b| &b.atom1))
    }
}

/// A hovered row of the sequence panel.
///
/// Closed replacement for the integer item-kind codes of the panel's
/// wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SequenceItem {
    /// The cursor left the panel; clear the highlight overlay.
    None,
    /// A chain header row.
    Chain {
        /// Chain name.
        name: String,
        /// Entity description of the chain.
        entity: String,
    },
    /// A specific residue row.
    Residue {
        /// Chain the residue belongs to.
        chain_name: String,
        /// Entity description of the residue.
        entity: String,
        /// Residue name.
        res_name: String,
        /// Residue sequence number.
        res_no: i32,
        /// Molecule-type classification.
        mol_type: MoleculeType,
    },
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{AtomDesc, BondPick, PickEvent};

    fn atom(name: &str) -> AtomDesc {
        AtomDesc {
            atom_name: name.to_owned(),
            ..AtomDesc::default()
        }
    }

    #[test]
    fn bond_resolves_to_first_endpoint() {
        let event = PickEvent {
            atom: None,
            bond: Some(BondPick {
                atom1: atom("CA"),
                atom2: atom("CB"),
            }),
            position: Vec2::ZERO,
        };
        assert_eq!(
            event.resolved_atom().map(|a| a.atom_name.as_str()),
            Some("CA")
        );
    }

    #[test]
    fn direct_atom_wins_over_bond() {
        let event = PickEvent {
            atom: Some(atom("N")),
            bond: Some(BondPick {
                atom1: atom("CA"),
                atom2: atom("CB"),
            }),
            position: Vec2::ZERO,
        };
        assert_eq!(
            event.resolved_atom().map(|a| a.atom_name.as_str()),
            Some("N")
        );
    }

    #[test]
    fn empty_space_resolves_to_nothing() {
        assert!(PickEvent::empty(Vec2::new(4.0, 2.0))
            .resolved_atom()
            .is_none());
    }
}
