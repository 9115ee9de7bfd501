//! The derived, read-only molecule summary.
//!
//! Rebuilt wholesale from a [`StructureSnapshot`] on every successful
//! load and committed to the store atomically; consumers never observe a
//! partially built summary.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::engine::{MoleculeType, StructureSnapshot};

/// Fallback chain color when the engine cannot resolve one (`0xRRGGBB`).
pub const FALLBACK_CHAIN_COLOR: u32 = 0x80_80_80;

/// One residue entry of a chain's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueEntry {
    /// Residue name.
    pub res_name: String,
    /// Residue sequence number.
    pub res_no: i32,
    /// Whether the residue is flagged as hetero.
    pub hetero: bool,
    /// Flat residue index within the structure.
    pub index: u32,
}

/// One chain bucket, in first-seen order of the residue walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSummary {
    /// Chain name.
    pub name: String,
    /// Engine chain index.
    pub index: u32,
    /// Entity description of the chain's first residue.
    pub entity: String,
    /// Ordered residue sequence of this chain.
    pub sequence: Vec<ResidueEntry>,
    /// Display color assigned from the active color scheme (`0xRRGGBB`).
    pub color: u32,
}

/// Which molecule classes are present in the structure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[allow(clippy::struct_excessive_bools)]
pub struct MolTypeFlags {
    /// Amino-acid residues present.
    pub protein: bool,
    /// Any nucleic residues present (DNA or RNA).
    pub nucleic: bool,
    /// DNA nucleotides present.
    pub dna: bool,
    /// RNA nucleotides present.
    pub rna: bool,
    /// Water molecules present.
    pub water: bool,
    /// Saccharide residues present.
    pub saccharide: bool,
    /// Ions present.
    pub ion: bool,
    /// Unclassified/hetero residues present.
    pub hetero: bool,
}

impl MolTypeFlags {
    fn from_present(present: &BTreeSet<MoleculeType>) -> Self {
        let dna = present.contains(&MoleculeType::Dna);
        let rna = present.contains(&MoleculeType::Rna);
        Self {
            protein: present.contains(&MoleculeType::Protein),
            nucleic: dna || rna,
            dna,
            rna,
            water: present.contains(&MoleculeType::Water),
            saccharide: present.contains(&MoleculeType::Saccharide),
            ion: present.contains(&MoleculeType::Ion),
            hetero: present.contains(&MoleculeType::Unknown),
        }
    }
}

/// Read-only snapshot of the loaded molecule, derived from one walk over
/// the engine's residues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSummary {
    /// Chain buckets in first-seen order.
    pub chains: Vec<ChainSummary>,
    /// Distinct element symbols of the structure.
    pub elements: BTreeSet<String>,
    /// Distinct residue names of the structure.
    pub residue_names: BTreeSet<String>,
    /// Distinct secondary-structure codes (blanks omitted).
    pub sec_structures: BTreeSet<char>,
    /// Present molecule classes.
    pub types: MolTypeFlags,
    /// Per-residue selection flags, parallel to the residue walk.
    pub selected: Vec<bool>,
}

impl MoleculeSummary {
    /// Summarize a parsed structure in one pass over its residues, in
    /// engine iteration order.
    ///
    /// Residues are bucketed by chain name in first-seen order, the
    /// global element/residue/secondary-structure sets are accumulated,
    /// and every residue starts selected. Chain colors are left at the
    /// fallback; [`apply_chain_colors`](Self::apply_chain_colors) assigns
    /// them from the active scheme.
    #[must_use]
    pub fn summarize(snapshot: &StructureSnapshot) -> Self {
        let mut chains: Vec<ChainSummary> = Vec::new();
        let mut chain_lookup: FxHashMap<&str, usize> =
            FxHashMap::default();
        let mut residue_names = BTreeSet::new();
        let mut sec_structures = BTreeSet::new();
        let mut present = BTreeSet::new();

        for site in &snapshot.residues {
            let bucket = *chain_lookup
                .entry(site.chain_name.as_str())
                .or_insert_with(|| {
                    chains.push(ChainSummary {
                        name: site.chain_name.clone(),
                        index: site.chain_index,
                        entity: site.entity.clone(),
                        sequence: Vec::new(),
                        color: FALLBACK_CHAIN_COLOR,
                    });
                    chains.len() - 1
                });
            chains[bucket].sequence.push(ResidueEntry {
                res_name: site.res_name.clone(),
                res_no: site.res_no,
                hetero: site.hetero,
                index: site.index,
            });

            let _ = residue_names.insert(site.res_name.clone());
            if site.sec_struct != ' ' {
                let _ = sec_structures.insert(site.sec_struct);
            }
            let _ = present.insert(site.mol_type);
        }

        let elements: BTreeSet<String> =
            snapshot.element_table.iter().cloned().collect();

        log::debug!(
            "summarized {} residues into {} chains ({} elements)",
            snapshot.residues.len(),
            chains.len(),
            elements.len()
        );

        Self {
            chains,
            elements,
            residue_names,
            sec_structures,
            types: MolTypeFlags::from_present(&present),
            selected: vec![true; snapshot.residues.len()],
        }
    }

    /// Assign each chain's display color from the active color scheme.
    ///
    /// `resolve` queries the engine for the color of the chain's first
    /// atom; chains the engine cannot resolve keep
    /// [`FALLBACK_CHAIN_COLOR`].
    pub fn apply_chain_colors(
        &mut self,
        mut resolve: impl FnMut(&str) -> Option<u32>,
    ) {
        for chain in &mut self.chains {
            chain.color =
                resolve(&chain.name).unwrap_or(FALLBACK_CHAIN_COLOR);
        }
    }

    /// Total residue count across all chains.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.selected.len()
    }
}
