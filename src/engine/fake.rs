//! A scripted, headless [`RenderEngine`] for tests and embedding.
//!
//! [`FakeEngine`] records every command it receives and replays scripted
//! load/snapshot results, so session and store logic can be exercised
//! without a real rendering backend.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::{
    EngineError, ImageParams, MoleculeType, RenderEngine,
    RepresentationParams, ResidueSite, StructureSnapshot,
};

/// One recorded engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `clear_components` was invoked.
    ClearComponents,
    /// `load_file` was invoked with this file reference.
    LoadFile(String),
    /// `add_representation` was invoked with these parameters.
    AddRepresentation(RepresentationParams),
    /// `set_highlight` was invoked with this selector.
    SetHighlight(String),
    /// `clear_highlight` was invoked.
    ClearHighlight,
    /// `make_image` was invoked with these parameters.
    MakeImage(ImageParams),
    /// `resize` was invoked with this width and height.
    Resize(u32, u32),
    /// `set_clip_near` was invoked with this distance.
    SetClipNear(f32),
    /// `request_fullscreen` was invoked with this flag.
    RequestFullscreen(bool),
    /// `center_view` was invoked.
    CenterView,
}

/// Scripted in-memory engine implementing [`RenderEngine`].
///
/// Load results are consumed front-to-back from the scripted queue; an
/// unscripted load fails. Scheme colors are looked up from a
/// `(scheme, chain)` table populated via
/// [`set_scheme_color`](Self::set_scheme_color).
#[derive(Debug, Default)]
pub struct FakeEngine {
    calls: Vec<EngineCall>,
    load_results: VecDeque<Result<StructureSnapshot, EngineError>>,
    scheme_colors: FxHashMap<(String, String), u32>,
    image_bytes: Vec<u8>,
}

impl FakeEngine {
    /// An engine with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `load_file` call.
    pub fn script_load(
        &mut self,
        result: Result<StructureSnapshot, EngineError>,
    ) {
        self.load_results.push_back(result);
    }

    /// Set the color returned for a chain's first atom under a scheme.
    pub fn set_scheme_color(
        &mut self,
        scheme: &str,
        chain_name: &str,
        color: u32,
    ) {
        let _ = self
            .scheme_colors
            .insert((scheme.to_owned(), chain_name.to_owned()), color);
    }

    /// Set the bytes returned by `make_image`.
    pub fn set_image_bytes(&mut self, bytes: Vec<u8>) {
        self.image_bytes = bytes;
    }

    /// Every command received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// The recorded `add_representation` calls, in order.
    #[must_use]
    pub fn representation_calls(&self) -> Vec<&RepresentationParams> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::AddRepresentation(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Drop the recorded call log (scripting is unaffected).
    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }
}

impl RenderEngine for FakeEngine {
    fn clear_components(&mut self) {
        self.calls.push(EngineCall::ClearComponents);
    }

    async fn load_file(
        &mut self,
        file: &str,
    ) -> Result<StructureSnapshot, EngineError> {
        self.calls.push(EngineCall::LoadFile(file.to_owned()));
        self.load_results
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::load("no scripted result")))
    }

    fn add_representation(&mut self, params: &RepresentationParams) {
        self.calls
            .push(EngineCall::AddRepresentation(params.clone()));
    }

    fn set_highlight(&mut self, selector: &str) {
        self.calls
            .push(EngineCall::SetHighlight(selector.to_owned()));
    }

    fn clear_highlight(&mut self) {
        self.calls.push(EngineCall::ClearHighlight);
    }

    fn scheme_color(&self, scheme: &str, chain_name: &str) -> Option<u32> {
        self.scheme_colors
            .get(&(scheme.to_owned(), chain_name.to_owned()))
            .copied()
    }

    async fn make_image(
        &mut self,
        params: &ImageParams,
    ) -> Result<Vec<u8>, EngineError> {
        self.calls.push(EngineCall::MakeImage(*params));
        Ok(self.image_bytes.clone())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(EngineCall::Resize(width, height));
    }

    fn set_clip_near(&mut self, value: f32) {
        self.calls.push(EngineCall::SetClipNear(value));
    }

    fn request_fullscreen(&mut self, enabled: bool) {
        self.calls.push(EngineCall::RequestFullscreen(enabled));
    }

    fn center_view(&mut self) {
        self.calls.push(EngineCall::CenterView);
    }
}

/// Incremental [`StructureSnapshot`] builder for tests.
///
/// Assigns flat residue indices in insertion order and chain indices in
/// first-seen order, mirroring how a real engine iterates a structure.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    residues: Vec<ResidueSite>,
    chain_order: Vec<String>,
    element_table: Vec<String>,
}

impl SnapshotBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a residue to the walk.
    #[must_use]
    pub fn residue(
        mut self,
        chain_name: &str,
        res_name: &str,
        res_no: i32,
        mol_type: MoleculeType,
    ) -> Self {
        let chain_index = self
            .chain_order
            .iter()
            .position(|c| c == chain_name)
            .unwrap_or_else(|| {
                self.chain_order.push(chain_name.to_owned());
                self.chain_order.len() - 1
            });
        let index = self.residues.len() as u32;
        self.residues.push(ResidueSite {
            chain_name: chain_name.to_owned(),
            chain_index: chain_index as u32,
            entity: String::new(),
            res_name: res_name.to_owned(),
            res_no,
            hetero: !matches!(
                mol_type,
                MoleculeType::Protein
                    | MoleculeType::Rna
                    | MoleculeType::Dna
            ),
            sec_struct: ' ',
            mol_type,
            index,
        });
        self
    }

    /// Override fields of the most recently added residue.
    #[must_use]
    pub fn tweak_last(
        mut self,
        f: impl FnOnce(&mut ResidueSite),
    ) -> Self {
        if let Some(last) = self.residues.last_mut() {
            f(last);
        }
        self
    }

    /// Set the structure's atom-type element table.
    #[must_use]
    pub fn elements(mut self, symbols: &[&str]) -> Self {
        self.element_table =
            symbols.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> StructureSnapshot {
        StructureSnapshot {
            residues: self.residues,
            element_table: self.element_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EngineCall, FakeEngine, MoleculeType, RenderEngine, SnapshotBuilder,
    };

    #[test]
    fn records_calls_in_order() {
        let mut engine = FakeEngine::new();
        engine.clear_components();
        engine.resize(640, 480);
        engine.set_clip_near(12.0);
        assert_eq!(
            engine.calls(),
            &[
                EngineCall::ClearComponents,
                EngineCall::Resize(640, 480),
                EngineCall::SetClipNear(12.0),
            ]
        );
    }

    #[test]
    fn unscripted_load_fails() {
        let mut engine = FakeEngine::new();
        let result = pollster::block_on(engine.load_file("rcsb://1crn"));
        assert!(result.is_err());
    }

    #[test]
    fn builder_assigns_first_seen_chain_indices() {
        let snapshot = SnapshotBuilder::new()
            .residue("B", "ALA", 1, MoleculeType::Protein)
            .residue("A", "GLY", 1, MoleculeType::Protein)
            .residue("B", "SER", 2, MoleculeType::Protein)
            .build();
        assert_eq!(snapshot.residues[0].chain_index, 0);
        assert_eq!(snapshot.residues[1].chain_index, 1);
        assert_eq!(snapshot.residues[2].chain_index, 0);
        assert_eq!(snapshot.residues[2].index, 2);
    }
}
