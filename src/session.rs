//! The viewer session: engine mediation and store transitions.
//!
//! [`Session`] owns the rendering engine, the [`ViewerState`], and the
//! load-token counter. Every named viewer action lives here; UI layers
//! read state through [`Session::state`] and never touch the engine
//! directly.

use crate::engine::{
    EngineError, ImageParams, RenderEngine, RepresentationParams,
    StructureSnapshot,
};
use crate::error::StoreError;
use crate::events::{PickEvent, SequenceItem};
use crate::options::ViewerOptions;
use crate::store::hover::{HoveredAtom, SequenceHover};
use crate::store::summary::MoleculeSummary;
use crate::store::ViewerState;

/// Handle for one issued load. Only the ticket matching the latest
/// issued token may commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    token: u64,
}

/// Controller owning the rendering engine and the viewer state.
///
/// Single-threaded and event-driven: every method runs to completion on
/// the caller's thread, and the awaited engine load is the only
/// suspension point.
pub struct Session<E: RenderEngine> {
    engine: E,
    state: ViewerState,
    options: ViewerOptions,
    load_token: u64,
}

// =========================================================================
// Construction and accessors
// =========================================================================

impl<E: RenderEngine> Session<E> {
    /// A session over `engine`, seeded from `options`.
    ///
    /// Applies the configured display style, color scheme, selection and
    /// clip distance; does not load anything (see [`start`](Self::start)).
    pub fn new(mut engine: E, options: ViewerOptions) -> Self {
        let mut state = ViewerState::default();
        state.set_display(&options.display);
        state.set_color(&options.color);
        state.set_selection(&options.selection);
        state.set_clip_near(options.clip_near);
        engine.set_clip_near(options.clip_near);
        Self {
            engine,
            state,
            options,
            load_token: 0,
        }
    }

    /// Read access to the viewer state.
    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// The active options.
    #[must_use]
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Read access to the engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the engine (for UI plumbing such as binding the
    /// hover signal).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Load the configured initial structure.
    pub async fn start(&mut self) {
        let (file, name) = (
            self.options.initial_file.clone(),
            self.options.initial_name.clone(),
        );
        self.load_file(&file, &name).await;
    }
}

// =========================================================================
// Load and summarize
// =========================================================================

impl<E: RenderEngine> Session<E> {
    /// Clear the scene and load `file`, committing its summary on
    /// success.
    ///
    /// Failure is not returned: a rejected load is recorded as
    /// [`LoadStatus::Failed`](crate::store::LoadStatus::Failed) and the
    /// molecule summary reverts to empty. If another load was issued
    /// while this one was in flight, this completion is discarded.
    pub async fn load_file(&mut self, file: &str, name: &str) {
        let ticket = self.issue_load(file, name);
        let result = self.engine.load_file(file).await;
        self.complete_load(ticket, result);
    }

    /// Clear the scene, record the new file, and issue a load ticket.
    ///
    /// Issuing a new ticket supersedes every earlier one: their
    /// completions will be discarded by [`complete_load`](Self::complete_load).
    pub fn issue_load(&mut self, file: &str, name: &str) -> LoadTicket {
        self.engine.clear_components();
        self.load_token += 1;
        self.state.record_file(file, name);
        self.state.record_load_pending(self.load_token);
        log::debug!("load {} issued token {}", file, self.load_token);
        LoadTicket {
            token: self.load_token,
        }
    }

    /// Commit (or discard) the completion of an issued load.
    ///
    /// A success belonging to the latest ticket walks the structure into
    /// a [`MoleculeSummary`], resolves chain colors from the active
    /// scheme, commits atomically, and re-issues the default
    /// representation. Stale tickets are discarded without touching
    /// state.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<StructureSnapshot, EngineError>,
    ) {
        if ticket.token != self.load_token {
            log::debug!(
                "discarding superseded load (token {} < {})",
                ticket.token,
                self.load_token
            );
            return;
        }
        match result {
            Ok(snapshot) => {
                let mut summary = MoleculeSummary::summarize(&snapshot);
                summary.apply_chain_colors(|chain| {
                    self.engine.scheme_color(&self.state.color, chain)
                });
                log::info!(
                    "loaded {}: {} chains, {} residues",
                    self.state.file,
                    summary.chains.len(),
                    summary.residue_count()
                );
                self.state.commit_summary(summary);
                self.engine.add_representation(&RepresentationParams::new(
                    &self.state.display,
                    &self.state.selection,
                ));
                self.engine.center_view();
            }
            Err(e) => {
                log::warn!("load of {} failed: {}", self.state.file, e);
                self.state.record_load_error(&e.message);
            }
        }
    }
}

// =========================================================================
// Representation and selection
// =========================================================================

impl<E: RenderEngine> Session<E> {
    /// Set the active selection expression. Store-only; the selection is
    /// picked up by the next representation command.
    pub fn set_selection(&mut self, selector: &str) {
        self.state.set_selection(selector);
    }

    /// Apply a display style: one add-representation command over the
    /// current selection, then the store transition.
    pub fn set_display(&mut self, style: &str) {
        self.engine.add_representation(&RepresentationParams::new(
            style,
            &self.state.selection,
        ));
        self.state.set_display(style);
    }

    /// Apply a color scheme. Re-issues the full representation (current
    /// style and selection) rather than patching the existing one.
    pub fn set_color(&mut self, scheme: &str) {
        self.engine.add_representation(
            &RepresentationParams::new(
                &self.state.display,
                &self.state.selection,
            )
            .with_color(scheme),
        );
        self.state.set_color(scheme);
    }
}

// =========================================================================
// Hover and highlight
// =========================================================================

impl<E: RenderEngine> Session<E> {
    /// Map one delivery of the engine's hover signal into the store.
    ///
    /// Bond hover resolves to the bond's first endpoint atom; empty
    /// space hides the readout without touching the last descriptor.
    pub fn hover(&mut self, event: &PickEvent) {
        match event.resolved_atom() {
            Some(atom) => self.state.record_atom_hover(HoveredAtom {
                atom: atom.clone(),
                position: event.position,
            }),
            None => self.state.clear_atom_hover(),
        }
    }

    /// Map a sequence-panel hover into a highlight and the store.
    pub fn hover_sequence(&mut self, item: &SequenceItem) {
        match item {
            SequenceItem::None => {
                self.engine.clear_highlight();
                self.state.record_sequence_hover(None);
            }
            SequenceItem::Chain { name, entity } => {
                let hover = SequenceHover::for_chain(name, entity);
                self.engine.set_highlight(&hover.selector);
                self.state.record_sequence_hover(Some(hover));
            }
            SequenceItem::Residue {
                chain_name,
                entity,
                res_name,
                res_no,
                mol_type,
            } => {
                let hover = SequenceHover::for_residue(
                    chain_name, entity, res_name, *res_no, *mol_type,
                );
                self.engine.set_highlight(&hover.selector);
                self.state.record_sequence_hover(Some(hover));
            }
        }
    }

    /// Show the highlight overlay on an arbitrary selector.
    pub fn highlight(&mut self, selector: &str) {
        self.engine.set_highlight(selector);
    }
}

// =========================================================================
// Scene parameters and snapshots
// =========================================================================

impl<E: RenderEngine> Session<E> {
    /// Toggle fullscreen presentation.
    pub fn toggle_fullscreen(&mut self) {
        let enabled = !self.state.fullscreen;
        self.engine.request_fullscreen(enabled);
        self.state.set_fullscreen(enabled);
    }

    /// Set the near clipping distance.
    pub fn set_clip_near(&mut self, value: f32) {
        self.engine.set_clip_near(value);
        self.state.set_clip_near(value);
    }

    /// Resize the engine's drawing surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
    }

    /// Capture a screenshot with the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the engine's snapshot operation fails.
    pub async fn capture_screenshot(&mut self) -> Result<Vec<u8>, StoreError> {
        let params = self.options.screenshot.image_params();
        self.capture_screenshot_with(&params).await
    }

    /// Capture a screenshot with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the engine's snapshot operation fails.
    pub async fn capture_screenshot_with(
        &mut self,
        params: &ImageParams,
    ) -> Result<Vec<u8>, StoreError> {
        let bytes = self.engine.make_image(params).await?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use pollster::block_on;

    use crate::engine::fake::{EngineCall, FakeEngine, SnapshotBuilder};
    use crate::engine::{EngineError, MoleculeType, RepresentationParams};
    use crate::events::{AtomDesc, BondPick, PickEvent, SequenceItem};
    use crate::options::ViewerOptions;
    use crate::store::LoadStatus;

    use super::Session;

    fn session() -> Session<FakeEngine> {
        Session::new(FakeEngine::new(), ViewerOptions::default())
    }

    fn two_chain_snapshot() -> crate::engine::StructureSnapshot {
        SnapshotBuilder::new()
            .residue("A", "ALA", 1, MoleculeType::Protein)
            .residue("A", "GLY", 2, MoleculeType::Protein)
            .residue("B", "HOH", 1, MoleculeType::Water)
            .elements(&["C", "N", "O"])
            .build()
    }

    #[test]
    fn successful_load_commits_summary_atomically() {
        let mut session = session();
        session
            .engine_mut()
            .script_load(Ok(two_chain_snapshot()));
        session
            .engine_mut()
            .set_scheme_color("element", "A", 0x11_22_33);

        block_on(session.load_file("rcsb://1abc", "1abc"));

        let state = session.state();
        assert_eq!(state.file, "rcsb://1abc");
        assert_eq!(state.name, "1abc");
        assert_eq!(state.load, LoadStatus::Loaded);
        assert_eq!(state.mol.chains.len(), 2);
        assert_eq!(state.mol.selected, vec![true, true, true]);
        assert_eq!(state.mol.chains[0].color, 0x11_22_33);

        // Scene cleared, file loaded, default representation, recenter
        let calls = session.engine().calls();
        assert_eq!(calls[0], EngineCall::SetClipNear(0.0));
        assert_eq!(calls[1], EngineCall::ClearComponents);
        assert_eq!(calls[2], EngineCall::LoadFile("rcsb://1abc".to_owned()));
        assert_eq!(
            calls[3],
            EngineCall::AddRepresentation(RepresentationParams::new(
                "licorice", "*"
            ))
        );
        assert_eq!(calls[4], EngineCall::CenterView);
    }

    #[test]
    fn failed_load_surfaces_error_state() {
        let mut session = session();
        session
            .engine_mut()
            .script_load(Err(EngineError::load("404 not found")));

        block_on(session.load_file("rcsb://zzzz", "zzzz"));

        assert_eq!(
            session.state().load,
            LoadStatus::Failed {
                reason: "404 not found".to_owned()
            }
        );
        assert!(session.state().mol.chains.is_empty());
        // No representation is added for a failed load
        assert!(session.engine().representation_calls().is_empty());
    }

    #[test]
    fn superseded_load_is_discarded() {
        let mut session = session();
        let first = session.issue_load("rcsb://1aaa", "1aaa");
        let second = session.issue_load("rcsb://2bbb", "2bbb");

        // First load resolves late: its snapshot must not commit
        session.complete_load(
            first,
            Ok(SnapshotBuilder::new()
                .residue("X", "ALA", 1, MoleculeType::Protein)
                .build()),
        );
        assert_eq!(session.state().load, LoadStatus::Pending { token: 2 });
        assert!(session.state().mol.chains.is_empty());

        session.complete_load(second, Ok(two_chain_snapshot()));
        assert_eq!(session.state().load, LoadStatus::Loaded);
        assert_eq!(session.state().mol.chains[0].name, "A");
        assert_eq!(session.state().file, "rcsb://2bbb");
    }

    #[test]
    fn display_then_color_issue_one_representation_each() {
        let mut session = session();
        session.engine_mut().reset_calls();

        session.set_display("surface");
        session.set_color("chainname");

        assert_eq!(session.state().display, "surface");
        assert_eq!(session.state().color, "chainname");

        let reps = session.engine().representation_calls();
        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0], &RepresentationParams::new("surface", "*"));
        assert_eq!(
            reps[1],
            &RepresentationParams::new("surface", "*")
                .with_color("chainname")
        );
    }

    #[test]
    fn representation_commands_carry_current_selection() {
        let mut session = session();
        session.set_selection(":A and helix");
        session.set_display("cartoon");
        let reps = session.engine().representation_calls();
        assert_eq!(reps[0].selection, ":A and helix");
    }

    #[test]
    fn bond_hover_reports_first_endpoint() {
        let mut session = session();
        let event = PickEvent {
            atom: None,
            bond: Some(BondPick {
                atom1: AtomDesc {
                    atom_name: "CA".to_owned(),
                    res_no: 7,
                    ..AtomDesc::default()
                },
                atom2: AtomDesc {
                    atom_name: "CB".to_owned(),
                    res_no: 7,
                    ..AtomDesc::default()
                },
            }),
            position: Vec2::new(120.0, 80.0),
        };
        session.hover(&event);

        let state = session.state();
        assert!(state.atom_hover_visible);
        assert_eq!(state.atom_hovered.atom.atom_name, "CA");
        assert_eq!(state.atom_hovered.position, Vec2::new(120.0, 80.0));

        // Empty space hides the readout but keeps the descriptor
        session.hover(&PickEvent::empty(Vec2::new(0.0, 0.0)));
        assert!(!session.state().atom_hover_visible);
        assert_eq!(session.state().atom_hovered.atom.atom_name, "CA");
    }

    #[test]
    fn sequence_hover_branches_on_item_kind() {
        let mut session = session();
        session.engine_mut().reset_calls();

        session.hover_sequence(&SequenceItem::Chain {
            name: "A".to_owned(),
            entity: "Lysozyme C".to_owned(),
        });
        session.hover_sequence(&SequenceItem::Residue {
            chain_name: "A".to_owned(),
            entity: "Lysozyme C".to_owned(),
            res_name: "ALA".to_owned(),
            res_no: 42,
            mol_type: MoleculeType::Protein,
        });
        session.hover_sequence(&SequenceItem::None);

        assert_eq!(
            session.engine().calls(),
            &[
                EngineCall::SetHighlight(":A".to_owned()),
                EngineCall::SetHighlight("42:A".to_owned()),
                EngineCall::ClearHighlight,
            ]
        );
        assert!(session.state().sequence_hovered.is_none());
    }

    #[test]
    fn each_sequence_hover_overwrites_the_previous() {
        let mut session = session();
        session.hover_sequence(&SequenceItem::Chain {
            name: "A".to_owned(),
            entity: String::new(),
        });
        session.hover_sequence(&SequenceItem::Chain {
            name: "B".to_owned(),
            entity: String::new(),
        });
        let hovered = session.state().sequence_hovered.as_ref();
        assert_eq!(hovered.map(|h| h.selector.as_str()), Some(":B"));
    }

    #[test]
    fn fullscreen_toggles_and_forwards() {
        let mut session = session();
        session.engine_mut().reset_calls();
        session.toggle_fullscreen();
        session.toggle_fullscreen();
        assert!(!session.state().fullscreen);
        assert_eq!(
            session.engine().calls(),
            &[
                EngineCall::RequestFullscreen(true),
                EngineCall::RequestFullscreen(false),
            ]
        );
    }

    #[test]
    fn clip_near_reaches_engine_and_store() {
        let mut session = session();
        session.set_clip_near(35.0);
        assert_eq!(session.state().clip_near, 35.0);
        assert!(session
            .engine()
            .calls()
            .contains(&EngineCall::SetClipNear(35.0)));
    }

    #[test]
    fn screenshot_uses_configured_defaults() {
        let mut session = session();
        session.engine_mut().set_image_bytes(vec![0x89, 0x50]);
        let bytes = block_on(session.capture_screenshot()).unwrap();
        assert_eq!(bytes, vec![0x89, 0x50]);

        let expected =
            ViewerOptions::default().screenshot.image_params();
        assert!(session
            .engine()
            .calls()
            .contains(&EngineCall::MakeImage(expected)));
    }

    #[test]
    fn start_loads_the_configured_initial_file() {
        let mut session = session();
        session.engine_mut().script_load(Ok(two_chain_snapshot()));
        block_on(session.start());
        assert_eq!(session.state().file, "rcsb://1crn");
        assert_eq!(session.state().name, "1crn");
        assert_eq!(session.state().load, LoadStatus::Loaded);
    }
}
