#![warn(missing_docs)]
//! # deepguard-ui
//!
//! ## Purpose
//! Defines the submission controller: the single state value behind the
//! media-check screen and the events that move it.
//!
//! ## Responsibilities
//! - Filter drag-and-drop candidates and validate staged files.
//! - Own the one live preview and release it whenever it is superseded.
//! - Gate analysis to one in-flight attempt and ignore stale completions.
//! - Expose the derived [`UiState`] and display helpers.
//!
//! ## Data flow
//! Shell events call methods on [`SubmissionController`]. Methods that start
//! asynchronous work return an [`Effect`] tagged with a [`Ticket`]; the shell
//! runs it and reports back through [`SubmissionController::preview_loaded`]
//! or [`SubmissionController::analysis_finished`].
//!
//! ## Ownership and lifetimes
//! The controller exclusively owns the staged file, its preview handle, and
//! the in-flight slot. Effects carry cheap clones of the media so workers
//! never borrow controller state.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Every failure
//! becomes an [`ErrorState`]; no method returns `Err` or panics.
//!
//! ## Security and privacy notes
//! Controller state is never logged; the shell decides what to surface.

use std::sync::Arc;

use deepguard_analysis_contract::{AnalysisResult, Verdict};
use deepguard_core::{MediaFile, MediaKind, is_supported_mime, validate_media};
use deepguard_preview::{
    ObjectUrlRegistry, PreviewError, PreviewHandle, PreviewPlan, begin_preview,
};

/// Derived phase shown by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// Nothing staged.
    Empty,
    /// File staged, not analyzed yet.
    Ready,
    /// Analysis request in flight.
    Analyzing,
    /// Latest analysis succeeded.
    Resulted,
    /// Latest action failed.
    Errored,
}

/// Failure category behind an [`ErrorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Candidate rejected before any network call.
    Validation,
    /// Preview could not be produced.
    Preview,
    /// Backend unreachable.
    Network,
    /// Backend returned an error or a malformed body.
    Protocol,
}

/// User-visible description of the last failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    /// Failure category.
    pub kind: ErrorKind,
    /// Message shown to the user.
    pub message: String,
}

impl ErrorState {
    /// Creates an error state.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Correlates an asynchronous completion with the state that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Generation number this ticket was issued for.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Asynchronous work requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Encode an image into a data URI, then call
    /// [`SubmissionController::preview_loaded`].
    ReadPreview {
        /// Acquisition ticket.
        ticket: Ticket,
        /// Image to encode.
        media: MediaFile,
    },
    /// Submit media for classification, then call
    /// [`SubmissionController::analysis_finished`].
    Analyze {
        /// Attempt ticket.
        ticket: Ticket,
        /// Media to submit.
        media: MediaFile,
    },
}

/// Preview progress for the staged file.
#[derive(Debug)]
pub enum PreviewStatus {
    /// Image read still pending.
    Loading,
    /// Preview available.
    Ready(PreviewHandle),
    /// Read failed; nothing to render.
    Unavailable,
}

/// Validated file plus its preview.
#[derive(Debug)]
pub struct StagedMedia {
    media: MediaFile,
    kind: MediaKind,
    generation: u64,
    preview: PreviewStatus,
}

impl StagedMedia {
    /// Staged payload.
    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    /// Media family.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Preview progress.
    pub fn preview(&self) -> &PreviewStatus {
        &self.preview
    }
}

#[derive(Debug)]
enum Phase {
    Empty,
    Ready(StagedMedia),
    /// `notice` holds a rejection raised while the attempt is in flight; the
    /// attempt's own outcome replaces it.
    Analyzing {
        staged: StagedMedia,
        attempt: u64,
        notice: Option<ErrorState>,
    },
    Resulted {
        staged: StagedMedia,
        result: AnalysisResult,
    },
    /// `prior` is a result from an earlier cycle left on screen by a rejection.
    Errored {
        staged: Option<StagedMedia>,
        error: ErrorState,
        prior: Option<AnalysisResult>,
    },
}

/// Submission controller owning all media-check state.
#[derive(Debug)]
pub struct SubmissionController {
    phase: Phase,
    dragging: bool,
    generation: u64,
    registry: Arc<ObjectUrlRegistry>,
}

impl SubmissionController {
    /// Creates an empty controller minting previews from `registry`.
    pub fn new(registry: Arc<ObjectUrlRegistry>) -> Self {
        Self {
            phase: Phase::Empty,
            dragging: false,
            generation: 0,
            registry,
        }
    }

    /// Registry backing transient previews.
    pub fn registry(&self) -> &Arc<ObjectUrlRegistry> {
        &self.registry
    }

    /// Current derived phase.
    pub fn state(&self) -> UiState {
        match &self.phase {
            Phase::Empty => UiState::Empty,
            Phase::Ready(_) => UiState::Ready,
            Phase::Analyzing { .. } => UiState::Analyzing,
            Phase::Resulted { .. } => UiState::Resulted,
            Phase::Errored { .. } => UiState::Errored,
        }
    }

    /// Whether a drag is hovering over the drop target.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Staged file and preview, if any.
    pub fn staged(&self) -> Option<&StagedMedia> {
        match &self.phase {
            Phase::Empty => None,
            Phase::Ready(staged)
            | Phase::Analyzing { staged, .. }
            | Phase::Resulted { staged, .. } => Some(staged),
            Phase::Errored { staged, .. } => staged.as_ref(),
        }
    }

    /// Staged payload, if any.
    pub fn media(&self) -> Option<&MediaFile> {
        self.staged().map(StagedMedia::media)
    }

    /// Renderable preview, once available.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        match self.staged()?.preview() {
            PreviewStatus::Ready(handle) => Some(handle),
            PreviewStatus::Loading | PreviewStatus::Unavailable => None,
        }
    }

    /// Latest successful result.
    ///
    /// A result stays visible when a later file or preview is rejected; it is
    /// cleared by the next analysis attempt, a new staged file, or Reset.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Resulted { result, .. } => Some(result),
            Phase::Errored { prior, .. } => prior.as_ref(),
            _ => None,
        }
    }

    /// Display verdict for the latest result.
    pub fn verdict(&self) -> Option<Verdict> {
        self.result().map(AnalysisResult::verdict)
    }

    /// Latest failure, including a rejection raised during analysis.
    pub fn error(&self) -> Option<&ErrorState> {
        match &self.phase {
            Phase::Errored { error, .. } => Some(error),
            Phase::Analyzing { notice, .. } => notice.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` when Analyze should be enabled.
    pub fn can_analyze(&self) -> bool {
        self.staged().is_some() && !matches!(self.phase, Phase::Analyzing { .. })
    }

    /// Drag entered the drop target.
    pub fn drag_enter(&mut self) {
        self.dragging = true;
    }

    /// Drag is moving over the drop target.
    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    /// Drag left the drop target.
    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Handles a dropped file.
    ///
    /// Candidates whose declared type is not `image/*` or `video/*` are
    /// ignored without touching submission state.
    pub fn drop_file(&mut self, candidate: MediaFile) -> Option<Effect> {
        self.dragging = false;
        if !is_supported_mime(candidate.mime_type()) {
            return None;
        }
        self.acquire(candidate)
    }

    /// Handles a file chosen through the picker.
    ///
    /// A rejected candidate changes nothing except the error shown.
    pub fn pick_file(&mut self, candidate: MediaFile) -> Option<Effect> {
        self.acquire(candidate)
    }

    fn acquire(&mut self, candidate: MediaFile) -> Option<Effect> {
        let kind = match validate_media(&candidate) {
            Ok(kind) => kind,
            Err(error) => {
                self.reject(ErrorState::new(ErrorKind::Validation, error.to_string()));
                return None;
            }
        };

        // Release the outgoing preview before minting the next one.
        self.phase = Phase::Empty;
        let generation = self.next_generation();

        let (preview, effect) = match begin_preview(&candidate, kind, &self.registry) {
            PreviewPlan::Ready(handle) => (PreviewStatus::Ready(handle), None),
            PreviewPlan::Deferred => (
                PreviewStatus::Loading,
                Some(Effect::ReadPreview {
                    ticket: Ticket(generation),
                    media: candidate.clone(),
                }),
            ),
        };

        self.phase = Phase::Ready(StagedMedia {
            media: candidate,
            kind,
            generation,
            preview,
        });
        effect
    }

    /// Applies a finished image read.
    ///
    /// Returns `false` when the ticket no longer matches the staged file.
    /// A failed read marks the preview unavailable and surfaces a Preview
    /// error; an in-flight analysis keeps running.
    pub fn preview_loaded(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, PreviewError>,
    ) -> bool {
        let Some(staged) = self.staged_mut() else {
            return false;
        };
        if staged.generation != ticket.0 || !matches!(staged.preview, PreviewStatus::Loading) {
            return false;
        }

        match outcome {
            Ok(uri) => {
                staged.preview = PreviewStatus::Ready(PreviewHandle::Embedded(uri));
            }
            Err(error) => {
                staged.preview = PreviewStatus::Unavailable;
                self.reject(ErrorState::new(ErrorKind::Preview, error.to_string()));
            }
        }
        true
    }

    /// Starts an analysis attempt for the staged file.
    ///
    /// Returns `None` when nothing is staged or an attempt is already in
    /// flight. Clears any previous result or error.
    pub fn begin_analysis(&mut self) -> Option<Effect> {
        if !self.can_analyze() {
            return None;
        }
        let staged = self.take_staged()?;
        let attempt = self.next_generation();
        let media = staged.media.clone();

        self.phase = Phase::Analyzing {
            staged,
            attempt,
            notice: None,
        };
        Some(Effect::Analyze {
            ticket: Ticket(attempt),
            media,
        })
    }

    /// Applies a finished analysis attempt.
    ///
    /// Returns `false` and changes nothing when the attempt was superseded by
    /// Reset or a new acquisition.
    pub fn analysis_finished(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, ErrorState>,
    ) -> bool {
        match &self.phase {
            Phase::Analyzing { attempt, .. } if *attempt == ticket.0 => {}
            _ => return false,
        }
        let Some(staged) = self.take_staged() else {
            return false;
        };

        self.phase = match outcome {
            Ok(result) => Phase::Resulted { staged, result },
            Err(error) => Phase::Errored {
                staged: Some(staged),
                error,
                prior: None,
            },
        };
        true
    }

    /// Returns to the initial state, releasing the preview and invalidating
    /// every pending completion.
    pub fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.dragging = false;
        self.next_generation();
    }

    /// Surfaces a rejection without disturbing the staged file, a shown
    /// result, or an in-flight attempt.
    fn reject(&mut self, error: ErrorState) {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Empty) {
            Phase::Analyzing {
                staged, attempt, ..
            } => Phase::Analyzing {
                staged,
                attempt,
                notice: Some(error),
            },
            Phase::Empty => Phase::Errored {
                staged: None,
                error,
                prior: None,
            },
            Phase::Ready(staged) => Phase::Errored {
                staged: Some(staged),
                error,
                prior: None,
            },
            Phase::Resulted { staged, result } => Phase::Errored {
                staged: Some(staged),
                error,
                prior: Some(result),
            },
            Phase::Errored { staged, prior, .. } => Phase::Errored {
                staged,
                error,
                prior,
            },
        };
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn staged_mut(&mut self) -> Option<&mut StagedMedia> {
        match &mut self.phase {
            Phase::Empty => None,
            Phase::Ready(staged)
            | Phase::Analyzing { staged, .. }
            | Phase::Resulted { staged, .. } => Some(staged),
            Phase::Errored { staged, .. } => staged.as_mut(),
        }
    }

    fn take_staged(&mut self) -> Option<StagedMedia> {
        match std::mem::replace(&mut self.phase, Phase::Empty) {
            Phase::Empty => None,
            Phase::Ready(staged)
            | Phase::Analyzing { staged, .. }
            | Phase::Resulted { staged, .. } => Some(staged),
            Phase::Errored { staged, .. } => staged,
        }
    }
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new(ObjectUrlRegistry::new())
    }
}
