//! Async driver that runs controller effects and feeds completions back.

use deepguard_analysis_contract::AnalysisResult;
use deepguard_core::MediaFile;
use deepguard_preview::{PreviewError, read_data_uri};
use deepguard_ui::{Effect, SubmissionController, Ticket};
use deepguard_upload::{AnalysisClient, UploadError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error_state_from_upload;

enum Completion {
    Preview {
        ticket: Ticket,
        outcome: Result<String, PreviewError>,
    },
    Analysis {
        ticket: Ticket,
        outcome: Result<AnalysisResult, UploadError>,
    },
}

/// One submission screen: a controller plus the tasks it has started.
///
/// Completions are applied only inside [`SubmissionSession::process_next`],
/// so controller state never changes behind the caller's back. Each effect
/// runs on an inner task; if that task panics, the outer task still reports a
/// failed completion. Must be used from within a Tokio runtime.
pub struct SubmissionSession {
    controller: SubmissionController,
    client: AnalysisClient,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    pending: usize,
}

impl SubmissionSession {
    /// Creates a session with a fresh controller.
    pub fn new(client: AnalysisClient) -> Self {
        Self::with_controller(client, SubmissionController::default())
    }

    /// Creates a session around an existing controller.
    pub fn with_controller(client: AnalysisClient, controller: SubmissionController) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            client,
            completions_tx,
            completions_rx,
            pending: 0,
        }
    }

    /// Read-only controller access for rendering.
    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    /// Number of started tasks whose completion has not been applied.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Forwards drag-enter.
    pub fn drag_enter(&mut self) {
        self.controller.drag_enter();
    }

    /// Forwards drag-over.
    pub fn drag_over(&mut self) {
        self.controller.drag_over();
    }

    /// Forwards drag-leave.
    pub fn drag_leave(&mut self) {
        self.controller.drag_leave();
    }

    /// Handles a dropped file.
    pub fn drop_file(&mut self, candidate: MediaFile) {
        let effect = self.controller.drop_file(candidate);
        self.dispatch(effect);
    }

    /// Handles a picked file.
    pub fn pick_file(&mut self, candidate: MediaFile) {
        let effect = self.controller.pick_file(candidate);
        self.dispatch(effect);
    }

    /// Starts analysis; returns `false` when the controller refused.
    pub fn analyze(&mut self) -> bool {
        let effect = self.controller.begin_analysis();
        let started = effect.is_some();
        self.dispatch(effect);
        started
    }

    /// Resets the controller. Tasks still running finish, but their
    /// completions are discarded.
    pub fn reset(&mut self) {
        self.controller.reset();
        info!(pending = self.pending, "submission reset");
    }

    /// Waits for and applies one completion.
    ///
    /// Returns `false` immediately when nothing is pending.
    pub async fn process_next(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        let Some(completion) = self.completions_rx.recv().await else {
            return false;
        };
        self.pending -= 1;
        self.apply(completion);
        true
    }

    /// Applies completions until no task is pending.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    fn dispatch(&mut self, effect: Option<Effect>) {
        let Some(effect) = effect else {
            return;
        };
        let completions = self.completions_tx.clone();
        self.pending += 1;

        match effect {
            Effect::ReadPreview { ticket, media } => {
                debug!(
                    generation = ticket.generation(),
                    size = media.size(),
                    "reading image preview"
                );
                tokio::spawn(async move {
                    let outcome = tokio::spawn(read_data_uri(media))
                        .await
                        .unwrap_or_else(|error| {
                            warn!(%error, "preview task did not complete");
                            Err(PreviewError::ReadFailed(error.to_string()))
                        });
                    let _ = completions.send(Completion::Preview { ticket, outcome });
                });
            }
            Effect::Analyze { ticket, media } => {
                debug!(generation = ticket.generation(), "starting analysis attempt");
                let client = self.client.clone();
                tokio::spawn(async move {
                    let outcome = tokio::spawn(async move { client.analyze(&media).await })
                        .await
                        .unwrap_or_else(|error| {
                            warn!(%error, "analysis task did not complete");
                            Err(UploadError::Network(format!("Analysis request failed: {error}")))
                        });
                    let _ = completions.send(Completion::Analysis { ticket, outcome });
                });
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Preview { ticket, outcome } => {
                if !self.controller.preview_loaded(ticket, outcome) {
                    debug!(generation = ticket.generation(), "dropping stale preview read");
                }
            }
            Completion::Analysis { ticket, outcome } => {
                let outcome = outcome.map_err(error_state_from_upload);
                if !self.controller.analysis_finished(ticket, outcome) {
                    debug!(generation = ticket.generation(), "dropping stale analysis response");
                }
            }
        }
    }
}
