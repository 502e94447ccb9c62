//! Upload orchestrator for the single-resume flow.
//!
//! Owns the state machine, the session parameters and the transport. Each
//! handler validates, drives the transitions, emits events and returns an
//! outcome the caller can act on. Cancellation goes through a shared
//! [`CancellationToken`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;
use uuid::Uuid;

use resumedrop_i18n::Locale;

use crate::classify::UploadErrorCategory;
use crate::config::UploadConfig;
use crate::drag::{self, DragIntent};
use crate::error::{MissingResumeId, TransportFailure, UploadError};
use crate::feedback::FeedbackBanner;
use crate::files::SelectedFile;
use crate::session::UploadSession;
use crate::state::{FileStatus, FileUploadState};
use crate::transport::{UploadRequest, UploadTransport, build_upload_url, upload_headers};
use crate::types::{AttachOutcome, SubmitOutcome, UploadEvent, UploadResponse};
use crate::validation::ValidationRules;

const EVENT_CAPACITY: usize = 64;

/// Drives one upload screen.
pub struct UploadOrchestrator {
    config: UploadConfig,
    rules: ValidationRules,
    session: UploadSession,
    state: FileUploadState,
    transport: Box<dyn UploadTransport>,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
    cancel: CancellationToken,
}

impl UploadOrchestrator {
    pub fn new(config: UploadConfig, locale: Locale, transport: Box<dyn UploadTransport>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);
        Self {
            rules: ValidationRules::from_config(&config),
            session: UploadSession::new(&config, locale),
            config,
            state: FileUploadState::new(),
            transport,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Token that aborts the in-flight upload when cancelled.
    ///
    /// A token cancelled while nothing is uploading aborts the next
    /// submission. After a cancellation is handled the orchestrator switches
    /// to a fresh token, so callers should fetch it again.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn state(&self) -> &FileUploadState {
        &self.state
    }

    pub fn feedback(&self) -> FeedbackBanner {
        FeedbackBanner::derive(&self.state)
    }

    /// True while the selected model is premium and no token was entered.
    pub fn upload_disabled(&self) -> bool {
        self.session.upload_disabled(&self.config)
    }

    /// Whether the click-to-browse affordance is available.
    pub fn can_browse(&self) -> bool {
        drag::drop_zone_enabled(&self.state, self.upload_disabled())
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), UploadError> {
        self.session.select_model(&self.config, model)
    }

    pub fn set_access_token(&mut self, token: &str) {
        self.session.set_access_token(token);
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.session.set_locale(locale);
    }

    pub fn on_drag_enter(&mut self) {
        self.drag(DragIntent::Enter);
    }

    pub fn on_drag_leave(&mut self) {
        self.drag(DragIntent::Leave);
    }

    pub fn on_drag_over(&mut self) {
        self.drag(DragIntent::Over);
    }

    /// Handles a drop. Returns `None` when the zone was disabled or the
    /// payload was empty.
    pub async fn on_drop(&mut self, files: Vec<SelectedFile>) -> Option<AttachOutcome> {
        let file = self.drag(DragIntent::Drop(files))?;
        Some(self.handle_attach(file).await)
    }

    fn drag(&mut self, intent: DragIntent) -> Option<SelectedFile> {
        let disabled = self.upload_disabled();
        drag::capture(&mut self.state, disabled, intent)
    }

    /// Validates and attaches a file, submitting it right away when
    /// auto-submit is on and no token is missing.
    pub async fn handle_attach(&mut self, file: SelectedFile) -> AttachOutcome {
        let (file_id, file_name) = match self.state.attach(file, &self.rules) {
            Ok(attached) => (attached.id, attached.name.clone()),
            Err(err) => {
                warn!(error = %err, "file rejected");
                self.emit(UploadEvent::Rejected {
                    category: UploadErrorCategory::from(&err),
                });
                return AttachOutcome::Rejected(err);
            }
        };
        self.emit(UploadEvent::Attached { file_id, file_name });

        if self.upload_disabled() {
            self.emit_token_required();
            return AttachOutcome::AwaitingToken;
        }
        if !self.config.auto_submit {
            return AttachOutcome::Pending;
        }

        match self.handle_submit().await {
            Ok(outcome) => AttachOutcome::Submitted(outcome),
            Err(e) => {
                warn!(error = %e, "auto-submit skipped");
                AttachOutcome::Pending
            }
        }
    }

    /// Removes the attached file if `file_id` matches it.
    ///
    /// Returns `Ok(false)` for an unknown id and `Busy` while uploading.
    pub fn handle_remove(&mut self, file_id: Uuid) -> Result<bool, UploadError> {
        if self.state.file().map(|f| f.id) != Some(file_id) {
            debug!(%file_id, "remove ignored, not the attached file");
            return Ok(false);
        }

        self.state.remove()?;
        debug!(%file_id, "file removed");
        self.emit(UploadEvent::Removed { file_id });
        Ok(true)
    }

    /// Submits the pending file.
    pub async fn handle_submit(&mut self) -> Result<SubmitOutcome, UploadError> {
        match self.state.status() {
            Some(FileStatus::Pending) => {}
            Some(FileStatus::Uploading) => return Err(UploadError::Busy),
            _ => return Err(UploadError::NothingPending),
        }
        if self.upload_disabled() {
            self.emit_token_required();
            return Err(UploadError::TokenRequired(
                self.session.selected_model().to_string(),
            ));
        }

        let file = self.state.begin_upload()?;
        let file_id = file.id;
        let file_name = file.name.clone();
        let mime_type = file.mime_type.clone();
        let size_bytes = file.size_bytes;
        let source = file.source.clone();
        self.emit(UploadEvent::Started { file_id });

        let base = self.config.api_base_url.as_deref().unwrap_or_default();
        let url = match build_upload_url(base, &self.session) {
            Ok(url) => url,
            Err(failure) => return self.finish_failure(file_id, &file_name, failure),
        };
        let request = UploadRequest {
            url,
            headers: upload_headers(&self.session),
            file_name: file_name.clone(),
            mime_type,
            size_bytes,
            source,
        };
        debug!(file = %file_name, url = %request.url, "submitting upload");

        let cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            r = self.transport.submit(request) => Some(r),
        };

        match result {
            None => {
                self.state.abandon_upload()?;
                self.cancel = CancellationToken::new();
                warn!(file = %file_name, "upload cancelled");
                self.emit(UploadEvent::Cancelled { file_id });
                Ok(SubmitOutcome::Cancelled)
            }
            Some(Ok(payload)) => match UploadResponse::from_payload(&payload).resume_id {
                Some(resume_id) => {
                    self.state.complete(resume_id.clone())?;
                    let navigation = build_navigation_target(
                        &self.config.next_step_path,
                        &resume_id,
                        &self.session,
                    );
                    info!(file = %file_name, resume_id = %resume_id, "upload completed");

                    self.emit(UploadEvent::Uploaded {
                        file_id,
                        resume_id: resume_id.clone(),
                    });
                    self.emit(UploadEvent::Navigate {
                        target: navigation.clone(),
                    });
                    Ok(SubmitOutcome::Uploaded {
                        resume_id,
                        navigation,
                    })
                }
                None => {
                    let err = MissingResumeId { file_name };
                    let category = UploadErrorCategory::from(&err);
                    error!(file = %err.file_name, "upload response missing resume_id");

                    self.state.fail(err.to_string(), category.clone())?;
                    self.emit(UploadEvent::Failed { file_id, category });
                    Ok(SubmitOutcome::MissingResumeId)
                }
            },
            Some(Err(failure)) => self.finish_failure(file_id, &file_name, failure),
        }
    }

    fn finish_failure(
        &mut self,
        file_id: Uuid,
        file_name: &str,
        failure: TransportFailure,
    ) -> Result<SubmitOutcome, UploadError> {
        let category = UploadErrorCategory::from(&failure);
        error!(file = %file_name, error = %failure, "upload failed");

        self.state.fail(failure.to_string(), category.clone())?;
        self.emit(UploadEvent::Failed {
            file_id,
            category: category.clone(),
        });
        Ok(SubmitOutcome::Failed(category))
    }

    fn emit_token_required(&self) {
        let model = self.session.selected_model().to_string();
        debug!(%model, "upload blocked until an access token is entered");
        self.emit(UploadEvent::TokenRequired { model });
    }

    fn emit(&self, event: UploadEvent) {
        // Nobody listening, or the listener fell behind.
        let _ = self.events_tx.try_send(event);
    }
}

/// `{path}?resume_id=..&model=..[&token=..]`
pub fn build_navigation_target(path: &str, resume_id: &str, session: &UploadSession) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("resume_id", resume_id)
        .append_pair("model", session.selected_model());
    if let Some(token) = session.access_token() {
        query.append_pair("token", token);
    }
    format!("{path}?{}", query.finish())
}
