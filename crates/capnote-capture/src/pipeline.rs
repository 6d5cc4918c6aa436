//! Capture orchestrator.
//!
//! One message at a time: log it, check admission, then produce one note per
//! URL (or one memo note for plain text). Every stage failure is logged and
//! skipped; [`CapturePipeline::process`] always returns a report.

use std::sync::Arc;
use std::time::Instant;

use tracing::field::Empty;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use capnote_core::logging;
use capnote_core::{
    ContentExtractor, IncomingMessage, LineTidy, MemoRecord, MessageLog, NoteDraft, NoteRecord,
    NoteSink, Result, TextOrganizer,
};
use capnote_db::Database;
use capnote_extract::{
    extract_urls, is_internal_url, PageFetcher, StructuralExtractor, TagStripExtractor,
};
use capnote_notes::{JoplinClient, RestNoteClient};

use crate::composer::{
    compose_article, compose_external, compose_internal, compose_text, sender_metadata, NoteStyle,
};
use crate::config::{CaptureConfig, ExtractorKind, NoteBackend};
use crate::report::{Branch, CaptureReport, NoteOutcome, Stage};
use crate::scope::CaptureScope;

pub struct CapturePipeline {
    extractor: Arc<dyn ContentExtractor>,
    sink: Arc<dyn NoteSink>,
    log: Arc<dyn MessageLog>,
    organizer: Arc<dyn TextOrganizer>,
    scope: CaptureScope,
    style: NoteStyle,
}

impl CapturePipeline {
    /// Pipeline with the admin scope, link style and [`LineTidy`].
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        sink: Arc<dyn NoteSink>,
        log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            extractor,
            sink,
            log,
            organizer: Arc::new(LineTidy),
            scope: CaptureScope::default(),
            style: NoteStyle::default(),
        }
    }

    /// Build every collaborator named by `config` and open the message log.
    pub async fn from_config(config: &CaptureConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(config.fetch.clone())?;
        let extractor: Arc<dyn ContentExtractor> = match config.extractor {
            ExtractorKind::Structural => Arc::new(StructuralExtractor::new(fetcher)),
            ExtractorKind::TagStrip => Arc::new(TagStripExtractor::new(fetcher)),
        };

        let sink: Arc<dyn NoteSink> = match config.backend {
            NoteBackend::Joplin => Arc::new(JoplinClient::new(config.joplin.clone())?),
            NoteBackend::Rest => Arc::new(RestNoteClient::new(config.rest.clone())?),
        };

        let db = Database::connect(&config.storage.database_url).await?;

        info!(
            subsystem = "capture",
            component = "pipeline",
            scope = %config.scope,
            extractor = extractor.name(),
            backend = sink.name(),
            "Capture pipeline ready"
        );

        Ok(Self::new(extractor, sink, Arc::new(db.log))
            .with_scope(config.scope)
            .with_style(config.backend.style()))
    }

    pub fn with_scope(mut self, scope: CaptureScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_style(mut self, style: NoteStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_organizer(mut self, organizer: Arc<dyn TextOrganizer>) -> Self {
        self.organizer = organizer;
        self
    }

    pub fn scope(&self) -> CaptureScope {
        self.scope
    }

    pub fn style(&self) -> NoteStyle {
        self.style
    }

    /// Run one message through the pipeline.
    pub async fn process(&self, message: &IncomingMessage) -> CaptureReport {
        let capture_id = Uuid::now_v7();
        let span = info_span!(
            "capture",
            capture_id = %capture_id,
            sender = %message.sender_name,
            stage = Empty,
            message_id = Empty,
            url_count = Empty,
        );

        let start = Instant::now();
        let report = self
            .run(message, CaptureReport::new(capture_id))
            .instrument(span.clone())
            .await;

        span.in_scope(|| {
            info!(
                subsystem = "capture",
                component = "pipeline",
                op = "process",
                stage = report.stage.as_str(),
                saved = report.saved(),
                failed = report.failed(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Message processed"
            );
        });
        report
    }

    async fn run(&self, message: &IncomingMessage, mut report: CaptureReport) -> CaptureReport {
        match self.log.save_message(message).await {
            Ok(id) => {
                report.message_id = Some(id);
                Span::current().record(logging::MESSAGE_ID, id);
            }
            Err(e) => error!(
                subsystem = "capture",
                component = "pipeline",
                op = "save_message",
                error = %e,
                "Failed to log message"
            ),
        }
        self.advance(&mut report, Stage::Logged);

        if !self.scope.admits(message) {
            debug!(
                subsystem = "capture",
                component = "pipeline",
                scope = %self.scope,
                "Message outside capture scope"
            );
            return report;
        }
        report.admitted = true;
        self.advance(&mut report, Stage::Admitted);

        let urls = extract_urls(&message.text);
        Span::current().record(logging::URL_COUNT, urls.len());
        self.advance(&mut report, Stage::UrlsExtracted);

        if urls.is_empty() {
            self.capture_text(message, &mut report).await;
        } else {
            for url in &urls {
                self.capture_url(message, url, &mut report).await;
            }
        }

        self.advance(&mut report, Stage::Done);
        report
    }

    async fn capture_text(&self, message: &IncomingMessage, report: &mut CaptureReport) {
        report.branches.push(Branch::Text);
        debug!(subsystem = "capture", component = "pipeline", branch = Branch::Text.as_str(), "Plain text message");

        match self.log.save_memo(&MemoRecord::from(message)).await {
            Ok(id) => report.memo_id = Some(id),
            Err(e) => error!(
                subsystem = "capture",
                component = "pipeline",
                op = "save_memo",
                error = %e,
                "Failed to save memo"
            ),
        }

        if self.style == NoteStyle::Article {
            return;
        }

        let body = self.organizer.organize(&message.text).await;
        let draft = compose_text(&body).with_metadata(sender_metadata(message));
        self.submit(draft, report).await;
    }

    async fn capture_url(&self, message: &IncomingMessage, url: &str, report: &mut CaptureReport) {
        if is_internal_url(url) {
            report.branches.push(Branch::Internal);
            debug!(
                subsystem = "capture",
                component = "pipeline",
                branch = Branch::Internal.as_str(),
                url,
                "Internal link, not fetched"
            );
            let draft = compose_internal(&message.text, url).with_metadata(sender_metadata(message));
            self.submit(draft, report).await;
            return;
        }

        report.branches.push(Branch::External);
        debug!(
            subsystem = "capture",
            component = "pipeline",
            branch = Branch::External.as_str(),
            url,
            extractor = self.extractor.name(),
            "External link"
        );

        let article = self.extractor.extract(url).await;
        let draft = match (self.style, article) {
            (NoteStyle::Link, article) => compose_external(&message.text, url, article.as_ref()),
            (NoteStyle::Article, Some(article)) => compose_article(&article),
            (NoteStyle::Article, None) => {
                warn!(
                    subsystem = "capture",
                    component = "pipeline",
                    url,
                    "No article content, note skipped"
                );
                report.notes.push(NoteOutcome::Skipped {
                    url: url.to_string(),
                    reason: "content unavailable".to_string(),
                });
                return;
            }
        };

        self.submit(draft.with_metadata(sender_metadata(message)), report).await;
    }

    /// Publish once, then write the audit row.
    async fn submit(&self, draft: NoteDraft, report: &mut CaptureReport) {
        self.advance(report, Stage::Composed);

        let published = self.sink.publish(&draft).await;
        self.advance(report, Stage::Submitted);

        let published = match published {
            Ok(published) => published,
            Err(e) => {
                error!(
                    subsystem = "capture",
                    component = "pipeline",
                    op = "publish",
                    backend = self.sink.name(),
                    title = draft.title(),
                    error = %e,
                    "Note not saved"
                );
                report.notes.push(NoteOutcome::Failed {
                    title: draft.title().to_string(),
                    error: e.to_string(),
                });
                return;
            }
        };

        info!(
            subsystem = "capture",
            component = "pipeline",
            op = "publish",
            backend = self.sink.name(),
            note_id = published.id.as_deref().unwrap_or(""),
            title = draft.title(),
            "Note saved"
        );

        let record = NoteRecord {
            title: draft.title().to_string(),
            content: draft.body().to_string(),
            url: draft.source_url().map(str::to_string),
            message_id: report.message_id,
        };
        if let Err(e) = self.log.save_note_record(&record).await {
            error!(
                subsystem = "capture",
                component = "pipeline",
                op = "save_note_record",
                error = %e,
                "Failed to record saved note"
            );
        }

        report.notes.push(NoteOutcome::Saved {
            title: draft.title().to_string(),
            note_id: published.id,
            failed_tags: published.failed_tags,
        });
    }

    fn advance(&self, report: &mut CaptureReport, stage: Stage) {
        report.reach(stage);
        Span::current().record(logging::STAGE, report.stage.as_str());
    }

    /// Close the message log and drop the HTTP clients.
    pub async fn shutdown(self) {
        self.log.close().await;
        info!(subsystem = "capture", component = "pipeline", op = "shutdown", "Capture pipeline stopped");
    }
}
