//! Deploy Use Case
//!
//! Orchestrates one deploy to one host:
//! 1. Resolve the revision and static hashes
//! 2. Take the host lease, stage the build
//! 3. Merge into the release directory and link its static assets
//! 4. Render host settings into the release
//! 5. Prune old releases and orphan links (non-fatal)
//! 6. Repoint the active link, then reload services
//!
//! Phases run strictly in order; the first fatal error ends the deploy with
//! the active link untouched. There is no rollback.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::context::DeploymentContext;
use crate::domain::phase::DeployPhase;
use crate::domain::ports::{
    DeployEvent, DeployEventSink, HistoryRepository, NoopEventSink, TemplateRenderer,
    VersionControl,
};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::lease::{DeployLease, LeaseError};
use crate::infrastructure::session::HostSession;

use super::options::{DeployOptions, HostSpec};
use super::result::{DeployReport, DryRunPlan};
use crate::application::activate::{current_release, ActivationSwitch};
use crate::application::merge::ReleaseMerger;
use crate::application::prune::RetentionPruner;
use crate::application::resolver::{ContentVersionResolver, ResolvedVersion};
use crate::application::settings::HostConfigurator;
use crate::application::static_link::StaticAssetLinker;
use crate::application::transfer::ArtifactTransfer;

/// Deploy use case - one instance serves any number of hosts
pub struct DeployUseCase<'a> {
    context: &'a DeploymentContext,
    vcs: &'a dyn VersionControl,
    renderer: &'a dyn TemplateRenderer,
    history: Option<&'a dyn HistoryRepository>,
    events: Arc<dyn DeployEventSink>,
}

/// Walks the phase machine for one host, logging and emitting each step
struct PhaseTracker<'a> {
    host: &'a str,
    phase: DeployPhase,
    events: &'a dyn DeployEventSink,
}

impl PhaseTracker<'_> {
    fn enter(&mut self, to: DeployPhase) {
        match self.phase.advance(to) {
            Ok(next) => self.phase = next,
            Err(e) => {
                tracing::error!(host = self.host, error = %e, "phase order violated");
                self.phase = to;
            }
        }
        tracing::info!(host = self.host, phase = %to, "phase started");
        self.events.on_event(DeployEvent::PhaseStarted {
            host: self.host.to_string(),
            phase: to,
        });
    }
}

impl<'a> DeployUseCase<'a> {
    pub fn new(
        context: &'a DeploymentContext,
        vcs: &'a dyn VersionControl,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            context,
            vcs,
            renderer,
            history: None,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_history(mut self, history: &'a dyn HistoryRepository) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Deploy `options.reference` to one host
    pub fn execute(
        &self,
        host: &HostSpec,
        session: &HostSession,
        options: &DeployOptions,
    ) -> DeployReport {
        let mut report = DeployReport::new(&host.name, &options.reference);
        let mut tracker = PhaseTracker {
            host: &host.name,
            phase: DeployPhase::Resolving,
            events: self.events.as_ref(),
        };

        self.events.on_event(DeployEvent::Started {
            host: host.name.clone(),
            reference: options.reference.clone(),
        });
        tracing::info!(host = %host.name, phase = %DeployPhase::Resolving, reference = %options.reference, "deploy started");

        let outcome = self.run(host, session, options, &mut tracker, &mut report);

        match outcome {
            Ok(()) if options.dry_run => {}
            Ok(()) => tracker.enter(DeployPhase::Done),
            Err(err) => {
                tracing::error!(
                    host = %host.name,
                    phase = %tracker.phase,
                    kind = %err.kind(),
                    error = %err,
                    "deploy failed"
                );
                report.failed_in = Some(tracker.phase);
                tracker.enter(DeployPhase::Failed);
                report.error = Some(err);
            }
        }
        report.phase = tracker.phase;

        if !options.dry_run {
            self.record(&report);
        }
        self.events.on_event(DeployEvent::Completed {
            host: host.name.clone(),
            activated: report.activated,
            error: report.error_kind(),
        });
        report
    }

    fn run(
        &self,
        host: &HostSpec,
        session: &HostSession,
        options: &DeployOptions,
        tracker: &mut PhaseTracker<'_>,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        let layout = self.context.layout();
        let fs = session.fs.as_ref();
        let name = host.name.as_str();

        // Resolving: nothing on the host is touched before this succeeds
        let version = ContentVersionResolver::new(self.vcs).resolve_for_build(
            &options.reference,
            self.context.track_static(),
            self.context.build_dir(),
        )?;
        report.revision_hash = Some(version.revision.clone());
        report.static_hash = Some(version.static_hash.clone());
        self.events.on_event(DeployEvent::Resolved {
            host: name.to_string(),
            revision: version.revision.to_string(),
            static_hash: version.static_hash.to_string(),
        });

        if options.dry_run {
            report.plan = Some(self.plan(session, &version)?);
            return Ok(());
        }

        tracker.enter(DeployPhase::Transferring);
        let lease = DeployLease::acquire(
            fs,
            &layout.lock_path(),
            &options.owner,
            self.context.lock_ttl(),
        )
        .map_err(|e| lock_error(name, layout.lock_path(), e))?;

        let staging = layout.staging_path();
        let stats = ArtifactTransfer::new(session.transfer.as_ref(), name)
            .stage(self.context.build_dir(), &staging)?;
        self.events.on_event(DeployEvent::Transferred {
            host: name.to_string(),
            transferred: stats.transferred.len(),
            deleted: stats.deleted.len(),
        });
        report.transfer = Some(stats);

        tracker.enter(DeployPhase::Merging);
        let release = ReleaseMerger::new(fs, layout)
            .resetting(self.context.settings_file())
            .merge(&staging, &version.revision)?;
        report.release_path = Some(release.clone());
        self.events.on_event(DeployEvent::Merged {
            host: name.to_string(),
            release: release.clone(),
        });
        let link = StaticAssetLinker::new(fs, layout).link(&release, &version.static_hash)?;
        self.events.on_event(DeployEvent::StaticLinked {
            host: name.to_string(),
            link,
        });

        tracker.enter(DeployPhase::ConfiguringHost);
        HostConfigurator::new(fs, self.renderer, session.adapter.as_ref(), self.context)
            .configure(&release, &version, host.role.as_deref(), &host.context)?;

        tracker.enter(DeployPhase::Pruning);
        self.prune(session, &version, report);

        tracker.enter(DeployPhase::Activating);
        let activation = ActivationSwitch::new(fs, layout).activate(&release)?;
        report.activated = true;
        self.events.on_event(DeployEvent::Activated {
            host: name.to_string(),
            release: activation.release,
            previous: activation.previous,
        });

        drop(lease);
        self.reload(host, session, report);
        Ok(())
    }

    /// Release pruning and the orphan sweep; failures become warnings
    fn prune(&self, session: &HostSession, version: &ResolvedVersion, report: &mut DeployReport) {
        let fs = session.fs.as_ref();
        let pruner = RetentionPruner::new(fs, self.context.layout(), self.context.retention());

        match pruner.prune(&[version.revision.as_str()]) {
            Ok(outcome) => {
                for release in &outcome.removed {
                    self.events.on_event(DeployEvent::ReleasePruned {
                        host: fs.host().to_string(),
                        release: release.clone(),
                    });
                }
                report.pruned = outcome.removed;
            }
            Err(e) => self.warn(fs.host(), e, report),
        }

        match pruner.sweep_orphan_links() {
            Ok(swept) => {
                for link in &swept {
                    self.events.on_event(DeployEvent::LinkSwept {
                        host: fs.host().to_string(),
                        link: link.clone(),
                    });
                }
                report.swept = swept;
            }
            Err(e) => self.warn(fs.host(), e, report),
        }
    }

    /// Restart the host's services; the release stays active if one fails
    fn reload(&self, host: &HostSpec, session: &HostSession, report: &mut DeployReport) {
        for service in &host.reload {
            if let Err(e) = session
                .adapter
                .restart_service(session.exec.as_ref(), service)
            {
                let message = format!("reloading {service} failed: {e}");
                tracing::warn!(host = %host.name, service = %service, error = %e, "service reload failed");
                self.events.on_event(DeployEvent::Warning {
                    host: host.name.clone(),
                    message: message.clone(),
                });
                report.warnings.push(message);
            }
        }
    }

    fn warn(&self, host: &str, err: DeployError, report: &mut DeployReport) {
        tracing::warn!(host, error = %err, "pruning failed; continuing");
        self.events.on_event(DeployEvent::Warning {
            host: host.to_string(),
            message: err.to_string(),
        });
        report.warnings.push(err.to_string());
    }

    fn plan(&self, session: &HostSession, version: &ResolvedVersion) -> DeployResult<DryRunPlan> {
        let layout = self.context.layout();
        let fs = session.fs.as_ref();
        let pruner = RetentionPruner::new(fs, layout, self.context.retention());
        let prune = pruner.plan_with_incoming(version.revision.as_str())?;

        let active = current_release(fs, layout).map_err(|e| DeployError::Prune {
            host: fs.host().to_string(),
            path: layout.active_link(),
            message: e.to_string(),
        })?;

        Ok(DryRunPlan {
            staging_path: layout.staging_path(),
            release_path: layout.release_path(&version.revision),
            static_link: layout.static_link(&version.static_hash),
            active,
            prune,
        })
    }

    fn record(&self, report: &DeployReport) {
        let Some(history) = self.history else {
            return;
        };
        if let Err(e) = history.append(report.to_record()) {
            tracing::warn!(host = %report.host, error = %e, "could not record deploy history");
        }
    }
}

fn lock_error(host: &str, path: PathBuf, err: LeaseError) -> DeployError {
    DeployError::Lock {
        host: host.to_string(),
        path,
        message: err.to_string(),
    }
}
