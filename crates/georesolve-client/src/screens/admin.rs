//! Admin screens: dashboard, complaint management and analytics.

use tracing::warn;

use georesolve_shared::{Category, Complaint, ComplaintId, Stats};

use super::{Phase, ScreenContext};
use crate::analytics::{resolution_rate, AnalyticsReport};
use crate::api::{sort_newest_first, ListQuery};
use crate::error::Result;
use crate::events::Notice;
use crate::filter::ComplaintBrowser;
use crate::map::{ComplaintMap, MapWidget};
use crate::workflow::{StatusEditor, WorkingCopy};

/// Complaints and stats, fetched together. Either failing fails the load.
#[derive(Debug, Default)]
pub struct AdminDashboard {
    phase: Phase,
    complaints: Vec<Complaint>,
    stats: Option<Stats>,
    map: ComplaintMap,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.phase = Phase::Loading;
        let all = ListQuery::all();
        let result = tokio::try_join!(
            ctx.repo.list_complaints(&all),
            ctx.repo.stats()
        )
        .map(|(mut complaints, stats)| {
            sort_newest_first(&mut complaints);
            self.complaints = complaints;
            self.stats = Some(stats);
        });
        if let Err(e) = &result {
            ctx.notify_error(e, "Failed to fetch data");
        }
        self.phase = Phase::after(&result);
        result
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn stats(&self) -> Option<Stats> {
        self.stats
    }

    pub fn resolution_rate(&self) -> Option<f64> {
        self.stats.as_ref().map(resolution_rate)
    }

    pub fn recent(&self, n: usize) -> &[Complaint] {
        &self.complaints[..n.min(self.complaints.len())]
    }

    pub fn render_map(&self, widget: &mut dyn MapWidget) {
        self.map.render(&self.complaints, widget);
    }
}

/// Search, filter and edit every complaint.
#[derive(Debug, Default)]
pub struct ComplaintManagement {
    phase: Phase,
    browser: ComplaintBrowser,
    categories: Vec<Category>,
    editor: StatusEditor,
}

impl ComplaintManagement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch complaints and the category list. A category failure only
    /// empties the category filter options.
    pub async fn load(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.phase = Phase::Loading;
        let all = ListQuery::all();
        let (complaints, categories) = tokio::join!(
            ctx.repo.list_complaints(&all),
            ctx.repo.categories()
        );
        match categories {
            Ok(categories) => self.categories = categories,
            Err(e) => warn!(error = %e, "Failed to fetch categories"),
        }
        let result = self.apply(ctx, complaints);
        self.phase = Phase::after(&result);
        result
    }

    /// Refetch the collection, keeping the current query.
    pub async fn refresh(&mut self, ctx: &ScreenContext) -> Result<()> {
        let fetched = ctx.repo.list_complaints(&ListQuery::all()).await;
        let result = self.apply(ctx, fetched);
        self.phase = Phase::after(&result);
        result
    }

    fn apply(&mut self, ctx: &ScreenContext, fetched: Result<Vec<Complaint>>) -> Result<()> {
        let result = fetched.map(|mut complaints| {
            sort_newest_first(&mut complaints);
            self.browser.replace(complaints);
        });
        if let Err(e) = &result {
            ctx.notify_error(e, "Failed to fetch complaints");
        }
        result
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn browser(&self) -> &ComplaintBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut ComplaintBrowser {
        &mut self.browser
    }

    pub fn visible(&self) -> Vec<Complaint> {
        self.browser.visible()
    }

    pub fn editor(&self) -> &StatusEditor {
        &self.editor
    }

    /// Open the editor on a complaint from the current snapshot.
    pub fn open_editor(&mut self, id: ComplaintId) -> Option<&mut WorkingCopy> {
        let complaint = self.browser.complaints().iter().find(|c| c.id == id)?.clone();
        Some(self.editor.open(&complaint))
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Submit the open editor and, on success, refetch the whole collection.
    pub async fn submit_edit(&mut self, ctx: &ScreenContext) -> Result<Complaint> {
        match self.editor.submit(&*ctx.repo).await {
            Ok(updated) => {
                ctx.notify(Notice::success("Complaint updated successfully"));
                // A failed refetch has already been reported by `refresh`.
                let _ = self.refresh(ctx).await;
                Ok(updated)
            }
            Err(e) => {
                ctx.notify_error(&e, "Failed to update complaint");
                Err(e)
            }
        }
    }
}

/// Stats and category breakdown, fetched together.
#[derive(Debug, Default)]
pub struct AnalyticsScreen {
    phase: Phase,
    report: Option<AnalyticsReport>,
}

impl AnalyticsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.phase = Phase::Loading;
        let result = tokio::try_join!(ctx.repo.stats(), ctx.repo.category_breakdown())
            .map(|(stats, breakdown)| {
                self.report = Some(AnalyticsReport::new(stats, &breakdown));
            });
        if let Err(e) = &result {
            ctx.notify_error(e, "Failed to fetch analytics");
        }
        self.phase = Phase::after(&result);
        result
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn report(&self) -> Option<&AnalyticsReport> {
        self.report.as_ref()
    }
}
