//! Citizen screens: dashboard, report form and "My Reports".

use thiserror::Error;
use tracing::{debug, info};

use georesolve_shared::protocol::NewComplaint;
use georesolve_shared::{Category, Complaint, GeoPoint, Stats, ValidationError};

use super::{Phase, ScreenContext};
use crate::analytics::tally;
use crate::api::{sort_newest_first, ListQuery};
use crate::error::{ClientError, ErrorKind, Result};
use crate::events::Notice;
use crate::images::{ImageSet, ImageSource, IngestRejection, IngestReport};
use crate::map::{ComplaintMap, LocationPicker, MapWidget};
use crate::routes::Route;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Every complaint on the map, with counts computed from the same snapshot.
#[derive(Debug, Default)]
pub struct CitizenDashboard {
    phase: Phase,
    complaints: Vec<Complaint>,
    stats: Stats,
    map: ComplaintMap,
}

impl CitizenDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.phase = Phase::Loading;
        let all = ListQuery::all();
        let (fetched, fix) = tokio::join!(
            ctx.repo.list_complaints(&all),
            ctx.geolocator.current_position()
        );
        match fix {
            Ok(point) => self.map.recenter(point),
            Err(e) => debug!(error = %e, "dashboard map stays on fallback centre"),
        }

        let result = fetched.map(|mut complaints| {
            sort_newest_first(&mut complaints);
            self.stats = tally(&complaints);
            self.complaints = complaints;
        });
        if let Err(e) = &result {
            ctx.notify_error(e, "Failed to fetch complaints");
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

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn map(&self) -> &ComplaintMap {
        &self.map
    }

    pub fn render_map(&self, widget: &mut dyn MapWidget) {
        self.map.render(&self.complaints, widget);
    }
}

// ---------------------------------------------------------------------------
// My Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ComplaintHistory {
    phase: Phase,
    complaints: Vec<Complaint>,
}

impl ComplaintHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the actor's own complaints, newest first.
    pub async fn load(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.phase = Phase::Loading;
        let result = match ctx.session() {
            Ok(session) => ctx.repo.user_complaints(session.user.id).await,
            Err(e) => Err(e),
        };
        let result = result.map(|mut complaints| {
            sort_newest_first(&mut complaints);
            self.complaints = complaints;
        });
        if let Err(e) = &result {
            ctx.notify_error(e, "Failed to fetch complaints");
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
}

// ---------------------------------------------------------------------------
// Report form
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Rejected(#[from] ClientError),
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(_) => ErrorKind::ValidationFailure,
            Self::Rejected(e) => e.kind(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Rejected(e) => e.user_message("Failed to report complaint"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportForm {
    pub title: String,
    pub description: String,
    pub category: String,
    categories: Vec<Category>,
    picker: LocationPicker,
    images: ImageSet,
}

impl ReportForm {
    /// Where the user goes after a successful submission.
    pub const AFTER_SUBMIT: Route = Route::CitizenDashboard;

    pub fn new() -> Self {
        Self::default()
    }

    /// Load categories and ask for a device fix, concurrently.
    pub async fn open(&mut self, ctx: &ScreenContext) {
        let (categories, fix) =
            tokio::join!(ctx.repo.categories(), ctx.geolocator.current_position());
        self.apply_categories(ctx, categories);

        if self.picker.on_geolocation(fix) {
            ctx.notify(Notice::success("Location detected automatically"));
        } else {
            ctx.notify(Notice::error(
                "Unable to get your location. Please select manually on map.",
            ));
        }
    }

    /// Load categories with the location already chosen. No device fix is
    /// requested, so no location notice is raised.
    pub async fn open_at(
        &mut self,
        ctx: &ScreenContext,
        point: GeoPoint,
    ) -> std::result::Result<GeoPoint, ValidationError> {
        let categories = ctx.repo.categories().await;
        self.apply_categories(ctx, categories);
        self.pick(point.latitude(), point.longitude())
    }

    fn apply_categories(&mut self, ctx: &ScreenContext, fetched: Result<Vec<Category>>) {
        match fetched {
            Ok(categories) => self.categories = categories,
            Err(e) => ctx.notify_error(&e, "Failed to fetch categories"),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn picker(&self) -> &LocationPicker {
        &self.picker
    }

    pub fn pick(&mut self, latitude: f64, longitude: f64) -> std::result::Result<GeoPoint, ValidationError> {
        self.picker.on_click(latitude, longitude)
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    /// Stage more images. Rejections and skipped files each raise a notice.
    pub async fn add_images(
        &mut self,
        ctx: &ScreenContext,
        files: &[Box<dyn ImageSource>],
    ) -> std::result::Result<IngestReport, IngestRejection> {
        match self.images.ingest(files).await {
            Ok(report) => {
                for skipped in &report.skipped {
                    ctx.notify(Notice::error(skipped.reason.to_string()));
                }
                Ok(report)
            }
            Err(rejection) => {
                ctx.notify(Notice::error(rejection.to_string()));
                Err(rejection)
            }
        }
    }

    pub fn remove_image(&mut self, index: usize) {
        self.images.remove(index);
    }

    /// Build the request, or name the first missing field.
    pub fn validate(&self) -> std::result::Result<NewComplaint, ValidationError> {
        let field = |value: &str, name: &'static str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ValidationError::MissingField(name))
            } else {
                Ok(value.to_string())
            }
        };
        let title = field(&self.title, "Title")?;
        let description = field(&self.description, "Description")?;
        let category = field(&self.category, "Category")?;
        let location = self.picker.picked().ok_or(ValidationError::MissingLocation)?;
        Ok(NewComplaint::new(
            title,
            description,
            category,
            location,
            self.images.images().to_vec(),
        ))
    }

    /// Validate, then create the complaint. Nothing is sent when validation
    /// fails.
    pub async fn submit(&mut self, ctx: &ScreenContext) -> std::result::Result<Complaint, ReportError> {
        let outcome = match self.validate() {
            Ok(request) => ctx
                .repo
                .create_complaint(&request)
                .await
                .map_err(ReportError::from),
            Err(e) => Err(ReportError::from(e)),
        };

        match outcome {
            Ok(complaint) => {
                info!(complaint_id = %complaint.id, category = %complaint.category, "complaint reported");
                ctx.notify(Notice::success("Complaint reported successfully!"));
                *self = Self {
                    categories: std::mem::take(&mut self.categories),
                    ..Self::default()
                };
                Ok(complaint)
            }
            Err(e) => {
                ctx.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }
}
