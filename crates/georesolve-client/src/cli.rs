//! Command-line front end.
//!
//! Each command names the screen it shows, passes through the session guard,
//! drives that screen's controller and renders its state as text.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use georesolve_shared::constants::DEFAULT_NEARBY_RADIUS_M;
use georesolve_shared::{Complaint, ComplaintId, GeoPoint, Role, Session, Status, ValidationError};

use crate::error::{ErrorKind, Result};
use crate::filter::{CategoryFilter, StatusFilter};
use crate::guard::Access;
use crate::images::{FileImage, ImageSource};
use crate::map::{distance_m, GeoJsonWidget};
use crate::routes::Route;
use crate::screens::{
    auth, AdminDashboard, AnalyticsScreen, CitizenDashboard, ComplaintHistory,
    ComplaintManagement, LoginForm, RegisterForm, ReportForm, ScreenContext,
};

/// GeoResolve civic complaint client
#[derive(Parser, Debug)]
#[command(name = "georesolve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend root URL (overrides BACKEND_URL)
    #[arg(long)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(long, env = "GEORESOLVE_PASSWORD")]
        password: String,
    },

    /// Create an account and store the session
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "GEORESOLVE_PASSWORD")]
        password: String,
        /// Register as an administrator
        #[arg(long)]
        admin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the account behind the stored session
    Whoami,

    /// Home screen for the current role
    Dashboard {
        /// Print map markers as GeoJSON
        #[arg(long)]
        geojson: bool,
    },

    /// Report a new complaint
    Report {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// Location as "lat,lng"; defaults to the device location
        #[arg(long)]
        at: Option<GeoPoint>,
        /// Image files to attach (at most 3)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },

    /// List my complaints, newest first
    History,

    /// Search and filter every complaint
    Complaints {
        #[arg(long, default_value = "")]
        search: String,
        /// pending, in_progress, resolved or all
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Category name or all
        #[arg(long, default_value = "all")]
        category: String,
        /// Print map markers as GeoJSON
        #[arg(long)]
        geojson: bool,
    },

    /// Change a complaint's status, assignee or resolution notes
    Update {
        id: ComplaintId,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show one complaint in full
    Show { id: ComplaintId },

    /// Complaints around a point
    Nearby {
        /// Centre as "lat,lng"; defaults to the device location
        #[arg(long)]
        at: Option<GeoPoint>,
        /// Search radius in metres
        #[arg(long, default_value_t = DEFAULT_NEARBY_RADIUS_M)]
        radius: f64,
    },

    /// Resolution rate and category breakdown
    Analytics,

    /// List complaint categories
    Categories,
}

impl Command {
    /// Screen this command shows. `None` for session commands that are
    /// always allowed.
    fn route(&self, session: Option<&Session>) -> Option<Route> {
        match self {
            Self::Login { .. } | Self::Register { .. } | Self::Logout => None,
            Self::Whoami | Self::Categories | Self::Show { .. } | Self::Nearby { .. } => {
                Some(Route::Landing)
            }
            Self::Dashboard { .. } => Some(match session.map(Session::role) {
                Some(Role::Admin) => Route::AdminDashboard,
                Some(Role::Citizen) | None => Route::CitizenDashboard,
            }),
            Self::Report { .. } => Some(Route::CitizenReport),
            Self::History => Some(Route::CitizenHistory),
            Self::Complaints { .. } | Self::Update { .. } => Some(Route::AdminComplaints),
            Self::Analytics => Some(Route::AdminAnalytics),
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Screen actually shown, after any redirect.
    pub route: Route,
    pub body: String,
}

impl Output {
    fn at(route: Route, body: impl Into<String>) -> Self {
        Self {
            route,
            body: body.into(),
        }
    }
}

fn redirected(route: Route) -> Output {
    let body = match route {
        Route::Login => "Not logged in. Run `georesolve login <email>` first.".to_string(),
        other => format!("Not available for this account; redirected to {other}"),
    };
    Output::at(route, body)
}

fn complaint_line(c: &Complaint) -> String {
    format!(
        "{}  [{}]  {}  ({}, by {}, {})",
        c.id,
        c.status.label(),
        c.title,
        c.category,
        c.reporter.name,
        c.created_at.format("%Y-%m-%d %H:%M")
    )
}

fn complaint_detail(c: &Complaint) -> String {
    let or_dash = |value: &Option<String>| match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    };
    let mut lines = vec![
        format!("{} [{}]", c.title, c.status.label()),
        c.description.clone(),
        format!("Category:    {}", c.category),
        format!("Reported by: {}", c.reporter.name),
        format!("Location:    {}", c.location),
        format!("Created:     {}", c.created_at.format("%Y-%m-%d %H:%M")),
    ];
    if let Some(updated) = c.updated_at {
        lines.push(format!("Updated:     {}", updated.format("%Y-%m-%d %H:%M")));
    }
    lines.push(format!("Assigned to: {}", or_dash(&c.assigned_to)));
    lines.push(format!("Resolution:  {}", or_dash(&c.resolution_notes)));
    lines.push(format!("Images:      {}", c.images.len()));
    lines.join("\n")
}

fn complaint_list(complaints: &[Complaint]) -> String {
    if complaints.is_empty() {
        return "No complaints found".to_string();
    }
    complaints
        .iter()
        .map(complaint_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn geojson(render: impl FnOnce(&mut GeoJsonWidget)) -> String {
    let mut widget = GeoJsonWidget::new();
    render(&mut widget);
    serde_json::to_string_pretty(&widget.to_geojson()).unwrap_or_default()
}

/// Run one command against `ctx`.
///
/// A protected command whose credential the backend refuses ends on the login
/// screen. The stored session is left alone; only `logout` clears it.
pub async fn dispatch(ctx: &ScreenContext, command: Command) -> Result<Output> {
    let current = ctx.session.current();
    let protected = command.route(current.as_ref()).is_some();
    match run(ctx, command, current).await {
        Err(e) if protected && e.kind() == ErrorKind::AuthFailure => {
            debug!(error = %e, "credential refused, redirecting to login");
            Ok(Output::at(
                Route::Login,
                format!(
                    "{}. Run `georesolve login <email>` again.",
                    e.user_message("Session expired")
                ),
            ))
        }
        other => other,
    }
}

async fn run(ctx: &ScreenContext, command: Command, current: Option<Session>) -> Result<Output> {
    if let Some(target) = command.route(current.as_ref()) {
        let access = if target == Route::Landing {
            ctx.session.authorize(None)
        } else {
            match ctx.session.navigate(target) {
                (route, Some(session)) if route == target => Access::Allow(session),
                (route, _) => Access::RedirectTo(route),
            }
        };
        if let Access::RedirectTo(route) = access {
            debug!(to = %route, "command redirected");
            return Ok(redirected(route));
        }
    }

    match command {
        Command::Login { email, password } => {
            let route = LoginForm { email, password }.submit(ctx).await?;
            Ok(Output::at(route, format!("Logged in; home is {route}")))
        }
        Command::Register {
            name,
            email,
            phone,
            password,
            admin,
        } => {
            let role = if admin { Role::Admin } else { Role::Citizen };
            let form = RegisterForm {
                name,
                email,
                phone,
                password,
                role,
            };
            let route = form.submit(ctx).await?;
            Ok(Output::at(route, format!("Registered as {role}; home is {route}")))
        }
        Command::Logout => {
            let route = auth::logout(ctx)?;
            Ok(Output::at(route, "Logged out"))
        }
        Command::Whoami => {
            let user = auth::whoami(ctx).await?;
            Ok(Output::at(
                Route::Landing,
                format!("{} <{}> ({})", user.name, user.email, user.role),
            ))
        }
        Command::Dashboard { geojson: as_geojson } => match current.map(|s| s.role()) {
            Some(Role::Admin) => {
                let mut screen = AdminDashboard::new();
                screen.load(ctx).await?;
                if as_geojson {
                    return Ok(Output::at(
                        Route::AdminDashboard,
                        geojson(|w| screen.render_map(w)),
                    ));
                }
                let stats = screen.stats().unwrap_or_default();
                let body = format!(
                    "Total: {}  Pending: {}  In Progress: {}  Resolved: {}  Resolution rate: {:.1}%\n\nRecent complaints:\n{}",
                    stats.total,
                    stats.pending,
                    stats.in_progress,
                    stats.resolved,
                    screen.resolution_rate().unwrap_or_default(),
                    complaint_list(screen.recent(5)),
                );
                Ok(Output::at(Route::AdminDashboard, body))
            }
            _ => {
                let mut screen = CitizenDashboard::new();
                screen.load(ctx).await?;
                if as_geojson {
                    return Ok(Output::at(
                        Route::CitizenDashboard,
                        geojson(|w| screen.render_map(w)),
                    ));
                }
                let stats = screen.stats();
                let body = format!(
                    "Total: {}  Pending: {}  In Progress: {}  Resolved: {}\nMap centre: {}\n\n{}",
                    stats.total,
                    stats.pending,
                    stats.in_progress,
                    stats.resolved,
                    screen.map().center(),
                    complaint_list(screen.complaints()),
                );
                Ok(Output::at(Route::CitizenDashboard, body))
            }
        },
        Command::Report {
            title,
            description,
            category,
            at,
            images,
        } => {
            let mut form = ReportForm::new();
            match at {
                Some(point) => {
                    form.open_at(ctx, point).await?;
                }
                None => form.open(ctx).await,
            }
            form.title = title;
            form.description = description;
            form.category = category;
            let mut files: Vec<Box<dyn ImageSource>> = Vec::with_capacity(images.len());
            for path in &images {
                match FileImage::open(path).await {
                    Ok(file) => files.push(Box::new(file)),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping image"),
                }
            }
            if !files.is_empty() {
                form.add_images(ctx, &files)
                    .await
                    .map_err(ValidationError::from)?;
            }
            match form.submit(ctx).await {
                Ok(complaint) => Ok(Output::at(
                    ReportForm::AFTER_SUBMIT,
                    format!("Reported {}", complaint_line(&complaint)),
                )),
                Err(crate::screens::ReportError::Rejected(e)) => Err(e),
                Err(crate::screens::ReportError::Invalid(e)) => Err(e.into()),
            }
        }
        Command::History => {
            let mut screen = ComplaintHistory::new();
            screen.load(ctx).await?;
            Ok(Output::at(
                Route::CitizenHistory,
                complaint_list(screen.complaints()),
            ))
        }
        Command::Complaints {
            search,
            status,
            category,
            geojson: as_geojson,
        } => {
            let mut screen = ComplaintManagement::new();
            screen.load(ctx).await?;
            let browser = screen.browser_mut();
            browser.set_text(search);
            browser.set_status(status);
            browser.set_category(CategoryFilter::from(category.as_str()));
            let visible = screen.visible();
            if as_geojson {
                let map = crate::map::ComplaintMap::new();
                return Ok(Output::at(
                    Route::AdminComplaints,
                    geojson(|w| map.render(&visible, w)),
                ));
            }
            let body = format!(
                "{}\n{}",
                screen.browser().summary(),
                complaint_list(&visible)
            );
            Ok(Output::at(Route::AdminComplaints, body))
        }
        Command::Update {
            id,
            status,
            assigned_to,
            notes,
        } => {
            let mut screen = ComplaintManagement::new();
            screen.load(ctx).await?;
            let Some(draft) = screen.open_editor(id) else {
                return Ok(Output::at(
                    Route::AdminComplaints,
                    format!("Complaint {id} not found"),
                ));
            };
            if let Some(status) = status {
                draft.status = status;
            }
            if let Some(assigned_to) = assigned_to {
                draft.assigned_to = assigned_to;
            }
            if let Some(notes) = notes {
                draft.resolution_notes = notes;
            }
            screen.submit_edit(ctx).await?;
            let shown = screen
                .browser()
                .complaints()
                .iter()
                .find(|c| c.id == id)
                .map(complaint_line)
                .unwrap_or_else(|| format!("Complaint {id} updated"));
            Ok(Output::at(Route::AdminComplaints, shown))
        }
        Command::Show { id } => {
            let complaint = ctx.repo.get_complaint(id).await.map_err(|e| {
                ctx.notify_error(&e, "Failed to fetch complaint");
                e
            })?;
            Ok(Output::at(Route::Landing, complaint_detail(&complaint)))
        }
        Command::Nearby { at, radius } => {
            let center = match at {
                Some(point) => point,
                None => ctx
                    .geolocator
                    .current_position()
                    .await
                    .unwrap_or_else(|_| GeoPoint::fallback()),
            };
            let complaints = ctx
                .repo
                .nearby_complaints(center, radius)
                .await
                .map_err(|e| {
                    ctx.notify_error(&e, "Failed to fetch complaints");
                    e
                })?;
            let mut ranked: Vec<_> = complaints
                .iter()
                .map(|c| (distance_m(center, c.location), c))
                .collect();
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
            let listing = if ranked.is_empty() {
                complaint_list(&[])
            } else {
                ranked
                    .iter()
                    .map(|(d, c)| format!("{:>7.0} m  {}", d, complaint_line(c)))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let body = format!("Within {:.0} m of {}:\n{}", radius, center, listing);
            Ok(Output::at(Route::Landing, body))
        }
        Command::Analytics => {
            let mut screen = AnalyticsScreen::new();
            screen.load(ctx).await?;
            let body = screen.report().map(|r| r.to_string()).unwrap_or_default();
            Ok(Output::at(Route::AdminAnalytics, body))
        }
        Command::Categories => {
            let categories = ctx.repo.categories().await.map_err(|e| {
                ctx.notify_error(&e, "Failed to fetch categories");
                e
            })?;
            let body = categories
                .iter()
                .map(|c| format!("{:<18} {}", c.name, c.icon))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Output::at(Route::Landing, body))
        }
    }
}
