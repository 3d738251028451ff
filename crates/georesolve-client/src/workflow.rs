//! Status workflow editor.
//!
//! An admin opens the editor on one complaint, edits a working copy of its
//! status, assignee and resolution notes, and submits. Nothing is patched
//! locally: after a successful submit the caller refetches the collection, so
//! the server's version is what the user sees.

use tracing::{info, warn};

use georesolve_shared::protocol::ComplaintUpdate;
use georesolve_shared::{Complaint, ComplaintId, Status, ValidationError};

use crate::api::ComplaintRepository;
use crate::error::Result;

/// Staged edits. Absent assignee or notes start as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    pub status: Status,
    pub assigned_to: String,
    pub resolution_notes: String,
}

impl WorkingCopy {
    pub fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            status: complaint.status,
            assigned_to: complaint.assigned_to.clone().unwrap_or_default(),
            resolution_notes: complaint.resolution_notes.clone().unwrap_or_default(),
        }
    }

    pub fn to_update(&self) -> ComplaintUpdate {
        ComplaintUpdate {
            status: self.status,
            assigned_to: self.assigned_to.clone(),
            resolution_notes: self.resolution_notes.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusEditor {
    open: Option<(ComplaintId, WorkingCopy)>,
}

impl StatusEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn target(&self) -> Option<ComplaintId> {
        self.open.as_ref().map(|(id, _)| *id)
    }

    /// Stage a working copy of `complaint`, replacing any open one.
    pub fn open(&mut self, complaint: &Complaint) -> &mut WorkingCopy {
        let (_, draft) = self
            .open
            .insert((complaint.id, WorkingCopy::from_complaint(complaint)));
        draft
    }

    pub fn draft(&self) -> Option<&WorkingCopy> {
        self.open.as_ref().map(|(_, draft)| draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut WorkingCopy> {
        self.open.as_mut().map(|(_, draft)| draft)
    }

    pub fn cancel(&mut self) {
        self.open = None;
    }

    /// Send the working copy. Closes the editor on success; on failure the
    /// editor and its draft stay as they were.
    pub async fn submit(&mut self, repo: &dyn ComplaintRepository) -> Result<Complaint> {
        let (id, draft) = self
            .open
            .as_ref()
            .ok_or(ValidationError::MissingField("complaint"))?;
        let (id, update) = (*id, draft.to_update());

        match repo.update_complaint(id, &update).await {
            Ok(updated) => {
                info!(complaint_id = %id, status = %updated.status, "complaint updated");
                self.open = None;
                Ok(updated)
            }
            Err(e) => {
                warn!(complaint_id = %id, error = %e, "complaint update failed");
                Err(e)
            }
        }
    }
}
