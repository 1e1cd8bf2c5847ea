//! Workspace catalog use-case service.
//!
//! # Responsibility
//! - Create, rename, list and delete workspaces.
//! - Persist and restore the selected workspace across sessions.
//!
//! # Invariants
//! - Workspace names are trimmed and never blank.
//! - Deleting a workspace removes all of its boards/cards and none of any
//!   other workspace's.
//! - A restored selection always points at an existing workspace.

use crate::model::validation::{normalize_title, ModelValidationError};
use crate::model::workspace::{Workspace, WorkspaceId};
use crate::repo::slice_repo::{CascadeReport, SliceRepository};
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::service::workspace_session::{SessionError, WorkspaceImpact, WorkspaceSession};
use crate::store::StoreError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from workspace catalog operations.
#[derive(Debug)]
pub enum WorkspaceServiceError {
    /// Name is blank after trim.
    Validation(ModelValidationError),
    /// Workspace id is not in the catalog.
    WorkspaceNotFound(WorkspaceId),
    /// Working-set failure while switching or cascading.
    Session(SessionError),
    /// Store transport failure.
    Store(StoreError),
}

impl Display for WorkspaceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::WorkspaceNotFound(id) => write!(f, "workspace not found: {id}"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkspaceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::WorkspaceNotFound(_) => None,
            Self::Session(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for WorkspaceServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SessionError> for WorkspaceServiceError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StoreError> for WorkspaceServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace catalog facade.
pub struct WorkspaceService<W: WorkspaceRepository> {
    repo: W,
}

impl<W: WorkspaceRepository> WorkspaceService<W> {
    pub fn new(repo: W) -> Self {
        Self { repo }
    }

    /// Lists workspaces by `order`, then `id`.
    pub fn list_workspaces(&self) -> WorkspaceServiceResult<Vec<Workspace>> {
        let mut workspaces = self.repo.list_workspaces()?;
        workspaces.sort_by_key(|workspace| (workspace.order, workspace.id));
        Ok(workspaces)
    }

    pub fn get_workspace(&self, id: WorkspaceId) -> WorkspaceServiceResult<Option<Workspace>> {
        Ok(self
            .repo
            .list_workspaces()?
            .into_iter()
            .find(|workspace| workspace.id == id))
    }

    /// Creates a workspace with the next free id, ranked last.
    pub fn create_workspace(&self, name: &str) -> WorkspaceServiceResult<Workspace> {
        let name = normalize_title(name)?;
        let mut workspaces = self.repo.list_workspaces()?;
        let workspace = Workspace {
            id: workspaces.iter().map(|w| w.id).max().unwrap_or(0) + 1,
            name,
            order: workspaces.len() as i64 + 1,
        };
        workspaces.push(workspace.clone());
        self.repo.save_workspaces(&workspaces)?;
        info!(
            "event=workspace_create module=service status=ok workspace={}",
            workspace.id
        );
        Ok(workspace)
    }

    pub fn rename_workspace(
        &self,
        id: WorkspaceId,
        name: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let name = normalize_title(name)?;
        let mut workspaces = self.repo.list_workspaces()?;
        let workspace = workspaces
            .iter_mut()
            .find(|workspace| workspace.id == id)
            .ok_or(WorkspaceServiceError::WorkspaceNotFound(id))?;
        workspace.name = name;
        let renamed = workspace.clone();
        self.repo.save_workspaces(&workspaces)?;
        Ok(renamed)
    }

    /// Board/card counts of one workspace, for confirmation gating.
    pub fn workspace_impact<R: SliceRepository>(
        &self,
        id: WorkspaceId,
        session: &WorkspaceSession<R>,
    ) -> WorkspaceServiceResult<WorkspaceImpact> {
        self.require_workspace(id)?;
        Ok(session.workspace_impact(id)?)
    }

    /// Deletes a workspace record and every board/card stored under it.
    ///
    /// Clears the persisted selection when it pointed at this workspace.
    pub fn delete_workspace<R: SliceRepository>(
        &self,
        id: WorkspaceId,
        session: &mut WorkspaceSession<R>,
    ) -> WorkspaceServiceResult<CascadeReport> {
        let mut workspaces = self.repo.list_workspaces()?;
        let before = workspaces.len();
        workspaces.retain(|workspace| workspace.id != id);
        if workspaces.len() == before {
            return Err(WorkspaceServiceError::WorkspaceNotFound(id));
        }

        self.repo.save_workspaces(&workspaces)?;
        let report = session.delete_workspace_cascade(id)?;
        if self.repo.selected_workspace()? == Some(id) {
            self.repo.set_selected_workspace(None)?;
        }
        info!(
            "event=workspace_delete module=service status=ok workspace={id} boards_removed={} cards_removed={}",
            report.boards_removed, report.cards_removed
        );
        Ok(report)
    }

    /// Persists the selection. `None` clears it.
    pub fn select_workspace(&self, id: Option<WorkspaceId>) -> WorkspaceServiceResult<()> {
        if let Some(id) = id {
            self.require_workspace(id)?;
        }
        self.repo.set_selected_workspace(id)?;
        Ok(())
    }

    /// Returns the persisted selection if it still exists.
    pub fn selected_workspace(&self) -> WorkspaceServiceResult<Option<Workspace>> {
        match self.repo.selected_workspace()? {
            Some(id) => self.get_workspace(id),
            None => Ok(None),
        }
    }

    /// Selects `id` and switches `session` to it.
    pub fn open_workspace<R: SliceRepository>(
        &self,
        id: WorkspaceId,
        session: &mut WorkspaceSession<R>,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace = self.require_workspace(id)?;
        session.switch_workspace(id)?;
        self.repo.set_selected_workspace(Some(id))?;
        Ok(workspace)
    }

    /// Reopens the last selected workspace in `session`, if any.
    pub fn restore_selected<R: SliceRepository>(
        &self,
        session: &mut WorkspaceSession<R>,
    ) -> WorkspaceServiceResult<Option<Workspace>> {
        let Some(workspace) = self.selected_workspace()? else {
            return Ok(None);
        };
        session.switch_workspace(workspace.id)?;
        Ok(Some(workspace))
    }

    fn require_workspace(&self, id: WorkspaceId) -> WorkspaceServiceResult<Workspace> {
        self.get_workspace(id)?
            .ok_or(WorkspaceServiceError::WorkspaceNotFound(id))
    }
}
