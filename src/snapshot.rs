use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directory::{unique_departments, unique_roles};
use crate::model::*;

/// Immutable in-memory copy of what the staff/task API returned. The
/// scheduling engine only ever reads from it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub staff: Vec<StaffMember>,
    pub tasks: Vec<Task>,
    departments: Vec<String>,
    roles: Vec<String>,
}

impl Snapshot {
    pub fn new(staff: Vec<StaffMember>, tasks: Vec<Task>, departments: Vec<String>, roles: Vec<String>) -> Self {
        Self {
            staff,
            tasks,
            departments,
            roles,
        }
    }

    /// Department names from the API, or the distinct departments of the
    /// staff list when the API list is empty.
    pub fn departments(&self) -> Vec<&str> {
        if self.departments.is_empty() {
            unique_departments(&self.staff)
        } else {
            self.departments.iter().map(String::as_str).collect()
        }
    }

    pub fn roles(&self) -> Vec<&str> {
        if self.roles.is_empty() {
            unique_roles(&self.staff)
        } else {
            self.roles.iter().map(String::as_str).collect()
        }
    }

    pub fn staff_member(&self, id: &StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|m| &m.id == id)
    }

    /// Tasks of one staff member on one date, in snapshot order.
    pub fn tasks_for(&self, staff_id: &StaffId, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.belongs_to(staff_id, date)).collect()
    }
}

/// Body of `POST /tasks`. Fields a form may leave empty are optional so the
/// draft can be checked before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub staff_id: Option<StaffId>,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Loading ───────────────────────────────────────────────────────

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            LoadError::Parse { path, source } => write!(f, "parsing {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// One method per read endpoint of the staff/task API.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// `GET /staff`
    async fn staff(&self) -> Result<Vec<StaffMember>, LoadError>;
    /// `GET /tasks`
    async fn tasks(&self) -> Result<Vec<Task>, LoadError>;
    /// `GET /staff/departments`
    async fn departments(&self) -> Result<Vec<String>, LoadError>;
    /// `GET /staff/roles`
    async fn roles(&self) -> Result<Vec<String>, LoadError>;
}

/// Fetch all four collections concurrently and freeze them.
pub async fn load_snapshot(source: &dyn SnapshotSource) -> Result<Snapshot, LoadError> {
    let (staff, tasks, departments, roles) =
        futures::try_join!(source.staff(), source.tasks(), source.departments(), source.roles())?;
    debug!(
        staff = staff.len(),
        tasks = tasks.len(),
        departments = departments.len(),
        roles = roles.len(),
        "snapshot loaded"
    );
    Ok(Snapshot::new(staff, tasks, departments, roles))
}

/// Reads API responses saved as JSON files in one directory:
/// `staff.json`, `tasks.json`, and optionally `departments.json` / `roles.json`.
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T, LoadError> {
        let path = self.dir.join(file);
        let bytes = tokio::fs::read(&path).await.map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse { path, source })
    }

    async fn read_names(&self, file: &str) -> Result<Vec<String>, LoadError> {
        match self.read::<NameList>(file).await {
            Ok(list) => Ok(list.into_names()),
            Err(LoadError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SnapshotSource for JsonDirSource {
    async fn staff(&self) -> Result<Vec<StaffMember>, LoadError> {
        self.read("staff.json").await
    }

    async fn tasks(&self) -> Result<Vec<Task>, LoadError> {
        self.read("tasks.json").await
    }

    async fn departments(&self) -> Result<Vec<String>, LoadError> {
        self.read_names("departments.json").await
    }

    async fn roles(&self) -> Result<Vec<String>, LoadError> {
        self.read_names("roles.json").await
    }
}

/// The list endpoints answer either with a bare array or wrapped, e.g.
/// `{ "department": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Plain(Vec<String>),
    Departments {
        #[serde(alias = "departments")]
        department: Vec<String>,
    },
    Roles {
        #[serde(alias = "roles")]
        role: Vec<String>,
    },
}

impl NameList {
    fn into_names(self) -> Vec<String> {
        match self {
            NameList::Plain(names)
            | NameList::Departments { department: names }
            | NameList::Roles { role: names } => names,
        }
    }
}
