//! Task record, its create/update payloads, and boundary validation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::ids::{ProjectId, TaskId, UserId};

/// Task progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "not-started" => Ok(TaskStatus::NotStarted),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A unit of work inside a project.
///
/// `dependencies` lists the prerequisites of this task: an edge
/// `dep -> self` in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_image: Option<String>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Completion image, only while the task is completed.
    pub fn completion_image(&self) -> Option<&str> {
        match self.status {
            TaskStatus::Completed => self.completion_image.as_deref(),
            _ => None,
        }
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }

    /// Check the invariants a stored task must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::DateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }
        if self.depends_on(&self.id) {
            return Err(ValidationError::SelfDependency(self.id.clone()));
        }
        Ok(())
    }

    /// Drop dependency ids for which `known` returns false.
    ///
    /// Returns the pruned ids.
    pub fn retain_dependencies(&mut self, known: impl Fn(&TaskId) -> bool) -> Vec<TaskId> {
        let mut pruned = Vec::new();
        self.dependencies.retain(|dep| {
            let keep = known(dep);
            if !keep {
                pruned.push(dep.clone());
            }
            keep
        });
        pruned
    }

    /// Remove `id` from the dependency list. Returns true if it was present.
    pub fn remove_dependency(&mut self, id: &TaskId) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|dep| dep != id);
        self.dependencies.len() != before
    }

    /// Stamp the audit fields for a write by `actor`.
    pub fn touch(&mut self, actor: &UserId, now: DateTime<Utc>) {
        self.updated_by = actor.clone();
        self.updated_at = now;
    }

    /// Apply a partial update, returning the validated result.
    ///
    /// `self` is left untouched when validation fails.
    pub fn patched(&self, patch: &TaskPatch) -> Result<Task, ValidationError> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = non_empty(description);
        }
        if let Some(start) = &patch.start_date {
            next.start_date = parse_date(start)?;
        }
        if let Some(end) = &patch.end_date {
            next.end_date = parse_date(end)?;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(deps) = &patch.dependencies {
            next.dependencies = dedup_preserving_order(deps);
        }
        if let Some(assigned_to) = &patch.assigned_to {
            next.assigned_to = non_empty(assigned_to);
        }
        if let Some(image) = &patch.completion_image {
            next.completion_image = non_empty(image);
        }
        next.validate()?;
        Ok(next)
    }
}

/// Payload for task creation. Dates are ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub completion_image: Option<String>,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, start_date: &str, end_date: &str) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            ..Self::default()
        }
    }

    pub fn depends_on(mut self, deps: &[&TaskId]) -> Self {
        self.dependencies = deps.iter().map(|id| (*id).clone()).collect();
        self
    }

    /// Build a validated task record from this draft.
    pub fn into_task(
        self,
        id: TaskId,
        project_id: ProjectId,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Task, ValidationError> {
        let task = Task {
            id,
            project_id,
            name: self.name.trim().to_string(),
            description: self.description.as_deref().and_then(non_empty),
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            status: self.status,
            dependencies: dedup_preserving_order(&self.dependencies),
            assigned_to: self.assigned_to.as_deref().and_then(non_empty),
            completion_image: self.completion_image.as_deref().and_then(non_empty),
            created_by: actor.clone(),
            updated_by: actor.clone(),
            created_at: now,
            updated_at: now,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Partial task update. `None` leaves a field unchanged; an empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<TaskStatus>,
    pub dependencies: Option<Vec<TaskId>>,
    pub assigned_to: Option<String>,
    pub completion_image: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn dedup_preserving_order(ids: &[TaskId]) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn build(draft: TaskDraft) -> Result<Task, ValidationError> {
        draft.into_task(
            TaskId::new("t1"),
            ProjectId::new("p1"),
            &UserId::new("alice"),
            now(),
        )
    }

    #[test]
    fn draft_builds_trimmed_task() {
        let mut draft = TaskDraft::new("  Design  ", "2024-01-01", "2024-01-05");
        draft.description = Some("   ".into());
        let task = build(draft).unwrap();

        assert_eq!(task.name, "Design");
        assert_eq!(task.description, None);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.created_by, UserId::new("alice"));
        assert_eq!(task.updated_at, now());
    }

    #[test]
    fn same_day_range_is_accepted() {
        assert!(build(TaskDraft::new("x", "2024-03-03", "2024-03-03")).is_ok());
    }

    #[rstest]
    #[case::empty_name(TaskDraft::new("  ", "2024-01-01", "2024-01-02"), ValidationError::EmptyTaskName)]
    #[case::reversed(
        TaskDraft::new("x", "2024-02-01", "2024-01-01"),
        ValidationError::DateRange { start: "2024-02-01".into(), end: "2024-01-01".into() }
    )]
    #[case::bad_date(TaskDraft::new("x", "01/02/2024", "2024-01-03"), ValidationError::InvalidDate("01/02/2024".into()))]
    fn draft_rejects_invalid_input(#[case] draft: TaskDraft, #[case] expected: ValidationError) {
        assert_eq!(build(draft).unwrap_err(), expected);
    }

    #[test]
    fn self_dependency_is_rejected() {
        let own = TaskId::new("t1");
        let draft = TaskDraft::new("x", "2024-01-01", "2024-01-02").depends_on(&[&own]);
        assert_eq!(
            build(draft).unwrap_err(),
            ValidationError::SelfDependency(own)
        );
    }

    #[test]
    fn duplicate_dependencies_collapse() {
        let a = TaskId::new("a");
        let b = TaskId::new("b");
        let draft = TaskDraft::new("x", "2024-01-01", "2024-01-02").depends_on(&[&b, &a, &b]);
        assert_eq!(build(draft).unwrap().dependencies, vec![b, a]);
    }

    #[test]
    fn failed_patch_leaves_task_untouched() {
        let task = build(TaskDraft::new("x", "2024-01-01", "2024-01-02")).unwrap();
        let patch = TaskPatch {
            end_date: Some("2023-12-31".into()),
            ..TaskPatch::default()
        };
        assert!(matches!(
            task.patched(&patch),
            Err(ValidationError::DateRange { .. })
        ));
        assert_eq!(task.end_date.to_string(), "2024-01-02");
    }

    #[test]
    fn patch_clears_optional_fields_with_empty_string() {
        let mut draft = TaskDraft::new("x", "2024-01-01", "2024-01-02");
        draft.assigned_to = Some("bob@example.com".into());
        let task = build(draft).unwrap();

        let patch = TaskPatch {
            assigned_to: Some(String::new()),
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        };
        let next = task.patched(&patch).unwrap();
        assert_eq!(next.assigned_to, None);
        assert_eq!(next.status, TaskStatus::InProgress);
    }

    #[test]
    fn completion_image_only_visible_when_completed() {
        let mut draft = TaskDraft::new("x", "2024-01-01", "2024-01-02");
        draft.completion_image = Some("https://img/1.png".into());
        let mut task = build(draft).unwrap();
        assert_eq!(task.completion_image(), None);

        task.status = TaskStatus::Completed;
        assert_eq!(task.completion_image(), Some("https://img/1.png"));
    }

    #[test]
    fn retain_dependencies_reports_pruned_ids() {
        let a = TaskId::new("a");
        let ghost = TaskId::new("ghost");
        let draft = TaskDraft::new("x", "2024-01-01", "2024-01-02").depends_on(&[&a, &ghost]);
        let mut task = build(draft).unwrap();

        let pruned = task.retain_dependencies(|id| id == &a);
        assert_eq!(pruned, vec![ghost]);
        assert_eq!(task.dependencies, vec![a]);
    }

    #[rstest]
    #[case("not-started", TaskStatus::NotStarted)]
    #[case("in-progress", TaskStatus::InProgress)]
    #[case("completed", TaskStatus::Completed)]
    fn status_parses_wire_strings(#[case] raw: &str, #[case] expected: TaskStatus) {
        assert_eq!(raw.parse::<TaskStatus>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[test]
    fn task_json_uses_wire_shape() {
        let task = build(TaskDraft::new("x", "2024-01-01", "2024-01-02")).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["status"], "not-started");
        assert_eq!(json["projectId"], "p1");
    }
}
