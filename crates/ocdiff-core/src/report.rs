//! Text and JSON rendering of a [`DiffReport`]

use std::fmt::Write;

use serde::Serialize;

use crate::diff::{DiffReport, NodeInfo, NodeUpdateInfo};
use crate::model::Entry;

/// Line layout of the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// One line per change, for consoles and logs.
    #[default]
    Plain,
    /// Inline code paths and bullet lines, for GitHub comments.
    GithubComment,
}

/// Options controlling what a report contains and how it is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Only changes not covered by a version bump; additions are dropped.
    pub disallowed_incompats_only: bool,
    pub style: ReportStyle,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disallowed_incompats_only(mut self) -> Self {
        self.disallowed_incompats_only = true;
        self
    }

    pub fn with_github_comment_style(mut self) -> Self {
        self.style = ReportStyle::GithubComment;
        self
    }

    fn keeps(&self, allow_incompat: bool) -> bool {
        !self.disallowed_incompats_only || !allow_incompat
    }
}

fn is_leafy(entry: &Entry) -> bool {
    entry.is_leaf() || entry.is_leaf_list()
}

fn node_type_desc(entry: &Entry) -> &'static str {
    if is_leafy(entry) { "leaf" } else { "non-leaf" }
}

fn write_change(out: &mut String, style: ReportStyle, node_type: &str, action: &str, path: &str, desc: &str) {
    let _ = match style {
        ReportStyle::Plain => writeln!(out, "{} {}: {} ({})", node_type, action, path, desc),
        ReportStyle::GithubComment => {
            write!(out, "{} {}: `{}`\n* ({})\n\n", node_type, action, path, desc)
        }
    };
}

fn write_update(out: &mut String, style: ReportStyle, upd: &NodeUpdateInfo) {
    let node_type = node_type_desc(&upd.old_entry);
    let desc = upd.version_change.to_string();
    let _ = match style {
        ReportStyle::Plain => writeln!(
            out,
            "{} updated: {}: {} ({})",
            node_type,
            upd.path,
            upd.incompat_comments.join("\n\t"),
            desc
        ),
        ReportStyle::GithubComment => write!(
            out,
            "{} updated: `{}`\n* {}\n* ({})\n\n",
            node_type,
            upd.path,
            upd.incompat_comments.join("\n* "),
            desc
        ),
    };
}

impl DiffReport {
    /// Render the report. Sorts the node lists in place; nothing else changes.
    pub fn report(&mut self, options: &ReportOptions) -> String {
        self.sort();
        let mut out = String::new();

        for del in &self.deleted_nodes {
            if options.keeps(del.allow_incompat) && is_leafy(&del.entry) {
                write_change(&mut out, options.style, "leaf", "deleted", &del.path, &del.version_change.to_string());
            }
        }

        for upd in &self.updated_nodes {
            if !options.keeps(upd.allow_incompat) {
                continue;
            }
            write_update(&mut out, options.style, upd);
        }

        if !options.disallowed_incompats_only {
            for added in &self.new_nodes {
                if is_leafy(&added.entry) {
                    write_change(&mut out, options.style, "leaf", "added", &added.path, &added.version_change.to_string());
                }
            }
        }

        out
    }

    /// Every change, plain style.
    pub fn report_all(&mut self) -> String {
        self.report(&ReportOptions::new())
    }

    /// Backward-incompatible changes not covered by version increments, plain style.
    pub fn report_disallowed_incompats(&mut self) -> String {
        self.report(&ReportOptions::new().with_disallowed_incompats_only())
    }

    /// Structured form of the same selection [`report`](Self::report) prints.
    pub fn summary(&mut self, options: &ReportOptions) -> DiffSummary {
        self.sort();
        let mut changes = Vec::new();

        for del in &self.deleted_nodes {
            if options.keeps(del.allow_incompat) && is_leafy(&del.entry) {
                changes.push(ChangeRecord::from_node(ChangeAction::Deleted, del));
            }
        }
        for upd in &self.updated_nodes {
            if options.keeps(upd.allow_incompat) {
                changes.push(ChangeRecord::from_update(upd));
            }
        }
        if !options.disallowed_incompats_only {
            for added in &self.new_nodes {
                if is_leafy(&added.entry) {
                    changes.push(ChangeRecord::from_node(ChangeAction::Added, added));
                }
            }
        }

        DiffSummary {
            disallowed_incompats_only: options.disallowed_incompats_only,
            changes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Added,
    Deleted,
    Updated,
}

/// One reported change in machine-readable form.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub action: ChangeAction,
    pub path: String,
    pub node_type: &'static str,
    pub module: String,
    pub old_version: Option<String>,
    pub new_version: Option<String>,
    pub allow_incompat: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl ChangeRecord {
    fn from_node(action: ChangeAction, node: &NodeInfo) -> Self {
        ChangeRecord {
            action,
            path: node.path.clone(),
            node_type: node_type_desc(&node.entry),
            module: node.version_change.module.clone(),
            old_version: node.version_change.old.as_ref().map(|v| v.to_string()),
            new_version: node.version_change.new.as_ref().map(|v| v.to_string()),
            allow_incompat: node.allow_incompat,
            comments: Vec::new(),
        }
    }

    fn from_update(upd: &NodeUpdateInfo) -> Self {
        ChangeRecord {
            action: ChangeAction::Updated,
            path: upd.path.clone(),
            node_type: node_type_desc(&upd.old_entry),
            module: upd.version_change.module.clone(),
            old_version: upd.version_change.old.as_ref().map(|v| v.to_string()),
            new_version: upd.version_change.new.as_ref().map(|v| v.to_string()),
            allow_incompat: upd.allow_incompat,
            comments: upd.incompat_comments.clone(),
        }
    }
}

/// Serializable report.
#[derive(Debug, Clone, Serialize)]
pub struct DiffSummary {
    pub disallowed_incompats_only: bool,
    pub changes: Vec<ChangeRecord>,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
