//! `logissue` (alias `issue`): report an error or warning against the run.

use crate::context::ExecutionContext;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::{Command, Issue, IssueType};

const NAME: &str = "logissue";

const TYPE: &str = "type";
const SOURCE_PATH: &str = "sourcepath";
const LINE_NUMBER: &str = "linenumber";
const COLUMN_NUMBER: &str = "columnnumber";
const CODE: &str = "code";
const REPO: &str = "repo";

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: NAME,
    aliases: &["issue"],
    allowed_in_restricted_mode: true,
};

pub struct IssueCommand;

impl WorkerCommand for IssueCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let Some(issue_type) = command.property(TYPE) else {
            scope
                .context
                .warning("can't create an issue from a logissue command without a type");
            return Ok(());
        };

        let issue = create_issue(&*scope.context, issue_type, command)?;
        scope.context.report_issue(issue);
        Ok(())
    }
}

fn create_issue(
    context: &dyn ExecutionContext,
    issue_type_text: &str,
    command: &Command,
) -> Result<Issue> {
    let issue_type = IssueType::parse(issue_type_text).ok_or_else(|| CommandError::InvalidValue {
        command: NAME,
        property: TYPE,
        reason: format!("'{issue_type_text}' is not an expected issue type"),
    })?;

    let mut data = command.properties.clone();
    let mut message = command.data.clone().unwrap_or_default();
    let mut category = "General";

    if let Some(source_path) = command.property(SOURCE_PATH) {
        category = "Code";

        let host_path = context.translate_to_host_path(source_path);
        data.insert(
            SOURCE_PATH.to_string(),
            host_path.to_string_lossy().into_owned(),
        );

        if let Some(extension) = context.job_extension() {
            let resolved = extension.convert_local_path(&host_path);
            if let Some(repo) = resolved.repo_name.filter(|r| !r.is_empty()) {
                data.insert(REPO.to_string(), repo);
            }
            if let Some(relative) = resolved.relative_path.filter(|r| !r.is_empty()) {
                data.insert(SOURCE_PATH.to_string(), relative);
            }
        }

        // e.g. src/main.rs(13,18): error E0308: mismatched types
        let slot = |key: &str| data.get(key).map_or("", String::as_str);
        message = format!(
            "{}({},{}): {} {}: {}",
            slot(SOURCE_PATH),
            slot(LINE_NUMBER),
            slot(COLUMN_NUMBER),
            slot(TYPE),
            slot(CODE),
            message
        );
    }

    Ok(Issue {
        issue_type,
        category: category.to_string(),
        message,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::commands::test_support::execute;
    use crate::context::{MemoryContext, PathMapping, Repository, RepositoryMap};

    fn ctx_with_repo() -> MemoryContext {
        let mut ctx = MemoryContext::new();
        ctx.path_mappings.push(PathMapping {
            container: PathBuf::from("/__w"),
            host: PathBuf::from("/agent/_work"),
        });
        ctx.repositories = Some(RepositoryMap::new(vec![Repository {
            name: "widgets".into(),
            path: PathBuf::from("/agent/_work/1/s"),
        }]));
        ctx
    }

    #[test]
    fn general_issue() {
        let mut ctx = MemoryContext::new();
        let cmd = Command::new("issue")
            .with_property(TYPE, "Warning")
            .with_data("disk almost full");
        execute(&IssueCommand, &mut ctx, &cmd).unwrap();

        let issue = &ctx.issues[0];
        assert_eq!(issue.issue_type, IssueType::Warning);
        assert_eq!(issue.category, "General");
        assert_eq!(issue.message, "disk almost full");
        assert_eq!(issue.data.get(TYPE).map(String::as_str), Some("Warning"));
    }

    #[test]
    fn missing_type_warns_without_issue() {
        let mut ctx = MemoryContext::new();
        execute(&IssueCommand, &mut ctx, &Command::new(NAME).with_data("x")).unwrap();
        assert!(ctx.issues.is_empty());
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn unexpected_type_fails() {
        let mut ctx = MemoryContext::new();
        let cmd = Command::new(NAME).with_property(TYPE, "notice");
        let err = execute(&IssueCommand, &mut ctx, &cmd).unwrap_err();
        assert!(matches!(err, CommandError::InvalidValue { property: TYPE, .. }));
        assert!(ctx.issues.is_empty());
    }

    #[test]
    fn code_issue_resolves_repository() {
        let mut ctx = ctx_with_repo();
        let cmd = Command::new(NAME)
            .with_property(TYPE, "error")
            .with_property(SOURCE_PATH, "/__w/1/s/src/lib.rs")
            .with_property(LINE_NUMBER, "13")
            .with_property(COLUMN_NUMBER, "18")
            .with_property(CODE, "E0308")
            .with_data("mismatched types");
        execute(&IssueCommand, &mut ctx, &cmd).unwrap();

        let issue = &ctx.issues[0];
        assert_eq!(issue.issue_type, IssueType::Error);
        assert_eq!(issue.category, "Code");
        assert_eq!(issue.data.get(REPO).map(String::as_str), Some("widgets"));
        assert_eq!(
            issue.data.get(SOURCE_PATH).map(String::as_str),
            Some("src/lib.rs")
        );
        assert_eq!(
            issue.message,
            "src/lib.rs(13,18): error E0308: mismatched types"
        );
    }

    #[test]
    fn code_issue_renders_missing_slots_empty() {
        let mut ctx = MemoryContext::new();
        let cmd = Command::new(NAME)
            .with_property(TYPE, "warning")
            .with_property(SOURCE_PATH, "/tmp/a.rs")
            .with_data("unused");
        execute(&IssueCommand, &mut ctx, &cmd).unwrap();

        let issue = &ctx.issues[0];
        assert_eq!(issue.category, "Code");
        assert!(!issue.data.contains_key(REPO));
        assert_eq!(issue.message, "/tmp/a.rs(,): warning : unused");
    }

    #[test]
    fn path_outside_repository_keeps_host_path() {
        let mut ctx = ctx_with_repo();
        let cmd = Command::new(NAME)
            .with_property(TYPE, "error")
            .with_property(SOURCE_PATH, "/__w/_temp/gen.rs");
        execute(&IssueCommand, &mut ctx, &cmd).unwrap();

        let issue = &ctx.issues[0];
        assert_eq!(
            issue.data.get(SOURCE_PATH).map(String::as_str),
            Some("/agent/_work/_temp/gen.rs")
        );
        assert!(!issue.data.contains_key(REPO));
    }
}
