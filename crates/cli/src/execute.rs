//! crates/cli/src/execute.rs
//!
//! Runs a parsed subcommand against the ACL backend.

use std::io::{self, Write};
use std::path::Path;

use guard::CallerContext;
use logging::targets;
use nfs4::{AccountDirectory, AclBackend};
use permissions::Role;
use reconcile::{AclError, MutationOutcome, ProjectAcl, RoleAssignment};

use crate::arguments::{Action, LockAction};
use crate::exit;
use crate::render;
use crate::settings::Settings;

/// Exit status for a failed reconciler call.
pub(crate) const fn exit_code_for(error: &AclError) -> i32 {
    if error.is_lock_held() {
        exit::LOCK_HELD
    } else if error.is_validation() {
        exit::USAGE
    } else {
        exit::FAILURE
    }
}

/// Shared state of one invocation.
pub(crate) struct Executor<'a, B, A> {
    pub(crate) settings: &'a Settings,
    pub(crate) backend: &'a B,
    pub(crate) accounts: &'a A,
    pub(crate) caller: &'a CallerContext,
}

impl<B: AclBackend, A: AccountDirectory> Executor<'_, B, A> {
    fn project(&self, id: &str) -> ProjectAcl<&B, &A> {
        ProjectAcl::new(
            self.settings.project_root(id),
            self.backend,
            self.accounts,
            self.caller.clone(),
        )
        .with_config(self.settings.acl_config())
    }

    /// Executes `action` and returns the process exit status.
    pub(crate) fn execute<Out: Write, Err: Write>(
        &self,
        action: Action,
        stdout: &mut Out,
        stderr: &mut Err,
    ) -> i32 {
        let outcome = match action {
            Action::Get {
                project,
                path,
                recursive,
                json,
            } => self.get(&project, &path, recursive, json, stdout, stderr),
            Action::Set {
                project,
                path,
                assignment,
                recursive,
                force,
            } => self.set(&project, &path, &assignment, recursive, force, stderr),
            Action::Delete {
                users,
                projects,
                roles,
            } => self.delete(users, &projects, &roles, stderr),
            Action::Lock { project, action } => self.lock(&project, action, stdout, stderr),
        };

        outcome.unwrap_or_else(|err| {
            let _ = writeln!(stderr, "prjacl: cannot write output: {err}");
            exit::FAILURE
        })
    }

    fn get<Out: Write, Err: Write>(
        &self,
        project: &str,
        path: &Path,
        recursive: bool,
        json: bool,
        stdout: &mut Out,
        stderr: &mut Err,
    ) -> io::Result<i32> {
        let report = self.project(project).get_roles(path, recursive);
        if json {
            render::write_roles_json(stdout, &report)?;
        } else {
            render::write_roles_text(stdout, &report)?;
        }

        for (path, error) in report.failures() {
            writeln!(stderr, "prjacl: {}: {error}", path.display())?;
        }
        Ok(if report.has_failures() {
            exit::FAILURE
        } else {
            exit::SUCCESS
        })
    }

    fn set<Err: Write>(
        &self,
        project: &str,
        path: &Path,
        assignment: &RoleAssignment,
        recursive: bool,
        force: bool,
        stderr: &mut Err,
    ) -> io::Result<i32> {
        match self
            .project(project)
            .set_roles(path, assignment, recursive, force)
        {
            Ok(MutationOutcome::Applied { path, acl }) => {
                tracing::info!(
                    target: targets::ACL,
                    "applied {} ACEs to {}",
                    acl.len(),
                    path.display()
                );
                Ok(exit::SUCCESS)
            }
            Ok(MutationOutcome::NothingToDo) => Ok(exit::SUCCESS),
            Err(err) => {
                writeln!(stderr, "prjacl: {err}")?;
                Ok(exit_code_for(&err))
            }
        }
    }

    fn delete<Err: Write>(
        &self,
        mut users: Vec<String>,
        projects: &[String],
        roles: &[Role],
        stderr: &mut Err,
    ) -> io::Result<i32> {
        if users.iter().any(|user| *user == self.caller.identity) {
            tracing::warn!(
                target: targets::ROLE,
                "not removing {} from their own projects",
                self.caller.identity
            );
            users.retain(|user| *user != self.caller.identity);
        }
        if users.is_empty() {
            tracing::warn!(target: targets::ROLE, "no users to remove");
            return Ok(exit::SUCCESS);
        }

        let roles = (!roles.is_empty()).then_some(roles);
        let names = users.join(",");
        let mut status = exit::SUCCESS;
        for id in projects {
            let root = self.settings.project_root(id);
            if !root.exists() {
                tracing::warn!(
                    target: targets::ACL,
                    "skip project {id}: {} does not exist",
                    root.display()
                );
                continue;
            }

            match self.project(id).delete_users(&users, roles) {
                Ok(_) => {
                    tracing::info!(target: targets::ACL, "remove {names} from project {id}");
                }
                Err(err) => {
                    writeln!(stderr, "prjacl: fail to remove {names} from project {id}: {err}")?;
                    status = status.max(exit_code_for(&err).max(exit::FAILURE));
                }
            }
        }
        Ok(status)
    }

    fn lock<Out: Write, Err: Write>(
        &self,
        project: &str,
        action: LockAction,
        stdout: &mut Out,
        stderr: &mut Err,
    ) -> io::Result<i32> {
        let root = self.settings.project_root(project);
        match action {
            LockAction::Status { json } => {
                match guard::inspect(&root, self.settings.stale_after) {
                    Ok(status) if json => render::write_lock_json(stdout, status.as_ref())?,
                    Ok(status) => render::write_lock_text(stdout, project, status.as_ref())?,
                    Err(err) => {
                        writeln!(stderr, "prjacl: {err}")?;
                        return Ok(exit::FAILURE);
                    }
                }
                Ok(exit::SUCCESS)
            }
            LockAction::Clear => match guard::clear(&root) {
                Ok(true) => {
                    writeln!(stdout, "{project}: lock removed")?;
                    Ok(exit::SUCCESS)
                }
                Ok(false) => {
                    writeln!(stdout, "{project}: not locked")?;
                    Ok(exit::SUCCESS)
                }
                Err(err) => {
                    writeln!(stderr, "prjacl: {err}")?;
                    Ok(exit::FAILURE)
                }
            },
        }
    }
}
