//! crates/reconcile/src/project.rs
//!
//! Role reporting and role assignment on one project directory.

use std::path::{Path, PathBuf};

use guard::CallerContext;
use logging::{targets, trace_acl, trace_role};
use nfs4::{
    AccountDirectory, Ace, AceFlags, AceType, AclBackend, Nfs4Acl, WriteMode, WriteOptions,
};
use permissions::{Permission, PermissionSet, Role, infer_role, permissions_for};
use walk::WalkBuilder;

use crate::assignment::RoleAssignment;
use crate::config::AclConfig;
use crate::curate::curate;
use crate::error::{AclError, AclResult};
use crate::report::{MutationOutcome, PathRoles, RolesReport};

/// Roles whose entries [`ProjectAcl::delete_users`] removes by default.
pub const DEFAULT_DELETE_ROLES: [Role; 3] = [Role::Admin, Role::Contributor, Role::User];

/// User name and inferred role of an allow entry for a regular user.
fn user_role(ace: &Ace) -> Option<(&str, Role)> {
    if ace.ace_type != AceType::Allow || ace.principal.is_special() {
        return None;
    }
    let user = ace.principal.name();
    let role = infer_role(ace.mask);
    trace_role!("user {user}: permission {}, role {role}", ace.mask);
    Some((user, role))
}

/// The ACL of one project, read and written through an [`AclBackend`].
///
/// Every mutation is serialised by the project's lock marker and every
/// written list passes through [`curate`] first, except deletion entries.
pub struct ProjectAcl<B, A> {
    root: PathBuf,
    backend: B,
    accounts: A,
    config: AclConfig,
    caller: CallerContext,
}

impl<B: AclBackend, A: AccountDirectory> ProjectAcl<B, A> {
    /// Manages the project rooted at `root` on behalf of `caller`.
    pub fn new(root: impl Into<PathBuf>, backend: B, accounts: A, caller: CallerContext) -> Self {
        Self {
            root: root.into(),
            backend,
            accounts,
            config: AclConfig::default(),
            caller,
        }
    }

    /// Replaces the default configuration.
    #[must_use]
    pub fn with_config(mut self, config: AclConfig) -> Self {
        self.config = config;
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in use.
    pub const fn config(&self) -> &AclConfig {
        &self.config
    }

    /// The ACL backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    fn read(&self, path: &Path) -> AclResult<Nfs4Acl> {
        tracing::debug!(target: targets::ACL, "get ACL of {} ...", path.display());
        self.backend
            .read_acl(path)
            .map_err(|source| AclError::AclReadFailed {
                path: path.to_path_buf(),
                source,
            })
    }

    fn roles_at(&self, path: &Path) -> AclResult<RoleAssignment> {
        let acl = self.read(path)?;
        let mut roles = RoleAssignment::with_all_roles();
        for (user, role) in acl.iter().filter_map(user_role) {
            roles.insert(role, user);
        }
        Ok(roles)
    }

    /// Reports users per role at `relative`, and below it if `recursive`.
    ///
    /// Only allow entries of regular users count. A path that cannot be
    /// read or listed is reported as failed without stopping the walk.
    pub fn get_roles(&self, relative: &Path, recursive: bool) -> RolesReport {
        let target = self.resolve(relative);
        let mut report = RolesReport::default();

        if !recursive {
            let outcome = self.roles_at(&target);
            report.paths.push(PathRoles {
                path: target,
                outcome,
            });
            return report;
        }

        let walker = match WalkBuilder::new(&target).skip_name(guard::MARKER).build() {
            Ok(walker) => walker,
            Err(source) => {
                tracing::warn!(target: targets::WALK, "{source}");
                report.paths.push(PathRoles {
                    path: target,
                    outcome: Err(AclError::ListFailed { source }),
                });
                return report;
            }
        };

        for item in walker {
            let entry = match item {
                Ok(entry) => PathRoles {
                    outcome: self.roles_at(entry.path()),
                    path: entry.path().to_path_buf(),
                },
                Err(source) => {
                    let path = source.path().to_path_buf();
                    let error = AclError::ListFailed { source };
                    tracing::warn!(target: targets::WALK, "{error}");
                    PathRoles {
                        path,
                        outcome: Err(error),
                    }
                }
            };
            report.paths.push(entry);
        }
        report
    }

    /// Gives the users of `assignment` their roles at `relative`.
    ///
    /// Unless `force` is set, users who already hold the requested role are
    /// left alone. Every other requested user loses all of their current
    /// entries and gets one inheritable allow entry for the new role, placed
    /// before all retained entries. The result is written in replace mode,
    /// recursively if asked, under the project lock.
    pub fn set_roles(
        &self,
        relative: &Path,
        assignment: &RoleAssignment,
        recursive: bool,
        force: bool,
    ) -> AclResult<MutationOutcome> {
        assignment.validate()?;
        let path = self.resolve(relative);
        let current = self.read(&path)?;

        let mut request = assignment.clone();
        if !force {
            for (user, role) in current.iter().filter_map(user_role) {
                if request.remove(role, user) {
                    tracing::warn!(
                        target: targets::ROLE,
                        "skip redundant role setting: {user} -> {role}"
                    );
                }
            }
        }

        if request.is_empty() {
            tracing::warn!(target: targets::ACL, "nothing to do for {}", path.display());
            return Ok(MutationOutcome::NothingToDo);
        }

        let requested = request.all_users();
        let mut aces = Vec::new();
        for (role, users) in request.iter() {
            if users.is_empty() {
                continue;
            }
            tracing::info!(target: targets::ROLE, "setting {role} permission ...");
            let allow = permissions_for(role).allow;
            for user in users {
                aces.push(Ace::new(
                    AceType::Allow,
                    AceFlags::from_raw(AceFlags::INHERIT),
                    self.config.principal(user),
                    allow,
                ));
            }
        }
        aces.extend(
            current
                .into_iter()
                .filter(|ace| !requested.contains(ace.principal.name())),
        );

        let acl = curate(aces.into_iter().collect(), &self.accounts);
        let options = WriteOptions {
            recursive,
            mode: WriteMode::Replace,
        };
        self.apply(&path, acl, options)
    }

    /// Removes the entries of `users` from the whole project.
    ///
    /// With `roles`, only entries shaped like those roles go; without, every
    /// entry of the users goes along with the shapes of
    /// [`DEFAULT_DELETE_ROLES`]. Both the inheritable and the plain file
    /// variant of each shape are removed, recursively, under the project lock.
    /// Deletion entries are not curated, so leftovers of removed accounts can
    /// be cleaned up.
    pub fn delete_users<S: AsRef<str>>(
        &self,
        users: &[S],
        roles: Option<&[Role]>,
    ) -> AclResult<MutationOutcome> {
        if users.is_empty() {
            return Ok(MutationOutcome::NothingToDo);
        }

        let restricted = roles.filter(|roles| !roles.is_empty());
        let targeted = restricted.unwrap_or(&DEFAULT_DELETE_ROLES);
        let plain = |mask: PermissionSet| mask.without(Permission::DeleteChild);

        let mut shapes: Vec<PermissionSet> = Vec::new();
        let mut entries: Vec<Ace> = Vec::new();
        for user in users {
            let user = user.as_ref();
            for role in targeted {
                let mask = permissions_for(*role);
                let principal = self.config.principal(user);
                let inherit = AceFlags::from_raw(AceFlags::INHERIT);
                let none = AceFlags::default();
                for (ace_type, flags, bits) in [
                    (AceType::Deny, inherit, mask.deny),
                    (AceType::Allow, inherit, mask.allow),
                    (AceType::Deny, none, plain(mask.deny)),
                    (AceType::Allow, none, plain(mask.allow)),
                ] {
                    shapes.push(bits);
                    if !bits.is_empty() {
                        entries.push(Ace::new(ace_type, flags, principal.clone(), bits));
                    }
                }
            }
        }

        let current = self.read(&self.root)?;
        let names: Vec<&str> = users.iter().map(AsRef::as_ref).collect();
        for ace in current {
            if ace.principal.is_special() || !names.contains(&ace.principal.name()) {
                continue;
            }
            if restricted.is_none() || shapes.contains(&ace.mask) {
                entries.push(ace);
            }
        }

        let mut acl = Nfs4Acl::new();
        for ace in entries {
            if !acl.aces.contains(&ace) {
                trace_acl!("delete ACE: {ace}");
                acl.aces.push(ace);
            }
        }

        let root = self.root.clone();
        self.apply(&root, acl, WriteOptions::recursive(WriteMode::Remove))
    }

    fn apply(
        &self,
        path: &Path,
        acl: Nfs4Acl,
        options: WriteOptions,
    ) -> AclResult<MutationOutcome> {
        let pending: Vec<String> = acl.iter().map(ToString::to_string).collect();
        for line in &pending {
            trace_acl!("new ACE: {line}");
        }

        guard::with_lock(&self.root, &self.caller, &pending, || {
            self.backend
                .write_acl(path, &acl, options)
                .map_err(|source| AclError::AclWriteFailed {
                    path: path.to_path_buf(),
                    source,
                })
        })?;

        Ok(MutationOutcome::Applied {
            path: path.to_path_buf(),
            acl,
        })
    }
}
