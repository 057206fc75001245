//! Organization lifecycle service.
//!
//! Per organization: `NONEXISTENT -> ACTIVE -> (RENAMING) -> ACTIVE ->
//! DELETED`. Every transition is a single synchronous call; nothing runs
//! in the background.

use orgreg_auth::config::AuthConfig;
use orgreg_auth::error::AuthError;
use orgreg_auth::token::ValidatedClaims;
use orgreg_auth::{password, token};
use orgreg_core::error::{RegistryError, RegistryResult};
use orgreg_core::models::admin::{Admin, CreateAdmin, UpdateAdmin};
use orgreg_core::models::organization::{
    COLLECTION_PREFIX, CollectionName, CreateOrganization, UpdateOrganization,
};
use orgreg_core::repository::{DropOutcome, TenantRepository};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    ConsistencyReport, CreateOrgInput, DeleteOutput, LoginInput, LoginOutput, OrganizationView,
    UpdateOrgInput, Violation,
};

/// Document stored in every freshly created tenant collection.
fn seed_document() -> serde_json::Value {
    json!({ "type": "config", "msg": "Organization initialized" })
}

/// Tenant lifecycle service.
///
/// Generic over the repository implementation so that lifecycle rules
/// have no dependency on the database crate.
pub struct OrganizationService<R: TenantRepository> {
    repo: R,
    config: AuthConfig,
}

impl<R: TenantRepository> OrganizationService<R> {
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn hash(&self, password: &str) -> RegistryResult<String> {
        Ok(password::hash_password(
            password,
            self.config.pepper.as_deref(),
        )?)
    }

    /// Register an organization, its admin and its tenant collection.
    ///
    /// Metadata is written before the collection so that a crash leaves
    /// an inspectable record rather than an untracked collection.
    pub async fn create(&self, input: CreateOrgInput) -> RegistryResult<OrganizationView> {
        let collection = CollectionName::for_organization(&input.organization_name)?;

        if self
            .repo
            .find_org_by_name(&input.organization_name)
            .await?
            .is_some()
        {
            return Err(RegistryError::DuplicateOrganization {
                name: input.organization_name,
            });
        }
        if self.repo.find_admin_by_email(&input.email).await?.is_some() {
            return Err(RegistryError::DuplicateAdmin { email: input.email });
        }

        let password_hash = self.hash(&input.password)?;

        let org = self
            .repo
            .insert_org(CreateOrganization {
                organization_name: input.organization_name.clone(),
                collection_name: collection.to_string(),
                admin_email: input.email.clone(),
            })
            .await?;

        let admin = self
            .repo
            .insert_admin(CreateAdmin {
                email: input.email.clone(),
                password_hash,
                org_id: org.id,
                org_name: org.organization_name.clone(),
            })
            .await;
        if let Err(err) = admin {
            // Lost a race on the admin email; don't leave an admin-less org.
            warn!(org_id = %org.id, error = %err, "Admin insert failed, removing organization record");
            if let Err(cleanup) = self.repo.delete_org(&org.organization_name).await {
                warn!(org_id = %org.id, error = %cleanup, "Failed to remove orphaned organization record");
            }
            return Err(err);
        }

        self.repo
            .create_tenant_collection(&collection, seed_document())
            .await?;

        info!(
            org_id = %org.id,
            organization = %org.organization_name,
            collection = %collection,
            "Organization created"
        );

        Ok(OrganizationView {
            organization_name: org.organization_name,
            collection_name: org.collection_name,
            admin_email: org.admin_email,
            message: "Organization created successfully".into(),
        })
    }

    /// Fetch the public view of an organization by name.
    pub async fn get(&self, organization_name: &str) -> RegistryResult<OrganizationView> {
        let org = self
            .repo
            .find_org_by_name(organization_name)
            .await?
            .ok_or_else(|| RegistryError::organization_not_found(organization_name))?;

        debug!(org_id = %org.id, "Organization fetched");

        Ok(OrganizationView {
            organization_name: org.organization_name,
            collection_name: org.collection_name,
            admin_email: org.admin_email,
            message: "Details fetched".into(),
        })
    }

    /// Authenticate an admin and issue an access token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> RegistryResult<LoginOutput> {
        let admin = self
            .repo
            .find_admin_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = password::verify_password(
            &input.password,
            &admin.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_access_token(
            admin.id,
            &admin.email,
            admin.org_id,
            &admin.org_name,
            &self.config,
        )?;

        info!(admin_id = %admin.id, org_id = %admin.org_id, "Admin logged in");

        Ok(LoginOutput {
            access_token,
            token_type: "bearer".into(),
            org_id: admin.org_id,
        })
    }

    /// Rename the caller's organization and replace its admin
    /// credentials.
    ///
    /// The physical collection is renamed before any record is touched;
    /// if the rename fails nothing is written and `RenameFailed` is
    /// returned. If a record write fails after the rename, the rename and
    /// any admin change are reverted before the error is returned.
    pub async fn update(
        &self,
        claims: &ValidatedClaims,
        input: UpdateOrgInput,
    ) -> RegistryResult<OrganizationView> {
        let org_id = claims.org_id()?;
        let current = self
            .repo
            .find_org_by_id(org_id)
            .await?
            .ok_or_else(|| RegistryError::organization_not_found(org_id.to_string()))?;

        let new_name = input.organization_name;
        let new_collection = CollectionName::for_organization(&new_name)?;
        let renaming = new_name != current.organization_name;

        if renaming && self.repo.find_org_by_name(&new_name).await?.is_some() {
            return Err(RegistryError::DuplicateOrganization { name: new_name });
        }
        if let Some(owner) = self.repo.find_admin_by_email(&input.email).await? {
            if owner.org_id != org_id {
                return Err(RegistryError::DuplicateAdmin { email: input.email });
            }
        }

        let previous_admin = self.repo.find_admin_by_org(org_id).await?;

        // Hash first: a failure here must not leave a renamed collection.
        let password_hash = self.hash(&input.password)?;

        let renamed = if renaming {
            let old_collection = CollectionName::parse(&current.collection_name)?;
            self.repo
                .rename_collection(&old_collection, &new_collection)
                .await
                .map_err(|e| RegistryError::RenameFailed {
                    from: old_collection.to_string(),
                    to: new_collection.to_string(),
                    reason: e.to_string(),
                })?;
            info!(
                org_id = %org_id,
                from = %old_collection,
                to = %new_collection,
                "Tenant collection renamed"
            );
            Some((old_collection, new_collection.clone()))
        } else {
            None
        };

        let admin_update = self
            .repo
            .update_admin(
                org_id,
                UpdateAdmin {
                    email: Some(input.email.clone()),
                    password_hash: Some(password_hash),
                    org_name: Some(new_name.clone()),
                },
            )
            .await;
        if let Err(err) = admin_update {
            self.undo_rename(org_id, renamed.as_ref()).await;
            return Err(err);
        }

        let org_update = self
            .repo
            .update_org(
                org_id,
                UpdateOrganization {
                    organization_name: Some(new_name),
                    collection_name: Some(new_collection.to_string()),
                    admin_email: Some(input.email),
                },
            )
            .await;
        let org = match org_update {
            Ok(org) => org,
            Err(err) => {
                if let Some(admin) = previous_admin {
                    self.restore_admin(admin).await;
                }
                self.undo_rename(org_id, renamed.as_ref()).await;
                return Err(err);
            }
        };

        info!(org_id = %org_id, organization = %org.organization_name, "Organization updated");

        Ok(OrganizationView {
            organization_name: org.organization_name,
            collection_name: org.collection_name,
            admin_email: org.admin_email,
            message: "Organization updated and data migrated".into(),
        })
    }

    /// Move a renamed collection back after a later step of an update
    /// failed. Best effort; `verify` reports whatever is left behind.
    async fn undo_rename(&self, org_id: Uuid, renamed: Option<&(CollectionName, CollectionName)>) {
        let Some((old_collection, new_collection)) = renamed else {
            return;
        };
        match self
            .repo
            .rename_collection(new_collection, old_collection)
            .await
        {
            Ok(()) => info!(
                org_id = %org_id,
                collection = %old_collection,
                "Tenant collection rename reverted"
            ),
            Err(err) => warn!(
                org_id = %org_id,
                from = %new_collection,
                to = %old_collection,
                error = %err,
                "Failed to revert tenant collection rename"
            ),
        }
    }

    async fn restore_admin(&self, admin: Admin) {
        let org_id = admin.org_id;
        let restored = self
            .repo
            .update_admin(
                org_id,
                UpdateAdmin {
                    email: Some(admin.email),
                    password_hash: Some(admin.password_hash),
                    org_name: Some(admin.org_name),
                },
            )
            .await;
        if let Err(err) = restored {
            warn!(org_id = %org_id, error = %err, "Failed to restore admin record");
        }
    }

    /// Delete an organization, its admin and its tenant collection.
    ///
    /// Authorization uses the organization name carried in the token,
    /// not the current name in storage.
    pub async fn delete(
        &self,
        claims: &ValidatedClaims,
        organization_name: &str,
    ) -> RegistryResult<DeleteOutput> {
        if claims.org_name() != organization_name {
            return Err(RegistryError::Forbidden {
                reason: "Not authorized to delete this organization".into(),
            });
        }

        let org = self
            .repo
            .find_org_by_name(organization_name)
            .await?
            .ok_or_else(|| RegistryError::organization_not_found(organization_name))?;

        // Drop failures never fail the delete; a missing collection is the
        // expected leftover of an earlier partial delete.
        match CollectionName::parse(&org.collection_name) {
            Ok(collection) => match self.repo.drop_collection(&collection).await {
                Ok(DropOutcome::Dropped) => {
                    debug!(collection = %collection, "Tenant collection dropped");
                }
                Ok(DropOutcome::NotPresent) => {
                    info!(collection = %collection, "Tenant collection already absent");
                }
                Err(err) => {
                    warn!(collection = %collection, error = %err, "Failed to drop tenant collection");
                }
            },
            Err(err) => {
                warn!(org_id = %org.id, error = %err, "Skipping drop of unrecognised collection name");
            }
        }

        self.repo.delete_org(organization_name).await?;
        self.repo.delete_admin_by_org(org.id).await?;

        info!(org_id = %org.id, organization = %organization_name, "Organization deleted");

        Ok(DeleteOutput {
            message: format!("Organization {organization_name} and its data deleted"),
        })
    }

    /// Check the caller's aggregate for invariant violations left by a
    /// partial failure or an interleaved update. Read-only.
    pub async fn verify(&self, claims: &ValidatedClaims) -> RegistryResult<ConsistencyReport> {
        let org_id = claims.org_id()?;
        let org = self
            .repo
            .find_org_by_id(org_id)
            .await?
            .ok_or_else(|| RegistryError::organization_not_found(org_id.to_string()))?;

        let mut violations = Vec::new();

        let expected = format!("{COLLECTION_PREFIX}{}", org.organization_name);
        if org.collection_name != expected {
            violations.push(Violation::CollectionNameMismatch {
                expected,
                actual: org.collection_name.clone(),
            });
        }

        match self.repo.find_admin_by_org(org_id).await? {
            None => violations.push(Violation::AdminMissing),
            Some(admin) if admin.org_name != org.organization_name => {
                violations.push(Violation::AdminOrgNameMismatch {
                    expected: org.organization_name.clone(),
                    actual: admin.org_name,
                });
            }
            Some(_) => {}
        }

        let present = match CollectionName::parse(&org.collection_name) {
            Ok(collection) => self.repo.collection_exists(&collection).await?,
            Err(_) => false,
        };
        if !present {
            violations.push(Violation::CollectionMissing {
                collection_name: org.collection_name.clone(),
            });
        }

        if !violations.is_empty() {
            warn!(org_id = %org_id, violations = violations.len(), "Organization aggregate is inconsistent");
        }

        Ok(ConsistencyReport {
            organization_name: org.organization_name,
            consistent: violations.is_empty(),
            violations,
        })
    }
}
