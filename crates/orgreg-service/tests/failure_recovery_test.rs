//! Compensation paths of `OrganizationService`, driven through a
//! repository wrapper that hides records or fails selected writes.

use orgreg_auth::config::AuthConfig;
use orgreg_auth::token::validate_access_token;
use orgreg_core::error::{CollectionError, RegistryError, RegistryResult};
use orgreg_core::models::admin::{Admin, CreateAdmin, UpdateAdmin};
use orgreg_core::models::organization::{
    CollectionName, CreateOrganization, Organization, UpdateOrganization,
};
use orgreg_core::repository::{DropOutcome, TenantRepository};
use orgreg_db::SurrealTenantRepository;
use orgreg_service::{CreateOrgInput, LoginInput, OrganizationService, UpdateOrgInput};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

#[derive(Default, Clone, Copy)]
struct Faults {
    /// `find_admin_by_email` always misses, so only the unique index
    /// catches a duplicate email.
    hide_admin_emails: bool,
    fail_update_admin: bool,
    fail_update_org: bool,
}

struct FaultyRepository {
    inner: SurrealTenantRepository<Db>,
    faults: Faults,
}

fn injected() -> RegistryError {
    RegistryError::Internal("injected write failure".into())
}

impl TenantRepository for FaultyRepository {
    async fn find_org_by_name(&self, name: &str) -> RegistryResult<Option<Organization>> {
        self.inner.find_org_by_name(name).await
    }

    async fn find_org_by_id(&self, id: Uuid) -> RegistryResult<Option<Organization>> {
        self.inner.find_org_by_id(id).await
    }

    async fn insert_org(&self, input: CreateOrganization) -> RegistryResult<Organization> {
        self.inner.insert_org(input).await
    }

    async fn update_org(&self, id: Uuid, input: UpdateOrganization) -> RegistryResult<Organization> {
        if self.faults.fail_update_org {
            return Err(injected());
        }
        self.inner.update_org(id, input).await
    }

    async fn delete_org(&self, name: &str) -> RegistryResult<()> {
        self.inner.delete_org(name).await
    }

    async fn find_admin_by_email(&self, email: &str) -> RegistryResult<Option<Admin>> {
        if self.faults.hide_admin_emails {
            return Ok(None);
        }
        self.inner.find_admin_by_email(email).await
    }

    async fn find_admin_by_org(&self, org_id: Uuid) -> RegistryResult<Option<Admin>> {
        self.inner.find_admin_by_org(org_id).await
    }

    async fn insert_admin(&self, input: CreateAdmin) -> RegistryResult<Admin> {
        self.inner.insert_admin(input).await
    }

    async fn update_admin(&self, org_id: Uuid, input: UpdateAdmin) -> RegistryResult<()> {
        if self.faults.fail_update_admin {
            return Err(injected());
        }
        self.inner.update_admin(org_id, input).await
    }

    async fn delete_admin_by_org(&self, org_id: Uuid) -> RegistryResult<()> {
        self.inner.delete_admin_by_org(org_id).await
    }

    async fn create_tenant_collection(
        &self,
        name: &CollectionName,
        seed: serde_json::Value,
    ) -> Result<(), CollectionError> {
        self.inner.create_tenant_collection(name, seed).await
    }

    async fn rename_collection(
        &self,
        from: &CollectionName,
        to: &CollectionName,
    ) -> Result<(), CollectionError> {
        self.inner.rename_collection(from, to).await
    }

    async fn drop_collection(&self, name: &CollectionName) -> Result<DropOutcome, CollectionError> {
        self.inner.drop_collection(name).await
    }

    async fn collection_exists(&self, name: &CollectionName) -> Result<bool, CollectionError> {
        self.inner.collection_exists(name).await
    }
}

fn test_config() -> AuthConfig {
    AuthConfig::with_secret("recovery-test-secret-at-least-32-bytes")
}

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgreg_db::run_migrations(&db).await.unwrap();
    db
}

fn healthy(db: &Surreal<Db>) -> OrganizationService<SurrealTenantRepository<Db>> {
    OrganizationService::new(SurrealTenantRepository::new(db.clone()), test_config())
}

fn faulty(db: &Surreal<Db>, faults: Faults) -> OrganizationService<FaultyRepository> {
    OrganizationService::new(
        FaultyRepository {
            inner: SurrealTenantRepository::new(db.clone()),
            faults,
        },
        test_config(),
    )
}

fn collection(org: &str) -> CollectionName {
    CollectionName::for_organization(org).unwrap()
}

async fn create(db: &Surreal<Db>, name: &str, email: &str, password: &str) {
    healthy(db)
        .create(CreateOrgInput {
            organization_name: name.into(),
            email: email.into(),
            password: password.into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn admin_insert_failure_removes_organization_record() {
    let db = setup().await;
    create(&db, "Acme", "a@acme.io", "pw").await;

    let service = faulty(
        &db,
        Faults {
            hide_admin_emails: true,
            ..Faults::default()
        },
    );
    let result = service
        .create(CreateOrgInput {
            organization_name: "Globex".into(),
            email: "a@acme.io".into(),
            password: "pw".into(),
        })
        .await;
    assert!(matches!(result, Err(RegistryError::DuplicateAdmin { .. })));

    let repo = SurrealTenantRepository::new(db.clone());
    assert!(matches!(
        service.get("Globex").await,
        Err(RegistryError::NotFound { .. })
    ));
    assert!(!repo.collection_exists(&collection("Globex")).await.unwrap());

    // The original organization is untouched.
    let acme = service.get("Acme").await.unwrap();
    assert_eq!(acme.admin_email, "a@acme.io");
}

async fn failed_update_is_reverted(faults: Faults) {
    let db = setup().await;
    create(&db, "Acme", "a@acme.io", "pw1").await;

    let login = healthy(&db)
        .login(LoginInput {
            email: "a@acme.io".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap();
    let claims = validate_access_token(&login.access_token, &test_config()).unwrap();

    let result = faulty(&db, faults)
        .update(
            &claims,
            UpdateOrgInput {
                organization_name: "Acme2".into(),
                email: "b@acme.io".into(),
                password: "pw2".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(RegistryError::Internal(_))));

    let repo = SurrealTenantRepository::new(db.clone());
    assert!(repo.collection_exists(&collection("Acme")).await.unwrap());
    assert!(!repo.collection_exists(&collection("Acme2")).await.unwrap());

    let service = healthy(&db);
    let org = service.get("Acme").await.unwrap();
    assert_eq!(org.collection_name, "org_Acme");
    assert_eq!(org.admin_email, "a@acme.io");

    // The old credentials still work and the aggregate is whole.
    service
        .login(LoginInput {
            email: "a@acme.io".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap();
    let report = service.verify(&claims).await.unwrap();
    assert!(report.consistent, "{:?}", report.violations);
}

#[tokio::test]
async fn organization_write_failure_reverts_rename_and_admin() {
    failed_update_is_reverted(Faults {
        fail_update_org: true,
        ..Faults::default()
    })
    .await;
}

#[tokio::test]
async fn admin_write_failure_reverts_rename() {
    failed_update_is_reverted(Faults {
        fail_update_admin: true,
        ..Faults::default()
    })
    .await;
}
