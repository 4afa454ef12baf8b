use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::admin::store::{
    AdminStore, AdminWithUser, CompanyAccount, CompanyWithAdmin, ProvisionedCompany,
};
use validator::Validate;

use crate::auth::service::hash_password;
use crate::errors::AppError;
use crate::models::admin::AdminRow;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyAccountRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[validate(length(min = 2, message = "Company name must be at least 2 characters."))]
    pub company_name: String,
}

impl CompanyAccountRequest {
    fn normalized(self) -> Self {
        CompanyAccountRequest {
            email: self.email.trim().to_string(),
            password: self.password,
            company_name: self.company_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 2, message = "Full name must be at least 2 characters."))]
    pub full_name: String,
}

impl AdminRequest {
    fn normalized(self) -> Self {
        AdminRequest {
            email: self.email.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub companies: Vec<CompanyWithAdmin>,
    pub admins: Vec<AdminWithUser>,
}

/// Admin operations. Every entry point checks the caller's admin row
/// before touching anything else.
pub struct AdminConsole {
    store: Arc<dyn AdminStore>,
    bcrypt_cost: u32,
}

impl AdminConsole {
    pub fn new(store: Arc<dyn AdminStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    async fn require_admin(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.store.is_platform_admin(user_id).await? {
            Ok(())
        } else {
            warn!("Non-admin {user_id} refused access to admin console");
            Err(AppError::Forbidden)
        }
    }

    pub async fn overview(&self, caller: Uuid) -> Result<AdminOverview, AppError> {
        self.require_admin(caller).await?;
        Ok(AdminOverview {
            companies: self.store.companies_with_admins().await?,
            admins: self.store.admins_with_users().await?,
        })
    }

    pub async fn provision_company(
        &self,
        caller: Uuid,
        req: CompanyAccountRequest,
    ) -> Result<ProvisionedCompany, AppError> {
        self.require_admin(caller).await?;
        let req = req.normalized();
        req.validate()?;

        let password_hash = hash_password(&req.password, self.bcrypt_cost).await?;
        self.store
            .provision_company(CompanyAccount {
                email: req.email,
                password_hash,
                company_name: req.company_name,
            })
            .await
    }

    pub async fn provision_admin(
        &self,
        caller: Uuid,
        req: AdminRequest,
    ) -> Result<AdminRow, AppError> {
        self.require_admin(caller).await?;
        let req = req.normalized();
        req.validate()?;

        self.store.provision_admin(&req.email, &req.full_name).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::auth::User;
    use crate::models::profile::NewProfile;
    use crate::test_support::{company, profile};

    #[derive(Default)]
    struct CountingAdminStore {
        admins: Mutex<HashSet<Uuid>>,
        data_reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl CountingAdminStore {
        fn with_admin(user_id: Uuid) -> Self {
            let store = Self::default();
            store.admins.lock().unwrap().insert(user_id);
            store
        }
    }

    #[async_trait]
    impl AdminStore for CountingAdminStore {
        async fn is_platform_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
            Ok(self.admins.lock().unwrap().contains(&user_id))
        }

        async fn companies_with_admins(&self) -> Result<Vec<CompanyWithAdmin>, AppError> {
            self.data_reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![CompanyWithAdmin {
                company: company("Acme", None),
                admin: None,
            }])
        }

        async fn admins_with_users(&self) -> Result<Vec<AdminWithUser>, AppError> {
            self.data_reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn provision_company(
            &self,
            account: CompanyAccount,
        ) -> Result<ProvisionedCompany, AppError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let user = User {
                id: Uuid::new_v4(),
                email: account.email.clone(),
                full_name: Some(format!("{} Admin", account.company_name)),
            };
            let mut c = company(&account.company_name, None);
            c.admin_id = Some(user.id);
            let p = profile(NewProfile {
                id: user.id,
                email: account.email,
                full_name: format!("{} Admin", account.company_name),
                anonymous_name: None,
            });
            Ok(ProvisionedCompany {
                user,
                company: c,
                profile: p,
            })
        }

        async fn provision_admin(
            &self,
            _email: &str,
            _full_name: &str,
        ) -> Result<AdminRow, AppError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let user_id = Uuid::new_v4();
            self.admins.lock().unwrap().insert(user_id);
            Ok(AdminRow {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                user_id,
            })
        }
    }

    #[tokio::test]
    async fn test_non_admin_gets_forbidden_and_no_data() {
        let store = Arc::new(CountingAdminStore::default());
        let console = AdminConsole::new(store.clone(), 4);

        let result = console.overview(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
        assert_eq!(store.data_reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_admin_sees_overview() {
        let caller = Uuid::new_v4();
        let store = Arc::new(CountingAdminStore::with_admin(caller));
        let console = AdminConsole::new(store.clone(), 4);

        let overview = console.overview(caller).await.unwrap();
        assert_eq!(overview.companies.len(), 1);
        assert_eq!(store.data_reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_provision() {
        let store = Arc::new(CountingAdminStore::default());
        let console = AdminConsole::new(store.clone(), 4);
        let outsider = Uuid::new_v4();

        let company = console
            .provision_company(
                outsider,
                CompanyAccountRequest {
                    email: "hr@acme.io".into(),
                    password: "s3cretpass".into(),
                    company_name: "Acme".into(),
                },
            )
            .await;
        let admin = console
            .provision_admin(
                outsider,
                AdminRequest {
                    email: "ops@acme.io".into(),
                    full_name: "Ops Person".into(),
                },
            )
            .await;

        assert!(matches!(company, Err(AppError::Forbidden)));
        assert!(matches!(admin, Err(AppError::Forbidden)));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provision_company_validates_before_writing() {
        let caller = Uuid::new_v4();
        let store = Arc::new(CountingAdminStore::with_admin(caller));
        let console = AdminConsole::new(store.clone(), 4);

        let short_password = console
            .provision_company(
                caller,
                CompanyAccountRequest {
                    email: "hr@acme.io".into(),
                    password: "short".into(),
                    company_name: "Acme".into(),
                },
            )
            .await;
        assert!(matches!(short_password, Err(AppError::Validation(_))));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);

        let provisioned = console
            .provision_company(
                caller,
                CompanyAccountRequest {
                    email: " hr@acme.io ".into(),
                    password: "long enough".into(),
                    company_name: " Acme ".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(provisioned.company.name, "Acme");
        assert_eq!(provisioned.company.admin_id, Some(provisioned.user.id));
        assert_eq!(provisioned.profile.full_name, "Acme Admin");
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provision_admin_grants_rights() {
        let caller = Uuid::new_v4();
        let store = Arc::new(CountingAdminStore::with_admin(caller));
        let console = AdminConsole::new(store.clone(), 4);

        let bad_email = console
            .provision_admin(
                caller,
                AdminRequest {
                    email: "ops at acme".into(),
                    full_name: "Ops Person".into(),
                },
            )
            .await;
        assert!(
            matches!(&bad_email, Err(AppError::Validation(msg)) if msg == "Please enter a valid email address.")
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);

        let row = console
            .provision_admin(
                caller,
                AdminRequest {
                    email: "ops@acme.io".into(),
                    full_name: "Ops Person".into(),
                },
            )
            .await
            .unwrap();
        assert!(store.is_platform_admin(row.user_id).await.unwrap());
    }
}
