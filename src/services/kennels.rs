//! Kennel inventory service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::KennelStatus,
        kennel::{
            group_into_sets, CreateKennelSet, ExtendKennelSet, Kennel, KennelSet, UpdateKennelSet,
            MAINTENANCE_SET,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct KennelsService {
    repository: Repository,
}

impl KennelsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All kennels grouped into sets
    pub async fn list_sets(&self) -> AppResult<Vec<KennelSet>> {
        let kennels = self.repository.kennels.list().await?;
        Ok(group_into_sets(kennels))
    }

    pub async fn list_by_status(&self, status: KennelStatus) -> AppResult<Vec<Kennel>> {
        self.repository.kennels.list_by_status(status).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Kennel> {
        self.repository.kennels.get_by_id(id).await
    }

    /// Create a new named set of sequentially numbered kennels
    pub async fn create_set(&self, data: CreateKennelSet) -> AppResult<Vec<Kennel>> {
        data.validate()?;
        let set_name = managed_set_name(&data.set_name)?;

        if self.repository.kennels.set_exists(set_name).await? {
            return Err(AppError::Conflict(format!("Set '{}' already exists", set_name)));
        }

        let kennels = self.repository.kennels.create_set(set_name, data.count).await?;
        tracing::info!("Created set '{}' with {} kennels", set_name, kennels.len());
        Ok(kennels)
    }

    /// Append kennels to an existing set
    pub async fn extend_set(&self, set_name: &str, data: ExtendKennelSet) -> AppResult<Vec<Kennel>> {
        data.validate()?;
        let set_name = managed_set_name(set_name)?;
        let kennels = self.repository.kennels.extend_set(set_name, data.count).await?;
        tracing::info!("Added {} kennels to set '{}'", kennels.len(), set_name);
        Ok(kennels)
    }

    /// Move kennels into the set or retire them to Maintenance
    pub async fn update_set(&self, set_name: &str, data: UpdateKennelSet) -> AppResult<KennelSet> {
        let set_name = managed_set_name(set_name)?;
        if data.add_kennel_ids.is_empty() && data.remove_kennel_ids.is_empty() {
            return Err(AppError::Validation("No kennels to add or remove".to_string()));
        }
        if data
            .add_kennel_ids
            .iter()
            .any(|id| data.remove_kennel_ids.contains(id))
        {
            return Err(AppError::Validation("A kennel cannot be both added and removed".to_string()));
        }
        if !self.repository.kennels.set_exists(set_name).await? {
            return Err(AppError::NotFound(format!("Set '{}' not found", set_name)));
        }

        let kennels = self
            .repository
            .kennels
            .update_set_membership(set_name, &data.add_kennel_ids, &data.remove_kennel_ids)
            .await?;

        // Removing every kennel leaves the set empty
        Ok(group_into_sets(kennels)
            .into_iter()
            .next()
            .unwrap_or_else(|| KennelSet {
                set_name: set_name.to_string(),
                kennels: Vec::new(),
                available: 0,
                total: 0,
            }))
    }

    /// Manually move a kennel in or out of maintenance
    pub async fn update_status(&self, id: i32, status: KennelStatus) -> AppResult<Kennel> {
        if status.is_engaged() {
            return Err(AppError::Validation(
                "Only available and maintenance can be set manually".to_string(),
            ));
        }
        let kennel = self.repository.kennels.update_status(id, status).await?;
        tracing::info!("Kennel {} set to {}", id, status);
        Ok(kennel)
    }
}

fn normalize_set_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Set name is required".to_string()));
    }
    Ok(trimmed)
}

/// Set name staff may create or edit; Maintenance only receives retired kennels
fn managed_set_name(name: &str) -> AppResult<&str> {
    let set_name = normalize_set_name(name)?;
    if set_name.eq_ignore_ascii_case(MAINTENANCE_SET) {
        return Err(AppError::Validation(format!("'{}' is a reserved set name", MAINTENANCE_SET)));
    }
    Ok(set_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_set_name() {
        assert_eq!(normalize_set_name("  Row A ").unwrap(), "Row A");
        assert!(matches!(normalize_set_name("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_maintenance_is_not_a_managed_set() {
        assert_eq!(managed_set_name(" Row A").unwrap(), "Row A");
        assert!(matches!(managed_set_name("Maintenance"), Err(AppError::Validation(_))));
        assert!(matches!(managed_set_name("  maintenance "), Err(AppError::Validation(_))));
        assert!(matches!(managed_set_name(""), Err(AppError::Validation(_))));
    }
}
