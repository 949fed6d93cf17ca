use crate::modules::alumni::domain::{AlumniRecord, AlumniRepository};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};
use std::cmp::Ordering;
use std::sync::Arc;

/// Directory lookups over the persisted alumni records
#[derive(Clone)]
pub struct AlumniDirectoryService {
    repository: Arc<dyn AlumniRepository>,
}

impl AlumniDirectoryService {
    pub fn new(repository: Arc<dyn AlumniRepository>) -> Self {
        Self { repository }
    }

    /// Exact name matches win; otherwise partial matches ranked by similarity
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<AlumniRecord>> {
        let query = name.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
        }

        let exact = self.repository.find_by_name(query).await?;
        if !exact.is_empty() {
            log_debug!("Found {} exact matches for '{}'", exact.len(), query);
            return Ok(exact);
        }

        let mut partial = self.repository.find_by_partial_name(query).await?;
        partial.sort_by(|a, b| {
            let score_a = strsim::jaro_winkler(query, &a.name);
            let score_b = strsim::jaro_winkler(query, &b.name);
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        log_debug!("Found {} partial matches for '{}'", partial.len(), query);
        Ok(partial)
    }

    /// Best single record for a name, preferring one in the given generation
    pub async fn find_exact_match(
        &self,
        name: &str,
        generation: Option<&str>,
    ) -> AppResult<Option<AlumniRecord>> {
        let query = name.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
        }

        let candidates = self.repository.find_by_name(query).await?;

        let generation = generation.map(str::trim).filter(|g| !g.is_empty());
        if let Some(generation) = generation {
            if let Some(found) = candidates.iter().find(|r| r.generation == generation) {
                return Ok(Some(found.clone()));
            }
        }

        Ok(candidates.into_iter().next())
    }

    /// Link a record to a portal user account
    pub async fn link_user(&self, record_id: i32, user_id: i32) -> AppResult<AlumniRecord> {
        if user_id <= 0 {
            return Err(AppError::InvalidInput(
                "User id must be positive".to_string(),
            ));
        }

        let existing = self
            .repository
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Alumni record {} not found", record_id)))?;

        if let Some(current) = existing.matched_user_id {
            if current != user_id {
                return Err(AppError::Conflict(format!(
                    "Alumni record {} is already linked to user {}",
                    record_id, current
                )));
            }
        }

        let updated = self
            .repository
            .mark_matched(record_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Alumni record {} not found", record_id)))?;

        log_info!("Linked {} to user {}", updated.label(), user_id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::alumni::domain::repository::MockAlumniRepository;
    use chrono::Utc;

    fn record(id: i32, name: &str, generation: &str) -> AlumniRecord {
        AlumniRecord {
            id,
            department: "경영학과".to_string(),
            generation: generation.to_string(),
            name: name.to_string(),
            admission_date: None,
            graduation_date: None,
            graduation_year: None,
            address: None,
            mobile: None,
            phone: None,
            group: None,
            status: None,
            alumni_position: None,
            memo: None,
            is_matched: false,
            matched_user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_exact_matches_skip_partial_lookup() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_name()
            .returning(|_| Ok(vec![record(1, "홍길동", "12")]));
        repo.expect_find_by_partial_name().never();

        let service = AlumniDirectoryService::new(Arc::new(repo));
        let found = service.search_by_name(" 홍길동 ").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[tokio::test]
    async fn test_partial_matches_ranked_by_similarity() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(vec![]));
        repo.expect_find_by_partial_name().returning(|_| {
            Ok(vec![record(2, "김민", "4"), record(1, "김민수정", "3")])
        });

        let service = AlumniDirectoryService::new(Arc::new(repo));
        let found = service.search_by_name("김민수").await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, 1);
        assert_eq!(found[1].id, 2);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let repo = MockAlumniRepository::new();
        let service = AlumniDirectoryService::new(Arc::new(repo));

        let err = service.search_by_name("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_exact_match_prefers_generation() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_name().returning(|_| {
            Ok(vec![record(1, "이영희", "7"), record(2, "이영희", "9")])
        });

        let service = AlumniDirectoryService::new(Arc::new(repo));

        let with_generation = service.find_exact_match("이영희", Some("9")).await.unwrap();
        assert_eq!(with_generation.unwrap().id, 2);

        let unknown_generation = service.find_exact_match("이영희", Some("99")).await.unwrap();
        assert_eq!(unknown_generation.unwrap().id, 1);

        let without_generation = service.find_exact_match("이영희", None).await.unwrap();
        assert_eq!(without_generation.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_link_user_rejects_record_owned_by_other_user() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut existing = record(id, "박지성", "21");
            existing.is_matched = true;
            existing.matched_user_id = Some(5);
            Ok(Some(existing))
        });
        repo.expect_mark_matched().never();

        let service = AlumniDirectoryService::new(Arc::new(repo));
        let err = service.link_user(3, 6).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_link_user_missing_record() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = AlumniDirectoryService::new(Arc::new(repo));
        let err = service.link_user(42, 1).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_link_user_updates_record() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(record(id, "박지성", "21"))));
        repo.expect_mark_matched().returning(|id, user_id| {
            let mut linked = record(id, "박지성", "21");
            linked.is_matched = true;
            linked.matched_user_id = Some(user_id);
            Ok(Some(linked))
        });

        let service = AlumniDirectoryService::new(Arc::new(repo));
        let linked = service.link_user(3, 6).await.unwrap();

        assert!(linked.is_matched);
        assert_eq!(linked.matched_user_id, Some(6));
    }
}
