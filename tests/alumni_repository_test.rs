/// Alumni repository tests - database operations
///
/// Require `TEST_DATABASE_URL`; each test returns early when it is unset.
mod utils;

use alumni_lib::modules::alumni::{AlumniRepository, AlumniRepositoryImpl};
use utils::db;
use utils::factories::new_record;

macro_rules! test_repo {
    ($guard:ident, $repo:ident) => {
        let Some(database) = db::get_test_database() else {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return;
        };
        let $guard = db::acquire_test_lock();
        db::clean_test_db(&database);
        let $repo = AlumniRepositoryImpl::new(database);
    };
}

#[tokio::test]
async fn insert_starts_unmatched() {
    test_repo!(_guard, repo);

    let inserted = repo
        .insert(new_record("홍길동", "12", Some("010-1234-5678")))
        .await
        .unwrap();

    assert!(inserted.id > 0);
    assert!(!inserted.is_matched);
    assert_eq!(inserted.matched_user_id, None);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn find_by_mobile_is_exact() {
    test_repo!(_guard, repo);
    repo.insert(new_record("홍길동", "12", Some("010-1234-5678")))
        .await
        .unwrap();

    let found = repo.find_by_mobile("010-1234-5678").await.unwrap();
    assert_eq!(found.unwrap().name, "홍길동");

    assert!(repo.find_by_mobile("010-1234-567").await.unwrap().is_none());
}

#[tokio::test]
async fn name_lookups() {
    test_repo!(_guard, repo);
    repo.insert(new_record("김민수", "3", Some("010-1"))).await.unwrap();
    repo.insert(new_record("김민수", "1", Some("010-2"))).await.unwrap();
    repo.insert(new_record("김민", "4", Some("010-3"))).await.unwrap();

    let exact = repo.find_by_name("김민수").await.unwrap();
    assert_eq!(exact.len(), 2);
    assert_eq!(exact[0].generation, "1");

    // Containment works in both directions
    let partial = repo.find_by_partial_name("김민수").await.unwrap();
    assert_eq!(partial.len(), 3);

    let partial = repo.find_by_partial_name("민").await.unwrap();
    assert_eq!(partial.len(), 3);
}

#[tokio::test]
async fn mark_matched_links_user() {
    test_repo!(_guard, repo);
    let record = repo
        .insert(new_record("박지성", "21", Some("010-21")))
        .await
        .unwrap();

    let linked = repo.mark_matched(record.id, 7).await.unwrap().unwrap();
    assert!(linked.is_matched);
    assert_eq!(linked.matched_user_id, Some(7));
    assert!(linked.updated_at >= record.updated_at);

    assert!(repo.mark_matched(record.id + 1000, 7).await.unwrap().is_none());
}
