use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use services::{AppServices, Clock, ProgressError, ProgressService, UserLocks};
use storage::repository::{
    InMemoryRepository, Storage, StorageError, UserDocumentRepository, UserSummaryRecord,
};
use vocab_core::model::{
    PageRequest, PageRequestError, UserDocument, UserInfo, Username, Vocabulary, WordRecord,
};
use vocab_core::time::{FIXED_TEST_TIMESTAMP, fixed_now};

fn page(page: i64, size: i64) -> PageRequest {
    PageRequest::new(page, size).unwrap()
}

async fn services_with(words: &str) -> AppServices {
    let services = AppServices::from_storage(
        &Storage::in_memory(),
        Vocabulary::parse(words),
        Clock::fixed(fixed_now()),
    );
    services.accounts().login("alice").await.unwrap();
    services
}

#[tokio::test]
async fn learn_scenario_pages_through_three_words() {
    let services = services_with("apple\nbanana\ncherry\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();

    let first = session.learn_page(page(1, 2)).await.unwrap();
    assert_eq!(first.words, vec!["apple", "banana"]);
    assert_eq!((first.total_pages, first.current_page), (2, 1));
    assert_eq!(session.learn_position(), 0);

    let second = session.learn_page(page(2, 2)).await.unwrap();
    assert_eq!(second.words, vec!["cherry"]);
    assert_eq!((second.total_pages, second.current_page), (2, 2));
    assert_eq!(session.learn_position(), 2);

    let third = session.learn_page(page(3, 2)).await.unwrap();
    assert!(third.words.is_empty());
    assert!(third.completed);
    assert_eq!(session.learn_position(), 2);

    // A fresh session for the same user resumes from the stored cursor.
    let mut resumed = services.progress().session();
    resumed.set_active_user("alice").await.unwrap();
    let again = resumed.learn_page(page(0, 2)).await.unwrap();
    assert_eq!(again.current_page, 2);
    assert_eq!(again.words, vec!["cherry"]);
}

#[tokio::test]
async fn review_scenario_orders_by_mistakes_then_last_seen() {
    let repo = InMemoryRepository::new();
    let alice = Username::parse("alice").unwrap();
    let words = BTreeMap::from([
        ("apple".to_owned(), WordRecord::from_persisted(3, 0, 50)),
        ("banana".to_owned(), WordRecord::from_persisted(3, 0, 100)),
        ("cherry".to_owned(), WordRecord::from_persisted(1, 0, 10)),
        ("date".to_owned(), WordRecord::new()),
    ]);
    repo.save_document(&UserDocument::from_parts(
        UserInfo::new(alice, FIXED_TEST_TIMESTAMP),
        words,
    ))
    .await
    .unwrap();

    let progress = ProgressService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo),
        Arc::new(UserLocks::new()),
    );
    let mut session = progress.session();
    session.set_active_user("alice").await.unwrap();

    let listing = session.all_review_words().unwrap();
    let words: Vec<_> = listing.review_words.iter().map(|e| e.word.as_str()).collect();
    assert_eq!(words, vec!["apple", "banana", "cherry"]);
    assert_eq!(listing.total_review, 3);

    let served = session.review_page(page(1, 20)).await.unwrap();
    assert_eq!(served.review_words, listing.review_words);
    assert_eq!(served.total_pages, 1);
}

#[tokio::test]
async fn review_pages_rewind_after_final_page_and_listing_is_idempotent() {
    let services = services_with("a1\na2\na3\na4\na5\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();
    session
        .update_mistakes_batch(&["a1", "a2", "a3", "a4", "a5"])
        .await
        .unwrap();

    let first = session.review_page(page(1, 2)).await.unwrap();
    assert_eq!(first.review_words.len(), 2);
    assert_eq!(first.total_pages, 3);
    assert_eq!(session.review_position(), 0);

    let second = session.review_page(page(2, 2)).await.unwrap();
    assert_eq!(second.progress.as_ref().unwrap().current_position, 2);
    assert_eq!(session.review_position(), 2);

    // Page 1 with a stored cursor resumes at the cursor's page.
    let resumed = session.review_page(page(1, 2)).await.unwrap();
    assert_eq!(resumed.current_page, 2);

    let last = session.review_page(page(3, 2)).await.unwrap();
    assert_eq!(last.review_words.len(), 1);
    assert_eq!(session.review_position(), 0);

    let before = session.review_position();
    let a = session.all_review_words().unwrap();
    let b = session.all_review_words().unwrap();
    assert_eq!(a, b);
    assert_eq!(session.review_position(), before);
}

#[tokio::test]
async fn stale_review_cursor_is_reset_after_mistakes_are_cleared() {
    let services = services_with("a1\na2\na3\na4\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();
    session.update_mistakes_batch(&["a1", "a2", "a3", "a4"]).await.unwrap();
    session.set_review_position(3).await.unwrap();

    session.reset_progress(true, false).await.unwrap();
    session.update_mistakes_batch(&["a2"]).await.unwrap();

    let resumed = session.review_page(page(0, 2)).await.unwrap();
    assert_eq!(resumed.current_page, 1);
    assert_eq!(resumed.review_words.len(), 1);
    assert_eq!(resumed.review_words[0].word, "a2");
    assert_eq!(session.review_position(), 0);
}

#[tokio::test]
async fn batch_updates_increment_once_per_occurrence() {
    let services = services_with("apple\nbanana\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();

    let tally = session
        .update_mistakes_batch(&["apple", "apple", "unknown"])
        .await
        .unwrap();
    assert_eq!((tally.updated, tally.skipped), (2, 1));
    session.update_mistakes_batch(&["apple"]).await.unwrap();
    session.update_correct_batch(&["banana"]).await.unwrap();

    let doc = session.document().unwrap();
    let apple = doc.word("apple").unwrap();
    assert_eq!(apple.mistakes(), 3);
    assert_eq!(apple.last_seen(), FIXED_TEST_TIMESTAMP);
    assert_eq!(doc.word("banana").unwrap().correct_count(), 1);
    assert!(doc.word("unknown").is_none());

    let stats = session.stats().unwrap();
    assert_eq!(stats.total_mistakes, 3);
    assert_eq!(stats.total_correct, 1);
    assert!((stats.accuracy - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn reset_law_clears_review_and_position() {
    let services = services_with("apple\nbanana\ncherry\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();
    session.update_mistakes_batch(&["apple", "cherry"]).await.unwrap();
    session.learn_page(page(2, 1)).await.unwrap();
    assert_eq!(session.stats().unwrap().current_position, 1);

    let summary = session.reset_progress(true, true).await.unwrap();
    assert_eq!(summary.words_reset, 2);
    assert!(summary.reset_mistakes && summary.reset_position);

    let stats = session.stats().unwrap();
    assert_eq!(stats.review, 0);
    assert_eq!(stats.current_position, 0);
    assert_eq!(stats.accuracy, 100.0);
}

#[tokio::test]
async fn operations_without_active_user_fail_cleanly() {
    let services = services_with("apple\n").await;
    let mut session = services.progress().session();

    assert!(matches!(
        session.update_mistakes_batch(&["apple"]).await.unwrap_err(),
        ProgressError::NoActiveUser
    ));
    assert!(matches!(session.stats().unwrap_err(), ProgressError::NoActiveUser));
    assert!(matches!(
        session.learn_page(page(1, 5)).await.unwrap_err(),
        ProgressError::NoActiveUser
    ));
    assert!(matches!(
        session.reset_progress(true, true).await.unwrap_err(),
        ProgressError::NoActiveUser
    ));
    assert_eq!(session.learn_position(), 0);

    session.set_active_user("alice").await.unwrap();
    session.set_active_user("").await.unwrap();
    assert!(session.active_user().is_none());

    assert!(matches!(
        session.set_active_user("nobody").await.unwrap_err(),
        ProgressError::UnknownUser(_)
    ));
}

#[tokio::test]
async fn invalid_page_arguments_are_rejected_before_touching_state() {
    assert_eq!(
        PageRequest::new(1, 0).unwrap_err(),
        PageRequestError::NonPositivePageSize(0)
    );
    let err: ProgressError = PageRequest::new(-2, 10).unwrap_err().into();
    assert!(matches!(err, ProgressError::InvalidArgument(_)));
}

#[tokio::test]
async fn exam_words_are_distinct_samples() {
    let services = services_with("a1\na2\na3\na4\na5\na6\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();

    let sample = session.exam_words(4).unwrap().words;
    assert_eq!(sample.len(), 4);
    let mut unique = sample.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4);

    assert_eq!(session.exam_words(20).unwrap().words.len(), 6);
    assert!(session.exam_words(0).unwrap().words.is_empty());
}

#[tokio::test]
async fn concurrent_sessions_for_one_user_do_not_lose_updates() {
    let services = services_with("apple\nbanana\ncherry\n").await;
    let mut learner = services.progress().session();
    let mut reviewer = services.progress().session();
    learner.set_active_user("alice").await.unwrap();
    reviewer.set_active_user("alice").await.unwrap();

    // The learner's cursor move lands first; the reviewer's snapshot is stale.
    learner.learn_page(page(2, 2)).await.unwrap();
    reviewer.update_mistakes_batch(&["banana"]).await.unwrap();

    let doc = reviewer.document().unwrap();
    assert_eq!(doc.learn_position(), 2);
    assert_eq!(doc.word("banana").unwrap().mistakes(), 1);

    let (a, b) = tokio::join!(
        learner.update_mistakes_batch(&["apple"]),
        reviewer.update_mistakes_batch(&["apple"]),
    );
    a.unwrap();
    b.unwrap();
    let mut check = services.progress().session();
    check.set_active_user("alice").await.unwrap();
    assert_eq!(check.document().unwrap().word("apple").unwrap().mistakes(), 2);
}

/// Wraps the in-memory store and fails every save while `broken` is set.
#[derive(Clone)]
struct FlakyRepository {
    inner: InMemoryRepository,
    broken: Arc<AtomicBool>,
}

#[async_trait]
impl UserDocumentRepository for FlakyRepository {
    async fn load_document(&self, username: &Username) -> Result<UserDocument, StorageError> {
        self.inner.load_document(username).await
    }

    async fn save_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.save_document(document).await
    }

    async fn insert_new_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        self.inner.insert_new_document(document).await
    }

    async fn document_exists(&self, username: &Username) -> Result<bool, StorageError> {
        self.inner.document_exists(username).await
    }

    async fn list_users(&self) -> Result<Vec<UserSummaryRecord>, StorageError> {
        self.inner.list_users().await
    }

    async fn delete_document(&self, username: &Username) -> Result<(), StorageError> {
        self.inner.delete_document(username).await
    }
}

#[tokio::test]
async fn failed_save_keeps_previous_state() {
    let inner = InMemoryRepository::new();
    let broken = Arc::new(AtomicBool::new(false));
    let repo = FlakyRepository {
        inner: inner.clone(),
        broken: Arc::clone(&broken),
    };
    let alice = Username::parse("alice").unwrap();
    let vocab = Vocabulary::parse("apple\nbanana\n");
    inner
        .save_document(&UserDocument::bootstrap(alice.clone(), &vocab, FIXED_TEST_TIMESTAMP))
        .await
        .unwrap();

    let progress = ProgressService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo),
        Arc::new(UserLocks::new()),
    );
    let mut session = progress.session();
    session.set_active_user("alice").await.unwrap();

    broken.store(true, Ordering::SeqCst);
    let err = session.update_mistakes_batch(&["apple"]).await.unwrap_err();
    assert!(matches!(err, ProgressError::Storage(StorageError::Connection(_))));
    assert_eq!(session.document().unwrap().word("apple").unwrap().mistakes(), 0);
    assert_eq!(
        inner.load_document(&alice).await.unwrap().word("apple").unwrap().mistakes(),
        0
    );

    broken.store(false, Ordering::SeqCst);
    session.update_mistakes_batch(&["apple"]).await.unwrap();
    assert_eq!(
        inner.load_document(&alice).await.unwrap().word("apple").unwrap().mistakes(),
        1
    );
}

#[tokio::test]
async fn page_json_uses_transport_field_names() {
    let services = services_with("apple\nbanana\ncherry\n").await;
    let mut session = services.progress().session();
    session.set_active_user("alice").await.unwrap();

    let json = serde_json::to_value(session.learn_page(page(1, 2)).await.unwrap()).unwrap();
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["progress"]["total_words"], 3);
    assert_eq!(json["completed"], false);
}
