//! Sequential id allocation for appended reviews.

use std::collections::HashSet;
use std::sync::Arc;

use dealership_reviews::{DealerId, IdAllocation, InMemoryStore, NewReview, ReviewRepository};

fn candidate(dealer: i64, n: usize) -> NewReview {
    NewReview {
        name: format!("reviewer-{n}"),
        dealership: DealerId::Number(dealer),
        review: "Fine service".to_string(),
        purchase: n % 2 == 0,
        purchase_date: None,
        car_make: Some("Audi".to_string()),
        car_model: None,
        car_year: None,
    }
}

#[tokio::test]
async fn nth_append_on_empty_collection_gets_id_n() {
    let repo = ReviewRepository::with_allocation(
        Arc::new(InMemoryStore::new()),
        IdAllocation::MaxPlusOne,
    );
    for n in 1..=10 {
        let review = repo.append(candidate(1, n)).await.unwrap();
        assert_eq!(review.id, n as i64);
        assert_eq!(review.car_make.as_deref(), Some("Audi"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn serialized_appends_never_reuse_ids() {
    let repo = Arc::new(ReviewRepository::new(Arc::new(InMemoryStore::new())));
    assert_eq!(repo.allocation(), IdAllocation::Serialized);

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.append(candidate(n as i64 % 3, n)).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let review = handle.await.unwrap().unwrap();
        assert!(ids.insert(review.id), "duplicate id {}", review.id);
    }
    assert_eq!(ids, (1..=32).collect::<HashSet<i64>>());

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 32);
}

#[tokio::test]
async fn appended_review_is_listed_for_its_dealer_only() {
    let repo = ReviewRepository::new(Arc::new(InMemoryStore::new()));
    let review = repo.append(candidate(5, 1)).await.unwrap();

    let for_five = repo.list_by_dealer(&DealerId::Number(5)).await.unwrap();
    assert_eq!(for_five, vec![review]);
    assert!(repo
        .list_by_dealer(&DealerId::Number(6))
        .await
        .unwrap()
        .is_empty());
}
