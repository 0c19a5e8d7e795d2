//! Query facade integration tests

mod common;

use bookshelf_server::AppError;
use common::{date, issue, new_book, services};

#[tokio::test]
async fn test_books_listing_and_search() {
    let s = services().await;
    s.catalog.add_book(new_book("B1", "Operating Systems", 1)).await.unwrap();
    s.catalog.add_book(new_book("B2", "Database Systems", 1)).await.unwrap();
    s.catalog.add_book(new_book("B3", "Linear Algebra", 1)).await.unwrap();

    assert_eq!(s.query.books(None).await.unwrap().len(), 3);
    assert_eq!(s.query.books(Some("   ")).await.unwrap().len(), 3);

    let found = s.query.books(Some(" systems ")).await.unwrap();
    let ids: Vec<&str> = found.iter().map(|b| b.book_id.as_str()).collect();
    assert_eq!(ids, ["B2", "B1"]);
}

#[tokio::test]
async fn test_book_holders() {
    let s = services().await;
    s.catalog.add_book(new_book("B1", "Operating Systems", 3)).await.unwrap();
    s.catalog.add_book(new_book("B2", "Database Systems", 3)).await.unwrap();
    s.circulation.issue_book(issue("B1", "R2")).await.unwrap();
    s.circulation.issue_book(issue("B1", "R1")).await.unwrap();
    s.circulation.issue_book(issue("B2", "R3")).await.unwrap();

    let holders: Vec<String> = s
        .query
        .book_holders("B1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.student_roll)
        .collect();
    assert_eq!(holders, ["R1", "R2"]);

    assert!(matches!(
        s.query.book_holders("NOPE").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_student_records_in_issue_order() {
    let s = services().await;
    s.catalog.add_book(new_book("B1", "Operating Systems", 3)).await.unwrap();
    s.catalog.add_book(new_book("B2", "Database Systems", 3)).await.unwrap();

    let mut late = issue("B1", "R1");
    late.issue_date = date(2024, 3, 10);
    late.return_date = date(2024, 3, 24);
    s.circulation.issue_book(late).await.unwrap();
    s.circulation.issue_book(issue("B2", "R1")).await.unwrap();

    let books: Vec<String> = s
        .query
        .student_records("R1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.book_id)
        .collect();
    assert_eq!(books, ["B2", "B1"]);

    assert!(s.query.student_records("R404").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_all_records_grouped_by_student() {
    let s = services().await;
    s.catalog.add_book(new_book("B1", "Operating Systems", 3)).await.unwrap();
    s.catalog.add_book(new_book("B2", "Database Systems", 3)).await.unwrap();
    s.circulation.issue_book(issue("B2", "R2")).await.unwrap();
    s.circulation.issue_book(issue("B1", "R1")).await.unwrap();
    s.circulation.issue_book(issue("B1", "R2")).await.unwrap();

    let keys: Vec<(String, String)> = s
        .query
        .all_records()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.student_roll, r.book_id))
        .collect();
    assert_eq!(
        keys,
        [
            ("R1".to_string(), "B1".to_string()),
            ("R2".to_string(), "B2".to_string()),
            ("R2".to_string(), "B1".to_string()),
        ]
    );
}
