mod common;

use bookstore_app::modules::books::models::{BookGetListInput, CreateUpdateBookDto};
use bookstore_kernel::CrudError;
use uuid::Uuid;

use common::seeded_app;

fn filter(text: &str) -> BookGetListInput {
    BookGetListInput {
        filter: Some(text.into()),
        ..Default::default()
    }
}

fn hobbit_input() -> CreateUpdateBookDto {
    CreateUpdateBookDto {
        title: "The Silmarillion".into(),
        language: "English".into(),
        country: "United Kingdom".into(),
        author: "J. R. R. Tolkien".into(),
        total_page: 365,
        year: 1977,
        link: "https://en.wikipedia.org/wiki/The_Silmarillion".into(),
    }
}

#[tokio::test]
async fn text_filter_matches_any_field_ignoring_case() {
    let app = seeded_app().await;
    let service = app.books.service();

    for needle in ["hobbit", "HOBBIT", "Tolk"] {
        let page = service.get_list(&filter(needle)).await.unwrap();
        assert_eq!(page.total_count, 1, "needle {needle}");
        assert_eq!(page.items[0].title, "The Hobbit");
    }

    let english = service.get_list(&filter("english")).await.unwrap();
    assert_eq!(english.total_count, 2);

    let by_country = service.get_list(&filter("kingdom")).await.unwrap();
    assert_eq!(by_country.total_count, 2);

    let nothing = service.get_list(&filter("100%")).await.unwrap();
    assert_eq!(nothing.total_count, 0);
}

#[tokio::test]
async fn blank_filter_is_ignored() {
    let app = seeded_app().await;
    let page = app.books.service().get_list(&filter("   ")).await.unwrap();
    assert_eq!(page.total_count, 5);
}

#[tokio::test]
async fn total_page_range_is_inclusive_with_open_bounds() {
    let app = seeded_app().await;
    let service = app.books.service();

    let both = BookGetListInput {
        total_page_min: Some(300),
        total_page_max: Some(400),
        sorting: Some("totalPage".into()),
        ..Default::default()
    };
    let page = service.get_list(&both).await.unwrap();
    let pages: Vec<_> = page.items.iter().map(|b| b.total_page).collect();
    assert_eq!(pages, vec![310, 342]);

    let exact = BookGetListInput {
        total_page_min: Some(310),
        total_page_max: Some(342),
        ..Default::default()
    };
    assert_eq!(service.get_list(&exact).await.unwrap().total_count, 2);

    let min_only = BookGetListInput {
        total_page_min: Some(500),
        ..Default::default()
    };
    assert_eq!(service.get_list(&min_only).await.unwrap().total_count, 2);

    let max_only = BookGetListInput {
        total_page_max: Some(200),
        ..Default::default()
    };
    let page = service.get_list(&max_only).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].title, "The Trial");
}

#[tokio::test]
async fn year_range_combines_with_text_filter() {
    let app = seeded_app().await;
    let input = BookGetListInput {
        filter: Some("english".into()),
        year_min: Some(1900),
        ..Default::default()
    };
    let page = app.books.service().get_list(&input).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].year, 1937);
}

#[tokio::test]
async fn paging_returns_expected_window_and_stable_total() {
    let app = seeded_app().await;
    let service = app.books.service();

    for skip in 0..=6_i64 {
        for max in [0_i64, 1, 2, 5, 10] {
            let input = BookGetListInput {
                skip_count: Some(skip),
                max_result_count: Some(max),
                sorting: Some("title".into()),
                ..Default::default()
            };
            let page = service.get_list(&input).await.unwrap();
            let expected = max.min((5 - skip).max(0)) as usize;
            assert_eq!(page.items.len(), expected, "skip {skip} max {max}");
            assert_eq!(page.total_count, 5);
        }
    }
}

#[tokio::test]
async fn pages_do_not_overlap() {
    let app = seeded_app().await;
    let service = app.books.service();

    let mut seen = Vec::new();
    for skip in [0, 2, 4] {
        let input = BookGetListInput {
            skip_count: Some(skip),
            max_result_count: Some(2),
            sorting: Some("language asc".into()),
            ..Default::default()
        };
        let page = service.get_list(&input).await.unwrap();
        seen.extend(page.items.into_iter().map(|b| b.id));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn sorting_by_column_and_direction() {
    let app = seeded_app().await;
    let input = BookGetListInput {
        sorting: Some("Year DESC".into()),
        ..Default::default()
    };
    let page = app.books.service().get_list(&input).await.unwrap();
    let years: Vec<_> = page.items.iter().map(|b| b.year).collect();
    assert_eq!(years, vec![1937, 1925, 1866, 1857, 1847]);
}

#[tokio::test]
async fn bad_listing_requests_are_invalid_arguments() {
    let app = seeded_app().await;
    let service = app.books.service();

    let requests = [
        BookGetListInput {
            sorting: Some("publisher".into()),
            ..Default::default()
        },
        BookGetListInput {
            sorting: Some("title sideways".into()),
            ..Default::default()
        },
        BookGetListInput {
            sorting: Some("id desc".into()),
            ..Default::default()
        },
        BookGetListInput {
            skip_count: Some(-1),
            ..Default::default()
        },
        BookGetListInput {
            max_result_count: Some(1001),
            ..Default::default()
        },
    ];

    for input in requests {
        let err = service.get_list(&input).await.unwrap_err();
        assert!(
            matches!(err, CrudError::InvalidArgument { .. }),
            "{input:?} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = seeded_app().await;
    let service = app.books.service();
    let actor = Uuid::now_v7();

    let input = hobbit_input();
    let created = service.create(input.clone(), Some(actor)).await.unwrap();
    assert_eq!(created.title, input.title);
    assert_eq!(created.language, input.language);
    assert_eq!(created.country, input.country);
    assert_eq!(created.author, input.author);
    assert_eq!(created.total_page, input.total_page);
    assert_eq!(created.year, input.year);
    assert_eq!(created.link, input.link);
    assert_eq!(created.creator_id, Some(actor));
    assert_eq!(created.last_modification_time, None);

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let newest = service.get_list(&BookGetListInput::default()).await.unwrap();
    assert_eq!(newest.total_count, 6);
    assert_eq!(newest.items[0].id, created.id);
}

#[tokio::test]
async fn create_rejects_empty_title() {
    let app = seeded_app().await;
    let mut input = hobbit_input();
    input.title = String::new();

    let err = app.books.service().create(input, None).await.unwrap_err();
    match err {
        CrudError::InvalidArgument { details, .. } => {
            assert!(details.iter().any(|d| d["field"] == "title"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn update_overwrites_fields_and_stamps_modifier() {
    let app = seeded_app().await;
    let service = app.books.service();
    let hobbit = service.get_list(&filter("hobbit")).await.unwrap().items[0].clone();
    let editor = Uuid::now_v7();

    let mut input = hobbit_input();
    input.title = "The Hobbit, or There and Back Again".into();
    let updated = service.update(hobbit.id, input, Some(editor)).await.unwrap();

    assert_eq!(updated.title, "The Hobbit, or There and Back Again");
    assert_eq!(updated.creation_time, hobbit.creation_time);
    assert_eq!(updated.last_modifier_id, Some(editor));
    assert!(updated.last_modification_time.is_some());
    assert_eq!(service.get(hobbit.id).await.unwrap(), updated);

    let missing = service.update(Uuid::now_v7(), hobbit_input(), None).await;
    assert!(matches!(missing, Err(CrudError::NotFound { .. })));
}

#[tokio::test]
async fn deleted_books_disappear() {
    let app = seeded_app().await;
    let service = app.books.service();
    let hobbit = service.get_list(&filter("hobbit")).await.unwrap().items[0].clone();

    service.delete(hobbit.id, None).await.unwrap();

    assert!(matches!(
        service.get(hobbit.id).await,
        Err(CrudError::NotFound { .. })
    ));
    let all = service.get_list(&BookGetListInput::default()).await.unwrap();
    assert_eq!(all.total_count, 4);
    assert!(all.items.iter().all(|b| b.id != hobbit.id));

    assert!(matches!(
        service.delete(hobbit.id, None).await,
        Err(CrudError::NotFound { .. })
    ));
    assert!(matches!(
        service.update(hobbit.id, hobbit_input(), None).await,
        Err(CrudError::NotFound { .. })
    ));

    let deleted: (i64, Option<String>) =
        sqlx::query_as("SELECT is_deleted, deletion_time FROM book WHERE id = ?")
            .bind(hobbit.id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(deleted.0, 1);
    assert!(deleted.1.is_some());
}
