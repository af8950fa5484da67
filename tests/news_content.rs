mod common;

use chrono::{Duration, NaiveDate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

/// Byte offsets of `needles` in `haystack`, panicking on a missing one.
fn positions(haystack: &str, needles: &[String]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| {
            haystack
                .find(n.as_str())
                .unwrap_or_else(|| panic!("{n} not on the page"))
        })
        .collect()
}

#[tokio::test]
async fn test_home_page_news_count() {
    let state = common::create_test_state();
    for i in 0..11 {
        common::create_news(&state, &format!("Новость {i:02}"), today() - Duration::days(i)).await;
    }
    let server = common::create_test_server(&state);

    let page = server.get("/").await.text();

    assert_eq!(page.matches("class=\"news-item\"").count(), 10);
    assert!(!page.contains("Новость 10"));
}

#[tokio::test]
async fn test_home_page_news_order() {
    let state = common::create_test_state();
    // Inserted oldest first so that id order and date order disagree.
    for i in (0..5).rev() {
        common::create_news(&state, &format!("Новость {i:02}"), today() - Duration::days(i)).await;
    }
    let server = common::create_test_server(&state);

    let page = server.get("/").await.text();

    let titles: Vec<String> = (0..5).map(|i| format!("Новость {i:02}")).collect();
    let found = positions(&page, &titles);
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted, "newest news must come first");
}

#[tokio::test]
async fn test_home_page_shows_comment_count() {
    let state = common::create_test_state();
    let author = common::create_user(&state, "author").await;
    let news = common::create_news(&state, "Новость", today()).await;
    common::create_comment(&state, &news, &author, "Первый").await;
    common::create_comment(&state, &news, &author, "Второй").await;
    let server = common::create_test_server(&state);

    let page = server.get("/").await.text();

    assert!(page.contains("Комментариев: 2"));
}

#[tokio::test]
async fn test_comments_order() {
    let state = common::create_test_state();
    let author = common::create_user(&state, "author").await;
    let news = common::create_news(&state, "Новость", today()).await;
    for i in 0..5 {
        common::create_comment(&state, &news, &author, &format!("Комментарий {i}")).await;
    }
    let server = common::create_test_server(&state);

    let page = server.get(&format!("/news/{}", news.id)).await.text();

    let texts: Vec<String> = (0..5).map(|i| format!("Комментарий {i}")).collect();
    let found = positions(&page, &texts);
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted, "comments must be in chronological order");
}

#[tokio::test]
async fn test_anonymous_client_has_no_form() {
    let state = common::create_test_state();
    let news = common::create_news(&state, "Новость", today()).await;
    let server = common::create_test_server(&state);

    let page = server.get(&format!("/news/{}", news.id)).await.text();

    assert!(!page.contains("id=\"comment-form\""));
}

#[tokio::test]
async fn test_authorized_client_has_form() {
    let state = common::create_test_state();
    let user = common::create_user(&state, "reader").await;
    let news = common::create_news(&state, "Новость", today()).await;
    let cookie = common::login_cookie(&state, &user).await;
    let server = common::create_test_server(&state);

    let page = server
        .get(&format!("/news/{}", news.id))
        .add_header("Cookie", cookie)
        .await
        .text();

    assert!(page.contains("id=\"comment-form\""));
    assert!(page.contains("reader"));
}

#[tokio::test]
async fn test_edit_links_only_for_comment_author() {
    let state = common::create_test_state();
    let author = common::create_user(&state, "author").await;
    let reader = common::create_user(&state, "reader").await;
    let news = common::create_news(&state, "Новость", today()).await;
    let comment = common::create_comment(&state, &news, &author, "Текст").await;
    let server = common::create_test_server(&state);
    let edit_link = format!("/news/comments/{}/edit", comment.id);

    let author_page = server
        .get(&format!("/news/{}", news.id))
        .add_header("Cookie", common::login_cookie(&state, &author).await)
        .await
        .text();
    assert!(author_page.contains(&edit_link));

    let reader_page = server
        .get(&format!("/news/{}", news.id))
        .add_header("Cookie", common::login_cookie(&state, &reader).await)
        .await
        .text();
    assert!(!reader_page.contains(&edit_link));
}
