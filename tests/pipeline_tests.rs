mod support;

use std::sync::Arc;

use support::{
    list_page, list_url, mushishi_catalog, recommender, series_page, series_url, stats_page,
    FakeCatalog, BASE, ARIA, HAIBANE, KINO, MUSHISHI, NATSUME, SERIES_PATH,
};
use watchthis::error::AppError;

#[tokio::test]
async fn test_ranks_candidates_by_popularity_and_shared_traits() {
    let catalog = Arc::new(mushishi_catalog());
    let recommendations = recommender(catalog.clone(), 4)
        .recommend(&series_url(), 10, 4.0)
        .await
        .unwrap();

    assert_eq!(recommendations.reference_title, "Mushishi");

    let ranked: Vec<(&str, f64)> = recommendations
        .series
        .iter()
        .map(|s| (s.title.as_str(), s.score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Natsume Yuujinchou", 6.0 + 16.0 + 80.0),
            ("Kino no Tabi", 5.0),
            ("Haibane Renmei", 4.0),
        ]
    );
    assert_eq!(
        recommendations.series[0].url,
        format!("{}{}", BASE, NATSUME.1)
    );
}

#[tokio::test]
async fn test_reference_and_rare_titles_are_never_recommended() {
    let catalog = Arc::new(mushishi_catalog());
    let recommendations = recommender(catalog.clone(), 4)
        .recommend(&series_url(), 10, 4.0)
        .await
        .unwrap();

    let titles: Vec<&str> = recommendations.series.iter().map(|s| s.title.as_str()).collect();
    assert!(!titles.contains(&MUSHISHI.0));
    assert!(!titles.contains(&ARIA.0));
    assert!(!catalog.was_requested(&format!("{}{}/characters", BASE, ARIA.1)));
}

#[tokio::test]
async fn test_unscored_users_are_not_sampled() {
    let catalog = Arc::new(mushishi_catalog());
    recommender(catalog.clone(), 4)
        .recommend(&series_url(), 10, 4.0)
        .await
        .unwrap();

    assert!(!catalog.was_requested(&list_url("lurker")));
    let lists_read = catalog
        .requested()
        .iter()
        .filter(|url| url.contains("/animelist/"))
        .count();
    assert_eq!(lists_read, 10);
}

#[tokio::test]
async fn test_worker_count_does_not_change_the_result() {
    let serial = recommender(Arc::new(mushishi_catalog()), 1)
        .recommend(&series_url(), 10, 4.0)
        .await
        .unwrap();
    let parallel = recommender(Arc::new(mushishi_catalog()), 16)
        .recommend(&series_url(), 10, 4.0)
        .await
        .unwrap();

    assert_eq!(serial.series, parallel.series);
}

#[tokio::test]
async fn test_higher_threshold_drops_less_popular_candidates() {
    let recommendations = recommender(Arc::new(mushishi_catalog()), 4)
        .recommend(&series_url(), 10, 5.0)
        .await
        .unwrap();

    let titles: Vec<&str> = recommendations.series.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec![NATSUME.0, KINO.0]);
    assert!(!titles.contains(&HAIBANE.0));
}

#[tokio::test]
async fn test_reference_missing_from_every_list_yields_nothing() {
    let series = series_url();
    let mut catalog = FakeCatalog::default()
        .with_page(series.clone(), series_page("Mushishi", SERIES_PATH, &[], &[]))
        .with_page(
            format!("{}/characters", series),
            series_page("Mushishi", SERIES_PATH, &[], &[]),
        )
        .with_page(format!("{}/userrecs", series), "<html></html>".to_string())
        .with_page(
            format!("{}/stats?m=all&show=0", series),
            stats_page(&[("a", "7"), ("b", "8"), ("c", "6"), ("d", "9")]),
        );
    for user in ["a", "b", "c", "d"] {
        catalog = catalog.with_page(list_url(user), list_page(&[NATSUME, KINO]));
    }

    let recommendations = recommender(Arc::new(catalog), 4)
        .recommend(&series, 4, 1.0)
        .await
        .unwrap();

    assert_eq!(recommendations.reference_title, "Mushishi");
    assert!(recommendations.series.is_empty());
}

#[tokio::test]
async fn test_unreadable_reference_fails_the_run() {
    let series = series_url();
    let catalog = FakeCatalog::default()
        .with_page(series.clone(), series_page("Mushishi", SERIES_PATH, &[], &[]))
        .with_page(
            format!("{}/stats?m=all&show=0", series),
            stats_page(&[("a", "7")]),
        );

    let result = recommender(Arc::new(catalog), 4)
        .recommend(&series, 1, 1.0)
        .await;

    assert!(matches!(result, Err(AppError::PageUnavailable(_))));
}
