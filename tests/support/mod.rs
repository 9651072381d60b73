#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use watchthis::{
    error::{AppError, AppResult},
    models::SignalWeights,
    services::{
        catalog::{PageSource, Selectors},
        Recommender,
    },
};

pub const BASE: &str = "https://myanimelist.net";
pub const SERIES_PATH: &str = "/anime/457/Mushishi";

pub fn series_url() -> String {
    format!("{}{}", BASE, SERIES_PATH)
}

/// Catalog pages served from memory, with a log of every URL requested
#[derive(Default)]
pub struct FakeCatalog {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_page(mut self, url: impl Into<String>, html: String) -> Self {
        self.pages.insert(url.into(), html);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requested.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait::async_trait]
impl PageSource for FakeCatalog {
    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        self.requested.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::page_unavailable(url, "status 404"))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn recommender(catalog: Arc<FakeCatalog>, max_concurrency: usize) -> Recommender {
    Recommender::new(
        catalog,
        Selectors::catalog_defaults().unwrap(),
        SignalWeights::default(),
        BASE.to_string(),
        max_concurrency,
    )
}

/// Series page in the characters & staff layout
pub fn series_page(title: &str, path: &str, genres: &[&str], staff: &[(&str, &str)]) -> String {
    let genre_links: Vec<String> = genres
        .iter()
        .enumerate()
        .map(|(i, g)| format!(r#"<a href="/anime/genre/{}">{}</a>"#, i + 1, g))
        .collect();
    let staff_rows: String = staff
        .iter()
        .map(|(name, positions)| {
            format!(
                r#"<tr><td><img src="p.jpg"></td><td><a href="/people/1">{}</a><br><small>{}</small></td></tr>"#,
                name, positions
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div id="contentWrapper">
  <div><h1><span>{title}</span></h1></div>
  <div id="content">
    <table><tbody><tr>
      <td class="borderClass"><div>
        <div><span>Type:</span> <a href="/type/tv">TV</a></div>
        <div><span>Genres:</span> {genres}</div>
      </div></td>
      <td>
        <div id="horiznav_nav"><ul>
          <li><a href="{path}">Details</a></li>
          <li><a href="{path}/characters">Characters &amp; Staff</a></li>
        </ul></div>
        <div class="js-scrollfix-bottom-rel"><table><tbody>{staff}</tbody></table></div>
      </td>
    </tr></tbody></table>
  </div>
</div>
</body></html>"#,
        title = title,
        genres = genre_links.join(", "),
        path = path,
        staff = staff_rows,
    )
}

/// "Recently updated by" listing with `(username, score)` rows
pub fn stats_page(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(name, score)| {
            format!(
                r#"<tr><td class="borderClass di-t w100"><div class="di-tc va-m al pl4"><a href="/profile/{0}">{0}</a></div></td><td class="borderClass ac">{1}</td><td>Completed</td></tr>"#,
                name, score
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="table-recently-updated"><tbody><tr><td>Member</td><td>Score</td><td>Status</td></tr>{}</tbody></table></body></html>"#,
        body
    )
}

/// "Users also recommend" page listing `titles` in order
pub fn recommendations_page(titles: &[&str]) -> String {
    let cells: String = titles
        .iter()
        .map(|title| {
            format!(
                r#"<div class="borderClass"><table><tbody><tr><td valign="top"><img src="r.jpg"></td><td valign="top"><div><a href="/edit">Recommend</a></div><div style="margin-bottom: 2px;"><a href="/anime/1"><strong>{}</strong></a></div></td></tr></tbody></table></div>"#,
                title
            )
        })
        .collect();
    format!(
        r#"<html><body><div id="content"><table><tbody><tr><td class="borderClass">sidebar</td><td><div class="js-scrollfix-bottom-rel">{}</div></td></tr></tbody></table></div></body></html>"#,
        cells
    )
}

/// Completed list in the legacy anchor layout, `(title, path)` per row
pub fn list_page(series: &[(&str, &str)]) -> String {
    let rows: String = series
        .iter()
        .map(|(title, path)| {
            format!(
                r#"<tr><td class="data title"><a class="animetitle" href="{}"><span>{}</span></a></td></tr>"#,
                path, title
            )
        })
        .collect();
    format!("<html><body><table><tbody>{}</tbody></table></body></html>", rows)
}

pub fn list_url(username: &str) -> String {
    format!("{}/animelist/{}?status=2", BASE, username)
}

pub const MUSHISHI: (&str, &str) = ("Mushishi", SERIES_PATH);
pub const NATSUME: (&str, &str) = ("Natsume Yuujinchou", "/anime/4081/Natsume_Yuujinchou");
pub const KINO: (&str, &str) = ("Kino no Tabi", "/anime/486/Kino_no_Tabi");
pub const HAIBANE: (&str, &str) = ("Haibane Renmei", "/anime/387/Haibane_Renmei");
pub const ARIA: (&str, &str) = ("Aria the Animation", "/anime/477/Aria_the_Animation");

/// Ten users who all finished Mushishi
///
/// Natsume is on six lists, shares a genre and is the site's top
/// recommendation. Kino is on five lists and shares nothing. Haibane is on
/// four lists but its page is missing. Aria is on two lists.
pub fn mushishi_catalog() -> FakeCatalog {
    let series = series_url();
    let mut rows: Vec<(String, &str)> = (0..10).map(|i| (format!("user{}", i), "9")).collect();
    rows.insert(3, ("lurker".to_string(), "-"));
    let rows: Vec<(&str, &str)> = rows.iter().map(|(n, s)| (n.as_str(), *s)).collect();

    let mut catalog = FakeCatalog::default()
        .with_page(
            series.clone(),
            series_page("Mushishi", SERIES_PATH, &["Adventure", "Mystery"], &[]),
        )
        .with_page(
            format!("{}/characters", series),
            series_page(
                "Mushishi",
                SERIES_PATH,
                &["Adventure", "Mystery"],
                &[("Nagahama, Hiroshi", "Director, Series Composition")],
            ),
        )
        .with_page(format!("{}/stats?m=all&show=0", series), stats_page(&rows))
        .with_page(
            format!("{}/userrecs", series),
            recommendations_page(&["Natsume Yuujinchou", "Aria the Animation"]),
        )
        .with_page(
            format!("{}{}/characters", BASE, NATSUME.1),
            series_page(
                "Natsume Yuujinchou",
                NATSUME.1,
                &["Mystery", "Shoujo"],
                &[("Omori, Takahiro", "Director")],
            ),
        )
        .with_page(
            format!("{}{}/characters", BASE, KINO.1),
            series_page("Kino no Tabi", KINO.1, &["Action"], &[("Nakamura, Ryutaro", "Director")]),
        );

    for i in 0..10 {
        let mut list = vec![MUSHISHI];
        if i < 6 {
            list.push(NATSUME);
        }
        if i >= 5 {
            list.push(KINO);
        }
        if i % 2 == 0 && i < 8 {
            list.push(HAIBANE);
        }
        if i < 2 {
            list.push(ARIA);
        }
        catalog = catalog.with_page(list_url(&format!("user{}", i)), list_page(&list));
    }

    catalog
}
