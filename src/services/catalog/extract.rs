//! Field extraction from catalog pages.
//!
//! Every function takes raw HTML and returns owned values, so parsed
//! documents never live across an `.await` in the calling workers. Records
//! with a missing field are skipped rather than failing the page.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use super::{absolute_url, Selectors};

/// One row of the "recently updated by" listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentUser {
    pub username: String,
    pub score: String,
}

/// A page of the "recently updated by" listing
#[derive(Debug, Clone, Default)]
pub struct RecentUsersPage {
    /// Rows present on the page, including ones skipped for missing fields
    pub row_count: usize,
    pub users: Vec<RecentUser>,
}

/// A person credited on a series' characters & staff page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credit {
    VoiceActor {
        name: String,
        character_role: String,
    },
    Staff {
        name: String,
        positions: Vec<String>,
    },
}

impl Credit {
    pub fn name(&self) -> &str {
        match self {
            Credit::VoiceActor { name, .. } | Credit::Staff { name, .. } => name,
        }
    }
}

/// Everything the scorer needs to know about a series
#[derive(Debug, Clone, Default)]
pub struct SeriesProfile {
    pub title: Option<String>,
    pub credits: Vec<Credit>,
    pub genres: Vec<String>,
}

/// A series as it appears on a user's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSeries {
    pub title: String,
    pub url: String,
}

/// Row of the JSON blob embedded in modern list pages
#[derive(Debug, Deserialize)]
struct ListItem {
    anime_title: serde_json::Value,
    #[serde(default)]
    anime_url: Option<String>,
}

impl ListItem {
    fn into_listed(self, base_url: &str) -> Option<ListedSeries> {
        // Purely numeric titles are serialized as JSON numbers
        let title = match self.anime_title {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let url = self.anime_url?;
        if title.is_empty() {
            return None;
        }
        Some(ListedSeries {
            title,
            url: absolute_url(base_url, &url),
        })
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Canonical series URL linked from the first navigation tab
pub fn details_url(html: &str, selectors: &Selectors, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let url = document
        .select(&selectors.details_link)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| absolute_url(base_url, href));
    url
}

pub fn recent_users(html: &str, selectors: &Selectors) -> RecentUsersPage {
    let document = Html::parse_document(html);
    let mut page = RecentUsersPage::default();

    for row in document.select(&selectors.recent_user_rows) {
        page.row_count += 1;
        let Some(score) = first_text(row, &selectors.recent_user_score) else {
            continue;
        };
        let Some(username) = first_text(row, &selectors.recent_user_name) else {
            continue;
        };
        page.users.push(RecentUser { username, score });
    }

    page
}

/// Title, credits and genres from a series' characters & staff page
pub fn series_profile(html: &str, selectors: &Selectors) -> SeriesProfile {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.series_title)
        .next()
        .map(text_of)
        .filter(|title| !title.is_empty());

    let mut credits = Vec::new();

    // The last table in the main column is the staff table
    let tables: Vec<ElementRef<'_>> = document.select(&selectors.character_tables).collect();
    let character_count = tables.len().saturating_sub(1);
    for table in tables.into_iter().take(character_count) {
        let Some(name) = first_text(table, &selectors.voice_actor_name) else {
            continue;
        };
        let Some(character_role) = first_text(table, &selectors.character_role) else {
            continue;
        };
        credits.push(Credit::VoiceActor {
            name,
            character_role,
        });
    }

    for row in document.select(&selectors.staff_rows) {
        let Some(positions) = first_text(row, &selectors.staff_positions) else {
            continue;
        };
        let Some(name) = first_text(row, &selectors.staff_name) else {
            continue;
        };
        let positions = positions
            .split(',')
            .map(str::trim)
            .filter(|position| !position.is_empty())
            .map(str::to_string)
            .collect();
        credits.push(Credit::Staff { name, positions });
    }

    let genres = document
        .select(&selectors.sidebar_blocks)
        .filter(|block| text_of(*block).contains(selectors.genre_label.as_str()))
        .flat_map(|block| block.select(&selectors.genre_links).map(text_of))
        .filter(|genre| !genre.is_empty())
        .collect();

    SeriesProfile {
        title,
        credits,
        genres,
    }
}

/// Titles on the "users also recommend" page, in page order
pub fn recommended_titles(html: &str, selectors: &Selectors) -> Vec<String> {
    let document = Html::parse_document(html);
    let titles = document
        .select(&selectors.rec_cells)
        .filter_map(|cell| first_text(cell, &selectors.rec_title))
        .collect();
    titles
}

/// Every series on a user's list page
///
/// Reads the JSON rows of the modern layout, falling back to the title
/// anchors of the legacy layout when no JSON rows are present.
pub fn listed_series(html: &str, selectors: &Selectors, base_url: &str) -> Vec<ListedSeries> {
    let document = Html::parse_document(html);
    let mut series = Vec::new();

    for table in document.select(&selectors.list_table) {
        let Some(raw) = table.value().attr("data-items") else {
            continue;
        };
        match serde_json::from_str::<Vec<ListItem>>(raw) {
            Ok(items) => series.extend(
                items
                    .into_iter()
                    .filter_map(|item| item.into_listed(base_url)),
            ),
            Err(e) => tracing::debug!(error = %e, "Unreadable list data, skipping table"),
        }
    }

    if series.is_empty() {
        for link in document.select(&selectors.list_title_links) {
            let title = text_of(link);
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            series.push(ListedSeries {
                title,
                url: absolute_url(base_url, href),
            });
        }
    }

    series
}
