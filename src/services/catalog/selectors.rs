use scraper::Selector;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// CSS selectors for every field the pipeline reads, as plain strings
///
/// Defaults follow the catalog's current markup. Row-level selectors are
/// applied to the whole page; the others are applied within the row or table
/// they belong to. Any field can be overridden at startup with a
/// `SELECTOR_<FIELD>` environment variable, e.g. `SELECTOR_GENRE_LABEL`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorDefinitions {
    /// First navigation tab on any series page, linking to the canonical page
    pub details_link: String,
    pub series_title: String,
    pub recent_user_rows: String,
    pub recent_user_name: String,
    pub recent_user_score: String,
    pub character_tables: String,
    pub character_role: String,
    pub voice_actor_name: String,
    pub staff_rows: String,
    pub staff_name: String,
    pub staff_positions: String,
    /// Sidebar blocks, the genre block being the one whose text carries `genre_label`
    pub sidebar_blocks: String,
    pub genre_label: String,
    pub genre_links: String,
    pub rec_cells: String,
    pub rec_title: String,
    /// Modern list layout: a table carrying its rows as JSON in `data-items`
    pub list_table: String,
    /// Legacy list layout: one anchor per series
    pub list_title_links: String,
}

impl Default for SelectorDefinitions {
    fn default() -> Self {
        let main_column =
            "#content > table > tbody > tr > td:nth-child(2) > div.js-scrollfix-bottom-rel";
        Self {
            details_link: "#horiznav_nav > ul > li:nth-child(1) > a".to_string(),
            series_title: "#contentWrapper > div:nth-child(1) > h1 > span".to_string(),
            recent_user_rows: "table.table-recently-updated > tbody > tr:not(:first-child)"
                .to_string(),
            recent_user_name: "td.borderClass.di-t.w100:first-child > div.di-tc.va-m.al.pl4 > a"
                .to_string(),
            recent_user_score: "td:nth-child(2)".to_string(),
            character_tables: format!("{} > table", main_column),
            character_role: "tbody > tr > td:nth-child(2) > div > small".to_string(),
            voice_actor_name:
                "tbody > tr > td:nth-child(3) > table > tbody > tr:nth-child(1) > td:nth-child(1) > a"
                    .to_string(),
            staff_rows: format!("{} > table:last-child > tbody > tr", main_column),
            staff_name: "td:nth-child(2) > a".to_string(),
            staff_positions: "td:nth-child(2) > small".to_string(),
            sidebar_blocks: "#content > table > tbody > tr > td.borderClass > div > div"
                .to_string(),
            genre_label: "Genre".to_string(),
            genre_links: "a".to_string(),
            rec_cells: format!(
                "{} > div.borderClass > table > tbody > tr > td[valign]:nth-child(2)",
                main_column
            ),
            rec_title: "div[style]:nth-child(2) > a:nth-child(1) > strong".to_string(),
            list_table: "table.list-table[data-items]".to_string(),
            list_title_links: "a.animetitle".to_string(),
        }
    }
}

/// Compiled form of [`SelectorDefinitions`], built once and shared read-only
#[derive(Debug, Clone)]
pub struct Selectors {
    pub details_link: Selector,
    pub series_title: Selector,
    pub recent_user_rows: Selector,
    pub recent_user_name: Selector,
    pub recent_user_score: Selector,
    pub character_tables: Selector,
    pub character_role: Selector,
    pub voice_actor_name: Selector,
    pub staff_rows: Selector,
    pub staff_name: Selector,
    pub staff_positions: Selector,
    pub sidebar_blocks: Selector,
    pub genre_label: String,
    pub genre_links: Selector,
    pub rec_cells: Selector,
    pub rec_title: Selector,
    pub list_table: Selector,
    pub list_title_links: Selector,
}

fn compile(field: &str, css: &str) -> AppResult<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::Parse(format!("Invalid selector for {} ({}): {}", field, css, e)))
}

impl Selectors {
    /// Compiles every definition, failing on the first invalid selector
    pub fn compile(defs: &SelectorDefinitions) -> AppResult<Self> {
        Ok(Self {
            details_link: compile("details_link", &defs.details_link)?,
            series_title: compile("series_title", &defs.series_title)?,
            recent_user_rows: compile("recent_user_rows", &defs.recent_user_rows)?,
            recent_user_name: compile("recent_user_name", &defs.recent_user_name)?,
            recent_user_score: compile("recent_user_score", &defs.recent_user_score)?,
            character_tables: compile("character_tables", &defs.character_tables)?,
            character_role: compile("character_role", &defs.character_role)?,
            voice_actor_name: compile("voice_actor_name", &defs.voice_actor_name)?,
            staff_rows: compile("staff_rows", &defs.staff_rows)?,
            staff_name: compile("staff_name", &defs.staff_name)?,
            staff_positions: compile("staff_positions", &defs.staff_positions)?,
            sidebar_blocks: compile("sidebar_blocks", &defs.sidebar_blocks)?,
            genre_label: defs.genre_label.clone(),
            genre_links: compile("genre_links", &defs.genre_links)?,
            rec_cells: compile("rec_cells", &defs.rec_cells)?,
            rec_title: compile("rec_title", &defs.rec_title)?,
            list_table: compile("list_table", &defs.list_table)?,
            list_title_links: compile("list_title_links", &defs.list_title_links)?,
        })
    }

    /// Compiles the default definitions
    pub fn catalog_defaults() -> AppResult<Self> {
        Self::compile(&SelectorDefinitions::default())
    }
}
