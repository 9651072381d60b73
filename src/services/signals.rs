use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    models::SignalWeights,
    services::catalog::{
        extract::{self, Credit, SeriesProfile},
        PageSource, Selectors,
    },
};

/// The three weight tables built from the reference series
///
/// Built once per run before any concurrent stage and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct SignalTables {
    staff: HashMap<String, f64>,
    genres: HashMap<String, f64>,
    recommendations: HashMap<String, f64>,
}

/// The reference series as seen by the rest of the pipeline
#[derive(Debug, Clone)]
pub struct ReferenceSeries {
    pub url: String,
    pub title: String,
    pub tables: SignalTables,
}

impl SignalTables {
    pub fn build(
        credits: &[Credit],
        genres: &[String],
        recommendations: &[String],
        weights: &SignalWeights,
    ) -> Self {
        Self {
            staff: Self::staff_table(credits, weights),
            genres: Self::genre_table(genres, weights),
            recommendations: Self::recommendation_table(recommendations, weights),
        }
    }

    /// Voice actors and crew, with weights accumulated per name
    fn staff_table(credits: &[Credit], weights: &SignalWeights) -> HashMap<String, f64> {
        let mut table: HashMap<String, f64> = HashMap::new();

        for credit in credits {
            let weight = match credit {
                Credit::VoiceActor { character_role, .. } => {
                    Some(weights.voice_actor_weight(character_role))
                }
                Credit::Staff { positions, .. } => positions
                    .iter()
                    .filter_map(|position| weights.position_weight(position))
                    .reduce(|a, b| a + b),
            };

            if let Some(weight) = weight {
                *table.entry(credit.name().to_string()).or_default() += weight;
            }
        }

        table
    }

    fn genre_table(genres: &[String], weights: &SignalWeights) -> HashMap<String, f64> {
        let mut table = HashMap::new();
        for (index, genre) in genres.iter().enumerate() {
            table
                .entry(genre.clone())
                .or_insert_with(|| weights.genre_weight(index));
        }
        table
    }

    fn recommendation_table(titles: &[String], weights: &SignalWeights) -> HashMap<String, f64> {
        let mut table = HashMap::new();
        for (index, title) in titles.iter().enumerate() {
            table
                .entry(title.clone())
                .or_insert_with(|| weights.rec_weight(index));
        }
        table
    }

    pub fn staff_weight(&self, name: &str) -> Option<f64> {
        self.staff.get(name).copied()
    }

    pub fn genre_weight(&self, genre: &str) -> Option<f64> {
        self.genres.get(genre).copied()
    }

    pub fn recommendation_weight(&self, title: &str) -> Option<f64> {
        self.recommendations.get(title).copied()
    }

    /// Sum of the staff weights of every distinct credited name
    pub fn staff_bonus(&self, credits: &[Credit]) -> f64 {
        let names: HashSet<&str> = credits.iter().map(Credit::name).collect();
        names.into_iter().filter_map(|name| self.staff_weight(name)).sum()
    }

    /// Sum of the weights of every distinct listed genre
    pub fn genre_bonus(&self, genres: &[String]) -> f64 {
        let genres: HashSet<&str> = genres.iter().map(String::as_str).collect();
        genres.into_iter().filter_map(|genre| self.genre_weight(genre)).sum()
    }

    /// Highest recommendation weight among the title variants of one series
    pub fn recommendation_bonus<'a>(&self, titles: impl IntoIterator<Item = &'a str>) -> f64 {
        titles
            .into_iter()
            .filter_map(|title| self.recommendation_weight(title))
            .fold(0.0, f64::max)
    }

    /// Total bonus for a candidate, given its listed title and its profile page
    pub fn bonus_for(&self, listed_title: &str, profile: &SeriesProfile) -> f64 {
        let titles = std::iter::once(listed_title).chain(profile.title.as_deref());
        self.staff_bonus(&profile.credits)
            + self.genre_bonus(&profile.genres)
            + self.recommendation_bonus(titles)
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty() && self.genres.is_empty() && self.recommendations.is_empty()
    }
}

/// Characters & staff page of a series
pub fn characters_url(series_url: &str) -> String {
    format!("{}/characters", series_url)
}

/// "Users also recommend" page of a series
pub fn recommendations_url(series_url: &str) -> String {
    format!("{}/userrecs", series_url)
}

/// Fetches the reference series' pages and builds its signal tables
///
/// Two fetches: the characters & staff page, which also carries the title and
/// the genre sidebar, and the recommendations page. Either failing, or the
/// title being absent, fails the run.
pub async fn load_reference(
    source: &dyn PageSource,
    selectors: &Selectors,
    weights: &SignalWeights,
    series_url: &str,
) -> AppResult<ReferenceSeries> {
    let staff_url = characters_url(series_url);
    let html = source.fetch_page(&staff_url).await?;
    let profile = extract::series_profile(&html, selectors);

    let title = profile
        .title
        .clone()
        .ok_or_else(|| AppError::page_unavailable(&staff_url, "series title not found"))?;

    let recs_html = source.fetch_page(&recommendations_url(series_url)).await?;
    let recommendations = extract::recommended_titles(&recs_html, selectors);

    let tables = SignalTables::build(&profile.credits, &profile.genres, &recommendations, weights);

    tracing::info!(
        title = %title,
        staff = tables.staff.len(),
        genres = tables.genres.len(),
        recommendations = tables.recommendations.len(),
        "Built signal tables for reference series"
    );

    Ok(ReferenceSeries {
        url: series_url.to_string(),
        title,
        tables,
    })
}
