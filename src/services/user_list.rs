use crate::{
    error::{AppError, AppResult},
    models::User,
    services::catalog::{extract, PageSource, Selectors},
};

/// Rows per page of the "recently updated by" listing
pub const PAGE_SIZE: usize = 75;

/// Score cell shown for users who have not scored the series
pub const NO_SCORE: &str = "-";

/// Returns the `count` most recent users to update `series_url` with a score
///
/// Pages through the listing in order, skipping unscored entries. Fails with
/// `PageUnavailable` if a page cannot be fetched or the listing runs out
/// before enough users are found.
pub async fn last_updated_users(
    source: &dyn PageSource,
    selectors: &Selectors,
    base_url: &str,
    series_url: &str,
    count: usize,
) -> AppResult<Vec<User>> {
    let mut users = Vec::with_capacity(count);
    let mut page = 0;

    while users.len() < count {
        let url = format!("{}/stats?m=all&show={}", series_url, page * PAGE_SIZE);
        let html = source.fetch_page(&url).await?;
        let listing = extract::recent_users(&html, selectors);

        if listing.row_count == 0 {
            tracing::warn!(
                url = %url,
                found = users.len(),
                wanted = count,
                "Recently updated listing exhausted"
            );
            return Err(AppError::page_unavailable(
                &url,
                format!("listing exhausted after {} of {} users", users.len(), count),
            ));
        }

        let qualifying = listing
            .users
            .into_iter()
            .filter(|row| row.score != NO_SCORE)
            .take(count - users.len())
            .map(|row| User::new(base_url, row.username));
        users.extend(qualifying);

        tracing::debug!(page, collected = users.len(), wanted = count, "Scanned user listing page");
        page += 1;
    }

    tracing::info!(users = users.len(), pages = page, "Sampled recently updated users");

    Ok(users)
}
