//! The queries behind each dashboard panel, built from the generic
//! loader, derive and aggregate functions.

use crate::aggregate::{count_by, count_non_null, crosstab, group_mean_count, sum, top_k, unique_count, Direction};
use crate::coerce::{load_table, LoadOptions};
use crate::correlation::{correlate, CorrelationReport};
use crate::derive::{explode_topics, with_month_and_date, DATE_COLUMN, TOPICS_COLUMN, YEAR_COLUMN};
use crate::error::CoreResult;
use crate::schema::{authors_schema, data_schema, main_schema, resources_schema, sheets};
use crate::table::{AggregateTable, TypedTable};
use crate::value::Value;
use bookclub_sheet::RowSource;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

pub const TITLE: &str = "Title";
pub const SCORE: &str = "Score";
pub const AUTHOR: &str = "Author";
pub const PUBLISHER: &str = "Publisher";
pub const PAGES: &str = "Pages";
pub const AUTHOR_GENDER: &str = "Author gender";
pub const GOODREADS_SCORE: &str = "Goodreads score";
pub const OUR_SCORE_CONVERSION: &str = "Our score conversion";

/// Resource row holding the club's Meetup page.
pub const MEETUP_RESOURCE: &str = "Meetup Page";

/// Load the Main sheet with derived month and date columns, keeping only
/// scored books with a title.
pub fn load_books<S>(source: &S, options: LoadOptions) -> CoreResult<TypedTable>
where
    S: RowSource + ?Sized,
{
    let main = load_table(source, sheets::MAIN, &main_schema(), options)?;
    let books = retain_scored_books(&with_month_and_date(&main)?)?;
    debug!(loaded = main.row_count(), kept = books.row_count(), "prepared books");
    Ok(books)
}

/// Load the Resources sheet.
pub fn load_resources<S>(source: &S, options: LoadOptions) -> CoreResult<TypedTable>
where
    S: RowSource + ?Sized,
{
    load_table(source, sheets::RESOURCES, &resources_schema(), options)
}

/// Load the Authors sheet.
pub fn load_authors<S>(source: &S, options: LoadOptions) -> CoreResult<TypedTable>
where
    S: RowSource + ?Sized,
{
    load_table(source, sheets::AUTHORS, &authors_schema(), options)
}

/// Load the Data lookup sheet. Its columns are read by position.
pub fn load_reference_data<S>(source: &S, options: LoadOptions) -> CoreResult<TypedTable>
where
    S: RowSource + ?Sized,
{
    load_table(source, sheets::DATA, &data_schema(), options)
}

/// Drop rows without a positive score or without a title.
pub fn retain_scored_books(table: &TypedTable) -> CoreResult<TypedTable> {
    table
        .filter_by(SCORE, |v| v.as_f64().is_some_and(|s| s > 0.0))?
        .filter_by(TITLE, |v| !v.is_null())
}

/// Keep the rows whose year is one of `years`.
pub fn filter_years(table: &TypedTable, years: &[i64]) -> CoreResult<TypedTable> {
    table.filter_by(YEAR_COLUMN, |v| v.as_int().is_some_and(|y| years.contains(&y)))
}

/// Distinct years, ascending.
pub fn years(table: &TypedTable) -> CoreResult<Vec<i64>> {
    Ok(table
        .unique_sorted(YEAR_COLUMN)?
        .iter()
        .filter_map(Value::as_int)
        .collect())
}

/// Title, date and score, most recent first.
pub fn selected_books(table: &TypedTable) -> CoreResult<TypedTable> {
    table.sort_by(DATE_COLUMN, true)?.select(&[TITLE, DATE_COLUMN, SCORE])
}

/// Mean score and book count per publisher, best-scoring first.
pub fn publisher_scores(table: &TypedTable) -> CoreResult<AggregateTable> {
    group_mean_count(table, PUBLISHER, SCORE)?.sort_by(SCORE, true)
}

/// Books per topic, least discussed first.
pub fn topic_counts(table: &TypedTable) -> CoreResult<AggregateTable> {
    count_by(&explode_topics(table)?, TOPICS_COLUMN)
}

/// Publisher × topic book counts.
pub fn publisher_topic_heatmap(table: &TypedTable) -> CoreResult<AggregateTable> {
    crosstab(&explode_topics(table)?, PUBLISHER, TOPICS_COLUMN)
}

/// Books per author gender.
pub fn gender_counts(table: &TypedTable) -> CoreResult<AggregateTable> {
    count_by(table, AUTHOR_GENDER)
}

/// Score against page count, and the club's converted score against
/// Goodreads. Pairs without enough data are left out.
pub fn correlations(table: &TypedTable) -> CoreResult<Vec<CorrelationReport>> {
    let pairs = [(SCORE, PAGES), (OUR_SCORE_CONVERSION, GOODREADS_SCORE)];
    let mut reports = Vec::new();
    for (x, y) in pairs {
        if let Some(report) = correlate(table, x, y)? {
            reports.push(report);
        }
    }
    Ok(reports)
}

/// URL of the Meetup page listed in the Resources sheet.
pub fn meetup_url(resources: &TypedTable) -> CoreResult<Option<String>> {
    let matches = resources.filter_by("Resource", |v| v.as_str() == Some(MEETUP_RESOURCE))?;
    Ok(matches
        .get(0, "URL")?
        .as_str()
        .map(str::to_string))
}

/// The best-scored book and how far ahead of the runner-up it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<NaiveDate>,
    pub score: f64,
    pub lead: Option<f64>,
}

/// All-time headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub highest_score: Option<TopBook>,
    pub total_pages: i64,
    /// Page count of the most recently read book.
    pub latest_pages: Option<i64>,
    pub total_books: usize,
    pub total_authors: usize,
    pub total_publishers: usize,
}

impl Overview {
    pub fn from_books(table: &TypedTable) -> CoreResult<Self> {
        let top = top_k(table, SCORE, 2, Direction::Largest)?;
        let highest_score = match top.get(0, SCORE)?.as_f64() {
            Some(score) => Some(TopBook {
                title: top.get(0, TITLE)?.as_str().map(str::to_string),
                author: top.get(0, AUTHOR)?.as_str().map(str::to_string),
                date: top.get(0, DATE_COLUMN)?.as_date(),
                score,
                lead: top
                    .get(1, SCORE)?
                    .as_f64()
                    .map(|second| crate::correlation::round_to(score - second, 4)),
            }),
            None => None,
        };

        let latest = top_k(table, DATE_COLUMN, 1, Direction::Largest)?;

        Ok(Overview {
            highest_score,
            total_pages: sum(table, PAGES)?.as_int().unwrap_or(0),
            latest_pages: latest.get(0, PAGES)?.as_int(),
            total_books: count_non_null(table, TITLE)?,
            total_authors: unique_count(table, AUTHOR)?,
            total_publishers: unique_count(table, PUBLISHER)?,
        })
    }
}
