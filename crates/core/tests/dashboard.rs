use bookclub_core::dashboard::{
    correlations, filter_years, gender_counts, load_authors, load_books, load_reference_data,
    load_resources, meetup_url, publisher_scores, publisher_topic_heatmap, selected_books,
    topic_counts, years,
};
use bookclub_core::{CoreError, LoadOptions, Overview, Value};
use bookclub_sheet::{MemorySource, RawTable};
use chrono::NaiveDate;

const MAIN_HEADERS: [&str; 17] = [
    "Number",
    "ISBN",
    "Month",
    "Year",
    "Title",
    "Score",
    "Author",
    "Publisher",
    "Pages",
    "Author gender",
    "Pub year",
    "Goodreads score",
    "Our score conversion",
    "variance",
    "Debut?",
    "Translated?",
    "Topics",
];

fn main_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec![
            "1", "9780441013593", "January", "2022", "Dune", "8.2", "Frank Herbert", "Ace", "412",
            "Male", "1965", "4.27", "4.1", "0.17", "No", "No", "Ecology, Religion",
        ],
        vec![
            "2", "", "February", "2022", "Emma", "6.5", "Jane Austen", "Penguin", "474", "Female",
            "1815", "4.02", "3.25", "0.77", "No", "No", "Marriage",
        ],
        vec![
            "3", "", "March", "2023", "Piranesi", "9.1", "Susanna Clarke", "Bloomsbury", "272",
            "Female", "2020", "4.23", "4.55", "-0.32", "No", "No", "Fantasy, Religion",
        ],
        // Ragged: trailing cells never filled in
        vec!["4", "", "April", "2023", "Stoner", "9.1", "John Williams", "Penguin", "288"],
        // Not yet discussed: no score, dropped from the dashboard
        vec!["5", "", "May", "2023", "Next Pick"],
    ]
}

fn source() -> MemorySource {
    let main = RawTable::from_data(MAIN_HEADERS.to_vec(), main_rows()).unwrap();
    let resources = RawTable::from_data(
        vec!["Resource", "Description", "URL"],
        vec![
            vec!["Goodreads", "Our shelf", "https://www.goodreads.com/group/nlfb"],
            vec!["Meetup Page", "Where we meet", "https://www.meetup.com/nlfb/"],
        ],
    )
    .unwrap();
    MemorySource::new()
        .with_sheet("Main", main)
        .with_sheet("Resources", resources)
}

#[test]
fn test_load_books_filters_and_derives() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();

    assert_eq!(books.row_count(), 4);
    assert!(books.has_column("Month Num"));
    assert_eq!(
        books.get(2, "Date").unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())
    );
    assert!(books.get(3, "Topics").unwrap().is_null());
    assert!(books.get(1, "ISBN").unwrap().is_null());
}

#[test]
fn test_load_books_strict_mode() {
    let mut rows = main_rows();
    rows[1][8] = "four hundred";
    let source = MemorySource::new().with_sheet(
        "Main",
        RawTable::from_data(MAIN_HEADERS.to_vec(), rows).unwrap(),
    );

    let lenient = load_books(&source, LoadOptions::default()).unwrap();
    assert!(lenient.get(1, "Pages").unwrap().is_null());

    let err = load_books(&source, LoadOptions::strict()).unwrap_err();
    assert!(matches!(err, CoreError::Coercion { ref column, row: 1, .. } if column == "Pages"));
}

#[test]
fn test_load_books_unknown_month() {
    let mut rows = main_rows();
    rows[0][2] = "Jan";
    let source = MemorySource::new().with_sheet(
        "Main",
        RawTable::from_data(MAIN_HEADERS.to_vec(), rows).unwrap(),
    );

    assert!(matches!(
        load_books(&source, LoadOptions::default()),
        Err(CoreError::UnknownMonthName(m)) if m == "Jan"
    ));
}

#[test]
fn test_load_books_wide_row() {
    let mut rows = main_rows();
    rows[0].push("stray");
    let source = MemorySource::new().with_sheet(
        "Main",
        RawTable::from_data(MAIN_HEADERS.to_vec(), rows).unwrap(),
    );

    assert!(matches!(
        load_books(&source, LoadOptions::default()),
        Err(CoreError::InvariantViolation { row: 0, width: 18, expected: 17 })
    ));
}

#[test]
fn test_missing_sheet() {
    let err = load_books(&MemorySource::new(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, CoreError::Sheet(_)));
}

#[test]
fn test_years_and_filter() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    assert_eq!(years(&books).unwrap(), vec![2022, 2023]);

    let only_2023 = filter_years(&books, &[2023]).unwrap();
    assert_eq!(only_2023.row_count(), 2);
    assert!(filter_years(&books, &[]).unwrap().is_empty());
}

#[test]
fn test_selected_books_most_recent_first() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    let selected = selected_books(&books).unwrap();

    assert_eq!(selected.column_names(), vec!["Title", "Date", "Score"]);
    assert_eq!(selected.get(0, "Title").unwrap(), Value::from("Stoner"));
    assert_eq!(selected.get(3, "Title").unwrap(), Value::from("Dune"));
}

#[test]
fn test_publisher_scores() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    let scores = publisher_scores(&books).unwrap();

    assert_eq!(scores.get(0, "Publisher").unwrap(), Value::from("Bloomsbury"));
    let penguin = scores
        .filter_by("Publisher", |v| v.as_str() == Some("Penguin"))
        .unwrap();
    assert_eq!(penguin.get(0, "Count").unwrap(), Value::Int(2));
    let mean = penguin.get(0, "Score").unwrap().as_f64().unwrap();
    assert!((mean - 7.8).abs() < 1e-9);
}

#[test]
fn test_topic_counts_and_heatmap() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();

    let topics = topic_counts(&books).unwrap();
    let total: i64 = topics
        .column("Count")
        .unwrap()
        .values()
        .filter_map(|v| v.as_int())
        .sum();
    // Four books, two with two topics each, one without topics
    assert_eq!(total, 6);
    assert_eq!(topics.get(topics.row_count() - 1, "Topics").unwrap(), Value::from("Religion"));

    let heatmap = publisher_topic_heatmap(&books).unwrap();
    assert_eq!(
        heatmap.column_names(),
        vec!["Publisher", "Ecology", "Fantasy", "Marriage", "Religion", "null"]
    );
    assert_eq!(heatmap.row_count(), 3);
    for row in 0..heatmap.row_count() {
        for value in heatmap.row(row).iter().skip(1) {
            assert!(value.as_int().is_some());
        }
    }
}

#[test]
fn test_gender_counts() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    let genders = gender_counts(&books).unwrap();
    assert_eq!(genders.get(genders.row_count() - 1, "Author gender").unwrap(), Value::from("Female"));
}

#[test]
fn test_correlations() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    let reports = correlations(&books).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].x, "Score");
    assert!((-1.0..=1.0).contains(&reports[0].r));
    assert!(reports[0].label.ends_with("correlation"));

    assert!(correlations(&books.take(&[])).unwrap().is_empty());
}

#[test]
fn test_overview() {
    let books = load_books(&source(), LoadOptions::default()).unwrap();
    let overview = Overview::from_books(&books).unwrap();

    let top = overview.highest_score.clone().unwrap();
    assert_eq!(top.title.as_deref(), Some("Piranesi"));
    assert_eq!(top.score, 9.1);
    assert_eq!(top.lead, Some(0.0));
    assert_eq!(top.date, NaiveDate::from_ymd_opt(2023, 3, 1));

    assert_eq!(overview.total_pages, 412 + 474 + 272 + 288);
    assert_eq!(overview.latest_pages, Some(288));
    assert_eq!(overview.total_books, 4);
    assert_eq!(overview.total_authors, 4);
    assert_eq!(overview.total_publishers, 3);

    let json = serde_json::to_value(&overview).unwrap();
    assert_eq!(json["highest_score"]["date"], "2023-03-01");
}

#[test]
fn test_overview_empty() {
    let books = load_books(&source(), LoadOptions::default()).unwrap().take(&[]);
    let overview = Overview::from_books(&books).unwrap();
    assert!(overview.highest_score.is_none());
    assert_eq!(overview.total_pages, 0);
    assert_eq!(overview.latest_pages, None);
}

#[test]
fn test_meetup_url() {
    let resources = load_resources(&source(), LoadOptions::strict()).unwrap();
    assert_eq!(
        meetup_url(&resources).unwrap().as_deref(),
        Some("https://www.meetup.com/nlfb/")
    );
    assert_eq!(meetup_url(&resources.take(&[])).unwrap(), None);
}

#[test]
fn test_non_finite_score_does_not_break_dashboard() {
    let mut rows = main_rows();
    rows[1][5] = "NaN";
    rows[2][12] = "inf";
    let source = MemorySource::new().with_sheet(
        "Main",
        RawTable::from_data(MAIN_HEADERS.to_vec(), rows).unwrap(),
    );

    // The NaN-scored book has no usable score and is dropped like an unscored one
    let books = load_books(&source, LoadOptions::default()).unwrap();
    assert_eq!(books.row_count(), 3);
    assert!(correlations(&books).is_ok());

    let overview = Overview::from_books(&books).unwrap();
    assert_eq!(overview.highest_score.unwrap().title.as_deref(), Some("Piranesi"));

    assert!(matches!(
        load_books(&source, LoadOptions::strict()),
        Err(CoreError::Coercion { row: 1, .. })
    ));
}

#[test]
fn test_heatmap_with_literal_null_topic() {
    let mut rows = main_rows();
    rows[0][16] = "null";
    let source = MemorySource::new().with_sheet(
        "Main",
        RawTable::from_data(MAIN_HEADERS.to_vec(), rows).unwrap(),
    );
    let books = load_books(&source, LoadOptions::default()).unwrap();

    let heatmap = publisher_topic_heatmap(&books).unwrap();
    assert_eq!(
        heatmap.column_names(),
        vec!["Publisher", "Fantasy", "Marriage", "Religion", "null", "null (2)"]
    );
    assert_eq!(heatmap.get(0, "null").unwrap(), Value::Int(1));
    assert_eq!(heatmap.get(0, "null (2)").unwrap(), Value::Int(0));
}

#[test]
fn test_load_authors_and_reference_data() {
    let authors = RawTable::from_data(
        vec![
            "Forename",
            "Surname",
            "Author Name",
            "Gender",
            "Country of Birth",
            "Year of Birth",
        ],
        vec![vec!["Susanna", "Clarke", "Susanna Clarke", "Female", "England", "1959"]],
    );
    // Short header row: the trailing biographical columns are missing
    let source = MemorySource::new().with_sheet("Authors", authors.unwrap());
    assert!(matches!(
        load_authors(&source, LoadOptions::default()),
        Err(CoreError::MissingColumn(c)) if c == "Year of death"
    ));

    let headers = [
        "Forename",
        "Surname",
        "Author Name",
        "Gender",
        "Country of Birth",
        "Year of Birth",
        "Year of death",
        "Books since last bookclub pick",
        "Book title",
    ];
    let authors = RawTable::from_data(
        headers.to_vec(),
        vec![vec!["Susanna", "Clarke", "Susanna Clarke", "Female", "England", "1959"]],
    )
    .unwrap();
    let data = RawTable::from_data(
        vec!["", "", "", "", "", "", ""],
        vec![vec!["Male", "Female"], vec!["Yes", "No"]],
    )
    .unwrap();
    let source = MemorySource::new()
        .with_sheet("Authors", authors)
        .with_sheet("Data", data);

    let authors = load_authors(&source, LoadOptions::strict()).unwrap();
    assert_eq!(authors.get(0, "Year of Birth").unwrap(), Value::from("1959"));
    assert!(authors.get(0, "Book title").unwrap().is_null());

    let data = load_reference_data(&source, LoadOptions::default()).unwrap();
    assert_eq!(data.column_count(), 7);
    assert_eq!(data.get(1, "column_0").unwrap(), Value::from("Yes"));
    assert!(data.get(0, "column_6").unwrap().is_null());
}
