mod common;

use common::*;
use proptest::prelude::*;
use scansion::prelude::*;

fn columns() -> [&'static str; 13] {
    [
        "id",
        "name",
        "publisher",
        "hometown_id",
        "scan:books",
        "id",
        "author_id",
        "title",
        "price",
        "scan:hometown",
        "id",
        "name",
        "country",
    ]
}

/// One joined row per `(author, book, has_hometown)`; the city id follows the author.
fn joined(rows: &[(i64, i64, bool)]) -> MemoryRows {
    let mut source = MemoryRows::new(columns());

    for &(author_id, book_id, has_hometown) in rows {
        let author = Author {
            id: author_id,
            name: format!("author {author_id}"),
            hometown_id: has_hometown.then_some(author_id),
            ..Author::default()
        };
        let city = has_hometown.then(|| City {
            id: author_id,
            name: format!("city {author_id}"),
            country: "Ireland".to_string(),
        });
        let book = book(book_id, author_id, "t", MoneyType::new("1.00", "EUR"));

        source.push_row(
            [
                author_values(&author),
                sentinel(),
                book_values(&book),
                sentinel(),
                city_values(city.as_ref()),
            ]
            .concat(),
        );
    }

    source
}

proptest! {
    #[test]
    fn left_join_miss_leaves_relation_absent(
        rows in prop::collection::vec((0i64..5, 0i64..5, any::<bool>()), 1..30),
    ) {
        // an author's hometown is decided by its first row
        let mut home = std::collections::BTreeMap::new();
        let rows: Vec<_> = rows
            .into_iter()
            .map(|(a, b, h)| (a, b, *home.entry(a).or_insert(h)))
            .collect();

        let authors: Vec<Author> = scan_many(&mut joined(&rows)).unwrap();

        for author in &authors {
            let expected = home[&author.id];
            prop_assert_eq!(author.hometown.is_some(), expected);
            if let Some(city) = &author.hometown {
                prop_assert_eq!(city.id, author.id);
            }
        }
    }

    #[test]
    fn repeated_rows_never_duplicate_children(
        rows in prop::collection::vec((0i64..3, 0i64..4, Just(false)), 1..20),
        repeats in 1usize..4,
    ) {
        let once: Vec<Author> = scan_many(&mut joined(&rows)).unwrap();
        let repeated: Vec<Author> = scan_many(&mut joined(&rows.repeat(repeats))).unwrap();

        prop_assert_eq!(once, repeated);
    }
}
