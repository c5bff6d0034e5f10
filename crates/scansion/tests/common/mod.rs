#![allow(dead_code)]

use scansion::prelude::*;

///
/// MoneyType
/// Postgres composite `(number,currency)` in its text form.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoneyType {
    pub number: String,
    pub currency: String,
}

impl MoneyType {
    pub fn new(number: &str, currency: &str) -> Self {
        Self {
            number: number.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl FieldValue for MoneyType {
    fn to_value(&self) -> Value {
        Value::Text(format!("({},{})", self.number, self.currency))
    }

    fn from_value(value: &Value) -> Option<Self> {
        let (number, currency) = value
            .as_text()?
            .strip_prefix('(')?
            .strip_suffix(')')?
            .split_once(',')?;

        Some(Self::new(number, currency))
    }
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Author {
    #[db = "id,pk"]
    pub id: i64,
    #[db = "name"]
    pub name: String,
    #[db = "publisher"]
    pub publisher: Option<String>,
    #[db = "hometown_id"]
    pub hometown_id: Option<i64>,
    #[db = "hometown"]
    #[relation]
    pub hometown: Option<Box<City>>,

    #[db = "books"]
    #[relation]
    pub books: Vec<Book>,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct City {
    #[db = "id,pk"]
    pub id: i64,
    #[db = "name"]
    pub name: String,
    #[db = "country"]
    pub country: String,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Book {
    #[db = "id,pk"]
    pub id: i64,
    #[db = "author_id"]
    pub author_id: i64,
    #[db = "title"]
    pub title: String,
    #[db = "price"]
    pub price: MoneyType,

    #[db = "bookshelves"]
    #[relation]
    pub bookshelves: Vec<Bookshelf>,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Bookshelf {
    #[db = "id,pk"]
    pub id: i64,
    #[db = "name"]
    pub name: String,

    #[db = "books"]
    #[relation]
    pub books: Vec<Book>,
}

///
/// TABLES
/// The rows a joined query over these tables would return.
///

pub fn dublin() -> City {
    City {
        id: 1,
        name: "Dublin".to_string(),
        country: "Ireland".to_string(),
    }
}

pub fn authors() -> Vec<Author> {
    vec![
        Author {
            id: 1,
            name: "Neal Stephenson".to_string(),
            publisher: Some("HarperCollins".to_string()),
            ..Author::default()
        },
        Author {
            id: 2,
            name: "James Joyce".to_string(),
            hometown_id: Some(1),
            ..Author::default()
        },
    ]
}

pub fn books() -> Vec<Book> {
    vec![
        book(1, 1, "Cryptonomicon", MoneyType::new("30.00", "USD")),
        book(2, 1, "Snow Crash", MoneyType::new("20.00", "USD")),
        book(3, 2, "Ulysses", MoneyType::new("25.00", "GBP")),
    ]
}

pub fn book(id: i64, author_id: i64, title: &str, price: MoneyType) -> Book {
    Book {
        id,
        author_id,
        title: title.to_string(),
        price,
        bookshelves: Vec::new(),
    }
}

pub fn bookshelf(id: i64, name: &str) -> Bookshelf {
    Bookshelf {
        id,
        name: name.to_string(),
        books: Vec::new(),
    }
}

/// `(book_id, bookshelf_id)` link rows.
pub const BOOKS_BOOKSHELVES: [(i64, i64); 4] = [(1, 1), (2, 1), (3, 1), (3, 2)];

///
/// ROWS
///

pub fn author_values(author: &Author) -> Vec<Value> {
    vec![
        Value::Int(author.id),
        Value::text(author.name.as_str()),
        author.publisher.clone().into(),
        author.hometown_id.into(),
    ]
}

pub fn book_values(book: &Book) -> Vec<Value> {
    vec![
        Value::Int(book.id),
        Value::Int(book.author_id),
        Value::text(book.title.as_str()),
        book.price.to_value(),
    ]
}

pub fn city_values(city: Option<&City>) -> Vec<Value> {
    match city {
        Some(city) => vec![
            Value::Int(city.id),
            Value::text(city.name.as_str()),
            Value::text(city.country.as_str()),
        ],
        None => vec![Value::Null; 3],
    }
}

pub fn shelf_values(shelf: &Bookshelf) -> Vec<Value> {
    vec![Value::Int(shelf.id), Value::text(shelf.name.as_str())]
}

pub fn sentinel() -> Vec<Value> {
    vec![Value::Int(0)]
}

/// Hometown of `author` as a left join against the cities table.
pub fn hometown_of(author: &Author) -> Option<City> {
    author.hometown_id.and_then(|id| (id == 1).then(dublin))
}

/// `authors.*, 0 AS "scan:books", books.*, 0 AS "scan:hometown", cities.*`
pub fn author_book_city_rows(author_filter: Option<i64>) -> MemoryRows {
    let mut rows = MemoryRows::new([
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
    ]);

    for author in authors()
        .iter()
        .filter(|a| author_filter.is_none_or(|id| a.id == id))
    {
        let city = hometown_of(author);
        for book in books().iter().filter(|b| b.author_id == author.id) {
            rows.push_row(
                [
                    author_values(author),
                    sentinel(),
                    book_values(book),
                    sentinel(),
                    city_values(city.as_ref()),
                ]
                .concat(),
            );
        }
    }

    rows
}

/// Adds `0 AS "scan:books.bookshelves", bookshelves.*` after the books.
pub fn deep_rows() -> MemoryRows {
    let mut rows = MemoryRows::new([
        "id",
        "name",
        "publisher",
        "hometown_id",
        "scan:books",
        "id",
        "author_id",
        "title",
        "price",
        "scan:books.bookshelves",
        "id",
        "name",
        "scan:hometown",
        "id",
        "name",
        "country",
    ]);
    let shelves = [bookshelf(1, "Daniel"), bookshelf(2, "George")];

    for author in &authors() {
        let city = hometown_of(author);
        for book in books().iter().filter(|b| b.author_id == author.id) {
            for &(_, shelf_id) in BOOKS_BOOKSHELVES.iter().filter(|(b, _)| *b == book.id) {
                let Some(shelf) = shelves.iter().find(|s| s.id == shelf_id) else {
                    continue;
                };

                rows.push_row(
                    [
                        author_values(author),
                        sentinel(),
                        book_values(book),
                        sentinel(),
                        shelf_values(shelf),
                        sentinel(),
                        city_values(city.as_ref()),
                    ]
                    .concat(),
                );
            }
        }
    }

    rows
}
